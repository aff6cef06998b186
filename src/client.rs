use crate::config::Config;
use crate::error::Result;
use crate::http::rate_limit::RateLimitGate;
use crate::http::{self, Json};
use crate::types::{
    self, AnimatedOptions, FlagDescriptor, FlagId, FlagResponse, ImageSource, StaticOptions,
};
use reqwest::Client;
use std::collections::BTreeMap;
use url::Url;

/// Gateway to the pfp.lgbt API.
///
/// Clones share the HTTP connection pool and the rate-limit gate, so a window
/// observed by one clone blocks the others too.
#[derive(Debug, Clone)]
pub struct PfpClient {
    http: Client,
    base: Url,
    gate: RateLimitGate,
}

impl PfpClient {
    /// Client for the public API with default settings.
    pub fn new() -> Result<Self> {
        Self::with_config(&Config::default())
    }

    pub fn with_config(cfg: &Config) -> Result<Self> {
        Self::with_gate(cfg, RateLimitGate::new())
    }

    /// Use a caller-provided gate, e.g. one built with a custom clock.
    pub fn with_gate(cfg: &Config, gate: RateLimitGate) -> Result<Self> {
        Ok(Self {
            http: http::build_client(cfg)?,
            base: cfg.base_url()?,
            gate,
        })
    }

    pub fn is_rate_limited(&self) -> bool {
        self.gate.is_limited()
    }

    /// End of the last observed rate-limit window, in ms since the Unix epoch.
    pub fn rate_limit_reset_at_ms(&self) -> i64 {
        self.gate.reset_at_ms()
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base.join(path)?)
    }

    /// `GET flags`: metadata for every known flag the service reports.
    pub async fn get_flags(&self) -> Result<FlagResponse> {
        let url = self.endpoint("flags")?;
        let Json(raw): Json<BTreeMap<String, FlagDescriptor>> =
            http::execute(&self.gate, self.http.get(url)).await?;
        Ok(types::known_flags(raw))
    }

    /// `GET icon/{flag}`: the flag's icon image.
    pub async fn get_flag_icon(&self, flag: FlagId) -> Result<Vec<u8>> {
        let url = self.endpoint(&format!("icon/{}", flag))?;
        http::execute(&self.gate, self.http.get(url)).await
    }

    /// Apply a static effect and return the rendered image.
    pub async fn create_static_effect(
        &self,
        image: impl Into<ImageSource>,
        flag: FlagId,
        opts: StaticOptions,
    ) -> Result<Vec<u8>> {
        let path = format!(
            "image/static/{}/{}/{}.{}",
            opts.effect, opts.style, flag, opts.format
        );
        self.post_image(&path, image.into(), opts.alpha).await
    }

    /// Apply an animated effect and return the rendered animation.
    pub async fn create_animated_effect(
        &self,
        image: impl Into<ImageSource>,
        flag: FlagId,
        opts: AnimatedOptions,
    ) -> Result<Vec<u8>> {
        let path = format!("image/animated/{}/{}", opts.effect, flag);
        self.post_image(&path, image.into(), opts.alpha).await
    }

    async fn post_image(&self, path: &str, image: ImageSource, alpha: Option<f64>) -> Result<Vec<u8>> {
        let url = self.endpoint(path)?;
        // A closed gate must not let the image download through either.
        self.gate.check()?;
        let bytes = match image {
            ImageSource::Bytes(bytes) => bytes,
            ImageSource::Url(src) => http::fetch_image(&self.http, &src).await?,
        };
        let form = http::image_form(bytes, alpha)?;
        http::execute(&self.gate, self.http.post(url).multipart(form)).await
    }
}
