pub mod rate_limit;

use crate::config::Config;
use crate::error::{PfpError, Result};
use log::{debug, warn};
use rate_limit::RateLimitGate;
use reqwest::header::{HeaderValue, ACCEPT};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Every upload is sent under this name, whatever the real image format is.
pub const UPLOAD_FILE_NAME: &str = "image.png";

/// How a response body is expected to be decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Json,
    Binary,
}

impl ContentKind {
    pub fn name(self) -> &'static str {
        match self {
            ContentKind::Json => "json",
            ContentKind::Binary => "binary",
        }
    }

    fn accept(self) -> HeaderValue {
        match self {
            ContentKind::Json => HeaderValue::from_static("application/json"),
            ContentKind::Binary => HeaderValue::from_static("*/*"),
        }
    }
}

/// A response body type, chosen at the call site.
pub trait ResponseBody: Sized {
    const KIND: ContentKind;

    fn decode(body: &[u8]) -> Result<Self>;
}

impl ResponseBody for Vec<u8> {
    const KIND: ContentKind = ContentKind::Binary;

    fn decode(body: &[u8]) -> Result<Self> {
        Ok(body.to_vec())
    }
}

/// JSON document decoded into `T`.
#[derive(Debug, Clone, PartialEq)]
pub struct Json<T>(pub T);

impl<T: DeserializeOwned> ResponseBody for Json<T> {
    const KIND: ContentKind = ContentKind::Json;

    fn decode(body: &[u8]) -> Result<Self> {
        serde_json::from_slice(body)
            .map(Json)
            .map_err(|e| PfpError::BodyDecode(e.to_string()))
    }
}

pub fn build_client(cfg: &Config) -> reqwest::Result<Client> {
    let mut builder = Client::builder()
        .user_agent(cfg.user_agent.as_str())
        .use_rustls_tls();
    if let Some(secs) = cfg.timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    builder.build()
}

pub fn status_error(status: StatusCode) -> PfpError {
    PfpError::HttpStatus {
        status: status.as_u16(),
        status_text: status.canonical_reason().unwrap_or_default().to_string(),
    }
}

/// Shared request pipeline: gate check, dispatch, rate-limit bookkeeping,
/// status check, body decode.
pub async fn execute<T: ResponseBody>(gate: &RateLimitGate, request: RequestBuilder) -> Result<T> {
    gate.check()?;

    let res = request.header(ACCEPT, T::KIND.accept()).send().await?;
    let status = res.status();
    debug!("{} {} -> {}", T::KIND.name(), res.url(), status);

    // Runs before the status check: error responses carry the headers too.
    gate.observe(res.headers());

    if !status.is_success() {
        return Err(status_error(status));
    }
    let body = res
        .bytes()
        .await
        .map_err(|e| PfpError::BodyDecode(e.to_string()))?;
    T::decode(&body)
}

/// Download an image so it can be re-uploaded as multipart data.
pub async fn fetch_image(client: &Client, url: &str) -> Result<Vec<u8>> {
    let res = client.get(url).send().await.map_err(|e| {
        warn!("image download from {} failed: {}", url, e);
        PfpError::InvalidImage(format!("could not fetch {}: {}", url, e))
    })?;
    let status = res.status();
    if !status.is_success() {
        return Err(PfpError::InvalidImage(format!(
            "could not fetch {}: status {}",
            url, status
        )));
    }
    let bytes = res
        .bytes()
        .await
        .map_err(|e| PfpError::InvalidImage(format!("could not read {}: {}", url, e)))?;
    if bytes.is_empty() {
        return Err(PfpError::InvalidImage(format!("{} returned no data", url)));
    }
    Ok(bytes.to_vec())
}

/// The `alpha` form value, or `None` when the field must be left out.
/// Zero and NaN count as "not provided".
pub fn alpha_field(alpha: Option<f64>) -> Option<String> {
    alpha
        .filter(|a| *a != 0.0 && !a.is_nan())
        .map(|a| a.to_string())
}

pub fn image_form(image: Vec<u8>, alpha: Option<f64>) -> Result<Form> {
    let file = Part::bytes(image)
        .file_name(UPLOAD_FILE_NAME)
        .mime_str("image/png")?;
    let form = Form::new().part("file", file);
    Ok(match alpha_field(alpha) {
        Some(value) => form.text("alpha", value),
        None => form,
    })
}
