use std::env;

pub const DEFAULT_API_URL: &str = "https://api.pfp.lgbt/v3/";

/// Runtime configuration for the pfp.lgbt client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub api_url: String,
    pub user_agent: String,
    /// No timeout is applied to outbound calls unless set.
    pub timeout_secs: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            user_agent: default_user_agent(),
            timeout_secs: None,
        }
    }
}

fn default_user_agent() -> String {
    format!("pfp-client/{}", env!("CARGO_PKG_VERSION"))
}

impl Config {
    /// Point the client at another deployment (or a mock server).
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    /// Load configuration from environment. Only the demo binary uses this.
    ///
    /// Env vars:
    /// - PFP_API_URL (default: https://api.pfp.lgbt/v3/)
    /// - PFP_USER_AGENT (default: pfp-client/<version>)
    /// - PFP_HTTP_TIMEOUT_SECS (default: unset, no timeout)
    pub fn from_env() -> Self {
        let api_url = env::var("PFP_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let user_agent = env::var("PFP_USER_AGENT").unwrap_or_else(|_| default_user_agent());
        let timeout_secs = env::var("PFP_HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok());

        Self {
            api_url,
            user_agent,
            timeout_secs,
        }
    }

    /// Base url with a guaranteed trailing slash, so relative joins keep the `/v3/` prefix.
    pub fn base_url(&self) -> Result<url::Url, url::ParseError> {
        let mut base = self.api_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        url::Url::parse(&base)
    }
}
