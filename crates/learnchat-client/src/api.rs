//! Shared HTTP client and URL handling.

use learnchat_config::ApiConfig;
use log::debug;
use std::time::Duration;

/// reqwest client bound to the platform API base URL.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    request_timeout: Duration,
}

impl ApiClient {
    /// Create a client for `base_url`; `request_timeout` applies to non-chat calls.
    pub fn new(base_url: impl Into<String>, request_timeout: Duration) -> Result<Self, reqwest::Error> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let http = reqwest::Client::builder().build()?;
        debug!("api client initialized (base_url={base_url})");
        Ok(Self {
            http,
            base_url,
            request_timeout,
        })
    }

    /// Create a client from the `api` config section.
    pub fn from_config(config: &ApiConfig) -> Result<Self, reqwest::Error> {
        Self::new(config.base_url.clone(), config.request_timeout())
    }

    /// Absolute URL for an API path such as `/ai/chat`.
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Timeout for non-chat requests.
    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// Underlying reqwest client.
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }
}
