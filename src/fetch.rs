use anyhow::{Context, Result};
use reqwest::header::ACCEPT;
use reqwest::{Client, Url};
use thiserror::Error;

use crate::config::Config;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("connect timeout")]
    ConnectTimeout,
    #[error("connection refused: {0}")]
    ConnectRefused(String),
    #[error("TLS failure: {0}")]
    Tls(String),
    #[error("response timeout")]
    ResponseTimeout,
    #[error("HTTP status {0}")]
    Status(u16),
    #[error("transport closed: {0}")]
    TransportClosed(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            if err.is_connect() {
                FetchError::ConnectTimeout
            } else {
                FetchError::ResponseTimeout
            }
        } else if err.is_connect() {
            if is_tls_failure(&err) {
                FetchError::Tls(err.to_string())
            } else {
                FetchError::ConnectRefused(err.to_string())
            }
        } else if let Some(status) = err.status() {
            FetchError::Status(status.as_u16())
        } else {
            FetchError::TransportClosed(err.to_string())
        }
    }
}

// reqwest exposes no TLS error class; classify from the source chain.
fn is_tls_failure(err: &reqwest::Error) -> bool {
    let mut source = std::error::Error::source(err);
    while let Some(inner) = source {
        let text = inner.to_string().to_ascii_lowercase();
        if text.contains("tls") || text.contains("certificate") || text.contains("handshake") {
            return true;
        }
        source = inner.source();
    }
    false
}

pub struct Fetcher {
    client: Client,
    endpoint: Url,
    api_key: String,
    site_name: String,
    language: String,
    limit: u32,
}

impl Fetcher {
    pub fn new(config: &Config) -> Result<Self> {
        let timeouts = config.timeouts();
        let client = Client::builder()
            .connect_timeout(timeouts.connect)
            .timeout(timeouts.response)
            .build()
            .context("failed to build HTTP client")?;
        let endpoint = Url::parse(&config.endpoint)
            .with_context(|| format!("invalid endpoint {}", config.endpoint))?;
        Ok(Self {
            client,
            endpoint,
            api_key: config.api_key.clone(),
            site_name: config.site_name.clone(),
            language: config.language.clone(),
            limit: config.limit,
        })
    }

    pub fn set_site_name(&mut self, site_name: impl Into<String>) {
        self.site_name = site_name.into();
    }

    fn request_url(&self) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("language", &self.language)
            .append_pair("api_key", &self.api_key)
            .append_pair("limit", &self.limit.to_string())
            .append_pair("sitename", &self.site_name);
        url
    }

    pub async fn fetch(&self) -> Result<String, FetchError> {
        tracing::debug!(site = %self.site_name, endpoint = %self.endpoint, "requesting observations");
        let response = self
            .client
            .get(self.request_url())
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        Ok(response.text().await?)
    }
}
