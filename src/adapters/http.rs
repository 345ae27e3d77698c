use crate::domain::model::Site;
use crate::domain::ports::{ConfigProvider, Fetcher};
use crate::utils::error::{Result, ScoutError};
use async_trait::async_trait;
use reqwest::header::{
    HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, UPGRADE_INSECURE_REQUESTS,
};
use reqwest::Client;
use std::time::Duration;

/// Builds the shared client: desktop browser user agent and Accept headers.
/// Compression is negotiated by reqwest itself.
pub fn build_client<C: ConfigProvider + ?Sized>(config: &C) -> Result<Client> {
    let mut headers = HeaderMap::new();
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8"),
    );
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));
    headers.insert(UPGRADE_INSECURE_REQUESTS, HeaderValue::from_static("1"));

    let client = Client::builder()
        .user_agent(config.user_agent())
        .default_headers(headers)
        .timeout(Duration::from_secs(config.timeout_seconds()))
        .build()?;
    Ok(client)
}

#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    relay: Option<String>,
}

impl HttpFetcher {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            relay: None,
        }
    }

    pub fn with_relay(mut self, relay: Option<String>) -> Self {
        self.relay = relay;
        self
    }

    /// Fetcher for one site, routed through that site's relay when configured.
    pub fn for_site<C: ConfigProvider + ?Sized>(client: Client, config: &C, site: Site) -> Self {
        Self::new(client).with_relay(config.site_settings(site).relay.clone())
    }

    /// The URL actually requested, after relay wrapping.
    pub fn request_url(&self, url: &str) -> String {
        match &self.relay {
            Some(prefix) => {
                let encoded: String = url::form_urlencoded::byte_serialize(url.as_bytes()).collect();
                format!("{}{}", prefix, encoded)
            }
            None => url.to_string(),
        }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        let target = self.request_url(url);
        tracing::debug!("GET {}", target);

        let response = self.client.get(&target).send().await?;
        let status = response.status();
        tracing::debug!("{} -> {}", target, status);

        if !status.is_success() {
            return Err(ScoutError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response.text().await?)
    }
}
