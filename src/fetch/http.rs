use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tokio::time::timeout;

use super::{FetchClient, FetchError, FetchRequest, FetchResponse, Method};
use crate::config::FetchConfig;

/// [`FetchClient`] backed by reqwest.
pub struct HttpFetchClient {
    client: Client,
    request_timeout: Duration,
}

impl HttpFetchClient {
    pub fn new(config: &FetchConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(u64::from(config.connect_timeout_seconds)))
            .build()?;

        Ok(Self {
            client,
            request_timeout: Duration::from_secs(u64::from(config.timeout_seconds)),
        })
    }

    async fn do_fetch(&self, request: FetchRequest) -> Result<FetchResponse, FetchError> {
        let url = request.url;
        let mut builder = match request.method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
        };

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let resp = builder.send().await.map_err(|e| FetchError::Request {
            url: url.clone(),
            source: e,
        })?;

        let status = resp.status();
        let final_url = resp.url().to_string();
        let body = resp.text().await.map_err(|e| FetchError::Request {
            url: url.clone(),
            source: e,
        })?;

        tracing::debug!(url = %final_url, status = status.as_u16(), "Fetched");

        Ok(FetchResponse {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            url: final_url,
            body,
        })
    }
}

#[async_trait]
impl FetchClient for HttpFetchClient {
    async fn fetch(&self, request: FetchRequest) -> Result<FetchResponse, FetchError> {
        let url = request.url.clone();
        match timeout(self.request_timeout, self.do_fetch(request)).await {
            Ok(result) => result,
            Err(_) => Err(FetchError::Timeout {
                url,
                duration: self.request_timeout.as_secs(),
            }),
        }
    }
}
