use async_trait::async_trait;
use reqwest::{Client, Url};
use std::fmt::Debug;

use crate::{
    error::{Result, WeatherError},
    request::redacted,
};

/// Status and raw body of one HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Issues the single GET behind [`WeatherStore::fetch_weather_data`](crate::WeatherStore::fetch_weather_data).
///
/// Only transport failures (DNS, TLS, connection reset, unreadable body) are
/// errors here; a non-success status is returned as a normal response. Errors
/// must not carry the request URL, it holds the API key.
#[async_trait]
pub trait Transport: Send + Sync + Debug {
    async fn get(&self, url: &Url) -> Result<TransportResponse>;
}

#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    http: Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self { http: Client::new() }
    }

    pub fn with_client(http: Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn get(&self, url: &Url) -> Result<TransportResponse> {
        let res = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(|source| WeatherError::Network {
                url: redacted(url),
                source: source.without_url(),
            })?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|source| WeatherError::Network {
                url: redacted(url),
                source: source.without_url(),
            })?;

        Ok(TransportResponse { status: status.as_u16(), body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_range_is_2xx() {
        let ok = |status| TransportResponse { status, body: String::new() }.is_success();
        assert!(ok(200));
        assert!(ok(204));
        assert!(!ok(301));
        assert!(!ok(401));
        assert!(!ok(500));
    }
}
