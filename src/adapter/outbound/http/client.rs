//! `reqwest` implementation of [`MarketDetailSource`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client as HttpClient, StatusCode};
use serde_json::Value;
use tracing::debug;
use url::Url;

use super::settings::SourcesConfig;
use crate::domain::market::Marketplace;
use crate::error::Result;
use crate::port::outbound::source::{MarketDetailSource, RawDetail, SourceError};

/// HTTP client for the marketplace detail service.
///
/// A locator is either an absolute URL or a path joined onto the
/// marketplace's base URL. The response body must be a JSON object.
pub struct HttpDetailSource {
    http: HttpClient,
    base_urls: [Url; 2],
}

impl HttpDetailSource {
    /// # Errors
    ///
    /// Returns an error when a base URL does not parse or the HTTP client
    /// cannot be built.
    pub fn new(config: &SourcesConfig, request_timeout: Duration) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(request_timeout)
            .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            http,
            base_urls: [
                Url::parse(config.base_url(Marketplace::Buff))?,
                Url::parse(config.base_url(Marketplace::Steam))?,
            ],
        })
    }

    /// Resolve a locator against the marketplace base URL.
    ///
    /// # Errors
    ///
    /// Returns a `malformed` error for a locator that cannot form a URL.
    pub fn resolve(&self, market: Marketplace, locator: &str) -> std::result::Result<Url, SourceError> {
        if let Ok(absolute) = Url::parse(locator) {
            return Ok(absolute);
        }
        self.base_urls[market.index()]
            .join(locator.trim_start_matches('/'))
            .map_err(|e| SourceError::malformed(format!("locator {locator}: {e}")))
    }
}

#[async_trait]
impl MarketDetailSource for HttpDetailSource {
    async fn fetch_market_detail(
        &self,
        market: Marketplace,
        locator: &str,
    ) -> std::result::Result<RawDetail, SourceError> {
        let url = self.resolve(market, locator)?;
        debug!(%market, %url, "Requesting market detail");

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| classify_transport(&e))?;

        if let Some(err) = classify_status(response.status()) {
            return Err(err);
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| match classify_transport(&e) {
                transient if transient.is_transient() => transient,
                _ => SourceError::malformed(format!("response body: {e}")),
            })?;
        detail_from_body(body)
    }
}

/// Map a non-success status to a classified failure.
#[must_use]
pub fn classify_status(status: StatusCode) -> Option<SourceError> {
    if status.is_success() {
        return None;
    }
    let err = match status {
        StatusCode::TOO_MANY_REQUESTS | StatusCode::FORBIDDEN => {
            SourceError::rate_limited(format!("status {status}"))
        }
        StatusCode::NOT_FOUND | StatusCode::GONE => {
            SourceError::element_not_found(format!("status {status}"))
        }
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            SourceError::timeout(format!("status {status}"))
        }
        s if s.is_server_error() => SourceError::connection_reset(format!("status {status}")),
        _ => SourceError::malformed(format!("status {status}")),
    };
    Some(err)
}

fn classify_transport(err: &reqwest::Error) -> SourceError {
    if err.is_timeout() {
        SourceError::timeout(err)
    } else if err.is_connect() || err.is_request() || err.is_body() {
        SourceError::connection_reset(err)
    } else {
        SourceError::malformed(err)
    }
}

fn detail_from_body(body: Value) -> std::result::Result<RawDetail, SourceError> {
    if body.is_object() {
        Ok(RawDetail::new(body))
    } else {
        Err(SourceError::malformed("response body is not a JSON object"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::failure::FailureKind;
    use serde_json::json;

    fn source() -> HttpDetailSource {
        HttpDetailSource::new(&SourcesConfig::default(), Duration::from_secs(1)).unwrap()
    }

    #[test]
    fn relative_locators_join_the_market_base() {
        let url = source()
            .resolve(Marketplace::Steam, "/market/listings/730/AK-47")
            .unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:8700/steam/market/listings/730/AK-47");
    }

    #[test]
    fn absolute_locators_are_used_as_is() {
        let url = source()
            .resolve(Marketplace::Buff, "https://buff.163.com/goods/33960")
            .unwrap();
        assert_eq!(url.host_str(), Some("buff.163.com"));
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let config = SourcesConfig {
            buff_base_url: "not a url".into(),
            ..SourcesConfig::default()
        };
        assert!(HttpDetailSource::new(&config, Duration::from_secs(1)).is_err());
    }

    #[test]
    fn statuses_map_to_failure_kinds() {
        let kind = |status| classify_status(status).map(|e| e.kind());
        assert_eq!(kind(StatusCode::OK), None);
        assert_eq!(kind(StatusCode::TOO_MANY_REQUESTS), Some(FailureKind::RateLimited));
        assert_eq!(kind(StatusCode::NOT_FOUND), Some(FailureKind::ElementNotFound));
        assert_eq!(kind(StatusCode::GATEWAY_TIMEOUT), Some(FailureKind::Timeout));
        assert_eq!(kind(StatusCode::BAD_GATEWAY), Some(FailureKind::ConnectionReset));
        assert_eq!(kind(StatusCode::BAD_REQUEST), Some(FailureKind::Malformed));
    }

    #[test]
    fn non_object_bodies_are_malformed() {
        assert!(detail_from_body(json!({"price": 12})).is_ok());
        let err = detail_from_body(json!([1, 2, 3])).unwrap_err();
        assert_eq!(err.kind(), FailureKind::Malformed);
    }
}
