use super::util::with_timeout;
use crate::core::error::{FetchError, FetchResult};
use crate::core::rates::{RateFetcher, RateTable};
use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, instrument};

/// Client for providers serving `GET <base_url>/<BASE>` with a `rates` map.
pub struct ExchangeRateApiProvider {
    base_url: String,
    timeout: Duration,
    client: reqwest::Client,
}

impl ExchangeRateApiProvider {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().user_agent("fxc/1.0").build()?;
        Ok(ExchangeRateApiProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
            client,
        })
    }

    async fn request(&self, url: &str, base: &str) -> FetchResult<RateTable> {
        let response = self.client.get(url).send().await.map_err(|e| {
            FetchError::Transport(format!("Request error: {e} for base currency: {base}"))
        })?;

        debug!(status = %response.status(), "Received rate provider response");

        if !response.status().is_success() {
            return Err(FetchError::Transport(format!(
                "HTTP error: {} for base currency: {}",
                response.status(),
                base
            )));
        }

        let text = response
            .text()
            .await
            .map_err(|e| FetchError::Transport(format!("Failed to read response body: {e}")))?;

        let data: LatestRatesResponse = serde_json::from_str(&text).map_err(|e| {
            FetchError::Protocol(format!("Failed to parse JSON response for {base}: {e}"))
        })?;

        Ok(RateTable::new(base, data.rates))
    }
}

#[derive(Debug, Deserialize)]
struct LatestRatesResponse {
    rates: HashMap<String, f64>,
}

#[async_trait]
impl RateFetcher for ExchangeRateApiProvider {
    #[instrument(name = "RateFetch", skip(self), fields(base = %base))]
    async fn fetch_rates_for(&self, base: &str) -> FetchResult<RateTable> {
        let url = format!("{}/{}", self.base_url, base);
        debug!("Requesting exchange rates from {}", url);
        with_timeout(self.request(&url, base), self.timeout).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn create_mock_server(base: &str, response: ResponseTemplate) -> MockServer {
        let mock_server = MockServer::start().await;
        let request_path = format!("/{base}");

        Mock::given(method("GET"))
            .and(path(request_path))
            .respond_with(response)
            .mount(&mock_server)
            .await;

        mock_server
    }

    fn provider(server: &MockServer) -> ExchangeRateApiProvider {
        ExchangeRateApiProvider::new(&server.uri(), Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_successful_rates_fetch() {
        let mock_response = r#"{
            "base": "USD",
            "date": "2025-01-01",
            "rates": {"USD": 1, "EUR": 0.92, "IDR": 15000}
        }"#;
        let server =
            create_mock_server("USD", ResponseTemplate::new(200).set_body_string(mock_response))
                .await;

        let table = provider(&server).fetch_rates_for("USD").await.unwrap();
        assert_eq!(table.base(), "USD");
        assert_eq!(table.get("USD"), Some(1.0));
        assert_eq!(table.get("EUR"), Some(0.92));
        assert_eq!(table.get("IDR"), Some(15000.0));
    }

    #[tokio::test]
    async fn test_fetch_rate_for_missing_target() {
        let mock_response = r#"{"rates": {"EUR": 0.92}}"#;
        let server =
            create_mock_server("USD", ResponseTemplate::new(200).set_body_string(mock_response))
                .await;

        let provider = provider(&server);
        assert_eq!(provider.fetch_rate("USD", "EUR").await.unwrap(), 0.92);

        let result = provider.fetch_rate("USD", "THB").await;
        assert!(matches!(result, Err(FetchError::UnsupportedCurrency(ref c)) if c == "THB"));
    }

    #[tokio::test]
    async fn test_api_error_response() {
        let server = create_mock_server("USD", ResponseTemplate::new(500)).await;

        let result = provider(&server).fetch_rates_for("USD").await;
        assert!(matches!(result, Err(FetchError::Transport(_))));
        assert_eq!(
            result.unwrap_err().to_string(),
            "Transport error: HTTP error: 500 Internal Server Error for base currency: USD"
        );
    }

    #[tokio::test]
    async fn test_missing_rates_field() {
        let mock_response = r#"{"result": "success", "base": "USD"}"#;
        let server =
            create_mock_server("USD", ResponseTemplate::new(200).set_body_string(mock_response))
                .await;

        let result = provider(&server).fetch_rates_for("USD").await;
        assert!(matches!(result, Err(FetchError::Protocol(_))));
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Failed to parse JSON response for USD")
        );
    }

    #[tokio::test]
    async fn test_rates_field_not_a_mapping() {
        let mock_response = r#"{"rates": [1, 2, 3]}"#;
        let server =
            create_mock_server("USD", ResponseTemplate::new(200).set_body_string(mock_response))
                .await;

        let result = provider(&server).fetch_rates_for("USD").await;
        assert!(matches!(result, Err(FetchError::Protocol(_))));
    }

    #[tokio::test]
    async fn test_slow_provider_times_out() {
        let server = create_mock_server(
            "USD",
            ResponseTemplate::new(200)
                .set_body_string(r#"{"rates": {"EUR": 0.9}}"#)
                .set_delay(Duration::from_secs(5)),
        )
        .await;

        let bound = Duration::from_millis(200);
        let provider = ExchangeRateApiProvider::new(&server.uri(), bound).unwrap();
        let start = std::time::Instant::now();
        let result = provider.fetch_rates_for("USD").await;

        assert!(matches!(result, Err(FetchError::Timeout(d)) if d == bound));
        let elapsed = start.elapsed();
        assert!(elapsed >= bound);
        assert!(elapsed < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_unreachable_provider_is_transport_error() {
        let provider =
            ExchangeRateApiProvider::new("http://127.0.0.1:9", Duration::from_secs(5)).unwrap();
        let result = provider.fetch_rates_for("USD").await;
        assert!(matches!(result, Err(FetchError::Transport(_))));
    }
}
