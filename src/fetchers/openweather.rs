use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use crate::error::Result;
use crate::fetchers::{FetchError, WeatherApi};
use crate::settings::ApiSettings;

/// HTTP client for the OpenWeatherMap current-weather endpoint.
///
/// Every call is bounded by the configured timeout; the client is built
/// once and reused for the whole run.
pub struct OpenWeatherClient {
    client: Client,
    api_url: String,
    api_key: String,
}

impl OpenWeatherClient {
    pub fn new(api: &ApiSettings) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(api.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_url: api.api_url.clone(),
            api_key: api.api_key.clone(),
        })
    }
}

#[async_trait]
impl WeatherApi for OpenWeatherClient {
    async fn fetch_city(&self, city: &str) -> std::result::Result<Value, FetchError> {
        debug!(city, "requesting current weather");

        let response = self
            .client
            .get(&self.api_url)
            .query(&[
                ("q", city),
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
            ])
            .send()
            .await
            .map_err(|e| FetchError::Request {
                city: city.to_string(),
                message: e.to_string(),
            })?;

        let response = match response.error_for_status() {
            Ok(resp) => resp,
            Err(e) => {
                return Err(if let Some(status) = e.status() {
                    FetchError::HttpStatus {
                        city: city.to_string(),
                        status,
                    }
                } else {
                    FetchError::Request {
                        city: city.to_string(),
                        message: e.to_string(),
                    }
                });
            }
        };

        response.json::<Value>().await.map_err(|e| FetchError::Body {
            city: city.to_string(),
            message: e.to_string(),
        })
    }
}
