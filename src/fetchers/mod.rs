pub mod openweather;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

pub use openweather::OpenWeatherClient;

/// One recoverable per-city fetch failure. These are counted and logged by
/// the collector; they never abort a batch. Carried as data rather than a
/// live error chain because the loop's only use for them is diagnostics.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("request for {city} failed: {message}")]
    Request { city: String, message: String },

    #[error("HTTP status {status} for {city}")]
    HttpStatus {
        city: String,
        status: reqwest::StatusCode,
    },

    #[error("malformed response body for {city}: {message}")]
    Body { city: String, message: String },
}

/// The outbound API seam. The production implementation is
/// [`OpenWeatherClient`]; tests script this trait to drive the loop
/// without a network.
#[async_trait]
pub trait WeatherApi: Send + Sync {
    /// Fetch the current-weather payload for one city. A non-2xx status,
    /// network error, timeout or unparseable body is a per-city failure.
    async fn fetch_city(&self, city: &str) -> std::result::Result<Value, FetchError>;
}
