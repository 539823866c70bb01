use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::utils::constants::{ANOMALY_MAX_TEMP, ANOMALY_MIN_TEMP};

/// One normalized weather observation for one city at one collection instant.
///
/// The timestamp records collection time, not observation time. Temperature
/// and humidity stay optional all the way to batch validation: the upstream
/// API can return null readings, and the validator decides what to do with
/// them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherRecord {
    /// Collection timestamp (ISO-8601 in the snapshot file)
    #[serde(rename = "time")]
    pub timestamp: DateTime<Utc>,

    pub city: String,

    /// Air temperature in Celsius
    pub temperature: Option<f64>,

    /// Relative humidity (%)
    pub humidity: Option<f64>,

    /// Short description of weather conditions
    pub weather: String,
}

impl WeatherRecord {
    pub fn new(
        city: String,
        temperature: Option<f64>,
        humidity: Option<f64>,
        weather: String,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            city,
            temperature,
            humidity,
            weather,
        }
    }

    /// Both required readings are present. Only complete records survive
    /// batch validation.
    pub fn is_complete(&self) -> bool {
        self.temperature.is_some() && self.humidity.is_some()
    }

    pub fn has_temperature(&self) -> bool {
        self.temperature.is_some()
    }

    /// Temperature strictly outside [-40, 50] Celsius. Boundary values are
    /// not anomalous.
    pub fn is_anomalous(&self) -> bool {
        self.temperature
            .is_some_and(|t| t < ANOMALY_MIN_TEMP || t > ANOMALY_MAX_TEMP)
    }
}
