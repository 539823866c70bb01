use serde_json::Value;
use thiserror::Error;
use tracing::error;

use crate::models::{CollectionStats, ObservationPayload, WeatherRecord};

/// One recoverable per-payload processing failure.
#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("payload missing expected fields: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("payload has no weather conditions")]
    NoConditions,
}

/// Turns raw API payloads into normalized records and gates batches for
/// storage.
pub struct BatchProcessor;

impl BatchProcessor {
    pub fn new() -> Self {
        Self
    }

    /// Extract one record per processable payload, stamping collection
    /// time. A payload that cannot be extracted is dropped with a recorded
    /// issue; the remaining payloads still process.
    pub fn process(&self, payloads: &[Value], stats: &mut CollectionStats) -> Vec<WeatherRecord> {
        let mut records = Vec::with_capacity(payloads.len());

        for payload in payloads {
            match Self::extract(payload) {
                Ok(record) => records.push(record),
                Err(e) => {
                    let city = payload
                        .get("name")
                        .and_then(Value::as_str)
                        .map(String::from);
                    error!(
                        city = city.as_deref().unwrap_or("unknown"),
                        error = %e,
                        "data processing failed, dropping payload"
                    );
                    stats.record_dropped_payload(city, e.to_string());
                }
            }
        }

        records
    }

    fn extract(payload: &Value) -> std::result::Result<WeatherRecord, ProcessError> {
        let obs: ObservationPayload = serde_json::from_value(payload.clone())?;
        let description = obs
            .weather
            .first()
            .ok_or(ProcessError::NoConditions)?
            .description
            .clone();

        Ok(WeatherRecord::new(
            obs.name,
            obs.main.temp,
            obs.main.humidity,
            description,
        ))
    }

    /// All-or-nothing batch validation: false for an empty batch, false if
    /// any record is missing temperature or humidity. A single incomplete
    /// record keeps the whole batch out of the store.
    pub fn validate(records: &[WeatherRecord]) -> bool {
        !records.is_empty() && records.iter().all(WeatherRecord::is_complete)
    }
}

impl Default for BatchProcessor {
    fn default() -> Self {
        Self::new()
    }
}
