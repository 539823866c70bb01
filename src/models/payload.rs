use serde::Deserialize;

/// Typed view of one OpenWeatherMap current-weather response body.
///
/// `name`, `main` and `weather` must be present for a payload to be
/// processable; readings inside `main` may be absent or null and map to
/// `None`, which is the validator's problem, not the processor's.
#[derive(Debug, Clone, Deserialize)]
pub struct ObservationPayload {
    pub name: String,
    pub main: MainReadings,
    pub weather: Vec<WeatherCondition>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MainReadings {
    #[serde(default)]
    pub temp: Option<f64>,
    #[serde(default)]
    pub humidity: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeatherCondition {
    pub description: String,
}
