use std::path::Path;

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tempfile::TempDir;

use owm_collector::collector::Collector;
use owm_collector::fetchers::{FetchError, WeatherApi};
use owm_collector::models::WeatherRecord;
use owm_collector::settings::{
    ApiSettings, CollectionSettings, LoggingSettings, Settings, StorageSettings,
};

fn test_settings(root: &Path, cities: Vec<&str>, max_requests: u32) -> Settings {
    Settings {
        api: ApiSettings {
            api_url: "https://api.example.test/data/2.5/weather".to_string(),
            cities: cities.into_iter().map(String::from).collect(),
            api_key_env_var: "WEATHER_API_KEY".to_string(),
            timeout_secs: 10,
            api_key: "test-key".to_string(),
        },
        collection: CollectionSettings {
            base_delay: 0.0,
            max_requests,
        },
        logging: LoggingSettings::default(),
        storage: StorageSettings {
            data_dir: root.join("data"),
            reports_dir: root.join("reports"),
        },
    }
}

struct AlwaysSucceeds {
    temp: f64,
    humidity: f64,
}

#[async_trait]
impl WeatherApi for AlwaysSucceeds {
    async fn fetch_city(&self, city: &str) -> Result<Value, FetchError> {
        Ok(json!({
            "name": city,
            "main": {"temp": self.temp, "humidity": self.humidity},
            "weather": [{"description": "clear sky"}]
        }))
    }
}

struct AlwaysFails;

#[async_trait]
impl WeatherApi for AlwaysFails {
    async fn fetch_city(&self, city: &str) -> Result<Value, FetchError> {
        Err(FetchError::HttpStatus {
            city: city.to_string(),
            status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
        })
    }
}

struct NullTemperature;

#[async_trait]
impl WeatherApi for NullTemperature {
    async fn fetch_city(&self, city: &str) -> Result<Value, FetchError> {
        Ok(json!({
            "name": city,
            "main": {"temp": null, "humidity": 55},
            "weather": [{"description": "mist"}]
        }))
    }
}

struct MissingMain;

#[async_trait]
impl WeatherApi for MissingMain {
    async fn fetch_city(&self, city: &str) -> Result<Value, FetchError> {
        Ok(json!({"name": city, "weather": [{"description": "unknown"}]}))
    }
}

#[tokio::test]
async fn test_successful_run_stores_one_record_per_batch() {
    let dir = TempDir::new().expect("Failed to create temp directory");
    let settings = test_settings(dir.path(), vec!["Portland,ME,US"], 3);
    settings.storage.ensure_directories().unwrap();
    let snapshot_path = settings.storage.raw_dir().join("collected_data.json");
    let reports_dir = settings.storage.reports_dir.clone();

    let api = AlwaysSucceeds {
        temp: 20.0,
        humidity: 60.0,
    };
    let mut collector = Collector::new(settings, Box::new(api));
    collector.run(None).await.unwrap();

    let stats = collector.stats();
    assert_eq!(stats.total_requests, 3);
    assert_eq!(stats.successful_requests, 3);
    assert_eq!(stats.failed_requests, 0);
    assert_eq!(stats.success_rate(), 1.0);
    assert_eq!(collector.store().len(), 3);

    // The persisted snapshot reflects the in-memory store exactly.
    let body = std::fs::read_to_string(&snapshot_path).unwrap();
    let persisted: Vec<WeatherRecord> = serde_json::from_str(&body).unwrap();
    assert_eq!(persisted.len(), 3);
    assert_eq!(persisted[0].city, "Portland,ME,US");
    assert_eq!(persisted[0].temperature, Some(20.0));

    // Final reporting produced every artifact.
    for name in [
        "quality_report.json",
        "quality_report.txt",
        "quality_report.html",
        "collection_summary.pdf",
    ] {
        assert!(reports_dir.join(name).exists(), "{} missing", name);
    }

    let report: Value = serde_json::from_str(
        &std::fs::read_to_string(reports_dir.join("quality_report.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(report["summary"]["total_records"], 3);
    assert_eq!(report["summary"]["collection_success_rate"], 1.0);
    assert_eq!(report["summary"]["overall_quality_score"], 1.0);
}

#[tokio::test]
async fn test_failing_run_terminates_with_empty_store() {
    let dir = TempDir::new().expect("Failed to create temp directory");
    let settings = test_settings(dir.path(), vec!["Portland,ME,US"], 2);
    settings.storage.ensure_directories().unwrap();
    let reports_dir = settings.storage.reports_dir.clone();

    let mut collector = Collector::new(settings, Box::new(AlwaysFails));
    collector.run(None).await.unwrap();

    let stats = collector.stats();
    assert_eq!(stats.total_requests, 2);
    assert_eq!(stats.successful_requests, 0);
    assert_eq!(stats.failed_requests, 2);
    assert!(collector.store().is_empty());
    assert_eq!(stats.overall_quality_score(), 0.0);
    assert_eq!(stats.issues.len(), 2);

    // A run with zero data still reports.
    let report: Value = serde_json::from_str(
        &std::fs::read_to_string(reports_dir.join("quality_report.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(report["summary"]["overall_quality_score"], 0.0);
    assert_eq!(report["completeness_analysis"]["status"], "no data");

    let recommendations: Vec<String> =
        serde_json::from_value(report["recommendations"].clone()).unwrap();
    assert!(recommendations.iter().any(|r| r.contains("Increase delay")));
    assert!(recommendations
        .iter()
        .any(|r| r.contains("Extend collection")));
}

#[tokio::test]
async fn test_null_reading_invalidates_every_batch() {
    let dir = TempDir::new().expect("Failed to create temp directory");
    let settings = test_settings(dir.path(), vec!["Portland,ME,US"], 2);
    settings.storage.ensure_directories().unwrap();

    let mut collector = Collector::new(settings, Box::new(NullTemperature));
    collector.run(None).await.unwrap();

    let stats = collector.stats();
    // Fetches succeed, but validation keeps incomplete batches out.
    assert_eq!(stats.successful_requests, 2);
    assert!(collector.store().is_empty());
    assert!(stats.issues.is_empty());
}

#[tokio::test]
async fn test_malformed_payload_is_recorded_and_skipped() {
    let dir = TempDir::new().expect("Failed to create temp directory");
    let settings = test_settings(dir.path(), vec!["Portland,ME,US"], 2);
    settings.storage.ensure_directories().unwrap();

    let mut collector = Collector::new(settings, Box::new(MissingMain));
    collector.run(None).await.unwrap();

    let stats = collector.stats();
    assert_eq!(stats.successful_requests, 2);
    assert!(collector.store().is_empty());
    // One dropped-payload issue per batch.
    assert_eq!(stats.issues.len(), 2);
    assert_eq!(stats.issues[0].city.as_deref(), Some("Portland,ME,US"));
}

#[tokio::test]
async fn test_partial_city_failure_still_stores_the_rest() {
    struct FailsForBoston;

    #[async_trait]
    impl WeatherApi for FailsForBoston {
        async fn fetch_city(&self, city: &str) -> Result<Value, FetchError> {
            if city.starts_with("Boston") {
                return Err(FetchError::Request {
                    city: city.to_string(),
                    message: "connection reset".to_string(),
                });
            }
            Ok(json!({
                "name": city,
                "main": {"temp": 12.0, "humidity": 70},
                "weather": [{"description": "overcast clouds"}]
            }))
        }
    }

    let dir = TempDir::new().expect("Failed to create temp directory");
    let settings = test_settings(dir.path(), vec!["Portland,ME,US", "Boston,MA,US"], 1);
    settings.storage.ensure_directories().unwrap();

    let mut collector = Collector::new(settings, Box::new(FailsForBoston));
    collector.run(None).await.unwrap();

    let stats = collector.stats();
    assert_eq!(stats.total_requests, 1);
    assert_eq!(stats.successful_requests, 1);
    assert_eq!(stats.failed_requests, 1);
    // The surviving city's record was complete, so the batch stored.
    assert_eq!(collector.store().len(), 1);
    assert_eq!(collector.store().records()[0].city, "Portland,ME,US");
}
