/// Anomaly bounds (Celsius, strict inequalities)
pub const ANOMALY_MIN_TEMP: f64 = -40.0;
pub const ANOMALY_MAX_TEMP: f64 = 50.0;

/// Success-rate thresholds for the adaptive strategy
pub const STRATEGY_REVIEW_RATE: f64 = 0.8;
pub const SLOWDOWN_SUCCESS_RATE: f64 = 0.5;
pub const SPEEDUP_SUCCESS_RATE: f64 = 0.9;

/// Delay multiplier adjustment factors
pub const SLOWDOWN_FACTOR: f64 = 2.0;
pub const SPEEDUP_FACTOR: f64 = 0.8;

/// Jitter applied to every inter-iteration delay
pub const JITTER_MIN: f64 = 0.5;
pub const JITTER_MAX: f64 = 1.5;

/// Reporting thresholds
pub const MIN_RECOMMENDED_RECORDS: usize = 10;

/// Collection defaults
pub const DEFAULT_BASE_DELAY_SECS: f64 = 1.0;
pub const DEFAULT_MAX_REQUESTS: u32 = 10;
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Artifact file names
pub const SNAPSHOT_FILE: &str = "collected_data.json";
pub const METADATA_FILE: &str = "dataset_metadata.json";
pub const QUALITY_REPORT_JSON: &str = "quality_report.json";
pub const QUALITY_REPORT_TEXT: &str = "quality_report.txt";
pub const QUALITY_REPORT_HTML: &str = "quality_report.html";
pub const SUMMARY_PDF: &str = "collection_summary.pdf";

/// Directory names under the data root
pub const RAW_DIR: &str = "raw";
pub const METADATA_DIR: &str = "metadata";
