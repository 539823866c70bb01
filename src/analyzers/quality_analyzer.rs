use serde::Serialize;

use crate::models::{CollectionIssue, CollectionStats, WeatherRecord};
use crate::utils::constants::{MIN_RECOMMENDED_RECORDS, STRATEGY_REVIEW_RATE};

/// Derived quality analyses over the collected records.
///
/// The per-iteration quality score is a deliberately simplified composite:
/// consistency, accuracy and timeliness are fixed sub-scores of 1.0, and
/// only completeness is measured (binary, on temperature presence). The
/// blend is equal-weighted across the four.
pub struct QualityAnalyzer;

#[derive(Debug, Clone, Serialize)]
pub struct QualityReport {
    pub summary: ReportSummary,
    pub completeness_analysis: CompletenessAnalysis,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_distribution: Option<TemperatureDistribution>,
    pub anomaly_detection: Vec<WeatherRecord>,
    pub issues: Vec<CollectionIssue>,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportSummary {
    pub total_records: usize,
    pub collection_success_rate: f64,
    pub overall_quality_score: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum CompletenessAnalysis {
    NoData {
        status: String,
    },
    Analysis {
        missing_values: usize,
        completeness_rate: f64,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct TemperatureDistribution {
    pub min_temp: f64,
    pub max_temp: f64,
    pub avg_temp: f64,
}

impl QualityAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Score the current store and append the score to the history.
    ///
    /// An empty store scores 0.0 and is not recorded; the score history
    /// only tracks assessments of actual data.
    pub fn assess(&self, records: &[WeatherRecord], stats: &mut CollectionStats) -> f64 {
        if records.is_empty() {
            return 0.0;
        }

        let completeness = if records.iter().all(WeatherRecord::has_temperature) {
            1.0
        } else {
            0.5
        };
        let consistency = 1.0;
        let accuracy = 1.0;
        let timeliness = 1.0;

        let score = (completeness + consistency + accuracy + timeliness) / 4.0;
        stats.record_quality_score(score);
        score
    }

    pub fn analyze_completeness(&self, records: &[WeatherRecord]) -> CompletenessAnalysis {
        if records.is_empty() {
            return CompletenessAnalysis::NoData {
                status: "no data".to_string(),
            };
        }

        let missing = records.iter().filter(|r| !r.has_temperature()).count();
        CompletenessAnalysis::Analysis {
            missing_values: missing,
            completeness_rate: 1.0 - missing as f64 / records.len() as f64,
        }
    }

    pub fn analyze_distribution(&self, records: &[WeatherRecord]) -> Option<TemperatureDistribution> {
        let temps: Vec<f64> = records.iter().filter_map(|r| r.temperature).collect();
        if temps.is_empty() {
            return None;
        }

        let min_temp = temps.iter().copied().fold(f64::INFINITY, f64::min);
        let max_temp = temps.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let avg_temp = temps.iter().sum::<f64>() / temps.len() as f64;

        Some(TemperatureDistribution {
            min_temp,
            max_temp,
            avg_temp,
        })
    }

    /// Records whose temperature falls strictly outside the plausible
    /// range. Boundary values are kept.
    pub fn detect_anomalies(&self, records: &[WeatherRecord]) -> Vec<WeatherRecord> {
        records
            .iter()
            .filter(|r| r.is_anomalous())
            .cloned()
            .collect()
    }

    pub fn recommendations(
        &self,
        records: &[WeatherRecord],
        stats: &CollectionStats,
    ) -> Vec<String> {
        let mut recs = Vec::new();

        if stats.success_rate() < STRATEGY_REVIEW_RATE {
            recs.push("Increase delay between requests or check API quota.".to_string());
        }
        if records.len() < MIN_RECOMMENDED_RECORDS {
            recs.push("Extend collection time to gather more data.".to_string());
        }
        if recs.is_empty() {
            recs.push("Collection successful with no major issues.".to_string());
        }

        recs
    }

    /// Assemble the full quality report consumed by the report writer.
    pub fn build_report(&self, records: &[WeatherRecord], stats: &CollectionStats) -> QualityReport {
        QualityReport {
            summary: ReportSummary {
                total_records: records.len(),
                collection_success_rate: stats.success_rate(),
                overall_quality_score: stats.overall_quality_score(),
            },
            completeness_analysis: self.analyze_completeness(records),
            data_distribution: self.analyze_distribution(records),
            anomaly_detection: self.detect_anomalies(records),
            issues: stats.issues.clone(),
            recommendations: self.recommendations(records, stats),
        }
    }
}

impl Default for QualityAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}
