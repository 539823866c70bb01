use chrono::{DateTime, Utc};
use serde::Serialize;

/// Running statistics for one collection session.
///
/// Single-writer: only the collection loop mutates this struct, threaded
/// by mutable reference; the reporter reads it once at the end of the run.
///
/// Counter units are intentionally asymmetric: `total_requests` counts
/// batch invocations (one per loop iteration) while `successful_requests`
/// and `failed_requests` count individual city fetches. `success_rate` is
/// therefore not a same-unit ratio. This mirrors the upstream collection
/// contract and must not be "fixed" here.
#[derive(Debug, Clone, Serialize)]
pub struct CollectionStats {
    pub start_time: DateTime<Utc>,
    pub total_requests: u32,
    pub successful_requests: u32,
    pub failed_requests: u32,
    pub quality_scores: Vec<f64>,
    pub issues: Vec<CollectionIssue>,
}

/// Where in the pipeline an issue was observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueStage {
    Fetch,
    Process,
}

/// One recoverable failure, kept for the final report.
#[derive(Debug, Clone, Serialize)]
pub struct CollectionIssue {
    pub timestamp: DateTime<Utc>,
    pub stage: IssueStage,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    pub message: String,
}

impl CollectionStats {
    pub fn new() -> Self {
        Self {
            start_time: Utc::now(),
            total_requests: 0,
            successful_requests: 0,
            failed_requests: 0,
            quality_scores: Vec::new(),
            issues: Vec::new(),
        }
    }

    /// One batch invocation started.
    pub fn record_batch(&mut self) {
        self.total_requests += 1;
    }

    /// One city fetch succeeded.
    pub fn record_success(&mut self) {
        self.successful_requests += 1;
    }

    /// One city fetch failed.
    pub fn record_failure(&mut self, city: &str, message: String) {
        self.failed_requests += 1;
        self.issues.push(CollectionIssue {
            timestamp: Utc::now(),
            stage: IssueStage::Fetch,
            city: Some(city.to_string()),
            message,
        });
    }

    /// One payload was dropped during processing.
    pub fn record_dropped_payload(&mut self, city: Option<String>, message: String) {
        self.issues.push(CollectionIssue {
            timestamp: Utc::now(),
            stage: IssueStage::Process,
            city,
            message,
        });
    }

    pub fn record_quality_score(&mut self, score: f64) {
        self.quality_scores.push(score);
    }

    /// Ratio of successful city fetches to batch invocations. Defined as
    /// 1.0 before any batch has run.
    pub fn success_rate(&self) -> f64 {
        if self.total_requests == 0 {
            return 1.0;
        }
        f64::from(self.successful_requests) / f64::from(self.total_requests)
    }

    /// Mean of the recorded quality scores, 0.0 when none were recorded.
    pub fn overall_quality_score(&self) -> f64 {
        if self.quality_scores.is_empty() {
            return 0.0;
        }
        self.quality_scores.iter().sum::<f64>() / self.quality_scores.len() as f64
    }
}

impl Default for CollectionStats {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_rate_with_no_requests_is_one() {
        let stats = CollectionStats::new();
        assert_eq!(stats.success_rate(), 1.0);
    }

    #[test]
    fn test_success_rate_counts_cities_against_batches() {
        let mut stats = CollectionStats::new();
        stats.record_batch();
        stats.record_success();
        stats.record_success();
        stats.record_failure("Albany,NY,US", "timeout".to_string());

        // 2 city successes over 1 batch: the unit mismatch is deliberate.
        assert_eq!(stats.success_rate(), 2.0);
        assert_eq!(stats.failed_requests, 1);
        assert_eq!(stats.issues.len(), 1);
        assert_eq!(stats.issues[0].stage, IssueStage::Fetch);
    }

    #[test]
    fn test_overall_quality_score() {
        let mut stats = CollectionStats::new();
        assert_eq!(stats.overall_quality_score(), 0.0);

        stats.record_quality_score(1.0);
        stats.record_quality_score(0.875);
        assert!((stats.overall_quality_score() - 0.9375).abs() < f64::EPSILON);
    }
}
