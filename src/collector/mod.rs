pub mod strategy;

pub use strategy::AdaptiveDelay;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::analyzers::QualityAnalyzer;
use crate::error::Result;
use crate::fetchers::WeatherApi;
use crate::models::{CollectionStats, DataStore, WeatherRecord};
use crate::processors::BatchProcessor;
use crate::settings::Settings;
use crate::utils::constants::{SNAPSHOT_FILE, STRATEGY_REVIEW_RATE};
use crate::utils::progress::ProgressReporter;
use crate::writers::{ReportWriter, SnapshotWriter};

/// The collection loop state machine.
///
/// Each iteration: assess quality, review the strategy when the success
/// rate is degrading, fetch one batch, process and validate it, store it
/// if it survived, then wait the jittered delay. The loop runs until the
/// batch budget is exhausted (data failures never terminate it) and then
/// produces the final reports exactly once.
///
/// Strictly sequential: one in-flight request, no spawned tasks. The
/// collector is the single writer of all mutable run state.
pub struct Collector {
    settings: Settings,
    api: Box<dyn WeatherApi>,
    processor: BatchProcessor,
    analyzer: QualityAnalyzer,
    strategy: AdaptiveDelay,
    snapshot: SnapshotWriter,
    store: DataStore,
    stats: CollectionStats,
}

impl Collector {
    pub fn new(settings: Settings, api: Box<dyn WeatherApi>) -> Self {
        let strategy = AdaptiveDelay::new(settings.collection.base_delay);
        let snapshot = SnapshotWriter::new(settings.storage.raw_dir().join(SNAPSHOT_FILE));

        Self {
            settings,
            api,
            processor: BatchProcessor::new(),
            analyzer: QualityAnalyzer::new(),
            strategy,
            snapshot,
            store: DataStore::new(),
            stats: CollectionStats::new(),
        }
    }

    pub fn stats(&self) -> &CollectionStats {
        &self.stats
    }

    pub fn store(&self) -> &DataStore {
        &self.store
    }

    /// Run the collection loop to completion, then write the final
    /// reports. The only errors that escape are storage and reporting
    /// I/O; fetch and processing failures are absorbed as statistics.
    pub async fn run(&mut self, progress: Option<&ProgressReporter>) -> Result<()> {
        info!(
            cities = self.settings.api.cities.len(),
            max_requests = self.settings.collection.max_requests,
            "starting collection loop"
        );

        while !self.collection_complete() {
            self.analyzer.assess(self.store.records(), &mut self.stats);

            let rate = self.stats.success_rate();
            if rate < STRATEGY_REVIEW_RATE {
                self.strategy.adjust(rate);
            }

            let payloads = self.fetch_batch().await;
            if !payloads.is_empty() {
                let records = self.processor.process(&payloads, &mut self.stats);
                if BatchProcessor::validate(&records) {
                    self.store_batch(records)?;
                } else {
                    debug!("batch failed validation, nothing stored this iteration");
                }
            }

            if let Some(p) = progress {
                p.update(u64::from(self.stats.total_requests));
            }

            self.respectful_delay().await;
        }

        self.finalize()
    }

    /// The batch budget is checked only at iteration boundaries, so a run
    /// can overshoot the target by at most one batch and never stops
    /// mid-batch.
    fn collection_complete(&self) -> bool {
        self.stats.total_requests >= self.settings.collection.max_requests
    }

    /// One batch: a single sequential pass over the configured cities.
    /// Counts one request for the batch and one success or failure per
    /// city; city failures are isolated and never abort the pass.
    async fn fetch_batch(&mut self) -> Vec<Value> {
        self.stats.record_batch();

        let Self {
            api,
            settings,
            stats,
            ..
        } = self;

        let mut payloads = Vec::new();
        for city in &settings.api.cities {
            match api.fetch_city(city).await {
                Ok(payload) => {
                    stats.record_success();
                    payloads.push(payload);
                }
                Err(e) => {
                    warn!(city = city.as_str(), error = %e, "API request failed");
                    stats.record_failure(city, e.to_string());
                }
            }
        }

        payloads
    }

    /// Append the validated batch and overwrite the snapshot so the
    /// persisted file reflects the in-memory store exactly.
    fn store_batch(&mut self, records: Vec<WeatherRecord>) -> Result<()> {
        debug!(count = records.len(), "storing validated batch");
        self.store.extend(records);
        self.snapshot.write(self.store.records())
    }

    async fn respectful_delay(&self) {
        let delay = self.strategy.next_delay();
        debug!(seconds = delay.as_secs_f64(), "waiting before next iteration");
        tokio::time::sleep(delay).await;
    }

    /// Final reporting, run exactly once after the loop terminates: the
    /// snapshot is serialized one last time, then metadata and the quality
    /// report in every format.
    fn finalize(&self) -> Result<()> {
        info!(
            records = self.store.len(),
            success_rate = self.stats.success_rate(),
            "collection complete, generating reports"
        );

        self.snapshot.write(self.store.records())?;

        let report = self.analyzer.build_report(self.store.records(), &self.stats);
        let writer = ReportWriter::new(&self.settings.storage);
        writer.write_metadata(self.store.records(), &self.stats, &self.settings.api.api_url)?;
        writer.write_quality_report(&report)?;

        Ok(())
    }
}
