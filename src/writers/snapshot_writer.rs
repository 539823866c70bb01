use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::models::WeatherRecord;

/// Persists the full record sequence as a single JSON snapshot.
///
/// Every write replaces the previous file wholesale, so after a
/// successful call the file reflects the in-memory store exactly. There
/// is no crash-durability guarantee: a write interrupted mid-way leaves a
/// torn file until the next batch lands.
pub struct SnapshotWriter {
    path: PathBuf,
}

impl SnapshotWriter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn write(&self, records: &[WeatherRecord]) -> Result<()> {
        let file = File::create(&self.path)?;
        serde_json::to_writer_pretty(BufWriter::new(file), records)?;
        Ok(())
    }
}
