pub mod report_writer;
pub mod snapshot_writer;

pub use report_writer::{DatasetMetadata, ReportWriter};
pub use snapshot_writer::SnapshotWriter;
