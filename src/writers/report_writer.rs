use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::analyzers::{CompletenessAnalysis, QualityReport};
use crate::error::Result;
use crate::models::{CollectionStats, WeatherRecord};
use crate::settings::StorageSettings;
use crate::utils::constants::{
    METADATA_FILE, QUALITY_REPORT_HTML, QUALITY_REPORT_JSON, QUALITY_REPORT_TEXT, SUMMARY_PDF,
};

/// Dataset metadata document written alongside the snapshot.
#[derive(Debug, Serialize)]
pub struct DatasetMetadata {
    pub collection_info: CollectionInfo,
    pub data_sources: Vec<String>,
    pub quality_metrics: QualityMetrics,
    pub processing_history: Vec<String>,
    pub variables: VariableGlossary,
}

#[derive(Debug, Serialize)]
pub struct CollectionInfo {
    pub collection_date: DateTime<Utc>,
    pub collector_version: String,
    pub total_records: usize,
}

#[derive(Debug, Serialize)]
pub struct QualityMetrics {
    pub average_score: f64,
    pub num_checks: usize,
}

#[derive(Debug, Serialize)]
pub struct VariableGlossary {
    pub time: &'static str,
    pub city: &'static str,
    pub temperature: &'static str,
    pub humidity: &'static str,
    pub weather: &'static str,
}

impl Default for VariableGlossary {
    fn default() -> Self {
        Self {
            time: "ISO timestamp when data was collected",
            city: "Name of the city",
            temperature: "Air temperature in Celsius",
            humidity: "Relative humidity (%)",
            weather: "Short description of weather conditions",
        }
    }
}

/// Renders final statistics and records into the persisted report
/// artifacts: metadata JSON, quality report (JSON, text, HTML) and a
/// one-page PDF summary.
pub struct ReportWriter {
    metadata_dir: PathBuf,
    reports_dir: PathBuf,
}

impl ReportWriter {
    pub fn new(storage: &StorageSettings) -> Self {
        Self {
            metadata_dir: storage.metadata_dir(),
            reports_dir: storage.reports_dir.clone(),
        }
    }

    pub fn write_metadata(
        &self,
        records: &[WeatherRecord],
        stats: &CollectionStats,
        api_url: &str,
    ) -> Result<PathBuf> {
        let metadata = DatasetMetadata {
            collection_info: CollectionInfo {
                collection_date: Utc::now(),
                collector_version: env!("CARGO_PKG_VERSION").to_string(),
                total_records: records.len(),
            },
            data_sources: vec![api_url.to_string()],
            quality_metrics: QualityMetrics {
                average_score: stats.overall_quality_score(),
                num_checks: stats.quality_scores.len(),
            },
            processing_history: vec![
                "collected data".to_string(),
                "validated data".to_string(),
                "stored raw JSON".to_string(),
            ],
            variables: VariableGlossary::default(),
        };

        let path = self.metadata_dir.join(METADATA_FILE);
        fs::write(&path, serde_json::to_string_pretty(&metadata)?)?;
        info!(path = %path.display(), "metadata saved");
        Ok(path)
    }

    /// Write the quality report in every output format.
    pub fn write_quality_report(&self, report: &QualityReport) -> Result<()> {
        fs::write(
            self.reports_dir.join(QUALITY_REPORT_JSON),
            serde_json::to_string_pretty(report)?,
        )?;
        fs::write(
            self.reports_dir.join(QUALITY_REPORT_TEXT),
            Self::render_text(report),
        )?;
        fs::write(
            self.reports_dir.join(QUALITY_REPORT_HTML),
            Self::render_html(report),
        )?;
        fs::write(
            self.reports_dir.join(SUMMARY_PDF),
            Self::render_pdf(report),
        )?;

        info!(dir = %self.reports_dir.display(), "quality report generated");
        Ok(())
    }

    fn summary_lines(report: &QualityReport) -> Vec<String> {
        vec![
            format!("total_records: {}", report.summary.total_records),
            format!(
                "collection_success_rate: {:.2}",
                report.summary.collection_success_rate
            ),
            format!(
                "overall_quality_score: {:.3}",
                report.summary.overall_quality_score
            ),
        ]
    }

    pub fn render_text(report: &QualityReport) -> String {
        let mut out = String::new();
        out.push_str("Quality Report\n");
        out.push_str(&"=".repeat(40));
        out.push_str("\n\n");

        for line in Self::summary_lines(report) {
            out.push_str(&line);
            out.push('\n');
        }

        match &report.completeness_analysis {
            CompletenessAnalysis::NoData { status } => {
                out.push_str(&format!("completeness: {}\n", status));
            }
            CompletenessAnalysis::Analysis {
                missing_values,
                completeness_rate,
            } => {
                out.push_str(&format!(
                    "missing_values: {}\ncompleteness_rate: {:.2}\n",
                    missing_values, completeness_rate
                ));
            }
        }

        if let Some(dist) = &report.data_distribution {
            out.push_str(&format!(
                "temperature: min {:.1} C, max {:.1} C, avg {:.1} C\n",
                dist.min_temp, dist.max_temp, dist.avg_temp
            ));
        }

        out.push_str(&format!("anomalies: {}\n", report.anomaly_detection.len()));
        out.push_str(&format!("issues: {}\n", report.issues.len()));

        out.push_str("\nRecommendations:\n");
        for rec in &report.recommendations {
            out.push_str(&format!("- {}\n", rec));
        }

        out
    }

    pub fn render_html(report: &QualityReport) -> String {
        let mut rows = String::new();
        for line in Self::summary_lines(report) {
            if let Some((key, value)) = line.split_once(": ") {
                rows.push_str(&format!(
                    "      <tr><td>{}</td><td>{}</td></tr>\n",
                    key, value
                ));
            }
        }

        let mut recs = String::new();
        for rec in &report.recommendations {
            recs.push_str(&format!("      <li>{}</li>\n", rec));
        }

        let mut anomalies = String::new();
        if !report.anomaly_detection.is_empty() {
            anomalies.push_str("    <h2>Anomalies</h2>\n    <ul>\n");
            for record in &report.anomaly_detection {
                anomalies.push_str(&format!(
                    "      <li>{}: {:.1} C at {}</li>\n",
                    record.city,
                    record.temperature.unwrap_or_default(),
                    record.timestamp.to_rfc3339()
                ));
            }
            anomalies.push_str("    </ul>\n");
        }

        format!(
            "<!DOCTYPE html>\n<html>\n<head>\n  <meta charset=\"utf-8\">\n  \
             <title>Quality Report</title>\n</head>\n<body>\n    <h1>Quality Report</h1>\n    \
             <table>\n{rows}    </table>\n{anomalies}    <h2>Recommendations</h2>\n    \
             <ul>\n{recs}    </ul>\n</body>\n</html>\n"
        )
    }

    /// Minimal single-page PDF, assembled by hand: one Helvetica text
    /// block with the summary lines and recommendations. Placeholder
    /// artifact, kept deliberately small.
    pub fn render_pdf(report: &QualityReport) -> Vec<u8> {
        let mut lines = vec!["Collection Summary".to_string(), String::new()];
        lines.extend(Self::summary_lines(report));
        lines.push(String::new());
        lines.push("Recommendations:".to_string());
        for rec in &report.recommendations {
            lines.push(format!("- {}", rec));
        }

        let mut content = String::from("BT\n/F1 12 Tf\n72 760 Td\n14 TL\n");
        for line in &lines {
            let escaped = line
                .replace('\\', "\\\\")
                .replace('(', "\\(")
                .replace(')', "\\)");
            content.push_str(&format!("({}) Tj\nT*\n", escaped));
        }
        content.push_str("ET\n");

        let objects = [
            "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
            "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
             /Contents 4 0 R /Resources << /Font << /F1 5 0 R >> >> >>"
                .to_string(),
            format!(
                "<< /Length {} >>\nstream\n{}endstream",
                content.len(),
                content
            ),
            "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>".to_string(),
        ];

        let mut out = String::from("%PDF-1.4\n");
        let mut offsets = Vec::with_capacity(objects.len());
        for (i, object) in objects.iter().enumerate() {
            offsets.push(out.len());
            out.push_str(&format!("{} 0 obj\n{}\nendobj\n", i + 1, object));
        }

        let xref_pos = out.len();
        out.push_str(&format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1));
        for offset in offsets {
            out.push_str(&format!("{:010} 00000 n \n", offset));
        }
        out.push_str(&format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
            objects.len() + 1,
            xref_pos
        ));

        out.into_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::QualityAnalyzer;
    use crate::models::CollectionStats;

    fn sample_report() -> QualityReport {
        let mut stats = CollectionStats::new();
        stats.record_batch();
        stats.record_success();
        let records = vec![WeatherRecord::new(
            "Portland,ME,US".to_string(),
            Some(20.0),
            Some(60.0),
            "clear sky".to_string(),
        )];
        let analyzer = QualityAnalyzer::new();
        analyzer.build_report(&records, &stats)
    }

    #[test]
    fn test_all_report_formats_are_written() {
        let dir = tempfile::tempdir().unwrap();
        let storage = StorageSettings {
            data_dir: dir.path().join("data"),
            reports_dir: dir.path().join("reports"),
        };
        storage.ensure_directories().unwrap();

        let writer = ReportWriter::new(&storage);
        let report = sample_report();
        writer.write_quality_report(&report).unwrap();

        for name in [
            QUALITY_REPORT_JSON,
            QUALITY_REPORT_TEXT,
            QUALITY_REPORT_HTML,
            SUMMARY_PDF,
        ] {
            assert!(storage.reports_dir.join(name).exists(), "{} missing", name);
        }

        let json = std::fs::read_to_string(storage.reports_dir.join(QUALITY_REPORT_JSON)).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["summary"]["total_records"], 1);
    }

    #[test]
    fn test_metadata_document_shape() {
        let dir = tempfile::tempdir().unwrap();
        let storage = StorageSettings {
            data_dir: dir.path().join("data"),
            reports_dir: dir.path().join("reports"),
        };
        storage.ensure_directories().unwrap();

        let mut stats = CollectionStats::new();
        stats.record_quality_score(1.0);
        let records = vec![];

        let writer = ReportWriter::new(&storage);
        let path = writer
            .write_metadata(&records, &stats, "https://api.openweathermap.org/data/2.5/weather")
            .unwrap();

        let parsed: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(parsed["collection_info"]["total_records"], 0);
        assert_eq!(parsed["quality_metrics"]["average_score"], 1.0);
        assert_eq!(parsed["quality_metrics"]["num_checks"], 1);
        assert!(parsed["variables"]["temperature"]
            .as_str()
            .unwrap()
            .contains("Celsius"));
    }

    #[test]
    fn test_text_render_contains_summary_and_recommendations() {
        let report = sample_report();
        let text = ReportWriter::render_text(&report);

        assert!(text.starts_with("Quality Report\n"));
        assert!(text.contains("total_records: 1"));
        assert!(text.contains("Recommendations:"));
        assert!(text.contains("- Extend collection time"));
    }

    #[test]
    fn test_pdf_has_header_and_trailer() {
        let bytes = ReportWriter::render_pdf(&sample_report());
        let body = String::from_utf8(bytes).unwrap();

        assert!(body.starts_with("%PDF-1.4"));
        assert!(body.ends_with("%%EOF\n"));
        assert!(body.contains("Collection Summary"));
    }
}
