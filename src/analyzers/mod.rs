pub mod quality_analyzer;

pub use quality_analyzer::{
    CompletenessAnalysis, QualityAnalyzer, QualityReport, ReportSummary, TemperatureDistribution,
};
