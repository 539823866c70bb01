use std::path::PathBuf;

use crate::analyzers::{CompletenessAnalysis, QualityAnalyzer};
use crate::cli::args::{Cli, Commands};
use crate::collector::Collector;
use crate::error::{CollectorError, Result};
use crate::fetchers::OpenWeatherClient;
use crate::models::WeatherRecord;
use crate::settings::{EnvSecrets, Settings};
use crate::utils::logging::init_logging;
use crate::utils::progress::ProgressReporter;

pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Collect {
            config,
            max_requests,
            silent,
        } => collect(config, max_requests, silent, cli.verbose).await,

        Commands::CheckConfig { config } => check_config(&config),

        Commands::Info { file, sample } => info(&file, sample),
    }
}

async fn collect(
    config: PathBuf,
    max_requests: Option<u32>,
    silent: bool,
    verbose: bool,
) -> Result<()> {
    dotenvy::dotenv().ok();

    let mut settings = Settings::load(&config, &EnvSecrets)?;
    if let Some(n) = max_requests {
        settings.collection.max_requests = n;
    }

    init_logging(&settings.logging, verbose)?;
    settings.storage.ensure_directories()?;

    println!("Collecting weather data...");
    println!("Cities: {}", settings.api.cities.join(", "));
    println!("Request budget: {}", settings.collection.max_requests);

    let api = OpenWeatherClient::new(&settings.api)?;
    let progress = ProgressReporter::new(
        u64::from(settings.collection.max_requests),
        "Collecting weather data...",
        silent,
    );

    let reports_dir = settings.storage.reports_dir.clone();
    let mut collector = Collector::new(settings, Box::new(api));
    collector.run(Some(&progress)).await?;
    progress.finish_with_message("Collection complete");

    let stats = collector.stats();
    println!("\nCollection summary:");
    println!("  Batches run: {}", stats.total_requests);
    println!("  Successful city fetches: {}", stats.successful_requests);
    println!("  Failed city fetches: {}", stats.failed_requests);
    println!("  Success rate: {:.2}", stats.success_rate());
    println!("  Stored records: {}", collector.store().len());
    println!(
        "  Overall quality score: {:.3}",
        stats.overall_quality_score()
    );
    println!("\nReports written to {}", reports_dir.display());

    if stats.failed_requests == 0 {
        println!("✅ All city fetches succeeded");
    } else {
        println!(
            "⚠️  {} city fetches failed - see the quality report",
            stats.failed_requests
        );
    }

    Ok(())
}

fn check_config(config: &std::path::Path) -> Result<()> {
    dotenvy::dotenv().ok();

    let settings = Settings::load(config, &EnvSecrets)?;

    println!("✅ {} is valid", config.display());
    println!("  API URL: {}", settings.api.api_url);
    println!("  Cities: {}", settings.api.cities.join(", "));
    println!(
        "  API key: resolved from {} ({} chars)",
        settings.api.api_key_env_var,
        settings.api.api_key.len()
    );
    println!("  Base delay: {}s", settings.collection.base_delay);
    println!("  Request budget: {}", settings.collection.max_requests);

    Ok(())
}

fn info(file: &std::path::Path, sample: usize) -> Result<()> {
    let body = std::fs::read_to_string(file)?;
    let records: Vec<WeatherRecord> =
        serde_json::from_str(&body).map_err(|e| CollectorError::InvalidSnapshot {
            path: file.to_path_buf(),
            message: e.to_string(),
        })?;

    println!("Analyzing snapshot: {}", file.display());
    println!("Total records: {}", records.len());

    let analyzer = QualityAnalyzer::new();

    match analyzer.analyze_completeness(&records) {
        CompletenessAnalysis::NoData { status } => println!("Completeness: {}", status),
        CompletenessAnalysis::Analysis {
            missing_values,
            completeness_rate,
        } => println!(
            "Completeness: {:.0}% ({} missing temperature values)",
            completeness_rate * 100.0,
            missing_values
        ),
    }

    if let Some(dist) = analyzer.analyze_distribution(&records) {
        println!(
            "Temperature: min {:.1} C, max {:.1} C, avg {:.1} C",
            dist.min_temp, dist.max_temp, dist.avg_temp
        );
    }

    let anomalies = analyzer.detect_anomalies(&records);
    if anomalies.is_empty() {
        println!("✅ No anomalous temperatures");
    } else {
        println!("⚠️  Found {} anomalous records", anomalies.len());
        for record in &anomalies {
            println!(
                "  {} at {}: {:.1} C",
                record.city,
                record.timestamp,
                record.temperature.unwrap_or_default()
            );
        }
    }

    if sample > 0 && !records.is_empty() {
        println!("\nSample records (showing up to {}):", sample);
        for (i, record) in records.iter().take(sample).enumerate() {
            let temp = record
                .temperature
                .map_or_else(|| "-".to_string(), |t| format!("{:.1} C", t));
            let humidity = record
                .humidity
                .map_or_else(|| "-".to_string(), |h| format!("{:.0}%", h));
            println!(
                "{}. {} on {}: {}, {} ({})",
                i + 1,
                record.city,
                record.timestamp.format("%Y-%m-%d %H:%M:%S"),
                temp,
                humidity,
                record.weather
            );
        }
    }

    Ok(())
}
