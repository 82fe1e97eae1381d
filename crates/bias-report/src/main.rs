use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use bias_engine::{BiasEngine, EngineConfig, EvaluationCycle, ProfileSet};
use chrono::Utc;

mod bundle;
mod render;

use bundle::{FileFeeds, SnapshotBundle};
use render::{render, OutputFormat};

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(|s| s.as_str())
}

fn usage() -> ! {
    eprintln!("Usage:");
    eprintln!("  bias-report --snapshot <bundle.json> [--format json|table] [--profiles rich|simple|all]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --format     Output format (default: table)");
    eprintln!("  --profiles   Profile set to evaluate (default: all)");
    std::process::exit(1);
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let json_logging = std::env::var("RUST_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    // Logs go to stderr so stdout carries only the report
    if json_logging {
        tracing_subscriber::fmt()
            .json()
            .with_writer(std::io::stderr)
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
            )
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
            )
            .init();
    }

    let args: Vec<String> = std::env::args().collect();
    if args.iter().any(|a| a == "--help" || a == "-h") {
        usage();
    }
    let Some(snapshot_path) = flag_value(&args, "--snapshot").map(PathBuf::from) else {
        usage();
    };
    let format: OutputFormat = flag_value(&args, "--format")
        .unwrap_or("table")
        .parse()
        .map_err(anyhow::Error::msg)?;
    let profiles: ProfileSet = flag_value(&args, "--profiles")
        .unwrap_or("all")
        .parse()
        .map_err(anyhow::Error::msg)?;

    let config = EngineConfig::from_env().context("Invalid engine configuration")?;
    tracing::info!(
        "Config: macro window ±{}d, {} breadth names, news lookback {}h",
        config.macro_window_days,
        config.breadth_basket.len(),
        config.news_lookback_hours
    );

    let bundle = SnapshotBundle::load(&snapshot_path)?;
    let as_of = bundle.as_of.unwrap_or_else(Utc::now);

    let engine = BiasEngine::from_config(&config, profiles);
    let cycle = EvaluationCycle::new(Arc::new(FileFeeds::new(bundle)), config, engine);
    let results = cycle.run(as_of).await;

    println!("{}", render(&results, format)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bias_core::BiasLabel;

    #[test]
    fn test_flag_value() {
        let args: Vec<String> = ["bias-report", "--snapshot", "b.json", "--format"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(flag_value(&args, "--snapshot"), Some("b.json"));
        assert_eq!(flag_value(&args, "--format"), None);
        assert_eq!(flag_value(&args, "--profiles"), None);
    }

    #[tokio::test]
    async fn test_sample_bundle_report() {
        let bundle: SnapshotBundle =
            serde_json::from_str(include_str!("../fixtures/sample_bundle.json")).unwrap();
        let as_of = bundle.as_of.unwrap();
        let config = EngineConfig::default();
        let engine = BiasEngine::from_config(&config, ProfileSet::All);
        let cycle = EvaluationCycle::new(Arc::new(FileFeeds::new(bundle)), config, engine);

        let results = cycle.run(as_of).await;
        assert_eq!(results.len(), 4);

        // positioning 1.5, QQQ +1, put/call 0.83 neutral, breadth +2, macro -1
        let nasdaq = &results[0];
        assert!((nasdaq.composite_score - 0.675).abs() < 1e-9);
        assert_eq!(nasdaq.label, BiasLabel::MildBullish);
        assert_eq!(nasdaq.available_signals(), 5);

        let table = render(&results, OutputFormat::Table).unwrap();
        assert!(table.contains("Nasdaq 100 [nasdaq-rich]"));
        assert!(table.contains("inflation signal not implemented"));
    }
}
