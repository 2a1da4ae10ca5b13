//! DevStats - Coding-Profile Stats Aggregator
//!
//! A CLI tool that fetches a developer's public stats from GitHub and
//! competitive-programming platforms concurrently and renders them as a
//! single report. Unreachable sources degrade to cached snapshot values.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (bad config, unwritable output, etc.)
//!   2 - A source fell back and --fail-on-fallback was set

mod cli;
mod config;
mod fallback;
mod models;
mod providers;
mod report;
mod service;
mod store;

use anyhow::{bail, Context, Result};
use cli::{Args, OutputFormat};
use config::Config;
use indicatif::{ProgressBar, ProgressStyle};
use report::StatsReport;
use service::StatsService;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Initialize logging
    init_logging(&args);

    info!("DevStats v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    // Run the aggregation
    match run(args).await {
        Ok(exit_code) => {
            std::process::exit(exit_code);
        }
        Err(e) => {
            error!("Run failed: {}", e);
            eprintln!("\n❌ Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .devstats.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(".devstats.toml");

    if path.exists() {
        eprintln!("⚠️  .devstats.toml already exists. Remove it first or edit it manually.");
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content).context("Failed to write .devstats.toml")?;

    println!("✅ Created .devstats.toml with default settings.");
    println!("   Edit it to set your platform handles and endpoints.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Run the complete aggregation workflow. Returns exit code (0 or 2).
async fn run(args: Args) -> Result<i32> {
    let start_time = Instant::now();

    // Load configuration
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);

    let github_handle = config.profiles.github.clone();
    if github_handle.is_empty() && !args.offline {
        bail!("No GitHub handle given. Use --github, GITHUB_HANDLE, or .devstats.toml");
    }

    // Step 1: Start the service (all sources fetch concurrently)
    let service = if args.offline {
        println!("📴 Offline mode: rendering cached snapshot values");
        StatsService::offline()
    } else {
        println!("📡 Fetching stats for: {}", github_handle);
        StatsService::start(&config)?
    };

    // Step 2: Wait for every source to settle, with a progress spinner
    let spinner = spawn_spinner(&args, &service);

    let store = service.wait_settled().await;

    if let Some(handle) = spinner {
        let _ = handle.await;
    }

    let duration = start_time.elapsed().as_secs_f64();
    info!("All sources settled in {:.1}s", duration);

    // Step 3: Build the report
    let snapshot = store.snapshot();
    let stats_report = StatsReport::from_snapshot(
        &snapshot,
        config.report.title.clone(),
        github_handle,
        duration,
    );

    // Step 4: Render and emit
    let output = match args.format {
        OutputFormat::Markdown => report::generate_markdown_report(&stats_report),
        OutputFormat::Json => report::generate_json_report(&stats_report)?,
        OutputFormat::Text => report::generate_text_report(&stats_report),
    };

    if args.stdout || args.format == OutputFormat::Text {
        println!("\n{}", output);
    } else {
        let path = std::path::Path::new(&config.report.output);
        std::fs::write(path, &output)
            .with_context(|| format!("Failed to write report to {}", path.display()))?;

        if !args.quiet {
            println!("\n{}", report::generate_text_report(&stats_report));
        }
        println!("\n✅ Report saved to: {}", path.display());
    }

    // Check --fail-on-fallback
    if args.fail_on_fallback && stats_report.has_fallbacks() {
        eprintln!(
            "\n⛔ {} source(s) fell back to cached snapshots. Failing (exit code 2).",
            stats_report.metadata.sources_fallback
        );
        return Ok(2);
    }

    Ok(0)
}

/// Spawn a spinner that tracks settled sources, unless quiet/offline.
fn spawn_spinner(args: &Args, service: &StatsService) -> Option<tokio::task::JoinHandle<()>> {
    if args.quiet || args.offline {
        return None;
    }

    let mut observer = service.subscribe();

    Some(tokio::spawn(async move {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        spinner.enable_steady_tick(Duration::from_millis(100));

        loop {
            let (settled, total) = {
                let snapshot = observer.borrow();
                let settled = snapshot.values().filter(|s| s.is_terminal()).count();
                (settled, snapshot.len())
            };

            spinner.set_message(format!("Fetching stats... {}/{} sources", settled, total));

            if settled == total || observer.changed().await.is_err() {
                break;
            }
        }

        spinner.finish_and_clear();
    }))
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from .devstats.toml");
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {}", e);
            Ok(Config::default())
        }
    }
}
