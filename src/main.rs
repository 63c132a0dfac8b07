//! AspectLens - Aspect Distribution Charts for Classified Reviews
//!
//! A CLI client that uploads a reviews text file (or a microphone
//! recording) to an aspect classification service, aggregates the
//! returned line-delimited labels, and renders the distribution as a
//! chart-style report.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (connection, config, recording failure, etc.)

mod analysis;
mod audio;
mod chart;
mod cli;
mod config;
mod models;
mod upload;

use anyhow::{Context, Result};
use chrono::Utc;
use cli::{Args, OutputFormat};
use config::Config;
use indicatif::{ProgressBar, ProgressStyle};
use models::{LabelSource, Report, ReportMetadata};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;
use upload::UploadClient;

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

    info!("AspectLens v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

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

/// Handle --init-config: generate a default .aspectlens.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(".aspectlens.toml");

    if path.exists() {
        eprintln!("⚠️  .aspectlens.toml already exists. Remove it first or edit it manually.");
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content).context("Failed to write .aspectlens.toml")?;

    println!("✅ Created .aspectlens.toml with default settings.");
    println!("   Edit it to customize the server endpoint and audio settings.");
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

/// Run the complete classify-and-chart workflow. Returns the exit code.
async fn run(args: Args) -> Result<i32> {
    let start_time = Instant::now();

    // Load configuration
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);

    // Step 1: Obtain the label stream
    let (label_text, metadata_seed) = obtain_labels(&args, &config).await?;

    // Step 2: Aggregate into an ordered distribution
    let distribution = analysis::aggregate(&label_text);
    info!(
        "Aggregated {} labels into {} aspects",
        distribution.total(),
        distribution.len()
    );

    if distribution.is_empty() {
        warn!("The label stream contained no non-empty lines");
    }

    // Step 3: Project into a chart series and build the report
    let series = analysis::to_chart_series(&distribution);

    let report = Report {
        metadata: ReportMetadata {
            input: metadata_seed.input,
            source: metadata_seed.source,
            endpoint: metadata_seed.endpoint,
            date: Utc::now(),
            total_labels: distribution.total(),
            distinct_labels: distribution.len(),
            duration_seconds: start_time.elapsed().as_secs_f64(),
        },
        series,
    };

    // Step 4: Render
    let content = match args.format {
        OutputFormat::Text => chart::generate_terminal_chart(&report),
        OutputFormat::Markdown => chart::generate_markdown_report(&report),
        OutputFormat::Json => chart::generate_json_report(&report)?,
    };

    // Markdown and JSON reports go to a file; the path falls back to
    // the configured default when --output is not given.
    let output_path = match (&args.output, args.format) {
        (Some(path), _) => Some(path.clone()),
        (None, OutputFormat::Text) => None,
        (None, _) => Some(std::path::PathBuf::from(&config.general.output)),
    };

    match output_path {
        Some(path) => {
            chart::write_report(&content, &path)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            println!("\n{}", chart::generate_terminal_chart(&report));
            println!("✅ Report saved to: {}", path.display());
        }
        None => {
            println!("\n{}", content);
        }
    }

    print_summary(&report);
    Ok(0)
}

/// Seed values for the report metadata, fixed before aggregation.
struct MetadataSeed {
    input: String,
    source: LabelSource,
    endpoint: Option<String>,
}

/// Obtain the newline-delimited label stream from the configured source.
async fn obtain_labels(args: &Args, config: &Config) -> Result<(String, MetadataSeed)> {
    // Local label files bypass the network entirely
    if args.labels_file {
        let path = args.input.as_ref().expect("validated by clap");
        info!("Reading labels from local file: {}", path.display());

        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read labels file: {}", path.display()))?;

        return Ok((
            text,
            MetadataSeed {
                input: path.display().to_string(),
                source: LabelSource::Local,
                endpoint: None,
            },
        ));
    }

    let client = UploadClient::new(
        &config.server.base_url,
        &config.server.upload_path,
        &config.server.audio_path,
        config.server.timeout_seconds,
    )?;

    if args.record {
        let wav = record_clip(args, config).await?;

        let pb = spinner("Uploading audio for transcription and classification...");
        let result = client.upload_audio(wav).await;
        pb.finish_and_clear();

        let endpoint = client.audio_url();
        let text = result?;

        Ok((
            text,
            MetadataSeed {
                input: "microphone".to_string(),
                source: LabelSource::Microphone,
                endpoint: Some(endpoint),
            },
        ))
    } else {
        let path = args.input.as_ref().expect("validated by clap");
        println!("📤 Uploading {} for classification...", path.display());

        let pb = spinner("Waiting for the classifier...");
        let result = client.upload_text(path).await;
        pb.finish_and_clear();

        let endpoint = client.upload_url();
        let text = result?;

        Ok((
            text,
            MetadataSeed {
                input: path.display().to_string(),
                source: LabelSource::File,
                endpoint: Some(endpoint),
            },
        ))
    }
}

/// Record a clip from the microphone, optionally saving it to disk.
async fn record_clip(args: &Args, config: &Config) -> Result<Vec<u8>> {
    let max = Duration::from_secs(config.audio.max_record_seconds);
    let device = config.audio.device.clone();

    println!(
        "🎙️ Recording... press Enter to stop (limit {}s)",
        max.as_secs()
    );

    // cpal streams are not Send; the recorder lives entirely inside the
    // blocking task and only the encoded clip comes back.
    let wav = tokio::task::spawn_blocking(move || {
        let mut recorder = audio::Recorder::new(device);
        recorder.record_clip(max)
    })
    .await
    .context("Recording task panicked")??;

    if let Some(ref path) = args.keep_audio {
        std::fs::write(path, &wav)
            .with_context(|| format!("Failed to save audio to {}", path.display()))?;
        println!("💾 Saved recording to: {}", path.display());
    }

    Ok(wav)
}

/// Print the closing summary.
fn print_summary(report: &Report) {
    println!("\n📈 Classification Summary:");
    println!("   Total labels: {}", report.metadata.total_labels);
    println!("   Distinct aspects: {}", report.metadata.distinct_labels);

    // First-seen order wins ties, matching the chart legend
    let mut top: Option<models::ChartSlice<'_>> = None;
    for slice in report.series.slices() {
        match top {
            Some(ref best) if best.count >= slice.count => {}
            _ => top = Some(slice),
        }
    }
    if let Some(slice) = top {
        println!(
            "   Top aspect: {} ({} labels, {:.1}%)",
            slice.label, slice.count, slice.share
        );
    }

    println!("   Duration: {:.1}s", report.metadata.duration_seconds);
}

/// Create a steady-tick spinner with a message.
fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
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
            info!("Loaded default config from .aspectlens.toml");
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
