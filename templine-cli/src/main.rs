//! Templine CLI — fetch, headless playback, and config commands.
//!
//! Commands:
//! - `fetch` — load the series once and print its summary (or JSON)
//! - `play` — step through the series year by year on the terminal
//! - `config` — print the effective configuration as TOML

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use templine_core::data::{DataLoader, LoadStatus, SeriesSource};
use templine_core::domain::{DataPoint, HistoricalSeries};
use templine_core::{telemetry, Config, IntervalScheduler, PlaybackController, PlaybackEvent};
use tracing::info;

#[derive(Parser)]
#[command(
    name = "templine",
    about = "Templine CLI — historical temperature anomaly timeline"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the series once and print the meta summary and first points.
    Fetch {
        #[command(flatten)]
        source: SourceArgs,

        /// Print the loaded series as JSON instead of a summary.
        #[arg(long, default_value_t = false)]
        json: bool,

        /// Path to a TOML config file.
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Play the series back headlessly, printing each year until finished.
    Play {
        #[command(flatten)]
        source: SourceArgs,

        /// Spread the whole playback over this many milliseconds.
        #[arg(long)]
        duration_ms: Option<u64>,

        /// Path to a TOML config file.
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Print the effective configuration as TOML.
    Config {
        /// Path to a TOML config file.
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

/// Overrides for where the series comes from.
#[derive(Args, Debug, Default)]
struct SourceArgs {
    /// JSON endpoint to fetch from.
    #[arg(long, conflicts_with = "csv")]
    url: Option<String>,

    /// GISTEMP CSV file to import instead of calling an endpoint.
    #[arg(long)]
    csv: Option<PathBuf>,
}

fn main() -> Result<()> {
    telemetry::init_stderr();
    let cli = Cli::parse();

    match cli.command {
        Commands::Fetch {
            source,
            json,
            config,
        } => {
            let config = resolve_config(config.as_deref(), &source, None)?;
            run_fetch(&config, json)
        }
        Commands::Play {
            source,
            duration_ms,
            config,
        } => {
            let config = resolve_config(config.as_deref(), &source, duration_ms)?;
            run_play(&config)
        }
        Commands::Config { config } => {
            let config = Config::load(config.as_deref())?;
            print!("{}", config.to_toml()?);
            Ok(())
        }
    }
}

/// Load the config file, then let command-line flags win.
fn resolve_config(
    path: Option<&Path>,
    source: &SourceArgs,
    duration_ms: Option<u64>,
) -> Result<Config> {
    let mut config = Config::load(path)?;
    apply_overrides(&mut config, source, duration_ms);
    Ok(config)
}

fn apply_overrides(config: &mut Config, source: &SourceArgs, duration_ms: Option<u64>) {
    if let Some(url) = &source.url {
        config.endpoint = url.clone();
        config.csv_path = None;
    }
    if let Some(csv) = &source.csv {
        config.csv_path = Some(csv.clone());
    }
    if let Some(ms) = duration_ms {
        config.total_duration_ms = ms;
    }
}

/// Run the single load attempt. A failed load becomes the command's error.
fn load_series(source: &SeriesSource) -> Result<HistoricalSeries> {
    info!(source = %source.describe(), "loading series");
    let mut loader = DataLoader::new();
    match source.provider() {
        Ok(provider) => {
            loader.load(provider.as_ref());
        }
        Err(e) => {
            loader.finish(Err(e));
        }
    }

    match loader.status() {
        LoadStatus::Ready => loader.take_data().context("loader reported ready without data"),
        LoadStatus::Error(message) => bail!("{message}"),
        LoadStatus::Loading => bail!("load did not finish"),
    }
}

fn run_fetch(config: &Config, json: bool) -> Result<()> {
    let series = load_series(&config.source())?;

    if json {
        println!("{}", serde_json::to_string_pretty(&series)?);
        return Ok(());
    }

    print_summary(&series, config.preview_len);
    Ok(())
}

fn print_summary(series: &HistoricalSeries, preview_len: usize) {
    let meta = &series.meta;
    println!();
    if let Some(dataset) = &meta.dataset {
        println!("=== {dataset} ===");
    }
    println!("Baseline:  {}", meta.baseline);
    println!("Unit:      {}", meta.unit);
    println!("Years:     {}–{}", meta.start_year, meta.end_year);
    println!("Points:    {}", series.len());

    if series.is_empty() {
        println!("No data points.");
        return;
    }

    let preview = series.preview(preview_len);
    println!();
    println!("First {} points:", preview.len());
    for point in preview {
        println!("  {}", format_point(point, &meta.unit));
    }
}

fn format_point(point: &DataPoint, unit: &str) -> String {
    format!("{}  {:+.2} {unit}", point.year, point.value)
}

fn run_play(config: &Config) -> Result<()> {
    let series = load_series(&config.source())?;
    let unit = series.meta.unit.clone();

    let mut playback =
        PlaybackController::with_series(IntervalScheduler::new(), config.timing(), series.series);

    let Some(PlaybackEvent::Started { year, step }) = playback.play() else {
        println!("Nothing to play: the series is empty.");
        return Ok(());
    };
    println!(
        "Playing {} years, one every {} ms",
        playback.series().len(),
        step.as_millis()
    );
    print_year(&playback, year, &unit);

    while playback.is_playing() {
        let wait = playback
            .until_next_tick(Instant::now())
            .unwrap_or(Duration::ZERO);
        std::thread::sleep(wait);

        match playback.pump(Instant::now()) {
            Some(PlaybackEvent::Advanced { year }) => print_year(&playback, year, &unit),
            Some(PlaybackEvent::Finished) => {
                if let Some(last) = playback.current_year() {
                    println!("Finished at {last}.");
                }
            }
            _ => {}
        }
    }

    Ok(())
}

fn print_year(playback: &PlaybackController<IntervalScheduler>, year: i32, unit: &str) {
    match playback.current_point() {
        Some(point) => println!("  {}", format_point(point, unit)),
        None => println!("  {year}"),
    }
}
