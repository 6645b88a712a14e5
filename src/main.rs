use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use tle_czml::czml::SceneAssembler;
use tle_czml::path::segment;
use tle_czml::propagation::locate;
use tle_czml::tle::{load_tle_file, TleRecord};
use tle_czml::{Error, SceneConfig, TimeWindow};

#[derive(Parser)]
#[command(name = "tle-czml")]
#[command(about = "Convert two-line element sets into a CZML scene")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a CZML document for every satellite in a TLE file
    Convert {
        tle_file: PathBuf,
        /// Output file
        #[arg(short, long, default_value = "orbit.czml")]
        output: PathBuf,
        #[command(flatten)]
        window: WindowArgs,
        /// End of the simulation window (RFC3339)
        #[arg(long, conflicts_with = "duration")]
        end: Option<DateTime<Utc>>,
        /// YAML scene configuration
        #[arg(long)]
        config: Option<PathBuf>,
        /// Propagate samples on all cores
        #[arg(long)]
        parallel: bool,
        /// Indent the JSON output
        #[arg(long)]
        pretty: bool,
        /// Fail instead of skipping satellites that cannot be propagated
        #[arg(long)]
        strict: bool,
    },
    /// List satellites with their orbital period and path segment count
    Info {
        tle_file: PathBuf,
        #[command(flatten)]
        window: WindowArgs,
    },
    /// Print latitude, longitude and altitude of each satellite
    Locate {
        tle_file: PathBuf,
        /// Instant to evaluate (RFC3339), defaults to now
        #[arg(long)]
        at: Option<DateTime<Utc>>,
    },
}

#[derive(Args)]
struct WindowArgs {
    /// Start of the simulation window (RFC3339), defaults to now
    #[arg(long)]
    start: Option<DateTime<Utc>>,
    /// Window length, e.g. "24h" or "90min"
    #[arg(long, value_parser = humantime::parse_duration)]
    duration: Option<Duration>,
}

impl WindowArgs {
    fn resolve(
        &self,
        end: Option<DateTime<Utc>>,
        default_duration: Duration,
    ) -> Result<TimeWindow, Error> {
        let start = self.start.unwrap_or_else(Utc::now);
        if let Some(end) = end {
            return Ok(TimeWindow::new(start, end)?);
        }
        let length = self.duration.unwrap_or(default_duration);
        Ok(TimeWindow::starting_at_std(start, length)?)
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Convert {
            tle_file,
            output,
            window,
            end,
            config,
            parallel,
            pretty,
            strict,
        } => convert(
            &tle_file,
            &output,
            &window,
            end,
            config.as_deref(),
            parallel,
            pretty,
            strict,
        ),
        Commands::Info { tle_file, window } => info(&tle_file, &window),
        Commands::Locate { tle_file, at } => locate_all(&tle_file, at),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn load_records(path: &Path) -> Result<Vec<TleRecord>, Error> {
    let records = load_tle_file(path)?;
    if records.is_empty() {
        log::warn!("No element sets found in {}", path.display());
    }
    Ok(records)
}

#[allow(clippy::too_many_arguments)]
fn convert(
    tle_file: &Path,
    output: &Path,
    window: &WindowArgs,
    end: Option<DateTime<Utc>>,
    config: Option<&Path>,
    parallel: bool,
    pretty: bool,
    strict: bool,
) -> Result<ExitCode, Error> {
    let config = match config {
        Some(path) => SceneConfig::from_file(path)?,
        None => SceneConfig::default(),
    };
    let window = window.resolve(end, config.default_duration)?;
    let records = load_records(tle_file)?;
    log::info!(
        "Converting {} satellites over {}",
        records.len(),
        window.to_interval_string()
    );

    let assembler = SceneAssembler::new(config)?.parallel(parallel);
    let assembly = assembler.assemble(&records, &window);

    let document = if strict {
        assembly.into_strict()?
    } else {
        assembly.document
    };

    let json = if pretty {
        document.to_json_pretty()?
    } else {
        document.to_json()?
    };
    fs::write(output, json)?;

    let written = document.packets().len() - 1;
    println!("Wrote {} satellites to {}", written, output.display());
    if written < records.len() {
        println!("Skipped {} satellites", records.len() - written);
    }
    Ok(ExitCode::SUCCESS)
}

fn info(tle_file: &Path, window: &WindowArgs) -> Result<ExitCode, Error> {
    let window = window.resolve(None, SceneConfig::default().default_duration)?;
    let records = load_records(tle_file)?;

    println!("Window: {}", window.to_interval_string());
    for record in &records {
        let segments = segment(&window, record.orbital_period());
        println!(
            "  {} [{}]: {:.2} min/orbit, {} path segments",
            record.name(),
            record.catalog_number().unwrap_or("?"),
            record.orbital_period_minutes(),
            segments.len()
        );
    }
    Ok(ExitCode::SUCCESS)
}

fn locate_all(tle_file: &Path, at: Option<DateTime<Utc>>) -> Result<ExitCode, Error> {
    let at = at.unwrap_or_else(Utc::now);
    let records = load_records(tle_file)?;
    let mut failed = false;

    println!("Positions at {}", tle_czml::window::iso8601(at));
    for record in &records {
        match locate(record, at) {
            Ok(p) => println!(
                "  {}: lat {:.4}, lon {:.4}, alt {:.0} m",
                record.name(),
                p.latitude_deg(),
                p.longitude_deg(),
                p.altitude_m
            ),
            Err(e) => {
                failed = true;
                eprintln!("  {}: {}", record.name(), e);
            }
        }
    }

    Ok(if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}
