//! Climate CLI
//!
//! Command-line interface for the climate store:
//! - Build a store from the dataset's CSV files
//! - Inspect the dataset
//! - Run the API's queries without the server

use clap::{Parser, Subcommand};
use climate::api::dates::parse_iso_date;
use climate::config::{generate_default_config, Config};
use climate::logging::init_tracing;
use climate::store::{build_store, ClimateStore, SqliteStore};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "climate-cli")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Build and inspect the station climate store")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// SQLite file (overrides the config)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Output format (table, json)
    #[arg(short, long, default_value = "table", global = true)]
    pub format: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the store and load the measurement and station CSV files
    Init {
        /// Measurements CSV (station,date,prcp,tobs)
        #[arg(long)]
        measurements: PathBuf,
        /// Stations CSV (station,name,latitude,longitude,elevation)
        #[arg(long)]
        stations: PathBuf,
    },

    /// Show row counts and the date span
    Info,

    /// List stations with their metadata
    Stations,

    /// Print the latest observation date
    Latest,

    /// Min/avg/max temperature from START, optionally up to END
    Stats {
        start: String,
        end: Option<String>,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let loaded = Config::load_default(cli.config.as_deref())?;
    let mut config = loaded.config.clone();
    if let Some(db) = cli.db {
        config.store.path = db;
    }
    init_tracing(&config.logging);
    loaded.log();

    let json = cli.format.eq_ignore_ascii_case("json");

    match cli.command {
        Commands::Init {
            measurements,
            stations,
        } => {
            let report = build_store(&config.store.path, &stations, &measurements)?;

            println!("Created {:?}", config.store.path);
            println!("  Observations: {}", report.observations);
            println!("  Stations: {}", report.stations);
            if report.rows_failed > 0 {
                println!("  Rows failed: {}", report.rows_failed);
                println!();
                println!("Errors (first 10):");
                for error in report.errors.iter().take(10) {
                    println!("  {}", error);
                }
            }
        }

        Commands::Info => {
            let store = SqliteStore::open(&config.store.path)?;
            let summary = store.summary()?;

            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!("Store: {:?}", config.store.path);
                println!("  Observations: {}", summary.observations);
                println!("  Stations: {}", summary.stations);
                println!(
                    "  Dates: {} .. {}",
                    summary.first_date.as_deref().unwrap_or("-"),
                    summary.last_date.as_deref().unwrap_or("-")
                );
            }
        }

        Commands::Stations => {
            let store = SqliteStore::open(&config.store.path)?;
            let stations = store.stations()?;

            if json {
                println!("{}", serde_json::to_string_pretty(&stations)?);
            } else if stations.is_empty() {
                println!("No stations.");
            } else {
                println!(
                    "{:<14} {:<40} {:>9} {:>11} {:>9}",
                    "Station", "Name", "Lat", "Lon", "Elev"
                );
                println!("{}", "-".repeat(87));
                for s in &stations {
                    println!(
                        "{:<14} {:<40} {:>9} {:>11} {:>9}",
                        s.station,
                        s.name,
                        format_opt(s.latitude),
                        format_opt(s.longitude),
                        format_opt(s.elevation)
                    );
                }
            }
        }

        Commands::Latest => {
            let store = SqliteStore::open(&config.store.path)?;
            match store.latest_date()? {
                Some(date) => println!("{}", date),
                None => println!("No observations."),
            }
        }

        Commands::Stats { start, end } => {
            for date in std::iter::once(&start).chain(end.as_ref()) {
                if parse_iso_date(date).is_none() {
                    anyhow::bail!("Invalid date {:?}: expected YYYY-MM-DD", date);
                }
            }

            let store = SqliteStore::open(&config.store.path)?;
            let stats = store.temperature_stats(&start, end.as_deref())?;

            if json {
                let body = climate::api::dto::TemperatureStatsResponse::from(stats);
                println!("{}", serde_json::to_string_pretty(&body)?);
            } else {
                println!("Min temperature: {}", format_opt(stats.min));
                println!("Avg temperature: {}", format_opt(stats.avg));
                println!("Max temperature: {}", format_opt(stats.max));
            }
        }

        Commands::Config { output } => {
            let content = generate_default_config();
            match output {
                Some(path) => {
                    std::fs::write(&path, content)?;
                    println!("Config written to {:?}", path);
                }
                None => print!("{}", content),
            }
        }
    }

    Ok(())
}

fn format_opt(value: Option<f64>) -> String {
    value
        .map(|v| format!("{:.2}", v))
        .unwrap_or_else(|| "-".to_string())
}
