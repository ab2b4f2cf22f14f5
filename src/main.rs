use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use coastal_rise::charts;
use coastal_rise::state::AppState;
use coastal_rise::{Config, ConstantUndulation, SeaLevelEngine};

/// Query projected sea-level change per city.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// JSON file overriding the default year range and scene settings.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Dataset (.csv, .json or .parquet).
    dataset: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List cities as `NAME (COUNTRY)`.
    Cities,
    /// Interpolated sea level and water-plane elevation for a city.
    Elevation {
        city: String,
        /// Continuous year, e.g. 2047.5.
        year: f64,
        /// Geoid undulation at the city, in metres.
        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        undulation: f64,
    },
    /// Cities with the highest sea level in a sample year.
    Top {
        year: i32,
        #[arg(short = 'n', long)]
        count: Option<usize>,
    },
    /// Every sample of a city as `year,mm`.
    Series { city: String },
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::from_file(path).context("loading config")?,
        None => Config::default(),
    };
    let engine = SeaLevelEngine::open(config, &cli.dataset)
        .with_context(|| format!("opening dataset {}", cli.dataset.display()))?;

    match cli.command {
        Command::Cities => {
            for label in AppState::dropdown_labels(&engine) {
                println!("{label}");
            }
        }
        Command::Elevation {
            city,
            year,
            undulation,
        } => {
            let reading = engine
                .interpolated_elevation(&city, year, &ConstantUndulation(undulation))
                .with_context(|| format!("interpolating {city} at {year}"))?;
            println!(
                "{city} @ {year}: {}..{} sea level {:.4} m, undulation {:.3} m, elevation {:.4} m",
                reading.floor_year,
                reading.ceil_year,
                reading.sea_level_m,
                reading.undulation,
                reading.absolute_elevation
            );
        }
        Command::Top { year, count } => {
            let n = count.unwrap_or(engine.config().top_n);
            for (rank, (city, mm)) in engine.top_n(year, n).into_iter().enumerate() {
                println!("{:>3}. {city:<24} {mm:>10.1} mm", rank + 1);
            }
        }
        Command::Series { city } => {
            let series = charts::line_series(engine.store(), &city)
                .with_context(|| format!("reading series for {city}"))?;
            println!("# {}", series.title);
            for (year, mm) in series.points {
                println!("{year},{mm}");
            }
        }
    }

    Ok(())
}
