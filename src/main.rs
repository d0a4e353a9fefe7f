use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod error;
mod loader;
mod models;
mod report;
mod service;
mod stats;


use crate::config::load_config;
use crate::loader::{DataContext, JsonDirectorySource};
use crate::models::Role;
use crate::report::ReportConfig;
use crate::service::{MusicService, ReportResponse};

#[derive(Parser)]
#[command(name = "genre-atlas")]
#[command(about = "Genre popularity and track metric reports by region and age")]
#[command(version)]
struct Args {
    /// Path to a report configuration JSON file (top_k, metric_columns)
    #[arg(short = 'c', long = "report-config")]
    report_config: Option<String>,

    /// Role of the caller; artists get the full ranked genre list
    #[arg(short = 'r', long = "role", value_enum, default_value = "listener")]
    role: Role,

    /// Print compact JSON instead of pretty-printed
    #[arg(long = "compact")]
    compact: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Popular genres per region, optionally for a single age band
    Genres {
        #[arg(long)]
        region: Option<String>,
        #[arg(long)]
        age: Option<String>,
    },
    /// Tracks tagged with a genre and recommended for a region
    Tracks {
        #[arg(long)]
        genre: Option<String>,
        #[arg(long)]
        region: Option<String>,
    },
    /// Mean track metrics per genre
    MetricsGenre {
        #[arg(long)]
        genre: Option<String>,
    },
    /// Mean track metrics per recommended region
    MetricsRegion {
        #[arg(long)]
        region: Option<String>,
    },
    /// User totals per role
    UserStats,
    /// New users per day, week, month or year
    Growth {
        #[arg(long)]
        period: Option<String>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "genre_atlas=info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    let config = load_config()?;
    info!("Loading tables from {}", config.data_dir.display());

    let report_config = match &args.report_config {
        Some(path) => ReportConfig::load_from_file(path)
            .map_err(|e| anyhow::anyhow!("Failed to load report configuration '{}': {}", path, e))?,
        None => ReportConfig::default(),
    };

    // Tables are loaded once and only read afterwards
    let data = DataContext::load(&JsonDirectorySource::new(&config));
    let service = MusicService::new(&data, &report_config, args.role);

    let response = run(&service, args.command);
    let body = if args.compact {
        serde_json::to_string(&response.body)?
    } else {
        serde_json::to_string_pretty(&response.body)?
    };
    println!("{body}");

    if !response.is_success() {
        error!("Report failed with status {}", response.status);
        return Err(anyhow::anyhow!("Report failed with status {}", response.status));
    }
    Ok(())
}

fn run(service: &MusicService<'_>, command: Command) -> ReportResponse {
    match command {
        Command::Genres { region, age: None } => {
            MusicService::respond(service.genres_by_region(region.as_deref()))
        }
        Command::Genres { region, age } => {
            MusicService::respond(service.genres_by_region_and_age(region.as_deref(), age.as_deref()))
        }
        Command::Tracks { genre, region } => {
            MusicService::respond(service.tracks_by_genre_and_region(region.as_deref(), genre.as_deref()))
        }
        Command::MetricsGenre { genre } => MusicService::respond(service.metrics_by_genre(genre.as_deref())),
        Command::MetricsRegion { region } => {
            MusicService::respond(service.metrics_by_region(region.as_deref()))
        }
        Command::UserStats => MusicService::respond(service.user_statistics()),
        Command::Growth { period } => MusicService::respond(service.user_growth(period.as_deref())),
    }
}
