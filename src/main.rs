use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use flatknn::config::{Config, LoggingConfig};
use flatknn::{Geometry, KnnIndex, Neighbor, SearchMode};

/// Query a flat nearest-neighbor index built from a JSON geometry file.
#[derive(Parser, Debug)]
#[command(name = "flatknn")]
#[command(about = "Knn and radius queries over a point cloud or mesh")]
struct Args {
    /// JSON geometry, e.g. {"type":"point_cloud","points":[[0,0,0],...]}
    geometry: PathBuf,

    /// Query point as comma-separated coordinates, e.g. 0,0,0
    #[arg(long, value_delimiter = ',', allow_negative_numbers = true)]
    query: Vec<f64>,

    /// Number of neighbors (defaults to search.default_knn)
    #[arg(long, conflicts_with = "radius")]
    knn: Option<usize>,

    /// Search radius; switches to radius search. Without a value,
    /// search.default_radius is used
    #[arg(long, num_args = 0..=1)]
    radius: Option<Option<f32>>,

    /// TOML config file
    #[arg(long)]
    config: Option<String>,
}

#[derive(Serialize)]
struct Output {
    mode: SearchMode,
    neighbors: Vec<Neighbor>,
}

fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    match logging.format.as_str() {
        "json" => {
            tracing_subscriber::fmt()
                .json()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
        _ => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

fn run(args: Args, config: &Config) -> flatknn::Result<Output> {
    let text = std::fs::read_to_string(&args.geometry)?;
    let geometry: Geometry = serde_json::from_str(&text)?;

    let mut index: KnnIndex = KnnIndex::with_config(&config.search);
    index.set_geometry(&geometry)?;
    tracing::info!(
        points = index.dataset_size(),
        dimension = index.dimension(),
        "index built"
    );

    match args.radius {
        Some(radius) => {
            let radius = radius.unwrap_or(config.search.default_radius);
            Ok(Output {
                mode: SearchMode::Radius,
                neighbors: index.within(&args.query, radius)?,
            })
        }
        None => {
            let knn = args.knn.unwrap_or(config.search.default_knn);
            Ok(Output {
                mode: SearchMode::Knn,
                neighbors: index.nearest(&args.query, knn)?,
            })
        }
    }
}

fn main() -> ExitCode {
    // Load .env
    let _ = dotenvy::dotenv();

    let args = Args::parse();

    let config = match Config::load(args.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("failed to load config: {e}");
            return ExitCode::FAILURE;
        }
    };

    init_tracing(&config.logging);
    flatknn::metrics::init();

    match run(args, &config) {
        Ok(output) => match serde_json::to_string_pretty(&output) {
            Ok(json) => {
                println!("{json}");
                ExitCode::SUCCESS
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to encode output");
                ExitCode::FAILURE
            }
        },
        Err(e) => {
            tracing::error!(error = %e, sentinel = e.sentinel(), "query failed");
            ExitCode::FAILURE
        }
    }
}
