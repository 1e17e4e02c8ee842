use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::{info, Level};

use imping_geo::stations::{enrich_stations_file, load_measurements_file};
use imping_geo::{CoordinateConverter, GeoPoint, IdwParams, Result, SpatialInterpolator};

#[derive(Parser)]
#[command(name = "imping-geo")]
#[command(author, version, about = "Swiss coordinate conversion and air-quality interpolation", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert an LV95 point to WGS84
    ToWgs84 {
        easting: f64,
        northing: f64,
    },
    /// Convert a WGS84 point to LV95
    ToLv95 {
        latitude: f64,
        longitude: f64,
    },
    /// Append WGS84 columns to a station table with LV95 Easting/Northing
    Enrich {
        input: PathBuf,
        output: PathBuf,
    },
    /// Estimate a value at a location from an enriched station table
    Interpolate {
        /// Enriched station CSV
        #[arg(long)]
        stations: PathBuf,
        /// Column holding the values, e.g. PM2.5_2025
        #[arg(long)]
        value: String,
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        lon: f64,
        /// Distance exponent
        #[arg(long, default_value_t = 2.0)]
        power: f64,
        /// Use only the k nearest stations
        #[arg(long)]
        neighbors: Option<usize>,
        /// Ignore stations farther than this many metres
        #[arg(long)]
        max_distance: Option<f64>,
    },
}

fn run(command: Commands) -> Result<()> {
    let converter = CoordinateConverter::new();

    match command {
        Commands::ToWgs84 { easting, northing } => {
            let geo = converter.lv95_pair_to_wgs84(easting, northing)?;
            println!("latitude={:.7} longitude={:.7}", geo.latitude(), geo.longitude());
        }
        Commands::ToLv95 { latitude, longitude } => {
            let point = converter.to_lv95(GeoPoint::new(latitude, longitude)?)?;
            println!("easting={:.2} northing={:.2}", point.easting(), point.northing());
        }
        Commands::Enrich { input, output } => {
            let summary = enrich_stations_file(&input, &output, &converter)?;
            info!("Written {}", output.display());
            println!(
                "{} stations, {} converted, {} failed",
                summary.total, summary.converted, summary.failed
            );
        }
        Commands::Interpolate {
            stations,
            value,
            lat,
            lon,
            power,
            neighbors,
            max_distance,
        } => {
            let params = IdwParams {
                power,
                max_neighbors: neighbors,
                max_distance_m: max_distance,
            };
            let measurements = load_measurements_file(&stations, &value)?;
            let interpolator = SpatialInterpolator::new(measurements, params)?;
            let result = interpolator.interpolate_at(GeoPoint::new(lat, lon)?)?;

            info!(
                neighbors = result.neighbors,
                nearest_m = result.nearest_distance_m,
                exact = result.is_exact(),
                "interpolated"
            );
            println!("{}", result.value);
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
