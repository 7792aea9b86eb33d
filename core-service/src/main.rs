//! Olive Yield - Main Entry Point
//!
//! Composition root: config → dataset → model (trained once) → service.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde_json::Value;

use olive_yield_core::constants::{APP_NAME, APP_VERSION};
use olive_yield_core::logic::dataset::Dataset;
use olive_yield_core::logic::features::{LayoutInfo, RawInputs};
use olive_yield_core::logic::prediction::{PredictionService, RequestState};
use olive_yield_core::logic::region;
use olive_yield_core::logic::startup::{load_dataset, region_directory, startup};
use olive_yield_core::ServiceConfig;

/// Olive oil yield prediction and Xylella risk map data
#[derive(Parser)]
#[command(name = "olive-yield", version)]
#[command(about = "Predict olive oil yield and summarise regional Xylella risk", long_about = None)]
struct Cli {
    /// Historical dataset CSV (overrides config and OLIVE_DATASET_PATH)
    #[arg(long, global = true)]
    dataset: Option<PathBuf>,

    /// JSON config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Region stats, risk bands and map markers
    Regions {
        /// Print markers as JSON
        #[arg(long)]
        json: bool,
    },

    /// Predict litres/hectare for one set of conditions
    Predict {
        /// Temperature (°C)
        #[arg(long, allow_hyphen_values = true)]
        temperature: Option<f64>,

        /// Relative humidity (%)
        #[arg(long)]
        humidity: Option<f64>,

        /// Precipitation (mm)
        #[arg(long)]
        precipitation: Option<f64>,

        /// Trees replanted
        #[arg(long)]
        trees_replanted: Option<f64>,

        /// Trees infected
        #[arg(long)]
        trees_infected: Option<f64>,

        /// Print the full response as JSON
        #[arg(long)]
        json: bool,
    },

    /// Daily series of one region
    Series {
        /// Region id (e.g. Lecce)
        #[arg(long)]
        region: String,
    },

    /// Feature layout and model metadata
    Info,
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    log::info!("Starting {} v{}", APP_NAME, APP_VERSION);

    let mut config = ServiceConfig::load(cli.config.as_deref()).context("loading configuration")?;
    if let Some(path) = cli.dataset {
        config.dataset_path = path;
    }

    match cli.command {
        Command::Regions { json } => {
            let dataset = load_dataset(&config).context("loading dataset")?;
            print_regions(&dataset, &config, json)
        }
        Command::Series { region } => {
            let dataset = load_dataset(&config).context("loading dataset")?;
            print_series(&dataset, &region)
        }
        Command::Predict {
            temperature,
            humidity,
            precipitation,
            trees_replanted,
            trees_infected,
            json,
        } => {
            let (_, model) = startup(&config).context("starting prediction service")?;
            let service = PredictionService::new(model);

            let raw = raw_inputs([
                ("temperature", temperature),
                ("humidity", humidity),
                ("precipitation", precipitation),
                ("trees_replanted", trees_replanted),
                ("trees_infected", trees_infected),
            ]);

            let response = service.handle(&raw);
            if json {
                println!("{}", serde_json::to_string_pretty(&response)?);
            } else {
                println!("{}", response.message);
            }
            if response.state == RequestState::Failed {
                anyhow::bail!("prediction failed");
            }
            Ok(())
        }
        Command::Info => {
            let (dataset, model) = startup(&config).context("starting prediction service")?;
            let info = serde_json::json!({
                "layout": LayoutInfo::current(),
                "dataset": {
                    "source": dataset.source_name(),
                    "records": dataset.len(),
                    "regions": dataset.regions(),
                },
                "model": model.metadata(),
            });
            println!("{}", serde_json::to_string_pretty(&info)?);
            Ok(())
        }
    }
}

/// Form payload from the CLI flags. Omitted flags stay absent; non-finite
/// values are passed as text so validation reports them as invalid.
fn raw_inputs(fields: [(&str, Option<f64>); 5]) -> RawInputs {
    let mut raw = RawInputs::new();
    for (name, value) in fields {
        let Some(v) = value else { continue };
        let value = if v.is_finite() {
            Value::from(v)
        } else {
            Value::String(v.to_string())
        };
        raw.insert(name.to_string(), value);
    }
    raw
}

fn print_regions(dataset: &Dataset, config: &ServiceConfig, json: bool) -> anyhow::Result<()> {
    let directory = region_directory(config).context("loading region coordinates")?;

    let stats = region::aggregate(dataset.records());
    let markers = region::build_markers(&stats, &directory, &config.risk);

    if json {
        println!("{}", serde_json::to_string_pretty(&markers)?);
        return Ok(());
    }

    println!("{:<12} {:>8} {:>14}  {}", "region", "records", "mean infected", "risk");
    for stat in &stats {
        let band = region::classify_with_thresholds(stat, &config.risk);
        println!(
            "{:<12} {:>8} {:>14.2}  {}",
            stat.region_id, stat.record_count, stat.mean_infected, band
        );
    }
    Ok(())
}

fn print_series(dataset: &Dataset, region_id: &str) -> anyhow::Result<()> {
    let series = region::region_series(dataset.records(), region_id);
    if series.is_empty() {
        anyhow::bail!(
            "no records for region '{}' (known: {})",
            region_id,
            dataset.regions().join(", ")
        );
    }

    println!("{:<12} {:>8} {:>8} {:>8}", "date", "temp", "humid", "infected");
    for point in &series {
        println!(
            "{:<12} {:>8.2} {:>8.2} {:>8}",
            point.date, point.temperature, point.humidity, point.trees_infected
        );
    }
    Ok(())
}
