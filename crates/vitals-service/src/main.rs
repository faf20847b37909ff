use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::json;
use vitals_core::config::{CliOverrides, VitalsConfig};
use vitals_core::errors::{VitalsError, VitalsErrorCode};
use vitals_core::tracing::init_tracing;
use vitals_service::{NewPatient, VitalsService};

#[derive(Parser)]
#[command(name = "vitals", author, version, about, long_about = None)]
struct Cli {
    /// Project root holding `vitals.toml`
    #[arg(long, default_value = ".")]
    root: PathBuf,
    /// Directory holding the catalog and model artifact
    #[arg(long)]
    data_dir: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the catalog, optionally ordered by a measurement
    List {
        /// Sort field: height, weight or bmi
        #[arg(long)]
        sort_by: Option<String>,
        /// Sort order: asc or desc
        #[arg(long, default_value = "asc")]
        order: String,
    },
    /// Print one record
    Show {
        /// Patient identifier, e.g. P001
        id: String,
    },
    /// Add a record, predicting its verdict when none is given
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        age: u32,
        #[arg(long)]
        gender: String,
        /// Height in metres
        #[arg(long)]
        height: f64,
        /// Weight in kilograms
        #[arg(long)]
        weight: f64,
        /// Defaults to weight / height²
        #[arg(long)]
        bmi: Option<f64>,
        #[arg(long)]
        verdict: Option<String>,
        #[arg(long)]
        city: Option<String>,
    },
    /// Predict a verdict without saving anything
    Predict {
        #[arg(long)]
        age: u32,
        #[arg(long)]
        gender: String,
        #[arg(long)]
        height: f64,
        #[arg(long)]
        weight: f64,
        #[arg(long)]
        bmi: Option<f64>,
    },
    /// Retrain the verdict model on the current catalog
    Train,
    /// Print catalog totals and per-verdict counts
    Summary,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let overrides = CliOverrides {
        data_dir: cli.data_dir.clone(),
        ..CliOverrides::default()
    };
    let config = VitalsConfig::load(&cli.root, Some(&overrides)).map_err(coded)?;
    tracing::debug!(
        catalog = %config.storage.catalog_path().display(),
        artifact = %config.model.artifact_path(&config.storage).display(),
        "resolved configuration"
    );
    let service = VitalsService::from_config(&config);

    match cli.command {
        Commands::List { sort_by, order } => match sort_by {
            Some(field) => print_json(&service.get_sorted(&field, &order).map_err(coded)?),
            None => print_json(&service.catalog_snapshot()),
        },
        Commands::Show { id } => print_json(&service.get_record(&id).map_err(coded)?),
        Commands::Add {
            name,
            age,
            gender,
            height,
            weight,
            bmi,
            verdict,
            city,
        } => {
            let bmi = bmi.unwrap_or_else(|| vitals_core::bmi(height, weight));
            let verdict = match verdict {
                Some(verdict) => verdict,
                None => service
                    .predict_verdict(age, &gender, height, weight, bmi)
                    .map_err(coded)
                    .context("no --verdict given and none could be predicted")?,
            };
            let id = service
                .create_record(NewPatient {
                    name,
                    city,
                    age,
                    gender,
                    height,
                    weight,
                    bmi,
                    verdict: verdict.clone(),
                })
                .map_err(coded)?;
            print_json(&json!({ "id": id, "verdict": verdict }))
        }
        Commands::Predict {
            age,
            gender,
            height,
            weight,
            bmi,
        } => {
            let bmi = bmi.unwrap_or_else(|| vitals_core::bmi(height, weight));
            let verdict = service
                .predict_verdict(age, &gender, height, weight, bmi)
                .map_err(coded)?;
            print_json(&json!({ "verdict": verdict }))
        }
        Commands::Train => print_json(&service.retrain().map_err(coded)?),
        Commands::Summary => print_json(&service.summary()),
    }
}

fn coded(e: impl Into<VitalsError>) -> anyhow::Error {
    anyhow!(e.into().coded_string())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let out = serde_json::to_string_pretty(value).context("serializing output")?;
    println!("{out}");
    Ok(())
}
