use crate::cli::{OutputFormat, PredictArgs};
use crate::config::{AppConfig, build_config};
use crate::data::DataManager;
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use pkai::engine::progress::ProgressReporter;
use pkai::model::predictor::LoadedModel;
use pkai::model::registry::{ModelRegistry, ModelResolutionError};
use pkai::workflows::predict::{self, PkaPrediction};
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::thread;
use tracing::{info, warn};

const CSV_HEADER: [&str; 4] = ["chain", "residue_number", "residue_type", "pka"];

#[derive(Serialize)]
struct CsvRow<'a> {
    chain: char,
    residue_number: isize,
    residue_type: &'a str,
    pka: String,
}

pub fn run(args: PredictArgs, quiet: bool) -> Result<()> {
    info!("Initializing data manager...");
    let data_manager = DataManager::new()?;

    info!("Merging configuration from defaults, file and CLI arguments...");
    let config = build_config(&args, &data_manager)?;

    let registry = ModelRegistry::new(&config.model_store);
    info!(
        "Loading model '{}' from {:?}",
        config.model_name,
        registry.store()
    );
    let model = load_with_retries(&registry, &config)?;
    info!("Model ready: {}", model.info());

    let progress_handler = if quiet {
        CliProgressHandler::hidden()
    } else {
        CliProgressHandler::new()
    };
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    info!("Invoking the core prediction workflow...");
    let predictions =
        predict::predict_file(&config.input_path, &model, &config.core_config, &reporter)?;
    info!("Workflow finished with {} prediction(s).", predictions.len());

    if predictions.is_empty() {
        warn!("No titratable residues were found in {:?}.", config.input_path);
    }

    match &config.output_path {
        Some(path) => {
            let mut writer = BufWriter::new(File::create(path)?);
            write_predictions(&mut writer, &predictions, config.format)?;
            writer.flush()?;
            if !quiet {
                eprintln!(
                    "✓ {} prediction(s) written to: {}",
                    predictions.len(),
                    path.display()
                );
            }
        }
        None => {
            let stdout = io::stdout();
            let mut writer = stdout.lock();
            write_predictions(&mut writer, &predictions, config.format)?;
            writer.flush()?;
        }
    }

    Ok(())
}

fn load_with_retries(
    registry: &ModelRegistry,
    config: &AppConfig,
) -> std::result::Result<LoadedModel, ModelResolutionError> {
    let mut attempt = 0;
    loop {
        match registry.load(&config.model_name) {
            Ok(model) => return Ok(model),
            Err(e) if e.is_retryable() && attempt < config.load_retries => {
                attempt += 1;
                warn!(
                    "Model '{}' unavailable ({}). Retrying in {:?} ({}/{})...",
                    config.model_name, e, config.retry_delay, attempt, config.load_retries
                );
                thread::sleep(config.retry_delay);
            }
            Err(e) => return Err(e),
        }
    }
}

fn write_predictions<W: Write>(
    writer: &mut W,
    predictions: &[PkaPrediction],
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Text => {
            for prediction in predictions {
                writeln!(writer, "{prediction}")?;
            }
        }
        OutputFormat::Csv => {
            let mut csv_writer = csv::WriterBuilder::new()
                .has_headers(false)
                .from_writer(writer);
            csv_writer.write_record(CSV_HEADER)?;
            for prediction in predictions {
                csv_writer.serialize(CsvRow {
                    chain: prediction.chain,
                    residue_number: prediction.residue_number,
                    residue_type: prediction.residue_type.to_three_letter(),
                    pka: format!("{:.2}", prediction.pka),
                })?;
            }
            csv_writer.flush()?;
        }
    }
    Ok(())
}
