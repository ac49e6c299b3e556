use super::defaults::DefaultsConfig;
use super::file::FileConfig;
use super::models::AppConfig;
use crate::cli::PredictArgs;
use crate::data::DataManager;
use crate::error::{CliError, Result};
use crate::utils::parser::{self, ParseError};
use pkai::engine::config::{PredictionConfigBuilder, UnmappedPolicy};
use std::time::Duration;

/// Merges built-in defaults, the config file, `--set` overrides and CLI flags,
/// in increasing order of precedence.
pub fn build_config(args: &PredictArgs, data_manager: &DataManager) -> Result<AppConfig> {
    let defaults = DefaultsConfig::default();

    let file_config = if let Some(config_path) = &args.config {
        FileConfig::from_file(config_path)?
    } else {
        FileConfig::default()
    };

    let mut file_config = apply_set_values(file_config, &args.set_values)?;

    let model_file = file_config.model.take().unwrap_or_default();
    let encoding_file = file_config.encoding.take().unwrap_or_default();

    let model_name = args
        .model
        .clone()
        .or(model_file.name)
        .unwrap_or(defaults.model);
    let model_store = args
        .model_store
        .clone()
        .or(model_file.store_path)
        .unwrap_or_else(|| data_manager.get_data_path().to_path_buf());
    let load_retries = model_file.load_retries.unwrap_or(defaults.load_retries);
    let retry_delay = Duration::from_millis(
        model_file
            .retry_delay_ms
            .unwrap_or(defaults.retry_delay_ms),
    );

    let cutoff_radius = args
        .cutoff_radius
        .or(encoding_file.cutoff_radius)
        .unwrap_or(defaults.cutoff_radius);
    let unmapped_policy = match args
        .unmapped_policy
        .as_deref()
        .or(encoding_file.unmapped_policy.as_deref())
    {
        Some(policy) => policy
            .parse::<UnmappedPolicy>()
            .map_err(|e| CliError::Config(e.to_string()))?,
        None => defaults.unmapped_policy,
    };
    let max_atoms = encoding_file.max_atoms.or(defaults.max_atoms);

    let core_config = PredictionConfigBuilder::new()
        .cutoff_radius(cutoff_radius)
        .unmapped_policy(unmapped_policy)
        .max_atoms(max_atoms)
        .build()
        .map_err(|e| CliError::Config(e.to_string()))?;

    Ok(AppConfig {
        input_path: args.input.clone(),
        output_path: args.output.clone(),
        format: args.format,
        model_name,
        model_store,
        load_retries,
        retry_delay,
        core_config,
    })
}

fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    for kv_pair in set_values {
        apply_set_value(&mut config, kv_pair).map_err(|e| CliError::Config(e.to_string()))?;
    }
    Ok(config)
}

fn apply_set_value(config: &mut FileConfig, kv_pair: &str) -> std::result::Result<(), ParseError> {
    let (key, value) = parser::parse_key_value(kv_pair)?;
    match key {
        "model.name" => {
            config.model.get_or_insert_with(Default::default).name = Some(value.to_string());
        }
        "model.store-path" => {
            config.model.get_or_insert_with(Default::default).store_path = Some(value.into());
        }
        "model.load-retries" => {
            config.model.get_or_insert_with(Default::default).load_retries =
                Some(parser::parse_value(key, value, "integer")?);
        }
        "model.retry-delay-ms" => {
            config.model.get_or_insert_with(Default::default).retry_delay_ms =
                Some(parser::parse_value(key, value, "integer")?);
        }
        "encoding.cutoff-radius" => {
            config.encoding.get_or_insert_with(Default::default).cutoff_radius =
                Some(parser::parse_value(key, value, "float")?);
        }
        "encoding.unmapped-policy" => {
            config.encoding.get_or_insert_with(Default::default).unmapped_policy =
                Some(value.to_string());
        }
        "encoding.max-atoms" => {
            config.encoding.get_or_insert_with(Default::default).max_atoms =
                Some(parser::parse_value(key, value, "integer")?);
        }
        _ => return Err(ParseError::UnknownKey(key.to_string())),
    }
    Ok(())
}
