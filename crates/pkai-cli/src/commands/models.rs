use crate::cli::{ModelsArgs, ModelsCommands};
use crate::data::DataManager;
use crate::error::Result;
use pkai::model::registry::ModelStatus;
use std::path::PathBuf;
use tracing::info;

pub fn run(args: ModelsArgs) -> Result<()> {
    match args.command {
        ModelsCommands::List => handle_list(),
        ModelsCommands::Path => handle_path(),
        ModelsCommands::SetPath { path } => handle_set_path(path),
        ModelsCommands::ResetPath => handle_reset_path(),
    }
}

fn handle_list() -> Result<()> {
    let manager = DataManager::new()?;
    let registry = manager.registry();
    println!("Model store: {}", registry.store().display());
    for status in registry.statuses() {
        println!("{}", format_status(&status));
    }
    Ok(())
}

fn format_status(status: &ModelStatus) -> String {
    let marker = if status.installed { "✓" } else { "✗" };
    let state = if status.installed {
        "installed"
    } else {
        "not installed"
    };
    format!(
        "  {} {:<8} {:<14} {}",
        marker,
        status.name,
        state,
        status.path.display()
    )
}

fn handle_path() -> Result<()> {
    let manager = DataManager::new()?;
    println!("{}", manager.get_data_path().display());
    Ok(())
}

fn handle_set_path(path: PathBuf) -> Result<()> {
    info!("Setting custom model store path to {:?}", path);
    DataManager::set_custom_path(&path)?;
    println!("✓ Model store path set to: {}", path.display());
    Ok(())
}

fn handle_reset_path() -> Result<()> {
    info!("Resetting model store path to default.");
    DataManager::reset_path()?;
    let manager = DataManager::new()?;
    println!(
        "✓ Model store path reset to default: {}",
        manager.get_data_path().display()
    );
    Ok(())
}
