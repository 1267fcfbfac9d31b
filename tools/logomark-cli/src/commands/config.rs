//! Show or write the configuration file.

use std::path::PathBuf;

use logomark_common::config::{config_file_path, AppConfig};

pub fn run(config: &AppConfig, path: Option<PathBuf>, write: bool) -> anyhow::Result<()> {
    let path = path.unwrap_or_else(config_file_path);
    let status = if path.exists() { "" } else { " (not found, using defaults)" };
    println!("Config file: {}{status}", path.display());
    println!("{}", serde_json::to_string_pretty(config)?);

    if write {
        config.save_to(&path)?;
        println!("\nWrote {}", path.display());
    }

    Ok(())
}
