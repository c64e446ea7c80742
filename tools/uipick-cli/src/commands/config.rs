//! Show, and optionally save, the effective configuration.

use uipick_common::config::{config_file_path, AppConfig};

pub fn run(write: bool, config: &AppConfig) -> anyhow::Result<()> {
    println!("Config file: {}", config_file_path().display());
    println!("{}", serde_json::to_string_pretty(config)?);

    if write {
        config.check()?;
        let path = config.save()?;
        println!("\nSaved to {}", path.display());
    }
    Ok(())
}
