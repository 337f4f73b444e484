//! Write the default configuration file.

use exifcard_common::config::{config_file_path, AppConfig};

pub fn run(force: bool) -> anyhow::Result<()> {
    let path = config_file_path();
    if path.exists() && !force {
        anyhow::bail!(
            "Config file already exists at {} (use --force to overwrite)",
            path.display()
        );
    }

    let written = AppConfig::default()
        .save()
        .map_err(|e| anyhow::anyhow!("Failed to write config: {e}"))?;

    println!("Config written: {}", written.display());
    Ok(())
}
