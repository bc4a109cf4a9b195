//! Show or initialize the configuration file.

use crate::config::{get_config_path, RecwaveConfig};

/// Prints the effective configuration as TOML.
///
/// With `init`, writes the defaults to the config path first, unless a file is
/// already there.
///
/// # Errors
/// - If the config path cannot be determined
/// - If the file cannot be written or the config cannot be serialized
pub fn handle_config(config: &RecwaveConfig, init: bool) -> anyhow::Result<()> {
    let config_path = get_config_path()?;

    if init {
        if config_path.exists() {
            println!("Config file already exists: {}", config_path.display());
        } else {
            RecwaveConfig::default().save_to(&config_path)?;
            println!("Wrote default config to {}", config_path.display());
        }
    }

    println!("# {}", config_path.display());
    print!("{}", config.to_toml_string()?);
    Ok(())
}
