use anyhow::Result;

use crate::config::Config;

/// Print the effective configuration as TOML
pub fn handle_config_command(config: &Config) -> Result<()> {
    print!("{}", config.to_toml_string()?);
    Ok(())
}
