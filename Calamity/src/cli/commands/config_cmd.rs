//! CLI command for printing the effective configuration

use crate::config::Config;

pub fn execute(config: &Config) -> anyhow::Result<()> {
    print!("{}", config.to_toml()?);
    Ok(())
}
