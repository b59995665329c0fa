use anyhow::{Result, anyhow};
use std::path::PathBuf;

pub fn get_revlink_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().ok_or_else(|| anyhow!("Could not find home directory"))?;
    Ok(home.join(".revlink"))
}

pub fn get_config_path() -> Result<PathBuf> {
    let revlink_dir = get_revlink_dir()?;
    Ok(revlink_dir.join("config.toml"))
}
