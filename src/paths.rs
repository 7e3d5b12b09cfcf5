use std::path::PathBuf;

use anyhow::{Context, Result};

const APP_DIR: &str = "aiopl";

pub fn config_file_path() -> Result<PathBuf> {
    let base = dirs::config_dir().context("unable to resolve config directory")?;
    Ok(base.join(APP_DIR).join("config.toml"))
}

pub fn default_catalog_path() -> Result<PathBuf> {
    Ok(data_dir()?.join("episode_names.txt"))
}

pub fn log_dir_path() -> Result<PathBuf> {
    Ok(data_dir()?.join("logs"))
}

fn data_dir() -> Result<PathBuf> {
    let base = dirs::data_dir().context("unable to resolve data directory")?;
    Ok(base.join(APP_DIR))
}
