use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::CatalogLayout;
use crate::paths::{config_file_path, default_catalog_path};

pub const DEFAULT_CATALOG_URL: &str = "https://raw.githubusercontent.com/CATEIN/aio-playlist-creator/refs/heads/main/episodes/episode_names.txt";
pub const DEFAULT_CREATOR_URL: &str = "https://catein.github.io/aio-playlist-creator/";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Local episode index, tried before the remote URL.
    pub catalog_path: Option<PathBuf>,
    pub catalog_url: String,
    pub catalog_layout: CatalogLayout,
    /// Base URL used for "open in creator" links on community playlists.
    pub creator_url: String,
    pub use_short_ids: bool,
    pub http_attempts: usize,
    pub http_timeout_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog_path: None,
            catalog_url: DEFAULT_CATALOG_URL.to_string(),
            catalog_layout: CatalogLayout::Auto,
            creator_url: DEFAULT_CREATOR_URL.to_string(),
            use_short_ids: true,
            http_attempts: 3,
            http_timeout_ms: 5_000,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = config_file_path()?;
        let mut config = Self::load_from(&path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config at {}", path.display()))?;
        toml::from_str(&raw).with_context(|| format!("invalid config at {}", path.display()))
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(custom) = env::var("AIOPL_CATALOG_PATH") {
            self.catalog_path = Some(PathBuf::from(custom));
        }
        if let Ok(custom) = env::var("AIOPL_CATALOG_URL") {
            self.catalog_url = custom;
        }
    }

    pub fn catalog_path(&self) -> Result<PathBuf> {
        match &self.catalog_path {
            Some(path) => Ok(path.clone()),
            None => default_catalog_path(),
        }
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_millis(self.http_timeout_ms.max(1))
    }
}
