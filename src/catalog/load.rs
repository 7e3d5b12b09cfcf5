use std::fmt;
use std::fs;
use std::path::Path;

use anyhow::{Result, anyhow};
use tracing::{info, warn};

use crate::config::Config;
use crate::http::{RetryPolicy, get_text_with_retries};

use super::Catalog;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    Local(String),
    Remote(String),
}

impl fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local(path) => write!(f, "local file {path}"),
            Self::Remote(url) => write!(f, "remote {url}"),
        }
    }
}

/// Loads the episode index, local file first, remote URL second.
///
/// Never fails: when neither source is reachable the catalog stays empty and
/// every lookup degrades to "Unknown Episode".
pub fn load_catalog(config: &Config) -> Catalog {
    let local = match config.catalog_path() {
        Ok(path) => Some(path),
        Err(err) => {
            warn!("skipping local catalog: {err:#}");
            None
        }
    };
    let policy = RetryPolicy::new(config.http_timeout(), config.http_attempts);

    match fetch_catalog_text(local.as_deref(), &config.catalog_url, policy) {
        Ok((raw, source)) => {
            let catalog = Catalog::parse_with_layout(&raw, config.catalog_layout);
            info!(episodes = catalog.len(), %source, "loaded episode catalog");
            catalog
        }
        Err(err) => {
            warn!("error loading episodes, continuing with an empty catalog: {err:#}");
            Catalog::default()
        }
    }
}

pub fn fetch_catalog_text(
    local: Option<&Path>,
    remote_url: &str,
    policy: RetryPolicy,
) -> Result<(String, CatalogSource)> {
    let mut local_error = None;
    if let Some(path) = local {
        info!(path = %path.display(), "attempting to load episodes from local file");
        match fs::read_to_string(path) {
            Ok(raw) => return Ok((raw, CatalogSource::Local(path.display().to_string()))),
            Err(err) => {
                info!("local catalog unavailable ({err}), trying remote URL");
                local_error = Some(format!("{}: {err}", path.display()));
            }
        }
    }

    match get_text_with_retries(remote_url, policy) {
        Ok(raw) => Ok((raw, CatalogSource::Remote(remote_url.to_string()))),
        Err(remote_error) => Err(anyhow!(
            "failed to load episode mapping file from both local and remote sources (local: {}; remote: {remote_error})",
            local_error.as_deref().unwrap_or("not configured")
        )),
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::http::test_server::{Reply, TestServer};

    fn fast_policy() -> RetryPolicy {
        RetryPolicy {
            connect_timeout: Duration::from_millis(200),
            read_timeout: Duration::from_millis(200),
            attempts: 1,
            retry_delay: Duration::from_millis(1),
        }
    }

    #[test]
    fn local_file_wins_without_touching_remote() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("episode_names.txt");
        fs::write(&path, "00\ta3A\t#1: Local\n").expect("write catalog");
        let server = TestServer::spawn(vec![]);

        let (raw, source) =
            fetch_catalog_text(Some(&path), &server.base_url, fast_policy()).expect("local read");

        assert!(raw.contains("#1: Local"));
        assert!(matches!(source, CatalogSource::Local(_)));
        assert_eq!(server.hits(), 0);
    }

    #[test]
    fn falls_back_to_remote_when_local_missing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let server = TestServer::spawn(vec![Reply::new(200, "00 a3R #2: Remote")]);

        let (raw, source) = fetch_catalog_text(
            Some(&dir.path().join("missing.txt")),
            &server.base_url,
            fast_policy(),
        )
        .expect("remote fallback");

        assert_eq!(raw, "00 a3R #2: Remote");
        assert_eq!(source, CatalogSource::Remote(server.base_url.clone()));
    }

    #[test]
    fn both_sources_failing_yields_empty_catalog() {
        let dir = tempfile::tempdir().expect("tempdir");
        let server = TestServer::spawn(vec![Reply::new(404, "gone")]);
        let config = Config {
            catalog_path: Some(dir.path().join("missing.txt")),
            catalog_url: server.base_url.clone(),
            http_attempts: 1,
            http_timeout_ms: 200,
            ..Config::default()
        };

        let catalog = load_catalog(&config);

        assert!(catalog.is_empty());
        assert_eq!(catalog.name_of("a3Anything"), super::super::UNKNOWN_EPISODE);
    }
}
