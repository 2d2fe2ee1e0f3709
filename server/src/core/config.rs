use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use super::cli::CliConfig;
use super::constants::{CONFIG_FILE_NAME, DATASET_FILE_NAME, DEFAULT_HOST, DEFAULT_PORT};

// =============================================================================
// File Config Structs (JSON deserialization)
// =============================================================================

/// Server configuration section
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ServerFileConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
}

/// Catalog configuration section
#[derive(Debug, Default, Clone, Deserialize)]
pub struct CatalogFileConfig {
    pub dataset: Option<PathBuf>,
}

/// File-based configuration (JSON)
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    pub server: Option<ServerFileConfig>,
    pub catalog: Option<CatalogFileConfig>,
    #[serde(flatten)]
    pub extra: serde_json::Value,
}

impl FileConfig {
    /// Load configuration from a JSON file
    fn load_from_file(path: &Path) -> Result<Self> {
        tracing::debug!(path = %path.display(), "Loading config file");
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        tracing::trace!(config = ?config, "Parsed config file");
        Ok(config)
    }

    /// Warn about unknown fields in the config
    fn warn_unknown_fields(&self) {
        if let serde_json::Value::Object(map) = &self.extra
            && !map.is_empty()
        {
            let keys_str: String = map
                .keys()
                .map(|k| k.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            tracing::warn!(
                fields = %keys_str,
                "Unknown fields in config file (possible typos)"
            );
        }
    }

    /// Merge another FileConfig into this one (other takes precedence)
    fn merge(&mut self, other: FileConfig) {
        if let Some(server) = other.server {
            let current = self.server.get_or_insert_with(ServerFileConfig::default);
            if server.host.is_some() {
                tracing::trace!(host = ?server.host, "Merging server.host");
                current.host = server.host;
            }
            if server.port.is_some() {
                tracing::trace!(port = ?server.port, "Merging server.port");
                current.port = server.port;
            }
        }

        if let Some(catalog) = other.catalog {
            let current = self.catalog.get_or_insert_with(CatalogFileConfig::default);
            if catalog.dataset.is_some() {
                tracing::trace!(dataset = ?catalog.dataset, "Merging catalog.dataset");
                current.dataset = catalog.dataset;
            }
        }
    }
}

// =============================================================================
// Runtime Config Structs (final merged configuration)
// =============================================================================

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Catalog configuration
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    pub dataset_path: PathBuf,
}

/// Final merged application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub catalog: CatalogConfig,
}

/// Default dataset location: working directory, falling back to its
/// parent (the layout the ingestion pipeline writes into)
fn default_dataset_path() -> PathBuf {
    let local = PathBuf::from(DATASET_FILE_NAME);
    if local.exists() {
        return local;
    }
    let parent = Path::new("..").join(DATASET_FILE_NAME);
    if parent.exists() { parent } else { local }
}

impl AppConfig {
    /// Load configuration from all sources
    ///
    /// Priority (lowest to highest):
    /// 1. Defaults
    /// 2. Local directory config OR CLI-specified config path
    /// 3. CLI arguments (which include env var fallbacks via clap)
    pub fn load(cli: &CliConfig) -> Result<Self> {
        tracing::debug!("Loading application configuration");
        tracing::trace!(cli = ?cli, "CLI config");

        let mut file_config = FileConfig::default();

        let overlay_path = if let Some(ref path) = cli.config {
            if !path.exists() {
                anyhow::bail!("Config file not found: {}", path.display());
            }
            Some(path.clone())
        } else {
            let local = PathBuf::from(CONFIG_FILE_NAME);
            if local.exists() { Some(local) } else { None }
        };

        if let Some(path) = overlay_path {
            let overlay = FileConfig::load_from_file(&path)?;
            overlay.warn_unknown_fields();
            file_config.merge(overlay);
            tracing::debug!(path = %path.display(), "Config file loaded");
        }

        let file_server = file_config.server.unwrap_or_default();
        let file_catalog = file_config.catalog.unwrap_or_default();

        let host = cli
            .host
            .clone()
            .or(file_server.host)
            .unwrap_or_else(|| DEFAULT_HOST.to_string());
        host.parse::<std::net::IpAddr>()
            .with_context(|| format!("Invalid host address: {host}"))?;

        let port = cli.port.or(file_server.port).unwrap_or(DEFAULT_PORT);

        let dataset_path = cli
            .dataset
            .clone()
            .or(file_catalog.dataset)
            .unwrap_or_else(default_dataset_path);

        Ok(Self {
            server: ServerConfig { host, port },
            catalog: CatalogConfig { dataset_path },
        })
    }
}
