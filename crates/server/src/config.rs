use std::path::PathBuf;

use anyhow::Context;
use serde::Deserialize;
use tally_import::HeaderMode;

/// Server configuration, loadable from a TOML file. Every field has a
/// default so a missing or partial file still yields a working server.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: String,
    /// Request body cap for uploads, in bytes.
    pub max_upload_bytes: usize,
    /// Header resolution strategy for CSV uploads.
    pub header_mode: HeaderMode,
    /// Optional TOML keyword table replacing the built-in one.
    pub keyword_table_path: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:3000".to_string(),
            max_upload_bytes: 16 * 1024 * 1024,
            header_mode: HeaderMode::SynonymSearch,
            keyword_table_path: None,
        }
    }
}

impl ServerConfig {
    /// Load from the file named by `TALLY_CONFIG`, or fall back to defaults
    /// when the variable is unset.
    pub fn load() -> anyhow::Result<Self> {
        match std::env::var_os("TALLY_CONFIG") {
            Some(path) => {
                let content = std::fs::read_to_string(&path)
                    .with_context(|| format!("reading config file {}", path.to_string_lossy()))?;
                toml::from_str(&content).context("parsing config file")
            }
            None => Ok(Self::default()),
        }
    }
}
