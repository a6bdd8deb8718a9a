//! Configuration loading and parsing

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use turnover_core::output::ale::AleHeader;
use turnover_core::output::DEFAULT_COLUMNS;
use turnover_core::ReconcileConfig;

/// Main application configuration (loaded from turnover.toml)
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub reconcile: ReconcileConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct OutputConfig {
    /// CSV/ALE columns; `None` writes the default set
    pub columns: Option<Vec<String>>,
    /// Write a SubCap caption file next to the CSV
    #[serde(default)]
    pub subcap: bool,
    /// ALE destination
    pub ale: Option<PathBuf>,
    #[serde(default)]
    pub ale_header: AleHeader,
}

impl OutputConfig {
    /// Columns to write
    pub fn columns(&self) -> Vec<String> {
        match &self.columns {
            Some(columns) if !columns.is_empty() => columns.clone(),
            _ => DEFAULT_COLUMNS.iter().map(|c| c.to_string()).collect(),
        }
    }
}

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: AppConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    Ok(config)
}
