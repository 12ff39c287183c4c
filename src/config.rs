use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub(crate) const CONFIG_FILE_NAME: &str = "config.json";
pub(crate) const DB_FILE_NAME: &str = "expensetui.db";
pub(crate) const LOG_FILE_NAME: &str = "expensetui.log";

const DEFAULT_CURRENCY: &str = "₹";
const DEFAULT_EXPENSE_TYPES: &[&str] = &[
    "Food",
    "Travel",
    "Shopping",
    "Bills",
    "Entertainment",
    "Health",
    "Other",
];

/// User preferences read from `config.json`. Every field is optional in the
/// file; missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub(crate) struct Config {
    /// Symbol printed before amounts.
    pub(crate) currency: String,
    /// Choices offered for an expense's type, in display order.
    pub(crate) expense_types: Vec<String>,
    /// Directory exports land in when no path is given.
    pub(crate) export_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            currency: DEFAULT_CURRENCY.into(),
            expense_types: DEFAULT_EXPENSE_TYPES.iter().map(|s| s.to_string()).collect(),
            export_dir: home_dir(),
        }
    }
}

impl Config {
    /// Load from `path`. A missing file yields the defaults; a malformed one
    /// is an error.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config: Self = serde_json::from_str(&data)
            .with_context(|| format!("Invalid config file: {}", path.display()))?;
        debug!("Loaded config from {}", path.display());
        Ok(config.normalized())
    }

    pub(crate) fn default_path() -> Result<PathBuf> {
        Ok(project_dirs()?.config_dir().join(CONFIG_FILE_NAME))
    }

    fn normalized(mut self) -> Self {
        self.expense_types = self
            .expense_types
            .into_iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();
        if self.expense_types.is_empty() {
            warn!("Config lists no expense types, using defaults");
            self.expense_types = Self::default().expense_types;
        }
        self.export_dir = crate::export::expand_home(&self.export_dir);
        self
    }
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("com", "expensetui", "ExpenseTUI")
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))
}

fn home_dir() -> PathBuf {
    directories::UserDirs::new()
        .map(|d| d.home_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Platform data directory, created on first use.
pub(crate) fn data_dir() -> Result<PathBuf> {
    let dirs = project_dirs()?;
    let data_dir = dirs.data_dir();
    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;
    Ok(data_dir.to_path_buf())
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
