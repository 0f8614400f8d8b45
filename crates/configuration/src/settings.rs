use crate::error::ConfigError;
use serde::Deserialize;
use std::path::PathBuf;

/// The root configuration structure for the entire application.
///
/// Every section is optional in the file; missing sections fall back to their
/// `Default`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub dataset: Dataset,
    pub dashboard: Dashboard,
    pub export: Export,
    pub logging: Logging,
}

/// Where the order dataset is loaded from.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Dataset {
    /// Path to the cleaned order CSV.
    pub path: PathBuf,
}

/// Parameters for the dashboard breakdowns.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Dashboard {
    /// How many products the top-products table shows.
    pub top_n: usize,
}

/// Parameters for the download action.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Export {
    /// The file name offered to the browser.
    pub file_name: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Logging {
    /// An `EnvFilter` directive, e.g. "info" or "analytics=debug". `RUST_LOG` wins if set.
    pub level: String,
    /// When set, logs are also written to a daily rolling file in this directory.
    pub directory: Option<PathBuf>,
    /// Emit JSON lines instead of human-readable text.
    pub json: bool,
}

// --- Default Implementations ---
// These allow a deployment to ship without a config file at all.

impl Default for Dataset {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/cleaned.csv"),
        }
    }
}

impl Default for Dashboard {
    fn default() -> Self {
        Self { top_n: 10 }
    }
}

impl Default for Export {
    fn default() -> Self {
        Self {
            file_name: "filtered_ecommerce_data.csv".to_string(),
        }
    }
}

impl Default for Logging {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: None,
            json: false,
        }
    }
}

impl Config {
    /// Rejects settings the engine cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.dashboard.top_n == 0 {
            return Err(ConfigError::ValidationError(
                "dashboard.top_n must be at least 1".to_string(),
            ));
        }
        if self.export.file_name.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "export.file_name must not be empty".to_string(),
            ));
        }
        if self.dataset.path.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError(
                "dataset.path must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
