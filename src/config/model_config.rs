//! Model artifact configuration parsing from environment variables.

use std::env;
use std::path::PathBuf;

pub const DEFAULT_MODEL_PATH: &str = "final_time_series_model.json";

/// Where the classifier artifact lives locally and where to fetch it from.
#[derive(Debug, Clone)]
pub struct ModelEnvConfig {
    /// Downloaded only when `path` does not exist.
    pub url: Option<String>,
    pub path: PathBuf,
    /// Optional side file overriding the schema embedded in the artifact.
    pub schema_path: Option<PathBuf>,
}

impl Default for ModelEnvConfig {
    fn default() -> Self {
        Self {
            url: None,
            path: PathBuf::from(DEFAULT_MODEL_PATH),
            schema_path: None,
        }
    }
}

impl ModelEnvConfig {
    pub fn from_env() -> Self {
        Self {
            url: env::var("MODEL_URL").ok().filter(|u| !u.trim().is_empty()),
            path: env::var("MODEL_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_MODEL_PATH)),
            schema_path: env::var("MODEL_SCHEMA_PATH")
                .ok()
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
        }
    }
}
