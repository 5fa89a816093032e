//! Pipeline configuration parsing from environment variables.
//!
//! This module handles the fetch window policy and HTTP timeouts.

use anyhow::{Context, Result};
use std::env;
use std::time::Duration;

/// Longest accepted `LOOKBACK_DAYS`: one calendar year.
pub const MAX_LOOKBACK_DAYS: u32 = 366;

/// Pipeline environment configuration
#[derive(Debug, Clone)]
pub struct PipelineEnvConfig {
    /// Calendar days ending on the selected date (inclusive) to search for the latest bar.
    pub lookback_days: u32,
    pub http_timeout: Duration,
}

impl Default for PipelineEnvConfig {
    fn default() -> Self {
        Self {
            lookback_days: 1,
            http_timeout: Duration::from_secs(30),
        }
    }
}

impl PipelineEnvConfig {
    pub fn from_env() -> Result<Self> {
        let lookback_days = env::var("LOOKBACK_DAYS")
            .unwrap_or_else(|_| "1".to_string())
            .parse::<u32>()
            .context("Failed to parse LOOKBACK_DAYS")?;
        let lookback_days = validate_lookback(lookback_days)?;

        let timeout_secs = env::var("HTTP_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".to_string())
            .parse::<u64>()
            .context("Failed to parse HTTP_TIMEOUT_SECS")?;

        Ok(Self {
            lookback_days,
            http_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

fn validate_lookback(days: u32) -> Result<u32> {
    if !(1..=MAX_LOOKBACK_DAYS).contains(&days) {
        anyhow::bail!(
            "LOOKBACK_DAYS must be between 1 and {}, got {}",
            MAX_LOOKBACK_DAYS,
            days
        );
    }
    Ok(days)
}
