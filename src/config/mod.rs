//! Configuration module for dowcast.
//!
//! This module provides structured configuration loading from environment variables,
//! organized by concern: Provider, Model, Pipeline, and Observability.

mod model_config;
mod observability_config;
mod pipeline_config;
mod provider_config;

pub use model_config::{DEFAULT_MODEL_PATH, ModelEnvConfig};
pub use observability_config::{LogFormat, ObservabilityEnvConfig};
pub use pipeline_config::{MAX_LOOKBACK_DAYS, PipelineEnvConfig};
pub use provider_config::{AlpacaConfig, ProviderEnvConfig, YahooConfig};

use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Market-data backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataProvider {
    Yahoo,
    Alpaca,
    Mock,
}

impl FromStr for DataProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "yahoo" => Ok(DataProvider::Yahoo),
            "alpaca" => Ok(DataProvider::Alpaca),
            "mock" => Ok(DataProvider::Mock),
            _ => anyhow::bail!(
                "Invalid DATA_PROVIDER: {}. Must be 'yahoo', 'alpaca', or 'mock'",
                s
            ),
        }
    }
}

/// Main application configuration.
///
/// This struct aggregates all configuration from sub-modules.
#[derive(Debug, Clone)]
pub struct Config {
    // Core
    pub provider: DataProvider,

    // Provider (from ProviderEnvConfig)
    pub yahoo_base_url: String,
    pub alpaca_api_key: String,
    pub alpaca_secret_key: String,
    pub alpaca_data_url: String,
    pub alpaca_feed: String,

    // Model (from ModelEnvConfig)
    pub model_url: Option<String>,
    pub model_path: PathBuf,
    pub model_schema_path: Option<PathBuf>,

    // Pipeline (from PipelineEnvConfig)
    pub lookback_days: u32,
    pub http_timeout: Duration,

    // Observability (from ObservabilityEnvConfig)
    pub log_format: LogFormat,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// This orchestrates loading from all sub-config modules and composes
    /// them into a unified Config struct.
    pub fn from_env() -> Result<Self> {
        let provider_str = env::var("DATA_PROVIDER").unwrap_or_else(|_| "yahoo".to_string());
        let provider = DataProvider::from_str(&provider_str)?;

        let providers = ProviderEnvConfig::from_env();
        let model = ModelEnvConfig::from_env();
        let pipeline = PipelineEnvConfig::from_env().context("Failed to load pipeline config")?;
        let observability =
            ObservabilityEnvConfig::from_env().context("Failed to load observability config")?;

        Ok(Self::compose(provider, providers, model, pipeline, observability))
    }

    fn compose(
        provider: DataProvider,
        providers: ProviderEnvConfig,
        model: ModelEnvConfig,
        pipeline: PipelineEnvConfig,
        observability: ObservabilityEnvConfig,
    ) -> Self {
        Self {
            provider,

            yahoo_base_url: providers.yahoo.base_url,
            alpaca_api_key: providers.alpaca.api_key,
            alpaca_secret_key: providers.alpaca.secret_key,
            alpaca_data_url: providers.alpaca.data_url,
            alpaca_feed: providers.alpaca.feed,

            model_url: model.url,
            model_path: model.path,
            model_schema_path: model.schema_path,

            lookback_days: pipeline.lookback_days,
            http_timeout: pipeline.http_timeout,

            log_format: observability.log_format,
        }
    }

    /// Offline configuration: mock market data and a local artifact path.
    pub fn mock(model_path: impl Into<PathBuf>) -> Self {
        let model = ModelEnvConfig {
            path: model_path.into(),
            ..ModelEnvConfig::default()
        };
        Self::compose(
            DataProvider::Mock,
            ProviderEnvConfig::default(),
            model,
            PipelineEnvConfig::default(),
            ObservabilityEnvConfig::default(),
        )
    }
}
