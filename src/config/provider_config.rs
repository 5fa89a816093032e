//! Market-data provider configuration parsing from environment variables.
//!
//! This module handles loading endpoints and credentials for:
//! - Yahoo Finance (default, no credentials)
//! - Alpaca (stock bars, API key pair)

use std::env;

const YAHOO_BASE_URL: &str = "https://query1.finance.yahoo.com";
const ALPACA_DATA_URL: &str = "https://data.alpaca.markets";
const ALPACA_FEED: &str = "iex";

/// Yahoo Finance chart API configuration
#[derive(Debug, Clone)]
pub struct YahooConfig {
    pub base_url: String,
}

impl YahooConfig {
    pub fn from_env() -> Self {
        Self {
            base_url: env::var("YAHOO_BASE_URL")
                .unwrap_or_else(|_| YAHOO_BASE_URL.to_string()),
        }
    }
}

impl Default for YahooConfig {
    fn default() -> Self {
        Self {
            base_url: YAHOO_BASE_URL.to_string(),
        }
    }
}

/// Alpaca API configuration
#[derive(Debug, Clone)]
pub struct AlpacaConfig {
    pub api_key: String,
    pub secret_key: String,
    pub data_url: String,
    pub feed: String,
}

impl AlpacaConfig {
    pub fn from_env() -> Self {
        Self {
            api_key: env::var("ALPACA_API_KEY").unwrap_or_default(),
            secret_key: env::var("ALPACA_SECRET_KEY").unwrap_or_default(),
            data_url: env::var("ALPACA_DATA_URL").unwrap_or_else(|_| ALPACA_DATA_URL.to_string()),
            feed: env::var("ALPACA_FEED").unwrap_or_else(|_| ALPACA_FEED.to_string()),
        }
    }
}

impl Default for AlpacaConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            secret_key: String::new(),
            data_url: ALPACA_DATA_URL.to_string(),
            feed: ALPACA_FEED.to_string(),
        }
    }
}

/// Aggregated provider configuration
#[derive(Debug, Clone, Default)]
pub struct ProviderEnvConfig {
    pub yahoo: YahooConfig,
    pub alpaca: AlpacaConfig,
}

impl ProviderEnvConfig {
    pub fn from_env() -> Self {
        Self {
            yahoo: YahooConfig::from_env(),
            alpaca: AlpacaConfig::from_env(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yahoo_config_defaults() {
        let config = YahooConfig::from_env();
        assert!(config.base_url.contains("finance.yahoo.com"));
    }

    #[test]
    fn test_alpaca_config_defaults() {
        let config = AlpacaConfig::from_env();
        assert!(config.data_url.contains("data.alpaca.markets"));
        assert_eq!(config.feed, "iex");
    }
}
