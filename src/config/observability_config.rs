//! Logging configuration parsing from environment variables.
//!
//! The filter itself comes from `RUST_LOG`; this only picks the output style.

use std::env;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    Pretty,
    #[default]
    Compact,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "compact" => Ok(LogFormat::Compact),
            _ => anyhow::bail!("Invalid LOG_FORMAT: {}. Must be 'pretty' or 'compact'", s),
        }
    }
}

/// Observability environment configuration
#[derive(Debug, Clone, Default)]
pub struct ObservabilityEnvConfig {
    pub log_format: LogFormat,
}

impl ObservabilityEnvConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let log_format = match env::var("LOG_FORMAT") {
            Ok(v) => LogFormat::from_str(&v)?,
            Err(_) => LogFormat::default(),
        };
        Ok(Self { log_format })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_parsing() {
        assert_eq!(LogFormat::from_str("PRETTY").unwrap(), LogFormat::Pretty);
        assert_eq!(LogFormat::from_str("compact").unwrap(), LogFormat::Compact);
        assert!(LogFormat::from_str("json").is_err());
    }
}
