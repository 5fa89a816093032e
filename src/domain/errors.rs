use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while obtaining the classifier artifact.
///
/// `Clone` because the loader caches the first outcome, failures included,
/// and hands the same error to every later caller.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    #[error("Model artifact not found at {path} and no download URL is configured")]
    MissingSource { path: PathBuf },

    #[error("Failed to download model artifact from {url}: {reason}")]
    Download { url: String, reason: String },

    #[error("Failed to read model artifact {path}: {reason}")]
    Io { path: PathBuf, reason: String },

    #[error("Failed to deserialize model artifact {path}: {reason}")]
    Deserialization { path: PathBuf, reason: String },

    #[error("Feature schema has {schema_width} fields but the classifier expects {input_width}")]
    SchemaMismatch {
        schema_width: usize,
        input_width: usize,
    },
}

/// Errors related to market data and connectivity.
/// An empty answer is not an error; see `FetchOutcome::NoData`.
#[derive(Debug, Error)]
pub enum MarketDataError {
    #[error("Request for {symbol} failed: {reason}")]
    Request { symbol: String, reason: String },

    #[error("Market data API error for {symbol} ({status}): {body}")]
    Api {
        symbol: String,
        status: u16,
        body: String,
    },

    #[error("Invalid market data for {symbol}: {reason}")]
    InvalidData { symbol: String, reason: String },

    #[error("Invalid request: {reason}")]
    InvalidRequest { reason: String },
}

/// Errors around a single predict call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PredictionError {
    #[error("Row {row} has {actual} features, classifier expects {expected}")]
    SchemaMismatch {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Classifier contract violated: {0}")]
    ContractViolation(String),

    #[error("Classifier failed: {0}")]
    Backend(String),
}

/// Anything that ends a user-triggered run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    MarketData(#[from] MarketDataError),

    #[error(transparent)]
    Prediction(#[from] PredictionError),

    #[error("Nothing to predict: fetch data for a trading day first")]
    NothingFetched,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_mismatch_formatting() {
        let err = ModelError::SchemaMismatch {
            schema_width: 6,
            input_width: 5,
        };
        let msg = err.to_string();
        assert!(msg.contains("6 fields"));
        assert!(msg.contains("expects 5"));
    }

    #[test]
    fn test_pipeline_error_is_transparent() {
        let err: PipelineError = PredictionError::SchemaMismatch {
            row: 3,
            expected: 5,
            actual: 4,
        }
        .into();
        assert_eq!(err.to_string(), "Row 3 has 4 features, classifier expects 5");
    }

    #[test]
    fn test_market_data_error_formatting() {
        let err = MarketDataError::Api {
            symbol: "AAPL".to_string(),
            status: 429,
            body: "Too Many Requests".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("AAPL"));
        assert!(msg.contains("429"));
    }
}
