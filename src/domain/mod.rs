// Market data domain (tickers, bars, windows)
pub mod market;

// Feature schema and assembly
pub mod ml;

// Port interfaces
pub mod ports;

// Prediction labels and results
pub mod prediction;

// Domain-specific error types
pub mod errors;
