// Market data retrieval
pub mod market_data;

// Model loading and prediction
pub mod ml;

// User-triggered fetch / predict runs
pub mod session;
