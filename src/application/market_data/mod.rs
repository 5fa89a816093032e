pub mod fetcher;

pub use fetcher::{fetch_latest_bar, fetch_universe};
