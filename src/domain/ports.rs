use crate::domain::errors::{MarketDataError, ModelError};
use crate::domain::market::bar::DailyBar;
use crate::domain::market::ticker::TickerSymbol;
use crate::domain::market::window::DateWindow;
use async_trait::async_trait;
use std::path::Path;

#[async_trait]
pub trait MarketDataService: Send + Sync {
    /// Daily bars for `symbol` inside the half-open `window`, in any order.
    /// An empty vector means the market had no session for that ticker in the window.
    async fn get_daily_bars(
        &self,
        symbol: TickerSymbol,
        window: DateWindow,
    ) -> Result<Vec<DailyBar>, MarketDataError>;

    /// Provider name for logs.
    fn name(&self) -> &str;
}

/// Where the classifier artifact comes from when it is not on disk yet.
#[async_trait]
pub trait ArtifactSource: Send + Sync {
    /// Stores the artifact at `destination`. Either the whole file lands or nothing does.
    async fn download(&self, destination: &Path) -> Result<(), ModelError>;
}
