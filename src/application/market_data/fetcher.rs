use crate::domain::errors::MarketDataError;
use crate::domain::market::bar::{DailyBar, FetchOutcome, TickerBar};
use crate::domain::market::ticker::TickerSymbol;
use crate::domain::market::window::DateWindow;
use crate::domain::ports::MarketDataService;
use tracing::{debug, info, warn};

/// Latest bar of `ticker` inside `window`, or `None` when the provider has
/// nothing for it (holiday, weekend, no trade).
pub async fn fetch_latest_bar(
    service: &dyn MarketDataService,
    ticker: TickerSymbol,
    window: DateWindow,
) -> Result<Option<DailyBar>, MarketDataError> {
    if window.is_empty() {
        return Ok(None);
    }

    let bars = service.get_daily_bars(ticker, window).await?;
    let received = bars.len();

    // Providers are loose about range edges; only trust rows inside the window.
    let latest = bars
        .into_iter()
        .filter(|b| window.contains(b.date))
        .max_by_key(|b| b.date);

    debug!(
        "Fetcher: {} returned {} rows for {} in {}, latest {:?}",
        service.name(),
        received,
        ticker,
        window,
        latest.map(|b| b.date)
    );

    Ok(latest)
}

/// Fetches the latest bar for every ticker, one request at a time.
/// The first provider error aborts the whole fetch; no partial result is returned.
pub async fn fetch_universe(
    service: &dyn MarketDataService,
    tickers: &[TickerSymbol],
    window: DateWindow,
) -> Result<FetchOutcome, MarketDataError> {
    info!(
        "Fetcher: Fetching {} tickers from {} for {}",
        tickers.len(),
        service.name(),
        window
    );

    let mut bars = Vec::with_capacity(tickers.len());
    let mut missing = Vec::new();

    for &ticker in tickers {
        match fetch_latest_bar(service, ticker, window).await? {
            Some(bar) => bars.push(TickerBar { ticker, bar }),
            None => missing.push(ticker),
        }
    }

    if bars.is_empty() {
        warn!("Fetcher: No bars for any ticker in {}", window);
    } else if !missing.is_empty() {
        warn!(
            "Fetcher: No data for {} ticker(s): {}",
            missing.len(),
            missing
                .iter()
                .map(|t| t.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );
    }

    info!("Fetcher: {} of {} tickers have data", bars.len(), tickers.len());
    Ok(FetchOutcome::from_parts(window, bars, missing))
}
