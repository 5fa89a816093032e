use crate::domain::errors::MarketDataError;
use crate::domain::market::bar::DailyBar;
use crate::domain::market::ticker::TickerSymbol;
use crate::domain::market::window::DateWindow;
use crate::domain::ports::MarketDataService;
use async_trait::async_trait;
use chrono::{Datelike, Days, NaiveDate, Weekday};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

#[derive(Default)]
struct MockState {
    bars: HashMap<TickerSymbol, Vec<DailyBar>>,
    failing: HashSet<TickerSymbol>,
}

/// In-process market data for offline runs and tests.
///
/// `synthetic()` produces one deterministic bar per weekday for every ticker;
/// `empty()` starts with nothing and is filled with `insert`.
pub struct MockMarketDataService {
    state: Mutex<MockState>,
    synthetic: bool,
    filter_window: bool,
    calls: AtomicUsize,
}

impl MockMarketDataService {
    pub fn empty() -> Self {
        Self {
            state: Mutex::new(MockState::default()),
            synthetic: false,
            filter_window: true,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn synthetic() -> Self {
        Self {
            synthetic: true,
            ..Self::empty()
        }
    }

    /// Returns every stored bar regardless of the requested window,
    /// like providers that round range edges.
    pub fn leaky(mut self) -> Self {
        self.filter_window = false;
        self
    }

    pub fn insert(&self, ticker: TickerSymbol, bar: DailyBar) {
        self.lock().bars.entry(ticker).or_default().push(bar);
    }

    /// Makes every request for `ticker` fail.
    pub fn fail_on(&self, ticker: TickerSymbol) {
        self.lock().failing.insert(ticker);
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl Default for MockMarketDataService {
    fn default() -> Self {
        Self::synthetic()
    }
}

/// Deterministic bar for a weekday; `None` on weekends.
pub fn synthetic_bar(ticker: TickerSymbol, date: NaiveDate) -> Option<DailyBar> {
    if matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
        return None;
    }

    let seed: u32 = ticker.as_str().bytes().map(u32::from).sum();
    let base = 40.0 + f64::from(seed % 400);
    let day = date.num_days_from_ce();
    let swing = f64::from((day.unsigned_abs() * 7 + seed) % 11) - 5.0;

    let open = base * (1.0 + swing / 200.0);
    let close = base * (1.0 + (swing + if day % 2 == 0 { 1.5 } else { -1.5 }) / 200.0);
    Some(DailyBar {
        date,
        open,
        high: open.max(close) * 1.01,
        low: open.min(close) * 0.99,
        close,
        volume: 1_000_000.0 + f64::from(seed) * 1_000.0,
    })
}

#[async_trait]
impl MarketDataService for MockMarketDataService {
    async fn get_daily_bars(
        &self,
        symbol: TickerSymbol,
        window: DateWindow,
    ) -> Result<Vec<DailyBar>, MarketDataError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        let state = self.lock();

        if state.failing.contains(&symbol) {
            return Err(MarketDataError::Request {
                symbol: symbol.to_string(),
                reason: "mock failure".to_string(),
            });
        }

        let mut bars: Vec<DailyBar> = state
            .bars
            .get(&symbol)
            .map(|stored| {
                stored
                    .iter()
                    .filter(|b| !self.filter_window || window.contains(b.date))
                    .copied()
                    .collect()
            })
            .unwrap_or_default();

        if self.synthetic {
            let mut date = window.start;
            while date < window.end_exclusive {
                if let Some(bar) = synthetic_bar(symbol, date) {
                    bars.push(bar);
                }
                match date.checked_add_days(Days::new(1)) {
                    Some(next) => date = next,
                    None => break,
                }
            }
        }

        debug!("MockMarketDataService: {} bars for {} in {}", bars.len(), symbol, window);
        Ok(bars)
    }

    fn name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::market::ticker::DOW_TICKERS;

    #[test]
    fn test_synthetic_bar_skips_weekends() {
        let saturday = NaiveDate::from_ymd_opt(2025, 3, 15).unwrap();
        let monday = NaiveDate::from_ymd_opt(2025, 3, 17).unwrap();
        assert!(synthetic_bar(DOW_TICKERS[0], saturday).is_none());
        let bar = synthetic_bar(DOW_TICKERS[0], monday).unwrap();
        assert!(bar.high >= bar.open.max(bar.close));
        assert!(bar.low <= bar.open.min(bar.close));
        assert!(bar.volume > 0.0);
    }

    #[test]
    fn test_synthetic_bar_is_deterministic() {
        let day = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();
        assert_eq!(synthetic_bar(DOW_TICKERS[5], day), synthetic_bar(DOW_TICKERS[5], day));
    }

    #[tokio::test]
    async fn test_counts_calls() {
        let service = MockMarketDataService::synthetic();
        let window = DateWindow::ending_on(NaiveDate::from_ymd_opt(2025, 3, 14).unwrap(), 3);
        let bars = service.get_daily_bars(DOW_TICKERS[0], window).await.unwrap();
        assert_eq!(bars.len(), 3);
        assert_eq!(service.call_count(), 1);
    }

    #[test]
    fn test_failing_ticker_errors() {
        let service = MockMarketDataService::synthetic();
        service.fail_on(DOW_TICKERS[2]);
        let window = DateWindow::ending_on(NaiveDate::from_ymd_opt(2025, 3, 14).unwrap(), 1);

        let result = tokio_test::block_on(service.get_daily_bars(DOW_TICKERS[2], window));
        assert!(result.is_err());
        tokio_test::assert_ok!(tokio_test::block_on(
            service.get_daily_bars(DOW_TICKERS[3], window)
        ));
    }
}
