use super::ticker::TickerSymbol;
use super::window::DateWindow;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One daily OHLCV row as returned by a market-data provider.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl DailyBar {
    /// Reads a raw field by name. Matching is case-insensitive so both
    /// `close` and `Close` resolve; anything else is not carried by a bar.
    pub fn field(&self, name: &str) -> Option<f64> {
        match name.to_ascii_lowercase().as_str() {
            "open" => Some(self.open),
            "high" => Some(self.high),
            "low" => Some(self.low),
            "close" => Some(self.close),
            "volume" => Some(self.volume),
            _ => None,
        }
    }
}

/// The most recent bar of a ticker inside the requested window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TickerBar {
    pub ticker: TickerSymbol,
    pub bar: DailyBar,
}

/// Bars gathered for the universe in one fetch. Never empty.
#[derive(Debug, Clone)]
pub struct FetchedBars {
    window: DateWindow,
    bars: Vec<TickerBar>,
    missing: Vec<TickerSymbol>,
}

impl FetchedBars {
    /// Returns `None` when `bars` is empty: that case is [`FetchOutcome::NoData`].
    pub fn new(window: DateWindow, bars: Vec<TickerBar>, missing: Vec<TickerSymbol>) -> Option<Self> {
        if bars.is_empty() {
            return None;
        }
        Some(Self {
            window,
            bars,
            missing,
        })
    }

    pub fn window(&self) -> DateWindow {
        self.window
    }

    pub fn bars(&self) -> &[TickerBar] {
        &self.bars
    }

    /// Tickers the provider returned nothing for.
    pub fn missing(&self) -> &[TickerSymbol] {
        &self.missing
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// Bars ordered by ticker ascending.
    pub fn sorted(&self) -> Vec<TickerBar> {
        let mut bars = self.bars.clone();
        bars.sort_by_key(|b| b.ticker);
        bars
    }
}

/// Result of a universe fetch. A closed market is `NoData`, never an error.
#[derive(Debug, Clone)]
pub enum FetchOutcome {
    NoData { window: DateWindow },
    Bars(FetchedBars),
}

impl FetchOutcome {
    pub fn from_parts(window: DateWindow, bars: Vec<TickerBar>, missing: Vec<TickerSymbol>) -> Self {
        match FetchedBars::new(window, bars, missing) {
            Some(fetched) => FetchOutcome::Bars(fetched),
            None => FetchOutcome::NoData { window },
        }
    }

    pub fn window(&self) -> DateWindow {
        match self {
            FetchOutcome::NoData { window } => *window,
            FetchOutcome::Bars(fetched) => fetched.window(),
        }
    }
}
