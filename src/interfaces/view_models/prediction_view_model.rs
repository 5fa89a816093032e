use crate::domain::market::bar::TickerBar;
use crate::domain::prediction::PredictionResult;
use tabled::Tabled;

/// One table line of a prediction report.
#[derive(Debug, Clone, PartialEq, Eq, Tabled)]
pub struct PredictionRow {
    #[tabled(rename = "Ticker")]
    pub ticker: String,
    #[tabled(rename = "Date")]
    pub date: String,
    #[tabled(rename = "Close")]
    pub close: String,
    #[tabled(rename = "Prediction")]
    pub label: String,
}

impl From<&PredictionResult> for PredictionRow {
    fn from(r: &PredictionResult) -> Self {
        Self {
            ticker: r.ticker.to_string(),
            date: r.date.to_string(),
            close: format!("{:.2}", r.close),
            label: r.label.to_string(),
        }
    }
}

/// One table line of a fetch listing.
#[derive(Debug, Clone, PartialEq, Eq, Tabled)]
pub struct BarRow {
    #[tabled(rename = "Ticker")]
    pub ticker: String,
    #[tabled(rename = "Date")]
    pub date: String,
    #[tabled(rename = "Open")]
    pub open: String,
    #[tabled(rename = "High")]
    pub high: String,
    #[tabled(rename = "Low")]
    pub low: String,
    #[tabled(rename = "Close")]
    pub close: String,
    #[tabled(rename = "Volume")]
    pub volume: String,
}

impl From<&TickerBar> for BarRow {
    fn from(tb: &TickerBar) -> Self {
        Self {
            ticker: tb.ticker.to_string(),
            date: tb.bar.date.to_string(),
            open: format!("{:.2}", tb.bar.open),
            high: format!("{:.2}", tb.bar.high),
            low: format!("{:.2}", tb.bar.low),
            close: format!("{:.2}", tb.bar.close),
            volume: format!("{:.0}", tb.bar.volume),
        }
    }
}
