use serde::{Serialize, Serializer};
use std::fmt;

/// The 30 Dow Jones Industrial Average components.
/// Alphabetical; the universe never changes at runtime.
pub const DOW_TICKERS: [TickerSymbol; 30] = [
    TickerSymbol("AAPL"),
    TickerSymbol("AMGN"),
    TickerSymbol("AXP"),
    TickerSymbol("BA"),
    TickerSymbol("CAT"),
    TickerSymbol("CRM"),
    TickerSymbol("CSCO"),
    TickerSymbol("CVX"),
    TickerSymbol("DIS"),
    TickerSymbol("DOW"),
    TickerSymbol("GS"),
    TickerSymbol("HD"),
    TickerSymbol("HON"),
    TickerSymbol("IBM"),
    TickerSymbol("INTC"),
    TickerSymbol("JNJ"),
    TickerSymbol("JPM"),
    TickerSymbol("KO"),
    TickerSymbol("MCD"),
    TickerSymbol("MMM"),
    TickerSymbol("MRK"),
    TickerSymbol("MSFT"),
    TickerSymbol("NKE"),
    TickerSymbol("PG"),
    TickerSymbol("TRV"),
    TickerSymbol("UNH"),
    TickerSymbol("V"),
    TickerSymbol("VZ"),
    TickerSymbol("WBA"),
    TickerSymbol("WMT"),
];

/// A symbol from the fixed Dow Jones universe.
///
/// Instances can only be obtained from [`DOW_TICKERS`] or [`TickerSymbol::parse`],
/// so every value in circulation is a known constituent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TickerSymbol(&'static str);

impl TickerSymbol {
    /// Looks a symbol up in the universe (case-insensitive).
    pub fn parse(symbol: &str) -> Option<Self> {
        let upper = symbol.trim().to_ascii_uppercase();
        DOW_TICKERS.iter().copied().find(|t| t.0 == upper)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for TickerSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

impl Serialize for TickerSymbol {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.0)
    }
}

/// The universe every pipeline run iterates over.
pub fn universe() -> &'static [TickerSymbol] {
    &DOW_TICKERS
}
