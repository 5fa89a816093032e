pub mod bar;
pub mod ticker;
pub mod window;

pub use bar::{DailyBar, FetchOutcome, FetchedBars, TickerBar};
pub use ticker::{DOW_TICKERS, TickerSymbol};
pub use window::DateWindow;
