use chrono::{Days, NaiveDate};
use serde::Serialize;
use std::fmt;

/// Half-open calendar window `[start, end_exclusive)` used to query daily bars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end_exclusive: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end_exclusive: NaiveDate) -> Self {
        Self {
            start,
            end_exclusive,
        }
    }

    /// Window ending on `target` (inclusive) and reaching `lookback_days - 1` days back.
    /// A lookback of 0 is treated as 1.
    pub fn ending_on(target: NaiveDate, lookback_days: u32) -> Self {
        let back = u64::from(lookback_days.max(1) - 1);
        let start = target.checked_sub_days(Days::new(back)).unwrap_or(target);
        let end_exclusive = target.checked_add_days(Days::new(1)).unwrap_or(target);
        Self::new(start, end_exclusive)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date < self.end_exclusive
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end_exclusive
    }

    /// Last calendar day inside the window.
    pub fn last_day(&self) -> NaiveDate {
        self.end_exclusive.pred_opt().unwrap_or(self.start)
    }
}

impl fmt::Display for DateWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.last_day() {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}..={}", self.start, self.last_day())
        }
    }
}
