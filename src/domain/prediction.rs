use crate::domain::errors::PredictionError;
use crate::domain::market::ticker::TickerSymbol;
use chrono::NaiveDate;
use serde::{Serialize, Serializer};
use std::fmt;

/// Binary next-day direction produced by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PredictionLabel {
    Falls,
    Rises,
}

impl PredictionLabel {
    /// Maps the raw classifier output. Anything outside {0, 1} breaks the model contract.
    pub fn from_raw(raw: i64) -> Result<Self, PredictionError> {
        match raw {
            0 => Ok(PredictionLabel::Falls),
            1 => Ok(PredictionLabel::Rises),
            other => Err(PredictionError::ContractViolation(format!(
                "label {} is outside {{0, 1}}",
                other
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PredictionLabel::Falls => "falls",
            PredictionLabel::Rises => "rises",
        }
    }
}

impl fmt::Display for PredictionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for PredictionLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionResult {
    pub ticker: TickerSymbol,
    pub date: NaiveDate,
    pub close: f64,
    pub label: PredictionLabel,
}
