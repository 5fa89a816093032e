use crate::application::market_data::fetcher::fetch_universe;
use crate::application::ml::model_loader::{LoadedModel, ModelLoader};
use crate::application::ml::predictor::predict_labels;
use crate::domain::errors::{PipelineError, PredictionError};
use crate::domain::market::bar::{FetchOutcome, FetchedBars, TickerBar};
use crate::domain::market::ticker::{TickerSymbol, universe};
use crate::domain::market::window::DateWindow;
use crate::domain::ml::feature_registry::{FeatureVector, assemble, missing_fields};
use crate::domain::ports::MarketDataService;
use crate::domain::prediction::{PredictionLabel, PredictionResult};
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Where a user-triggered run currently stands.
/// Every action starts again from `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Fetching,
    NoData,
    Fetched,
    Predicting,
    Failed,
    Presented,
}

/// Predictions for one fetched window, sorted by ticker.
#[derive(Debug, Clone)]
pub struct PredictionReport {
    pub window: DateWindow,
    pub results: Vec<PredictionResult>,
    pub missing: Vec<TickerSymbol>,
    pub model: String,
}

#[derive(Debug, Clone)]
pub enum RunOutcome {
    /// Nothing traded in the window; prediction was skipped.
    NoData { window: DateWindow },
    Presented(PredictionReport),
}

/// Assembles one feature row per bar and labels them.
/// Output is sorted by ticker regardless of input order.
pub fn predict_bars(
    model: &LoadedModel,
    bars: &[TickerBar],
) -> Result<Vec<PredictionResult>, PredictionError> {
    let schema = model.schema();
    let rows: Vec<FeatureVector> = bars
        .iter()
        .map(|tb| {
            let absent = missing_fields(&tb.bar, schema);
            if !absent.is_empty() {
                debug!("Session: {} zero-filled fields {:?}", tb.ticker, absent);
            }
            assemble(&tb.bar, schema)
        })
        .collect();

    let labels = predict_labels(model.classifier(), &rows)?;

    let mut results: Vec<PredictionResult> = bars
        .iter()
        .zip(labels)
        .map(|(tb, label)| PredictionResult {
            ticker: tb.ticker,
            date: tb.bar.date,
            close: tb.bar.close,
            label,
        })
        .collect();
    results.sort_by_key(|r| r.ticker);
    Ok(results)
}

/// One user's sequence of fetch / predict actions.
///
/// The session keeps the last successful fetch so `predict` can run as a
/// separate step. The model is shared: it is loaded by the loader once and
/// only read here.
pub struct PredictionSession {
    market_data: Arc<dyn MarketDataService>,
    model: Arc<ModelLoader>,
    tickers: Vec<TickerSymbol>,
    lookback_days: u32,
    state: RunState,
    last_fetch: Option<FetchedBars>,
}

impl PredictionSession {
    pub fn new(market_data: Arc<dyn MarketDataService>, model: Arc<ModelLoader>, lookback_days: u32) -> Self {
        Self {
            market_data,
            model,
            tickers: universe().to_vec(),
            lookback_days,
            state: RunState::Idle,
            last_fetch: None,
        }
    }

    pub fn with_tickers(mut self, tickers: Vec<TickerSymbol>) -> Self {
        self.tickers = tickers;
        self
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn last_fetch(&self) -> Option<&FetchedBars> {
        self.last_fetch.as_ref()
    }

    pub fn window_for(&self, date: NaiveDate) -> DateWindow {
        DateWindow::ending_on(date, self.lookback_days)
    }

    fn transition(&mut self, next: RunState) {
        debug!("Session: {:?} -> {:?}", self.state, next);
        self.state = next;
    }

    /// Fetch action. Replaces the retained bars; a no-data or failed fetch clears them.
    pub async fn fetch(&mut self, date: NaiveDate) -> Result<FetchOutcome, PipelineError> {
        self.transition(RunState::Idle);
        self.transition(RunState::Fetching);
        self.last_fetch = None;

        let window = self.window_for(date);
        match fetch_universe(self.market_data.as_ref(), &self.tickers, window).await {
            Ok(FetchOutcome::NoData { window }) => {
                warn!("Session: Market closed for {}", window);
                self.transition(RunState::NoData);
                Ok(FetchOutcome::NoData { window })
            }
            Ok(FetchOutcome::Bars(fetched)) => {
                self.transition(RunState::Fetched);
                self.last_fetch = Some(fetched.clone());
                Ok(FetchOutcome::Bars(fetched))
            }
            Err(e) => {
                self.transition(RunState::Failed);
                Err(e.into())
            }
        }
    }

    /// Predict action over the bars kept by the last fetch.
    pub async fn predict(&mut self) -> Result<PredictionReport, PipelineError> {
        self.transition(RunState::Idle);

        let Some(fetched) = self.last_fetch.clone() else {
            self.transition(RunState::Failed);
            return Err(PipelineError::NothingFetched);
        };

        self.transition(RunState::Predicting);
        match self.predict_fetched(&fetched).await {
            Ok(report) => {
                self.transition(RunState::Presented);
                Ok(report)
            }
            Err(e) => {
                self.transition(RunState::Failed);
                Err(e)
            }
        }
    }

    /// Fetch and predict in one action.
    pub async fn run(&mut self, date: NaiveDate) -> Result<RunOutcome, PipelineError> {
        match self.fetch(date).await? {
            FetchOutcome::NoData { window } => Ok(RunOutcome::NoData { window }),
            FetchOutcome::Bars(_) => Ok(RunOutcome::Presented(self.predict().await?)),
        }
    }

    async fn predict_fetched(&self, fetched: &FetchedBars) -> Result<PredictionReport, PipelineError> {
        let model = self.model.load().await?;
        let results = predict_bars(&model, fetched.bars())?;

        info!(
            "Session: {} predictions for {} ({} rising)",
            results.len(),
            fetched.window(),
            results
                .iter()
                .filter(|r| r.label == PredictionLabel::Rises)
                .count()
        );

        Ok(PredictionReport {
            window: fetched.window(),
            results,
            missing: fetched.missing().to_vec(),
            model: format!(
                "{} {}",
                model.classifier().name(),
                model.classifier().version()
            ),
        })
    }
}
