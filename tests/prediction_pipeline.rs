mod common;

use common::{d, trading_day, weekend_day, write_artifact};
use dowcast::application::ml::ModelLoader;
use dowcast::application::session::{PredictionSession, RunOutcome, RunState};
use dowcast::config::Config;
use dowcast::domain::errors::{ModelError, PipelineError};
use dowcast::domain::market::{DailyBar, DOW_TICKERS, FetchOutcome};
use dowcast::domain::ml::{FeatureSchema, assemble};
use dowcast::infrastructure::ServiceFactory;
use dowcast::infrastructure::mock::MockMarketDataService;
use dowcast::interfaces::{OutputFormat, Presenter};
use std::sync::Arc;

fn session_for(config: &Config) -> PredictionSession {
    let market_data = ServiceFactory::create_market_data(config).unwrap();
    let loader = Arc::new(ServiceFactory::create_model_loader(config));
    PredictionSession::new(market_data, loader, config.lookback_days)
}

#[tokio::test]
async fn test_trading_day_predicts_every_ticker_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_artifact(dir.path(), FeatureSchema::canonical(), true);
    let config = Config::mock(path);
    let mut session = session_for(&config);

    let outcome = session.run(trading_day()).await.unwrap();
    let RunOutcome::Presented(report) = &outcome else {
        panic!("expected predictions for a weekday");
    };

    assert_eq!(report.results.len(), 30);
    assert!(report.missing.is_empty());
    let tickers: Vec<&str> = report.results.iter().map(|r| r.ticker.as_str()).collect();
    let mut sorted = tickers.clone();
    sorted.sort();
    assert_eq!(tickers, sorted);
    assert!(report.results.iter().all(|r| r.date == trading_day()));
    assert_eq!(session.state(), RunState::Presented);

    let mut presenter = Presenter::new(Vec::new(), OutputFormat::Csv);
    presenter.present(&outcome).unwrap();
    let csv = String::from_utf8(presenter.into_inner()).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 31);
    assert!(lines[1].starts_with("AAPL,2025-03-14,"));
    assert!(
        lines[1..]
            .iter()
            .all(|l| l.ends_with(",rises") || l.ends_with(",falls"))
    );
}

#[tokio::test]
async fn test_weekend_shows_warning_without_loading_model() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_artifact(dir.path(), FeatureSchema::canonical(), true);
    let config = Config::mock(path);
    let market_data = ServiceFactory::create_market_data(&config).unwrap();
    let loader = Arc::new(ServiceFactory::create_model_loader(&config));
    let mut session = PredictionSession::new(market_data, loader.clone(), 1);

    let outcome = session.run(weekend_day()).await.unwrap();
    assert!(matches!(outcome, RunOutcome::NoData { .. }));
    assert!(!loader.is_initialized());

    let mut presenter = Presenter::new(Vec::new(), OutputFormat::Table);
    presenter.present(&outcome).unwrap();
    let out = String::from_utf8(presenter.into_inner()).unwrap();
    assert_eq!(out.lines().count(), 1);
    assert!(out.contains("WARNING"));
    assert!(out.contains("2025-03-15"));
}

#[tokio::test]
async fn test_missing_artifact_without_url_fails_after_fetch() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::mock(dir.path().join("absent.json"));
    let mut session = session_for(&config);

    let fetched = session.fetch(trading_day()).await.unwrap();
    assert!(matches!(fetched, FetchOutcome::Bars(_)));

    let err = session.predict().await.unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Model(ModelError::MissingSource { .. })
    ));
    assert_eq!(session.state(), RunState::Failed);
}

#[tokio::test]
async fn test_schema_side_file_zero_fills_derived_feature() {
    let dir = tempfile::tempdir().unwrap();
    let schema = FeatureSchema::from_names(2, &["open", "high", "low", "close", "volume", "rsi_14"]);
    let artifact = write_artifact(dir.path(), schema.clone(), false);
    let schema_path = dir.path().join("schema.json");
    std::fs::write(
        &schema_path,
        r#"["open", "high", "low", "close", "volume", "rsi_14"]"#,
    )
    .unwrap();

    let bar = DailyBar {
        date: trading_day(),
        open: 10.0,
        high: 12.0,
        low: 9.0,
        close: 11.0,
        volume: 1000.0,
    };
    let row = assemble(&bar, &schema);
    assert_eq!(row.values.len(), 6);
    assert_eq!(row.values[5], 0.0);

    let loader = Arc::new(ModelLoader::new(artifact, Some(schema_path), None));
    let model = loader.load().await.unwrap();
    assert_eq!(model.schema().len(), 6);

    let mut session = PredictionSession::new(Arc::new(MockMarketDataService::synthetic()), loader, 1);
    match session.run(trading_day()).await.unwrap() {
        RunOutcome::Presented(report) => assert_eq!(report.results.len(), 30),
        RunOutcome::NoData { .. } => panic!("expected predictions"),
    }
}

#[tokio::test]
async fn test_partial_universe_reports_missing_tickers() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_artifact(dir.path(), FeatureSchema::canonical(), true);
    let loader = Arc::new(ModelLoader::new(path, None, None));

    let service = MockMarketDataService::empty();
    let bar = |close: f64| DailyBar {
        date: d(2025, 3, 14),
        open: 100.0,
        high: 101.0,
        low: 99.0,
        close,
        volume: 5_000_000.0,
    };
    service.insert(DOW_TICKERS[1], bar(100.5));
    service.insert(DOW_TICKERS[0], bar(99.5));

    let mut session = PredictionSession::new(Arc::new(service), loader, 1);
    let RunOutcome::Presented(report) = session.run(trading_day()).await.unwrap() else {
        panic!("expected predictions");
    };
    assert_eq!(report.results.len(), 2);
    assert_eq!(report.results[0].ticker, DOW_TICKERS[0]);
    assert_eq!(report.missing.len(), 28);
}
