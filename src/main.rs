use anyhow::Result;
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use dowcast::application::ml::ModelLoader;
use dowcast::application::session::PredictionSession;
use dowcast::config::{Config, LogFormat};
use dowcast::domain::market::ticker::universe;
use dowcast::infrastructure::ServiceFactory;
use dowcast::interfaces::shell::Shell;
use dowcast::interfaces::{OutputFormat, Presenter};
use std::io;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

/// Next-day direction for the Dow Jones Industrial Average components.
#[derive(Debug, Parser)]
#[command(name = "dowcast", version)]
struct Cli {
    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table, global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Fetch the latest bars and predict next-day direction
    Predict {
        /// Target date (YYYY-MM-DD), default today
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Fetch and show the latest bar per ticker
    Fetch {
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Interactive session with separate fetch and predict steps
    Shell,
    /// List the ticker universe
    Tickers,
}

/// `RUST_LOG` when set and valid, `info` otherwise.
fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

fn init_tracing(format: LogFormat) {
    let filter = log_filter(std::env::var("RUST_LOG").ok().as_deref());
    let layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stderr)
        .with_target(false);

    // stdout carries results only
    match format {
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(layer.pretty())
            .init(),
        LogFormat::Compact => tracing_subscriber::registry()
            .with(filter)
            .with(layer.compact())
            .init(),
    }
}

/// Loads the model up front. A failure is logged and kept by the loader,
/// so every later predict reports the same error.
async fn warm_up(loader: &ModelLoader) {
    match loader.load().await {
        Ok(model) => info!(
            "Model ready: {} {} ({})",
            model.classifier().name(),
            model.classifier().version(),
            model.schema()
        ),
        Err(e) => error!("Model unavailable: {}", e),
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = Config::from_env()?;
    init_tracing(config.log_format);

    info!("dowcast {} starting", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration loaded: Provider={:?}, Lookback={}d, Model={:?}",
        config.provider, config.lookback_days, config.model_path
    );

    let mut presenter = Presenter::new(io::stdout(), cli.format);
    let today = Local::now().date_naive();

    if let Command::Tickers = cli.command {
        presenter.present_tickers(universe())?;
        return Ok(ExitCode::SUCCESS);
    }

    let market_data = ServiceFactory::create_market_data(&config)?;
    let loader = Arc::new(ServiceFactory::create_model_loader(&config));
    let mut session = PredictionSession::new(market_data, loader.clone(), config.lookback_days);

    match cli.command {
        Command::Predict { date } => {
            warm_up(&loader).await;
            match session.run(date.unwrap_or(today)).await {
                Ok(outcome) => presenter.present(&outcome)?,
                Err(e) => {
                    error!("Prediction failed: {}", e);
                    presenter.error(&e)?;
                    return Ok(ExitCode::FAILURE);
                }
            }
        }
        Command::Fetch { date } => match session.fetch(date.unwrap_or(today)).await {
            Ok(outcome) => presenter.present_fetch(&outcome)?,
            Err(e) => {
                error!("Fetch failed: {}", e);
                presenter.error(&e)?;
                return Ok(ExitCode::FAILURE);
            }
        },
        Command::Shell => {
            warm_up(&loader).await;
            let stdin = io::stdin();
            Shell::new(&mut session, today)
                .run(stdin.lock(), &mut presenter)
                .await?;
        }
        Command::Tickers => {}
    }

    Ok(ExitCode::SUCCESS)
}
