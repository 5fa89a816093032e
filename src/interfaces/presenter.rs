//! Renders run outcomes for the terminal.
//!
//! Tables go through `tabled`; CSV and JSON carry the raw values for piping.
//! Banners (success, warning, error) are plain lines in table mode, `#`
//! comments in CSV mode and a `status` field in JSON mode.

use crate::application::session::{PredictionReport, RunOutcome};
use crate::domain::market::bar::{FetchOutcome, FetchedBars};
use crate::domain::market::ticker::TickerSymbol;
use crate::domain::market::window::DateWindow;
use crate::interfaces::view_models::{BarRow, PredictionRow};
use serde_json::json;
use std::fmt::Display;
use std::io::{self, Write};
use tabled::Table;
use tabled::settings::Style;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Csv,
    Json,
}

pub fn no_data_message(window: &DateWindow) -> String {
    format!(
        "The market was closed for {}; please try another date.",
        window
    )
}

pub struct Presenter<W: Write> {
    out: W,
    format: OutputFormat,
}

impl<W: Write> Presenter<W> {
    pub fn new(out: W, format: OutputFormat) -> Self {
        Self { out, format }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn present(&mut self, outcome: &RunOutcome) -> io::Result<()> {
        match outcome {
            RunOutcome::NoData { window } => self.warning(&no_data_message(window)),
            RunOutcome::Presented(report) => self.present_report(report),
        }
    }

    pub fn present_report(&mut self, report: &PredictionReport) -> io::Result<()> {
        let mut results = report.results.clone();
        results.sort_by_key(|r| r.ticker);

        match self.format {
            OutputFormat::Table => {
                writeln!(
                    self.out,
                    "Prediction completed for {} ({} tickers, {})",
                    report.window,
                    results.len(),
                    report.model
                )?;
                let rows: Vec<PredictionRow> = results.iter().map(PredictionRow::from).collect();
                writeln!(self.out, "{}", Table::new(rows).with(Style::rounded()))?;
                self.note_missing(&report.missing)
            }
            OutputFormat::Csv => {
                let mut writer = csv::Writer::from_writer(&mut self.out);
                for r in &results {
                    writer.serialize(r)?;
                }
                writer.flush()?;
                drop(writer);
                self.note_missing(&report.missing)
            }
            OutputFormat::Json => {
                let body = json!({
                    "status": "ok",
                    "window": report.window,
                    "model": report.model,
                    "missing": report.missing,
                    "predictions": results,
                });
                serde_json::to_writer_pretty(&mut self.out, &body)?;
                writeln!(self.out)
            }
        }
    }

    pub fn present_fetch(&mut self, outcome: &FetchOutcome) -> io::Result<()> {
        match outcome {
            FetchOutcome::NoData { window } => self.warning(&no_data_message(window)),
            FetchOutcome::Bars(fetched) => self.present_bars(fetched),
        }
    }

    fn present_bars(&mut self, fetched: &FetchedBars) -> io::Result<()> {
        let bars = fetched.sorted();
        match self.format {
            OutputFormat::Table => {
                writeln!(
                    self.out,
                    "Fetched {} of {} tickers for {}",
                    bars.len(),
                    bars.len() + fetched.missing().len(),
                    fetched.window()
                )?;
                let rows: Vec<BarRow> = bars.iter().map(BarRow::from).collect();
                writeln!(self.out, "{}", Table::new(rows).with(Style::rounded()))?;
                self.note_missing(fetched.missing())
            }
            OutputFormat::Csv => {
                let mut writer = csv::Writer::from_writer(&mut self.out);
                writer.write_record(["ticker", "date", "open", "high", "low", "close", "volume"])?;
                for tb in &bars {
                    writer.write_record([
                        tb.ticker.to_string(),
                        tb.bar.date.to_string(),
                        tb.bar.open.to_string(),
                        tb.bar.high.to_string(),
                        tb.bar.low.to_string(),
                        tb.bar.close.to_string(),
                        tb.bar.volume.to_string(),
                    ])?;
                }
                writer.flush()?;
                drop(writer);
                self.note_missing(fetched.missing())
            }
            OutputFormat::Json => {
                let body = json!({
                    "status": "ok",
                    "window": fetched.window(),
                    "missing": fetched.missing(),
                    "bars": bars,
                });
                serde_json::to_writer_pretty(&mut self.out, &body)?;
                writeln!(self.out)
            }
        }
    }

    pub fn present_tickers(&mut self, tickers: &[TickerSymbol]) -> io::Result<()> {
        match self.format {
            OutputFormat::Json => {
                serde_json::to_writer(&mut self.out, tickers)?;
                writeln!(self.out)
            }
            OutputFormat::Table | OutputFormat::Csv => {
                for t in tickers {
                    writeln!(self.out, "{}", t)?;
                }
                Ok(())
            }
        }
    }

    /// Interactive prompt, table mode only.
    pub fn prompt(&mut self) -> io::Result<()> {
        if self.format == OutputFormat::Table {
            write!(self.out, "dowcast> ")?;
            self.out.flush()?;
        }
        Ok(())
    }

    pub fn info(&mut self, message: &str) -> io::Result<()> {
        self.banner("info", message)
    }

    pub fn warning(&mut self, message: &str) -> io::Result<()> {
        self.banner("warning", message)
    }

    /// Error banner. No partial results are ever shown next to it.
    pub fn error(&mut self, err: &dyn Display) -> io::Result<()> {
        self.banner("error", &err.to_string())
    }

    fn banner(&mut self, status: &str, message: &str) -> io::Result<()> {
        match self.format {
            OutputFormat::Table => {
                let prefix = match status {
                    "warning" => "WARNING: ",
                    "error" => "ERROR: ",
                    _ => "",
                };
                writeln!(self.out, "{}{}", prefix, message)
            }
            OutputFormat::Csv => writeln!(self.out, "# {}: {}", status, message),
            OutputFormat::Json => {
                serde_json::to_writer(&mut self.out, &json!({ "status": status, "message": message }))?;
                writeln!(self.out)
            }
        }
    }

    fn note_missing(&mut self, missing: &[TickerSymbol]) -> io::Result<()> {
        if missing.is_empty() {
            return Ok(());
        }
        let names: Vec<&str> = missing.iter().map(|t| t.as_str()).collect();
        match self.format {
            OutputFormat::Csv => writeln!(self.out, "# no data: {}", names.join(", ")),
            _ => writeln!(self.out, "No data for: {}", names.join(", ")),
        }
    }
}
