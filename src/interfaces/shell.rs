//! Line-oriented session: fetch and predict as two separate actions.

use crate::application::session::PredictionSession;
use crate::interfaces::presenter::Presenter;
use chrono::NaiveDate;
use clap::{CommandFactory, Parser, Subcommand};
use std::io::{self, BufRead, Write};
use tracing::{debug, error};

#[derive(Debug, Parser)]
#[command(
    name = "dowcast",
    no_binary_name = true,
    disable_help_flag = true,
    disable_help_subcommand = true
)]
struct ShellLine {
    #[command(subcommand)]
    command: ShellCommand,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum ShellCommand {
    /// Fetch the latest bar for every ticker (default date: today)
    Fetch { date: Option<NaiveDate> },
    /// Predict over the bars kept by the last fetch
    Predict,
    /// Show available commands
    Help,
    /// Leave the shell
    #[command(alias = "exit")]
    Quit,
}

/// Parses one input line. Blank lines yield `Ok(None)`.
pub fn parse_line(line: &str) -> Result<Option<ShellCommand>, clap::Error> {
    let words: Vec<&str> = line.split_whitespace().collect();
    if words.is_empty() {
        return Ok(None);
    }
    ShellLine::try_parse_from(words).map(|parsed| Some(parsed.command))
}

pub fn help_text() -> String {
    ShellLine::command().render_help().to_string()
}

pub struct Shell<'a> {
    session: &'a mut PredictionSession,
    today: NaiveDate,
}

impl<'a> Shell<'a> {
    pub fn new(session: &'a mut PredictionSession, today: NaiveDate) -> Self {
        Self { session, today }
    }

    /// Runs until `quit` or end of input.
    pub async fn run<R: BufRead, W: Write>(
        &mut self,
        input: R,
        presenter: &mut Presenter<W>,
    ) -> io::Result<()> {
        presenter.prompt()?;
        for line in input.lines() {
            let line = line?;
            let command = match parse_line(&line) {
                Ok(Some(command)) => command,
                Ok(None) => {
                    presenter.prompt()?;
                    continue;
                }
                Err(e) => {
                    debug!("Shell: rejected {:?}", line);
                    presenter.warning(e.render().to_string().trim_end())?;
                    presenter.prompt()?;
                    continue;
                }
            };

            if !self.execute(command, presenter).await? {
                return Ok(());
            }
            presenter.prompt()?;
        }
        Ok(())
    }

    /// Returns false when the shell should stop.
    pub async fn execute<W: Write>(
        &mut self,
        command: ShellCommand,
        presenter: &mut Presenter<W>,
    ) -> io::Result<bool> {
        match command {
            ShellCommand::Fetch { date } => {
                match self.session.fetch(date.unwrap_or(self.today)).await {
                    Ok(outcome) => presenter.present_fetch(&outcome)?,
                    Err(e) => {
                        error!("Shell: fetch failed: {}", e);
                        presenter.error(&e)?;
                    }
                }
            }
            ShellCommand::Predict => match self.session.predict().await {
                Ok(report) => presenter.present_report(&report)?,
                Err(e) => {
                    error!("Shell: predict failed: {}", e);
                    presenter.error(&e)?;
                }
            },
            ShellCommand::Help => presenter.info(help_text().trim_end())?,
            ShellCommand::Quit => return Ok(false),
        }
        Ok(true)
    }
}
