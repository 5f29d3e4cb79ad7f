//! Interactive terminal calculator
//!
//! Owns one [`CalculatorView`] and one [`LivePriceFeed`]. Line commands and
//! feed events are handled on a single task, so the view has exactly one
//! writer.

use std::io::Write;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::common::errors::{GatewayError, Result};
use crate::common::traits::PriceSource;
use crate::feed::{FeedEvent, LivePriceFeed};
use crate::view::{CalculatorView, FeedCommand, FeedStatus, Field};

pub const HELP: &str = "\
commands:
  capital <v>    total capital
  risk <v>       risk percent
  leverage <v>   leverage
  entry <v>      entry price (overwritten by the next live quote)
  stop <v>       stop-loss price
  symbol <SYM>   watch another symbol (e.g. ETHUSDT)
  pause          pause / resume live prices
  calc           calculate now
  show           print the form
  quit           exit";

/// One parsed input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Set(Field, String),
    Symbol(String),
    TogglePause,
    Calculate,
    Show,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = String;

    fn from_str(line: &str) -> std::result::Result<Self, Self::Err> {
        let mut parts = line.split_whitespace();
        let Some(head) = parts.next() else {
            return Ok(Command::Show);
        };
        let arg = parts.next();

        match (head.to_lowercase().as_str(), arg) {
            ("symbol" | "sym", Some(symbol)) => Ok(Command::Symbol(symbol.to_uppercase())),
            ("pause" | "p", None) => Ok(Command::TogglePause),
            ("calc" | "c", None) => Ok(Command::Calculate),
            ("show" | "s", None) => Ok(Command::Show),
            ("help" | "h" | "?", None) => Ok(Command::Help),
            ("quit" | "q" | "exit", None) => Ok(Command::Quit),
            (name, Some(value)) => {
                let field = name.parse::<Field>()?;
                Ok(Command::Set(field, value.to_string()))
            }
            (name, None) => Err(format!("unknown command: {} (try `help`)", name)),
        }
    }
}

/// Whether the session keeps running after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Terminal calculator session
pub struct Session<S: PriceSource + 'static> {
    view: CalculatorView,
    feed: LivePriceFeed<S>,
    events: mpsc::Receiver<FeedEvent>,
}

impl<S: PriceSource + 'static> Session<S> {
    pub fn new(source: Arc<S>, view: CalculatorView, poll_interval: Duration) -> Self {
        let (feed, events) = LivePriceFeed::new(source, poll_interval);
        Self { view, feed, events }
    }

    pub fn view(&self) -> &CalculatorView {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut CalculatorView {
        &mut self.view
    }

    pub fn is_polling(&self) -> bool {
        self.feed.is_running()
    }

    /// Start polling the view's symbol
    pub fn start(&mut self) {
        let command = self.view.start();
        self.feed.apply(command);
    }

    fn dispatch(&mut self, command: Option<FeedCommand>) {
        if let Some(command) = command {
            self.feed.apply(command);
        }
    }

    /// Apply one user command. Returns a message for the user, if any.
    pub fn handle_command(&mut self, command: Command) -> (Flow, Option<String>) {
        match command {
            Command::Set(Field::EntryPrice, _) if !self.view.entry_editable() => (
                Flow::Continue,
                Some("entry price is locked until the first quote arrives".to_string()),
            ),
            Command::Set(field, value) => {
                let feed_command = self.view.edit(field, value);
                self.dispatch(feed_command);
                (Flow::Continue, None)
            }
            Command::Symbol(symbol) => {
                let feed_command = self.view.select_symbol(symbol);
                self.feed.apply(feed_command);
                (Flow::Continue, None)
            }
            Command::TogglePause => {
                let feed_command = self.view.toggle_pause();
                self.dispatch(feed_command);
                (Flow::Continue, None)
            }
            Command::Calculate => match self.view.calculate() {
                Ok(_) => (Flow::Continue, None),
                Err(e) => (Flow::Continue, Some(e.to_string())),
            },
            Command::Show => (Flow::Continue, None),
            Command::Help => (Flow::Continue, Some(HELP.to_string())),
            Command::Quit => (Flow::Quit, None),
        }
    }

    /// Apply one feed event. Returns whether the view changed.
    pub fn handle_event(&mut self, event: FeedEvent) -> bool {
        match event.outcome {
            Ok(quote) => self.view.apply_quote(event.generation, quote.price),
            Err(e) => self.view.apply_failure(event.generation, e.to_string()),
        }
    }

    /// Wait for the next feed event
    pub async fn next_event(&mut self) -> Option<FeedEvent> {
        self.events.recv().await
    }

    /// Read commands from `input` and render to `out` until `quit` or end of input
    pub async fn run<R, W>(mut self, input: R, mut out: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        let mut lines = input.lines();
        self.start();
        print_view(&mut out, &self.view)?;

        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line.map_err(io_error)? else {
                        debug!("Input closed");
                        break;
                    };
                    match line.parse::<Command>() {
                        Ok(command) => {
                            let (flow, message) = self.handle_command(command);
                            if let Some(message) = message {
                                writeln!(out, "{}", message).map_err(io_error)?;
                            }
                            if flow == Flow::Quit {
                                break;
                            }
                            print_view(&mut out, &self.view)?;
                        }
                        Err(e) => writeln!(out, "{}", e).map_err(io_error)?,
                    }
                }
                Some(event) = self.events.recv() => {
                    if self.handle_event(event) {
                        print_view(&mut out, &self.view)?;
                    }
                }
            }
        }

        self.feed.stop();
        info!("Session closed");
        Ok(())
    }
}

fn io_error(e: std::io::Error) -> GatewayError {
    GatewayError::Internal(format!("terminal I/O failed: {}", e))
}

fn print_view<W: Write>(out: &mut W, view: &CalculatorView) -> Result<()> {
    writeln!(out, "{}", render(view)).map_err(io_error)?;
    out.flush().map_err(io_error)
}

/// Text rendering of the form and result
pub fn render(view: &CalculatorView) -> String {
    let input = view.input();
    let status = match view.status() {
        FeedStatus::Loading => "loading",
        FeedStatus::Live => "live",
        FeedStatus::Paused => "paused",
        FeedStatus::Error(_) => "error",
    };
    let entry = if input.entry_price.is_empty() {
        format!("({})", view.placeholder())
    } else {
        input.entry_price.clone()
    };

    let mut text = format!(
        "[{} {}] entry {} | stop {} | capital {} | risk {}% | leverage {}x",
        view.symbol(),
        status,
        entry,
        or_dash(&input.stop_loss),
        or_dash(&input.total_capital),
        or_dash(&input.risk_percent),
        or_dash(&input.leverage),
    );
    if let FeedStatus::Error(message) = view.status() {
        text.push_str(&format!("\n  price error: {}", message));
    }
    if let Some(result) = view.result() {
        text.push_str(&format!(
            "\n  position size: {}  margin: {}",
            result.position_size, result.margin
        ));
    } else if let Some(e) = view.validation() {
        text.push_str(&format!("\n  {}", e));
    }
    text
}

fn or_dash(value: &str) -> &str {
    if value.trim().is_empty() {
        "-"
    } else {
        value
    }
}
