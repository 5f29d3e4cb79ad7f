//! Calculator view state
//!
//! All form state lives in [`CalculatorView`] and only changes through its
//! transition methods. Transitions that affect polling return a
//! [`FeedCommand`] for the caller to hand to the live price feed; the view
//! itself never touches timers.
//!
//! Feed status moves `Loading → Live → (Paused | Error) → Live`. Every
//! restart bumps the generation, and quotes tagged with an older generation
//! are dropped, so a fetch for a previous symbol can never overwrite the
//! current one.

use rust_decimal::{Decimal, RoundingStrategy};
use tracing::debug;

use crate::calculator::{CalculatorInput, CalculatorResult};
use crate::common::errors::CalcError;
use crate::common::types::CapitalDefaults;

/// Placeholder shown in the entry-price field while no price is known
pub const LOADING_PLACEHOLDER: &str = "Fetching price...";

/// Decimal places of the entry price taken from a live quote
const ENTRY_PRICE_DP: u32 = 2;

/// Live price feed status
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedStatus {
    /// Fetch issued, no price for this symbol yet
    Loading,
    /// Last fetch succeeded
    Live,
    /// Polling suspended by the user
    Paused,
    /// Last fetch failed; message is shown as the placeholder
    Error(String),
}

/// When the calculation runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TriggerPolicy {
    /// Only on an explicit calculate action
    Manual,
    /// Also after any change that leaves all five inputs non-empty
    #[default]
    OnComplete,
}

/// Editable form fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    EntryPrice,
    StopLoss,
    TotalCapital,
    RiskPercent,
    Leverage,
}

impl std::str::FromStr for Field {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "entry" | "entry_price" => Ok(Field::EntryPrice),
            "stop" | "stop_loss" => Ok(Field::StopLoss),
            "capital" | "total_capital" => Ok(Field::TotalCapital),
            "risk" | "risk_percent" => Ok(Field::RiskPercent),
            "leverage" | "lev" => Ok(Field::Leverage),
            other => Err(format!("unknown field: {}", other)),
        }
    }
}

/// Instruction for the live price feed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedCommand {
    /// Cancel any running poll, fetch `symbol` now, then every interval
    Restart { symbol: String, generation: u64 },
    /// Cancel any running poll
    Stop,
}

/// Form state, feed status, and last result for one calculator screen
#[derive(Debug, Clone)]
pub struct CalculatorView {
    input: CalculatorInput,
    symbol: String,
    status: FeedStatus,
    generation: u64,
    result: Option<CalculatorResult>,
    validation: Option<CalcError>,
    trigger: TriggerPolicy,
    capital_modified: bool,
    risk_modified: bool,
}

impl CalculatorView {
    pub fn new(symbol: impl Into<String>, leverage: impl Into<String>) -> Self {
        Self {
            input: CalculatorInput {
                risk_percent: "1".to_string(),
                leverage: leverage.into(),
                ..CalculatorInput::default()
            },
            symbol: symbol.into(),
            status: FeedStatus::Loading,
            generation: 0,
            result: None,
            validation: None,
            trigger: TriggerPolicy::default(),
            capital_modified: false,
            risk_modified: false,
        }
    }

    pub fn with_trigger(mut self, trigger: TriggerPolicy) -> Self {
        self.trigger = trigger;
        self
    }

    pub fn input(&self) -> &CalculatorInput {
        &self.input
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn status(&self) -> &FeedStatus {
        &self.status
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn result(&self) -> Option<&CalculatorResult> {
        self.result.as_ref()
    }

    pub fn validation(&self) -> Option<&CalcError> {
        self.validation.as_ref()
    }

    pub fn is_paused(&self) -> bool {
        self.status == FeedStatus::Paused
    }

    /// Entry price is locked until the first price for the symbol arrives
    pub fn entry_editable(&self) -> bool {
        self.status != FeedStatus::Loading
    }

    /// Text shown in the empty entry-price field
    pub fn placeholder(&self) -> &str {
        match &self.status {
            FeedStatus::Error(message) => message,
            _ => LOADING_PLACEHOLDER,
        }
    }

    /// Begin polling the current symbol
    pub fn start(&mut self) -> FeedCommand {
        self.restart()
    }

    /// Watch a different symbol; also resumes a paused feed
    pub fn select_symbol(&mut self, symbol: impl Into<String>) -> FeedCommand {
        self.symbol = symbol.into();
        self.restart()
    }

    fn restart(&mut self) -> FeedCommand {
        self.generation += 1;
        self.status = FeedStatus::Loading;
        debug!("Feed restart: {} (generation {})", self.symbol, self.generation);
        FeedCommand::Restart {
            symbol: self.symbol.clone(),
            generation: self.generation,
        }
    }

    /// Suspend polling. Returns `None` when already paused.
    pub fn pause(&mut self) -> Option<FeedCommand> {
        if self.is_paused() {
            return None;
        }
        self.generation += 1;
        self.status = FeedStatus::Paused;
        Some(FeedCommand::Stop)
    }

    /// Resume polling with an immediate fetch. Returns `None` when not paused.
    pub fn resume(&mut self) -> Option<FeedCommand> {
        if self.is_paused() {
            Some(self.restart())
        } else {
            None
        }
    }

    pub fn toggle_pause(&mut self) -> Option<FeedCommand> {
        if self.is_paused() {
            self.resume()
        } else {
            self.pause()
        }
    }

    /// Apply a fetched price. Returns whether the view changed.
    pub fn apply_quote(&mut self, generation: u64, price: Decimal) -> bool {
        if generation != self.generation || self.is_paused() {
            debug!("Dropping stale quote (generation {} vs {})", generation, self.generation);
            return false;
        }
        let mut entry =
            price.round_dp_with_strategy(ENTRY_PRICE_DP, RoundingStrategy::MidpointAwayFromZero);
        entry.rescale(ENTRY_PRICE_DP);
        self.input.entry_price = entry.to_string();
        self.status = FeedStatus::Live;
        self.auto_calculate();
        true
    }

    /// Record a failed fetch; the entry price is kept. Returns whether the view changed.
    pub fn apply_failure(&mut self, generation: u64, message: impl Into<String>) -> bool {
        if generation != self.generation || self.is_paused() {
            return false;
        }
        self.status = FeedStatus::Error(message.into());
        true
    }

    /// Fill capital and risk from server defaults unless the user already edited them
    pub fn apply_defaults(&mut self, defaults: &CapitalDefaults) {
        if !self.capital_modified {
            self.input.total_capital = defaults.total_capital.clone();
        }
        if let (false, Some(risk)) = (self.risk_modified, &defaults.risk) {
            self.input.risk_percent = risk.clone();
        }
        self.auto_calculate();
    }

    /// Edit a form field. Any edit resumes a paused feed.
    pub fn edit(&mut self, field: Field, value: impl Into<String>) -> Option<FeedCommand> {
        let value = value.into();
        match field {
            Field::EntryPrice => self.input.entry_price = value,
            Field::StopLoss => self.input.stop_loss = value,
            Field::TotalCapital => {
                self.capital_modified = true;
                self.input.total_capital = value;
            }
            Field::RiskPercent => {
                self.risk_modified = true;
                self.input.risk_percent = value;
            }
            Field::Leverage => self.input.leverage = value,
        }
        self.auto_calculate();
        self.resume()
    }

    /// Run the calculation now, regardless of trigger policy
    pub fn calculate(&mut self) -> Result<CalculatorResult, CalcError> {
        match self.input.calculate() {
            Ok(result) => {
                self.result = Some(result);
                self.validation = None;
                Ok(result)
            }
            Err(e) => {
                self.result = None;
                self.validation = Some(e.clone());
                Err(e)
            }
        }
    }

    fn auto_calculate(&mut self) {
        if self.trigger == TriggerPolicy::OnComplete && self.input.is_complete() {
            let _ = self.calculate();
        }
    }
}
