//! Position sizing for leveraged trades
//!
//! Size the position so that a stop-loss hit loses exactly `risk_percent` of
//! capital, then derive the margin needed at the given leverage:
//!
//! ```text
//! position_size = (total_capital * risk_percent / 100) / |entry_price - stop_loss|
//! margin        = position_size * entry_price / leverage
//! ```

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::common::errors::CalcError;

/// Decimal places kept on the position size
pub const POSITION_SIZE_DP: u32 = 6;
/// Decimal places kept on the margin
pub const MARGIN_DP: u32 = 2;

/// Form field names, as shown in validation messages
pub mod fields {
    pub const ENTRY_PRICE: &str = "entry price";
    pub const STOP_LOSS: &str = "stop loss";
    pub const TOTAL_CAPITAL: &str = "total capital";
    pub const RISK_PERCENT: &str = "risk percent";
    pub const LEVERAGE: &str = "leverage";
}

/// Raw calculator inputs as typed by the user
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculatorInput {
    pub entry_price: String,
    pub stop_loss: String,
    pub total_capital: String,
    pub risk_percent: String,
    pub leverage: String,
}

impl CalculatorInput {
    /// Whether every field has some text in it
    pub fn is_complete(&self) -> bool {
        [
            &self.entry_price,
            &self.stop_loss,
            &self.total_capital,
            &self.risk_percent,
            &self.leverage,
        ]
        .iter()
        .all(|v| !v.trim().is_empty())
    }

    /// Parse every field and run [`calculate`]
    pub fn calculate(&self) -> Result<CalculatorResult, CalcError> {
        calculate(
            parse_field(fields::ENTRY_PRICE, &self.entry_price)?,
            parse_field(fields::STOP_LOSS, &self.stop_loss)?,
            parse_field(fields::TOTAL_CAPITAL, &self.total_capital)?,
            parse_field(fields::RISK_PERCENT, &self.risk_percent)?,
            parse_field(fields::LEVERAGE, &self.leverage)?,
        )
    }
}

/// Derived position size and margin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculatorResult {
    /// Quantity of the asset, rounded to 6 dp
    pub position_size: Decimal,
    /// Collateral required at the given leverage, rounded to 2 dp
    pub margin: Decimal,
}

/// Compute position size and margin.
///
/// Margin is derived from the rounded position size so the two displayed
/// numbers stay consistent with each other.
pub fn calculate(
    entry_price: Decimal,
    stop_loss: Decimal,
    total_capital: Decimal,
    risk_percent: Decimal,
    leverage: Decimal,
) -> Result<CalculatorResult, CalcError> {
    let stop_distance = entry_price
        .checked_sub(stop_loss)
        .ok_or(CalcError::Overflow)?
        .abs();
    if stop_distance.is_zero() {
        return Err(CalcError::ZeroStopDistance);
    }
    if leverage <= Decimal::ZERO {
        return Err(CalcError::NonPositiveLeverage);
    }

    let risk_amount = total_capital
        .checked_mul(risk_percent)
        .and_then(|v| v.checked_div(Decimal::ONE_HUNDRED))
        .ok_or(CalcError::Overflow)?;
    let position_size = risk_amount
        .checked_div(stop_distance)
        .ok_or(CalcError::Overflow)?
        .round_dp_with_strategy(POSITION_SIZE_DP, RoundingStrategy::MidpointAwayFromZero);

    let margin = position_size
        .checked_mul(entry_price)
        .and_then(|v| v.checked_div(leverage))
        .ok_or(CalcError::Overflow)?
        .round_dp_with_strategy(MARGIN_DP, RoundingStrategy::MidpointAwayFromZero);

    Ok(CalculatorResult {
        position_size,
        margin,
    })
}

/// Parse one text field as a decimal, accepting plain or scientific notation
pub fn parse_field(field: &'static str, raw: &str) -> Result<Decimal, CalcError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(CalcError::MissingField(field));
    }
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .map_err(|_| CalcError::InvalidNumber {
            field,
            value: raw.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn input(entry: &str, stop: &str, capital: &str, risk: &str, leverage: &str) -> CalculatorInput {
        CalculatorInput {
            entry_price: entry.into(),
            stop_loss: stop.into(),
            total_capital: capital.into(),
            risk_percent: risk.into(),
            leverage: leverage.into(),
        }
    }

    #[test]
    fn test_basic_sizing() {
        let result = calculate(dec!(100), dec!(90), dec!(1000), dec!(1), dec!(5)).unwrap();
        assert_eq!(result.position_size, dec!(1));
        assert_eq!(result.margin, dec!(20.00));
    }

    #[test]
    fn test_short_side_uses_absolute_distance() {
        let result = calculate(dec!(100), dec!(110), dec!(1000), dec!(1), dec!(5)).unwrap();
        assert_eq!(result.position_size, dec!(1));
        assert_eq!(result.margin, dec!(20));
    }

    #[test]
    fn test_rounding() {
        // 1000 * 2% / 3 = 6.666666..., margin = 6.666667 * 50 / 3 = 111.111116...
        let result = calculate(dec!(50), dec!(47), dec!(1000), dec!(2), dec!(3)).unwrap();
        assert_eq!(result.position_size, dec!(6.666667));
        assert_eq!(result.margin, dec!(111.11));
    }

    #[test]
    fn test_btc_example() {
        let result = calculate(dec!(67000), dec!(66000), dec!(1000), dec!(1), dec!(10)).unwrap();
        assert_eq!(result.position_size, dec!(0.01));
        assert_eq!(result.margin, dec!(67));
    }

    #[test]
    fn test_equal_entry_and_stop_rejected() {
        let err = calculate(dec!(100), dec!(100), dec!(1000), dec!(1), dec!(5)).unwrap_err();
        assert_eq!(err, CalcError::ZeroStopDistance);
    }

    #[test]
    fn test_stop_distance_overflow_rejected() {
        let err = input("79228162514264337593543950335", "-1", "1000", "1", "5")
            .calculate()
            .unwrap_err();
        assert_eq!(err, CalcError::Overflow);
    }

    #[test]
    fn test_scientific_notation_input() {
        let result = input("1e2", "9E1", "1e3", "1", "5").calculate().unwrap();
        assert_eq!(result.position_size, dec!(1));
        assert_eq!(result.margin, dec!(20));
    }

    #[test]
    fn test_non_positive_leverage_rejected() {
        let err = calculate(dec!(100), dec!(90), dec!(1000), dec!(1), dec!(0)).unwrap_err();
        assert_eq!(err, CalcError::NonPositiveLeverage);
    }

    #[test]
    fn test_string_input() {
        let result = input("100", " 90 ", "1000", "1", "5").calculate().unwrap();
        assert_eq!(result.margin, dec!(20));
    }

    #[test]
    fn test_string_input_errors() {
        assert_eq!(
            input("", "90", "1000", "1", "5").calculate().unwrap_err(),
            CalcError::MissingField(fields::ENTRY_PRICE)
        );
        assert_eq!(
            input("100", "9o", "1000", "1", "5").calculate().unwrap_err(),
            CalcError::InvalidNumber {
                field: fields::STOP_LOSS,
                value: "9o".into()
            }
        );
    }

    #[test]
    fn test_is_complete() {
        assert!(input("100", "90", "1000", "1", "5").is_complete());
        assert!(!input("100", "", "1000", "1", "5").is_complete());
        assert!(!input("100", "90", "1000", "  ", "5").is_complete());
    }
}
