//! Income/expense direction policy.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::transaction::Direction;

/// How to read the sign of a statement amount.
///
/// A zero amount is always an expense.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum DirectionPolicy {
    /// `amount > 0` is income
    #[default]
    PositiveIsIncome,
    /// `amount < 0` is income (statements that print charges as positive)
    NegativeIsIncome,
}

impl DirectionPolicy {
    pub fn direction(&self, amount: Decimal) -> Direction {
        let income = match self {
            DirectionPolicy::PositiveIsIncome => amount > Decimal::ZERO,
            DirectionPolicy::NegativeIsIncome => amount < Decimal::ZERO,
        };

        if income {
            Direction::Income
        } else {
            Direction::Expense
        }
    }
}
