//! Assigns category and direction to parsed transactions.

use rust_decimal::Decimal;

use crate::category_rules::{Category, RuleTable};
use crate::direction::DirectionPolicy;
use crate::transaction::Direction;

/// Owns an immutable rule table and a direction policy.
/// Cheap to clone and safe to share between concurrent parses.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classifier {
    rules: RuleTable,
    direction: DirectionPolicy,
}

impl Classifier {
    pub fn new(rules: RuleTable, direction: DirectionPolicy) -> Self {
        Self { rules, direction }
    }

    pub fn with_direction(mut self, direction: DirectionPolicy) -> Self {
        self.direction = direction;
        self
    }

    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }

    pub fn direction_policy(&self) -> DirectionPolicy {
        self.direction
    }

    pub fn categorize(&self, description: &str) -> Category {
        self.rules.categorize(description)
    }

    pub fn direction(&self, amount: Decimal) -> Direction {
        self.direction.direction(amount)
    }
}
