//! Transaction record types produced by the statement parser

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::category_rules::Category;

/// Which statement a record came from. Determines the line layout.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum AccountType {
    /// Savings/current account: rows end with `amount balance`
    Debit,
    /// Credit card: rows end with `amount`, no running balance
    Credit,
}

impl AccountType {
    pub fn label(&self) -> &'static str {
        match self {
            AccountType::Debit => "Debit",
            AccountType::Credit => "Credit",
        }
    }

    /// Whether rows of this layout carry a trailing balance column
    pub fn has_balance(&self) -> bool {
        matches!(self, AccountType::Debit)
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Income or expense, derived from the amount sign
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Direction {
    Income,
    Expense,
}

impl Direction {
    pub fn label(&self) -> &'static str {
        match self {
            Direction::Income => "Income",
            Direction::Expense => "Expense",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One validated statement row.
///
/// Built only by [`TransactionRecord::new`] (deserialization goes through
/// it too); fields are read through accessors so a record never changes
/// after the parser appends it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(try_from = "RecordFields")]
pub struct TransactionRecord {
    date: NaiveDate,
    description: String,
    /// Signed; positive amounts are income under the default policy
    amount: Decimal,
    /// Running balance after the transaction (Debit statements only)
    balance: Option<Decimal>,
    account_type: AccountType,
    category: Category,
    direction: Direction,
}

/// Unchecked wire shape of [`TransactionRecord`]
#[derive(Deserialize)]
struct RecordFields {
    date: NaiveDate,
    description: String,
    amount: Decimal,
    balance: Option<Decimal>,
    account_type: AccountType,
    category: Category,
    direction: Direction,
}

impl TryFrom<RecordFields> for TransactionRecord {
    type Error = String;

    fn try_from(f: RecordFields) -> Result<Self, Self::Error> {
        let account_type = f.account_type;
        let has_balance = f.balance.is_some();
        Self::new(
            f.date,
            f.description,
            f.amount,
            f.balance,
            f.account_type,
            f.category,
            f.direction,
        )
        .ok_or_else(|| {
            format!(
                "{} record {} a balance",
                account_type,
                if has_balance { "cannot carry" } else { "requires" }
            )
        })
    }
}

impl TransactionRecord {
    /// Create a record, enforcing the balance/account-type pairing.
    ///
    /// Returns `None` when a Debit record has no balance or a Credit
    /// record carries one.
    pub fn new(
        date: NaiveDate,
        description: impl Into<String>,
        amount: Decimal,
        balance: Option<Decimal>,
        account_type: AccountType,
        category: Category,
        direction: Direction,
    ) -> Option<Self> {
        if account_type.has_balance() != balance.is_some() {
            return None;
        }

        Some(Self {
            date,
            description: description.into(),
            amount,
            balance,
            account_type,
            category,
            direction,
        })
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn balance(&self) -> Option<Decimal> {
        self.balance
    }

    pub fn account_type(&self) -> AccountType {
        self.account_type
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn is_income(&self) -> bool {
        self.direction == Direction::Income
    }

    pub fn is_expense(&self) -> bool {
        self.direction == Direction::Expense
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    #[test]
    fn test_debit_record_requires_balance() {
        let ok = TransactionRecord::new(
            date(),
            "AMAZON PURCHASE",
            dec!(-1500.00),
            Some(dec!(25000.00)),
            AccountType::Debit,
            Category::Shopping,
            Direction::Expense,
        );
        assert!(ok.is_some());

        let missing = TransactionRecord::new(
            date(),
            "AMAZON PURCHASE",
            dec!(-1500.00),
            None,
            AccountType::Debit,
            Category::Shopping,
            Direction::Expense,
        );
        assert!(missing.is_none());
    }

    #[test]
    fn test_credit_record_rejects_balance() {
        let rec = TransactionRecord::new(
            date(),
            "SALARY CREDIT",
            dec!(50000.00),
            Some(dec!(1.00)),
            AccountType::Credit,
            Category::Salary,
            Direction::Income,
        );
        assert!(rec.is_none());
    }

    #[test]
    fn test_accessors_and_labels() {
        let rec = TransactionRecord::new(
            date(),
            "SALARY CREDIT",
            dec!(50000.00),
            None,
            AccountType::Credit,
            Category::Salary,
            Direction::Income,
        )
        .unwrap();

        assert_eq!(rec.description(), "SALARY CREDIT");
        assert_eq!(rec.amount(), dec!(50000.00));
        assert!(rec.is_income());
        assert!(!rec.is_expense());
        assert_eq!(rec.account_type().to_string(), "Credit");
        assert_eq!(rec.direction().to_string(), "Income");
    }

    #[test]
    fn test_serializes_with_field_names() {
        let rec = TransactionRecord::new(
            date(),
            "SWIGGY",
            dec!(-250),
            Some(dec!(1000)),
            AccountType::Debit,
            Category::Food,
            Direction::Expense,
        )
        .unwrap();
        let json = serde_json::to_value(&rec).unwrap();
        assert_eq!(json["date"], "2024-03-15");
        assert_eq!(json["account_type"], "Debit");
        assert_eq!(json["category"], "Food");

        let back: TransactionRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, rec);
    }

    #[test]
    fn test_deserialize_enforces_balance_pairing() {
        let credit_with_balance = r#"{
            "date": "2024-03-20", "description": "SALARY CREDIT", "amount": "50000",
            "balance": "5", "account_type": "Credit", "category": "Salary",
            "direction": "Income"
        }"#;
        let err = serde_json::from_str::<TransactionRecord>(credit_with_balance).unwrap_err();
        assert!(err.to_string().contains("cannot carry a balance"), "{err}");

        let debit_without_balance = r#"{
            "date": "2024-03-15", "description": "AMAZON", "amount": "-1500",
            "balance": null, "account_type": "Debit", "category": "Shopping",
            "direction": "Expense"
        }"#;
        assert!(serde_json::from_str::<TransactionRecord>(debit_without_balance).is_err());
    }
}
