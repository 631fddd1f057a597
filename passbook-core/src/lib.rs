//! passbook-core: statement record types, category rules, and the error taxonomy

pub mod category_rules;
pub mod classifier;
pub mod direction;
pub mod error;
pub mod transaction;

pub use category_rules::{Category, CategoryRule, RuleTable};
pub use classifier::Classifier;
pub use direction::DirectionPolicy;
pub use error::{DocumentError, LineError, UnreadablePage};
pub use transaction::{AccountType, Direction, TransactionRecord};
