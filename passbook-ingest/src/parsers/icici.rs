//! ICICI statement line parser (debit and credit card layouts)
//!
//! Expected extracted-text rows:
//!   Debit:   15-03-2024 AMAZON PURCHASE -1,500.00 25,000.00
//!            DATE       DESCRIPTION...  AMOUNT    BALANCE
//!   Credit:  20-03-2024 SALARY CREDIT 50,000.00
//!            DATE       DESCRIPTION.. AMOUNT
//!
//! Any line not starting with a DD-MM-YYYY date is ignored, including
//! narration that wraps onto the next line.

use chrono::NaiveDate;
use passbook_core::{AccountType, Classifier, LineError, TransactionRecord};
use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::LazyLock;
use tracing::debug;

use crate::types::{LineDiscard, ParseOutcome};

static TXN_START_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{2}-[0-9]{2}-[0-9]{4}").expect("static regex"));

static DATE_TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{2}-[0-9]{2}-[0-9]{4}$").expect("static regex"));

/// True if `line` begins with a DD-MM-YYYY token
pub fn is_transaction_start(line: &str) -> bool {
    TXN_START_RE.is_match(line)
}

fn parse_date(token: &str) -> Result<NaiveDate, LineError> {
    if !DATE_TOKEN_RE.is_match(token) {
        return Err(LineError::DateFormat {
            token: token.to_string(),
        });
    }
    NaiveDate::parse_from_str(token, "%d-%m-%Y").map_err(|_| LineError::DateFormat {
        token: token.to_string(),
    })
}

fn parse_number(field: &'static str, token: &str) -> Result<Decimal, LineError> {
    let cleaned = token.replace(',', "");
    Decimal::from_str(&cleaned).map_err(|_| LineError::NumericFormat {
        field,
        token: token.to_string(),
    })
}

/// Parses statement lines into classified records.
///
/// Holds no per-document state, so one parser can serve any number of
/// documents, concurrently or not.
#[derive(Debug, Clone, Default)]
pub struct StatementParser {
    classifier: Classifier,
}

impl StatementParser {
    pub fn new(classifier: Classifier) -> Self {
        Self { classifier }
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    /// Parse one transaction-start line.
    pub fn parse_line(
        &self,
        line: &str,
        account_type: AccountType,
    ) -> Result<TransactionRecord, LineError> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let n = tokens.len();
        let expected = if account_type.has_balance() { 3 } else { 2 };
        if n < expected {
            return Err(LineError::MissingFields { expected, found: n });
        }

        let date = parse_date(tokens[0])?;

        let (middle, amount_tok, balance_tok) = match account_type {
            AccountType::Debit => (&tokens[1..n - 2], tokens[n - 2], Some(tokens[n - 1])),
            AccountType::Credit => (&tokens[1..n - 1], tokens[n - 1], None),
        };

        let amount = parse_number("amount", amount_tok)?;
        let balance = balance_tok
            .map(|t| parse_number("balance", t))
            .transpose()?;

        let description = middle.join(" ");
        let category = self.classifier.categorize(&description);
        let direction = self.classifier.direction(amount);

        // Never None: `balance_tok` is Some exactly for layouts with a
        // balance column, which is the pairing `new` checks.
        TransactionRecord::new(
            date,
            description,
            amount,
            balance,
            account_type,
            category,
            direction,
        )
        .ok_or(LineError::MissingFields { expected, found: n })
    }

    /// Fold a line sequence into records. Bad lines are discarded, never
    /// returned as errors.
    pub fn parse_lines<I, S>(&self, lines: I, account_type: AccountType) -> ParseOutcome
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        lines
            .into_iter()
            .enumerate()
            .fold(ParseOutcome::default(), |mut out, (i, line)| {
                let line = line.as_ref();
                if !is_transaction_start(line) {
                    out.ignored += 1;
                    return out;
                }

                match self.parse_line(line, account_type) {
                    Ok(record) => out.records.push(record),
                    Err(error) => {
                        debug!(line_number = i + 1, %error, "discarding statement line");
                        out.discards.push(LineDiscard {
                            line_number: i + 1,
                            error,
                        });
                    }
                }
                out
            })
    }

    /// Parse already extracted statement text
    pub fn parse_text(&self, text: &str, account_type: AccountType) -> ParseOutcome {
        self.parse_lines(text.lines(), account_type)
    }
}
