//! Tabular report export: one CSV row per record.
//!
//! Columns: Date, Description, Amount, Balance, Account Type, Category, Type

use passbook_core::TransactionRecord;
use rust_decimal::Decimal;
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use thiserror::Error;
use tracing::info;

use crate::summary::Summary;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Debug, Serialize)]
struct ReportRow<'a> {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Description")]
    description: &'a str,
    #[serde(rename = "Amount")]
    amount: Decimal,
    #[serde(rename = "Balance")]
    balance: Option<Decimal>,
    #[serde(rename = "Account Type")]
    account_type: &'static str,
    #[serde(rename = "Category")]
    category: &'static str,
    #[serde(rename = "Type")]
    direction: &'static str,
}

impl<'a> From<&'a TransactionRecord> for ReportRow<'a> {
    fn from(r: &'a TransactionRecord) -> Self {
        Self {
            date: r.date().format("%Y-%m-%d").to_string(),
            description: r.description(),
            amount: r.amount(),
            balance: r.balance(),
            account_type: r.account_type().label(),
            category: r.category().label(),
            direction: r.direction().label(),
        }
    }
}

/// Records from one or more statements, concatenated in caller order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    records: Vec<TransactionRecord>,
}

impl Report {
    pub fn new(records: Vec<TransactionRecord>) -> Self {
        Self { records }
    }

    /// Append another statement's records after the existing ones
    pub fn extend(&mut self, records: impl IntoIterator<Item = TransactionRecord>) {
        self.records.extend(records);
    }

    pub fn records(&self) -> &[TransactionRecord] {
        &self.records
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn summary(&self) -> Summary {
        Summary::from_records(&self.records)
    }

    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), ReportError> {
        let mut wtr = csv::Writer::from_writer(writer);
        if self.records.is_empty() {
            wtr.write_record([
                "Date",
                "Description",
                "Amount",
                "Balance",
                "Account Type",
                "Category",
                "Type",
            ])?;
        }
        for r in &self.records {
            wtr.serialize(ReportRow::from(r))?;
        }
        wtr.flush()?;
        Ok(())
    }

    pub fn write_csv_path(&self, path: impl AsRef<Path>) -> Result<(), ReportError> {
        let path = path.as_ref();
        let file = std::fs::File::create(path)?;
        self.write_csv(file)?;
        info!(path = %path.display(), rows = self.records.len(), "wrote report");
        Ok(())
    }
}
