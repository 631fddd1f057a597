use passbook_core::{LineError, TransactionRecord, UnreadablePage};

/// A transaction-start line that failed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineDiscard {
    /// 1-based position in the input line sequence
    pub line_number: usize,
    pub error: LineError,
}

/// Result of folding a line sequence into records
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseOutcome {
    /// Validated records, in line order
    pub records: Vec<TransactionRecord>,
    pub discards: Vec<LineDiscard>,
    /// Lines without a leading date (headers, footers, wrapped narration)
    pub ignored: usize,
}

impl ParseOutcome {
    pub fn discard_count(&self) -> usize {
        self.discards.len()
    }
}

/// Everything learned from one statement document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatementOutcome {
    pub parsed: ParseOutcome,
    pub unreadable_pages: Vec<UnreadablePage>,
}

impl StatementOutcome {
    pub fn into_records(self) -> Vec<TransactionRecord> {
        self.parsed.records
    }
}
