//! passbook-ingest: statement PDF text extraction and the ICICI line parser.

pub mod extract;
pub mod layout;
pub mod parsers;
pub mod types;

pub use extract::{ExtractedLines, PageSource, PdfDocument, extract_lines};
pub use parsers::icici::{StatementParser, is_transaction_start};
pub use types::{LineDiscard, ParseOutcome, StatementOutcome};

use passbook_core::{AccountType, DocumentError, TransactionRecord};
use tracing::info;

/// Extract and parse one statement from any page source.
pub fn parse_source(
    source: &impl PageSource,
    account_type: AccountType,
    parser: &StatementParser,
) -> StatementOutcome {
    let extracted = extract_lines(source);
    let parsed = parser.parse_lines(&extracted.lines, account_type);

    info!(
        account_type = %account_type,
        records = parsed.records.len(),
        discarded = parsed.discard_count(),
        unreadable_pages = extracted.unreadable_pages.len(),
        "parsed statement"
    );

    StatementOutcome {
        parsed,
        unreadable_pages: extracted.unreadable_pages,
    }
}

/// Open, decrypt, extract and parse a statement PDF.
///
/// Only document-level failures are returned as errors; unreadable pages
/// and malformed lines are reported in the outcome.
pub fn parse_statement(
    document: &[u8],
    password: &str,
    account_type: AccountType,
    parser: &StatementParser,
) -> Result<StatementOutcome, DocumentError> {
    let pdf = PdfDocument::open(document, password)?;
    Ok(parse_source(&pdf, account_type, parser))
}

/// Parse a statement PDF with the standard category rules.
pub fn parse(
    document: &[u8],
    password: &str,
    account_type: AccountType,
) -> Result<Vec<TransactionRecord>, DocumentError> {
    parse_statement(document, password, account_type, &StatementParser::default())
        .map(StatementOutcome::into_records)
}
