//! Page-ordered text extraction from (optionally encrypted) statement PDFs.

use lopdf::content::Content;
use lopdf::encryption::DecryptionError;
use lopdf::{Document, ObjectId};
use passbook_core::{DocumentError, UnreadablePage};
use std::path::Path;
use tracing::{debug, warn};

use crate::layout::page_lines;

/// Anything that can hand out text one page at a time, in page order.
pub trait PageSource {
    fn page_count(&self) -> usize;

    /// Text of the page at `index` (0-based).
    fn page_text(&self, index: usize) -> Result<String, UnreadablePage>;
}

/// A loaded and decrypted PDF. Dropping it releases the document.
pub struct PdfDocument {
    doc: Document,
    /// 1-based page number and page object, in page order
    pages: Vec<(u32, ObjectId)>,
}

impl PdfDocument {
    /// Load a statement from memory, decrypting it with `password` when
    /// the file is encrypted.
    pub fn open(bytes: &[u8], password: &str) -> Result<Self, DocumentError> {
        let mut doc = Document::load_mem(bytes).map_err(|e| DocumentError::Unreadable {
            reason: e.to_string(),
        })?;

        if doc.is_encrypted() {
            // lopdf only implements RC4 handlers; anything else is unsupported,
            // not a wrong password
            doc.decrypt(password).map_err(|e| match &e {
                lopdf::Error::Decryption(DecryptionError::IncorrectPassword) => {
                    DocumentError::Decryption { reason: e.to_string() }
                }
                _ => DocumentError::Unreadable { reason: e.to_string() },
            })?;
            debug!("document decrypted");
        }

        let pages = doc.get_pages().into_iter().collect();
        Ok(Self { doc, pages })
    }

    pub fn open_path(path: impl AsRef<Path>, password: &str) -> Result<Self, DocumentError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| DocumentError::Unreadable {
            reason: format!("{}: {}", path.display(), e),
        })?;
        Self::open(&bytes, password)
    }
}

impl PageSource for PdfDocument {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_text(&self, index: usize) -> Result<String, UnreadablePage> {
        let (page, page_id) = self.pages.get(index).copied().ok_or_else(|| UnreadablePage {
            page: index as u32 + 1,
            reason: "no such page".to_string(),
        })?;

        let unreadable = |e: lopdf::Error| UnreadablePage {
            page,
            reason: e.to_string(),
        };
        let bytes = self.doc.get_page_content(page_id).map_err(unreadable)?;
        let content = Content::decode(&bytes).map_err(unreadable)?;

        Ok(page_lines(&content.operations).join("\n"))
    }
}

/// All lines of a document plus the pages that yielded nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedLines {
    pub lines: Vec<String>,
    pub unreadable_pages: Vec<UnreadablePage>,
}

/// Collect every line of every page, page order then in-page order.
///
/// A page without a text layer contributes zero lines; the rest of the
/// document is still read.
pub fn extract_lines(source: &impl PageSource) -> ExtractedLines {
    let mut out = ExtractedLines::default();

    for index in 0..source.page_count() {
        let page = index as u32 + 1;
        let text = match source.page_text(index) {
            Ok(t) if !t.trim().is_empty() => t,
            Ok(_) => {
                let err = UnreadablePage {
                    page,
                    reason: "empty text layer".to_string(),
                };
                warn!(page, "{}", err);
                out.unreadable_pages.push(err);
                continue;
            }
            Err(err) => {
                warn!(page, "{}", err);
                out.unreadable_pages.push(err);
                continue;
            }
        };

        out.lines.extend(text.lines().map(str::to_string));
    }

    out
}
