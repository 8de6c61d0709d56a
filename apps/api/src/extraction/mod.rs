// Document Extractor
// Turns uploaded bytes into normalized plain text. Synchronous and CPU-bound:
// callers run it inside tokio::task::spawn_blocking under a timeout.

pub mod docx;
pub mod format;
pub mod pdf;

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

pub use format::{resolve_format, DeclaredType, DocumentFormat};

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Unsupported document format")]
    UnsupportedFormat,

    #[error("Could not extract text: {0}")]
    ExtractionFailed(String),

    #[error("Text extraction timed out after {0}s")]
    ExtractionTimeout(u64),
}

static HORIZONTAL_WS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t\x0B\x0C\u{A0}]+").unwrap());
static WS_BEFORE_NEWLINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]*\r?\n").unwrap());

/// Extracts and normalizes the text of a document.
pub fn extract(bytes: &[u8], declared: &DeclaredType) -> Result<String, ExtractError> {
    let format = resolve_format(bytes, declared).ok_or(ExtractError::UnsupportedFormat)?;
    let raw = match format {
        DocumentFormat::Pdf => pdf::extract_pdf(bytes)?,
        DocumentFormat::Docx => docx::extract_docx(bytes)?,
        DocumentFormat::PlainText => decode_text(bytes),
    };
    tracing::debug!(?format, chars = raw.len(), "extracted document text");
    Ok(normalize_whitespace(&raw))
}

fn decode_text(bytes: &[u8]) -> String {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    String::from_utf8_lossy(bytes).into_owned()
}

/// Collapses runs of horizontal whitespace, drops trailing spaces on each
/// line and trims the whole text. Line structure is preserved because the
/// field parser is line-oriented.
pub fn normalize_whitespace(text: &str) -> String {
    let collapsed = HORIZONTAL_WS.replace_all(text, " ");
    let lines = WS_BEFORE_NEWLINE.replace_all(&collapsed, "\n");
    lines.trim().to_string()
}
