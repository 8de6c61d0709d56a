use std::panic;

use tracing::warn;

use super::ExtractError;

/// Extracts the text layer of a PDF. Image-only PDFs yield an empty string.
///
/// `pdf-extract` panics on some malformed inputs instead of returning an
/// error, so the call is wrapped in `catch_unwind`.
pub fn extract_pdf(bytes: &[u8]) -> Result<String, ExtractError> {
    let result = panic::catch_unwind(|| pdf_extract::extract_text_from_mem(bytes));

    match result {
        Ok(Ok(text)) => {
            if text.trim().is_empty() {
                warn!("PDF has no text layer; OCR would be required");
            }
            Ok(text)
        }
        Ok(Err(e)) => Err(ExtractError::ExtractionFailed(format!("unreadable PDF: {e}"))),
        Err(_) => Err(ExtractError::ExtractionFailed(
            "PDF parser aborted on a malformed document".to_string(),
        )),
    }
}
