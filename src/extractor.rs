//! Document text extraction.
//!
//! Turns uploaded bytes plus a filename hint into normalized text. PDF
//! uploads go through page-by-page extraction; everything else is decoded
//! as text. `extract_text` is the boundary used by the HTTP layer and never
//! fails; `try_extract_text` exposes the classified error for callers that
//! want it.

use lopdf::Document;
use thiserror::Error;

/// Errors that can occur during document text extraction.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The bytes could not be parsed as a PDF document.
    #[error("Failed to read PDF: {0}")]
    Pdf(#[from] lopdf::Error),
}

/// Extracts text from an uploaded document, degrading to an empty string.
///
/// Failures are logged and mapped to `""` so one bad upload cannot abort
/// the request pipeline.
pub fn extract_text(bytes: &[u8], filename: &str) -> String {
    match try_extract_text(bytes, filename) {
        Ok(text) => text,
        Err(e) => {
            tracing::error!("failed to extract text from '{filename}': {e}");
            String::new()
        }
    }
}

/// Extracts text from an uploaded document.
///
/// Dispatches on the filename suffix, case-insensitive: `.pdf` takes the
/// PDF path, anything else is treated as a text file. The suffix is the
/// only signal; no content sniffing is performed.
///
/// # Errors
///
/// Returns `ExtractError::Pdf` if the bytes are not a loadable PDF
/// document. The text path never fails.
pub fn try_extract_text(bytes: &[u8], filename: &str) -> Result<String, ExtractError> {
    if filename.to_ascii_lowercase().ends_with(".pdf") {
        extract_pdf_text(bytes)
    } else {
        Ok(decode_text(bytes))
    }
}

/// Extracts text from every page of a PDF, in document order.
///
/// A page that yields no text (scanned or image-only) or whose extraction
/// fails is skipped. Page texts are trimmed and joined with single
/// newlines, so the result carries no leading or trailing whitespace.
fn extract_pdf_text(bytes: &[u8]) -> Result<String, ExtractError> {
    let doc = Document::load_mem(bytes)?;

    let mut pages: Vec<String> = Vec::new();
    for (page_num, _page_id) in doc.get_pages() {
        match doc.extract_text(&[page_num]) {
            Ok(text) => {
                let text = text.trim();
                if !text.is_empty() {
                    pages.push(text.to_string());
                }
            }
            Err(e) => {
                tracing::debug!("no text extracted from page {page_num}: {e}");
            }
        }
    }

    Ok(pages.join("\n"))
}

/// Decodes uploaded bytes as text: strict UTF-8 first, then Latin-1.
///
/// The fallback maps every byte to the Unicode scalar with the same value,
/// so it cannot fail and yields exactly one character per input byte.
fn decode_text(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}
