//! Text extraction: pull plain text out of a PDF.
//!
//! ## Why spawn_blocking?
//!
//! `pdf-extract` walks the whole document synchronously — content streams,
//! fonts, encodings. On a large PDF that is hundreds of milliseconds of
//! pure CPU, enough to stall a Tokio worker thread.
//! `tokio::task::spawn_blocking` moves the parse onto the blocking pool.
//!
//! ## Why collapse whitespace?
//!
//! Extracted text reflects page layout, not prose: hard-wrapped lines,
//! column gaps, stray form feeds. The model neither needs nor benefits
//! from any of it, and flattening makes word counts deterministic.

use crate::error::DigestError;
use crate::text;
use std::path::Path;
use tracing::{debug, info};

/// Extract and normalise the text of a PDF.
///
/// Returns the whitespace-collapsed text. An extraction that produces no
/// text at all (scanned/image-only documents) is an error — there is
/// nothing to summarise.
pub async fn extract_text(pdf_path: &Path) -> Result<String, DigestError> {
    let path = pdf_path.to_path_buf();

    let raw = tokio::task::spawn_blocking(move || {
        pdf_extract::extract_text(&path).map_err(|e| DigestError::ExtractionFailed {
            path: path.clone(),
            detail: e.to_string(),
        })
    })
    .await
    .map_err(|e| DigestError::Internal(format!("extraction task panicked: {e}")))??;

    debug!("Extracted {} raw bytes from {}", raw.len(), pdf_path.display());

    let cleaned = text::collapse_whitespace(&raw);
    if cleaned.is_empty() {
        return Err(DigestError::EmptyDocument {
            path: pdf_path.to_path_buf(),
        });
    }

    info!(
        "Extracted {} words from {}",
        text::count_words(&cleaned),
        pdf_path.display()
    );
    Ok(cleaned)
}
