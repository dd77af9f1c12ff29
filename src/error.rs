//! Error types for the pdfdigest library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`DigestError`] — **Fatal**: the summary cannot be produced at all
//!   (bad input file, no extractable text, every provider exhausted).
//!   Returned as `Err(DigestError)` from the top-level `summarize*`
//!   functions.
//!
//! * [`ProviderFailure`] — **Non-fatal**: one provider in the fallback
//!   chain failed (rate limit, timeout, API error) but the next provider
//!   may still succeed. Collected per attempt and surfaced in
//!   [`DigestError::AllProvidersFailed`] only when the whole chain is
//!   exhausted, so callers can see exactly why each provider was skipped.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the pdfdigest library.
///
/// Per-provider failures use [`ProviderFailure`] and are carried inside
/// [`DigestError::AllProvidersFailed`] rather than propagated one by one.
#[derive(Debug, Error)]
pub enum DigestError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The input string is not a valid file path or URL.
    #[error("Invalid input '{input}': not a file path or a valid HTTP/HTTPS URL")]
    InvalidInput { input: String },

    /// HTTP URL was syntactically valid but download failed.
    #[error("Failed to download '{url}': {reason}\nCheck your internet connection.")]
    DownloadFailed { url: String, reason: String },

    /// Download exceeded the configured timeout.
    #[error("Download timed out after {secs}s for '{url}'\nIncrease --download-timeout.")]
    DownloadTimeout { url: String, secs: u64 },

    /// The file exists and was read, but is not a PDF.
    #[error("File is not a valid PDF: '{path}'\nFirst bytes: {magic:?}")]
    NotAPdf { path: PathBuf, magic: [u8; 4] },

    // ── Extraction errors ─────────────────────────────────────────────────
    /// The PDF could not be parsed into text.
    #[error("Failed to extract text from '{path}': {detail}")]
    ExtractionFailed { path: PathBuf, detail: String },

    /// Extraction succeeded but produced no text at all.
    #[error("No text could be extracted from '{path}'\nThe document may be image-based or empty.")]
    EmptyDocument { path: PathBuf },

    /// The extracted text exceeds the configured word limit.
    #[error("Document is too large: {words} words (limit {limit})\nRaise --max-words or summarise a smaller file.")]
    DocumentTooLarge { words: usize, limit: usize },

    // ── LLM errors ────────────────────────────────────────────────────────
    /// The configured provider is not initialised (missing API key etc.).
    #[error("LLM provider '{provider}' is not configured.\n{hint}")]
    ProviderNotConfigured { provider: String, hint: String },

    /// Every provider in the fallback chain failed.
    #[error("No provider produced a summary ({} tried): {}", .attempts.len(), describe_attempts(.attempts))]
    AllProvidersFailed { attempts: Vec<ProviderFailure> },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write the output Markdown file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// One failed attempt in the provider fallback chain.
///
/// A `RateLimited` failure skips straight to the next provider; the other
/// variants are reported after retries for that provider are spent.
#[derive(Debug, Clone, Error, serde::Serialize, serde::Deserialize)]
pub enum ProviderFailure {
    /// The provider answered with a rate-limit response (HTTP 429 / quota).
    #[error("provider '{provider}' hit a rate limit")]
    RateLimited { provider: String },

    /// No response within the per-call timeout.
    #[error("provider '{provider}' timed out after {secs}s")]
    Timeout { provider: String, secs: u64 },

    /// The API kept failing through every retry.
    #[error("provider '{provider}' failed after {retries} retries: {detail}")]
    Api {
        provider: String,
        retries: u32,
        detail: String,
    },
}

impl ProviderFailure {
    /// Name of the provider this failure belongs to.
    pub fn provider(&self) -> &str {
        match self {
            ProviderFailure::RateLimited { provider }
            | ProviderFailure::Timeout { provider, .. }
            | ProviderFailure::Api { provider, .. } => provider,
        }
    }
}

fn describe_attempts(attempts: &[ProviderFailure]) -> String {
    if attempts.is_empty() {
        return "no providers were available".to_string();
    }
    attempts
        .iter()
        .map(|a| a.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}
