//! # pdfdigest
//!
//! Summarise PDF documents into navigable Markdown digests using LLMs.
//!
//! ## Why this crate?
//!
//! Reading a fifty-page PDF to find out whether it matters is the wrong
//! use of anyone's time. This crate extracts the document's text, asks an
//! LLM for a sectioned, emoji-annotated Markdown summary, and models that
//! summary as typed sections you can page through — the same shape a
//! summary-viewer UI needs, without the UI.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Input    resolve local file or download from URL
//!  ├─ 2. Extract  pull plain text (CPU-bound, spawn_blocking)
//!  ├─ 3. LLM      provider fallback chain (openai → gemini → …)
//!  ├─ 4. Polish   deterministic Markdown cleanup
//!  ├─ 5. Persist  optional SQLite store (summaries + billing)
//!  └─ 6. View     sections + pager + render contract
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdfdigest::{summarize, DigestConfig, SectionPager};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Providers auto-detected from OPENAI_API_KEY / GEMINI_API_KEY
//!     let config = DigestConfig::default();
//!     let output = summarize("document.pdf", &config).await?;
//!
//!     let mut pager = SectionPager::from_markdown(&output.markdown);
//!     println!("{} sections", pager.len());
//!     pager.next();
//!     println!("## {}", pager.current().title);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdfdigest` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library to avoid pulling in CLI-only deps:
//! ```toml
//! pdfdigest = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod billing;
pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod prompts;
pub mod store;
pub mod summarize;
pub mod text;
pub mod viewer;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use billing::{CheckoutOutcome, CheckoutSession, UserRecord};
pub use config::{DigestConfig, DigestConfigBuilder, ProviderSpec};
pub use error::{DigestError, ProviderFailure};
pub use output::{ExtractedDocument, SummaryOutput, SummaryRecord, SummaryStats};
pub use progress::{NoopProgress, ProgressCallback, SummaryProgress};
pub use store::{NewSummary, Store, StoreError};
pub use summarize::{
    extract_only, summarize, summarize_from_bytes, summarize_many, summarize_sync,
    summarize_to_file,
};
pub use viewer::{parse_sections, render_sections, PagerView, Section, SectionPager};
