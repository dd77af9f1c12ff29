//! Pipeline stages for PDF summarisation.
//!
//! Each submodule implements exactly one transformation step. Keeping
//! stages separate makes each independently testable and lets us swap
//! implementations (e.g. switch extraction backend) without touching
//! other stages.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ extract ──▶ llm ──▶ postprocess
//! (URL/path) (pdf text)  (chain)  (cleanup)
//! ```
//!
//! 1. [`input`]   — canonicalise the user-supplied path or URL to a local file
//! 2. [`extract`] — pull plain text out of the PDF; runs in `spawn_blocking`
//!    because PDF parsing is CPU-bound
//! 3. [`llm`]     — drive the provider fallback chain with retry/backoff;
//!    the only stage with network I/O
//! 4. [`postprocess`] — deterministic text-cleanup rules to fix model
//!    quirks (markdown fences, stray CRLF, invisible Unicode, etc.)

pub mod extract;
pub mod input;
pub mod llm;
pub mod postprocess;
