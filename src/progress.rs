//! Progress-callback trait for pipeline stage events.
//!
//! Inject an [`Arc<dyn SummaryProgress>`] via
//! [`crate::config::DigestConfigBuilder::progress_callback`] to receive
//! real-time events as the pipeline moves through extraction and the
//! provider chain.
//!
//! # Why callbacks instead of channels?
//!
//! The callback approach is the least-invasive integration point: callers
//! can forward events to a channel, a WebSocket, a database record, or a
//! terminal spinner — without the library knowing anything about how the
//! host application communicates. The trait is `Send + Sync` so it remains
//! valid if the caller drives several summaries concurrently.

use crate::error::ProviderFailure;
use std::sync::Arc;

/// Called by the summarisation pipeline as it progresses.
///
/// All methods have default no-op implementations so callers only override
/// what they care about.
pub trait SummaryProgress: Send + Sync {
    /// Called once before text extraction begins.
    fn on_extract_start(&self, source: &str) {
        let _ = source;
    }

    /// Called when text extraction finishes.
    ///
    /// # Arguments
    /// * `word_count` — words in the cleaned, extracted text
    fn on_extract_complete(&self, word_count: usize) {
        let _ = word_count;
    }

    /// Called when a provider is about to be tried.
    fn on_provider_start(&self, provider: &str) {
        let _ = provider;
    }

    /// Called before each retry of a provider call (not before the first
    /// attempt).
    fn on_provider_retry(&self, provider: &str, attempt: u32, max_retries: u32) {
        let _ = (provider, attempt, max_retries);
    }

    /// Called when a provider is abandoned and the chain moves on.
    fn on_provider_failed(&self, failure: &ProviderFailure) {
        let _ = failure;
    }

    /// Called once when a summary has been produced and cleaned.
    ///
    /// # Arguments
    /// * `provider`     — the provider that succeeded
    /// * `markdown_len` — byte length of the cleaned Markdown
    fn on_summary_complete(&self, provider: &str, markdown_len: usize) {
        let _ = (provider, markdown_len);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgress;

impl SummaryProgress for NoopProgress {}

/// Convenience alias matching the type stored in [`crate::config::DigestConfig`].
pub type ProgressCallback = Arc<dyn SummaryProgress>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct TrackingProgress {
        extracts: AtomicUsize,
        provider_starts: AtomicUsize,
        failures: AtomicUsize,
        completes: AtomicUsize,
    }

    impl SummaryProgress for TrackingProgress {
        fn on_extract_complete(&self, _word_count: usize) {
            self.extracts.fetch_add(1, Ordering::SeqCst);
        }

        fn on_provider_start(&self, _provider: &str) {
            self.provider_starts.fetch_add(1, Ordering::SeqCst);
        }

        fn on_provider_failed(&self, _failure: &ProviderFailure) {
            self.failures.fetch_add(1, Ordering::SeqCst);
        }

        fn on_summary_complete(&self, _provider: &str, _markdown_len: usize) {
            self.completes.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn noop_callback_does_not_panic() {
        let cb = NoopProgress;
        cb.on_extract_start("document.pdf");
        cb.on_extract_complete(1200);
        cb.on_provider_start("openai");
        cb.on_provider_retry("openai", 1, 3);
        cb.on_provider_failed(&ProviderFailure::RateLimited {
            provider: "openai".into(),
        });
        cb.on_summary_complete("gemini", 2048);
    }

    #[test]
    fn tracking_callback_receives_events() {
        let tracker = TrackingProgress {
            extracts: AtomicUsize::new(0),
            provider_starts: AtomicUsize::new(0),
            failures: AtomicUsize::new(0),
            completes: AtomicUsize::new(0),
        };

        tracker.on_extract_start("doc.pdf");
        tracker.on_extract_complete(500);
        tracker.on_provider_start("openai");
        tracker.on_provider_failed(&ProviderFailure::RateLimited {
            provider: "openai".into(),
        });
        tracker.on_provider_start("gemini");
        tracker.on_summary_complete("gemini", 900);

        assert_eq!(tracker.extracts.load(Ordering::SeqCst), 1);
        assert_eq!(tracker.provider_starts.load(Ordering::SeqCst), 2);
        assert_eq!(tracker.failures.load(Ordering::SeqCst), 1);
        assert_eq!(tracker.completes.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn arc_dyn_callback_works() {
        let cb: Arc<dyn SummaryProgress> = Arc::new(NoopProgress);
        cb.on_extract_start("doc.pdf");
        cb.on_summary_complete("openai", 512);
    }
}
