//! Provider chain: call LLM providers in order until one yields a summary.
//!
//! The chain replaces nested error handling with a flat, typed walk: each
//! provider gets its own retry budget for transient failures, a rate-limit
//! response abandons the provider immediately (retrying into a rate limit
//! only digs the hole deeper), and every abandoned provider leaves a
//! [`ProviderFailure`] behind. The caller sees either a summary plus the
//! failures that preceded it, or [`DigestError::AllProvidersFailed`]
//! carrying the full attempt history.
//!
//! ## Retry Strategy
//!
//! Transient API errors (5xx, dropped connections) retry with exponential
//! backoff (`retry_backoff_ms * 2^attempt`): with the 500 ms default and
//! 3 retries the wait sequence is 500 ms → 1 s → 2 s, under 4 s of
//! back-off per provider.

use crate::config::DigestConfig;
use crate::error::{DigestError, ProviderFailure};
use crate::prompts::{summary_user_message, SUMMARY_SYSTEM_PROMPT};
use edgequake_llm::{ChatMessage, CompletionOptions, LLMProvider};
use std::sync::Arc;
use tokio::time::{sleep, timeout, Duration};
use tracing::{debug, warn};

/// A provider with the display name used in logs, progress events, and
/// failure reports.
pub struct NamedProvider {
    pub name: String,
    pub provider: Arc<dyn LLMProvider>,
}

/// The successful end of a chain walk.
#[derive(Debug)]
pub struct ChainSummary {
    pub markdown: String,
    /// Provider that produced the summary.
    pub provider: String,
    /// Providers abandoned before `provider` succeeded.
    pub failed_attempts: Vec<ProviderFailure>,
    /// Retries spent on the successful provider.
    pub retries: u32,
    pub input_tokens: u64,
    pub output_tokens: u64,
}

/// Walk the provider chain until one produces a non-empty summary.
pub async fn summarize_text(
    providers: &[NamedProvider],
    document_text: &str,
    config: &DigestConfig,
) -> Result<ChainSummary, DigestError> {
    let system_prompt = config
        .system_prompt
        .as_deref()
        .unwrap_or(SUMMARY_SYSTEM_PROMPT);

    let messages = vec![
        ChatMessage::system(system_prompt),
        ChatMessage::user(summary_user_message(document_text)),
    ];

    let mut failed_attempts = Vec::new();

    for named in providers {
        if let Some(ref cb) = config.progress_callback {
            cb.on_provider_start(&named.name);
        }

        match call_provider(named, &messages, config).await {
            Ok(summary) => {
                debug!(
                    "Provider '{}' produced {} bytes after {} prior failure(s)",
                    named.name,
                    summary.markdown.len(),
                    failed_attempts.len()
                );
                return Ok(ChainSummary {
                    failed_attempts,
                    ..summary
                });
            }
            Err(failure) => {
                warn!("Provider '{}' abandoned: {}", named.name, failure);
                if let Some(ref cb) = config.progress_callback {
                    cb.on_provider_failed(&failure);
                }
                failed_attempts.push(failure);
            }
        }
    }

    Err(DigestError::AllProvidersFailed {
        attempts: failed_attempts,
    })
}

/// Call one provider with retry/backoff. Returns a typed failure rather
/// than an error so the chain can keep walking.
async fn call_provider(
    named: &NamedProvider,
    messages: &[ChatMessage],
    config: &DigestConfig,
) -> Result<ChainSummary, ProviderFailure> {
    let options = build_options(config);
    let call_timeout = Duration::from_secs(config.api_timeout_secs);
    let mut last_err = String::new();

    for attempt in 0..=config.max_retries {
        if attempt > 0 {
            let backoff = config.retry_backoff_ms * 2u64.pow(attempt - 1);
            warn!(
                "Provider '{}': retry {}/{} after {}ms",
                named.name, attempt, config.max_retries, backoff
            );
            if let Some(ref cb) = config.progress_callback {
                cb.on_provider_retry(&named.name, attempt, config.max_retries);
            }
            sleep(Duration::from_millis(backoff)).await;
        }

        match timeout(call_timeout, named.provider.chat(messages, Some(&options))).await {
            // Timed out: this provider is slow or wedged — move on rather
            // than burning the retry budget on it.
            Err(_) => {
                return Err(ProviderFailure::Timeout {
                    provider: named.name.clone(),
                    secs: config.api_timeout_secs,
                });
            }
            Ok(Ok(response)) => {
                let markdown = response.content.trim().to_string();
                if markdown.is_empty() {
                    last_err = "empty completion".to_string();
                    continue;
                }
                return Ok(ChainSummary {
                    markdown,
                    provider: named.name.clone(),
                    failed_attempts: Vec::new(),
                    retries: attempt,
                    input_tokens: response.prompt_tokens as u64,
                    output_tokens: response.completion_tokens as u64,
                });
            }
            Ok(Err(e)) => {
                let detail = e.to_string();
                if is_rate_limit(&detail) {
                    return Err(ProviderFailure::RateLimited {
                        provider: named.name.clone(),
                    });
                }
                warn!(
                    "Provider '{}': attempt {} failed — {}",
                    named.name,
                    attempt + 1,
                    detail
                );
                last_err = detail;
            }
        }
    }

    Err(ProviderFailure::Api {
        provider: named.name.clone(),
        retries: config.max_retries,
        detail: last_err,
    })
}

/// Classify an API error message as a rate-limit response.
///
/// Provider SDKs render 429s inconsistently, so this matches the common
/// spellings rather than a status code.
fn is_rate_limit(detail: &str) -> bool {
    let lower = detail.to_lowercase();
    lower.contains("429")
        || lower.contains("rate limit")
        || lower.contains("rate_limit")
        || lower.contains("too many requests")
        || lower.contains("quota")
}

/// Build `CompletionOptions` from the digest config.
fn build_options(config: &DigestConfig) -> CompletionOptions {
    CompletionOptions {
        temperature: Some(config.temperature),
        max_tokens: Some(config.max_tokens),
        ..Default::default()
    }
}
