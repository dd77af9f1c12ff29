//! Configuration types for PDF summarisation.
//!
//! All behaviour is controlled through [`DigestConfig`], built via its
//! [`DigestConfigBuilder`]. Keeping every knob in one struct makes it
//! trivial to share configs across tasks, log them, and diff two runs to
//! understand why their outputs differ.

use crate::error::DigestError;
use crate::progress::ProgressCallback;
use edgequake_llm::LLMProvider;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// A named provider/model pair for the fallback chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderSpec {
    /// Provider name understood by the factory: "openai", "anthropic",
    /// "gemini", "ollama", …
    pub provider: String,
    /// Model identifier, e.g. "gpt-4o" or "gemini-2.0-flash".
    pub model: String,
}

impl ProviderSpec {
    pub fn new(provider: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            model: model.into(),
        }
    }

    /// Parse a `provider` or `provider:model` CLI argument, filling in the
    /// provider's default model when none is given.
    pub fn parse(spec: &str) -> Self {
        match spec.split_once(':') {
            Some((provider, model)) if !model.is_empty() => Self::new(provider, model),
            _ => {
                let provider = spec.trim_end_matches(':');
                Self::new(provider, default_model_for(provider))
            }
        }
    }
}

/// Default model per provider, used when a spec names only the provider.
pub fn default_model_for(provider: &str) -> &'static str {
    match provider {
        "openai" => "gpt-4o",
        "anthropic" => "claude-sonnet-4-20250514",
        "gemini" => "gemini-2.0-flash",
        "ollama" => "llama3.2",
        _ => "gpt-4o",
    }
}

/// Configuration for one summarisation run.
///
/// Built via [`DigestConfig::builder()`] or [`DigestConfig::default()`].
///
/// # Example
/// ```rust
/// use pdfdigest::{DigestConfig, ProviderSpec};
///
/// let config = DigestConfig::builder()
///     .provider_spec(ProviderSpec::new("openai", "gpt-4o"))
///     .fallback(ProviderSpec::new("gemini", "gemini-2.0-flash"))
///     .max_tokens(1500)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct DigestConfig {
    /// Pre-constructed providers, tried in order. Takes precedence over
    /// `provider_specs`. Useful in tests or when the caller needs custom
    /// middleware around the provider.
    pub providers: Vec<Arc<dyn LLMProvider>>,

    /// Named provider/model pairs, tried in order. The first entry is the
    /// primary; the rest are fallbacks. If empty along with `providers`,
    /// the chain is auto-detected from the environment.
    pub provider_specs: Vec<ProviderSpec>,

    /// Sampling temperature for the summary completion. Default: 0.7.
    ///
    /// Summaries want some rephrasing freedom, unlike transcription tasks
    /// that pin temperature near zero.
    pub temperature: f32,

    /// Maximum tokens the model may generate. Default: 1500.
    ///
    /// A sectioned summary of even a book-length document fits comfortably;
    /// anything longer stops being a summary.
    pub max_tokens: usize,

    /// Maximum retry attempts per provider on a transient failure. Default: 3.
    ///
    /// Rate-limit responses are never retried on the same provider — they
    /// advance the fallback chain immediately.
    pub max_retries: u32,

    /// Initial retry delay in milliseconds (exponential backoff). Default: 500.
    ///
    /// Doubles after each attempt: 500 ms → 1 s → 2 s.
    pub retry_backoff_ms: u64,

    /// Reject documents above this word count. Default: 50 000.
    pub max_input_words: usize,

    /// Truncate prompt text beyond this many characters. Default: 50 000.
    ///
    /// Distinct from `max_input_words`: the word limit rejects outright,
    /// the character budget silently cuts what is sent to the model (a
    /// visible truncation marker is appended).
    pub max_prompt_chars: usize,

    /// Custom system prompt. If None, uses
    /// [`crate::prompts::SUMMARY_SYSTEM_PROMPT`].
    pub system_prompt: Option<String>,

    /// Download timeout for URL inputs in seconds. Default: 120.
    pub download_timeout_secs: u64,

    /// Per-provider-call timeout in seconds. Default: 60.
    pub api_timeout_secs: u64,

    /// Optional progress callback for stage and provider events.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for DigestConfig {
    fn default() -> Self {
        Self {
            providers: Vec::new(),
            provider_specs: Vec::new(),
            temperature: 0.7,
            max_tokens: 1500,
            max_retries: 3,
            retry_backoff_ms: 500,
            max_input_words: 50_000,
            max_prompt_chars: 50_000,
            system_prompt: None,
            download_timeout_secs: 120,
            api_timeout_secs: 60,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for DigestConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DigestConfig")
            .field("providers", &format!("{} pre-built", self.providers.len()))
            .field("provider_specs", &self.provider_specs)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_ms", &self.retry_backoff_ms)
            .field("max_input_words", &self.max_input_words)
            .field("max_prompt_chars", &self.max_prompt_chars)
            .field("download_timeout_secs", &self.download_timeout_secs)
            .field("api_timeout_secs", &self.api_timeout_secs)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn SummaryProgress>"),
            )
            .finish()
    }
}

impl DigestConfig {
    /// Create a new builder for `DigestConfig`.
    pub fn builder() -> DigestConfigBuilder {
        DigestConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`DigestConfig`].
#[derive(Debug)]
pub struct DigestConfigBuilder {
    config: DigestConfig,
}

impl DigestConfigBuilder {
    /// Add a pre-constructed provider to the end of the chain.
    pub fn provider(mut self, provider: Arc<dyn LLMProvider>) -> Self {
        self.config.providers.push(provider);
        self
    }

    /// Add a named provider/model pair to the end of the chain.
    pub fn provider_spec(mut self, spec: ProviderSpec) -> Self {
        self.config.provider_specs.push(spec);
        self
    }

    /// Alias for [`provider_spec`](Self::provider_spec) that reads better
    /// when appending after a primary.
    pub fn fallback(self, spec: ProviderSpec) -> Self {
        self.provider_spec(spec)
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.temperature = t.clamp(0.0, 2.0);
        self
    }

    pub fn max_tokens(mut self, n: usize) -> Self {
        self.config.max_tokens = n.max(1);
        self
    }

    pub fn max_retries(mut self, n: u32) -> Self {
        self.config.max_retries = n;
        self
    }

    pub fn retry_backoff_ms(mut self, ms: u64) -> Self {
        self.config.retry_backoff_ms = ms;
        self
    }

    pub fn max_input_words(mut self, n: usize) -> Self {
        self.config.max_input_words = n.max(1);
        self
    }

    pub fn max_prompt_chars(mut self, n: usize) -> Self {
        self.config.max_prompt_chars = n.max(100);
        self
    }

    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.system_prompt = Some(prompt.into());
        self
    }

    pub fn download_timeout_secs(mut self, secs: u64) -> Self {
        self.config.download_timeout_secs = secs;
        self
    }

    pub fn api_timeout_secs(mut self, secs: u64) -> Self {
        self.config.api_timeout_secs = secs;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<DigestConfig, DigestError> {
        let c = &self.config;
        if c.max_tokens == 0 {
            return Err(DigestError::InvalidConfig("max_tokens must be ≥ 1".into()));
        }
        if c.api_timeout_secs == 0 {
            return Err(DigestError::InvalidConfig(
                "api_timeout_secs must be ≥ 1".into(),
            ));
        }
        for spec in &c.provider_specs {
            if spec.provider.is_empty() {
                return Err(DigestError::InvalidConfig(
                    "provider name must not be empty".into(),
                ));
            }
        }
        Ok(self.config)
    }
}
