//! Top-level summarisation entry points.
//!
//! [`summarize`] runs the whole pipeline — resolve, extract, provider
//! chain, cleanup — and returns the finished [`SummaryOutput`]. The
//! variants cover the common call shapes: in-memory bytes, direct-to-file
//! with an atomic write, and a synchronous wrapper for non-async callers.
//! [`extract_only`] stops after extraction and needs no API key.

use crate::config::{default_model_for, DigestConfig, ProviderSpec};
use crate::error::DigestError;
use crate::output::{ExtractedDocument, SummaryOutput, SummaryStats};
use crate::pipeline::llm::NamedProvider;
use crate::pipeline::{extract, input, llm, postprocess};
use crate::text;
use edgequake_llm::{LLMProvider, ProviderFactory};
use futures::stream::{self, StreamExt};
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Summarise a PDF file or URL.
///
/// This is the primary entry point for the library.
///
/// # Arguments
/// * `source` — Local file path or HTTP/HTTPS URL to a PDF
/// * `config` — Summarisation configuration
///
/// # Errors
/// Returns `Err(DigestError)` when the input cannot be read, no text can
/// be extracted, the document exceeds the word limit, or every provider in
/// the fallback chain fails.
pub async fn summarize(
    source: impl AsRef<str>,
    config: &DigestConfig,
) -> Result<SummaryOutput, DigestError> {
    let total_start = Instant::now();
    let source = source.as_ref();
    info!("Starting summary: {}", source);

    // ── Step 1: Resolve input ────────────────────────────────────────────
    let resolved = input::resolve_source(source, config.download_timeout_secs).await?;
    let file_name = resolved.file_name();

    // ── Step 2: Extract text ─────────────────────────────────────────────
    if let Some(ref cb) = config.progress_callback {
        cb.on_extract_start(source);
    }
    let extract_start = Instant::now();
    let document_text = extract::extract_text(resolved.path()).await?;
    let extract_duration_ms = extract_start.elapsed().as_millis() as u64;

    let original_word_count = text::count_words(&document_text);
    if let Some(ref cb) = config.progress_callback {
        cb.on_extract_complete(original_word_count);
    }

    if original_word_count > config.max_input_words {
        return Err(DigestError::DocumentTooLarge {
            words: original_word_count,
            limit: config.max_input_words,
        });
    }

    // ── Step 3: Truncate prompt text to the character budget ────────────
    let prompt_text = text::truncate_for_prompt(&document_text, config.max_prompt_chars);
    let truncated = matches!(prompt_text, std::borrow::Cow::Owned(_));
    if truncated {
        debug!(
            "Prompt text truncated to {} chars (document has {} words)",
            config.max_prompt_chars, original_word_count
        );
    }

    // ── Step 4: Walk the provider chain ──────────────────────────────────
    let providers = resolve_providers(config)?;
    let llm_start = Instant::now();
    let chain = llm::summarize_text(&providers, &prompt_text, config).await?;
    let llm_duration_ms = llm_start.elapsed().as_millis() as u64;

    // ── Step 5: Clean the markdown ───────────────────────────────────────
    let markdown = postprocess::clean_summary_markdown(&chain.markdown);
    if let Some(ref cb) = config.progress_callback {
        cb.on_summary_complete(&chain.provider, markdown.len());
    }

    let stats = SummaryStats {
        provider: chain.provider,
        failed_attempts: chain.failed_attempts,
        retries: chain.retries,
        input_tokens: chain.input_tokens,
        output_tokens: chain.output_tokens,
        extract_duration_ms,
        llm_duration_ms,
        total_duration_ms: total_start.elapsed().as_millis() as u64,
    };

    info!(
        "Summary complete via '{}': {} words in, {} words out, {}ms total",
        stats.provider,
        original_word_count,
        text::count_words(&markdown),
        stats.total_duration_ms
    );

    Ok(SummaryOutput {
        title: text::format_file_name_as_title(&file_name),
        summary_word_count: text::count_words(&markdown),
        markdown,
        source: source.to_string(),
        file_name,
        original_word_count,
        truncated,
        stats,
    })
}

/// Summarise PDF bytes already in memory.
///
/// The bytes are written to a managed [`tempfile`] which is cleaned up
/// automatically on return or panic. `file_name` is used for the record
/// title, the way an upload pipeline carries the original name alongside
/// the blob.
pub async fn summarize_from_bytes(
    bytes: &[u8],
    file_name: &str,
    config: &DigestConfig,
) -> Result<SummaryOutput, DigestError> {
    let mut tmp = tempfile::NamedTempFile::new()
        .map_err(|e| DigestError::Internal(format!("tempfile: {e}")))?;
    tmp.write_all(bytes)
        .map_err(|e| DigestError::Internal(format!("tempfile write: {e}")))?;
    let path = tmp.path().to_string_lossy().to_string();

    // `tmp` is dropped (and the file deleted) when `summarize` returns.
    let mut output = summarize(&path, config).await?;

    // The temp path is meaningless to the caller; report their name instead.
    output.file_name = file_name.to_string();
    output.title = text::format_file_name_as_title(file_name);
    output.source = file_name.to_string();
    Ok(output)
}

/// Summarise several PDFs, running up to `concurrency` documents at once.
///
/// Summaries are network-bound, so a batch overlaps well. Results come
/// back in input order regardless of completion order, and each input
/// fails or succeeds on its own — one bad document does not abort the
/// batch.
pub async fn summarize_many(
    sources: &[String],
    concurrency: usize,
    config: &DigestConfig,
) -> Vec<Result<SummaryOutput, DigestError>> {
    let mut results: Vec<(usize, Result<SummaryOutput, DigestError>)> =
        stream::iter(sources.iter().enumerate().map(|(idx, source)| {
            let config = config.clone();
            async move { (idx, summarize(source, &config).await) }
        }))
        .buffer_unordered(concurrency.max(1))
        .collect()
        .await;

    results.sort_by_key(|(idx, _)| *idx);
    results.into_iter().map(|(_, result)| result).collect()
}

/// Summarise a PDF and write the Markdown directly to a file.
///
/// Uses atomic write (temp file + rename) to prevent partial files.
pub async fn summarize_to_file(
    source: impl AsRef<str>,
    output_path: impl AsRef<Path>,
    config: &DigestConfig,
) -> Result<SummaryOutput, DigestError> {
    let output = summarize(source, config).await?;
    let path = output_path.as_ref();

    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| DigestError::OutputWriteFailed {
                path: path.to_path_buf(),
                source: e,
            })?;
    }

    let tmp_path = path.with_extension("md.tmp");
    tokio::fs::write(&tmp_path, &output.markdown)
        .await
        .map_err(|e| DigestError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

    tokio::fs::rename(&tmp_path, path)
        .await
        .map_err(|e| DigestError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

    Ok(output)
}

/// Synchronous wrapper around [`summarize`].
///
/// Creates a temporary tokio runtime internally.
pub fn summarize_sync(
    source: impl AsRef<str>,
    config: &DigestConfig,
) -> Result<SummaryOutput, DigestError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| DigestError::Internal(format!("Failed to create tokio runtime: {e}")))?
        .block_on(summarize(source, config))
}

/// Extract a PDF's text without summarising it.
///
/// Does not require an LLM provider or API key.
pub async fn extract_only(source: impl AsRef<str>) -> Result<ExtractedDocument, DigestError> {
    let resolved = input::resolve_source(source.as_ref(), 120).await?;
    let text = extract::extract_text(resolved.path()).await?;
    Ok(ExtractedDocument {
        word_count: text::count_words(&text),
        file_name: resolved.file_name(),
        text,
    })
}

// ── Internal helpers ─────────────────────────────────────────────────────

/// Instantiate a named provider with the given model.
fn create_named_provider(spec: &ProviderSpec) -> Result<NamedProvider, DigestError> {
    let provider = ProviderFactory::create_llm_provider(&spec.provider, &spec.model).map_err(
        |e| DigestError::ProviderNotConfigured {
            provider: spec.provider.clone(),
            hint: format!("{e}"),
        },
    )?;
    Ok(NamedProvider {
        name: spec.provider.clone(),
        provider,
    })
}

/// Resolve the provider fallback chain, from most- to least-specific.
///
/// The four-level resolution lets library users and CLI users each set
/// exactly as much or as little as they need:
///
/// 1. **Pre-built providers** (`config.providers`) — the caller constructed
///    and configured them entirely; we use the list as-is. Useful in tests
///    or when the caller needs custom middleware.
///
/// 2. **Named specs** (`config.provider_specs`) — provider/model pairs
///    instantiated through [`ProviderFactory::create_llm_provider`], which
///    reads the corresponding API key (`OPENAI_API_KEY`, etc.) from the
///    environment. Order in the list is fallback order.
///
/// 3. **Environment pair** (`PDFDIGEST_LLM_PROVIDER` + `PDFDIGEST_MODEL`) —
///    a provider and model chosen at the execution-environment level
///    (Makefile, shell script, CI). Checked before auto-detection so the
///    choice is honoured even when multiple API keys are present.
///
/// 4. **Key-based detection** — an OpenAI/Gemini chain when their keys are
///    set (OpenAI primary, Gemini fallback), otherwise whatever
///    [`ProviderFactory::from_env`] finds.
fn resolve_providers(config: &DigestConfig) -> Result<Vec<NamedProvider>, DigestError> {
    // 1) User-provided providers take priority
    if !config.providers.is_empty() {
        return Ok(config
            .providers
            .iter()
            .enumerate()
            .map(|(i, p)| NamedProvider {
                name: format!("custom-{}", i + 1),
                provider: Arc::clone(p),
            })
            .collect());
    }

    // 2) Named provider/model specs
    if !config.provider_specs.is_empty() {
        return config
            .provider_specs
            .iter()
            .map(create_named_provider)
            .collect();
    }

    // 3) Environment pair
    if let (Ok(provider), Ok(model)) = (
        std::env::var("PDFDIGEST_LLM_PROVIDER"),
        std::env::var("PDFDIGEST_MODEL"),
    ) {
        if !provider.is_empty() && !model.is_empty() {
            return Ok(vec![create_named_provider(&ProviderSpec::new(
                provider, model,
            ))?]);
        }
    }

    // 4) Key-based detection: OpenAI primary, Gemini fallback when both
    // keys are present — users with a single key get a one-entry chain.
    let mut chain = Vec::new();
    if env_key_set("OPENAI_API_KEY") {
        chain.push(create_named_provider(&ProviderSpec::new(
            "openai",
            default_model_for("openai"),
        ))?);
    }
    if env_key_set("GEMINI_API_KEY") {
        chain.push(create_named_provider(&ProviderSpec::new(
            "gemini",
            default_model_for("gemini"),
        ))?);
    }
    if !chain.is_empty() {
        return Ok(chain);
    }

    let (provider, _embedding): (Arc<dyn LLMProvider>, _) =
        ProviderFactory::from_env().map_err(|e| DigestError::ProviderNotConfigured {
            provider: "auto".to_string(),
            hint: format!(
                "No LLM provider could be auto-detected from environment.\n\
                Set OPENAI_API_KEY, GEMINI_API_KEY, or configure a provider.\n\
                Error: {e}"
            ),
        })?;

    Ok(vec![NamedProvider {
        name: "auto".to_string(),
        provider,
    }])
}

fn env_key_set(name: &str) -> bool {
    std::env::var(name).map(|v| !v.is_empty()).unwrap_or(false)
}
