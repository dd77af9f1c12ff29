//! Output types returned by the summarisation pipeline and the store.

use crate::error::ProviderFailure;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The result of one successful summarisation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryOutput {
    /// Human-readable title derived from the source file name.
    pub title: String,
    /// The cleaned Markdown summary (the `RawSummary` the viewer parses).
    pub markdown: String,
    /// The input exactly as the caller supplied it (path or URL).
    pub source: String,
    /// File name of the source document.
    pub file_name: String,
    /// Word count of the extracted document text.
    pub original_word_count: usize,
    /// Word count of the produced summary.
    pub summary_word_count: usize,
    /// True when the prompt text was cut at the character budget.
    pub truncated: bool,
    /// Timing, token, and fallback statistics.
    pub stats: SummaryStats,
}

/// Statistics describing one summarisation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryStats {
    /// Provider that produced the summary.
    pub provider: String,
    /// Providers that were tried and failed before `provider` succeeded.
    pub failed_attempts: Vec<ProviderFailure>,
    /// Retries spent on the successful provider.
    pub retries: u32,
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub extract_duration_ms: u64,
    pub llm_duration_ms: u64,
    pub total_duration_ms: u64,
}

/// Extracted text plus the facts derived from it — the output of
/// [`crate::summarize::extract_only`], which needs no API key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedDocument {
    /// Whitespace-normalised document text.
    pub text: String,
    pub word_count: usize,
    pub file_name: String,
}

/// One persisted summary row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryRecord {
    pub id: i64,
    pub user_id: String,
    pub title: String,
    pub summary_text: String,
    pub file_name: String,
    pub file_url: Option<String>,
    /// Word count of the summary text.
    pub word_count: usize,
    pub created_at: DateTime<Utc>,
}

impl SummaryRecord {
    /// Estimated reading time in minutes at ~200 words per minute,
    /// rounded up. Zero-word records read in zero minutes.
    pub fn reading_time_minutes(&self) -> usize {
        self.word_count.div_ceil(200)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(word_count: usize) -> SummaryRecord {
        SummaryRecord {
            id: 1,
            user_id: "u1".into(),
            title: "Title".into(),
            summary_text: String::new(),
            file_name: "f.pdf".into(),
            file_url: None,
            word_count,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn reading_time_rounds_up() {
        assert_eq!(record(0).reading_time_minutes(), 0);
        assert_eq!(record(1).reading_time_minutes(), 1);
        assert_eq!(record(200).reading_time_minutes(), 1);
        assert_eq!(record(201).reading_time_minutes(), 2);
    }

    #[test]
    fn summary_output_round_trips_through_json() {
        let out = SummaryOutput {
            title: "Paper".into(),
            markdown: "# Quick Overview\n💡 point".into(),
            source: "paper.pdf".into(),
            file_name: "paper.pdf".into(),
            original_word_count: 4000,
            summary_word_count: 120,
            truncated: false,
            stats: SummaryStats {
                provider: "openai".into(),
                failed_attempts: vec![],
                retries: 0,
                input_tokens: 5000,
                output_tokens: 300,
                extract_duration_ms: 40,
                llm_duration_ms: 2100,
                total_duration_ms: 2200,
            },
        };
        let json = serde_json::to_string(&out).unwrap();
        let back: SummaryOutput = serde_json::from_str(&json).unwrap();
        assert_eq!(back.title, "Paper");
        assert_eq!(back.stats.provider, "openai");
    }
}
