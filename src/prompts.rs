//! System prompt for LLM-based document summarisation.
//!
//! Centralising the prompt here serves two purposes:
//!
//! 1. **Single source of truth** — the viewer's section parser depends on
//!    the output shape this prompt requests (`# ` headings, one point per
//!    line), so the contract lives in exactly one place.
//!
//! 2. **Testability** — unit tests can inspect the prompt directly without
//!    a live model call.
//!
//! Callers can override the default via
//! [`crate::config::DigestConfig::system_prompt`]; the constant here is
//! used only when no override is provided.

/// Default system prompt for turning extracted document text into a
/// sectioned, emoji-rich Markdown summary.
pub const SUMMARY_SYSTEM_PROMPT: &str = r##"You are an expert document summariser. Your task is to turn a document into an engaging, easy-to-read Markdown summary.

Follow these rules precisely:

1. STRUCTURE
   - Organise the summary into sections
   - Start EVERY section with a level-1 heading: a line beginning with "# "
   - Open with a "# Quick Overview" section and close with a "# Bottom Line" section
   - Between them, add sections for main points, key terms, and practical takeaways as the document warrants

2. POINTS
   - Inside a section, write exactly one point per line
   - Each point must stand alone — no multi-line sentences
   - Begin each point with a contextually relevant emoji
   - Keep points short and punchy

3. CONTENT
   - Capture the document's core arguments, findings, and conclusions
   - Prefer concrete facts and numbers over vague phrasing
   - Never invent content that is not in the document

4. OUTPUT FORMAT
   - Output ONLY the Markdown summary
   - Do NOT wrap the output in ```markdown fences
   - Do NOT add commentary or explanations before or after the summary"##;

/// Build the user message carrying the extracted document text.
pub fn summary_user_message(document_text: &str) -> String {
    format!(
        "Transform this document into an engaging, easy-to-read summary with \
         contextually relevant emojis and proper markdown formatting:\n\n{document_text}"
    )
}
