//! Small text utilities shared across the pipeline: word counting,
//! whitespace normalisation, prompt truncation, and filename-to-title
//! formatting.

use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;

/// Marker appended to prompt text that was cut at the character budget.
///
/// Kept visible in the prompt so the model knows the document continues
/// past what it sees and does not invent an ending.
pub const TRUNCATION_MARKER: &str = "\n\n[Document truncated due to length...]";

/// Count words as whitespace-separated tokens.
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Collapse every run of whitespace (including newlines) to a single space.
///
/// Extracted PDF text carries layout artefacts — hard line breaks mid
/// sentence, column gaps, form feeds. None of it matters to the model, and
/// flattening it makes the word count stable across extraction backends.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Cut `text` to at most `max_chars` characters, appending
/// [`TRUNCATION_MARKER`] when anything was dropped.
///
/// Returns `Cow::Borrowed` when the text already fits.
pub fn truncate_for_prompt(text: &str, max_chars: usize) -> Cow<'_, str> {
    let mut indices = text.char_indices();
    match indices.nth(max_chars) {
        None => Cow::Borrowed(text),
        Some((byte_idx, _)) => {
            let mut cut = text[..byte_idx].to_string();
            cut.push_str(TRUNCATION_MARKER);
            Cow::Owned(cut)
        }
    }
}

static RE_EXTENSION: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.[^/.]+$").unwrap());
static RE_SEPARATORS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[-_]+").unwrap());
static RE_CAMEL_BOUNDARY: Lazy<Regex> = Lazy::new(|| Regex::new(r"([a-z])([A-Z])").unwrap());

/// Turn an uploaded file name into a human-readable record title.
///
/// Drops the extension, converts dash/underscore runs and camelCase
/// boundaries into spaces, then title-cases each word:
/// `"annual-report_2024.pdf"` → `"Annual Report 2024"`.
pub fn format_file_name_as_title(file_name: &str) -> String {
    let stem = RE_EXTENSION.replace(file_name, "");
    let spaced = RE_SEPARATORS.replace_all(&stem, " ");
    let spaced = RE_CAMEL_BOUNDARY.replace_all(&spaced, "${1} ${2}");

    spaced
        .split_whitespace()
        .map(title_case_word)
        .collect::<Vec<_>>()
        .join(" ")
}

fn title_case_word(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
