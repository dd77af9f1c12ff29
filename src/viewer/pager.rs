//! Section pagination: a cursor over an immutable section list.
//!
//! One pager instance lives for the lifetime of one displayed summary. The
//! section list never mutates in place — loading a new summary swaps the
//! whole list and resets the cursor. Every transition clamps, so the
//! invariant `0 <= current < len` holds whenever the list is non-empty and
//! the cursor stays parked at 0 for an empty list. No operation fails, no
//! operation wraps around.

use crate::viewer::section::{parse_sections, Section};
use once_cell::sync::Lazy;
use serde::Serialize;

static EMPTY_SECTION: Lazy<Section> = Lazy::new(Section::default);

/// Cursor over the sections of one summary.
#[derive(Debug, Clone)]
pub struct SectionPager {
    sections: Vec<Section>,
    current: usize,
}

impl SectionPager {
    /// Create a pager positioned on the first section.
    pub fn new(sections: Vec<Section>) -> Self {
        Self {
            sections,
            current: 0,
        }
    }

    /// Parse a raw Markdown summary and page over the result.
    pub fn from_markdown(raw: &str) -> Self {
        Self::new(parse_sections(raw))
    }

    /// Replace the section list with a freshly loaded summary.
    ///
    /// The cursor always resets to 0, even if the new list is shorter or
    /// empty.
    pub fn load(&mut self, sections: Vec<Section>) {
        self.sections = sections;
        self.current = 0;
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    /// The sections in source order.
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// The section under the cursor, or an empty placeholder section when
    /// the list is empty.
    pub fn current(&self) -> &Section {
        self.sections.get(self.current).unwrap_or(&EMPTY_SECTION)
    }

    /// Advance one section. No-op on the last section and on an empty list.
    pub fn next(&mut self) {
        if !self.sections.is_empty() {
            self.current = (self.current + 1).min(self.sections.len() - 1);
        }
    }

    /// Step back one section. No-op on the first section.
    pub fn previous(&mut self) {
        self.current = self.current.saturating_sub(1);
    }

    /// Jump to a section by index. Any integer is accepted — negative and
    /// out-of-range values clamp to the valid range instead of failing.
    pub fn select(&mut self, index: i64) {
        if self.sections.is_empty() {
            self.current = 0;
            return;
        }
        let last = (self.sections.len() - 1) as i64;
        self.current = index.clamp(0, last) as usize;
    }

    /// Derived read-only snapshot for the rendering layer.
    ///
    /// Recomputed on every call; mutating the pager never updates a view
    /// handed out earlier.
    pub fn view(&self) -> PagerView {
        let count = self.sections.len();
        PagerView {
            current_index: self.current,
            section_count: count,
            progress_ratio: if count == 0 {
                0.0
            } else {
                (self.current + 1) as f64 / count as f64
            },
            is_first: self.current == 0,
            is_last: count > 0 && self.current == count - 1,
            section_titles: self.sections.iter().map(|s| s.title.clone()).collect(),
        }
    }
}

/// What a renderer needs to draw progress and navigation controls.
///
/// Pure data, no back-reference to the pager; safe to serialise or send to
/// another layer wholesale.
#[derive(Debug, Clone, Serialize)]
pub struct PagerView {
    pub current_index: usize,
    pub section_count: usize,
    /// `(current_index + 1) / section_count`, or `0.0` for an empty list.
    pub progress_ratio: f64,
    pub is_first: bool,
    pub is_last: bool,
    /// Titles in source order, for a jump-to-section control.
    pub section_titles: Vec<String>,
}
