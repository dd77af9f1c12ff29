//! The summary viewing model: typed sections parsed out of one Markdown
//! summary, plus the pager that walks them.
//!
//! Everything in this module is pure and synchronous. The surrounding
//! pipeline (extraction, LLM calls, persistence) is async and fallible;
//! this layer only ever receives one finished Markdown string and turns it
//! into data a renderer can page through. No operation here performs I/O,
//! blocks, or fails — malformed input degrades to an untitled section and
//! empty input degrades to an empty section list.
//!
//! ## Data Flow
//!
//! ```text
//! markdown ──▶ parse_sections ──▶ Vec<Section> ──▶ SectionPager ──▶ PagerView
//! (one string)  (split on "\n# ")  (title+points)   (next/prev/select)  (render contract)
//! ```

pub mod pager;
pub mod section;

pub use pager::{PagerView, SectionPager};
pub use section::{parse_sections, render_sections, Section};
