//! Section parsing: split one Markdown summary into titled sections.
//!
//! The summary prompt asks the model for a document where every section
//! opens with a `# ` heading and every body line is one self-contained
//! point (usually led by an emoji). The parser leans on exactly that shape
//! and nothing more: it splits on the literal `"\n# "` delimiter, takes the
//! first line of each block as the title, and keeps every remaining
//! non-empty line verbatim as one point. Emoji, bold markers, and interior
//! spacing pass through untouched — the renderer decides what to do with
//! them.
//!
//! Model output is not contractually well-formed, so nothing here rejects
//! input. Text before the first heading (or input with no headings at all)
//! becomes a single untitled section, and empty or whitespace-only input
//! yields an empty list, which callers render as "nothing to display"
//! rather than an error.

use serde::{Deserialize, Serialize};

/// One navigable section of a summary: a heading plus its bullet points.
///
/// `points` preserves source order. A section with an empty `points` list
/// is legal and renders as a bare heading.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Heading text, without the `# ` marker. Empty for preamble text that
    /// appeared before the first heading.
    pub title: String,
    /// Body lines, one point per line, trimmed at the line boundaries only.
    pub points: Vec<String>,
}

impl Section {
    /// True when this section came from text with no heading of its own.
    pub fn is_untitled(&self) -> bool {
        self.title.is_empty()
    }

    /// Render the section back to its Markdown form (`# title` + points).
    pub fn to_markdown(&self) -> String {
        if self.points.is_empty() {
            format!("# {}", self.title)
        } else {
            format!("# {}\n{}", self.title, self.points.join("\n"))
        }
    }
}

/// Parse a raw Markdown summary into its ordered sections.
///
/// Splits on the literal delimiter `"\n# "`. The first block keeps its
/// leading `# ` only when the input itself starts with one; if it does not,
/// that block becomes an untitled preamble section. Blocks that are empty
/// after trimming are dropped, so the returned length equals the number of
/// non-empty heading blocks (plus one for non-empty leading content).
///
/// Never fails: empty or whitespace-only input returns an empty `Vec`.
pub fn parse_sections(raw: &str) -> Vec<Section> {
    let mut sections = Vec::new();

    for (i, block) in raw.split("\n# ").enumerate() {
        let block = block.trim();
        if block.is_empty() {
            continue;
        }

        let section = if i == 0 {
            match block.strip_prefix("# ") {
                Some(rest) => split_titled_block(rest),
                // Preamble with no heading marker: whole block is body.
                None => Section {
                    title: String::new(),
                    points: body_points(block),
                },
            }
        } else {
            split_titled_block(block)
        };

        sections.push(section);
    }

    sections
}

/// Render a section list back to one Markdown string.
///
/// Re-parsing the result yields an equivalent list (same titles, same
/// point sequences).
pub fn render_sections(sections: &[Section]) -> String {
    sections
        .iter()
        .map(Section::to_markdown)
        .collect::<Vec<_>>()
        .join("\n")
}

/// First line (trimmed) is the title; every remaining non-empty line is a point.
fn split_titled_block(block: &str) -> Section {
    let (title, body) = match block.split_once('\n') {
        Some((title, body)) => (title, body),
        None => (block, ""),
    };
    Section {
        title: title.trim().to_string(),
        points: body_points(body),
    }
}

fn body_points(body: &str) -> Vec<String> {
    body.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_yields_no_sections() {
        assert!(parse_sections("").is_empty());
        assert!(parse_sections("   \n\t  ").is_empty());
    }

    #[test]
    fn two_headed_sections() {
        let sections = parse_sections("# Title A\nPoint1\nPoint2\n# Title B\nPoint3");
        assert_eq!(
            sections,
            vec![
                Section {
                    title: "Title A".into(),
                    points: vec!["Point1".into(), "Point2".into()],
                },
                Section {
                    title: "Title B".into(),
                    points: vec!["Point3".into()],
                },
            ]
        );
    }

    #[test]
    fn input_without_any_heading_is_one_untitled_section() {
        let sections = parse_sections("just some plain text");
        assert_eq!(sections.len(), 1);
        assert!(sections[0].is_untitled());
        assert_eq!(sections[0].points, vec!["just some plain text"]);
    }

    #[test]
    fn preamble_before_first_heading_is_kept() {
        let sections = parse_sections("intro line\n# Real Section\nPoint");
        assert_eq!(sections.len(), 2);
        assert!(sections[0].is_untitled());
        assert_eq!(sections[0].points, vec!["intro line"]);
        assert_eq!(sections[1].title, "Real Section");
    }

    #[test]
    fn blank_blocks_are_dropped() {
        let sections = parse_sections("# A\nP1\n# \n   \n# B\nP2");
        // The middle block is whitespace-only after the delimiter is
        // consumed, so it trims to empty and is dropped.
        let titles: Vec<&str> = sections.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["A", "B"]);
    }

    #[test]
    fn section_with_no_body_has_zero_points() {
        let sections = parse_sections("# Lonely Heading");
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].title, "Lonely Heading");
        assert!(sections[0].points.is_empty());
    }

    #[test]
    fn emoji_and_markup_pass_through_verbatim() {
        let sections = parse_sections("# 📃 Main Points\n🖌️ **Bold** start\n⚙️ `code` stays");
        assert_eq!(sections[0].title, "📃 Main Points");
        assert_eq!(
            sections[0].points,
            vec!["🖌️ **Bold** start", "⚙️ `code` stays"]
        );
    }

    #[test]
    fn interior_spacing_preserved_line_edges_trimmed() {
        let sections = parse_sections("# T\n   spaced   out   point   ");
        assert_eq!(sections[0].points, vec!["spaced   out   point"]);
    }

    #[test]
    fn blank_lines_in_body_are_skipped() {
        let sections = parse_sections("# T\nP1\n\n\nP2\n");
        assert_eq!(sections[0].points, vec!["P1", "P2"]);
    }

    #[test]
    fn delimiter_count_matches_section_count() {
        let raw = "# One\na\n# Two\nb\n# Three\nc\n# Four\nd";
        assert_eq!(parse_sections(raw).len(), 4);
    }

    #[test]
    fn round_trip_reproduces_equivalent_sections() {
        let raw = "# Quick Overview\n💡 First point\n💻 Second point\n# Pro Tips\n🌟 Tip one\n# Bottom Line\n💫 Wrap-up";
        let sections = parse_sections(raw);
        let rendered = render_sections(&sections);
        assert_eq!(parse_sections(&rendered), sections);
    }

    #[test]
    fn round_trip_with_untitled_preamble() {
        let sections = parse_sections("loose intro\n# Body\npoint");
        let rendered = render_sections(&sections);
        assert_eq!(parse_sections(&rendered), sections);
    }

    #[test]
    fn render_empty_list_is_empty_string() {
        assert_eq!(render_sections(&[]), "");
    }
}
