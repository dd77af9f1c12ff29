//! Integration tests for the summary viewing model: parse a realistic
//! LLM-shaped summary, page through it, and check the render contract.

use pdfdigest::{parse_sections, render_sections, SectionPager};

/// A summary in the exact shape the system prompt asks for: `# ` headings,
/// one emoji-led point per line.
const DEMO_SUMMARY: &str = "# Quick Overview
💡 Rust pairs zero-cost abstractions with memory safety, making it a strong fit for systems services.
🚀 The document walks through building a production-grade network daemon from scratch.

# 📃 Main Points
🧵 Ownership rules remove whole classes of data races at compile time.
⚙️ Async runtimes schedule thousands of tasks over a handful of threads.
📦 Cargo workspaces keep multi-crate projects coherent.

# Pro Tips
🌟 Reach for channels before shared state.
💎 Let the type system encode protocol states.

# Bottom Line
💫 Invest in Rust for long-lived services where correctness and throughput both matter.";

#[test]
fn demo_summary_parses_into_expected_sections() {
    let sections = parse_sections(DEMO_SUMMARY);
    assert_eq!(sections.len(), 4);

    let titles: Vec<&str> = sections.iter().map(|s| s.title.as_str()).collect();
    assert_eq!(
        titles,
        vec!["Quick Overview", "📃 Main Points", "Pro Tips", "Bottom Line"]
    );

    assert_eq!(sections[0].points.len(), 2);
    assert_eq!(sections[1].points.len(), 3);
    assert_eq!(sections[3].points.len(), 1);

    // Points keep their emoji and markup verbatim.
    assert!(sections[1].points[0].starts_with("🧵"));
}

#[test]
fn paging_through_the_demo_summary() {
    let mut pager = SectionPager::from_markdown(DEMO_SUMMARY);
    assert_eq!(pager.len(), 4);

    // Walk forward to the end; never past it.
    let mut visited = vec![pager.current().title.clone()];
    for _ in 0..10 {
        let before = pager.current_index();
        pager.next();
        if pager.current_index() != before {
            visited.push(pager.current().title.clone());
        }
    }
    assert_eq!(
        visited,
        vec!["Quick Overview", "📃 Main Points", "Pro Tips", "Bottom Line"]
    );
    assert!(pager.view().is_last);

    // Jump controls clamp rather than fail.
    pager.select(-3);
    assert!(pager.view().is_first);
    pager.select(99);
    assert_eq!(pager.current().title, "Bottom Line");
}

#[test]
fn progress_ratio_walks_in_quarter_steps() {
    let mut pager = SectionPager::from_markdown(DEMO_SUMMARY);
    let mut ratios = vec![pager.view().progress_ratio];
    for _ in 0..3 {
        pager.next();
        ratios.push(pager.view().progress_ratio);
    }
    assert_eq!(ratios, vec![0.25, 0.5, 0.75, 1.0]);
}

#[test]
fn round_trip_preserves_the_demo_summary_model() {
    let sections = parse_sections(DEMO_SUMMARY);
    let rendered = render_sections(&sections);
    assert_eq!(parse_sections(&rendered), sections);
}

#[test]
fn loading_a_new_summary_resets_navigation() {
    let mut pager = SectionPager::from_markdown(DEMO_SUMMARY);
    pager.select(3);
    assert!(pager.view().is_last);

    pager.load(parse_sections("# Only Section\n🎯 single point"));
    assert_eq!(pager.len(), 1);
    assert_eq!(pager.current_index(), 0);
    assert_eq!(pager.current().title, "Only Section");
}

#[test]
fn empty_summary_is_nothing_to_display() {
    let pager = SectionPager::from_markdown("   \n  ");
    assert!(pager.is_empty());
    let view = pager.view();
    assert_eq!(view.section_count, 0);
    assert_eq!(view.progress_ratio, 0.0);
    assert!(view.section_titles.is_empty());
    // A placeholder section, not a panic.
    assert!(pager.current().title.is_empty());
}
