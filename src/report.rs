//! Per-message report formatting.
//!
//! This is program output, not logging — the rendered block goes to
//! stdout as-is.

use std::fmt::Write as _;

use crate::analysis::AnalysisResult;

const SEPARATOR_WIDTH: usize = 40;

/// Render one message's analysis as a labeled block.
///
/// List fields render as comma-joined values, or the literal `None`
/// when empty.
pub fn render_report(sender: &str, analysis: &AnalysisResult) -> String {
    let separator = "-".repeat(SEPARATOR_WIDTH);
    let mut out = String::new();

    // Infallible on String; ignore the fmt plumbing.
    let _ = writeln!(out, "{separator}");
    let _ = writeln!(out, "From: {sender}");
    let _ = writeln!(out, "Summary: {}", analysis.summary);
    let _ = writeln!(out, "Sentiment: {}", analysis.sentiment);
    let _ = writeln!(out, "Action Items: {}", render_list(&analysis.action_items));
    let _ = writeln!(out, "Key Dates: {}", render_list(&analysis.key_dates));
    let _ = writeln!(out, "{separator}");
    out.push('\n');

    out
}

fn render_list(items: &[String]) -> String {
    if items.is_empty() {
        "None".to_string()
    } else {
        items.join(", ")
    }
}
