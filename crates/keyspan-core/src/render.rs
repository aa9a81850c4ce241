//! Console rendering of reports and projections.

use std::fmt::Write;

use crate::models::SummaryReport;
use crate::projection::{KeyProjection, KeyVerification};

/// Insert `,` between groups of three digits, keeping any leading sign.
pub fn group_thousands(digits: &str) -> String {
    let (sign, body) = match digits.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", digits),
    };
    let mut grouped = String::with_capacity(body.len() + body.len() / 3 + 1);
    for (i, ch) in body.chars().enumerate() {
        if i > 0 && (body.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{sign}{grouped}")
}

fn grouped(value: &impl ToString) -> String {
    group_thousands(&value.to_string())
}

pub fn render_summary(summary: &SummaryReport, preview_count: usize) -> String {
    let mut out = String::new();
    let stats = &summary.position_stats;
    let date = |d: Option<chrono::NaiveDate>| d.map_or("none".to_string(), |d| d.to_string());

    let _ = writeln!(out, "Puzzle Analysis Summary:");
    let _ = writeln!(out, "Total Solved Puzzles: {}", summary.total_puzzles);
    let _ = writeln!(out, "Unique Solvers: {}", summary.unique_solvers);

    let _ = writeln!(out, "\nTop {} Solvers:", summary.top_solvers.len());
    for solver in &summary.top_solvers {
        let _ = writeln!(out, "  {}: {} puzzles", solver.actor, solver.count);
    }

    let _ = writeln!(out, "\nPosition Statistics:");
    let _ = writeln!(out, "  Minimum: {:.2}%", stats.min);
    let _ = writeln!(out, "  Maximum: {:.2}%", stats.max);
    let _ = writeln!(out, "  Average: {:.2}%", stats.average);

    let _ = writeln!(out, "\nFirst Solve: {}", date(summary.first_solve));
    let _ = writeln!(out, "Last Solve: {}", date(summary.last_solve));

    let shown = summary.range_patterns.len().min(preview_count);
    if shown > 0 {
        let _ = writeln!(out, "\nRange Pattern Examples (first {shown} puzzles):");
    }
    for pattern in summary.range_patterns.iter().take(shown) {
        let _ = writeln!(out, "\nPuzzle {}:", pattern.index);
        let _ = writeln!(
            out,
            "  Range: {}:{}",
            pattern.range_start_hex, pattern.range_end_hex
        );
        let _ = writeln!(out, "  Position in range: {:.2}%", pattern.position_in_range);
        let _ = writeln!(
            out,
            "  Distance from start: {}",
            grouped(&pattern.distance_from_start)
        );
        let _ = writeln!(
            out,
            "  Distance from end: {}",
            grouped(&pattern.distance_from_end)
        );
    }
    out
}

pub fn render_projection(projection: &KeyProjection, window_percent: f64) -> String {
    let mut out = String::new();
    let range = &projection.range_info;
    let key = &projection.theoretical_key;
    let window = &projection.search_range;

    let _ = writeln!(out, "Range Information:");
    let _ = writeln!(out, "Start (dec): {}", grouped(&range.start_dec));
    let _ = writeln!(out, "End (dec): {}", grouped(&range.end_dec));
    let _ = writeln!(out, "Range size: {}", grouped(&range.size));

    let _ = writeln!(out, "\nTheoretical Key:");
    let _ = writeln!(out, "Decimal: {}", grouped(&key.decimal));
    let _ = writeln!(out, "Hex: 0x{}", key.hex);
    let _ = writeln!(out, "Padded: {}", key.hex_padded);

    let _ = writeln!(out, "\nRecommended Search Range (±{window_percent}%):");
    let _ = writeln!(out, "Start: {}", grouped(&window.start_dec));
    let _ = writeln!(out, "End: {}", grouped(&window.end_dec));
    let _ = writeln!(out, "Search space size: {}", grouped(&window.size));
    let _ = writeln!(
        out,
        "Hex range: 0x{} - 0x{}",
        window.start_hex, window.end_hex
    );
    out
}

pub fn render_verification(key_hex: &str, verification: &KeyVerification) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Verification against known key {key_hex}:");
    let _ = writeln!(
        out,
        "Key falls within predicted range: {}",
        verification.in_window
    );
    if let Some(position) = verification.position_in_window {
        let _ = writeln!(out, "Position within search range: {position:.2}%");
    }
    let _ = writeln!(
        out,
        "Accuracy of prediction: {} units",
        grouped(&verification.deviation)
    );
    out
}
