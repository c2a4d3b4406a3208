use std::io::IsTerminal;
use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use terminal_size::{Width, terminal_size};

use crate::scoring::{ScoreResult, WeightConfig};

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Format a score in compact notation (1.5k, 2.3M, 847.5)
pub fn format_score(score: f64) -> String {
    if !score.is_finite() {
        return format!("{}", score);
    }

    let magnitude = score.abs();
    let mut unit = if magnitude >= 1_000_000.0 {
        2
    } else if magnitude >= 1_000.0 {
        1
    } else {
        0
    };
    let mut formatted = scaled(score, unit);

    // 999.96 rounds to "1000.0"; move up a unit instead
    let rolled_over = formatted
        .trim_start_matches('-')
        .trim_end_matches(['k', 'M'])
        .parse::<f64>()
        .is_ok_and(|v| v >= 1000.0);
    if rolled_over && unit < 2 {
        unit += 1;
        formatted = scaled(score, unit);
    }

    // Trim trailing .0 (e.g., "1.0k" -> "1k", "10.0" -> "10")
    if let Some(stripped) = formatted.strip_suffix(".0") {
        stripped.to_string()
    } else {
        formatted.replace(".0M", "M").replace(".0k", "k")
    }
}

fn scaled(score: f64, unit: usize) -> String {
    match unit {
        2 => format!("{:.1}M", score / 1_000_000.0),
        1 => format!("{:.1}k", score / 1_000.0),
        _ => format!("{:.1}", score),
    }
}

/// Format a weight fraction as whole percent ("0.6" -> "60%")
pub fn format_percent(fraction: f64) -> String {
    format!("{:.0}%", fraction * 100.0)
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate a name to fit available width, accounting for Unicode
fn truncate_name(name: &str, max_width: usize) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= max_width {
        name.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

/// Format the leaderboard with columns: Rank, Score, Name, Member id
/// Rank column: 4 chars (fits "999."), right-aligned
/// Score column is right-aligned, 8 chars wide
pub fn format_leaderboard(results: &[ScoreResult], use_colors: bool) -> String {
    if results.is_empty() {
        return "No members found.".to_string();
    }

    let term_width = get_terminal_width();
    let rank_width = 4;
    let score_width = 8;
    let separator = "  ";

    results
        .iter()
        .map(|result| {
            let rank_str = format!("{:>width$}", format!("{}.", result.rank), width = rank_width);
            let score_padded = format!("{:>width$}", format_score(result.final_score), width = score_width);

            let fixed_width = rank_width + 1 + score_width + separator.len() * 2 + result.member_id.len();
            let name = if let Some(width) = term_width {
                if width > fixed_width + 10 {
                    truncate_name(&result.member_name, width - fixed_width)
                } else {
                    truncate_name(&result.member_name, 20)
                }
            } else {
                result.member_name.clone()
            };

            if use_colors {
                format!(
                    "{} {}{}{}{}{}",
                    rank_str.dimmed(),
                    score_padded.bold(),
                    separator,
                    name,
                    separator,
                    result.member_id.cyan()
                )
            } else {
                format!(
                    "{} {}{}{}{}{}",
                    rank_str, score_padded, separator, name, separator, result.member_id
                )
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format results as tab-separated values for scripting
/// Columns: rank, score, member_id, member_name (no headers, no colors)
pub fn format_tsv(results: &[ScoreResult]) -> String {
    results
        .iter()
        .map(|r| {
            format!(
                "{}\t{:.2}\t{}\t{}",
                r.rank, r.final_score, r.member_id, r.member_name
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn format_json(results: &[ScoreResult]) -> Result<String> {
    serde_json::to_string_pretty(results).context("Failed to serialize results")
}

/// Multi-line per-snapshot breakdown for one member
pub fn format_breakdown(result: &ScoreResult, weights: &WeightConfig, use_colors: bool) -> String {
    let header = format!(
        "#{} {} ({})  score {}",
        result.rank,
        result.member_name,
        result.member_id,
        format_score(result.final_score)
    );
    let mut lines = vec![if use_colors {
        header.bold().to_string()
    } else {
        header
    }];

    for entry in &weights.snapshots {
        let contribution = result
            .breakdown
            .get(&entry.snapshot_id)
            .copied()
            .unwrap_or(0.0);
        let share = if result.final_score != 0.0 {
            format_percent(contribution / result.final_score)
        } else {
            "-".to_string()
        };
        let snapshot_label = if use_colors {
            entry.snapshot_id.cyan().to_string()
        } else {
            entry.snapshot_id.clone()
        };
        lines.push(format!(
            "  {}  weight {}  +{}  ({} of total)",
            snapshot_label,
            format_percent(entry.weight),
            format_score(contribution),
            share
        ));
    }

    lines.join("\n")
}
