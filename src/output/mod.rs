pub mod formatter;

pub use formatter::{
    format_breakdown, format_json, format_leaderboard, format_percent, format_score, format_tsv,
    should_use_colors,
};
