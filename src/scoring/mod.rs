pub mod config;
pub mod indicators;
pub mod engine;
pub mod validation;

pub use config::*;
pub use indicators::{Indicator, IndicatorValues};
pub use engine::{compute_scores, limit_top_n, rank_results, ScoreResult, ScoringError};
pub use validation::{
    distribute_evenly, lint_weights, validate_all, validate_indicator_weights,
    validate_snapshot_weights, ValidationReport,
};
