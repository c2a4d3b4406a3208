use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, Utc};
use log::debug;
use serde::Serialize;
use thiserror::Error;

use super::config::WeightConfig;
use super::validation::{validate_all, ValidationReport};
use crate::season::SnapshotData;

/// Relative tolerance under which two final scores count as tied.
pub const TIE_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("invalid weight configuration: {}", .0.errors().join("; "))]
    InvalidWeights(ValidationReport),

    #[error("snapshot '{0}' has member data but no configured weights")]
    UnweightedSnapshot(String),

    #[error("snapshot '{0}' appears more than once")]
    DuplicateSnapshot(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreResult {
    pub member_id: String,
    pub member_name: String,
    pub final_score: f64,
    /// 1-based dense rank
    pub rank: usize,
    /// Weighted contribution of each configured snapshot; sums to `final_score`
    pub breakdown: BTreeMap<String, f64>,
}

struct MemberTally {
    name: String,
    name_from: (DateTime<Utc>, usize),
    contributions: BTreeMap<String, f64>,
}

/// Compute the ranked leaderboard for one season.
///
/// Refuses to run on weights that fail `validate_all`. Members missing from a
/// snapshot contribute zero for it. A snapshot with data but no weights is an
/// error rather than being silently skipped.
pub fn compute_scores(
    config: &WeightConfig,
    data: &[SnapshotData],
) -> Result<Vec<ScoreResult>, ScoringError> {
    let report = validate_all(config);
    if !report.is_valid() {
        return Err(ScoringError::InvalidWeights(report));
    }

    let mut seen = HashSet::new();
    for id in config.snapshots.iter().map(|s| s.snapshot_id.as_str()) {
        if !seen.insert(id) {
            return Err(ScoringError::DuplicateSnapshot(id.to_string()));
        }
    }
    let mut seen = HashSet::new();
    for snapshot in data {
        if !seen.insert(snapshot.id()) {
            return Err(ScoringError::DuplicateSnapshot(snapshot.id().to_string()));
        }
        if config.get(snapshot.id()).is_none() {
            return Err(ScoringError::UnweightedSnapshot(snapshot.id().to_string()));
        }
    }

    let zeroed: BTreeMap<String, f64> = config
        .snapshots
        .iter()
        .map(|s| (s.snapshot_id.clone(), 0.0))
        .collect();

    let mut members: BTreeMap<&str, MemberTally> = BTreeMap::new();

    for (position, snapshot) in data.iter().enumerate() {
        let Some(weights) = config.get(snapshot.id()) else {
            continue;
        };
        let name_from = (snapshot.snapshot.captured_at, position);

        for record in &snapshot.records {
            let snapshot_score = weights.indicators.apply(&record.values);
            let tally = members
                .entry(record.member_id.as_str())
                .or_insert_with(|| MemberTally {
                    name: record.member_name.clone(),
                    name_from,
                    contributions: zeroed.clone(),
                });

            if name_from >= tally.name_from {
                tally.name = record.member_name.clone();
                tally.name_from = name_from;
            }
            // A repeated record within one snapshot replaces the earlier one.
            tally
                .contributions
                .insert(snapshot.id().to_string(), weights.weight * snapshot_score);
        }
    }

    let results: Vec<ScoreResult> = members
        .into_iter()
        .map(|(member_id, tally)| {
            let final_score: f64 = config
                .snapshots
                .iter()
                .map(|s| tally.contributions.get(&s.snapshot_id).copied().unwrap_or(0.0))
                .sum();
            ScoreResult {
                member_id: member_id.to_string(),
                member_name: tally.name,
                final_score,
                rank: 0,
                breakdown: tally.contributions,
            }
        })
        .collect();

    debug!(
        "Scored {} members across {} snapshots ({} weighted)",
        results.len(),
        data.len(),
        config.snapshots.len()
    );

    Ok(rank_results(results))
}

/// Order by final score descending and assign dense ranks.
///
/// Scores within `TIE_TOLERANCE` of a group's leading score share its rank,
/// and tied members are listed by member id ascending. NaN scores sort last.
pub fn rank_results(mut results: Vec<ScoreResult>) -> Vec<ScoreResult> {
    results.sort_by(|a, b| {
        by_score_desc(a.final_score, b.final_score).then_with(|| a.member_id.cmp(&b.member_id))
    });

    let mut rank = 0;
    let mut start = 0;
    while start < results.len() {
        let leader = results[start].final_score;
        let mut end = start + 1;
        while end < results.len() && scores_tied(leader, results[end].final_score) {
            end += 1;
        }

        rank += 1;
        let group = &mut results[start..end];
        group.sort_by(|a, b| a.member_id.cmp(&b.member_id));
        for result in group.iter_mut() {
            result.rank = rank;
        }
        start = end;
    }

    results
}

/// First `n` entries of an already-ranked list.
pub fn limit_top_n(mut results: Vec<ScoreResult>, n: usize) -> Vec<ScoreResult> {
    results.truncate(n);
    results
}

fn by_score_desc(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
    }
}

fn scores_tied(a: f64, b: f64) -> bool {
    if a.is_nan() || b.is_nan() {
        return a.is_nan() && b.is_nan();
    }
    if !a.is_finite() || !b.is_finite() {
        return a == b;
    }
    (a - b).abs() <= TIE_TOLERANCE * a.abs().max(b.abs()).max(1.0)
}
