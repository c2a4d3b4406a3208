use std::collections::HashSet;

use super::config::{IndicatorWeight, SnapshotWeight, WeightConfig};
use super::indicators::Indicator;

/// Required total for either weight tier, in whole percentage points.
pub const REQUIRED_PERCENT: i64 = 100;

/// Tier-1 check: the four indicator weights must round to exactly 100%.
///
/// Rounding to whole points absorbs float drift from stepper input. A rounded
/// total of 99 or 101 is still rejected.
pub fn validate_indicator_weights(weight: &IndicatorWeight) -> bool {
    weight.percent_total() == REQUIRED_PERCENT
}

/// Rounded tier-2 total, or `None` when there are no snapshots.
pub fn snapshot_percent_total(weights: &[SnapshotWeight]) -> Option<i64> {
    if weights.is_empty() {
        return None;
    }
    let total: f64 = weights.iter().map(|w| w.weight * 100.0).sum();
    Some(total.round() as i64)
}

/// Tier-2 check: snapshot weights must round to exactly 100%.
/// An empty list has nothing to score against and fails.
pub fn validate_snapshot_weights(weights: &[SnapshotWeight]) -> bool {
    snapshot_percent_total(weights) == Some(REQUIRED_PERCENT)
}

/// Even tier-2 split. Callers must not pass an empty id list; doing so
/// yields an empty (and therefore invalid) weight set.
pub fn distribute_evenly(snapshot_ids: &[String]) -> Vec<SnapshotWeight> {
    let count = snapshot_ids.len();
    snapshot_ids
        .iter()
        .map(|id| SnapshotWeight {
            snapshot_id: id.clone(),
            weight: 1.0 / count as f64,
        })
        .collect()
}

/// A snapshot whose indicator weights do not total 100%.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorFailure {
    pub index: usize,
    pub snapshot_id: String,
    pub percent: i64,
}

/// Full result of checking both weight tiers.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationReport {
    pub indicator_failures: Vec<IndicatorFailure>,
    /// Rounded tier-2 total; `None` for an empty snapshot list
    pub snapshot_percent: Option<i64>,
}

impl ValidationReport {
    pub fn snapshot_weights_valid(&self) -> bool {
        self.snapshot_percent == Some(REQUIRED_PERCENT)
    }

    pub fn is_valid(&self) -> bool {
        self.indicator_failures.is_empty() && self.snapshot_weights_valid()
    }

    /// One message per problem, suitable for showing to whoever edits weights.
    pub fn errors(&self) -> Vec<String> {
        let mut errors: Vec<String> = self
            .indicator_failures
            .iter()
            .map(|f| {
                format!(
                    "scoring.snapshots[{}] ({}): indicator weights total {}%, expected {}%",
                    f.index, f.snapshot_id, f.percent, REQUIRED_PERCENT
                )
            })
            .collect();

        match self.snapshot_percent {
            None => errors.push("scoring.snapshots: no snapshots configured".to_string()),
            Some(p) if p != REQUIRED_PERCENT => errors.push(format!(
                "scoring.snapshots: snapshot weights total {}%, expected {}%",
                p, REQUIRED_PERCENT
            )),
            Some(_) => {}
        }

        errors
    }

    pub fn into_result(self) -> Result<(), Vec<String>> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(self.errors())
        }
    }
}

/// Evaluate both tiers without short-circuiting so every bad snapshot is reported.
pub fn validate_all(config: &WeightConfig) -> ValidationReport {
    let indicator_failures = config
        .snapshots
        .iter()
        .enumerate()
        .filter(|(_, s)| !validate_indicator_weights(&s.indicators))
        .map(|(index, s)| IndicatorFailure {
            index,
            snapshot_id: s.snapshot_id.clone(),
            percent: s.indicators.percent_total(),
        })
        .collect();

    ValidationReport {
        indicator_failures,
        snapshot_percent: snapshot_percent_total(&config.snapshot_weights()),
    }
}

/// Warnings about values outside the documented domain.
///
/// These never change the verdict of `validate_all`; out-of-range
/// weights flow through scoring arithmetically.
pub fn lint_weights(config: &WeightConfig) -> Vec<String> {
    let mut warnings = Vec::new();
    let mut seen = HashSet::new();

    for (i, snapshot) in config.snapshots.iter().enumerate() {
        if !seen.insert(snapshot.snapshot_id.as_str()) {
            warnings.push(format!(
                "scoring.snapshots[{}]: snapshot '{}' is listed more than once",
                i, snapshot.snapshot_id
            ));
        }
        if !(0.0..=1.0).contains(&snapshot.weight) {
            warnings.push(format!(
                "scoring.snapshots[{}].weight: {} is outside [0, 1]",
                i, snapshot.weight
            ));
        }
        for indicator in Indicator::ALL {
            let w = indicator.weight_in(&snapshot.indicators);
            if !(0.0..=1.0).contains(&w) {
                warnings.push(format!(
                    "scoring.snapshots[{}].indicators.{}: {} is outside [0, 1]",
                    i,
                    indicator.name(),
                    w
                ));
            }
        }
    }

    warnings
}
