use serde::{Deserialize, Serialize};

use super::indicators::IndicatorValues;

/// Tier-1 weights: how the four indicators of one snapshot combine.
///
/// Fractions in `[0, 1]`; a valid set sums to 100% at whole-percent precision.
///
/// Example YAML:
/// ```yaml
/// indicators:
///   contribution: 0.4
///   merit: 0.3
///   assist: 0.2
///   donation: 0.1
/// ```
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct IndicatorWeight {
    pub contribution: f64,
    pub merit: f64,
    pub assist: f64,
    pub donation: f64,
}

impl Default for IndicatorWeight {
    fn default() -> Self {
        Self {
            contribution: 0.25,
            merit: 0.25,
            assist: 0.25,
            donation: 0.25,
        }
    }
}

impl IndicatorWeight {
    /// Weighted combination of one member's indicator values.
    ///
    /// Values are used as supplied; no per-indicator rescaling happens here.
    pub fn apply(&self, values: &IndicatorValues) -> f64 {
        self.contribution * values.contribution
            + self.merit * values.merit
            + self.assist * values.assist
            + self.donation * values.donation
    }

    /// Sum of the four weights in whole percentage points.
    pub fn percent_total(&self) -> i64 {
        (self.contribution * 100.0 + self.merit * 100.0 + self.assist * 100.0 + self.donation * 100.0)
            .round() as i64
    }
}

/// Tier-2 weight: one snapshot's share of the season-wide score.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct SnapshotWeight {
    pub snapshot_id: String,
    pub weight: f64,
}

/// Both weight tiers for a single snapshot.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SnapshotWeightConfig {
    pub snapshot_id: String,

    #[serde(default)]
    pub indicators: IndicatorWeight,

    /// Share of the season total contributed by this snapshot
    pub weight: f64,
}

/// Draft weight configuration for one season.
///
/// This is the value handed to the validator and the aggregator on every
/// edit. It owns no state beyond what is serialized.
///
/// Example YAML:
/// ```yaml
/// scoring:
///   season: "s3"
///   snapshots:
///     - snapshot_id: "2024-05-01"
///       weight: 0.6
///       indicators: { contribution: 0.25, merit: 0.25, assist: 0.25, donation: 0.25 }
///     - snapshot_id: "2024-05-08"
///       weight: 0.4
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct WeightConfig {
    /// Season the weights were written for
    #[serde(default)]
    pub season: Option<String>,

    #[serde(default)]
    pub snapshots: Vec<SnapshotWeightConfig>,
}

impl WeightConfig {
    /// Build a draft covering `snapshot_ids` with default indicator weights
    /// and an even tier-2 split.
    pub fn evenly_distributed(season: Option<String>, snapshot_ids: &[String]) -> Self {
        let snapshots = super::validation::distribute_evenly(snapshot_ids)
            .into_iter()
            .map(|sw| SnapshotWeightConfig {
                snapshot_id: sw.snapshot_id,
                indicators: IndicatorWeight::default(),
                weight: sw.weight,
            })
            .collect();
        Self { season, snapshots }
    }

    /// Tier-2 weights in configuration order.
    pub fn snapshot_weights(&self) -> Vec<SnapshotWeight> {
        self.snapshots
            .iter()
            .map(|s| SnapshotWeight {
                snapshot_id: s.snapshot_id.clone(),
                weight: s.weight,
            })
            .collect()
    }

    pub fn snapshot_ids(&self) -> Vec<String> {
        self.snapshots.iter().map(|s| s.snapshot_id.clone()).collect()
    }

    pub fn get(&self, snapshot_id: &str) -> Option<&SnapshotWeightConfig> {
        self.snapshots.iter().find(|s| s.snapshot_id == snapshot_id)
    }

    /// Replace every tier-2 weight with an even split. Tier-1 weights are kept.
    pub fn rebalance(&mut self) {
        let ids = self.snapshot_ids();
        for (entry, even) in self
            .snapshots
            .iter_mut()
            .zip(super::validation::distribute_evenly(&ids))
        {
            entry.weight = even.weight;
        }
    }
}
