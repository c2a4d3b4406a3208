use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::scoring::IndicatorValues;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Season {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// One point-in-time capture of member statistics.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Snapshot {
    pub id: String,
    pub season_id: String,
    pub captured_at: DateTime<Utc>,
    /// Member count as reported by the ingestion side
    #[serde(default)]
    pub member_count: usize,
}

/// One member's raw indicator values at one snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MemberIndicatorRecord {
    pub member_id: String,
    pub member_name: String,
    #[serde(flatten)]
    pub values: IndicatorValues,
}

/// A snapshot together with its member records.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SnapshotData {
    #[serde(flatten)]
    pub snapshot: Snapshot,
    #[serde(default)]
    pub records: Vec<MemberIndicatorRecord>,
}

impl SnapshotData {
    pub fn id(&self) -> &str {
        &self.snapshot.id
    }
}

/// Every snapshot known for one or more seasons.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SeasonData {
    #[serde(default)]
    pub season: Option<Season>,
    #[serde(default)]
    pub snapshots: Vec<SnapshotData>,
}

impl SeasonData {
    /// Keep only snapshots belonging to `season_id`.
    pub fn for_season(self, season_id: &str) -> Self {
        let season = self.season.filter(|s| s.id == season_id);
        let snapshots = self
            .snapshots
            .into_iter()
            .filter(|s| s.snapshot.season_id == season_id)
            .collect();
        Self { season, snapshots }
    }

    /// Sort snapshots by capture time. Stable, so equal timestamps keep load order.
    pub fn sort_by_capture(&mut self) {
        self.snapshots.sort_by_key(|s| s.snapshot.captured_at);
    }

    /// Snapshot ids in their current order.
    pub fn snapshot_ids(&self) -> Vec<String> {
        self.snapshots.iter().map(|s| s.snapshot.id.clone()).collect()
    }

    /// Season id from the header, falling back to the first snapshot.
    pub fn season_id(&self) -> Option<String> {
        self.season
            .as_ref()
            .map(|s| s.id.clone())
            .or_else(|| self.snapshots.first().map(|s| s.snapshot.season_id.clone()))
    }
}
