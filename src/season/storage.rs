use super::types::{SeasonData, SnapshotData};
use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use log::{info, warn};
use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::path::Path;

/// Load snapshot data for scoring.
///
/// `path` is either a JSON file holding a whole season, or a directory whose
/// `*.json` files each hold one snapshot. Same-date re-uploads are collapsed
/// and the result is ordered by capture time.
pub fn load_season_data(path: &Path) -> Result<SeasonData> {
    if !path.exists() {
        bail!("Snapshot data not found at {}", path.display());
    }

    let mut data = if path.is_dir() {
        load_snapshot_dir(path)?
    } else {
        let file = File::open(path)
            .with_context(|| format!("Failed to open snapshot data at {}", path.display()))?;
        serde_json::from_reader(file)
            .with_context(|| format!("Failed to parse snapshot data in {}", path.display()))?
    };

    for snapshot in &data.snapshots {
        check_records(snapshot)?;
    }

    data.snapshots = supersede_reuploads(data.snapshots);
    data.sort_by_capture();
    Ok(data)
}

fn load_snapshot_dir(dir: &Path) -> Result<SeasonData> {
    let pattern = dir.join("*.json");
    let pattern = pattern
        .to_str()
        .with_context(|| format!("Non UTF-8 data directory: {}", dir.display()))?;

    let mut snapshots = Vec::new();
    for entry in glob::glob(pattern).context("Invalid snapshot file pattern")? {
        let path = entry.context("Failed to read snapshot directory entry")?;
        let file = File::open(&path)
            .with_context(|| format!("Failed to open snapshot file {}", path.display()))?;
        let snapshot: SnapshotData = serde_json::from_reader(file)
            .with_context(|| format!("Failed to parse snapshot file {}", path.display()))?;
        snapshots.push(snapshot);
    }

    if snapshots.is_empty() {
        warn!("No *.json snapshot files in {}", dir.display());
    }

    Ok(SeasonData {
        season: None,
        snapshots,
    })
}

fn check_records(snapshot: &SnapshotData) -> Result<()> {
    let mut seen = HashSet::new();
    for record in &snapshot.records {
        if !seen.insert(record.member_id.as_str()) {
            bail!(
                "Snapshot {} lists member {} more than once",
                snapshot.id(),
                record.member_id
            );
        }
    }

    let declared = snapshot.snapshot.member_count;
    if declared != 0 && declared != snapshot.records.len() {
        warn!(
            "Snapshot {} declares {} members but has {} records",
            snapshot.id(),
            declared,
            snapshot.records.len()
        );
    }
    Ok(())
}

/// Collapse re-uploads: for each season and capture date (UTC), only the
/// snapshot with the latest `captured_at` survives. Exact timestamp ties go to
/// the one loaded last. Survivors keep the position of the first upload.
pub fn supersede_reuploads(snapshots: Vec<SnapshotData>) -> Vec<SnapshotData> {
    let mut slots: HashMap<(String, NaiveDate), usize> = HashMap::new();
    let mut kept: Vec<SnapshotData> = Vec::with_capacity(snapshots.len());

    for snapshot in snapshots {
        let key = (
            snapshot.snapshot.season_id.clone(),
            snapshot.snapshot.captured_at.date_naive(),
        );
        match slots.entry(key) {
            Entry::Vacant(slot) => {
                slot.insert(kept.len());
                kept.push(snapshot);
            }
            Entry::Occupied(slot) => {
                let current = &mut kept[*slot.get()];
                if snapshot.snapshot.captured_at >= current.snapshot.captured_at {
                    info!("Snapshot {} superseded by re-upload {}", current.id(), snapshot.id());
                    *current = snapshot;
                } else {
                    info!("Snapshot {} superseded by re-upload {}", snapshot.id(), current.id());
                }
            }
        }
    }

    kept
}
