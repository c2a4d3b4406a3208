// End-to-end runs through the config and snapshot files.

use std::fs;
use std::path::Path;

use crate::config::{load_config, run_init, save_config};
use crate::output::{format_leaderboard, format_tsv};
use crate::scoring::{compute_scores, limit_top_n, validate_all, ScoringError};
use crate::season::load_season_data;
use tempfile::TempDir;

const SEASON_JSON: &str = r#"{
  "season": { "id": "s3", "name": "Season 3" },
  "snapshots": [
    {
      "id": "S2",
      "season_id": "s3",
      "captured_at": "2024-05-08T12:00:00Z",
      "member_count": 2,
      "records": [
        { "member_id": "A", "member_name": "Alpha", "contribution": 0, "merit": 0, "assist": 40, "donation": 0 },
        { "member_id": "B", "member_name": "Bravo", "contribution": 100, "merit": 0, "assist": 0, "donation": 0 }
      ]
    },
    {
      "id": "S1",
      "season_id": "s3",
      "captured_at": "2024-05-01T12:00:00Z",
      "member_count": 2,
      "records": [
        { "member_id": "A", "member_name": "Alpha", "contribution": 10, "merit": 20, "assist": 0, "donation": 0 },
        { "member_id": "B", "member_name": "Bravo", "contribution": 0, "merit": 0, "assist": 0, "donation": 0 }
      ]
    }
  ]
}"#;

const CONFIG_YAML: &str = r#"
data: "season.json"
season: "s3"
scoring:
  season: "s3"
  snapshots:
    - snapshot_id: "S1"
      weight: 0.6
      indicators: { contribution: 0.25, merit: 0.25, assist: 0.25, donation: 0.25 }
    - snapshot_id: "S2"
      weight: 0.4
      indicators: { contribution: 0.25, merit: 0.25, assist: 0.25, donation: 0.25 }
"#;

fn write_fixture() -> TempDir {
    let dir = tempfile::tempdir().expect("create temp dir");
    fs::write(dir.path().join("season.json"), SEASON_JSON).expect("write season");
    fs::write(dir.path().join("config.yaml"), CONFIG_YAML).expect("write config");
    dir
}

fn load(dir: &Path) -> (crate::config::Config, crate::season::SeasonData) {
    let config = load_config(Some(dir.join("config.yaml"))).expect("load config");
    let data = load_season_data(&dir.join("season.json"))
        .expect("load data")
        .for_season("s3");
    (config, data)
}

#[test]
fn two_snapshot_season_ranks_bravo_first() {
    let dir = write_fixture();
    let (config, data) = load(dir.path());
    let weights = config.scoring.expect("scoring section");

    assert!(validate_all(&weights).is_valid());
    assert_eq!(data.snapshot_ids(), vec!["S1".to_string(), "S2".to_string()]);

    let results = compute_scores(&weights, &data.snapshots).expect("scores");
    assert_eq!(results.len(), 2);

    assert_eq!(results[0].member_id, "B");
    assert_eq!(results[0].rank, 1);
    assert!((results[0].final_score - 10.0).abs() < 1e-9);
    assert!((results[0].breakdown["S2"] - 10.0).abs() < 1e-9);

    assert_eq!(results[1].member_id, "A");
    assert_eq!(results[1].rank, 2);
    assert!((results[1].final_score - 8.5).abs() < 1e-9);
    assert!((results[1].breakdown["S1"] - 4.5).abs() < 1e-9);
    assert!((results[1].breakdown["S2"] - 4.0).abs() < 1e-9);

    let tsv = format_tsv(&limit_top_n(results, 1));
    assert_eq!(tsv, "1\t10.00\tB\tBravo");
}

#[test]
fn edited_draft_blocks_scoring_until_fixed() {
    let dir = write_fixture();
    let (mut config, data) = load(dir.path());
    let mut weights = config.scoring.clone().expect("scoring section");

    weights.snapshots[1].indicators.donation = 0.35;
    match compute_scores(&weights, &data.snapshots) {
        Err(ScoringError::InvalidWeights(report)) => {
            assert_eq!(report.indicator_failures.len(), 1);
            assert_eq!(report.indicator_failures[0].snapshot_id, "S2");
            assert_eq!(report.indicator_failures[0].percent, 110);
        }
        other => panic!("expected InvalidWeights, got {:?}", other),
    }

    weights.snapshots[1].indicators.donation = 0.25;
    weights.snapshots[0].weight = 0.9;
    weights.rebalance();
    assert!(compute_scores(&weights, &data.snapshots).is_ok());

    config.scoring = Some(weights);
    let path = dir.path().join("config.yaml");
    save_config(&path, &config).expect("save");
    let reloaded = load_config(Some(path)).expect("reload");
    assert_eq!(reloaded.scoring.expect("scoring").snapshots[0].weight, 0.5);
}

#[test]
fn init_then_rank_from_snapshot_directory() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let snapshots = dir.path().join("snapshots");
    fs::create_dir_all(&snapshots).expect("create snapshot dir");

    let days = [("d1", "2024-05-01T08:00:00Z", 30.0), ("d2", "2024-05-02T08:00:00Z", 50.0)];
    for (id, at, merit) in days {
        let body = serde_json::json!({
            "id": id,
            "season_id": "s4",
            "captured_at": at,
            "records": [
                { "member_id": "x", "member_name": "Xin", "merit": merit },
                { "member_id": "y", "member_name": "Yue", "merit": 40.0 }
            ]
        });
        fs::write(snapshots.join(format!("{}.json", id)), body.to_string()).expect("write snapshot");
    }

    let config_path = dir.path().join("config.yaml");
    run_init(&config_path, &snapshots, None, false).expect("init");

    let config = load_config(Some(config_path)).expect("load config");
    let weights = config.scoring.expect("scoring");
    assert_eq!(weights.season.as_deref(), Some("s4"));

    let data = load_season_data(&snapshots).expect("load snapshots");
    let results = compute_scores(&weights, &data.snapshots).expect("scores");

    // x: 0.5 * 7.5 + 0.5 * 12.5 = 10; y: 0.5 * 10 + 0.5 * 10 = 10
    assert_eq!(results[0].rank, 1);
    assert_eq!(results[1].rank, 1);
    assert_eq!(results[0].member_id, "x");
    assert_eq!(results[1].member_id, "y");

    let table = format_leaderboard(&results, false);
    assert_eq!(table.lines().count(), 2);
}
