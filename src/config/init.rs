use anyhow::{bail, Context, Result};
use std::io::{BufRead, Write};
use std::path::Path;

use crate::config::{load_config, save_config, Config};
use crate::scoring::WeightConfig;
use crate::season::{load_season_data, SeasonData};

/// Prompt user with a message and return their trimmed input.
fn prompt(message: &str) -> Result<String> {
    print!("{}", message);
    std::io::stdout()
        .flush()
        .context("Failed to flush stdout")?;
    let mut input = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut input)
        .context("Failed to read input")?;
    Ok(input.trim().to_string())
}

/// Prompt user with a yes/no question. Returns bool based on input and default.
fn prompt_yes_no(message: &str, default_yes: bool) -> Result<bool> {
    let hint = if default_yes { "Y/n" } else { "y/N" };
    let input = prompt(&format!("{} [{}]: ", message, hint))?;
    let input = input.to_lowercase();
    if input.is_empty() {
        Ok(default_yes)
    } else {
        Ok(input == "y" || input == "yes")
    }
}

/// Draft weights covering every snapshot in `data`: even indicator split,
/// even snapshot split.
pub fn draft_from_data(data: &SeasonData) -> WeightConfig {
    WeightConfig::evenly_distributed(data.season_id(), &data.snapshot_ids())
}

/// Write a starter config whose draft weights cover the snapshots found at
/// `data_path`.
///
/// An existing config is only replaced when `force` is set or the user
/// confirms. Its `top` setting is carried over.
pub fn run_init(config_path: &Path, data_path: &Path, season: Option<&str>, force: bool) -> Result<()> {
    let mut data = load_season_data(data_path)?;
    if let Some(season) = season {
        data = data.for_season(season);
    }
    if data.snapshots.is_empty() {
        bail!(
            "No snapshots found in {}; cannot build snapshot weights",
            data_path.display()
        );
    }

    let mut top = None;
    if config_path.exists() {
        if !force {
            let overwrite = prompt_yes_no(
                &format!("Config already exists at {}. Overwrite?", config_path.display()),
                false,
            )?;
            if !overwrite {
                println!("Aborted.");
                return Ok(());
            }
        }
        top = match load_config(Some(config_path.to_path_buf())) {
            Ok(existing) => existing.top,
            Err(e) => {
                log::warn!("Could not read existing config, `top` not carried over: {:#}", e);
                None
            }
        };
    }

    // Stored absolute so the config works from any directory
    let stored_path = std::fs::canonicalize(data_path)
        .with_context(|| format!("Failed to resolve {}", data_path.display()))?;

    let scoring = draft_from_data(&data);
    let config = Config {
        data: Some(stored_path.display().to_string()),
        season: season.map(str::to_string).or_else(|| scoring.season.clone()),
        top,
        scoring: Some(scoring),
    };
    save_config(config_path, &config)?;

    println!(
        "Config written to {} ({} snapshots, evenly weighted)",
        config_path.display(),
        data.snapshots.len()
    );
    println!("Edit the weights there, then run `hegemony validate`.");

    Ok(())
}
