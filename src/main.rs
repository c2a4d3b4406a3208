use clap::{Parser, Subcommand, ValueEnum};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Instant;

use hegemony::config::{load_config, resolve_data_path, save_config, Config};
use hegemony::scoring::{self, ScoringError};
use hegemony::season::{load_season_data, SeasonData};

const EXIT_SUCCESS: i32 = 0;
const EXIT_DATA: i32 = 2;
const EXIT_INVALID_WEIGHTS: i32 = 3;
const EXIT_CONFIG: i32 = 4;

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    Table,
    Tsv,
    Json,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Rank members by Hegemony score (default if no subcommand)
    Rank {
        /// Only show the first N members
        #[arg(short, long)]
        top: Option<usize>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
    /// Check both weight tiers and report every problem
    Validate,
    /// Create a config with evenly distributed weights for the data's snapshots
    Init {
        /// Overwrite an existing config without asking
        #[arg(long)]
        force: bool,
    },
    /// Reset snapshot weights to an even split, keeping indicator weights
    Rebalance,
    /// Show the per-snapshot score breakdown for one member
    Show {
        /// Member identifier
        member_id: String,
    },
}

#[derive(Parser, Debug)]
#[command(name = "hegemony")]
#[command(about = "Alliance Hegemony score leaderboard", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/hegemony/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Snapshot data file or directory (overrides the config)
    #[arg(short, long, global = true)]
    data: Option<String>,

    /// Season to score (overrides the config)
    #[arg(short, long, global = true)]
    season: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

fn load_data(path: &Path, season: Option<&str>) -> SeasonData {
    match load_season_data(path) {
        Ok(data) => match season {
            Some(id) => data.for_season(id),
            None => data,
        },
        Err(e) => {
            eprintln!("Data error: {:#}", e);
            std::process::exit(EXIT_DATA);
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let command = cli.command.unwrap_or(Commands::Rank {
        top: None,
        format: OutputFormat::Table,
    });
    let start_time = Instant::now();

    let config_path = match cli.config.map(PathBuf::from) {
        Some(p) => p,
        None => match hegemony::config::get_config_path() {
            Ok(p) => p,
            Err(e) => {
                eprintln!("Config error: {}", e);
                std::process::exit(EXIT_CONFIG);
            }
        },
    };

    // Init runs before a config exists
    if let Commands::Init { force } = command {
        let Some(data_path) = cli.data else {
            eprintln!("`hegemony init` needs --data <file-or-directory>");
            std::process::exit(EXIT_CONFIG);
        };
        if let Err(e) = hegemony::config::run_init(
            &config_path,
            &PathBuf::from(&data_path),
            cli.season.as_deref(),
            force,
        ) {
            eprintln!("Init failed: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
        std::process::exit(EXIT_SUCCESS);
    }

    let mut config: Config = match load_config(Some(config_path.clone())) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };
    log::debug!("Loaded config from {}", config_path.display());

    let mut weights = config.scoring.clone().unwrap_or_default();

    if let Commands::Rebalance = command {
        if weights.snapshots.is_empty() {
            eprintln!("No snapshots configured; run `hegemony init` first.");
            std::process::exit(EXIT_CONFIG);
        }
        weights.rebalance();
        config.scoring = Some(weights.clone());
        if let Err(e) = save_config(&config_path, &config) {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
        println!(
            "Rebalanced {} snapshots to {} each",
            weights.snapshots.len(),
            hegemony::output::format_percent(weights.snapshots[0].weight)
        );
        std::process::exit(EXIT_SUCCESS);
    }

    // --data is relative to the working directory, `data:` to the config file
    let data_path = match (cli.data, config.data.as_deref()) {
        (Some(flag), _) => PathBuf::from(flag),
        (None, Some(configured)) => resolve_data_path(&config_path, configured),
        (None, None) => {
            eprintln!("No snapshot data configured. Pass --data or set `data:` in the config.");
            std::process::exit(EXIT_CONFIG);
        }
    };
    let season = cli.season.or_else(|| config.season.clone());
    let data = load_data(&data_path, season.as_deref());
    log::debug!(
        "Loaded {} snapshots from {} in {:?}",
        data.snapshots.len(),
        data_path.display(),
        start_time.elapsed()
    );

    for warning in scoring::lint_weights(&weights) {
        log::warn!("{}", warning);
    }

    match command {
        Commands::Validate => {
            let mut errors = scoring::validate_all(&weights).errors();

            let configured: HashSet<&str> =
                weights.snapshots.iter().map(|s| s.snapshot_id.as_str()).collect();
            let present: HashSet<&str> = data.snapshots.iter().map(|s| s.id()).collect();
            for snapshot in &data.snapshots {
                if !configured.contains(snapshot.id()) {
                    errors.push(format!(
                        "scoring.snapshots: no weights for snapshot '{}'",
                        snapshot.id()
                    ));
                }
            }
            for entry in &weights.snapshots {
                if !present.contains(entry.snapshot_id.as_str()) {
                    log::warn!(
                        "Snapshot '{}' is weighted but has no data; its members score 0 for it",
                        entry.snapshot_id
                    );
                }
            }

            if errors.is_empty() {
                println!(
                    "Weights OK: {} snapshots, both tiers total 100%",
                    weights.snapshots.len()
                );
                std::process::exit(EXIT_SUCCESS);
            }
            eprintln!("Weight config errors:");
            for error in errors {
                eprintln!("  - {}", error);
            }
            std::process::exit(EXIT_INVALID_WEIGHTS);
        }
        Commands::Rank { top, format } => {
            let results = score_or_exit(&weights, &data);
            let results = match top.or(config.top) {
                Some(n) => scoring::limit_top_n(results, n),
                None => results,
            };

            match format {
                OutputFormat::Table => {
                    let use_colors = hegemony::output::should_use_colors();
                    println!("{}", hegemony::output::format_leaderboard(&results, use_colors));
                }
                OutputFormat::Tsv => {
                    let output = hegemony::output::format_tsv(&results);
                    if !output.is_empty() {
                        println!("{}", output);
                    }
                }
                OutputFormat::Json => match hegemony::output::format_json(&results) {
                    Ok(json) => println!("{}", json),
                    Err(e) => {
                        eprintln!("Output error: {:#}", e);
                        std::process::exit(EXIT_DATA);
                    }
                },
            }

            log::debug!("Ranked {} members in {:?}", results.len(), start_time.elapsed());
        }
        Commands::Show { member_id } => {
            let results = score_or_exit(&weights, &data);
            let Some(result) = results.iter().find(|r| r.member_id == member_id) else {
                eprintln!("Member '{}' not found in any snapshot.", member_id);
                std::process::exit(EXIT_DATA);
            };
            let use_colors = hegemony::output::should_use_colors();
            println!(
                "{}",
                hegemony::output::format_breakdown(result, &weights, use_colors)
            );
        }
        Commands::Init { .. } | Commands::Rebalance => unreachable!("handled above"),
    }

    std::process::exit(EXIT_SUCCESS);
}

fn score_or_exit(
    weights: &scoring::WeightConfig,
    data: &SeasonData,
) -> Vec<scoring::ScoreResult> {
    match scoring::compute_scores(weights, &data.snapshots) {
        Ok(results) => results,
        Err(ScoringError::InvalidWeights(report)) => {
            eprintln!("Weight config errors:");
            for error in report.errors() {
                eprintln!("  - {}", error);
            }
            eprintln!("Fix the weights (or run `hegemony rebalance`) before ranking.");
            std::process::exit(EXIT_INVALID_WEIGHTS);
        }
        Err(e) => {
            eprintln!("Scoring error: {}", e);
            std::process::exit(EXIT_INVALID_WEIGHTS);
        }
    }
}
