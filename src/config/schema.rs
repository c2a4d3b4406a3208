use serde::{Deserialize, Serialize};

use crate::scoring::WeightConfig;

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Snapshot data file or directory
    #[serde(default)]
    pub data: Option<String>,

    /// Season to score when the data covers several
    #[serde(default)]
    pub season: Option<String>,

    /// Default leaderboard length
    #[serde(default)]
    pub top: Option<usize>,

    /// Draft weight configuration
    #[serde(default)]
    pub scoring: Option<WeightConfig>,
}
