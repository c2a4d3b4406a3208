use serde::{Deserialize, Serialize};

use super::config::IndicatorWeight;

/// The four raw member metrics captured in every snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Indicator {
    Contribution,
    Merit,
    Assist,
    Donation,
}

impl Indicator {
    pub const ALL: [Indicator; 4] = [
        Indicator::Contribution,
        Indicator::Merit,
        Indicator::Assist,
        Indicator::Donation,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Indicator::Contribution => "contribution",
            Indicator::Merit => "merit",
            Indicator::Assist => "assist",
            Indicator::Donation => "donation",
        }
    }

    pub fn weight_in(&self, weights: &IndicatorWeight) -> f64 {
        match self {
            Indicator::Contribution => weights.contribution,
            Indicator::Merit => weights.merit,
            Indicator::Assist => weights.assist,
            Indicator::Donation => weights.donation,
        }
    }
}

/// One member's raw indicator values at one snapshot.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq)]
pub struct IndicatorValues {
    #[serde(default)]
    pub contribution: f64,
    #[serde(default)]
    pub merit: f64,
    #[serde(default)]
    pub assist: f64,
    #[serde(default)]
    pub donation: f64,
}
