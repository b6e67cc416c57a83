//! Selection strategies.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

/// How a strategy portfolio picks funds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Best year-to-date performers
    Growth,
    /// Cheapest by blended P/E and P/B
    Value,
    /// Highest blended short-term momentum
    Momentum,
    /// Highest composite score
    Balanced,
}

impl Strategy {
    /// Every strategy, in report order.
    pub const ALL: [Self; 4] = [Self::Growth, Self::Value, Self::Momentum, Self::Balanced];

    /// Short identifier, also the key for configured weights.
    pub const fn key(&self) -> &'static str {
        match self {
            Self::Growth => "growth",
            Self::Value => "value",
            Self::Momentum => "momentum",
            Self::Balanced => "balanced",
        }
    }

    /// Display name.
    pub const fn title(&self) -> &'static str {
        match self {
            Self::Growth => "Growth",
            Self::Value => "Value",
            Self::Momentum => "Momentum",
            Self::Balanced => "Balanced",
        }
    }

    /// One-line description of the selection rule.
    pub const fn description(&self) -> &'static str {
        match self {
            Self::Growth => "Funds with the strongest year-to-date performance.",
            Self::Value => {
                "Funds with the lowest blended valuation (0.6 P/E + 0.4 P/B); \
                 falls back to composite score without valuation data."
            }
            Self::Momentum => "Funds with the strongest blend of today's and five-day change.",
            Self::Balanced => "Funds with the highest composite factor score.",
        }
    }

    /// Parse a strategy name. Unknown names select [`Strategy::Balanced`].
    pub fn parse(name: &str) -> Self {
        let normalized = name.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|s| s.key() == normalized)
            .unwrap_or_else(|| {
                warn!(strategy = name, "Unknown strategy, using balanced");
                Self::Balanced
            })
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}
