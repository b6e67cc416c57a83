//! Factor Registry
//!
//! Describes the factors that take part in composite scoring and lets callers
//! look them up by column or category.

use etfpulse_data::Column;
use std::fmt;

/// Available factor categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FactorCategory {
    /// Price trend over one or more horizons
    Momentum,
    /// Trading activity
    Liquidity,
    /// Pricing relative to net asset value
    Valuation,
    /// Money moving into or out of the fund
    Flow,
}

impl FactorCategory {
    /// Every category, in report order.
    pub const ALL: [Self; 4] = [Self::Momentum, Self::Liquidity, Self::Valuation, Self::Flow];
}

impl fmt::Display for FactorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Momentum => "Momentum",
            Self::Liquidity => "Liquidity",
            Self::Valuation => "Valuation",
            Self::Flow => "Flow",
        };
        f.write_str(name)
    }
}

/// Factor metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FactorInfo {
    /// Factor name (unique identifier)
    pub name: &'static str,
    /// Snapshot column the factor reads
    pub column: Column,
    /// Factor category
    pub category: FactorCategory,
    /// Brief description of what the factor measures
    pub description: &'static str,
}

/// Get all scoring factor info
pub fn available_factors() -> Vec<FactorInfo> {
    vec![
        FactorInfo {
            name: "daily_change",
            column: Column::ChangePct,
            category: FactorCategory::Momentum,
            description: "Price change over the latest session",
        },
        FactorInfo {
            name: "five_day_change",
            column: Column::Change5dPct,
            category: FactorCategory::Momentum,
            description: "Price change over the last five sessions",
        },
        FactorInfo {
            name: "ytd_change",
            column: Column::YtdPct,
            category: FactorCategory::Momentum,
            description: "Price change since the start of the year",
        },
        FactorInfo {
            name: "turnover",
            column: Column::TurnoverRate,
            category: FactorCategory::Liquidity,
            description: "Traded shares relative to shares outstanding",
        },
        FactorInfo {
            name: "premium_discount",
            column: Column::PremiumRate,
            category: FactorCategory::Valuation,
            description: "Market price premium (or discount) to net asset value",
        },
        FactorInfo {
            name: "size_change",
            column: Column::SizeChange,
            category: FactorCategory::Flow,
            description: "Change in fund size, a proxy for net inflow",
        },
    ]
}

/// Get factors by category
pub fn factors_by_category(category: FactorCategory) -> Vec<FactorInfo> {
    available_factors()
        .into_iter()
        .filter(|f| f.category == category)
        .collect()
}

/// Get factor info by the column it reads
pub fn factor_for_column(column: Column) -> Option<FactorInfo> {
    available_factors().into_iter().find(|f| f.column == column)
}
