//! Column definitions for ETF quote snapshots.
//!
//! Source files come from different export tools, so each column carries the
//! header aliases it may appear under. Chinese exchange exports use headers
//! such as `涨跌幅`; hand-made files tend to use English snake_case keys.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A column of the quote table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    /// Fund code, the unique key of a row.
    Code,
    /// Display name.
    Name,
    /// Fund type / category label.
    Category,
    /// Last traded price.
    Price,
    /// Today's change, as a fraction.
    ChangePct,
    /// Five-day change, as a fraction.
    #[serde(rename = "change_5d_pct")]
    Change5dPct,
    /// Year-to-date change, as a fraction.
    YtdPct,
    /// Turnover rate, as a fraction.
    TurnoverRate,
    /// Premium (positive) or discount (negative) to NAV, as a fraction.
    PremiumRate,
    /// Traded value in currency units.
    TradedValue,
    /// Change in fund size, used as a money-inflow proxy.
    SizeChange,
    /// Estimated fund size.
    EstimatedSize,
    /// Price-to-earnings ratio (optional).
    PeRatio,
    /// Price-to-book ratio (optional).
    PbRatio,
}

impl Column {
    /// Every column, in canonical order.
    pub const ALL: [Self; 14] = [
        Self::Code,
        Self::Name,
        Self::Category,
        Self::Price,
        Self::ChangePct,
        Self::Change5dPct,
        Self::YtdPct,
        Self::TurnoverRate,
        Self::PremiumRate,
        Self::TradedValue,
        Self::SizeChange,
        Self::EstimatedSize,
        Self::PeRatio,
        Self::PbRatio,
    ];

    /// Numeric columns that every record carries as `f64`.
    pub const CORE_NUMERIC: [Self; 9] = [
        Self::Price,
        Self::ChangePct,
        Self::Change5dPct,
        Self::YtdPct,
        Self::TurnoverRate,
        Self::PremiumRate,
        Self::TradedValue,
        Self::SizeChange,
        Self::EstimatedSize,
    ];

    /// Columns whose absence is reported as a validation warning.
    pub const ANALYTICAL: [Self; 7] = [
        Self::ChangePct,
        Self::Change5dPct,
        Self::TradedValue,
        Self::TurnoverRate,
        Self::PremiumRate,
        Self::SizeChange,
        Self::YtdPct,
    ];

    /// Canonical snake_case key.
    pub const fn key(&self) -> &'static str {
        match self {
            Self::Code => "code",
            Self::Name => "name",
            Self::Category => "category",
            Self::Price => "price",
            Self::ChangePct => "change_pct",
            Self::Change5dPct => "change_5d_pct",
            Self::YtdPct => "ytd_pct",
            Self::TurnoverRate => "turnover_rate",
            Self::PremiumRate => "premium_rate",
            Self::TradedValue => "traded_value",
            Self::SizeChange => "size_change",
            Self::EstimatedSize => "estimated_size",
            Self::PeRatio => "pe_ratio",
            Self::PbRatio => "pb_ratio",
        }
    }

    /// Human readable label used in reports.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Code => "Code",
            Self::Name => "Name",
            Self::Category => "Type",
            Self::Price => "Price",
            Self::ChangePct => "Change",
            Self::Change5dPct => "5D Change",
            Self::YtdPct => "YTD",
            Self::TurnoverRate => "Turnover",
            Self::PremiumRate => "Premium/Discount",
            Self::TradedValue => "Traded Value (100M)",
            Self::SizeChange => "Inflow (100M)",
            Self::EstimatedSize => "Est. Size (100M)",
            Self::PeRatio => "P/E",
            Self::PbRatio => "P/B",
        }
    }

    /// Header spellings recognised for this column.
    pub const fn aliases(&self) -> &'static [&'static str] {
        match self {
            Self::Code => &["代码", "基金代码", "code", "symbol"],
            Self::Name => &["名称", "基金名称", "name"],
            Self::Category => &["类型", "type", "category"],
            Self::Price => &["现价", "最新价", "price", "last"],
            Self::ChangePct => &["涨跌幅", "change_pct", "change", "today_change"],
            Self::Change5dPct => &["5日涨跌幅", "change_5d_pct", "change_5d", "five_day_change"],
            Self::YtdPct => &["年初至今", "ytd_pct", "ytd", "ytd_change"],
            Self::TurnoverRate => &["换手率", "turnover_rate", "turnover"],
            Self::PremiumRate => &["溢折率", "premium_rate", "premium", "premium_discount"],
            Self::TradedValue => &["成交额", "traded_value", "amount", "value_traded"],
            Self::SizeChange => &["规模变化", "size_change", "inflow"],
            Self::EstimatedSize => &["估算规模", "estimated_size", "size", "aum"],
            Self::PeRatio => &["市盈率", "pe_ratio", "pe"],
            Self::PbRatio => &["市净率", "pb_ratio", "pb"],
        }
    }

    /// Whether the column holds numbers.
    pub const fn is_numeric(&self) -> bool {
        !matches!(self, Self::Code | Self::Name | Self::Category)
    }

    /// Whether values of this column are fractions rendered as percentages.
    pub const fn is_percentage(&self) -> bool {
        matches!(
            self,
            Self::ChangePct
                | Self::Change5dPct
                | Self::YtdPct
                | Self::TurnoverRate
                | Self::PremiumRate
        )
    }

    /// Resolve a source header to a column.
    ///
    /// Matching trims whitespace (and a UTF-8 BOM) and ignores ASCII case.
    pub fn from_header(header: &str) -> Option<Self> {
        let header = header.trim_start_matches('\u{feff}').trim();
        Self::ALL.into_iter().find(|column| {
            column
                .aliases()
                .iter()
                .any(|alias| alias.eq_ignore_ascii_case(header))
        })
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
