//! Named ranking views.

use etfpulse_data::{Column, QuoteRecord};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A named top-N view over the snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewKind {
    /// Largest gains today
    Gainers,
    /// Largest losses today
    Losers,
    /// Highest traded value
    Volume,
    /// Highest turnover rate
    Turnover,
    /// Deepest discounts to NAV
    Discount,
    /// Largest size increase
    Inflow,
    /// Multi-day decline with a positive day
    Reversal,
    /// Highest composite score
    Score,
}

/// Sort direction of a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Largest first
    Descending,
    /// Smallest first
    Ascending,
}

/// A column displayed by a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewField {
    /// A snapshot column
    Column(Column),
    /// The attached composite score
    CompositeScore,
}

impl ViewField {
    /// Header label.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Column(column) => column.label(),
            Self::CompositeScore => "Score",
        }
    }

    /// Numeric value of this field for a record.
    pub const fn value(&self, record: &QuoteRecord) -> Option<f64> {
        match self {
            Self::Column(column) => record.value(*column),
            Self::CompositeScore => record.signals.composite_score,
        }
    }
}

const fn col(column: Column) -> ViewField {
    ViewField::Column(column)
}

const PRICE_MOVE_FIELDS: [ViewField; 5] = [
    col(Column::Code),
    col(Column::Name),
    col(Column::Price),
    col(Column::ChangePct),
    col(Column::TradedValue),
];

const TURNOVER_FIELDS: [ViewField; 5] = [
    col(Column::Code),
    col(Column::Name),
    col(Column::Price),
    col(Column::TurnoverRate),
    col(Column::TradedValue),
];

const DISCOUNT_FIELDS: [ViewField; 6] = [
    col(Column::Code),
    col(Column::Name),
    col(Column::Price),
    col(Column::PremiumRate),
    col(Column::TradedValue),
    col(Column::TurnoverRate),
];

const INFLOW_FIELDS: [ViewField; 6] = [
    col(Column::Code),
    col(Column::Name),
    col(Column::Price),
    col(Column::SizeChange),
    col(Column::EstimatedSize),
    col(Column::ChangePct),
];

const REVERSAL_FIELDS: [ViewField; 6] = [
    col(Column::Code),
    col(Column::Name),
    col(Column::Price),
    col(Column::ChangePct),
    col(Column::Change5dPct),
    col(Column::TradedValue),
];

const SCORE_FIELDS: [ViewField; 7] = [
    col(Column::Code),
    col(Column::Name),
    col(Column::Price),
    col(Column::ChangePct),
    col(Column::Change5dPct),
    col(Column::YtdPct),
    ViewField::CompositeScore,
];

impl ViewKind {
    /// Every view, in report order.
    pub const ALL: [Self; 8] = [
        Self::Gainers,
        Self::Losers,
        Self::Volume,
        Self::Turnover,
        Self::Discount,
        Self::Inflow,
        Self::Reversal,
        Self::Score,
    ];

    /// Short identifier.
    pub const fn key(&self) -> &'static str {
        match self {
            Self::Gainers => "gainers",
            Self::Losers => "losers",
            Self::Volume => "volume",
            Self::Turnover => "turnover",
            Self::Discount => "discount",
            Self::Inflow => "inflow",
            Self::Reversal => "reversal",
            Self::Score => "score",
        }
    }

    /// Section title.
    pub const fn title(&self) -> &'static str {
        match self {
            Self::Gainers => "Top Gainers",
            Self::Losers => "Top Losers",
            Self::Volume => "Top Traded Value",
            Self::Turnover => "Top Turnover",
            Self::Discount => "Discounted ETFs",
            Self::Inflow => "Top Inflows",
            Self::Reversal => "Reversal Candidates",
            Self::Score => "Top Composite Scores",
        }
    }

    /// Column the view sorts on. `None` for the score view.
    pub const fn sort_column(&self) -> Option<Column> {
        match self {
            Self::Gainers | Self::Losers => Some(Column::ChangePct),
            Self::Volume => Some(Column::TradedValue),
            Self::Turnover => Some(Column::TurnoverRate),
            Self::Discount => Some(Column::PremiumRate),
            Self::Inflow => Some(Column::SizeChange),
            Self::Reversal => Some(Column::Change5dPct),
            Self::Score => None,
        }
    }

    /// Columns the view sorts or filters on.
    pub const fn required_columns(&self) -> &'static [Column] {
        match self {
            Self::Gainers | Self::Losers => &[Column::ChangePct],
            Self::Volume => &[Column::TradedValue],
            Self::Turnover => &[Column::TurnoverRate],
            Self::Discount => &[Column::PremiumRate],
            Self::Inflow => &[Column::SizeChange],
            Self::Reversal => &[Column::Change5dPct, Column::ChangePct],
            Self::Score => &[],
        }
    }

    /// Sort direction.
    pub const fn order(&self) -> SortOrder {
        match self {
            Self::Losers | Self::Discount | Self::Reversal => SortOrder::Ascending,
            _ => SortOrder::Descending,
        }
    }

    /// Fields shown when the view is displayed.
    pub const fn projection(&self) -> &'static [ViewField] {
        match self {
            Self::Gainers | Self::Losers | Self::Volume => &PRICE_MOVE_FIELDS,
            Self::Turnover => &TURNOVER_FIELDS,
            Self::Discount => &DISCOUNT_FIELDS,
            Self::Inflow => &INFLOW_FIELDS,
            Self::Reversal => &REVERSAL_FIELDS,
            Self::Score => &SCORE_FIELDS,
        }
    }

    /// Parse a view from its key.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.key() == key)
    }
}

impl fmt::Display for ViewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// The rows of one view, in rank order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedView {
    /// Which view this is
    pub kind: ViewKind,
    /// Fields to display, limited to those the data carries
    pub fields: Vec<ViewField>,
    /// Ranked records
    pub rows: Vec<QuoteRecord>,
}

impl RankedView {
    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the view has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Codes in rank order.
    pub fn codes(&self) -> Vec<&str> {
        self.rows.iter().map(|r| r.code.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_roundtrip() {
        for kind in ViewKind::ALL {
            assert_eq!(ViewKind::from_key(kind.key()), Some(kind));
        }
        assert_eq!(ViewKind::from_key("nope"), None);
    }

    #[test]
    fn test_projections_start_with_identity() {
        for kind in ViewKind::ALL {
            let projection = kind.projection();
            assert_eq!(projection[0], ViewField::Column(Column::Code));
            assert_eq!(projection[1], ViewField::Column(Column::Name));
        }
    }

    #[test]
    fn test_sort_column_is_required() {
        for kind in ViewKind::ALL {
            if let Some(column) = kind.sort_column() {
                assert!(kind.required_columns().contains(&column));
            }
        }
    }

    #[test]
    fn test_score_field_value() {
        let mut record = QuoteRecord::new("1", "a");
        assert_eq!(ViewField::CompositeScore.value(&record), None);
        record.signals.composite_score = Some(0.4);
        assert_eq!(ViewField::CompositeScore.value(&record), Some(0.4));
        assert_eq!(ViewField::CompositeScore.label(), "Score");
    }
}
