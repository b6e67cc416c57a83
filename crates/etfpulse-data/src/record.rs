//! Typed quote records and the dataset that holds them.

use crate::column::Column;
use crate::error::ValidationWarning;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Category label used when the source has no type column or a blank cell.
pub const UNCLASSIFIED: &str = "Unclassified";

/// Fields derived by the pipeline and attached to a record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Signals {
    /// Weighted sum of factor z-scores, relative to the dataset it was computed on.
    pub composite_score: Option<f64>,
    /// Blended short-term return.
    pub momentum_score: Option<f64>,
    /// Multi-day decline followed by a positive day.
    pub reversal: bool,
}

/// One ETF quote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteRecord {
    /// Fund code.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Type label.
    pub category: String,
    /// Last price.
    pub price: f64,
    /// Today's change.
    pub change_pct: f64,
    /// Five-day change.
    pub change_5d_pct: f64,
    /// Year-to-date change.
    pub ytd_pct: f64,
    /// Turnover rate.
    pub turnover_rate: f64,
    /// Premium/discount rate.
    pub premium_rate: f64,
    /// Traded value.
    pub traded_value: f64,
    /// Size change (inflow proxy).
    pub size_change: f64,
    /// Estimated size.
    pub estimated_size: f64,
    /// P/E ratio, when the source carries it.
    pub pe_ratio: Option<f64>,
    /// P/B ratio, when the source carries it.
    pub pb_ratio: Option<f64>,
    /// Derived fields.
    #[serde(flatten)]
    pub signals: Signals,
}

impl QuoteRecord {
    /// Create a record with zeroed numeric fields.
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            category: UNCLASSIFIED.to_string(),
            price: 0.0,
            change_pct: 0.0,
            change_5d_pct: 0.0,
            ytd_pct: 0.0,
            turnover_rate: 0.0,
            premium_rate: 0.0,
            traded_value: 0.0,
            size_change: 0.0,
            estimated_size: 0.0,
            pe_ratio: None,
            pb_ratio: None,
            signals: Signals::default(),
        }
    }

    /// Set the category label.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Set a numeric column. Text columns are ignored.
    pub fn with(mut self, column: Column, value: f64) -> Self {
        self.set(column, value);
        self
    }

    /// Numeric value of a column, `None` for text columns and absent valuations.
    pub const fn value(&self, column: Column) -> Option<f64> {
        match column {
            Column::Code | Column::Name | Column::Category => None,
            Column::Price => Some(self.price),
            Column::ChangePct => Some(self.change_pct),
            Column::Change5dPct => Some(self.change_5d_pct),
            Column::YtdPct => Some(self.ytd_pct),
            Column::TurnoverRate => Some(self.turnover_rate),
            Column::PremiumRate => Some(self.premium_rate),
            Column::TradedValue => Some(self.traded_value),
            Column::SizeChange => Some(self.size_change),
            Column::EstimatedSize => Some(self.estimated_size),
            Column::PeRatio => self.pe_ratio,
            Column::PbRatio => self.pb_ratio,
        }
    }

    /// Overwrite a numeric column.
    pub fn set(&mut self, column: Column, value: f64) {
        match column {
            Column::Code | Column::Name | Column::Category => {}
            Column::Price => self.price = value,
            Column::ChangePct => self.change_pct = value,
            Column::Change5dPct => self.change_5d_pct = value,
            Column::YtdPct => self.ytd_pct = value,
            Column::TurnoverRate => self.turnover_rate = value,
            Column::PremiumRate => self.premium_rate = value,
            Column::TradedValue => self.traded_value = value,
            Column::SizeChange => self.size_change = value,
            Column::EstimatedSize => self.estimated_size = value,
            Column::PeRatio => self.pe_ratio = Some(value),
            Column::PbRatio => self.pb_ratio = Some(value),
        }
    }

    /// Text value of an identity column.
    pub fn text(&self, column: Column) -> Option<&str> {
        match column {
            Column::Code => Some(&self.code),
            Column::Name => Some(&self.name),
            Column::Category => Some(&self.category),
            _ => None,
        }
    }

    /// Composite score, or negative infinity when the record is unscored.
    ///
    /// Used as a sort key so unscored rows always rank last.
    pub fn score_or_min(&self) -> f64 {
        self.signals.composite_score.unwrap_or(f64::NEG_INFINITY)
    }
}

/// An ordered set of quote records plus what is known about their columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    records: Vec<QuoteRecord>,
    columns: BTreeSet<Column>,
    warnings: Vec<ValidationWarning>,
}

impl Dataset {
    /// Build a dataset from records, assuming every core column is present.
    ///
    /// Valuation columns count as present when any record carries them.
    pub fn new(records: Vec<QuoteRecord>) -> Self {
        let mut columns: BTreeSet<Column> = [Column::Code, Column::Name, Column::Category]
            .into_iter()
            .chain(Column::CORE_NUMERIC)
            .collect();
        if records.iter().any(|r| r.pe_ratio.is_some()) {
            columns.insert(Column::PeRatio);
        }
        if records.iter().any(|r| r.pb_ratio.is_some()) {
            columns.insert(Column::PbRatio);
        }
        Self {
            records,
            columns,
            warnings: Vec::new(),
        }
    }

    /// Build a dataset with an explicit column set.
    pub fn with_columns(
        records: Vec<QuoteRecord>,
        columns: impl IntoIterator<Item = Column>,
    ) -> Self {
        Self {
            records,
            columns: columns.into_iter().collect(),
            warnings: Vec::new(),
        }
    }

    /// Attach validation warnings.
    pub fn with_warnings(mut self, warnings: Vec<ValidationWarning>) -> Self {
        self.warnings = warnings;
        self
    }

    /// Records in source order.
    pub fn records(&self) -> &[QuoteRecord] {
        &self.records
    }

    /// Consume the dataset, returning its records.
    pub fn into_records(self) -> Vec<QuoteRecord> {
        self.records
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset has no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Whether the source carried a column.
    pub fn has(&self, column: Column) -> bool {
        self.columns.contains(&column)
    }

    /// Columns carried by the source.
    pub const fn columns(&self) -> &BTreeSet<Column> {
        &self.columns
    }

    /// Warnings raised while loading.
    pub fn warnings(&self) -> &[ValidationWarning] {
        &self.warnings
    }

    /// Values of a numeric column in row order (`NaN` where a record has none).
    pub fn column_values(&self, column: Column) -> Vec<f64> {
        self.records
            .iter()
            .map(|r| r.value(column).unwrap_or(f64::NAN))
            .collect()
    }

    /// Whether every record has a composite score (vacuously true when empty).
    pub fn is_scored(&self) -> bool {
        self.records
            .iter()
            .all(|r| r.signals.composite_score.is_some())
    }

    /// A copy of this dataset with a transformation applied to each record.
    pub fn map_records(&self, f: impl FnMut(&mut QuoteRecord)) -> Self {
        let mut next = self.clone();
        next.records.iter_mut().for_each(f);
        next
    }

    /// A copy restricted to records matching a predicate, keeping order.
    pub fn filter(&self, predicate: impl Fn(&QuoteRecord) -> bool) -> Self {
        Self {
            records: self
                .records
                .iter()
                .filter(|r| predicate(r))
                .cloned()
                .collect(),
            columns: self.columns.clone(),
            warnings: self.warnings.clone(),
        }
    }
}
