//! Validation and cleaning of raw quote tables.
//!
//! Cleaning never removes rows for bad numbers. Missing numeric cells become
//! zero and outliers are dampened to the column median, so row counts only
//! change when a row has no name or repeats an earlier code.

use crate::column::Column;
use crate::error::{LoadError, Result, ValidationWarning};
use crate::reader::{RawTable, read_table};
use crate::record::{Dataset, QuoteRecord, UNCLASSIFIED};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use tracing::{info, warn};

/// Weight of today's change in the momentum score.
pub const MOMENTUM_TODAY_WEIGHT: f64 = 0.3;

/// Weight of the five-day change in the momentum score.
pub const MOMENTUM_FIVE_DAY_WEIGHT: f64 = 0.7;

/// IQR multiplier for the outlier fences.
pub const IQR_FENCE: f64 = 1.5;

/// Blended short-term return.
pub fn momentum_score(change_pct: f64, change_5d_pct: f64) -> f64 {
    MOMENTUM_TODAY_WEIGHT * change_pct + MOMENTUM_FIVE_DAY_WEIGHT * change_5d_pct
}

/// Positions of recognised columns in a raw table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnMap {
    positions: BTreeMap<Column, usize>,
}

impl ColumnMap {
    /// Position of a column in the raw table.
    pub fn position(&self, column: Column) -> Option<usize> {
        self.positions.get(&column).copied()
    }

    /// Recognised columns.
    pub fn columns(&self) -> impl Iterator<Item = Column> + '_ {
        self.positions.keys().copied()
    }
}

/// Map headers onto columns and check the identity columns are present.
///
/// When a header matches a column twice the first occurrence wins.
pub fn validate(table: &RawTable) -> Result<(ColumnMap, Vec<ValidationWarning>)> {
    let mut positions = BTreeMap::new();
    for (idx, header) in table.headers.iter().enumerate() {
        if let Some(column) = Column::from_header(header) {
            positions.entry(column).or_insert(idx);
        }
    }

    let missing_identity: Vec<Column> = [Column::Code, Column::Name]
        .into_iter()
        .filter(|c| !positions.contains_key(c))
        .collect();
    if !missing_identity.is_empty() {
        return Err(LoadError::MissingIdentityColumns(missing_identity));
    }

    let warnings = Column::ANALYTICAL
        .into_iter()
        .filter(|c| !positions.contains_key(c))
        .map(ValidationWarning::MissingColumn)
        .collect();

    Ok((ColumnMap { positions }, warnings))
}

/// Parse a numeric cell. Blank, unparsable and non-finite cells are `None`.
///
/// A trailing `%` divides by 100 and thousands separators are ignored.
pub fn parse_number(cell: &str) -> Option<f64> {
    let cell = cell.trim();
    let (body, scale) = match cell.strip_suffix('%') {
        Some(body) => (body, 0.01),
        None => (cell, 1.0),
    };
    let body = body.trim().replace(',', "");
    if body.is_empty() {
        return None;
    }
    body.parse::<f64>()
        .ok()
        .map(|v| v * scale)
        .filter(|v| v.is_finite())
}

/// Linear-interpolated quantile of sorted values, `q` in `[0, 1]`.
///
/// Returns `None` for an empty slice.
pub fn quantile_sorted(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let pos = (sorted.len() - 1) as f64 * q.clamp(0.0, 1.0);
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let frac = pos - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * frac)
}

/// Outlier fences and replacement value for one column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IqrFence {
    /// Lower fence, `Q1 - 1.5 IQR`.
    pub lower: f64,
    /// Upper fence, `Q3 + 1.5 IQR`.
    pub upper: f64,
    /// Column median.
    pub median: f64,
}

impl IqrFence {
    /// Compute fences for `values`. `None` when there are no values.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);
        let q1 = quantile_sorted(&sorted, 0.25)?;
        let q3 = quantile_sorted(&sorted, 0.75)?;
        let median = quantile_sorted(&sorted, 0.5)?;
        let iqr = q3 - q1;
        Some(Self {
            lower: q1 - IQR_FENCE * iqr,
            upper: q3 + IQR_FENCE * iqr,
            median,
        })
    }

    /// Whether `value` lies inside the fences.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && value <= self.upper
    }
}

/// Replace every value outside the IQR fences with the median.
///
/// Returns the number of replaced values.
pub fn dampen_outliers(values: &mut [f64]) -> usize {
    let Some(fence) = IqrFence::from_values(values) else {
        return 0;
    };
    let mut replaced = 0;
    for value in values.iter_mut() {
        if !fence.contains(*value) {
            *value = fence.median;
            replaced += 1;
        }
    }
    replaced
}

/// Turn a raw table into a cleaned dataset. The input table is not modified.
pub fn clean(table: &RawTable) -> Result<Dataset> {
    let (map, mut warnings) = validate(table)?;
    for warning in &warnings {
        warn!(%warning, "Quote table validation");
    }

    let text = |row: usize, column: Column| -> String {
        map.position(column)
            .and_then(|pos| table.cell(row, pos))
            .map(str::trim)
            .unwrap_or_default()
            .to_string()
    };

    let mut seen = HashSet::new();
    let mut kept_rows = Vec::with_capacity(table.rows.len());
    let mut unnamed = 0;
    for row in 0..table.rows.len() {
        let name = text(row, Column::Name);
        if name.is_empty() {
            unnamed += 1;
            continue;
        }
        let code = text(row, Column::Code);
        if !seen.insert(code.clone()) {
            let warning = ValidationWarning::DuplicateCode(code);
            warn!(%warning, "Quote table validation");
            warnings.push(warning);
            continue;
        }
        let category = Some(text(row, Column::Category))
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| UNCLASSIFIED.to_string());
        kept_rows.push((row, QuoteRecord::new(code, name).with_category(category)));
    }
    if unnamed > 0 {
        let warning = ValidationWarning::DroppedUnnamedRows(unnamed);
        warn!(%warning, "Quote table validation");
        warnings.push(warning);
    }

    let numeric: Vec<Column> = map.columns().filter(Column::is_numeric).collect();
    for column in &numeric {
        let Some(pos) = map.position(*column) else {
            continue;
        };
        let mut values: Vec<f64> = kept_rows
            .iter()
            .map(|(row, _)| table.cell(*row, pos).and_then(parse_number).unwrap_or(0.0))
            .collect();
        let replaced = dampen_outliers(&mut values);
        if replaced > 0 {
            info!(column = column.key(), replaced, "Dampened outliers to median");
        }
        for ((_, record), value) in kept_rows.iter_mut().zip(values) {
            record.set(*column, value);
        }
    }

    let has_momentum_inputs = map.position(Column::ChangePct).is_some()
        && map.position(Column::Change5dPct).is_some();
    let mut records: Vec<QuoteRecord> = kept_rows.into_iter().map(|(_, r)| r).collect();
    if has_momentum_inputs {
        for record in &mut records {
            record.signals.momentum_score =
                Some(momentum_score(record.change_pct, record.change_5d_pct));
        }
    }

    Ok(Dataset::with_columns(records, map.columns()).with_warnings(warnings))
}

/// Read and clean a quote file.
pub fn load_dataset(path: &Path) -> Result<Dataset> {
    let table = read_table(path)?;
    let dataset = clean(&table)?;
    info!(rows = dataset.len(), "Loaded ETF quotes");
    Ok(dataset)
}
