//! Factor weights for the composite score.

use crate::error::{FactorError, Result};
use etfpulse_data::Column;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Weight per factor column.
///
/// Weights are used as given; they are not renormalized to sum to one.
/// In configuration files keys may be canonical column keys or any
/// recognised header alias.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, f64>", into = "BTreeMap<String, f64>")]
pub struct FactorWeights(BTreeMap<Column, f64>);

impl Default for FactorWeights {
    fn default() -> Self {
        Self(BTreeMap::from([
            (Column::ChangePct, 0.15),
            (Column::Change5dPct, 0.20),
            (Column::TurnoverRate, 0.15),
            (Column::PremiumRate, 0.15),
            (Column::YtdPct, 0.20),
            (Column::SizeChange, 0.15),
        ]))
    }
}

impl FactorWeights {
    /// Create weights, rejecting negative and non-finite values.
    pub fn new(weights: impl IntoIterator<Item = (Column, f64)>) -> Result<Self> {
        let weights: BTreeMap<Column, f64> = weights.into_iter().collect();
        for (&column, &weight) in &weights {
            if !weight.is_finite() || weight < 0.0 {
                return Err(FactorError::InvalidWeight { column, weight });
            }
        }
        Ok(Self(weights))
    }

    /// Weight of a column, `None` when it is not a factor.
    pub fn get(&self, column: Column) -> Option<f64> {
        self.0.get(&column).copied()
    }

    /// Factor columns and weights in column order.
    pub fn iter(&self) -> impl Iterator<Item = (Column, f64)> + '_ {
        self.0.iter().map(|(c, w)| (*c, *w))
    }

    /// Factor columns in column order.
    pub fn columns(&self) -> Vec<Column> {
        self.0.keys().copied().collect()
    }

    /// Number of factors.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no factor is weighted.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sum of all weights.
    pub fn total(&self) -> f64 {
        self.0.values().sum()
    }
}

impl TryFrom<BTreeMap<String, f64>> for FactorWeights {
    type Error = FactorError;

    fn try_from(raw: BTreeMap<String, f64>) -> Result<Self> {
        let mut weights = Vec::with_capacity(raw.len());
        for (key, weight) in raw {
            let column = Column::from_header(&key)
                .filter(|c| c.is_numeric())
                .ok_or(FactorError::UnknownColumn(key))?;
            weights.push((column, weight));
        }
        Self::new(weights)
    }
}

impl From<FactorWeights> for BTreeMap<String, f64> {
    fn from(weights: FactorWeights) -> Self {
        weights
            .0
            .into_iter()
            .map(|(c, w)| (c.key().to_string(), w))
            .collect()
    }
}
