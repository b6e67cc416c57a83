//! Composite Score
//!
//! Standardizes each weighted factor column across the dataset and combines
//! the z-scores linearly. A fund's score therefore depends on every other fund
//! in the same snapshot.

use crate::error::Result;
use crate::factor::Factor;
use crate::weights::FactorWeights;
use crate::zscore::zscore;
use etfpulse_data::{Column, Dataset};
use ndarray::{Array1, Array2, Axis};
use tracing::{debug, warn};

/// Computes the weighted composite score.
#[derive(Debug, Clone)]
pub struct CompositeScorer {
    weights: FactorWeights,
    columns: Vec<Column>,
}

impl Default for CompositeScorer {
    fn default() -> Self {
        let weights = FactorWeights::default();
        let columns = weights.columns();
        Self { weights, columns }
    }
}

impl CompositeScorer {
    /// Create a scorer, re-checking every weight.
    pub fn new(weights: FactorWeights) -> Result<Self> {
        let weights = FactorWeights::new(weights.iter())?;
        let columns = weights.columns();
        Ok(Self { weights, columns })
    }

    /// The weights in use.
    pub const fn weights(&self) -> &FactorWeights {
        &self.weights
    }

    /// Factor columns this scorer weighs.
    pub fn factor_columns(&self) -> &[Column] {
        &self.columns
    }

    /// Composite score per record, in record order.
    ///
    /// Weighted columns the dataset does not carry contribute nothing.
    pub fn score(&self, dataset: &Dataset) -> Result<Vec<f64>> {
        let (present, missing): (Vec<_>, Vec<_>) =
            self.weights.iter().partition(|(c, _)| dataset.has(*c));
        for (column, _) in &missing {
            warn!(factor = %column, "Factor column missing, skipping");
        }

        let mut exposures = Array2::<f64>::zeros((dataset.len(), present.len()));
        for (mut target, (column, _)) in exposures.axis_iter_mut(Axis(1)).zip(&present) {
            target.assign(&zscore(&dataset.column_values(*column)));
        }
        let weights: Array1<f64> = present.iter().map(|(_, w)| *w).collect();

        debug!(
            records = dataset.len(),
            factors = present.len(),
            "Computed composite scores"
        );
        Ok(exposures.dot(&weights).to_vec())
    }

    /// A copy of `dataset` with `composite_score` attached to every record.
    pub fn apply(&self, dataset: &Dataset) -> Result<Dataset> {
        let mut scores = self.score(dataset)?.into_iter();
        Ok(dataset.map_records(|r| r.signals.composite_score = scores.next()))
    }
}

impl Factor for CompositeScorer {
    fn name(&self) -> &str {
        "composite_score"
    }

    // Missing factor columns are tolerated, so nothing is strictly required.
    fn required_columns(&self) -> &[Column] {
        &[]
    }

    fn compute(&self, dataset: &Dataset) -> Result<Vec<f64>> {
        self.score(dataset)
    }
}
