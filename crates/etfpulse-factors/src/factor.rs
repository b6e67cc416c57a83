//! The factor abstraction.

use crate::error::{FactorError, Result};
use etfpulse_data::{Column, Dataset, momentum_score};

/// A per-record signal computed over a whole dataset.
pub trait Factor {
    /// Unique factor name.
    fn name(&self) -> &str;

    /// Columns the dataset must carry.
    fn required_columns(&self) -> &[Column];

    /// One value per record, in record order.
    fn compute(&self, dataset: &Dataset) -> Result<Vec<f64>>;

    /// Fail with the first required column the dataset lacks.
    fn check_columns(&self, dataset: &Dataset) -> Result<()> {
        match self
            .required_columns()
            .iter()
            .find(|c| !dataset.has(**c))
        {
            Some(column) => Err(FactorError::MissingColumn(*column)),
            None => Ok(()),
        }
    }
}

/// Blend of today's and the five-day change.
#[derive(Debug, Clone, Copy, Default)]
pub struct MomentumFactor;

impl MomentumFactor {
    const REQUIRED: [Column; 2] = [Column::ChangePct, Column::Change5dPct];

    /// Attach `momentum_score` to every record that lacks one.
    pub fn fill(&self, dataset: &Dataset) -> Result<Dataset> {
        self.check_columns(dataset)?;
        Ok(dataset.map_records(|r| {
            if r.signals.momentum_score.is_none() {
                r.signals.momentum_score = Some(momentum_score(r.change_pct, r.change_5d_pct));
            }
        }))
    }
}

impl Factor for MomentumFactor {
    fn name(&self) -> &str {
        "momentum"
    }

    fn required_columns(&self) -> &[Column] {
        &Self::REQUIRED
    }

    fn compute(&self, dataset: &Dataset) -> Result<Vec<f64>> {
        self.check_columns(dataset)?;
        Ok(dataset
            .records()
            .iter()
            .map(|r| momentum_score(r.change_pct, r.change_5d_pct))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use etfpulse_data::QuoteRecord;

    fn record(code: &str, today: f64, five_day: f64) -> QuoteRecord {
        QuoteRecord::new(code, code)
            .with(Column::ChangePct, today)
            .with(Column::Change5dPct, five_day)
    }

    #[test]
    fn test_momentum_compute() {
        let dataset = Dataset::new(vec![record("a", 0.01, 0.05), record("b", -0.02, 0.0)]);
        let values = MomentumFactor.compute(&dataset).unwrap();
        assert_relative_eq!(values[0], 0.3 * 0.01 + 0.7 * 0.05);
        assert_relative_eq!(values[1], -0.006, epsilon = 1e-12);
    }

    #[test]
    fn test_momentum_requires_columns() {
        let dataset = Dataset::with_columns(
            vec![record("a", 0.01, 0.05)],
            [Column::Code, Column::Name, Column::ChangePct],
        );
        assert_eq!(
            MomentumFactor.compute(&dataset).unwrap_err(),
            FactorError::MissingColumn(Column::Change5dPct)
        );
    }

    #[test]
    fn test_fill_keeps_existing_scores() {
        let mut existing = record("a", 0.01, 0.05);
        existing.signals.momentum_score = Some(9.0);
        let dataset = Dataset::new(vec![existing, record("b", 0.1, 0.1)]);

        let filled = MomentumFactor.fill(&dataset).unwrap();
        assert_eq!(filled.records()[0].signals.momentum_score, Some(9.0));
        assert_relative_eq!(filled.records()[1].signals.momentum_score.unwrap(), 0.1, epsilon = 1e-12);
        assert_eq!(dataset.records()[1].signals.momentum_score, None);
    }
}
