//! Expected return and risk level of a portfolio.
//!
//! Each group is represented by its first (best ranked) holding. The
//! representative return is that holding's year-to-date change, or its
//! five-day change when the snapshot has no year-to-date column.

use crate::config::{PortfolioConfig, RiskThresholds};
use crate::error::{PortfolioError, Result};
use crate::portfolio::Portfolio;
use etfpulse_data::{Column, Dataset};
use serde::Serialize;
use std::fmt;
use tracing::warn;

/// Coarse risk classification by expected return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    /// Expected return above the high bound
    High,
    /// Between the bounds
    Medium,
    /// Expected return below the low bound
    Low,
    /// No usable return data
    Unknown,
}

impl RiskLevel {
    /// Classify an expected return.
    pub fn classify(expected_return: f64, thresholds: &RiskThresholds) -> Self {
        if expected_return > thresholds.high {
            Self::High
        } else if expected_return < thresholds.low {
            Self::Low
        } else {
            Self::Medium
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
            Self::Unknown => "Unknown",
        };
        f.write_str(label)
    }
}

/// Which column stands in for a fund's return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnProxy {
    /// Year-to-date change
    YearToDate,
    /// Five-day change
    FiveDay,
    /// Neither column exists
    Unavailable,
}

impl ReturnProxy {
    /// The best proxy the dataset carries.
    pub fn for_dataset(dataset: &Dataset) -> Self {
        if dataset.has(Column::YtdPct) {
            Self::YearToDate
        } else if dataset.has(Column::Change5dPct) {
            Self::FiveDay
        } else {
            Self::Unavailable
        }
    }

    const fn column(&self) -> Option<Column> {
        match self {
            Self::YearToDate => Some(Column::YtdPct),
            Self::FiveDay => Some(Column::Change5dPct),
            Self::Unavailable => None,
        }
    }
}

/// Indicative metrics of a portfolio.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortfolioMetrics {
    /// Weighted representative return
    pub expected_return: f64,
    /// Risk classification
    pub risk: RiskLevel,
    /// Normalized group weights
    pub weights: Vec<f64>,
}

impl PortfolioMetrics {
    /// Safe default: no return, unknown risk and equal weights.
    pub fn degraded(groups: usize) -> Self {
        Self {
            expected_return: 0.0,
            risk: RiskLevel::Unknown,
            weights: equal_weights(groups),
        }
    }
}

fn equal_weights(groups: usize) -> Vec<f64> {
    vec![1.0 / groups as f64; groups]
}

/// Resolve the weights of a portfolio with `groups` groups.
///
/// Without configured weights every group is weighted equally. A shorter
/// configured vector falls back to equal weights, a longer one is truncated.
/// The result is normalized to sum to one; an all-zero vector falls back to
/// equal weights.
pub fn resolve_weights(name: &str, configured: Option<&[f64]>, groups: usize) -> Result<Vec<f64>> {
    if groups == 0 {
        return Err(PortfolioError::NoGroups(name.to_string()));
    }
    let Some(configured) = configured else {
        return Ok(equal_weights(groups));
    };
    if configured.iter().any(|w| !w.is_finite() || *w < 0.0) {
        return Err(PortfolioError::InvalidWeights {
            name: name.to_string(),
            weights: configured.to_vec(),
        });
    }

    let weights = if configured.len() < groups {
        warn!(
            portfolio = name,
            configured = configured.len(),
            groups,
            "Fewer weights than groups, using equal weights"
        );
        equal_weights(groups)
    } else {
        if configured.len() > groups {
            warn!(
                portfolio = name,
                configured = configured.len(),
                groups,
                "More weights than groups, truncating"
            );
        }
        configured[..groups].to_vec()
    };

    let total: f64 = weights.iter().sum();
    if total > 0.0 {
        Ok(weights.into_iter().map(|w| w / total).collect())
    } else {
        warn!(portfolio = name, "All weights are zero, using equal weights");
        Ok(equal_weights(groups))
    }
}

/// Compute the metrics of a portfolio.
///
/// Weights come from the configuration entry named `name`. Empty groups
/// contribute a zero return in their own position. Without any group that
/// has a usable return the expected return is zero and the risk unknown.
pub fn portfolio_metrics(
    portfolio: &Portfolio,
    name: &str,
    proxy: ReturnProxy,
    config: &PortfolioConfig,
) -> Result<PortfolioMetrics> {
    let groups = portfolio.groups();
    let weights = resolve_weights(name, config.weights_for(name), groups.len())?;

    let returns: Vec<Option<f64>> = groups
        .iter()
        .map(|g| {
            let first = g.first()?;
            proxy.column().and_then(|c| first.value(c))
        })
        .collect();

    if returns.iter().all(Option::is_none) {
        return Ok(PortfolioMetrics {
            expected_return: 0.0,
            risk: RiskLevel::Unknown,
            weights,
        });
    }

    let expected_return: f64 = returns
        .iter()
        .zip(&weights)
        .map(|(r, w)| r.unwrap_or(0.0) * w)
        .sum();
    Ok(PortfolioMetrics {
        expected_return,
        risk: RiskLevel::classify(expected_return, &config.risk),
        weights,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::portfolio::Sleeve;
    use approx::assert_relative_eq;
    use etfpulse_data::QuoteRecord;
    use rstest::rstest;

    fn fund(code: &str, ytd: f64) -> QuoteRecord {
        QuoteRecord::new(code, code).with(Column::YtdPct, ytd)
    }

    fn sleeve(category: &str, holdings: Vec<QuoteRecord>) -> Sleeve {
        Sleeve {
            category: category.to_string(),
            holdings,
            filler: false,
        }
    }

    #[rstest]
    #[case(None, 3, vec![1.0 / 3.0; 3])]
    #[case(Some(vec![2.0, 1.0, 1.0]), 3, vec![0.5, 0.25, 0.25])]
    #[case(Some(vec![1.0]), 3, vec![1.0 / 3.0; 3])]
    #[case(Some(vec![3.0, 1.0, 5.0]), 2, vec![0.75, 0.25])]
    #[case(Some(vec![0.0, 0.0]), 2, vec![0.5, 0.5])]
    fn test_resolve_weights(
        #[case] configured: Option<Vec<f64>>,
        #[case] groups: usize,
        #[case] expected: Vec<f64>,
    ) {
        let weights = resolve_weights("p", configured.as_deref(), groups).unwrap();
        assert_eq!(weights.len(), expected.len());
        for (w, e) in weights.iter().zip(&expected) {
            assert_relative_eq!(*w, *e, epsilon = 1e-12);
        }
        assert_relative_eq!(weights.iter().sum::<f64>(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_resolve_weights_errors() {
        assert_eq!(
            resolve_weights("p", None, 0),
            Err(PortfolioError::NoGroups("p".to_string()))
        );
        assert!(matches!(
            resolve_weights("p", Some(&[0.5, -0.5][..]), 2),
            Err(PortfolioError::InvalidWeights { .. })
        ));
    }

    #[rstest]
    #[case(0.25, RiskLevel::High)]
    #[case(0.20, RiskLevel::Medium)]
    #[case(0.05, RiskLevel::Medium)]
    #[case(0.049, RiskLevel::Low)]
    #[case(-0.1, RiskLevel::Low)]
    fn test_classify(#[case] expected_return: f64, #[case] level: RiskLevel) {
        assert_eq!(RiskLevel::classify(expected_return, &RiskThresholds::default()), level);
    }

    #[test]
    fn test_single_portfolio_uses_top_holding() {
        let portfolio = Portfolio::Single(vec![fund("a", 0.12), fund("b", 0.5)]);
        let metrics =
            portfolio_metrics(&portfolio, "growth", ReturnProxy::YearToDate, &PortfolioConfig::default())
                .unwrap();
        assert_relative_eq!(metrics.expected_return, 0.12);
        assert_eq!(metrics.risk, RiskLevel::Medium);
        assert_eq!(metrics.weights, vec![1.0]);
    }

    #[test]
    fn test_empty_groups_keep_their_position() {
        let mut config = PortfolioConfig::default();
        config
            .strategy_weights
            .insert("mix".to_string(), vec![0.5, 0.25, 0.25]);
        let portfolio = Portfolio::Grouped(vec![
            sleeve("a", vec![]),
            sleeve("b", vec![fund("b1", 0.4)]),
            sleeve("c", vec![fund("c1", 0.8)]),
        ]);
        let metrics = portfolio_metrics(&portfolio, "mix", ReturnProxy::YearToDate, &config).unwrap();
        assert_relative_eq!(metrics.expected_return, 0.25 * 0.4 + 0.25 * 0.8, epsilon = 1e-12);
        assert_eq!(metrics.risk, RiskLevel::High);
    }

    #[test]
    fn test_no_usable_group_is_unknown() {
        let config = PortfolioConfig::default();
        let empty = Portfolio::Grouped(vec![sleeve("a", vec![]), sleeve("b", vec![])]);
        let metrics = portfolio_metrics(&empty, "x", ReturnProxy::YearToDate, &config).unwrap();
        assert_eq!(metrics.expected_return, 0.0);
        assert_eq!(metrics.risk, RiskLevel::Unknown);
        assert_eq!(metrics.weights, vec![0.5, 0.5]);

        let no_proxy = Portfolio::Single(vec![fund("a", 0.3)]);
        let metrics = portfolio_metrics(&no_proxy, "x", ReturnProxy::Unavailable, &config).unwrap();
        assert_eq!(metrics.risk, RiskLevel::Unknown);
    }

    #[test]
    fn test_five_day_proxy() {
        let record = QuoteRecord::new("a", "a")
            .with(Column::YtdPct, 0.9)
            .with(Column::Change5dPct, 0.01);
        let portfolio = Portfolio::Single(vec![record]);
        let metrics =
            portfolio_metrics(&portfolio, "x", ReturnProxy::FiveDay, &PortfolioConfig::default())
                .unwrap();
        assert_relative_eq!(metrics.expected_return, 0.01);
        assert_eq!(metrics.risk, RiskLevel::Low);
    }

    #[test]
    fn test_proxy_for_dataset() {
        let full = Dataset::new(vec![]);
        assert_eq!(ReturnProxy::for_dataset(&full), ReturnProxy::YearToDate);
        let five_day = Dataset::with_columns(vec![], [Column::Change5dPct]);
        assert_eq!(ReturnProxy::for_dataset(&five_day), ReturnProxy::FiveDay);
        let bare = Dataset::with_columns(vec![], [Column::Code]);
        assert_eq!(ReturnProxy::for_dataset(&bare), ReturnProxy::Unavailable);
    }

    #[test]
    fn test_degraded() {
        let metrics = PortfolioMetrics::degraded(4);
        assert_eq!(metrics.risk, RiskLevel::Unknown);
        assert_eq!(metrics.weights, vec![0.25; 4]);
        assert!(PortfolioMetrics::degraded(0).weights.is_empty());
    }
}
