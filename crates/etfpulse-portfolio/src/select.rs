//! Selecting funds into portfolios.

use crate::config::CategoryDefinition;
use crate::error::{PortfolioError, Result};
use crate::portfolio::{Portfolio, Sleeve};
use crate::strategy::Strategy;
use etfpulse_data::{Column, Dataset, QuoteRecord};
use etfpulse_factors::MomentumFactor;
use std::borrow::Cow;
use tracing::debug;

/// Weight of the P/E ratio in the value score.
pub const VALUE_PE_WEIGHT: f64 = 0.6;

/// Weight of the P/B ratio in the value score.
pub const VALUE_PB_WEIGHT: f64 = 0.4;

/// The `n` records with the largest key, ties in row order.
fn top_by<'a>(
    records: impl Iterator<Item = &'a QuoteRecord>,
    n: usize,
    key: impl Fn(&QuoteRecord) -> f64,
) -> Vec<QuoteRecord> {
    let mut ranked: Vec<&QuoteRecord> = records.collect();
    ranked.sort_by(|a, b| key(*b).total_cmp(&key(*a)));
    ranked.into_iter().take(n).cloned().collect()
}

/// The `n` records with the smallest key, ties in row order.
fn bottom_by<'a>(
    records: impl Iterator<Item = &'a QuoteRecord>,
    n: usize,
    key: impl Fn(&QuoteRecord) -> f64,
) -> Vec<QuoteRecord> {
    let mut ranked: Vec<&QuoteRecord> = records.collect();
    ranked.sort_by(|a, b| key(*a).total_cmp(&key(*b)));
    ranked.into_iter().take(n).cloned().collect()
}

fn require_scores(dataset: &Dataset) -> Result<()> {
    if dataset.is_scored() {
        Ok(())
    } else {
        Err(PortfolioError::NotScored)
    }
}

fn require(dataset: &Dataset, column: Column) -> Result<()> {
    if dataset.has(column) {
        Ok(())
    } else {
        Err(PortfolioError::MissingColumn(column))
    }
}

/// Blended valuation score, `None` unless both ratios are positive.
pub fn value_score(record: &QuoteRecord) -> Option<f64> {
    match (record.pe_ratio, record.pb_ratio) {
        (Some(pe), Some(pb)) if pe > 0.0 && pb > 0.0 => {
            Some(VALUE_PE_WEIGHT * pe + VALUE_PB_WEIGHT * pb)
        }
        _ => None,
    }
}

/// The top `n` funds of a sector by composite score.
///
/// A sector without keywords or without any matching fund is empty.
pub fn category_portfolio(
    dataset: &Dataset,
    category: &CategoryDefinition,
    n: usize,
) -> Result<Vec<QuoteRecord>> {
    require_scores(dataset)?;
    let matches = dataset
        .records()
        .iter()
        .filter(|r| category.matches(&r.name));
    let holdings = top_by(matches, n, QuoteRecord::score_or_min);
    debug!(category = %category.name, holdings = holdings.len(), "Built sector portfolio");
    Ok(holdings)
}

/// The top `n` funds under a strategy.
pub fn strategy_portfolio(
    dataset: &Dataset,
    strategy: Strategy,
    n: usize,
) -> Result<Vec<QuoteRecord>> {
    let records = dataset.records().iter();
    let holdings = match strategy {
        Strategy::Growth => {
            require(dataset, Column::YtdPct)?;
            top_by(records, n, |r| r.ytd_pct)
        }
        Strategy::Value if dataset.has(Column::PeRatio) && dataset.has(Column::PbRatio) => {
            let priced = records.filter(|r| value_score(r).is_some());
            bottom_by(priced, n, |r| value_score(r).unwrap_or(f64::INFINITY))
        }
        Strategy::Value | Strategy::Balanced => {
            require_scores(dataset)?;
            top_by(records, n, QuoteRecord::score_or_min)
        }
        Strategy::Momentum => {
            let with_momentum = if dataset
                .records()
                .iter()
                .all(|r| r.signals.momentum_score.is_some())
            {
                Cow::Borrowed(dataset)
            } else {
                Cow::Owned(MomentumFactor.fill(dataset)?)
            };
            top_by(with_momentum.records().iter(), n, |r| {
                r.signals.momentum_score.unwrap_or(f64::NEG_INFINITY)
            })
        }
    };
    debug!(strategy = %strategy, holdings = holdings.len(), "Built strategy portfolio");
    Ok(holdings)
}

/// One sleeve per sector. A sector without matches is filled with the top
/// `n` funds of the whole dataset.
pub fn diversified_portfolio(
    dataset: &Dataset,
    categories: &[CategoryDefinition],
    n: usize,
) -> Result<Portfolio> {
    require_scores(dataset)?;
    let mut sleeves = Vec::with_capacity(categories.len());
    for category in categories {
        let holdings = category_portfolio(dataset, category, n)?;
        let sleeve = if holdings.is_empty() {
            Sleeve {
                category: category.name.clone(),
                holdings: top_by(dataset.records().iter(), n, QuoteRecord::score_or_min),
                filler: true,
            }
        } else {
            Sleeve {
                category: category.name.clone(),
                holdings,
                filler: false,
            }
        };
        sleeves.push(sleeve);
    }
    Ok(Portfolio::Grouped(sleeves))
}
