//! Complete portfolio suggestions for one snapshot.

use crate::config::PortfolioConfig;
use crate::metrics::{PortfolioMetrics, ReturnProxy, portfolio_metrics};
use crate::portfolio::Portfolio;
use crate::select::{category_portfolio, diversified_portfolio, strategy_portfolio};
use crate::strategy::Strategy;
use etfpulse_data::{Dataset, QuoteRecord};
use serde::Serialize;
use tracing::warn;

/// Name under which the diversified portfolio's weights are configured.
pub const DIVERSIFIED: &str = "diversified";

/// Top funds of one sector.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryPick {
    /// Sector label
    pub category: String,
    /// Selected funds, best first
    pub holdings: Vec<QuoteRecord>,
}

/// A strategy portfolio and its metrics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrategyPick {
    /// Strategy used
    pub strategy: Strategy,
    /// Selected funds, best first
    pub holdings: Vec<QuoteRecord>,
    /// Indicative metrics
    pub metrics: PortfolioMetrics,
}

/// Every suggestion for a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortfolioAdvice {
    /// Per-sector picks, in configured order
    pub categories: Vec<CategoryPick>,
    /// Per-strategy picks, in [`Strategy::ALL`] order
    pub strategies: Vec<StrategyPick>,
    /// The diversified bundle
    pub diversified: Portfolio,
    /// Metrics of the diversified bundle
    pub diversified_metrics: PortfolioMetrics,
}

/// Builds portfolio advice from a scored dataset.
#[derive(Debug, Clone, Default)]
pub struct PortfolioBuilder {
    config: PortfolioConfig,
}

impl PortfolioBuilder {
    /// Create a builder.
    pub const fn new(config: PortfolioConfig) -> Self {
        Self { config }
    }

    /// The configuration in use.
    pub const fn config(&self) -> &PortfolioConfig {
        &self.config
    }

    /// Build every portfolio. A failing portfolio is logged and replaced by an
    /// empty one with degraded metrics; it never prevents the others.
    pub fn advise(&self, dataset: &Dataset) -> PortfolioAdvice {
        let proxy = ReturnProxy::for_dataset(dataset);

        let categories = self
            .config
            .categories
            .iter()
            .map(|category| CategoryPick {
                category: category.name.clone(),
                holdings: category_portfolio(dataset, category, self.config.category_top_n)
                    .unwrap_or_else(|e| {
                        warn!(category = %category.name, error = %e, "Sector portfolio failed");
                        Vec::new()
                    }),
            })
            .collect();

        let strategies = Strategy::ALL
            .into_iter()
            .map(|strategy| {
                let holdings = strategy_portfolio(dataset, strategy, self.config.strategy_top_n)
                    .unwrap_or_else(|e| {
                        warn!(strategy = %strategy, error = %e, "Strategy portfolio failed");
                        Vec::new()
                    });
                let metrics =
                    self.metrics(&Portfolio::Single(holdings.clone()), strategy.key(), proxy);
                StrategyPick {
                    strategy,
                    holdings,
                    metrics,
                }
            })
            .collect();

        let diversified = diversified_portfolio(
            dataset,
            &self.config.categories,
            self.config.category_top_n,
        )
        .unwrap_or_else(|e| {
            warn!(error = %e, "Diversified portfolio failed");
            Portfolio::Grouped(Vec::new())
        });
        let diversified_metrics = self.metrics(&diversified, DIVERSIFIED, proxy);

        PortfolioAdvice {
            categories,
            strategies,
            diversified,
            diversified_metrics,
        }
    }

    fn metrics(&self, portfolio: &Portfolio, name: &str, proxy: ReturnProxy) -> PortfolioMetrics {
        portfolio_metrics(portfolio, name, proxy, &self.config).unwrap_or_else(|e| {
            warn!(portfolio = name, error = %e, "Portfolio metrics failed, using defaults");
            PortfolioMetrics::degraded(portfolio.group_count())
        })
    }
}
