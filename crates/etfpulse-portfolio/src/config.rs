//! Portfolio configuration.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A sector defined by keywords matched against fund names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryDefinition {
    /// Sector label
    pub name: String,
    /// Substrings that place a fund in the sector (case-sensitive)
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl CategoryDefinition {
    /// Create a definition.
    pub fn new(name: impl Into<String>, keywords: &[&str]) -> Self {
        Self {
            name: name.into(),
            keywords: keywords.iter().map(ToString::to_string).collect(),
        }
    }

    /// Whether a fund name contains any non-empty keyword.
    pub fn matches(&self, fund_name: &str) -> bool {
        self.keywords
            .iter()
            .any(|k| !k.is_empty() && fund_name.contains(k.as_str()))
    }
}

/// Expected-return bounds for the risk levels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskThresholds {
    /// Above this the portfolio is high risk (default: 0.20)
    pub high: f64,
    /// Below this the portfolio is low risk (default: 0.05)
    pub low: f64,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            high: 0.20,
            low: 0.05,
        }
    }
}

/// Configuration for portfolio construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortfolioConfig {
    /// Funds per sector portfolio (default: 2)
    pub category_top_n: usize,
    /// Funds per strategy portfolio (default: 5)
    pub strategy_top_n: usize,
    /// Sector definitions, in report order
    pub categories: Vec<CategoryDefinition>,
    /// Group weights per portfolio name
    pub strategy_weights: BTreeMap<String, Vec<f64>>,
    /// Risk level bounds
    pub risk: RiskThresholds,
}

impl Default for PortfolioConfig {
    fn default() -> Self {
        Self {
            category_top_n: 2,
            strategy_top_n: 5,
            categories: default_categories(),
            strategy_weights: BTreeMap::from([(
                "diversified".to_string(),
                vec![0.25, 0.20, 0.20, 0.15, 0.10, 0.10],
            )]),
            risk: RiskThresholds::default(),
        }
    }
}

impl PortfolioConfig {
    /// Look up a sector definition by name.
    pub fn category(&self, name: &str) -> Option<&CategoryDefinition> {
        self.categories.iter().find(|c| c.name == name)
    }

    /// Configured weights for a portfolio name.
    pub fn weights_for(&self, name: &str) -> Option<&[f64]> {
        self.strategy_weights.get(name).map(Vec::as_slice)
    }
}

fn default_categories() -> Vec<CategoryDefinition> {
    vec![
        CategoryDefinition::new(
            "科技类",
            &["科技", "芯片", "半导体", "人工智能", "计算机", "软件", "5G", "通信"],
        ),
        CategoryDefinition::new("金融类", &["金融", "银行", "证券", "券商", "保险"]),
        CategoryDefinition::new("消费类", &["消费", "食品", "饮料", "酒", "家电", "旅游"]),
        CategoryDefinition::new("医药类", &["医药", "医疗", "生物", "创新药", "疫苗", "健康"]),
        CategoryDefinition::new("大宗商品", &["黄金", "有色", "商品", "原油", "能源", "煤炭"]),
        CategoryDefinition::new("其他", &["红利", "债", "REIT", "货币"]),
    ]
}
