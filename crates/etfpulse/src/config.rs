//! Configuration file.
//!
//! Every section is optional; absent sections and keys take their defaults.
//!
//! ```toml
//! [scoring]
//! change_pct = 0.15
//! change_5d_pct = 0.20
//!
//! [screen]
//! top_n = 10
//! discount_threshold = -0.005
//!
//! [screen.reversal]
//! five_day_drop = -0.02
//!
//! [[portfolio.categories]]
//! name = "科技类"
//! keywords = ["科技", "芯片"]
//!
//! [portfolio.strategy_weights]
//! diversified = [0.6, 0.4]
//!
//! [report]
//! title = "ETF Daily Market Report"
//! format = "html"
//! ```
//!
//! A `[scoring]` table replaces the default weights as a whole.

use etfpulse_factors::FactorWeights;
use etfpulse_output::{ChartConfig, ReportFormat, report::DEFAULT_TITLE};
use etfpulse_portfolio::PortfolioConfig;
use etfpulse_screen::ScreenConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file exists but could not be read.
    #[error("Failed to read config {path}: {source}")]
    Io {
        /// Config file path
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid configuration.
    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Report settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Report title
    pub title: String,
    /// Default output format
    pub format: ReportFormat,
    /// Annual risk-free rate (reserved; no report figure uses it yet)
    pub risk_free_rate: f64,
    /// Chart dimensions
    pub charts: ChartConfig,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            format: ReportFormat::Markdown,
            risk_free_rate: 0.02,
            charts: ChartConfig::default(),
        }
    }
}

/// Complete pipeline configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EtfPulseConfig {
    /// Composite score weights
    pub scoring: FactorWeights,
    /// Ranking view thresholds
    pub screen: ScreenConfig,
    /// Portfolio construction
    pub portfolio: PortfolioConfig,
    /// Report output
    pub report: ReportConfig,
}

impl EtfPulseConfig {
    /// Parse configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Load configuration from a TOML file. A missing file yields defaults.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            info!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        info!(path = %path.display(), "Loaded config");
        Ok(config)
    }
}
