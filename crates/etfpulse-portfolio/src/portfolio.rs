//! Portfolio shapes.

use etfpulse_data::QuoteRecord;
use serde::Serialize;

/// The funds selected for one sector of a grouped portfolio.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sleeve {
    /// Sector label
    pub category: String,
    /// Selected funds, best first
    pub holdings: Vec<QuoteRecord>,
    /// Whether the holdings are top-scored funds standing in for a sector
    /// without matches
    pub filler: bool,
}

/// A set of selected funds.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Portfolio {
    /// One ranked group
    Single(Vec<QuoteRecord>),
    /// One group per sector
    Grouped(Vec<Sleeve>),
}

impl Portfolio {
    /// Holdings of each group, in order.
    pub fn groups(&self) -> Vec<&[QuoteRecord]> {
        match self {
            Self::Single(holdings) => vec![holdings.as_slice()],
            Self::Grouped(sleeves) => sleeves.iter().map(|s| s.holdings.as_slice()).collect(),
        }
    }

    /// Number of groups.
    pub fn group_count(&self) -> usize {
        match self {
            Self::Single(_) => 1,
            Self::Grouped(sleeves) => sleeves.len(),
        }
    }

    /// Whether no group holds any fund.
    pub fn is_empty(&self) -> bool {
        self.groups().iter().all(|g| g.is_empty())
    }

    /// Every holding across groups.
    pub fn holdings(&self) -> impl Iterator<Item = &QuoteRecord> + '_ {
        let groups: Vec<&[QuoteRecord]> = self.groups();
        groups.into_iter().flat_map(|g| g.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_groups() {
        let single = Portfolio::Single(vec![QuoteRecord::new("1", "a")]);
        assert_eq!(single.group_count(), 1);
        assert!(!single.is_empty());

        let grouped = Portfolio::Grouped(vec![
            Sleeve {
                category: "x".into(),
                holdings: vec![],
                filler: false,
            },
            Sleeve {
                category: "y".into(),
                holdings: vec![QuoteRecord::new("2", "b"), QuoteRecord::new("3", "c")],
                filler: true,
            },
        ]);
        assert_eq!(grouped.group_count(), 2);
        assert_eq!(grouped.groups()[0].len(), 0);
        assert_eq!(grouped.holdings().count(), 2);

        assert!(Portfolio::Single(vec![]).is_empty());
    }
}
