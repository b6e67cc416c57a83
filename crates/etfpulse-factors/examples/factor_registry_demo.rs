//! Demonstration of the scoring factor registry
//!
//! Run with: cargo run --example factor_registry_demo -p etfpulse-factors

use etfpulse_factors::{FactorCategory, FactorWeights, available_factors, factors_by_category};

fn main() {
    println!("ETF Pulse Scoring Factors");
    println!("=========================\n");

    let weights = FactorWeights::default();
    println!("Total factors available: {}\n", available_factors().len());

    for category in FactorCategory::ALL {
        println!(
            "  {:12} {:2} factors",
            category.to_string(),
            factors_by_category(category).len()
        );
    }
    println!();

    for category in FactorCategory::ALL {
        println!("{category}:");
        for factor in factors_by_category(category) {
            let weight = weights.get(factor.column).unwrap_or(0.0);
            println!(
                "  {:18} weight {:.2}  {}",
                factor.name, weight, factor.description
            );
        }
    }
}
