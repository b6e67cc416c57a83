//! Number formatting for reports.

use etfpulse_data::{Column, QuoteRecord};
use etfpulse_screen::ViewField;

/// Placeholder for values that cannot be shown.
pub const NOT_AVAILABLE: &str = "N/A";

/// Currency values are shown in units of one hundred million.
pub const CURRENCY_UNIT: f64 = 100_000_000.0;

/// Format a fraction as a percentage with two decimals, e.g. `12.34%`.
///
/// ```
/// use etfpulse_output::format::format_percentage;
///
/// assert_eq!(format_percentage(0.1234), "12.34%");
/// assert_eq!(format_percentage(f64::NAN), "N/A");
/// ```
pub fn format_percentage(value: f64) -> String {
    if value.is_finite() {
        format!("{:.2}%", value * 100.0)
    } else {
        NOT_AVAILABLE.to_string()
    }
}

/// Format an amount in units of one hundred million with two decimals.
pub fn format_currency(value: f64) -> String {
    if value.is_finite() {
        format!("{:.2}", value / CURRENCY_UNIT)
    } else {
        NOT_AVAILABLE.to_string()
    }
}

/// Format a plain number with a fixed number of decimals.
pub fn format_value(value: f64, decimals: usize) -> String {
    if value.is_finite() {
        format!("{value:.decimals$}")
    } else {
        NOT_AVAILABLE.to_string()
    }
}

/// Format a numeric column the way reports show it.
pub fn format_column(column: Column, value: f64) -> String {
    match column {
        Column::TradedValue | Column::SizeChange | Column::EstimatedSize => format_currency(value),
        Column::PeRatio | Column::PbRatio => format_value(value, 2),
        c if c.is_percentage() => format_percentage(value),
        _ => format_value(value, 3),
    }
}

/// Format one field of a record for display.
pub fn format_field(field: ViewField, record: &QuoteRecord) -> String {
    match field {
        ViewField::Column(column) => match record.text(column) {
            Some(text) => text.to_string(),
            None => record
                .value(column)
                .map_or_else(|| NOT_AVAILABLE.to_string(), |v| format_column(column, v)),
        },
        ViewField::CompositeScore => record
            .signals
            .composite_score
            .map_or_else(|| NOT_AVAILABLE.to_string(), |v| format_value(v, 2)),
    }
}
