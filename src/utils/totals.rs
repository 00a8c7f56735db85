//! Total computation and formatting helpers
//!
//! The stored `total` on a record is a snapshot taken at save time; the
//! store never recomputes it on read. These helpers exist for the UI to
//! recompute before an explicit re-save.

use crate::database::models::LineItem;

/// Sum of line totals across items.
///
/// Rows that are transiently invalid while being edited (qty <= 0,
/// negative price, non-finite values) contribute nothing.
pub fn compute_total(items: &[LineItem]) -> f64 {
    items
        .iter()
        .filter(|i| i.qty.is_finite() && i.qty > 0.0 && i.price.is_finite() && i.price >= 0.0)
        .map(|i| i.line_total())
        .sum()
}

/// Format an amount as the stored total snapshot, e.g. "USD 100.00"
pub fn format_total(currency: &str, amount: f64) -> String {
    format!("{} {:.2}", currency, amount)
}
