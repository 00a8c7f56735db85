//! Free-tier quota policy
//!
//! Pure functions over ledger counts. The ledger reports, the caller
//! (premium-gate collaborator) decides; nothing here touches storage.

use serde::{Deserialize, Serialize};

/// Configured free-tier limits.
///
/// `Default` is the reference policy: 10 invoices per month, 5 PDF
/// exports per day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreeTierLimits {
    /// Maximum invoice saves per calendar month
    pub invoices_per_month: u32,
    /// Maximum PDF exports per day
    pub pdfs_per_day: u32,
}

impl Default for FreeTierLimits {
    fn default() -> Self {
        Self {
            invoices_per_month: 10,
            pdfs_per_day: 5,
        }
    }
}

impl FreeTierLimits {
    /// Whether the monthly invoice quota is reached
    pub fn invoice_limit_reached(&self, invoices_this_month: u32) -> bool {
        invoices_this_month >= self.invoices_per_month
    }

    /// Whether the daily PDF quota is reached
    pub fn pdf_limit_reached(&self, pdfs_today: u32) -> bool {
        pdfs_today >= self.pdfs_per_day
    }

    /// Invoice saves left this month
    pub fn remaining_invoices(&self, invoices_this_month: u32) -> u32 {
        self.invoices_per_month.saturating_sub(invoices_this_month)
    }

    /// PDF exports left today
    pub fn remaining_pdfs(&self, pdfs_today: u32) -> u32 {
        self.pdfs_per_day.saturating_sub(pdfs_today)
    }
}

/// Current-period usage alongside the configured limits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageStats {
    /// Invoice saves recorded this calendar month
    pub invoices_this_month: u32,
    /// PDF exports recorded today
    pub pdfs_today: u32,
    /// Monthly invoice limit in effect
    pub invoice_limit: u32,
    /// Daily PDF limit in effect
    pub pdf_limit: u32,
}
