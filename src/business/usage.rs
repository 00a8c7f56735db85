//! Usage Ledger operations
//!
//! Per-day, per-month counters for rate-limited actions. The ledger
//! only reports counts; the caller decides whether to block (see
//! [`FreeTierLimits`](super::quota::FreeTierLimits)). Quota
//! enforcement here is a soft business rule, not a security boundary:
//! it runs entirely client-side and is trivially bypassable. Callers
//! are expected to fail open when `record_action` errors - the action
//! proceeds, the failure is just observable.

use chrono::Utc;

use super::quota::{FreeTierLimits, UsageStats};
use super::store::InvoiceStore;
use crate::database::models::ActionKind;
use crate::database::queries::{self, day_key, month_key};
use crate::error::Result;

impl InvoiceStore {
    /// Increment today's (and this month's) counter for the action.
    ///
    /// Call after a successful save/export, not before, so failed
    /// attempts are not counted. The ledger never blocks: incrementing
    /// past a quota still counts.
    pub fn record_action(&mut self, kind: ActionKind) -> Result<()> {
        let today = Utc::now().date_naive();
        let month = month_key(&today);
        let day = day_key(&today);

        let conn = self.connection()?;
        queries::increment_action(conn, &month, &day, kind.as_str())
    }

    /// Sum of the action's counts across all days of the current month
    pub fn monthly_count(&mut self, kind: ActionKind) -> Result<u32> {
        let month = month_key(&Utc::now().date_naive());
        let conn = self.connection()?;
        queries::month_total(conn, &month, kind.as_str())
    }

    /// The action's count for today only
    pub fn daily_count(&mut self, kind: ActionKind) -> Result<u32> {
        let today = Utc::now().date_naive();
        let month = month_key(&today);
        let day = day_key(&today);
        let conn = self.connection()?;
        queries::day_total(conn, &month, &day, kind.as_str())
    }

    /// Current-period counts paired with the configured limits, for
    /// the usage display and the premium-gate collaborator
    pub fn usage_stats(&mut self, limits: &FreeTierLimits) -> Result<UsageStats> {
        Ok(UsageStats {
            invoices_this_month: self.monthly_count(ActionKind::InvoiceSaved)?,
            pdfs_today: self.daily_count(ActionKind::PdfGenerated)?,
            invoice_limit: limits.invoices_per_month,
            pdf_limit: limits.pdfs_per_day,
        })
    }
}
