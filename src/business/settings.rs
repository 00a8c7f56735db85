//! App settings operations
//!
//! Small key-value settings persisted next to the invoice data:
//! default currency, remembered business name, premium status.

use chrono::{DateTime, Utc};

use super::store::InvoiceStore;
use crate::DEFAULT_CURRENCY;
use crate::database::queries;
use crate::error::Result;

/// Settings key for the preferred currency code
pub const SETTING_CURRENCY: &str = "currency";
/// Settings key for the remembered business name
pub const SETTING_BUSINESS_NAME: &str = "business_name";
/// Settings key for the premium flag
pub const SETTING_PREMIUM: &str = "premium_user";
/// Settings key for how premium was purchased
pub const SETTING_PURCHASE_METHOD: &str = "purchase_method";
/// Settings key for when premium was purchased
pub const SETTING_PURCHASE_DATE: &str = "purchase_date";

/// Premium entitlement as stored in settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PremiumStatus {
    /// Whether premium is unlocked
    pub premium: bool,
    /// Purchase channel, e.g. "google_play"
    pub method: Option<String>,
    /// Purchase time
    pub purchased_at: Option<DateTime<Utc>>,
}

impl InvoiceStore {
    /// Get a settings value by key
    pub fn setting(&mut self, key: &str) -> Result<Option<String>> {
        let conn = self.connection()?;
        queries::get_setting(conn, key)
    }

    /// Set a settings value
    pub fn set_setting(&mut self, key: &str, value: &str) -> Result<()> {
        let conn = self.connection()?;
        queries::set_setting(conn, key, value)
    }

    /// Remove a settings value. Idempotent.
    pub fn remove_setting(&mut self, key: &str) -> Result<()> {
        let conn = self.connection()?;
        queries::remove_setting(conn, key)
    }

    /// Preferred currency code, falling back to the configured default
    pub fn default_currency(&mut self) -> Result<String> {
        Ok(self
            .setting(SETTING_CURRENCY)?
            .unwrap_or_else(|| DEFAULT_CURRENCY.to_string()))
    }

    /// Remember the preferred currency code
    pub fn set_default_currency(&mut self, code: &str) -> Result<()> {
        self.set_setting(SETTING_CURRENCY, code)
    }

    /// Remembered business name for form prefill, if any
    pub fn saved_business_name(&mut self) -> Result<Option<String>> {
        self.setting(SETTING_BUSINESS_NAME)
    }

    /// Remember the business name for form prefill
    pub fn set_saved_business_name(&mut self, name: &str) -> Result<()> {
        self.set_setting(SETTING_BUSINESS_NAME, name)
    }

    /// Current premium entitlement
    pub fn premium_status(&mut self) -> Result<PremiumStatus> {
        let premium = self
            .setting(SETTING_PREMIUM)?
            .is_some_and(|v| v == "true");
        let method = self.setting(SETTING_PURCHASE_METHOD)?;
        let purchased_at = self
            .setting(SETTING_PURCHASE_DATE)?
            .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
            .map(|dt| dt.with_timezone(&Utc));

        Ok(PremiumStatus {
            premium,
            method,
            purchased_at,
        })
    }

    /// Mark premium as unlocked via the given purchase channel
    pub fn set_premium(&mut self, method: &str) -> Result<()> {
        self.set_setting(SETTING_PREMIUM, "true")?;
        self.set_setting(SETTING_PURCHASE_METHOD, method)?;
        self.set_setting(SETTING_PURCHASE_DATE, &Utc::now().to_rfc3339())
    }
}
