//! Data models for invoice store entities

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// A persisted billing document with line items and a total
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceRecord {
    /// Unique time-derived identifier (epoch milliseconds), immutable once created
    pub id: i64,
    /// Human-readable sequence string, e.g. "INV-202401-001"
    #[serde(rename = "invoiceNumber")]
    pub invoice_number: String,
    /// Issuing business name, required non-empty
    #[serde(rename = "businessName")]
    pub business_name: String,
    /// Client name, free text
    #[serde(rename = "clientName")]
    pub client_name: String,
    /// Invoice date
    pub date: NaiveDate,
    /// Optional time of day
    pub time: Option<NaiveTime>,
    /// Short currency code, e.g. "ZMW" or "USD"
    pub currency: String,
    /// Ordered line items; order is significant for display and totals
    pub items: Vec<LineItem>,
    /// Formatted total ("USD 100.00"), snapshotted at save time.
    /// Authoritative as stored - never recomputed from items on read.
    pub total: String,
}

impl InvoiceRecord {
    /// Check the required-field invariants the store enforces before any write
    pub fn validate(&self) -> crate::error::Result<()> {
        use crate::error::StoreError;

        if self.business_name.trim().is_empty() {
            return Err(StoreError::InvalidInput(
                "business name must not be empty".to_string(),
            ));
        }
        if self.items.is_empty() {
            return Err(StoreError::InvalidInput(
                "invoice must have at least one line item".to_string(),
            ));
        }
        for (i, item) in self.items.iter().enumerate() {
            if !item.qty.is_finite() || item.qty <= 0.0 {
                return Err(StoreError::InvalidInput(format!(
                    "line item {} has non-positive quantity",
                    i
                )));
            }
            if !item.price.is_finite() || item.price < 0.0 {
                return Err(StoreError::InvalidInput(format!(
                    "line item {} has negative price",
                    i
                )));
            }
        }
        Ok(())
    }
}

/// A single invoice line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Item label
    pub name: String,
    /// Quantity, must be > 0 for a valid saved invoice
    pub qty: f64,
    /// Unit price, must be >= 0 for a valid saved invoice
    pub price: f64,
}

impl LineItem {
    /// Derived line total (qty x price), not stored
    pub fn line_total(&self) -> f64 {
        self.qty * self.price
    }
}

/// Ephemeral single-slot snapshot of in-progress form state.
///
/// Structurally an [`InvoiceRecord`] minus `id`/`invoice_number`
/// finalization, plus the timestamp used for staleness checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftSnapshot {
    /// Creation/update time of the draft
    #[serde(rename = "savedAt")]
    pub saved_at: DateTime<Utc>,
    #[serde(rename = "businessName", default)]
    pub business_name: String,
    #[serde(rename = "clientName", default)]
    pub client_name: String,
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
    pub currency: Option<String>,
    #[serde(default)]
    pub items: Vec<LineItem>,
    pub total: Option<String>,
}

impl DraftSnapshot {
    /// True when the snapshot carries no items and no user edits.
    /// Empty drafts are never written to the slot.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
            && self.business_name.trim().is_empty()
            && self.client_name.trim().is_empty()
    }

    /// Build a draft from an existing record, for "duplicate into form".
    ///
    /// Drops `id`/`invoice_number` and the original date/time so the UI
    /// can apply fresh defaults before saving as a new invoice.
    pub fn from_record(record: &InvoiceRecord) -> Self {
        Self {
            saved_at: Utc::now(),
            business_name: record.business_name.clone(),
            client_name: record.client_name.clone(),
            date: None,
            time: None,
            currency: Some(record.currency.clone()),
            items: record.items.clone(),
            total: Some(record.total.clone()),
        }
    }
}

/// Rate-limited action kinds tracked by the usage ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    /// An invoice was saved
    InvoiceSaved,
    /// A PDF was generated/exported
    PdfGenerated,
}

impl ActionKind {
    /// Stable string code used as the ledger key
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::InvoiceSaved => "invoice_saved",
            ActionKind::PdfGenerated => "pdf_generated",
        }
    }
}

impl std::str::FromStr for ActionKind {
    type Err = crate::error::StoreError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "invoice_saved" => Ok(ActionKind::InvoiceSaved),
            "pdf_generated" => Ok(ActionKind::PdfGenerated),
            other => Err(crate::error::StoreError::InvalidInput(format!(
                "unknown action kind: {other}"
            ))),
        }
    }
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Portable backup/export artifact consumed by import
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportSnapshot {
    /// Artifact format version
    pub version: u32,
    /// When the export was taken
    pub timestamp: DateTime<Utc>,
    /// Number of records in `invoices`
    pub count: usize,
    /// The exported records
    pub invoices: Vec<InvoiceRecord>,
}

/// Store properties and metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreProperties {
    /// Unique store identifier (32 chars)
    pub store_id: String,
    /// Schema version
    pub version: String,
    /// Creation timestamp
    pub created_timestamp: Option<DateTime<Utc>>,
    /// Last update timestamp
    pub update_timestamp: Option<DateTime<Utc>>,
}
