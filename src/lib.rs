//! # Invoice Core
//!
//! An offline-first persistence core for an invoice creation tool.
//!
//! ## Features
//!
//! - SQLite record store for saved invoices
//! - Single-slot autosave draft with 24-hour expiry
//! - Per-day and per-month usage ledger for free-tier quotas
//! - JSON export and import of the full record set
//! - Versioned offline cache for the application shell
//!
//! ## Example
//!
//! ```no_run
//! use invcore::InvoiceStore;
//! use std::path::Path;
//!
//! let mut store = InvoiceStore::open(Path::new("/path/to/data")).unwrap();
//!
//! let invoices = store.get_invoices().unwrap();
//! for invoice in invoices {
//!     println!("{}: {}", invoice.invoice_number, invoice.total);
//! }
//! ```

pub mod backup;
pub mod billing;
pub mod business;
pub mod database;
pub mod error;
pub mod offline;
pub mod utils;

// Re-export main types
pub use error::{Result, StoreError};
pub use database::models::{
    ActionKind, DraftSnapshot, ExportSnapshot, InvoiceRecord, LineItem, StoreProperties,
};
pub use business::{FreeTierLimits, InvoiceStore, PremiumStatus, UsageStats};
pub use backup::EXPORT_VERSION;
pub use billing::{parse_notice, PurchaseNotice, PREMIUM_PRODUCT_IDS};
pub use offline::ShellCache;

/// Database version constant
pub const DB_VERSION: &str = "1";

/// Database filename
pub const DATABASE_FILENAME: &str = "invoices.db";

/// Currency code used when no preference is saved
pub const DEFAULT_CURRENCY: &str = "ZMW";

/// Hours a draft stays recoverable after its last save
pub const DRAFT_EXPIRY_HOURS: i64 = 24;

/// Seconds between periodic autosave passes
pub const AUTOSAVE_INTERVAL_SECS: u64 = 30;

/// Seconds of idle time before an edit-triggered autosave fires
pub const AUTOSAVE_DEBOUNCE_SECS: u64 = 2;

/// Active shell cache version name
pub const SHELL_CACHE_VERSION: &str = "offline-invoice-cache-v1";
