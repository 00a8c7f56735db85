//! Business logic layer for the invoice store
//!
//! This module provides the high-level InvoiceStore API for records,
//! drafts, usage counters, quota policy and settings.

pub mod draft;
pub mod quota;
pub mod records;
pub mod settings;
pub mod store;
pub mod usage;

pub use quota::{FreeTierLimits, UsageStats};
pub use settings::PremiumStatus;
pub use store::InvoiceStore;
