//! Database layer for the invoice store
//!
//! Handles SQLite database operations including:
//! - Schema creation (invoices, draft slot, usage ledger, properties, settings)
//! - Low-level CRUD queries over raw rows
//! - Connection lifecycle and WAL checkpointing

pub mod connection;
pub mod models;
pub mod queries;
pub mod schema;

pub use connection::Database;
pub use models::*;
