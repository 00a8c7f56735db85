//! Utility functions

pub mod id_gen;
pub mod totals;

pub use id_gen::{epoch_millis_id, generate_store_id, mint_after};
pub use totals::{compute_total, format_total};
