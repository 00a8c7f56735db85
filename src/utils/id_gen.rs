//! ID generation utilities

use chrono::Utc;

/// Current epoch-millisecond candidate for a record id
pub fn epoch_millis_id() -> i64 {
    Utc::now().timestamp_millis()
}

/// Mint a record id from a time-derived candidate, bumped past `floor`
/// (the last minted or highest stored id) so ids stay strictly
/// monotonic even when two records are created within one millisecond.
pub fn mint_after(candidate: i64, floor: Option<i64>) -> i64 {
    match floor {
        Some(last) if candidate <= last => last + 1,
        _ => candidate,
    }
}

/// Generate a store ID (32 characters, UUID-derived)
pub fn generate_store_id() -> String {
    uuid::Uuid::new_v4().to_string().replace("-", "")
}
