//! SQL query operations for database access
//!
//! This module provides low-level query functions over raw row data.
//! For business-level operations, use the InvoiceStore API.

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{Connection, params};

use crate::error::Result;

/// Timestamp format used in database
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Date format used for invoice dates and ledger day keys
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Month key format used by the usage ledger
pub const MONTH_FORMAT: &str = "%Y-%m";

/// Format a DateTime for database storage
pub fn format_timestamp(dt: &DateTime<Utc>) -> String {
    dt.format(TIMESTAMP_FORMAT).to_string()
}

/// Parse a timestamp from database
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    chrono::NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT)
        .ok()
        .map(|ndt| DateTime::from_naive_utc_and_offset(ndt, Utc))
}

/// Get current timestamp formatted for database
pub fn now_timestamp() -> String {
    format_timestamp(&Utc::now())
}

/// Ledger month key ("YYYY-MM") for a date
pub fn month_key(date: &NaiveDate) -> String {
    date.format(MONTH_FORMAT).to_string()
}

/// Ledger day key ("YYYY-MM-DD") for a date
pub fn day_key(date: &NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

// ============================================================================
// Invoice queries
// ============================================================================

/// Write or overwrite an invoice row keyed by id
pub fn upsert_invoice(conn: &Connection, raw: &RawInvoice) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO invoices
         (id, invoice_number, business_name, client_name, invoice_date, invoice_time, currency, items, total)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        params![
            raw.id,
            raw.invoice_number,
            raw.business_name,
            raw.client_name,
            raw.invoice_date,
            raw.invoice_time,
            raw.currency,
            raw.items_json,
            raw.total,
        ],
    )?;
    conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE)")?;
    Ok(())
}

/// Get all invoice rows, newest insertion first.
///
/// Ids are minted monotonically at creation time, so descending id order
/// is insertion order regardless of later date edits.
pub fn get_all_invoices_raw(conn: &Connection) -> Result<Vec<RawInvoice>> {
    let mut stmt = conn.prepare(
        "SELECT id, invoice_number, business_name, client_name, invoice_date, invoice_time, currency, items, total
         FROM invoices ORDER BY id DESC",
    )?;

    let rows = stmt.query_map([], |row| {
        Ok(RawInvoice {
            id: row.get(0)?,
            invoice_number: row.get(1)?,
            business_name: row.get(2)?,
            client_name: row.get(3)?,
            invoice_date: row.get(4)?,
            invoice_time: row.get(5)?,
            currency: row.get(6)?,
            items_json: row.get(7)?,
            total: row.get(8)?,
        })
    })?;

    rows.collect::<std::result::Result<Vec<_>, _>>()
        .map_err(Into::into)
}

/// Get a single invoice row by id, `None` when absent
pub fn get_invoice_raw(conn: &Connection, id: i64) -> Result<Option<RawInvoice>> {
    let result = conn.query_row(
        "SELECT id, invoice_number, business_name, client_name, invoice_date, invoice_time, currency, items, total
         FROM invoices WHERE id = ?",
        params![id],
        |row| {
            Ok(RawInvoice {
                id: row.get(0)?,
                invoice_number: row.get(1)?,
                business_name: row.get(2)?,
                client_name: row.get(3)?,
                invoice_date: row.get(4)?,
                invoice_time: row.get(5)?,
                currency: row.get(6)?,
                items_json: row.get(7)?,
                total: row.get(8)?,
            })
        },
    );
    Ok(result.ok())
}

/// Delete an invoice row. Returns the number of rows removed (0 or 1).
pub fn delete_invoice(conn: &Connection, id: i64) -> Result<usize> {
    let rows = conn.execute("DELETE FROM invoices WHERE id = ?", params![id])?;
    conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE)")?;
    Ok(rows)
}

/// Count stored invoice rows
pub fn count_invoices(conn: &Connection) -> Result<u64> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM invoices", [], |row| row.get(0))?;
    Ok(count as u64)
}

/// Highest stored invoice id, `None` on an empty store
pub fn max_invoice_id(conn: &Connection) -> Result<Option<i64>> {
    let max: Option<i64> =
        conn.query_row("SELECT MAX(id) FROM invoices", [], |row| row.get(0))?;
    Ok(max)
}

// ============================================================================
// Draft slot queries
// ============================================================================

/// Overwrite the single draft slot (last write wins, no merge)
pub fn put_draft(conn: &Connection, payload_json: &str, saved_at: &str) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO draft (slot, payload, saved_at) VALUES (0, ?, ?)",
        params![payload_json, saved_at],
    )?;
    conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE)")?;
    Ok(())
}

/// Read the draft slot without consuming it: (payload, saved_at)
pub fn get_draft(conn: &Connection) -> Result<Option<(String, String)>> {
    let result = conn.query_row(
        "SELECT payload, saved_at FROM draft WHERE slot = 0",
        [],
        |row| Ok((row.get(0)?, row.get(1)?)),
    );
    Ok(result.ok())
}

/// Remove the draft slot; removing an empty slot is not an error
pub fn delete_draft(conn: &Connection) -> Result<()> {
    conn.execute("DELETE FROM draft WHERE slot = 0", [])?;
    conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE)")?;
    Ok(())
}

// ============================================================================
// Usage ledger queries
// ============================================================================

/// Increment the counter for (month, day, action) by one
pub fn increment_action(conn: &Connection, month: &str, day: &str, action: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO usage_counts (month, day, action, count) VALUES (?, ?, ?, 1)
         ON CONFLICT (month, day, action) DO UPDATE SET count = count + 1",
        params![month, day, action],
    )?;
    conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE)")?;
    Ok(())
}

/// Sum of an action's counts across all days of a month
pub fn month_total(conn: &Connection, month: &str, action: &str) -> Result<u32> {
    let total: i64 = conn.query_row(
        "SELECT COALESCE(SUM(count), 0) FROM usage_counts WHERE month = ? AND action = ?",
        params![month, action],
        |row| row.get(0),
    )?;
    Ok(total as u32)
}

/// An action's count for a single day
pub fn day_total(conn: &Connection, month: &str, day: &str, action: &str) -> Result<u32> {
    let total: i64 = conn.query_row(
        "SELECT COALESCE(SUM(count), 0) FROM usage_counts WHERE month = ? AND day = ? AND action = ?",
        params![month, day, action],
        |row| row.get(0),
    )?;
    Ok(total as u32)
}

// ============================================================================
// Properties queries
// ============================================================================

/// Get the properties row, `None` on a fresh database
pub fn get_properties(conn: &Connection) -> Result<Option<RawProperties>> {
    let result = conn.query_row(
        "SELECT store_id, version, created_timestamp, update_timestamp FROM properties LIMIT 1",
        [],
        |row| {
            Ok(RawProperties {
                store_id: row.get(0)?,
                version: row.get(1)?,
                created_timestamp: row.get(2)?,
                update_timestamp: row.get(3)?,
            })
        },
    );
    Ok(result.ok())
}

/// Set properties (insert the single row)
pub fn set_properties(conn: &Connection, store_id: &str, version: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO properties (store_id, version, created_timestamp, update_timestamp)
         VALUES (?, ?, ?, ?)",
        params![store_id, version, now_timestamp(), now_timestamp()],
    )?;
    conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE)")?;
    Ok(())
}

/// Bump the properties update timestamp
pub fn touch_update_timestamp(conn: &Connection) -> Result<()> {
    conn.execute(
        "UPDATE properties SET update_timestamp = ?",
        params![now_timestamp()],
    )?;
    Ok(())
}

// ============================================================================
// Settings queries
// ============================================================================

/// Get a settings value by key
pub fn get_setting(conn: &Connection, key: &str) -> Result<Option<String>> {
    let result = conn.query_row(
        "SELECT value FROM settings WHERE key = ?",
        params![key],
        |row| row.get(0),
    );
    Ok(result.ok())
}

/// Set a settings value (insert or overwrite)
pub fn set_setting(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO settings (key, value) VALUES (?, ?)",
        params![key, value],
    )?;
    conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE)")?;
    Ok(())
}

/// Remove a settings value; removing a missing key is not an error
pub fn remove_setting(conn: &Connection, key: &str) -> Result<()> {
    conn.execute("DELETE FROM settings WHERE key = ?", params![key])?;
    conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE)")?;
    Ok(())
}

/// Wipe all user data: invoices, draft, usage counters and settings.
/// The properties row (store identity) is kept.
pub fn clear_all_data(conn: &Connection) -> Result<()> {
    conn.execute("DELETE FROM invoices", [])?;
    conn.execute("DELETE FROM draft", [])?;
    conn.execute("DELETE FROM usage_counts", [])?;
    conn.execute("DELETE FROM settings", [])?;
    conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE)")?;
    Ok(())
}

// ============================================================================
// Raw data structures (database rows before model conversion)
// ============================================================================

/// Raw invoice row as stored
#[derive(Debug, Clone)]
pub struct RawInvoice {
    /// Time-derived primary key
    pub id: i64,
    /// Human-readable sequence string
    pub invoice_number: String,
    /// Issuing business name
    pub business_name: String,
    /// Client name
    pub client_name: Option<String>,
    /// Invoice date ("YYYY-MM-DD")
    pub invoice_date: String,
    /// Optional time of day ("HH:MM")
    pub invoice_time: Option<String>,
    /// Currency code
    pub currency: String,
    /// Line items as a JSON array
    pub items_json: String,
    /// Formatted total snapshot
    pub total: String,
}

/// Raw properties row
#[derive(Debug, Clone)]
pub struct RawProperties {
    /// Unique store identifier
    pub store_id: String,
    /// Schema version
    pub version: String,
    /// Creation timestamp
    pub created_timestamp: Option<String>,
    /// Last update timestamp
    pub update_timestamp: Option<String>,
}
