//! Record Store operations
//!
//! Durable CRUD over invoice records with ordering and bulk operations.

use chrono::{Datelike, NaiveTime, Utc};
use tracing::warn;

use super::store::InvoiceStore;
use crate::database::models::{DraftSnapshot, InvoiceRecord};
use crate::database::queries::{self, RawInvoice};
use crate::error::{Result, StoreError};
use crate::utils::{epoch_millis_id, mint_after};

/// Time-of-day format on invoice rows
const TIME_FORMAT: &str = "%H:%M:%S";

/// Convert a stored row into a record
pub(crate) fn record_from_raw(raw: RawInvoice) -> Result<InvoiceRecord> {
    let date = chrono::NaiveDate::parse_from_str(&raw.invoice_date, queries::DATE_FORMAT)
        .map_err(|e| {
            StoreError::Persistence(format!("corrupt invoice row {}: bad date: {e}", raw.id))
        })?;

    let time = match raw.invoice_time.as_deref() {
        Some(s) => Some(
            // Older rows carry minute granularity
            NaiveTime::parse_from_str(s, TIME_FORMAT)
                .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
                .map_err(|e| {
                    StoreError::Persistence(format!(
                        "corrupt invoice row {}: bad time: {e}",
                        raw.id
                    ))
                })?,
        ),
        None => None,
    };

    let items = serde_json::from_str(&raw.items_json).map_err(|e| {
        StoreError::Persistence(format!("corrupt invoice row {}: bad items: {e}", raw.id))
    })?;

    Ok(InvoiceRecord {
        id: raw.id,
        invoice_number: raw.invoice_number,
        business_name: raw.business_name,
        client_name: raw.client_name.unwrap_or_default(),
        date,
        time,
        currency: raw.currency,
        items,
        total: raw.total,
    })
}

/// Convert a record into its stored row form
pub(crate) fn raw_from_record(record: &InvoiceRecord) -> Result<RawInvoice> {
    Ok(RawInvoice {
        id: record.id,
        invoice_number: record.invoice_number.clone(),
        business_name: record.business_name.clone(),
        client_name: Some(record.client_name.clone()),
        invoice_date: record.date.format(queries::DATE_FORMAT).to_string(),
        invoice_time: record.time.map(|t| t.format(TIME_FORMAT).to_string()),
        currency: record.currency.clone(),
        items_json: serde_json::to_string(&record.items)?,
        total: record.total.clone(),
    })
}

impl InvoiceStore {
    /// Write or overwrite an invoice record keyed by its id.
    ///
    /// The record is guarded against the required-field invariants
    /// before any write is attempted, regardless of what the external
    /// validator already checked. Idempotent: saving an identical
    /// record twice yields the same stored state.
    pub fn save_invoice(&mut self, record: &InvoiceRecord) -> Result<()> {
        record.validate()?;

        let raw = raw_from_record(record)?;
        let conn = self.connection()?;
        queries::upsert_invoice(conn, &raw)?;
        queries::touch_update_timestamp(conn)?;

        // Externally minted ids also move the monotonic floor
        if self.last_minted_id.is_none_or(|last| record.id > last) {
            self.last_minted_id = Some(record.id);
        }
        Ok(())
    }

    /// Get all records, newest insertion first.
    ///
    /// An empty store yields an empty vec, never an error.
    pub fn get_invoices(&mut self) -> Result<Vec<InvoiceRecord>> {
        let conn = self.connection()?;
        let raws = queries::get_all_invoices_raw(conn)?;

        raws.into_iter().map(record_from_raw).collect()
    }

    /// Get a record by id; a missing id is `Ok(None)`, not an error
    pub fn get_invoice(&mut self, id: i64) -> Result<Option<InvoiceRecord>> {
        let conn = self.connection()?;
        match queries::get_invoice_raw(conn, id)? {
            Some(raw) => Ok(Some(record_from_raw(raw)?)),
            None => Ok(None),
        }
    }

    /// Delete a record. Idempotent: deleting a missing id succeeds.
    pub fn delete_invoice(&mut self, id: i64) -> Result<()> {
        let conn = self.connection()?;
        queries::delete_invoice(conn, id)?;
        queries::touch_update_timestamp(conn)?;
        Ok(())
    }

    /// Best-effort bulk delete.
    ///
    /// All removable ids are removed; ids that could not be removed
    /// (missing or failing) are reported in a
    /// [`StoreError::PartialFailure`] rather than silently dropped.
    /// Returns the number of records removed when everything succeeded.
    pub fn delete_invoices(&mut self, ids: &[i64]) -> Result<usize> {
        let mut succeeded = 0usize;
        let mut failed = Vec::new();

        for &id in ids {
            let conn = self.connection()?;
            match queries::delete_invoice(conn, id) {
                Ok(1) => succeeded += 1,
                Ok(_) => {
                    warn!(id, "bulk delete: record not found");
                    failed.push(id);
                }
                Err(e) => {
                    warn!(id, error = %e, "bulk delete: delete failed");
                    failed.push(id);
                }
            }
        }

        if succeeded > 0 {
            let conn = self.connection()?;
            queries::touch_update_timestamp(conn)?;
        }

        if failed.is_empty() {
            Ok(succeeded)
        } else {
            Err(StoreError::PartialFailure { succeeded, failed })
        }
    }

    /// Number of stored records
    pub fn count_invoices(&mut self) -> Result<u64> {
        let conn = self.connection()?;
        queries::count_invoices(conn)
    }

    /// Mint a fresh record id.
    ///
    /// Ids are epoch milliseconds, bumped past the highest stored or
    /// previously minted id so they stay strictly monotonic within
    /// this store.
    pub fn next_record_id(&mut self) -> Result<i64> {
        let last_minted = self.last_minted_id;
        let conn = self.connection()?;
        let max_stored = queries::max_invoice_id(conn)?;

        let floor = match (max_stored, last_minted) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (a, b) => a.or(b),
        };

        let id = mint_after(epoch_millis_id(), floor);
        self.last_minted_id = Some(id);
        Ok(id)
    }

    /// Next human-readable invoice number, "INV-YYYYMM-NNN".
    ///
    /// The sequence counter is the stored record count plus one; it is
    /// unique per local store, not across devices.
    pub fn next_invoice_number(&mut self) -> Result<String> {
        let count = self.count_invoices()?;
        let today = Utc::now().date_naive();
        Ok(format!(
            "INV-{}{:02}-{:03}",
            today.year(),
            today.month(),
            count + 1
        ))
    }

    /// Load an existing record back into form-state shape for
    /// "duplicate and save as new". The copy drops id, invoice number
    /// and date/time so fresh defaults apply before the next save.
    pub fn duplicate_invoice(&mut self, id: i64) -> Result<DraftSnapshot> {
        let record = self.get_invoice(id)?.ok_or(StoreError::NotFound(id))?;
        Ok(DraftSnapshot::from_record(&record))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::super::store::tests::create_test_store;
    use super::*;
    use crate::database::models::LineItem;
    use chrono::NaiveDate;

    pub(crate) fn sample_record(id: i64) -> InvoiceRecord {
        InvoiceRecord {
            id,
            invoice_number: format!("INV-202401-{:03}", id % 1000),
            business_name: "Acme Studio".to_string(),
            client_name: "Client".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            time: NaiveTime::from_hms_opt(9, 30, 0),
            currency: "USD".to_string(),
            items: vec![LineItem {
                name: "Design".to_string(),
                qty: 2.0,
                price: 50.0,
            }],
            total: "USD 100.00".to_string(),
        }
    }

    #[test]
    fn test_save_and_fetch_round_trip() {
        let (mut store, _temp) = create_test_store();

        let record = sample_record(1001);
        store.save_invoice(&record).unwrap();

        let fetched = store.get_invoice(1001).unwrap().unwrap();
        assert_eq!(fetched, record);
    }

    #[test]
    fn test_time_keeps_seconds_through_storage() {
        let (mut store, _temp) = create_test_store();

        let mut record = sample_record(1001);
        record.time = NaiveTime::from_hms_opt(9, 30, 45);
        store.save_invoice(&record).unwrap();

        let fetched = store.get_invoice(1001).unwrap().unwrap();
        assert_eq!(fetched.time, NaiveTime::from_hms_opt(9, 30, 45));
    }

    #[test]
    fn test_minute_granularity_rows_still_readable() {
        let (mut store, _temp) = create_test_store();

        let mut raw = raw_from_record(&sample_record(1)).unwrap();
        raw.invoice_time = Some("09:30".to_string());
        {
            let conn = store.connection().unwrap();
            queries::upsert_invoice(conn, &raw).unwrap();
        }

        let fetched = store.get_invoice(1).unwrap().unwrap();
        assert_eq!(fetched.time, NaiveTime::from_hms_opt(9, 30, 0));
    }

    #[test]
    fn test_upsert_overwrite_semantics() {
        let (mut store, _temp) = create_test_store();

        let mut record = sample_record(1001);
        store.save_invoice(&record).unwrap();

        record.total = "USD 250.00".to_string();
        record.items.push(LineItem {
            name: "Hosting".to_string(),
            qty: 1.0,
            price: 150.0,
        });
        store.save_invoice(&record).unwrap();

        assert_eq!(store.count_invoices().unwrap(), 1);
        let fetched = store.get_invoice(1001).unwrap().unwrap();
        assert_eq!(fetched.total, "USD 250.00");
        assert_eq!(fetched.items.len(), 2);
    }

    #[test]
    fn test_save_rejects_invalid_before_write() {
        let (mut store, _temp) = create_test_store();

        let mut record = sample_record(1);
        record.items.clear();
        assert!(matches!(
            store.save_invoice(&record),
            Err(StoreError::InvalidInput(_))
        ));
        assert_eq!(store.count_invoices().unwrap(), 0);
    }

    #[test]
    fn test_total_is_stored_snapshot_not_derived() {
        let (mut store, _temp) = create_test_store();

        // Total deliberately disagrees with the items; the store keeps
        // it as-is, it is authoritative as stored.
        let mut record = sample_record(1);
        record.total = "USD 999.99".to_string();
        store.save_invoice(&record).unwrap();

        let fetched = store.get_invoice(1).unwrap().unwrap();
        assert_eq!(fetched.total, "USD 999.99");
    }

    #[test]
    fn test_get_invoices_ordering() {
        let (mut store, _temp) = create_test_store();

        assert!(store.get_invoices().unwrap().is_empty());

        store.save_invoice(&sample_record(10)).unwrap();
        store.save_invoice(&sample_record(30)).unwrap();
        store.save_invoice(&sample_record(20)).unwrap();

        let all = store.get_invoices().unwrap();
        let ids: Vec<i64> = all.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![30, 20, 10]);
    }

    #[test]
    fn test_delete_idempotent() {
        let (mut store, _temp) = create_test_store();

        store.save_invoice(&sample_record(1)).unwrap();
        store.delete_invoice(1).unwrap();
        // Second delete of the same id is not an error
        store.delete_invoice(1).unwrap();
        assert!(store.get_invoice(1).unwrap().is_none());
    }

    #[test]
    fn test_bulk_delete_partial_failure() {
        let (mut store, _temp) = create_test_store();

        store.save_invoice(&sample_record(1)).unwrap();
        store.save_invoice(&sample_record(2)).unwrap();

        let err = store.delete_invoices(&[1, 999, 2]).unwrap_err();
        match err {
            StoreError::PartialFailure { succeeded, failed } => {
                assert_eq!(succeeded, 2);
                assert_eq!(failed, vec![999]);
            }
            other => panic!("Expected PartialFailure, got {other:?}"),
        }

        // Valid ids were still removed
        assert_eq!(store.count_invoices().unwrap(), 0);
    }

    #[test]
    fn test_bulk_delete_all_ok() {
        let (mut store, _temp) = create_test_store();

        store.save_invoice(&sample_record(1)).unwrap();
        store.save_invoice(&sample_record(2)).unwrap();
        assert_eq!(store.delete_invoices(&[1, 2]).unwrap(), 2);
        assert_eq!(store.count_invoices().unwrap(), 0);
    }

    #[test]
    fn test_next_record_id_monotonic() {
        let (mut store, _temp) = create_test_store();

        let a = store.next_record_id().unwrap();
        let b = store.next_record_id().unwrap();
        let c = store.next_record_id().unwrap();
        assert!(a < b && b < c);
    }

    #[test]
    fn test_next_record_id_respects_stored_ids() {
        let (mut store, _temp) = create_test_store();

        // A stored record with an id far in the future
        let future_id = epoch_millis_id() + 1_000_000;
        store.save_invoice(&sample_record(future_id)).unwrap();

        let minted = store.next_record_id().unwrap();
        assert!(minted > future_id);
    }

    #[test]
    fn test_next_invoice_number_sequence() {
        let (mut store, _temp) = create_test_store();

        let first = store.next_invoice_number().unwrap();
        assert!(first.starts_with("INV-"));
        assert!(first.ends_with("-001"));

        store.save_invoice(&sample_record(1)).unwrap();
        let second = store.next_invoice_number().unwrap();
        assert!(second.ends_with("-002"));
    }

    #[test]
    fn test_duplicate_invoice() {
        let (mut store, _temp) = create_test_store();

        store.save_invoice(&sample_record(1001)).unwrap();
        let draft = store.duplicate_invoice(1001).unwrap();
        assert_eq!(draft.business_name, "Acme Studio");
        assert_eq!(draft.items.len(), 1);
        assert!(draft.date.is_none());

        assert!(matches!(
            store.duplicate_invoice(42),
            Err(StoreError::NotFound(42))
        ));
    }

    #[test]
    fn test_records_survive_reopen() {
        let (mut store, temp) = create_test_store();

        store.save_invoice(&sample_record(1001)).unwrap();
        drop(store);

        let mut reopened = InvoiceStore::open(temp.path()).unwrap();
        let all = reopened.get_invoices().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, 1001);
    }
}
