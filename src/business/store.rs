//! Main InvoiceStore API
//!
//! This module provides the primary handle for interacting with the
//! local invoice database. Record, draft, usage, and settings
//! operations live in the sibling modules of this impl.

use std::path::{Path, PathBuf};

use rusqlite::Connection;

use crate::database::queries::{self, parse_timestamp};
use crate::database::{Database, StoreProperties};
use crate::error::{Result, StoreError};
use crate::utils::generate_store_id;
use crate::{DATABASE_FILENAME, DB_VERSION};

/// Handle to the local invoice store.
///
/// The underlying database is opened lazily on first use; opening is
/// idempotent and memoized, so any number of operations may be issued
/// and the first one pays the open cost. The handle is the single
/// writer within a process; concurrent processes race last-write-wins
/// on the same file (accepted limitation, see crate docs).
pub struct InvoiceStore {
    /// Folder holding the database file
    pub(crate) folder: PathBuf,
    /// Lazily opened database connection
    pub(crate) db: Option<Database>,
    /// Last id handed out by `next_record_id`, for monotonicity
    pub(crate) last_minted_id: Option<i64>,
}

impl InvoiceStore {
    /// Create a store handle rooted at a folder.
    ///
    /// The folder is created if missing; the database file itself is
    /// not touched until the first operation needs it.
    pub fn open(folder: &Path) -> Result<Self> {
        std::fs::create_dir_all(folder)?;

        Ok(Self {
            folder: folder.to_path_buf(),
            db: None,
            last_minted_id: None,
        })
    }

    /// Open the database if it is not open yet.
    ///
    /// Serves as the single lazy re-open attempt when the handle was
    /// closed: a `None` handle is re-opened here, a failed open is
    /// returned to the caller as a persistence error.
    pub(crate) fn ensure_open(&mut self) -> Result<()> {
        if self.db.as_ref().is_some_and(|db| db.is_open()) {
            return Ok(());
        }

        let db = Database::open_or_create(&self.database_path())?;

        // First run: mint the store identity
        {
            let conn = db.connection()?;
            if queries::get_properties(conn)?.is_none() {
                queries::set_properties(conn, &generate_store_id(), DB_VERSION)?;
            }
        }

        self.db = Some(db);
        Ok(())
    }

    /// Get the open connection, opening the database first if needed
    pub(crate) fn connection(&mut self) -> Result<&Connection> {
        self.ensure_open()?;
        self.db
            .as_ref()
            .ok_or_else(|| StoreError::Persistence("Database not open".to_string()))?
            .connection()
    }

    /// Get store properties
    pub fn properties(&mut self) -> Result<StoreProperties> {
        let conn = self.connection()?;

        let raw = queries::get_properties(conn)?
            .ok_or_else(|| StoreError::Persistence("Properties not found".to_string()))?;

        Ok(StoreProperties {
            store_id: raw.store_id,
            version: raw.version,
            created_timestamp: raw.created_timestamp.as_deref().and_then(parse_timestamp),
            update_timestamp: raw.update_timestamp.as_deref().and_then(parse_timestamp),
        })
    }

    /// Remove all user data: invoices, draft, usage counters and
    /// settings. The store identity is kept.
    pub fn reset_all_data(&mut self) -> Result<()> {
        let conn = self.connection()?;
        queries::clear_all_data(conn)?;
        queries::touch_update_timestamp(conn)?;
        self.last_minted_id = None;
        Ok(())
    }

    /// Whether the underlying database is currently open
    pub fn is_open(&self) -> bool {
        self.db.as_ref().is_some_and(|db| db.is_open())
    }

    /// Close the database handle. The next operation re-opens it.
    pub fn close(&mut self) {
        if let Some(mut db) = self.db.take() {
            db.close();
        }
    }

    /// Get the store folder path
    pub fn folder(&self) -> &Path {
        &self.folder
    }

    /// Get the database file path
    pub fn database_path(&self) -> PathBuf {
        self.folder.join(DATABASE_FILENAME)
    }
}

impl Drop for InvoiceStore {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use tempfile::TempDir;

    pub fn create_test_store() -> (InvoiceStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = InvoiceStore::open(temp_dir.path()).unwrap();
        (store, temp_dir)
    }

    #[test]
    fn test_open_is_lazy() {
        let (store, temp) = create_test_store();
        assert!(!store.is_open());
        // No database file until first use
        assert!(!temp.path().join(DATABASE_FILENAME).exists());
    }

    #[test]
    fn test_first_operation_opens_and_initializes() {
        let (mut store, temp) = create_test_store();

        let props = store.properties().unwrap();
        assert!(store.is_open());
        assert!(temp.path().join(DATABASE_FILENAME).exists());
        assert_eq!(props.store_id.len(), 32);
        assert_eq!(props.version, DB_VERSION);
        assert!(props.created_timestamp.is_some());
    }

    #[test]
    fn test_reopen_after_close_keeps_identity() {
        let (mut store, _temp) = create_test_store();

        let first = store.properties().unwrap();
        store.close();
        assert!(!store.is_open());

        // Next operation re-opens the same database
        let second = store.properties().unwrap();
        assert_eq!(first.store_id, second.store_id);
    }

    #[test]
    fn test_two_handles_same_folder_share_identity() {
        let temp_dir = TempDir::new().unwrap();

        let mut store1 = InvoiceStore::open(temp_dir.path()).unwrap();
        let id1 = store1.properties().unwrap().store_id;
        store1.close();

        let mut store2 = InvoiceStore::open(temp_dir.path()).unwrap();
        let id2 = store2.properties().unwrap().store_id;
        assert_eq!(id1, id2);
    }

    #[test]
    fn test_database_path() {
        let (store, temp) = create_test_store();
        assert_eq!(store.database_path(), temp.path().join(DATABASE_FILENAME));
        assert_eq!(store.folder(), temp.path());
    }
}
