//! Database connection management

use std::path::{Path, PathBuf};

use rusqlite::Connection;

use super::schema;
use crate::error::{Result, StoreError};

/// Database connection wrapper
pub struct Database {
    /// Path to the database file
    path: PathBuf,
    /// SQLite connection
    conn: Option<Connection>,
}

impl Database {
    /// Open a database at the specified path, creating tables and
    /// indexes if they do not exist yet.
    ///
    /// Opening is idempotent: an existing database is reused as-is,
    /// a fresh path gets the full schema.
    pub fn open_or_create(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;

        for sql in schema::CREATE_ALL_TABLES {
            conn.execute(sql, [])?;
        }
        for sql in schema::CREATE_INVOICE_INDEXES {
            conn.execute(sql, [])?;
        }

        Ok(Self {
            path: path.to_path_buf(),
            conn: Some(conn),
        })
    }

    /// Get a reference to the connection
    pub fn connection(&self) -> Result<&Connection> {
        self.conn
            .as_ref()
            .ok_or_else(|| StoreError::Persistence("Database not open".to_string()))
    }

    /// Get the database path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Close the database connection
    pub fn close(&mut self) {
        self.conn = None;
    }

    /// Check if database is open
    pub fn is_open(&self) -> bool {
        self.conn.is_some()
    }

    /// Force a WAL checkpoint to write all data to the main database file
    ///
    /// Uses TRUNCATE mode which checkpoints all frames and truncates the
    /// WAL file. Called after write operations so data survives reloads.
    pub fn checkpoint(&self) -> Result<()> {
        self.connection()?
            .execute_batch("PRAGMA wal_checkpoint(TRUNCATE)")?;
        Ok(())
    }
}

impl Drop for Database {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_open_or_create_creates_schema() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test.db");

        let db = Database::open_or_create(&db_path).unwrap();

        // All tables should exist
        let count: i64 = db
            .connection()
            .unwrap()
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table'
                 AND name IN ('invoices', 'draft', 'usage_counts', 'properties', 'settings')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 5);
    }

    #[test]
    fn test_open_or_create_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test.db");

        {
            let db = Database::open_or_create(&db_path).unwrap();
            db.connection()
                .unwrap()
                .execute(
                    "INSERT INTO invoices (id, invoice_number, business_name, client_name,
                     invoice_date, invoice_time, currency, items, total)
                     VALUES (1, 'INV-1', 'Acme', 'Client', '2024-01-15', NULL, 'USD', '[]', 'USD 0.00')",
                    [],
                )
                .unwrap();
        }

        // Re-opening must not wipe data
        let db = Database::open_or_create(&db_path).unwrap();
        let count: i64 = db
            .connection()
            .unwrap()
            .query_row("SELECT COUNT(*) FROM invoices", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_secondary_indexes_exist() {
        let temp_dir = TempDir::new().unwrap();
        let db = Database::open_or_create(&temp_dir.path().join("test.db")).unwrap();

        let count: i64 = db
            .connection()
            .unwrap()
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'index'
                 AND name IN ('idx_invoices_date', 'idx_invoices_client', 'idx_invoices_number')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 3);
    }

    #[test]
    fn test_draft_slot_constraint() {
        let temp_dir = TempDir::new().unwrap();
        let db = Database::open_or_create(&temp_dir.path().join("test.db")).unwrap();

        // Only slot 0 is allowed
        let result = db.connection().unwrap().execute(
            "INSERT INTO draft (slot, payload, saved_at) VALUES (1, '{}', '2024-01-01 00:00:00')",
            [],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_closed_database_errors() {
        let temp_dir = TempDir::new().unwrap();
        let mut db = Database::open_or_create(&temp_dir.path().join("test.db")).unwrap();

        db.close();
        assert!(!db.is_open());
        assert!(db.connection().is_err());
    }

    #[test]
    fn test_checkpoint_no_error() {
        let temp_dir = TempDir::new().unwrap();
        let db = Database::open_or_create(&temp_dir.path().join("test.db")).unwrap();
        db.checkpoint().unwrap();
    }
}
