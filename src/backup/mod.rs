//! Backup and restore functionality
//!
//! Exports the full record set as a portable JSON snapshot and
//! restores from one. Import is per-record upsert by id collision,
//! deliberately not all-or-nothing: everything restorable is restored
//! and the rest is reported.

use std::fs;
use std::path::Path;

use chrono::Utc;
use tracing::{info, warn};

use crate::business::InvoiceStore;
use crate::database::models::ExportSnapshot;
use crate::database::queries;
use crate::error::{Result, StoreError};

/// Current export artifact version
pub const EXPORT_VERSION: u32 = 1;

impl InvoiceStore {
    /// Serialize all records into a portable snapshot
    pub fn export_all(&mut self) -> Result<ExportSnapshot> {
        let invoices = self.get_invoices()?;
        Ok(ExportSnapshot {
            version: EXPORT_VERSION,
            timestamp: Utc::now(),
            count: invoices.len(),
            invoices,
        })
    }

    /// Write the export snapshot to a file as pretty JSON
    pub fn export_to_file(&mut self, path: &Path) -> Result<()> {
        let snapshot = self.export_all()?;
        let json = serde_json::to_string_pretty(&snapshot)?;
        fs::write(path, json)?;
        info!(path = %path.display(), count = snapshot.count, "exported records");
        Ok(())
    }

    /// Restore records from a snapshot.
    ///
    /// Each record is upserted individually; an id collision overwrites
    /// the stored record. Records failing the required-field guard are
    /// skipped and reported via [`StoreError::PartialFailure`] while
    /// the rest still land. Returns the number of imported records.
    pub fn import_all(&mut self, snapshot: &ExportSnapshot) -> Result<usize> {
        if snapshot.version == 0 || snapshot.version > EXPORT_VERSION {
            return Err(StoreError::InvalidInput(format!(
                "unsupported export version: {}",
                snapshot.version
            )));
        }
        if snapshot.count != snapshot.invoices.len() {
            warn!(
                declared = snapshot.count,
                actual = snapshot.invoices.len(),
                "snapshot count disagrees with its record list"
            );
        }

        let mut succeeded = 0usize;
        let mut failed = Vec::new();

        for record in &snapshot.invoices {
            match self.save_invoice(record) {
                Ok(()) => succeeded += 1,
                Err(e) => {
                    warn!(id = record.id, error = %e, "skipping unimportable record");
                    failed.push(record.id);
                }
            }
        }

        if succeeded > 0 {
            let conn = self.connection()?;
            queries::touch_update_timestamp(conn)?;
        }
        info!(succeeded, failed = failed.len(), "import finished");

        if failed.is_empty() {
            Ok(succeeded)
        } else {
            Err(StoreError::PartialFailure { succeeded, failed })
        }
    }

    /// Restore records from a snapshot file
    pub fn import_from_file(&mut self, path: &Path) -> Result<usize> {
        let json = fs::read_to_string(path)?;
        let snapshot: ExportSnapshot = serde_json::from_str(&json)?;
        self.import_all(&snapshot)
    }
}
