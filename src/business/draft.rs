//! Draft Manager operations
//!
//! Crash/reload-resilient recovery of unsaved form state. One slot,
//! last write wins, no merge logic: drafts are advisory, not
//! authoritative. Saves race freely between the UI's interval timer,
//! edit debounce and unload hook.

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info, warn};

use super::store::InvoiceStore;
use crate::DRAFT_EXPIRY_HOURS;
use crate::database::models::DraftSnapshot;
use crate::database::queries::{self, format_timestamp, parse_timestamp};
use crate::error::Result;

/// Whether a draft saved at `saved_at` has passed the expiry window
pub fn draft_is_expired(saved_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    now - saved_at > Duration::hours(DRAFT_EXPIRY_HOURS)
}

impl InvoiceStore {
    /// Overwrite the draft slot with a snapshot stamped `now`.
    ///
    /// The expiry clock always restarts from the write, regardless of
    /// what `saved_at` the caller's snapshot carries, so re-saving a
    /// recovered draft keeps it alive. Empty snapshots (no items, no
    /// user edits) are not written, so the slot never fills with
    /// meaningless drafts. Returns whether a write happened.
    pub fn save_draft(&mut self, snapshot: &DraftSnapshot) -> Result<bool> {
        if snapshot.is_empty() {
            return Ok(false);
        }

        let mut stamped = snapshot.clone();
        stamped.saved_at = Utc::now();

        let payload = serde_json::to_string(&stamped)?;
        let saved_at = format_timestamp(&stamped.saved_at);

        let conn = self.connection()?;
        queries::put_draft(conn, &payload, &saved_at)?;
        debug!(saved_at = %saved_at, "draft slot written");
        Ok(true)
    }

    /// Whether a non-expired draft exists.
    ///
    /// An expired or unreadable draft found here is proactively
    /// deleted and never surfaced.
    pub fn has_recoverable_draft(&mut self) -> Result<bool> {
        Ok(self.live_draft()?.is_some())
    }

    /// Return the draft contents without consuming them, so the UI can
    /// prompt the user before committing to recovery. Applies the same
    /// expiry sweep as [`has_recoverable_draft`](Self::has_recoverable_draft).
    pub fn peek_draft(&mut self) -> Result<Option<DraftSnapshot>> {
        self.live_draft()
    }

    /// Remove the draft slot. Idempotent.
    pub fn clear_draft(&mut self) -> Result<()> {
        let conn = self.connection()?;
        queries::delete_draft(conn)
    }

    /// Read the slot, discarding expired or corrupt content.
    ///
    /// A stale draft is a state, not an error: it is deleted and
    /// logged, and the caller simply sees no draft.
    fn live_draft(&mut self) -> Result<Option<DraftSnapshot>> {
        let now = Utc::now();
        let conn = self.connection()?;

        let Some((payload, saved_at)) = queries::get_draft(conn)? else {
            return Ok(None);
        };

        let Some(timestamp) = parse_timestamp(&saved_at) else {
            warn!(saved_at = %saved_at, "discarding draft with unreadable timestamp");
            queries::delete_draft(conn)?;
            return Ok(None);
        };

        if draft_is_expired(timestamp, now) {
            info!(saved_at = %saved_at, "discarding stale draft");
            queries::delete_draft(conn)?;
            return Ok(None);
        }

        match serde_json::from_str(&payload) {
            Ok(snapshot) => Ok(Some(snapshot)),
            Err(e) => {
                warn!(error = %e, "discarding unparsable draft payload");
                queries::delete_draft(conn)?;
                Ok(None)
            }
        }
    }
}
