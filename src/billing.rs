//! Purchase notification handling
//!
//! Purchase notices arrive from an untrusted cross-context channel
//! (the native billing wrapper posts JSON messages). They are parsed
//! into a tagged variant at the boundary; unrecognized or malformed
//! shapes are ignored rather than trusted.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::business::InvoiceStore;
use crate::error::Result;

/// Product ids that unlock premium
pub const PREMIUM_PRODUCT_IDS: &[&str] =
    &["premium_unlock", "com.evansmunsha.invoicemaker.premium"];

/// Purchase channel recorded with the entitlement
pub const PURCHASE_METHOD_GOOGLE_PLAY: &str = "google_play";

/// A recognized purchase notification message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PurchaseNotice {
    /// A purchase completed for the given product
    #[serde(rename = "PURCHASE_COMPLETE")]
    PurchaseComplete {
        #[serde(rename = "productId")]
        product_id: String,
    },
    /// A purchase attempt failed
    #[serde(rename = "PURCHASE_FAILED")]
    PurchaseFailed {
        #[serde(rename = "productId")]
        product_id: Option<String>,
        reason: Option<String>,
    },
}

impl PurchaseNotice {
    /// Whether this notice unlocks premium
    pub fn grants_premium(&self) -> bool {
        match self {
            PurchaseNotice::PurchaseComplete { product_id } => {
                PREMIUM_PRODUCT_IDS.contains(&product_id.as_str())
            }
            PurchaseNotice::PurchaseFailed { .. } => false,
        }
    }
}

/// Parse a raw message into a purchase notice.
///
/// Messages of unknown kind or shape yield `None` - the channel
/// carries plenty of unrelated traffic and none of it is an error.
pub fn parse_notice(raw: &str) -> Option<PurchaseNotice> {
    match serde_json::from_str(raw) {
        Ok(notice) => Some(notice),
        Err(e) => {
            debug!(error = %e, "ignoring non-purchase message");
            None
        }
    }
}

impl InvoiceStore {
    /// Apply a purchase notice to the stored premium status.
    ///
    /// Returns whether premium was unlocked by this notice.
    pub fn apply_purchase(&mut self, notice: &PurchaseNotice) -> Result<bool> {
        if !notice.grants_premium() {
            return Ok(false);
        }
        self.set_premium(PURCHASE_METHOD_GOOGLE_PLAY)?;
        info!("premium unlocked by purchase notice");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::business::store::tests::create_test_store;

    #[test]
    fn test_parse_complete_notice() {
        let raw = r#"{"type":"PURCHASE_COMPLETE","productId":"premium_unlock"}"#;
        let notice = parse_notice(raw).unwrap();
        assert!(notice.grants_premium());
    }

    #[test]
    fn test_parse_failed_notice() {
        let raw = r#"{"type":"PURCHASE_FAILED","productId":"premium_unlock","reason":"cancelled"}"#;
        let notice = parse_notice(raw).unwrap();
        assert!(!notice.grants_premium());
    }

    #[test]
    fn test_unknown_product_does_not_grant() {
        let raw = r#"{"type":"PURCHASE_COMPLETE","productId":"some_other_sku"}"#;
        let notice = parse_notice(raw).unwrap();
        assert!(!notice.grants_premium());
    }

    #[test]
    fn test_malformed_and_unknown_messages_ignored() {
        assert!(parse_notice("not json at all").is_none());
        assert!(parse_notice(r#"{"type":"SOMETHING_ELSE"}"#).is_none());
        assert!(parse_notice(r#"{"hello":"world"}"#).is_none());
        assert!(parse_notice(r#"{"type":"PURCHASE_COMPLETE"}"#).is_none());
    }

    #[test]
    fn test_apply_purchase_unlocks_premium() {
        let (mut store, _temp) = create_test_store();

        let notice = parse_notice(
            r#"{"type":"PURCHASE_COMPLETE","productId":"com.evansmunsha.invoicemaker.premium"}"#,
        )
        .unwrap();
        assert!(store.apply_purchase(&notice).unwrap());

        let status = store.premium_status().unwrap();
        assert!(status.premium);
        assert_eq!(status.method.as_deref(), Some(PURCHASE_METHOD_GOOGLE_PLAY));
    }

    #[test]
    fn test_apply_failed_purchase_is_noop() {
        let (mut store, _temp) = create_test_store();

        let notice = PurchaseNotice::PurchaseFailed {
            product_id: None,
            reason: None,
        };
        assert!(!store.apply_purchase(&notice).unwrap());
        assert!(!store.premium_status().unwrap().premium);
    }
}
