//! User notification topic messages

use serde::{Deserialize, Serialize};

use crate::error::GatewayError;
use crate::transport::Payload;
use gavel_core::NotificationKind;

/// Push notification on `user/{id}/notifications`
///
/// Feeds an ephemeral toast on arrival. The server may persist its own
/// record of the same occurrence; that record arrives separately via the
/// notification history endpoint and is never merged with the toast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationMessage {
    pub message: String,
    #[serde(rename = "type", default)]
    pub kind: NotificationKind,
}

impl NotificationMessage {
    pub fn from_payload(payload: Payload) -> Result<Self, GatewayError> {
        Ok(serde_json::from_value(payload)?)
    }
}
