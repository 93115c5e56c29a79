use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::values::{NotificationId, Timestamp, ToastId};

/// Notification severity, shared by both lifecycles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    #[default]
    Info,
    Success,
    Warning,
    Error,
}

/// Ephemeral, locally generated notification
///
/// Created by the client, displayed, and removed after a fixed delay.
/// Never persisted and never the same record as a [`Notification`], even
/// when both describe the same occurrence.
#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub id: ToastId,
    pub message: String,
    pub kind: NotificationKind,
    pub time: Timestamp,
}

impl Toast {
    pub fn new(message: impl Into<String>, kind: NotificationKind, time: Timestamp) -> Self {
        Self {
            id: Uuid::new_v4(),
            message: message.into(),
            kind,
            time,
        }
    }
}

/// Server-tracked notification with durable read/unread state
///
/// Fetched once at session start and kept until the user dismisses it on
/// the server side; never auto-expired.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: NotificationId,
    pub message: String,
    #[serde(rename = "type", default)]
    pub kind: NotificationKind,
    #[serde(default)]
    pub created_at: Option<Timestamp>,
    #[serde(default)]
    pub read: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_defaults_to_info() {
        let n: Notification =
            serde_json::from_str(r#"{"id":1,"message":"Outbid on Vintage camera"}"#).unwrap();
        assert_eq!(n.kind, NotificationKind::Info);
        assert!(!n.read);
        assert!(n.created_at.is_none());
    }

    #[test]
    fn test_kind_wire_form_is_lowercase() {
        let n: Notification = serde_json::from_str(
            r#"{"id":2,"message":"You won this auction","type":"success","read":true}"#,
        )
        .unwrap();
        assert_eq!(n.kind, NotificationKind::Success);
        assert!(n.read);
    }

    #[test]
    fn test_toasts_get_distinct_local_ids() {
        let now = chrono::Utc::now();
        let a = Toast::new("New highest bid placed", NotificationKind::Info, now);
        let b = Toast::new("New highest bid placed", NotificationKind::Info, now);
        assert_ne!(a.id, b.id);
    }
}
