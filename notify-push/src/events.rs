use chrono::{DateTime, Utc};
use notify_core::types::{flag, RawId};
use notify_core::{Notification, RawNotification};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Keys that describe the notification itself rather than its payload.
const ENVELOPE_KEYS: &[&str] = &[
    "id",
    "type",
    "title",
    "body",
    "isRead",
    "is_read",
    "createdAt",
    "created_at",
];

/// Content of an OS push delivery.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PushPayload {
    /// Delivery identifier assigned by the push service.
    #[serde(default)]
    pub identifier: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub data: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum PushEvent {
    /// Delivered while the app is in the foreground.
    Received(PushPayload),
    /// The user tapped the system notification.
    Tapped(PushPayload),
}

impl PushEvent {
    pub fn payload(&self) -> &PushPayload {
        match self {
            PushEvent::Received(p) | PushEvent::Tapped(p) => p,
        }
    }
}

impl PushPayload {
    /// Shape the delivery like a backend record so it takes the same
    /// normalization path as a list fetch.
    pub fn into_raw(self) -> RawNotification {
        let data = self.data;

        let id = data
            .get("id")
            .and_then(RawId::from_value)
            .or_else(|| {
                (!self.identifier.is_empty()).then(|| RawId::Str(self.identifier.clone()))
            });

        let text = |key: &str| data.get(key).and_then(Value::as_str).map(str::to_string);
        let read = |key: &str| data.get(key).and_then(flag);

        let payload = match data.get("data") {
            Some(Value::Object(inner)) => inner.clone(),
            _ => data
                .iter()
                .filter(|(k, _)| !ENVELOPE_KEYS.contains(&k.as_str()))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        };

        RawNotification {
            id,
            title: self.title.or_else(|| text("title")),
            body: self.body.or_else(|| text("body")),
            kind: text("type"),
            data: Some(Value::Object(payload)),
            is_read_camel: read("isRead"),
            is_read: read("is_read"),
            read_at: None,
            created_at_camel: text("createdAt"),
            created_at: text("created_at"),
        }
    }

    pub fn into_notification(self, now: DateTime<Utc>) -> Notification {
        self.into_raw().normalize(now)
    }
}
