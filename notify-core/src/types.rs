use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use crate::kind::NotificationKind;

/// Notification identifier. Numeric backend ids are kept as their decimal string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NotificationId(String);

impl NotificationId {
    pub fn new(id: impl Into<String>) -> Self {
        NotificationId(id.into())
    }

    pub fn generate() -> Self {
        NotificationId(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NotificationId {
    fn from(s: &str) -> Self {
        NotificationId(s.to_string())
    }
}

impl From<String> for NotificationId {
    fn from(s: String) -> Self {
        NotificationId(s)
    }
}

impl From<i64> for NotificationId {
    fn from(n: i64) -> Self {
        NotificationId(n.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RawId {
    Num(i64),
    Str(String),
}

impl RawId {
    /// Integers stay numeric; any other number or string is kept as text.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => Some(match n.as_i64() {
                Some(i) => RawId::Num(i),
                None => RawId::Str(n.to_string()),
            }),
            Value::String(s) => Some(RawId::Str(s.clone())),
            _ => None,
        }
    }

    fn into_id(self) -> Option<NotificationId> {
        match self {
            RawId::Num(n) => Some(n.into()),
            RawId::Str(s) if s.trim().is_empty() => None,
            RawId::Str(s) => Some(s.into()),
        }
    }
}

/// Read a boolean flag the way SQL-backed APIs send them: `true`, `1`, `"1"`
/// or `"true"`. Anything unrecognized is `None`.
pub fn flag(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_f64().map(|f| f != 0.0),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" => Some(true),
            "false" | "0" | "" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// A notification exactly as the backend or a push payload spells it.
///
/// Both `isRead`/`is_read` and `createdAt`/`created_at` are accepted; the
/// backend's `read_at` timestamp also counts as read. Decoding never fails
/// on a field of the wrong type, that field is just left out.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RawNotification {
    pub id: Option<RawId>,
    pub title: Option<String>,
    pub body: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub data: Option<Value>,
    #[serde(rename = "isRead")]
    pub is_read_camel: Option<bool>,
    pub is_read: Option<bool>,
    pub read_at: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at_camel: Option<String>,
    pub created_at: Option<String>,
}

impl RawNotification {
    /// Pick the known fields out of a JSON object. Returns `None` only when
    /// the value is not an object at all.
    pub fn from_value(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        let get = |key: &str| obj.get(key).filter(|v| !v.is_null());

        Some(RawNotification {
            id: get("id").and_then(RawId::from_value),
            title: get("title").and_then(text),
            body: get("body").and_then(text),
            kind: get("type")
                .and_then(text)
                .or_else(|| get("notification_type").and_then(text)),
            data: get("data").cloned(),
            is_read_camel: get("isRead").and_then(flag),
            is_read: get("is_read").and_then(flag),
            read_at: get("read_at").and_then(text),
            created_at_camel: get("createdAt").and_then(text),
            created_at: get("created_at").and_then(text),
        })
    }

    /// Collapse the naming variants into the canonical record. Missing pieces
    /// are defaulted: a fresh id, an empty type, and `now` for the timestamp.
    pub fn normalize(self, now: DateTime<Utc>) -> Notification {
        let id = self
            .id
            .and_then(RawId::into_id)
            .unwrap_or_else(NotificationId::generate);

        let is_read = self.is_read_camel.unwrap_or(false)
            || self.is_read.unwrap_or(false)
            || self.read_at.as_deref().is_some_and(|s| !s.trim().is_empty());

        let created_at = self
            .created_at_camel
            .as_deref()
            .and_then(parse_timestamp)
            .or_else(|| self.created_at.as_deref().and_then(parse_timestamp))
            .unwrap_or(now);

        let data = match self.data {
            Some(Value::Object(map)) => map,
            _ => Map::new(),
        };

        Notification {
            id,
            title: self.title.unwrap_or_default(),
            body: self.body.unwrap_or_default(),
            kind: NotificationKind::from(self.kind.unwrap_or_default().as_str()),
            data,
            is_read,
            created_at,
        }
    }
}

impl<'de> Deserialize<'de> for RawNotification {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        RawNotification::from_value(&value)
            .ok_or_else(|| de::Error::custom("notification record must be a JSON object"))
    }
}

fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    // Zone-less timestamps are treated as UTC.
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
        .map(|naive| naive.and_utc())
}

/// Canonical notification record. Only the read flag changes after creation,
/// and only from unread to read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    id: NotificationId,
    title: String,
    body: String,
    kind: NotificationKind,
    data: Map<String, Value>,
    is_read: bool,
    created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(
        id: impl Into<NotificationId>,
        kind: NotificationKind,
        title: impl Into<String>,
        body: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Notification {
            id: id.into(),
            title: title.into(),
            body: body.into(),
            kind,
            data: Map::new(),
            is_read: false,
            created_at,
        }
    }

    pub fn read(mut self) -> Self {
        self.is_read = true;
        self
    }

    pub fn id(&self) -> &NotificationId {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn kind(&self) -> &NotificationKind {
        &self.kind
    }

    pub fn data(&self) -> &Map<String, Value> {
        &self.data
    }

    pub fn is_read(&self) -> bool {
        self.is_read
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns true if the flag flipped.
    pub fn mark_read(&mut self) -> bool {
        let flipped = !self.is_read;
        self.is_read = true;
        flipped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 16, 12, 0, 0).unwrap()
    }

    fn raw(value: Value) -> RawNotification {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn either_read_spelling_marks_read() {
        let camel = raw(json!({"id": 1, "isRead": true, "is_read": false})).normalize(now());
        let snake = raw(json!({"id": 2, "isRead": false, "is_read": true})).normalize(now());
        let neither = raw(json!({"id": 3})).normalize(now());

        assert!(camel.is_read());
        assert!(snake.is_read());
        assert!(!neither.is_read());
    }

    #[test]
    fn read_at_timestamp_counts_as_read() {
        let n = raw(json!({"id": 7, "read_at": "2026-10-15T08:00:00Z"})).normalize(now());
        assert!(n.is_read());

        let n = raw(json!({"id": 8, "read_at": null})).normalize(now());
        assert!(!n.is_read());
    }

    #[test]
    fn created_at_prefers_camel_then_snake_then_now() {
        let n = raw(json!({
            "id": 1,
            "createdAt": "2026-10-01T00:00:00Z",
            "created_at": "2020-01-01T00:00:00Z"
        }))
        .normalize(now());
        assert_eq!(n.created_at(), Utc.with_ymd_and_hms(2026, 10, 1, 0, 0, 0).unwrap());

        let n = raw(json!({"id": 1, "created_at": "2026-09-01T10:30:00.123"})).normalize(now());
        assert_eq!(n.created_at().date_naive().to_string(), "2026-09-01");

        let n = raw(json!({"id": 1, "createdAt": "garbage"})).normalize(now());
        assert_eq!(n.created_at(), now());
    }

    #[test]
    fn numeric_and_string_ids_are_equivalent() {
        let a = raw(json!({"id": 42})).normalize(now());
        let b = raw(json!({"id": "42"})).normalize(now());
        assert_eq!(a.id(), b.id());
    }

    #[test]
    fn missing_fields_are_defaulted() {
        let n = raw(json!({"data": "not an object"})).normalize(now());
        assert!(!n.id().as_str().is_empty());
        assert_eq!(n.title(), "");
        assert!(n.data().is_empty());
        assert_eq!(n.kind(), &NotificationKind::Other(String::new()));
    }

    #[test]
    fn integer_and_string_read_flags_count() {
        assert!(raw(json!({"id": 1, "is_read": 1})).normalize(now()).is_read());
        assert!(raw(json!({"id": 2, "isRead": "true"})).normalize(now()).is_read());
        assert!(!raw(json!({"id": 3, "is_read": 0})).normalize(now()).is_read());
    }

    #[test]
    fn wrongly_typed_fields_are_defaulted() {
        let n = raw(json!({
            "id": 2.5,
            "title": 5,
            "body": {"nested": true},
            "type": "invoice",
            "notification_type": "alert",
            "isRead": [1],
            "createdAt": 17
        }))
        .normalize(now());

        assert_eq!(n.id().as_str(), "2.5");
        assert_eq!(n.title(), "5");
        assert_eq!(n.body(), "");
        assert_eq!(n.kind(), &NotificationKind::Invoice);
        assert!(!n.is_read());
        assert_eq!(n.created_at(), now());
    }

    #[test]
    fn only_non_objects_are_rejected() {
        assert!(RawNotification::from_value(&json!("hello")).is_none());
        assert!(RawNotification::from_value(&json!([1])).is_none());
        assert!(RawNotification::from_value(&json!({})).is_some());
    }

    #[test]
    fn accepts_backend_notification_type_field() {
        let n = raw(json!({"id": 1, "notification_type": "invoice"})).normalize(now());
        assert_eq!(n.kind(), &NotificationKind::Invoice);
    }

    #[test]
    fn mark_read_is_one_way() {
        let mut n = Notification::new("a", NotificationKind::Alert, "t", "b", now());
        assert!(n.mark_read());
        assert!(!n.mark_read());
        assert!(n.is_read());
        assert_eq!(n.created_at(), now());
    }
}
