//! In-memory backend that behaves like the REST server and records calls.

use async_trait::async_trait;
use notify_core::types::RawId;
use notify_core::{NotificationBackend, NotificationId, NotifyError, RawNotification, Result};
use serde_json::Value;
use std::collections::HashSet;
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    List,
    MarkRead(NotificationId),
    MarkAllRead,
    Delete(NotificationId),
    RegisterPush(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailOn {
    List,
    MarkRead,
    MarkAllRead,
    Delete,
    RegisterPush,
}

#[derive(Default)]
pub struct FakeBackend {
    records: Mutex<Vec<RawNotification>>,
    calls: Mutex<Vec<Call>>,
    failing: Mutex<HashSet<FailOn>>,
}

/// Parse a JSON literal into a raw record; a non-object becomes an empty record.
pub fn raw(value: Value) -> RawNotification {
    RawNotification::from_value(&value).unwrap_or_default()
}

fn matches_id(record: &RawNotification, id: &NotificationId) -> bool {
    match &record.id {
        Some(RawId::Num(n)) => n.to_string() == id.as_str(),
        Some(RawId::Str(s)) => s == id.as_str(),
        None => false,
    }
}

impl FakeBackend {
    pub fn with_records(records: Vec<Value>) -> Self {
        let backend = FakeBackend::default();
        *backend.records.lock().unwrap_or_else(|e| e.into_inner()) =
            records.into_iter().map(raw).collect();
        backend
    }

    pub fn fail(&self, op: FailOn) {
        self.failing.lock().unwrap_or_else(|e| e.into_inner()).insert(op);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls().iter().filter(|c| pred(c)).count()
    }

    fn record(&self, call: Call, op: FailOn) -> Result<()> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).push(call);
        if self.failing.lock().unwrap_or_else(|e| e.into_inner()).contains(&op) {
            return Err(NotifyError::Network("connection reset".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl NotificationBackend for FakeBackend {
    async fn list_notifications(&self) -> Result<Vec<RawNotification>> {
        self.record(Call::List, FailOn::List)?;
        Ok(self.records.lock().unwrap_or_else(|e| e.into_inner()).clone())
    }

    async fn mark_read(&self, id: &NotificationId) -> Result<()> {
        self.record(Call::MarkRead(id.clone()), FailOn::MarkRead)?;
        let mut records = self.records.lock().unwrap_or_else(|e| e.into_inner());
        for r in records.iter_mut().filter(|r| matches_id(r, id)) {
            r.is_read = Some(true);
        }
        Ok(())
    }

    async fn mark_all_read(&self) -> Result<()> {
        self.record(Call::MarkAllRead, FailOn::MarkAllRead)?;
        let mut records = self.records.lock().unwrap_or_else(|e| e.into_inner());
        for r in records.iter_mut() {
            r.is_read = Some(true);
        }
        Ok(())
    }

    async fn delete(&self, id: &NotificationId) -> Result<()> {
        self.record(Call::Delete(id.clone()), FailOn::Delete)?;
        self.records
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .retain(|r| !matches_id(r, id));
        Ok(())
    }

    async fn register_push_token(&self, token: &str) -> Result<()> {
        self.record(Call::RegisterPush(token.to_string()), FailOn::RegisterPush)
    }
}
