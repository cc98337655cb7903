use chrono::{DateTime, Utc};
use notify_core::{
    time_ago, Notification, NotificationId, NotificationKind, NotifyError, Result,
};
use notify_store::NotificationStore;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing;

pub const CHECK_OPERATORS: &str = "CHECK OPERATORS";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Field {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchLeadBlock {
    pub district: String,
    pub taluka: String,
    pub search_query: String,
    pub action: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum DetailContent {
    SearchLead(SearchLeadBlock),
    Fields(Vec<Field>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailModel {
    pub id: String,
    pub title: String,
    pub body: String,
    pub icon: &'static str,
    pub color: &'static str,
    pub time_ago: String,
    pub created_at: DateTime<Utc>,
    pub content: DetailContent,
}

/// Detail screen for one notification.
///
/// The screen only holds the id; every render reads the store, so a delete
/// from anywhere makes `render` return `None`.
pub struct NotificationDetail {
    store: NotificationStore,
    id: NotificationId,
    mark_read_fired: bool,
}

impl NotificationDetail {
    /// Open the screen for a cached notification. Fires one mark-read if it is
    /// unread; a failure there is already reported by the store.
    pub async fn mount(store: NotificationStore, id: NotificationId) -> Result<Self> {
        let notification = store
            .get(&id)
            .await
            .ok_or_else(|| NotifyError::NotFound(id.clone()))?;

        let mut detail = Self {
            store,
            id,
            mark_read_fired: false,
        };

        if !notification.is_read() {
            detail.mark_read_fired = true;
            if let Err(e) = detail.store.mark_read(&detail.id).await {
                tracing::debug!("Mark read on open failed for {}: {}", detail.id, e);
            }
        }

        Ok(detail)
    }

    /// Open the screen with a notification carried by a push tap rather than
    /// looked up by id.
    pub async fn mount_transient(
        store: NotificationStore,
        notification: Notification,
    ) -> Result<Self> {
        let id = store.ingest(notification).await;
        Self::mount(store, id).await
    }

    pub fn id(&self) -> &NotificationId {
        &self.id
    }

    pub fn mark_read_fired(&self) -> bool {
        self.mark_read_fired
    }

    pub async fn render(&self, now: DateTime<Utc>) -> Option<DetailModel> {
        let n = self.store.get(&self.id).await?;
        Some(DetailModel {
            id: n.id().to_string(),
            title: n.title().to_string(),
            body: n.body().to_string(),
            icon: n.kind().icon(),
            color: n.kind().color(),
            time_ago: time_ago(n.created_at(), now),
            created_at: n.created_at(),
            content: content(&n),
        })
    }

    pub async fn delete(&self) -> Result<()> {
        self.store.delete(&self.id).await
    }
}

fn content(n: &Notification) -> DetailContent {
    match n.kind() {
        NotificationKind::SearchLead => DetailContent::SearchLead(search_lead(n.data())),
        _ => DetailContent::Fields(fields(n.data())),
    }
}

fn search_lead(data: &Map<String, Value>) -> SearchLeadBlock {
    let get = |keys: &[&str]| {
        keys.iter()
            .find_map(|k| data.get(*k).filter(|v| !v.is_null()))
            .map(render_value)
            .unwrap_or_else(|| "-".to_string())
    };

    SearchLeadBlock {
        district: get(&["district"]),
        taluka: get(&["taluka"]),
        search_query: get(&["searchQuery", "search_query"]),
        action: CHECK_OPERATORS,
    }
}

fn fields(data: &Map<String, Value>) -> Vec<Field> {
    let mut fields: Vec<Field> = data
        .iter()
        .map(|(k, v)| Field {
            label: humanize(k),
            value: render_value(v),
        })
        .collect();
    fields.sort_by(|a, b| a.label.cmp(&b.label));
    fields
}

fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "-".to_string(),
        other => other.to_string(),
    }
}

/// `searchQuery` and `search_query` both become "Search Query".
fn humanize(key: &str) -> String {
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();

    for c in key.chars() {
        if c == '_' || c == '-' || c == ' ' {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
        } else if c.is_uppercase() && !current.is_empty() {
            words.push(std::mem::take(&mut current));
            current.push(c);
        } else {
            current.push(c);
        }
    }
    if !current.is_empty() {
        words.push(current);
    }

    words
        .iter()
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
