use chrono::{DateTime, TimeZone, Utc};
use notify_core::{time_ago, Notification, NotificationId, Result};
use notify_store::NotificationStore;
use serde::Serialize;
use tracing;

use crate::detail::NotificationDetail;
use crate::page::{group_by_day, paginate, Page, Section};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NotificationRow {
    pub id: String,
    pub title: String,
    pub body: String,
    pub icon: &'static str,
    pub color: &'static str,
    /// Drives the unread treatment (left border and tinted background).
    pub unread: bool,
    pub time_ago: String,
    pub created_at: DateTime<Utc>,
}

impl NotificationRow {
    pub fn from_notification(n: &Notification, now: DateTime<Utc>) -> Self {
        Self {
            id: n.id().to_string(),
            title: n.title().to_string(),
            body: n.body().to_string(),
            icon: n.kind().icon(),
            color: n.kind().color(),
            unread: !n.is_read(),
            time_ago: time_ago(n.created_at(), now),
            created_at: n.created_at(),
        }
    }
}

/// Notification list screen: rows in delivered order, per-item delete, and a
/// global mark-all-read.
#[derive(Clone)]
pub struct NotificationList {
    store: NotificationStore,
    page_size: usize,
}

impl NotificationList {
    pub fn new(store: NotificationStore, page_size: usize) -> Self {
        Self { store, page_size }
    }

    /// Refetch from the backend. A failed fetch keeps whatever is cached.
    pub async fn load(&self) -> Result<usize> {
        let items = self.store.list().await?;
        Ok(items.len())
    }

    pub async fn rows(&self, now: DateTime<Utc>) -> Vec<NotificationRow> {
        self.store
            .snapshot()
            .await
            .iter()
            .map(|n| NotificationRow::from_notification(n, now))
            .collect()
    }

    pub async fn page(&self, page: usize, now: DateTime<Utc>) -> Page<NotificationRow> {
        paginate(&self.rows(now).await, page, self.page_size)
    }

    pub async fn sections<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Vec<Section> {
        let rows = self.rows(now.with_timezone(&Utc)).await;
        group_by_day(rows, now)
    }

    pub async fn unread_count(&self) -> usize {
        self.store.unread_count().await
    }

    pub async fn mark_all_read(&self) -> Result<()> {
        self.store.mark_all_read().await
    }

    pub async fn delete(&self, id: &NotificationId) -> Result<()> {
        self.store.delete(id).await?;
        tracing::debug!("Deleted notification {} from list", id);
        Ok(())
    }

    /// Navigate to a row's detail screen.
    pub async fn open(&self, id: &NotificationId) -> Result<NotificationDetail> {
        NotificationDetail::mount(self.store.clone(), id.clone()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify_core::NotificationKind;
    use notify_store::testing::{Call, FakeBackend};
    use serde_json::json;
    use std::sync::Arc;

    fn list() -> (Arc<FakeBackend>, NotificationList) {
        let backend = Arc::new(FakeBackend::with_records(vec![
            json!({
                "id": 3, "title": "Lead", "type": "search_lead",
                "isRead": false, "createdAt": "2026-10-16T11:59:01Z"
            }),
            json!({
                "id": 2, "title": "Paid", "type": "payment",
                "is_read": true, "createdAt": "2026-10-16T11:00:00Z"
            }),
            json!({
                "id": 1, "title": "Odd", "type": "mystery",
                "isRead": true, "is_read": false, "createdAt": "2026-10-15T12:00:00Z"
            }),
        ]));
        let store = NotificationStore::new(backend.clone());
        (backend, NotificationList::new(store, 2))
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 16, 12, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn rows_reflect_read_state_and_kind() {
        let (_, list) = list();
        list.load().await.unwrap();
        let rows = list.rows(now()).await;

        assert_eq!(rows.len(), 3);
        assert!(rows[0].unread);
        assert!(!rows[1].unread);
        assert!(!rows[2].unread, "either read spelling counts");

        assert_eq!(rows[0].icon, NotificationKind::SearchLead.icon());
        assert_eq!(rows[0].time_ago, "59 sec ago");
        assert_eq!(rows[1].time_ago, "1 hours ago");
        assert_eq!(rows[2].time_ago, "1 days ago");

        assert_eq!(rows[2].icon, notify_core::kind::DEFAULT_ICON);
        assert_eq!(rows[2].color, notify_core::kind::DEFAULT_COLOR);
    }

    #[tokio::test]
    async fn mark_all_read_clears_unread() {
        let (_, list) = list();
        list.load().await.unwrap();
        assert_eq!(list.unread_count().await, 1);

        list.mark_all_read().await.unwrap();
        list.load().await.unwrap();
        assert!(list.rows(now()).await.iter().all(|r| !r.unread));
        assert_eq!(list.unread_count().await, 0);
    }

    #[tokio::test]
    async fn delete_removes_row() {
        let (backend, list) = list();
        list.load().await.unwrap();

        list.delete(&NotificationId::from(2_i64)).await.unwrap();
        let ids: Vec<_> = list.rows(now()).await.into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["3", "1"]);
        assert_eq!(backend.count(|c| matches!(c, Call::Delete(_))), 1);
    }

    #[tokio::test]
    async fn pages_use_configured_size() {
        let (_, list) = list();
        list.load().await.unwrap();

        let first = list.page(1, now()).await;
        assert_eq!(first.items.len(), 2);
        assert!(first.has_more);
        let second = list.page(2, now()).await;
        assert_eq!(second.items.len(), 1);
        assert!(!second.has_more);
    }

    #[tokio::test]
    async fn sections_split_today_and_yesterday() {
        let (_, list) = list();
        list.load().await.unwrap();

        let sections = list.sections(&now()).await;
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].title, "Today");
        assert_eq!(sections[0].rows.len(), 2);
        assert_eq!(sections[1].title, "Yesterday");
    }
}
