use anyhow::Result;
use chrono::Utc;
use notify_core::{NotificationId, Role};
use notify_store::NotificationStore;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing;

use crate::events::PushEvent;
use crate::route::{detail_route, Navigator};

/// Forward push events into the store until the sender side goes away.
pub async fn run(
    mut events: mpsc::Receiver<PushEvent>,
    store: NotificationStore,
    navigator: Arc<dyn Navigator>,
    role: Role,
) -> Result<()> {
    tracing::info!("Starting push event consumer");

    while let Some(event) = events.recv().await {
        let delivery = event.payload().identifier.clone();
        let id = handle_event(&store, navigator.as_ref(), role, event).await;
        tracing::debug!("Processed push delivery {:?} as notification {}", delivery, id);
    }

    tracing::info!("Push event stream closed");
    Ok(())
}

/// Received events only land in the cache; taps also open the detail screen.
pub async fn handle_event(
    store: &NotificationStore,
    navigator: &dyn Navigator,
    role: Role,
    event: PushEvent,
) -> NotificationId {
    match event {
        PushEvent::Received(payload) => store.ingest_raw(payload.into_raw()).await,
        PushEvent::Tapped(payload) => {
            let notification = payload.into_notification(Utc::now());
            let route = detail_route(role, &notification);
            let id = store.ingest(notification).await;
            tracing::info!("Opening {}", route.path);
            navigator.navigate(route);
            id
        }
    }
}

/// Decode one serialized push event.
pub fn decode_event(payload: &[u8]) -> Result<PushEvent> {
    let event: PushEvent = serde_json::from_slice(payload)?;
    Ok(event)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::PushPayload;
    use crate::route::Route;
    use notify_store::testing::FakeBackend;
    use serde_json::json;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingNavigator {
        routes: Mutex<Vec<Route>>,
    }

    impl Navigator for RecordingNavigator {
        fn navigate(&self, route: Route) {
            self.routes.lock().unwrap().push(route);
        }
    }

    fn payload(identifier: &str, kind: &str) -> PushPayload {
        PushPayload {
            identifier: identifier.to_string(),
            title: Some("Machine assigned".to_string()),
            body: Some("JCB 3DX assigned to you".to_string()),
            data: json!({"type": kind}).as_object().cloned().unwrap(),
        }
    }

    #[tokio::test]
    async fn received_and_tapped_flow_into_store() {
        let store = NotificationStore::new(Arc::new(FakeBackend::default()));
        let navigator = Arc::new(RecordingNavigator::default());
        let (tx, rx) = mpsc::channel(8);

        let consumer = tokio::spawn(run(rx, store.clone(), navigator.clone(), Role::Operator));

        tx.send(PushEvent::Received(payload("a", "machine_assign"))).await.unwrap();
        tx.send(PushEvent::Tapped(payload("b", "alert"))).await.unwrap();
        drop(tx);
        consumer.await.unwrap().unwrap();

        let ids: Vec<_> = store.snapshot().await.iter().map(|n| n.id().to_string()).collect();
        assert_eq!(ids, vec!["b", "a"]);

        let routes = navigator.routes.lock().unwrap();
        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].path, "/operator/notifications/b");
        assert_eq!(routes[0].notification.title(), "Machine assigned");
    }

    #[tokio::test]
    async fn duplicate_delivery_does_not_duplicate_entry() {
        let store = NotificationStore::new(Arc::new(FakeBackend::default()));
        let navigator = RecordingNavigator::default();

        let received = PushEvent::Received(payload("a", "invoice"));
        handle_event(&store, &navigator, Role::Owner, received).await;
        let tapped = PushEvent::Tapped(payload("a", "invoice"));
        handle_event(&store, &navigator, Role::Owner, tapped).await;

        assert_eq!(store.snapshot().await.len(), 1);
        assert_eq!(navigator.routes.lock().unwrap()[0].path, "/owner/notifications/a");
    }

    #[test]
    fn decodes_json_line() {
        let line = br#"{"event":"received","identifier":"z","data":{"type":"payment"}}"#;
        let event = decode_event(line).unwrap();
        assert!(matches!(event, PushEvent::Received(_)));
        assert!(decode_event(b"not json").is_err());
    }
}
