use chrono::Utc;
use notify_core::{
    Notification, NotificationBackend, NotificationId, NotifyContext, NotifyError, RawNotification,
    Result,
};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};
use tracing;

use crate::events::{Operation, StoreEvent};

const EVENT_CAPACITY: usize = 64;

#[derive(Default)]
struct CacheState {
    /// Display order: server order after a list, push arrivals at the front.
    entries: Vec<Notification>,
    /// Ids flipped to read locally whose server call has not completed.
    pending_reads: HashSet<NotificationId>,
    /// Generation of the most recently sent list request.
    issued: u64,
    /// Generation of the newest list response written into `entries`.
    applied: u64,
    /// Reads the server acknowledged, keyed by the `issued` generation at the
    /// time. A list sent at or before that generation may predate the read.
    confirmed_reads: HashMap<NotificationId, u64>,
    /// Same as `confirmed_reads`, for a successful mark-all-read.
    all_read_confirmed: Option<u64>,
}

impl CacheState {
    fn position(&self, id: &NotificationId) -> Option<usize> {
        self.entries.iter().position(|n| n.id() == id)
    }

    /// Whether a list sent at `generation` may not reflect a read of `id`.
    fn read_after(&self, id: &NotificationId, generation: u64) -> bool {
        self.pending_reads.contains(id)
            || self.all_read_confirmed.is_some_and(|g| g >= generation)
            || self.confirmed_reads.get(id).is_some_and(|g| *g >= generation)
    }

    /// Drop confirmations every future response already reflects.
    fn prune_confirmed(&mut self, generation: u64) {
        self.confirmed_reads.retain(|_, g| *g >= generation);
        if self.all_read_confirmed.is_some_and(|g| g < generation) {
            self.all_read_confirmed = None;
        }
    }
}

/// Process-wide notification cache backed by the REST API.
///
/// Every mutation goes through these methods. Clones share the same cache.
#[derive(Clone)]
pub struct NotificationStore {
    backend: Arc<dyn NotificationBackend>,
    state: Arc<RwLock<CacheState>>,
    events: broadcast::Sender<StoreEvent>,
}

impl NotificationStore {
    pub fn new(backend: Arc<dyn NotificationBackend>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            backend,
            state: Arc::new(RwLock::new(CacheState::default())),
            events,
        }
    }

    pub fn from_context(ctx: &NotifyContext) -> Self {
        Self::new(ctx.backend.clone())
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }

    fn emit(&self, event: StoreEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }

    fn report(&self, operation: Operation, err: &NotifyError) {
        tracing::warn!("Failed to {}: {}", operation, err);
        self.emit(StoreEvent::Failed {
            operation,
            message: err.user_message().to_string(),
        });
    }

    /// Fetch the current user's notifications and replace the cache with them.
    ///
    /// Order is whatever the server delivers. A notification read locally
    /// stays read if the response may have been produced before the server
    /// saw that read. A response older than one already applied is dropped.
    pub async fn list(&self) -> Result<Vec<Notification>> {
        let generation = {
            let mut state = self.state.write().await;
            state.issued += 1;
            state.issued
        };

        let records = match self.backend.list_notifications().await {
            Ok(r) => r,
            Err(e) => {
                self.report(Operation::List, &e);
                return Err(e);
            }
        };

        let now = Utc::now();
        let mut state = self.state.write().await;
        if generation < state.applied {
            tracing::debug!(
                "Dropping list response {} older than applied {}",
                generation,
                state.applied
            );
            return Ok(state.entries.clone());
        }

        let mut seen = HashSet::with_capacity(records.len());
        let mut entries = Vec::with_capacity(records.len());

        for raw in records {
            let mut notification = raw.normalize(now);
            if !seen.insert(notification.id().clone()) {
                tracing::debug!("Dropping duplicate notification {}", notification.id());
                continue;
            }
            if state.read_after(notification.id(), generation) {
                notification.mark_read();
            }
            entries.push(notification);
        }

        state.entries = entries;
        state.applied = generation;
        state.prune_confirmed(generation);
        let snapshot = state.entries.clone();
        drop(state);

        tracing::debug!("Notification cache refreshed with {} entries", snapshot.len());
        self.emit(StoreEvent::Refreshed {
            count: snapshot.len(),
        });
        Ok(snapshot)
    }

    /// Insert or merge a single notification, e.g. one delivered by push.
    ///
    /// A new id goes to the front. A known id keeps its cached fields and only
    /// picks up the read flag.
    pub async fn ingest(&self, notification: Notification) -> NotificationId {
        let id = notification.id().clone();
        let mut state = self.state.write().await;

        match state.position(&id) {
            Some(i) => {
                if notification.is_read() {
                    state.entries[i].mark_read();
                }
            }
            None => state.entries.insert(0, notification),
        }
        drop(state);

        self.emit(StoreEvent::Upserted(id.clone()));
        id
    }

    pub async fn ingest_raw(&self, raw: RawNotification) -> NotificationId {
        self.ingest(raw.normalize(Utc::now())).await
    }

    /// Mark one notification read. Already-read notifications are left alone
    /// and cause no server call.
    pub async fn mark_read(&self, id: &NotificationId) -> Result<()> {
        {
            let mut state = self.state.write().await;
            let i = state
                .position(id)
                .ok_or_else(|| NotifyError::NotFound(id.clone()))?;
            if !state.entries[i].mark_read() {
                return Ok(());
            }
            state.pending_reads.insert(id.clone());
        }
        self.emit(StoreEvent::Read(id.clone()));

        let result = self.backend.mark_read(id).await;
        {
            let mut state = self.state.write().await;
            state.pending_reads.remove(id);
            if result.is_ok() {
                let issued = state.issued;
                state.confirmed_reads.insert(id.clone(), issued);
            }
        }

        if let Err(e) = result {
            // The local flip stays; the next list() takes the server's word.
            self.report(Operation::MarkRead, &e);
            return Err(e);
        }
        Ok(())
    }

    pub async fn mark_all_read(&self) -> Result<()> {
        let flipped: Vec<NotificationId> = {
            let mut state = self.state.write().await;
            let flipped: Vec<NotificationId> = state
                .entries
                .iter_mut()
                .filter_map(|n| n.mark_read().then(|| n.id().clone()))
                .collect();
            state.pending_reads.extend(flipped.iter().cloned());
            flipped
        };
        self.emit(StoreEvent::AllRead);

        let result = self.backend.mark_all_read().await;
        {
            let mut state = self.state.write().await;
            for id in &flipped {
                state.pending_reads.remove(id);
            }
            if result.is_ok() {
                let issued = state.issued;
                state.all_read_confirmed = Some(issued);
            }
        }

        if let Err(e) = result {
            self.report(Operation::MarkAllRead, &e);
            return Err(e);
        }
        Ok(())
    }

    /// Delete on the server, then drop it from the cache. On failure the entry
    /// stays put.
    pub async fn delete(&self, id: &NotificationId) -> Result<()> {
        if let Err(e) = self.backend.delete(id).await {
            self.report(Operation::Delete, &e);
            return Err(e);
        }

        {
            let mut state = self.state.write().await;
            state.entries.retain(|n| n.id() != id);
            state.pending_reads.remove(id);
            state.confirmed_reads.remove(id);
        }
        self.emit(StoreEvent::Deleted(id.clone()));
        Ok(())
    }

    pub async fn get(&self, id: &NotificationId) -> Option<Notification> {
        let state = self.state.read().await;
        state.position(id).map(|i| state.entries[i].clone())
    }

    pub async fn contains(&self, id: &NotificationId) -> bool {
        self.state.read().await.position(id).is_some()
    }

    pub async fn snapshot(&self) -> Vec<Notification> {
        self.state.read().await.entries.clone()
    }

    pub async fn unread_count(&self) -> usize {
        self.state
            .read()
            .await
            .entries
            .iter()
            .filter(|n| !n.is_read())
            .count()
    }
}
