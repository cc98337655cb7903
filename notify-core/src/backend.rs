use async_trait::async_trait;

use crate::error::Result;
use crate::types::{NotificationId, RawNotification};

/// The REST backend as the client sees it. Records come back un-normalized so
/// that every record enters the cache through the same normalization step.
#[async_trait]
pub trait NotificationBackend: Send + Sync {
    async fn list_notifications(&self) -> Result<Vec<RawNotification>>;

    async fn mark_read(&self, id: &NotificationId) -> Result<()>;

    async fn mark_all_read(&self) -> Result<()>;

    async fn delete(&self, id: &NotificationId) -> Result<()>;

    async fn register_push_token(&self, token: &str) -> Result<()>;
}
