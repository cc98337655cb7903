use crate::types::NotificationId;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, NotifyError>;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("network error: {0}")]
    Network(String),

    #[error("backend returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to decode response: {0}")]
    Decode(String),

    #[error("no authenticated session")]
    Unauthenticated,

    #[error("notification {0} not found")]
    NotFound(NotificationId),

    #[error("push permission: {0}")]
    Permission(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl NotifyError {
    /// Short message suitable for a transient toast.
    pub fn user_message(&self) -> &'static str {
        match self {
            NotifyError::Network(_) => "Network error, please try again",
            NotifyError::Status { .. } | NotifyError::Decode(_) => "Something went wrong",
            NotifyError::Unauthenticated => "Please sign in again",
            NotifyError::NotFound(_) => "Notification no longer exists",
            NotifyError::Permission(_) => "Notifications are disabled",
            NotifyError::Config(_) => "App is misconfigured",
        }
    }
}
