pub mod backend;
pub mod config;
pub mod context;
pub mod error;
pub mod kind;
pub mod session;
pub mod time;
pub mod types;

pub use backend::NotificationBackend;
pub use config::{Config, Role};
pub use context::NotifyContext;
pub use error::{NotifyError, Result};
pub use kind::NotificationKind;
pub use session::Session;
pub use time::time_ago;
pub use types::{Notification, NotificationId, RawNotification};
