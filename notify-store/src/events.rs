use notify_core::NotificationId;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    List,
    MarkRead,
    MarkAllRead,
    Delete,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Operation::List => "list notifications",
            Operation::MarkRead => "mark notification read",
            Operation::MarkAllRead => "mark all notifications read",
            Operation::Delete => "delete notification",
        };
        f.write_str(s)
    }
}

/// Change feed published by the store. `Failed` is the non-blocking alert a
/// screen turns into a toast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    Refreshed { count: usize },
    Upserted(NotificationId),
    Read(NotificationId),
    AllRead,
    Deleted(NotificationId),
    Failed { operation: Operation, message: String },
}
