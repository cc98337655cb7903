pub mod events;
pub mod store;

#[cfg(any(test, feature = "test-util"))]
pub mod testing;

pub use events::{Operation, StoreEvent};
pub use store::NotificationStore;
