pub mod consumer;
pub mod events;
pub mod provider;
pub mod registration;
pub mod route;

pub use consumer::run;
pub use events::{PushEvent, PushPayload};
pub use provider::{ConfiguredPushProvider, PushProvider};
pub use registration::register_for_push;
pub use route::{detail_route, Navigator, Route};
