use notify_core::{Notification, Role};

/// Navigation target for a tapped push. The notification travels with the
/// route; the detail screen does not refetch it.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub path: String,
    pub notification: Notification,
}

pub fn detail_route(role: Role, notification: &Notification) -> Route {
    Route {
        path: format!("/{}/notifications/{}", role.as_str(), notification.id()),
        notification: notification.clone(),
    }
}

pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}
