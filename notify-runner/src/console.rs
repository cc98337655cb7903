use anyhow::Result;
use chrono::{Local, Utc};
use notify_push::consumer::decode_event;
use notify_push::{Navigator, PushEvent, Route};
use notify_store::{NotificationStore, StoreEvent};
use notify_view::{DetailContent, NotificationDetail, NotificationList};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing;

/// Hands tapped routes to the screen task.
pub struct ChannelNavigator {
    routes: mpsc::UnboundedSender<Route>,
}

impl ChannelNavigator {
    pub fn new(routes: mpsc::UnboundedSender<Route>) -> Self {
        Self { routes }
    }
}

impl Navigator for ChannelNavigator {
    fn navigate(&self, route: Route) {
        if self.routes.send(route).is_err() {
            tracing::debug!("Route dropped, screen task gone");
        }
    }
}

/// Stand-in for the OS push listener: one JSON `PushEvent` per stdin line.
pub async fn read_push_events(tx: mpsc::Sender<PushEvent>) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match decode_event(line.as_bytes()) {
            Ok(event) => {
                if tx.send(event).await.is_err() {
                    break;
                }
            }
            Err(e) => tracing::warn!("Ignoring malformed push event: {}", e),
        }
    }

    Ok(())
}

pub async fn open_routes(mut routes: mpsc::UnboundedReceiver<Route>, store: NotificationStore) {
    while let Some(route) = routes.recv().await {
        match NotificationDetail::mount_transient(store.clone(), route.notification).await {
            Ok(detail) => print_detail(&route.path, &detail).await,
            Err(e) => tracing::warn!("Could not open {}: {}", route.path, e),
        }
    }
}

/// Failed store operations become one-line toasts.
pub async fn show_toasts(store: NotificationStore) {
    let mut events = store.subscribe();
    loop {
        match events.recv().await {
            Ok(StoreEvent::Failed { operation, message }) => {
                println!("! {} ({})", message, operation);
            }
            Ok(_) => {}
            Err(tokio::sync::broadcast::error::RecvError::Lagged(n)) => {
                tracing::debug!("Toast listener skipped {} events", n);
            }
            Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
        }
    }
}

pub async fn print_list(list: &NotificationList) {
    let sections = list.sections(&Local::now()).await;
    println!("Notifications ({} unread)", list.unread_count().await);

    if sections.is_empty() {
        println!("  No notifications yet");
        return;
    }

    for section in sections {
        println!("{}", section.title);
        for row in section.rows {
            let marker = if row.unread { "*" } else { " " };
            println!(
                " {} [{}] {} - {} ({})",
                marker, row.icon, row.title, row.body, row.time_ago
            );
        }
    }
}

async fn print_detail(path: &str, detail: &NotificationDetail) {
    let model = match detail.render(Utc::now()).await {
        Some(m) => m,
        None => return,
    };

    println!("-> {}", path);
    println!("[{}] {} ({})", model.icon, model.title, model.time_ago);
    if !model.body.is_empty() {
        println!("{}", model.body);
    }
    match model.content {
        DetailContent::SearchLead(lead) => {
            println!("  District: {}", lead.district);
            println!("  Taluka: {}", lead.taluka);
            println!("  Searching for: {}", lead.search_query);
            println!("  [{}]", lead.action);
        }
        DetailContent::Fields(fields) => {
            for field in fields {
                println!("  {}: {}", field.label, field.value);
            }
        }
    }
}
