mod console;

use anyhow::Result;
use notify_api::HttpBackend;
use notify_core::{Config, NotifyContext, Session};
use notify_push::registration::register;
use notify_push::{run as run_push, ConfiguredPushProvider};
use notify_store::NotificationStore;
use notify_view::NotificationList;
use std::sync::Arc;
use tokio;
use tokio::sync::mpsc;
use tracing;
use tracing_subscriber;

use crate::console::{open_routes, print_list, read_push_events, show_toasts, ChannelNavigator};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Starting notification client");

    // Load configuration
    let config = Config::from_env();
    let backend = HttpBackend::new(&config.api, Session::new(config.api.bearer_token.clone()))?;
    let ctx = NotifyContext::new(config, Arc::new(backend));
    let role = ctx.config.app.role;

    tracing::info!("Context initialized for {} app against {}", role, ctx.config.api.base_url);

    let store = NotificationStore::from_context(&ctx);
    tokio::spawn(show_toasts(store.clone()));

    // Push registration runs once per start while authenticated
    let provider = ConfiguredPushProvider::new(&ctx.config.push);
    match register(&ctx, &provider).await {
        Some(token) => tracing::info!("Push notifications enabled ({} chars token)", token.len()),
        None => tracing::info!("Push notifications not registered"),
    }

    let (event_tx, event_rx) = mpsc::channel(64);
    let (route_tx, route_rx) = mpsc::unbounded_channel();
    let navigator = Arc::new(ChannelNavigator::new(route_tx));

    let consumer = tokio::spawn(run_push(event_rx, store.clone(), navigator, role));
    let screens = tokio::spawn(open_routes(route_rx, store.clone()));
    tokio::spawn(async move {
        if let Err(e) = read_push_events(event_tx).await {
            tracing::error!("Push event reader error: {}", e);
        }
    });

    let list = NotificationList::new(store.clone(), ctx.config.app.page_size);
    if let Err(e) = list.load().await {
        tracing::warn!("Showing cached notifications, fetch failed: {}", e);
    }
    print_list(&list).await;

    // Runs until stdin closes. The consumer owns the navigator, so its exit
    // closes the route channel and lets the screen task drain.
    consumer.await??;
    screens.await?;

    print_list(&list).await;
    Ok(())
}
