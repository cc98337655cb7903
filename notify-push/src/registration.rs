use notify_core::config::PermissionStatus;
use notify_core::{NotificationBackend, NotifyContext, Session};
use tracing;

use crate::provider::PushProvider;

/// Obtain a push token and hand it to the backend.
///
/// Runs once per app start while the session is authenticated. Every failure
/// ends quietly: no token on denial or token error, and a backend rejection is
/// only logged. The token is returned whenever one was obtained.
pub async fn register_for_push(
    session: &Session,
    provider: &dyn PushProvider,
    backend: &dyn NotificationBackend,
) -> Option<String> {
    if !session.is_authenticated() {
        tracing::debug!("Skipping push registration, session not authenticated");
        return None;
    }

    let mut permission = provider.permission_status().await;
    if permission != PermissionStatus::Granted {
        permission = provider.request_permission().await;
    }
    if permission != PermissionStatus::Granted {
        tracing::debug!("Push permission not granted ({:?})", permission);
        return None;
    }

    let token = match provider.push_token().await {
        Ok(t) => t,
        Err(e) => {
            tracing::warn!("Could not obtain push token: {}", e);
            return None;
        }
    };

    if let Err(e) = backend.register_push_token(&token).await {
        tracing::warn!("Push token registration failed: {}", e);
    }

    Some(token)
}

pub async fn register(ctx: &NotifyContext, provider: &dyn PushProvider) -> Option<String> {
    register_for_push(&ctx.session, provider, ctx.backend.as_ref()).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::ConfiguredPushProvider;
    use notify_core::config::PushConfig;
    use notify_store::testing::{Call, FailOn, FakeBackend};

    fn provider(permission: PermissionStatus, token: Option<&str>) -> ConfiguredPushProvider {
        ConfiguredPushProvider::new(&PushConfig {
            enabled: true,
            permission,
            device_token: token.map(str::to_string),
        })
    }

    fn session() -> Session {
        Session::new(Some("opaque-session".to_string()))
    }

    #[tokio::test]
    async fn registers_token_with_backend() {
        let backend = FakeBackend::default();
        let token = register_for_push(
            &session(),
            &provider(PermissionStatus::Undetermined, Some("ExponentPushToken[a]")),
            &backend,
        )
        .await;

        assert_eq!(token.as_deref(), Some("ExponentPushToken[a]"));
        assert_eq!(
            backend.calls(),
            vec![Call::RegisterPush("ExponentPushToken[a]".to_string())]
        );
    }

    #[tokio::test]
    async fn unauthenticated_session_does_nothing() {
        let backend = FakeBackend::default();
        let token = register_for_push(
            &Session::anonymous(),
            &provider(PermissionStatus::Granted, Some("tok")),
            &backend,
        )
        .await;

        assert!(token.is_none());
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn permission_denied_returns_without_token() {
        let backend = FakeBackend::default();
        let denied = provider(PermissionStatus::Denied, Some("tok"));
        let token = register_for_push(&session(), &denied, &backend).await;

        assert!(token.is_none());
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn backend_failure_is_swallowed() {
        let backend = FakeBackend::default();
        backend.fail(FailOn::RegisterPush);

        let granted = provider(PermissionStatus::Granted, Some("tok"));
        let token = register_for_push(&session(), &granted, &backend).await;

        assert_eq!(token.as_deref(), Some("tok"));
        assert_eq!(backend.calls().len(), 1);
    }
}
