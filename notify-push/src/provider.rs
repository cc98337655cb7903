use async_trait::async_trait;
use notify_core::config::{PermissionStatus, PushConfig};
use notify_core::{NotifyError, Result};
use std::sync::Mutex;
use tracing;

/// The OS push service: permission prompt and device token.
#[async_trait]
pub trait PushProvider: Send + Sync {
    async fn permission_status(&self) -> PermissionStatus;

    /// Prompt the user if the platform still allows it. Returns the outcome.
    async fn request_permission(&self) -> PermissionStatus;

    async fn push_token(&self) -> Result<String>;
}

/// Provider whose permission answer and token come from configuration.
pub struct ConfiguredPushProvider {
    permission: Mutex<PermissionStatus>,
    token: Option<String>,
}

impl ConfiguredPushProvider {
    pub fn new(config: &PushConfig) -> Self {
        let permission = if config.enabled {
            tracing::info!("Push provider initialized (permission: {:?})", config.permission);
            config.permission
        } else {
            tracing::warn!("Push notifications disabled (PUSH_ENABLED=false)");
            PermissionStatus::Denied
        };

        Self {
            permission: Mutex::new(permission),
            token: config.device_token.clone(),
        }
    }

    fn current(&self) -> PermissionStatus {
        *self.permission.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl PushProvider for ConfiguredPushProvider {
    async fn permission_status(&self) -> PermissionStatus {
        self.current()
    }

    async fn request_permission(&self) -> PermissionStatus {
        let mut permission = self.permission.lock().unwrap_or_else(|e| e.into_inner());
        // The prompt is answered once; a device with a token said yes.
        if *permission == PermissionStatus::Undetermined {
            *permission = if self.token.is_some() {
                PermissionStatus::Granted
            } else {
                PermissionStatus::Denied
            };
        }
        *permission
    }

    async fn push_token(&self) -> Result<String> {
        if self.current() != PermissionStatus::Granted {
            return Err(NotifyError::Permission("not granted".to_string()));
        }
        self.token
            .clone()
            .ok_or_else(|| NotifyError::Permission("no push token available".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(enabled: bool, permission: PermissionStatus, token: Option<&str>) -> PushConfig {
        PushConfig {
            enabled,
            permission,
            device_token: token.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn undetermined_with_token_is_granted_on_request() {
        let provider =
            ConfiguredPushProvider::new(&config(true, PermissionStatus::Undetermined, Some("tok")));
        assert_eq!(provider.permission_status().await, PermissionStatus::Undetermined);
        assert_eq!(provider.request_permission().await, PermissionStatus::Granted);
        assert_eq!(provider.push_token().await.unwrap(), "tok");
    }

    #[tokio::test]
    async fn denied_stays_denied() {
        let provider =
            ConfiguredPushProvider::new(&config(true, PermissionStatus::Denied, Some("tok")));
        assert_eq!(provider.request_permission().await, PermissionStatus::Denied);
        assert!(provider.push_token().await.is_err());
    }

    #[tokio::test]
    async fn disabled_push_is_denied() {
        let provider =
            ConfiguredPushProvider::new(&config(false, PermissionStatus::Granted, Some("tok")));
        assert_eq!(provider.permission_status().await, PermissionStatus::Denied);
    }
}
