use async_trait::async_trait;
use notify_core::config::ApiConfig;
use notify_core::{
    NotificationBackend, NotificationId, NotifyError, RawNotification, Result, Session,
};
use reqwest::{header::AUTHORIZATION, Client, Method, RequestBuilder};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing;

/// Pull the record array out of a list response: a bare array, or one
/// wrapped under `data` or `notifications`.
fn list_items(body: Value) -> Result<Vec<Value>> {
    match body {
        Value::Array(items) => Ok(items),
        Value::Object(mut obj) => {
            let wrapped = obj.remove("data").or_else(|| obj.remove("notifications"));
            match wrapped {
                Some(Value::Array(items)) => Ok(items),
                _ => Err(NotifyError::Decode(
                    "list response has no notification array".to_string(),
                )),
            }
        }
        _ => Err(NotifyError::Decode("list response is not a JSON array or object".to_string())),
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RegisterPushRequest<'a> {
    push_token: &'a str,
}

/// REST binding for the notification endpoints.
#[derive(Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
    session: Session,
}

impl HttpBackend {
    pub fn new(config: &ApiConfig, session: Session) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| NotifyError::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let auth = self.session.authorization().ok_or(NotifyError::Unauthenticated)?;
        Ok(self.client.request(method, self.url(path)).header(AUTHORIZATION, auth))
    }

    /// Send and return the body of a 2xx response.
    async fn send(&self, builder: RequestBuilder) -> Result<String> {
        let response = builder
            .send()
            .await
            .map_err(|e| NotifyError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| NotifyError::Network(e.to_string()))?;

        if !status.is_success() {
            tracing::debug!("Backend responded {} with body: {}", status, body);
            return Err(NotifyError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(body)
    }
}

#[async_trait]
impl NotificationBackend for HttpBackend {
    async fn list_notifications(&self) -> Result<Vec<RawNotification>> {
        let body = self.send(self.request(Method::GET, "/notifications")?).await?;
        let parsed: Value =
            serde_json::from_str(&body).map_err(|e| NotifyError::Decode(e.to_string()))?;

        let records: Vec<RawNotification> = list_items(parsed)?
            .into_iter()
            .filter_map(|item| {
                let record = RawNotification::from_value(&item);
                if record.is_none() {
                    tracing::warn!("Skipping notification record that is not an object: {}", item);
                }
                record
            })
            .collect();
        tracing::debug!("Fetched {} notifications", records.len());
        Ok(records)
    }

    async fn mark_read(&self, id: &NotificationId) -> Result<()> {
        let path = format!("/notifications/{}/read", id);
        self.send(self.request(Method::POST, &path)?).await?;
        Ok(())
    }

    async fn mark_all_read(&self) -> Result<()> {
        self.send(self.request(Method::POST, "/notifications/read-all")?)
            .await?;
        Ok(())
    }

    async fn delete(&self, id: &NotificationId) -> Result<()> {
        let path = format!("/notifications/{}", id);
        self.send(self.request(Method::DELETE, &path)?).await?;
        Ok(())
    }

    async fn register_push_token(&self, token: &str) -> Result<()> {
        let builder = self
            .request(Method::POST, "/push/register")?
            .json(&RegisterPushRequest { push_token: token });
        self.send(builder).await?;
        tracing::info!("Registered push token with backend");
        Ok(())
    }
}
