use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub api: ApiConfig,
    pub push: PushConfig,
    pub app: AppConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    pub bearer_token: Option<String>,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushConfig {
    pub enabled: bool,
    pub permission: PermissionStatus,
    pub device_token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub role: Role,
    pub page_size: usize,
}

/// OS-level notification permission as last reported by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionStatus {
    Granted,
    Denied,
    Undetermined,
}

impl FromStr for PermissionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "granted" => Ok(PermissionStatus::Granted),
            "denied" => Ok(PermissionStatus::Denied),
            "undetermined" => Ok(PermissionStatus::Undetermined),
            other => Err(format!("unknown permission status: {}", other)),
        }
    }
}

/// Which half of the mobile app the session belongs to. Drives detail routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Owner,
    Operator,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Owner => "owner",
            Role::Operator => "operator",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "owner" => Ok(Role::Owner),
            "operator" => Ok(Role::Operator),
            other => Err(format!("unknown role: {}", other)),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let _ = dotenv::dotenv();

        Config {
            api: ApiConfig {
                base_url: env::var("API_BASE_URL")
                    .unwrap_or_else(|_| "http://localhost:8080/api/v1".to_string()),
                bearer_token: env::var("API_TOKEN").ok().filter(|t| !t.trim().is_empty()),
                timeout_secs: env::var("API_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "15".to_string())
                    .parse()
                    .unwrap_or(15),
            },
            push: PushConfig {
                enabled: env::var("PUSH_ENABLED")
                    .map(|v| {
                        !matches!(v.trim().to_ascii_lowercase().as_str(), "0" | "false" | "no")
                    })
                    .unwrap_or(true),
                permission: env::var("PUSH_PERMISSION")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(PermissionStatus::Undetermined),
                device_token: env::var("PUSH_TOKEN").ok().filter(|t| !t.trim().is_empty()),
            },
            app: AppConfig {
                role: env::var("APP_ROLE")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(Role::Owner),
                page_size: env::var("PAGE_SIZE")
                    .unwrap_or_else(|_| "20".to_string())
                    .parse()
                    .ok()
                    .filter(|n: &usize| *n > 0)
                    .unwrap_or(20),
            },
        }
    }
}
