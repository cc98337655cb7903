use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

pub const DEFAULT_ICON: &str = "notifications";
pub const DEFAULT_COLOR: &str = "#607D8B";

/// Open set of notification types. Anything unrecognized lands in `Other`
/// and is styled with the default bell.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NotificationKind {
    WorkStart,
    WorkPause,
    WorkFinish,
    Invoice,
    MachineAssign,
    ClientAdd,
    SearchLead,
    Alert,
    Payment,
    Other(String),
}

impl NotificationKind {
    pub fn as_str(&self) -> &str {
        match self {
            NotificationKind::WorkStart => "work_start",
            NotificationKind::WorkPause => "work_pause",
            NotificationKind::WorkFinish => "work_finish",
            NotificationKind::Invoice => "invoice",
            NotificationKind::MachineAssign => "machine_assign",
            NotificationKind::ClientAdd => "client_add",
            NotificationKind::SearchLead => "search_lead",
            NotificationKind::Alert => "alert",
            NotificationKind::Payment => "payment",
            NotificationKind::Other(s) => s,
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            NotificationKind::WorkStart => "play-circle",
            NotificationKind::WorkPause => "pause-circle",
            NotificationKind::WorkFinish => "checkmark-done-circle",
            NotificationKind::Invoice => "document-text",
            NotificationKind::MachineAssign => "construct",
            NotificationKind::ClientAdd => "person-add",
            NotificationKind::SearchLead => "search",
            NotificationKind::Alert => "warning",
            NotificationKind::Payment => "wallet",
            NotificationKind::Other(_) => DEFAULT_ICON,
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            NotificationKind::WorkStart => "#4CAF50",
            NotificationKind::WorkPause => "#FF9800",
            NotificationKind::WorkFinish => "#2196F3",
            NotificationKind::Invoice => "#9C27B0",
            NotificationKind::MachineAssign => "#795548",
            NotificationKind::ClientAdd => "#00BCD4",
            NotificationKind::SearchLead => "#3F51B5",
            NotificationKind::Alert => "#F44336",
            NotificationKind::Payment => "#009688",
            NotificationKind::Other(_) => DEFAULT_COLOR,
        }
    }
}

impl From<&str> for NotificationKind {
    fn from(s: &str) -> Self {
        match s.trim() {
            "work_start" => NotificationKind::WorkStart,
            "work_pause" => NotificationKind::WorkPause,
            "work_finish" => NotificationKind::WorkFinish,
            "invoice" => NotificationKind::Invoice,
            "machine_assign" => NotificationKind::MachineAssign,
            "client_add" => NotificationKind::ClientAdd,
            "search_lead" => NotificationKind::SearchLead,
            "alert" => NotificationKind::Alert,
            "payment" => NotificationKind::Payment,
            other => NotificationKind::Other(other.to_string()),
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for NotificationKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for NotificationKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(NotificationKind::from(s.as_str()))
    }
}
