//! Identity types for todo-sync.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Globally unique identifier of a to-do record.
///
/// UUID v4, assigned once at creation and never changed. It is the only key
/// used to match records across devices.
///
/// Always serialized as the hyphenated string, in JSON and MessagePack alike.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TodoId(uuid::Uuid);

impl TodoId {
    /// Create a new random TodoId.
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }

    /// Get the inner UUID.
    pub fn as_uuid(&self) -> &uuid::Uuid {
        &self.0
    }

    /// First eight hex characters, for log lines and terminal output.
    pub fn short(&self) -> String {
        self.0.simple().to_string()[..8].to_string()
    }
}

impl Default for TodoId {
    fn default() -> Self {
        Self::new()
    }
}

impl FromStr for TodoId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        uuid::Uuid::parse_str(s).map(Self)
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for TodoId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for TodoId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

impl fmt::Debug for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TodoId({})", self.short())
    }
}

/// Which side of the device pair this process is.
///
/// Both roles run the same sync logic; the role only selects the name of the
/// durable blob so the two devices never share a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DeviceRole {
    /// Phone-class device.
    #[default]
    Primary,
    /// Wrist-worn companion device.
    Companion,
}

impl DeviceRole {
    /// File name of this role's persisted list.
    pub fn blob_name(&self) -> &'static str {
        match self {
            DeviceRole::Primary => "todos.json",
            DeviceRole::Companion => "watch_todos.json",
        }
    }

    /// The other side of the pair.
    pub fn peer(&self) -> Self {
        match self {
            DeviceRole::Primary => DeviceRole::Companion,
            DeviceRole::Companion => DeviceRole::Primary,
        }
    }
}

impl fmt::Display for DeviceRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceRole::Primary => write!(f, "primary"),
            DeviceRole::Companion => write!(f, "companion"),
        }
    }
}

impl FromStr for DeviceRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "primary" | "phone" => Ok(DeviceRole::Primary),
            "companion" | "watch" => Ok(DeviceRole::Companion),
            other => Err(format!("unknown device role: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn todo_id_is_uuid_v4() {
        let id = TodoId::new();
        assert_eq!(id.as_uuid().get_version_num(), 4);
    }

    #[test]
    fn todo_id_parse_roundtrip() {
        let id = TodoId::new();
        let parsed: TodoId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn todo_id_short_is_prefix() {
        let id = TodoId::new();
        assert_eq!(id.short().len(), 8);
        assert!(id.as_uuid().simple().to_string().starts_with(&id.short()));
    }

    #[test]
    fn todo_id_serializes_as_plain_string() {
        let id = TodoId::new();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id));
    }

    #[test]
    fn roles_never_share_a_blob() {
        assert_ne!(
            DeviceRole::Primary.blob_name(),
            DeviceRole::Companion.blob_name()
        );
    }

    #[test]
    fn role_peer_is_involution() {
        assert_eq!(DeviceRole::Primary.peer(), DeviceRole::Companion);
        assert_eq!(DeviceRole::Primary.peer().peer(), DeviceRole::Primary);
    }

    #[test]
    fn role_from_str_accepts_aliases() {
        assert_eq!("watch".parse::<DeviceRole>(), Ok(DeviceRole::Companion));
        assert_eq!("Primary".parse::<DeviceRole>(), Ok(DeviceRole::Primary));
        assert!("tablet".parse::<DeviceRole>().is_err());
    }
}
