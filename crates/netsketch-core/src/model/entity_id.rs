// ── Core identity type ──
//
// Every node and link carries an EntityId. Fresh ids are random UUIDs,
// but any string read from a project file is accepted verbatim so hand
// edited documents keep their ids across a save.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Opaque, stable identifier for a node or link.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    /// Generate a fresh random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for EntityId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl From<String> for EntityId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_uuids_and_unique() {
        let a = EntityId::generate();
        let b = EntityId::generate();
        assert!(Uuid::parse_str(a.as_str()).is_ok());
        assert_ne!(a, b);
    }

    #[test]
    fn legacy_ids_are_kept_verbatim() {
        let id = EntityId::from("router-1");
        assert!(Uuid::parse_str(id.as_str()).is_err());
        assert_eq!(id.to_string(), "router-1");
    }

    #[test]
    fn entity_id_from_str() {
        let id: EntityId = "550e8400-e29b-41d4-a716-446655440000".parse().unwrap();
        assert_eq!(id.as_str(), "550e8400-e29b-41d4-a716-446655440000");
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = EntityId::from("n1");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"n1\"");
        let back: EntityId = serde_json::from_str("\"n1\"").unwrap();
        assert_eq!(back, id);
    }
}
