// ── Link domain type ──

use serde::{Deserialize, Serialize};

use super::entity_id::EntityId;

/// A cable between two nodes, labelled at both ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    pub id: EntityId,
    pub source_id: EntityId,
    pub target_id: EntityId,
    pub source_port: String,
    pub target_port: String,
}

impl Link {
    /// Whether this link joins `a` and `b`, in either direction.
    pub fn connects(&self, a: &EntityId, b: &EntityId) -> bool {
        (self.source_id == *a && self.target_id == *b)
            || (self.source_id == *b && self.target_id == *a)
    }

    /// Whether either endpoint is `id`.
    pub fn touches(&self, id: &EntityId) -> bool {
        self.source_id == *id || self.target_id == *id
    }

    /// The endpoint opposite `id`, if `id` is an endpoint at all.
    pub fn other_end(&self, id: &EntityId) -> Option<&EntityId> {
        if self.source_id == *id {
            Some(&self.target_id)
        } else if self.target_id == *id {
            Some(&self.source_id)
        } else {
            None
        }
    }

    /// The port label on the `id` end.
    pub fn port_on(&self, id: &EntityId) -> Option<&str> {
        if self.source_id == *id {
            Some(&self.source_port)
        } else if self.target_id == *id {
            Some(&self.target_port)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link(a: &str, b: &str) -> Link {
        Link {
            id: EntityId::from("l1"),
            source_id: EntityId::from(a),
            target_id: EntityId::from(b),
            source_port: "eth0".into(),
            target_port: "Gi0/1".into(),
        }
    }

    #[test]
    fn connects_is_undirected() {
        let l = link("a", "b");
        assert!(l.connects(&"a".into(), &"b".into()));
        assert!(l.connects(&"b".into(), &"a".into()));
        assert!(!l.connects(&"a".into(), &"c".into()));
    }

    #[test]
    fn endpoint_helpers() {
        let l = link("a", "b");
        assert!(l.touches(&"b".into()));
        assert_eq!(l.other_end(&"a".into()), Some(&EntityId::from("b")));
        assert_eq!(l.port_on(&"b".into()), Some("Gi0/1"));
        assert_eq!(l.port_on(&"z".into()), None);
    }
}
