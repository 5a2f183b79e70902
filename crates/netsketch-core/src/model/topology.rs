// ── Topology: the document root ──

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::entity_id::EntityId;
use super::link::Link;
use super::node::Node;
use crate::error::CoreError;
use crate::geometry::Point;

/// Ordered nodes and links. Insertion order is preserved everywhere.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Topology {
    pub nodes: Vec<Node>,
    pub links: Vec<Link>,
}

impl Topology {
    pub fn new(nodes: Vec<Node>, links: Vec<Link>) -> Self {
        Self { nodes, links }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.links.is_empty()
    }

    pub fn node(&self, id: &EntityId) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == *id)
    }

    pub fn contains_node(&self, id: &EntityId) -> bool {
        self.node(id).is_some()
    }

    /// Resolve a node by id first, then by exact display name.
    pub fn find_node(&self, identifier: &str) -> Option<&Node> {
        self.nodes
            .iter()
            .find(|n| n.id.as_str() == identifier)
            .or_else(|| self.nodes.iter().find(|n| n.config.name == identifier))
    }

    pub fn link(&self, id: &EntityId) -> Option<&Link> {
        self.links.iter().find(|l| l.id == *id)
    }

    /// The link joining `a` and `b` in either direction.
    pub fn link_between(&self, a: &EntityId, b: &EntityId) -> Option<&Link> {
        self.links.iter().find(|l| l.connects(a, b))
    }

    /// Links attached to `id`, in insertion order.
    pub fn links_of<'a>(&'a self, id: &'a EntityId) -> impl Iterator<Item = &'a Link> + 'a {
        self.links.iter().filter(move |l| l.touches(id))
    }

    /// Topmost node whose marker (a circle of `radius`) contains `point`.
    ///
    /// Later nodes are drawn over earlier ones, so the search runs backwards.
    pub fn node_at(&self, point: Point, radius: f64) -> Option<&Node> {
        self.nodes
            .iter()
            .rev()
            .find(|n| n.position().distance_to(point) <= radius)
    }

    /// Check the graph invariants: unique node ids with finite positions,
    /// links between two distinct existing nodes, and at most one link per
    /// unordered pair.
    pub fn validate(&self) -> Result<(), CoreError> {
        let mut node_ids = HashSet::with_capacity(self.nodes.len());
        for node in &self.nodes {
            if !node_ids.insert(&node.id) {
                return Err(CoreError::malformed(format!("duplicate node id {}", node.id)));
            }
            if !node.position().is_finite() {
                return Err(CoreError::malformed(format!(
                    "node {} has a non-finite position ({}, {})",
                    node.id, node.x, node.y
                )));
            }
        }

        let mut link_ids = HashSet::with_capacity(self.links.len());
        let mut pairs = HashSet::with_capacity(self.links.len());
        for link in &self.links {
            if !link_ids.insert(&link.id) {
                return Err(CoreError::malformed(format!("duplicate link id {}", link.id)));
            }
            for end in [&link.source_id, &link.target_id] {
                if !node_ids.contains(end) {
                    return Err(CoreError::malformed(format!(
                        "link {} references unknown node {end}",
                        link.id
                    )));
                }
            }
            if link.source_id == link.target_id {
                return Err(CoreError::malformed(format!(
                    "link {} connects node {} to itself",
                    link.id, link.source_id
                )));
            }
            let pair = if link.source_id < link.target_id {
                (&link.source_id, &link.target_id)
            } else {
                (&link.target_id, &link.source_id)
            };
            if !pairs.insert(pair) {
                return Err(CoreError::malformed(format!(
                    "duplicate link between {} and {}",
                    pair.0, pair.1
                )));
            }
        }
        Ok(())
    }
}
