// ── Authoritative in-memory topology ──
//
// Plain ordered vectors (graphs here are tens of nodes, not thousands)
// with a `watch` channel carrying an immutable snapshot. Every public
// mutation publishes exactly one snapshot, so observers never see a
// half-applied cascade.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, warn};

use crate::error::CoreError;
use crate::geometry::Point;
use crate::model::{DeviceKind, EntityId, Link, Node, NodeConfig, OperatingSystem, Service, Topology};
use crate::policy;

/// Where new devices appear on the canvas.
///
/// Consecutive devices are staggered diagonally by `step`, wrapping
/// after `cycle` placements, so they never stack exactly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnPoint {
    pub origin: Point,
    pub step: f64,
    pub cycle: usize,
}

impl Default for SpawnPoint {
    fn default() -> Self {
        Self {
            origin: Point::new(150.0, 150.0),
            step: 10.0,
            cycle: 5,
        }
    }
}

impl SpawnPoint {
    #[allow(clippy::cast_precision_loss, clippy::as_conversions)]
    fn position_for(&self, ordinal: usize) -> Point {
        let slot = ordinal % self.cycle.max(1);
        let offset = self.step * slot as f64;
        let position = Point::new(self.origin.x + offset, self.origin.y + offset);
        if position.is_finite() {
            position
        } else {
            self.origin
        }
    }

    fn is_finite(&self) -> bool {
        self.origin.is_finite() && self.step.is_finite()
    }
}

fn ensure_finite(position: Point) -> Result<Point, CoreError> {
    if position.is_finite() {
        Ok(position)
    } else {
        Err(CoreError::NonFiniteCoordinate {
            x: position.x,
            y: position.y,
        })
    }
}

/// What a cascading delete removed.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeRemoval {
    pub node: Node,
    pub links: Vec<Link>,
}

/// The authoritative graph. Synchronous, single writer.
pub struct TopologyStore {
    topology: Topology,
    spawn: SpawnPoint,

    /// Version counter, bumped on every mutation.
    version: watch::Sender<u64>,

    /// Full snapshot, rebuilt on mutation for subscribers.
    snapshot: watch::Sender<Arc<Topology>>,
}

impl Default for TopologyStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TopologyStore {
    pub fn new() -> Self {
        Self::with_spawn(SpawnPoint::default())
    }

    /// Store placing new devices per `spawn`. A spawn point with a
    /// non-finite origin or step falls back to the default.
    pub fn with_spawn(spawn: SpawnPoint) -> Self {
        let spawn = if spawn.is_finite() {
            spawn
        } else {
            warn!(?spawn, "non-finite spawn point, using default");
            SpawnPoint::default()
        };
        let (version, _) = watch::channel(0u64);
        let (snapshot, _) = watch::channel(Arc::new(Topology::default()));
        Self {
            topology: Topology::default(),
            spawn,
            version,
            snapshot,
        }
    }

    // ── Reads ────────────────────────────────────────────────────────

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    pub fn nodes(&self) -> &[Node] {
        &self.topology.nodes
    }

    pub fn links(&self) -> &[Link] {
        &self.topology.links
    }

    pub fn node(&self, id: &EntityId) -> Option<&Node> {
        self.topology.node(id)
    }

    pub fn spawn(&self) -> SpawnPoint {
        self.spawn
    }

    pub fn version(&self) -> u64 {
        *self.version.borrow()
    }

    /// Current snapshot (cheap `Arc` clone).
    pub fn snapshot(&self) -> Arc<Topology> {
        self.snapshot.borrow().clone()
    }

    /// Subscribe to snapshot changes.
    pub fn subscribe(&self) -> watch::Receiver<Arc<Topology>> {
        self.snapshot.subscribe()
    }

    // ── Node mutations ───────────────────────────────────────────────

    /// Place a new `kind` device at the next spawn position.
    pub fn add_node(&mut self, kind: DeviceKind) -> Node {
        let position = self.spawn.position_for(self.topology.nodes.len());
        self.insert_node(kind, position)
    }

    /// Place a new `kind` device at `position`.
    pub fn add_node_at(&mut self, kind: DeviceKind, position: Point) -> Result<Node, CoreError> {
        let position = ensure_finite(position)?;
        Ok(self.insert_node(kind, position))
    }

    pub fn move_node(&mut self, id: &EntityId, x: f64, y: f64) -> Result<(), CoreError> {
        let position = ensure_finite(Point::new(x, y))?;
        let node = self.node_mut(id)?;
        node.x = position.x;
        node.y = position.y;
        self.publish();
        Ok(())
    }

    /// Replace a node's configuration. An OS change filters services
    /// through the policy before the config is stored.
    pub fn update_node_config(
        &mut self,
        id: &EntityId,
        mut config: NodeConfig,
    ) -> Result<Node, CoreError> {
        let node = self.node_mut(id)?;
        if config.os != node.config.os {
            let os = config.operating_system();
            let dropped = policy::apply_os_change(&mut config, os);
            if !dropped.is_empty() {
                debug!(node = %id, ?dropped, "services dropped by OS change");
            }
        }
        node.config = config;
        let updated = node.clone();
        self.publish();
        Ok(updated)
    }

    /// Change a node's OS. Returns the services that were dropped.
    pub fn set_operating_system(
        &mut self,
        id: &EntityId,
        os: OperatingSystem,
    ) -> Result<Vec<Service>, CoreError> {
        let node = self.node_mut(id)?;
        let dropped = policy::apply_os_change(&mut node.config, os);
        debug!(node = %id, %os, ?dropped, "operating system changed");
        self.publish();
        Ok(dropped)
    }

    /// Flip one service on a node. Returns whether it is now selected.
    pub fn toggle_service(&mut self, id: &EntityId, service: Service) -> Result<bool, CoreError> {
        let node = self.node_mut(id)?;
        let selected = policy::toggle_service(&mut node.config, service);
        self.publish();
        Ok(selected)
    }

    /// Remove a node and every link touching it, as one mutation.
    pub fn delete_node(&mut self, id: &EntityId) -> Result<NodeRemoval, CoreError> {
        let idx = self
            .topology
            .nodes
            .iter()
            .position(|n| n.id == *id)
            .ok_or_else(|| CoreError::node_not_found(id))?;
        let node = self.topology.nodes.remove(idx);

        let (removed, kept): (Vec<Link>, Vec<Link>) = std::mem::take(&mut self.topology.links)
            .into_iter()
            .partition(|l| l.touches(id));
        self.topology.links = kept;

        debug!(node = %id, links = removed.len(), "node deleted");
        self.publish();
        Ok(NodeRemoval {
            node,
            links: removed,
        })
    }

    // ── Link mutations ───────────────────────────────────────────────

    /// Append a link. Refuses self-links, unknown endpoints, and a
    /// second link between the same unordered pair.
    pub fn add_link(
        &mut self,
        source_id: &EntityId,
        target_id: &EntityId,
        source_port: impl Into<String>,
        target_port: impl Into<String>,
    ) -> Result<Link, CoreError> {
        if source_id == target_id {
            return Err(CoreError::SelfLink {
                id: source_id.clone(),
            });
        }
        for end in [source_id, target_id] {
            if !self.topology.contains_node(end) {
                return Err(CoreError::node_not_found(end));
            }
        }
        if self.topology.link_between(source_id, target_id).is_some() {
            return Err(CoreError::DuplicateLink {
                source_id: source_id.clone(),
                target_id: target_id.clone(),
            });
        }

        let link = Link {
            id: EntityId::generate(),
            source_id: source_id.clone(),
            target_id: target_id.clone(),
            source_port: source_port.into(),
            target_port: target_port.into(),
        };
        debug!(
            link = %link.id,
            source = %link.source_id,
            target = %link.target_id,
            "link added"
        );
        self.topology.links.push(link.clone());
        self.publish();
        Ok(link)
    }

    pub fn remove_link(&mut self, id: &EntityId) -> Result<Link, CoreError> {
        let idx = self
            .topology
            .links
            .iter()
            .position(|l| l.id == *id)
            .ok_or_else(|| CoreError::link_not_found(id))?;
        let link = self.topology.links.remove(idx);
        debug!(link = %id, "link removed");
        self.publish();
        Ok(link)
    }

    // ── Bulk replace ─────────────────────────────────────────────────

    /// Swap in a whole new graph (used by load). Nothing changes if the
    /// new graph breaks an invariant.
    pub fn replace_all(&mut self, nodes: Vec<Node>, links: Vec<Link>) -> Result<(), CoreError> {
        self.replace(Topology::new(nodes, links))
    }

    pub fn replace(&mut self, topology: Topology) -> Result<(), CoreError> {
        topology.validate()?;
        debug!(
            nodes = topology.nodes.len(),
            links = topology.links.len(),
            "topology replaced"
        );
        self.topology = topology;
        self.publish();
        Ok(())
    }

    // ── Private helpers ──────────────────────────────────────────────

    fn insert_node(&mut self, kind: DeviceKind, position: Point) -> Node {
        let name = format!("{kind}-{}", self.topology.nodes.len() + 1);
        let node = Node {
            id: EntityId::generate(),
            kind,
            x: position.x,
            y: position.y,
            config: NodeConfig::for_kind(kind, name),
        };
        debug!(node = %node.id, ?kind, name = %node.config.name, "node added");
        self.topology.nodes.push(node.clone());
        self.publish();
        node
    }

    fn node_mut(&mut self, id: &EntityId) -> Result<&mut Node, CoreError> {
        self.topology
            .nodes
            .iter_mut()
            .find(|n| n.id == *id)
            .ok_or_else(|| CoreError::node_not_found(id))
    }

    /// Rebuild the snapshot and bump the version.
    fn publish(&self) {
        let snapshot = Arc::new(self.topology.clone());
        // `send_modify` updates unconditionally, even with zero receivers.
        self.snapshot.send_modify(|snap| *snap = snapshot);
        self.version.send_modify(|v| *v += 1);
    }
}
