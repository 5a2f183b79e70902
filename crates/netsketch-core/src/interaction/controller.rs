// ── Interaction controller ──
//
// Owns the store and the interaction state. The only path by which user
// gestures mutate the graph.

use tokio::sync::watch;
use tracing::{debug, warn};

use super::state::{Effect, Gesture, InteractionState, transition};
use crate::error::CoreError;
use crate::geometry::{Point, ScreenTransform, map_to_canvas};
use crate::model::{DeviceKind, EntityId, Link, Node, NodeConfig, OperatingSystem, Service, Topology};
use crate::ports;
use crate::store::{NodeRemoval, TopologyStore};

/// Drives a [`TopologyStore`] from user gestures.
///
/// Structural rejections (duplicate or self link, unknown id) are logged
/// and swallowed; nothing here fails because of a stray click.
pub struct InteractionController {
    store: TopologyStore,
    state: InteractionState,
    /// Node being dragged, between a node press and pointer release.
    drag: Option<EntityId>,
    /// Last pointer position in canvas space, for the draft line.
    pointer: Option<Point>,
    transform: Option<ScreenTransform>,
    selection: watch::Sender<Option<EntityId>>,
}

impl InteractionController {
    pub fn new(store: TopologyStore) -> Self {
        let (selection, _) = watch::channel(None);
        Self {
            store,
            state: InteractionState::Idle,
            drag: None,
            pointer: None,
            transform: Some(ScreenTransform::IDENTITY),
            selection,
        }
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn store(&self) -> &TopologyStore {
        &self.store
    }

    pub fn topology(&self) -> &Topology {
        self.store.topology()
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn selection(&self) -> Option<&EntityId> {
        self.state.selection()
    }

    pub fn selected_node(&self) -> Option<&Node> {
        self.selection().and_then(|id| self.store.node(id))
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Subscribe to selection changes.
    pub fn subscribe_selection(&self) -> watch::Receiver<Option<EntityId>> {
        self.selection.subscribe()
    }

    /// Install the screen→canvas transform used for pointer mapping.
    /// `None` means the canvas is not laid out yet; pointer motion is then
    /// ignored.
    pub fn set_transform(&mut self, transform: Option<ScreenTransform>) {
        self.transform = transform;
    }

    // ── Gestures ─────────────────────────────────────────────────────

    /// Feed one gesture through the state machine. Returns the link when
    /// the gesture committed one.
    pub fn handle(&mut self, gesture: Gesture) -> Option<Link> {
        match &gesture {
            Gesture::PointerMove(screen) => {
                self.pointer_moved(*screen);
                return None;
            }
            Gesture::PointerRelease => {
                if let Some(id) = self.drag.take() {
                    debug!(node = %id, "drag ended");
                }
                return None;
            }
            // An empty-canvas press mid-drag belongs to the drag. Drags
            // only live in Idle or Selected.
            Gesture::PressCanvas if self.drag.is_some() => return None,
            _ => {}
        }

        let step = transition(&self.state, &gesture, self.store.topology());
        if step.state != self.state {
            debug!(from = ?self.state, to = ?step.state, ?gesture, "interaction transition");
        }
        self.set_state(step.state);
        if self.state.is_connecting() || self.state.is_pending() {
            if let Some(id) = self.drag.take() {
                debug!(node = %id, "drag abandoned");
            }
        }

        match step.effect {
            Some(Effect::BeginDrag(id)) => {
                debug!(node = %id, "drag started");
                self.drag = Some(id);
                None
            }
            Some(Effect::CreateLink {
                source,
                target,
                source_port,
                target_port,
            }) => match self.store.add_link(&source, &target, source_port, target_port) {
                Ok(link) => Some(link),
                Err(e) => {
                    warn!(error = %e, "link rejected");
                    None
                }
            },
            None => None,
        }
    }

    fn pointer_moved(&mut self, screen: Point) {
        let Some(canvas) = map_to_canvas(screen, self.transform.as_ref()) else {
            return;
        };
        self.pointer = Some(canvas);

        if let Some(id) = &self.drag {
            if let Err(e) = self.store.move_node(id, canvas.x, canvas.y) {
                debug!(error = %e, "drag target vanished");
                self.drag = None;
            }
        }
    }

    /// Source and pointer positions of the transient connect line.
    pub fn draft_line(&self) -> Option<(Point, Point)> {
        let InteractionState::Connecting { source } = &self.state else {
            return None;
        };
        let from = self.store.node(source)?.position();
        Some((from, self.pointer?))
    }

    /// Port dialog prefill for both ends of a pending link.
    ///
    /// Each default is indexed by how many links the node already has.
    pub fn pending_port_defaults(&self) -> Option<(String, String)> {
        let InteractionState::PendingPortConfirmation { source, target } = &self.state else {
            return None;
        };
        let topology = self.store.topology();
        let suggest = |id: &EntityId| {
            let node = topology.node(id)?;
            Some(ports::default_port_name(node.kind, topology.links_of(id).count()))
        };
        Some((suggest(source)?, suggest(target)?))
    }

    /// Select `id` outright (keyboard cycling). Ignored while a
    /// connection is in progress or when the node is unknown.
    pub fn select(&mut self, id: &EntityId) -> bool {
        if self.state.is_connecting() || self.state.is_pending() {
            return false;
        }
        if !self.store.topology().contains_node(id) {
            return false;
        }
        self.set_state(InteractionState::Selected(id.clone()));
        true
    }

    // ── Editing commands ─────────────────────────────────────────────

    /// Add a device and select it. Any connection attempt in progress is
    /// abandoned.
    pub fn add_device(&mut self, kind: DeviceKind) -> Node {
        let node = self.store.add_node(kind);
        self.drag = None;
        self.set_state(InteractionState::Selected(node.id.clone()));
        node
    }

    /// Same as [`add_device`](Self::add_device), at an explicit position.
    pub fn add_device_at(&mut self, kind: DeviceKind, position: Point) -> Result<Node, CoreError> {
        let node = self.store.add_node_at(kind, position)?;
        self.drag = None;
        self.set_state(InteractionState::Selected(node.id.clone()));
        Ok(node)
    }

    /// Delete a node with its links, clearing any state that refers to it.
    pub fn delete_node(&mut self, id: &EntityId) -> Result<NodeRemoval, CoreError> {
        let removal = self.store.delete_node(id)?;
        if self.state.references(id) {
            self.set_state(InteractionState::Idle);
        }
        if self.drag.as_ref() == Some(id) {
            self.drag = None;
        }
        Ok(removal)
    }

    /// Delete whatever is selected. `None` when nothing was.
    pub fn delete_selected(&mut self) -> Option<NodeRemoval> {
        let id = self.selection()?.clone();
        self.delete_node(&id).ok()
    }

    pub fn move_node(&mut self, id: &EntityId, x: f64, y: f64) -> Result<(), CoreError> {
        self.store.move_node(id, x, y)
    }

    pub fn update_node_config(
        &mut self,
        id: &EntityId,
        config: NodeConfig,
    ) -> Result<Node, CoreError> {
        self.store.update_node_config(id, config)
    }

    pub fn set_operating_system(
        &mut self,
        id: &EntityId,
        os: OperatingSystem,
    ) -> Result<Vec<Service>, CoreError> {
        self.store.set_operating_system(id, os)
    }

    pub fn toggle_service(&mut self, id: &EntityId, service: Service) -> Result<bool, CoreError> {
        self.store.toggle_service(id, service)
    }

    pub fn remove_link(&mut self, id: &EntityId) -> Result<Link, CoreError> {
        self.store.remove_link(id)
    }

    /// Swap in a loaded graph. On error the current graph and state are
    /// untouched; on success the interaction resets to idle.
    pub fn load(&mut self, topology: Topology) -> Result<(), CoreError> {
        self.store.replace(topology)?;
        self.drag = None;
        self.pointer = None;
        self.set_state(InteractionState::Idle);
        Ok(())
    }

    // ── Private helpers ──────────────────────────────────────────────

    fn set_state(&mut self, state: InteractionState) {
        self.state = state;
        let selection = self.state.selection().cloned();
        self.selection.send_if_modified(|current| {
            if *current == selection {
                false
            } else {
                *current = selection;
                true
            }
        });
    }
}
