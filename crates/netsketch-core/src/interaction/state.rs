//! Pure transition table for the connect-then-confirm state machine.
//!
//! [`transition`] never mutates anything: it reads the current state, the
//! incoming [`Gesture`] and the graph, and returns the next state plus at
//! most one [`Effect`] for the controller to apply.

use crate::geometry::Point;
use crate::model::{EntityId, Topology};
use crate::ports;

/// Where the canvas interaction currently stands.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum InteractionState {
    /// Nothing selected.
    #[default]
    Idle,
    Selected(EntityId),
    /// The next node press names the link target.
    Connecting {
        source: EntityId,
    },
    /// Both endpoints chosen; waiting on the port dialog.
    PendingPortConfirmation {
        source: EntityId,
        target: EntityId,
    },
}

impl InteractionState {
    /// The node the user is focused on, if any. While connecting this is
    /// the link source.
    pub fn selection(&self) -> Option<&EntityId> {
        match self {
            Self::Idle => None,
            Self::Selected(id)
            | Self::Connecting { source: id }
            | Self::PendingPortConfirmation { source: id, .. } => Some(id),
        }
    }

    pub fn is_connecting(&self) -> bool {
        matches!(self, Self::Connecting { .. })
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Self::PendingPortConfirmation { .. })
    }

    /// Whether the state refers to `id` anywhere.
    pub fn references(&self, id: &EntityId) -> bool {
        match self {
            Self::Idle => false,
            Self::Selected(a) | Self::Connecting { source: a } => a == id,
            Self::PendingPortConfirmation { source, target } => source == id || target == id,
        }
    }
}

/// A user gesture, already resolved to node hits by the host UI.
#[derive(Debug, Clone, PartialEq)]
pub enum Gesture {
    /// Pointer pressed on a node.
    PressNode(EntityId),
    /// Pointer pressed on empty canvas.
    PressCanvas,
    /// Pointer moved, in screen coordinates.
    PointerMove(Point),
    PointerRelease,
    /// The "connect" control or key.
    InvokeConnect,
    Escape,
    /// Port dialog confirmed. Empty labels become the fallback label.
    ConfirmPorts {
        source_port: String,
        target_port: String,
    },
    CancelPorts,
}

/// Side effect requested by a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Start dragging this node.
    BeginDrag(EntityId),
    /// Append a link to the store.
    CreateLink {
        source: EntityId,
        target: EntityId,
        source_port: String,
        target_port: String,
    },
}

/// Result of feeding one gesture to the machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub state: InteractionState,
    pub effect: Option<Effect>,
}

impl Transition {
    fn to(state: InteractionState) -> Self {
        Self {
            state,
            effect: None,
        }
    }

    fn with(state: InteractionState, effect: Effect) -> Self {
        Self {
            state,
            effect: Some(effect),
        }
    }
}

/// Compute the next state for `gesture`.
///
/// Pointer move and release never change the state; dragging and the
/// draft line are tracked by the controller on top of this table.
pub fn transition(state: &InteractionState, gesture: &Gesture, topology: &Topology) -> Transition {
    use InteractionState as S;

    let unchanged = || Transition::to(state.clone());

    match (state, gesture) {
        // ── Pressing a node ──
        (S::Idle | S::Selected(_), Gesture::PressNode(id)) => {
            if topology.contains_node(id) {
                Transition::with(S::Selected(id.clone()), Effect::BeginDrag(id.clone()))
            } else {
                unchanged()
            }
        }
        (S::Connecting { source }, Gesture::PressNode(target)) => {
            if source == target {
                // Re-clicking the source cancels.
                Transition::to(S::Idle)
            } else if !topology.contains_node(target)
                || topology.link_between(source, target).is_some()
            {
                unchanged()
            } else {
                Transition::to(S::PendingPortConfirmation {
                    source: source.clone(),
                    target: target.clone(),
                })
            }
        }

        // ── Pressing empty canvas ──
        (S::Selected(_) | S::Connecting { .. }, Gesture::PressCanvas) => Transition::to(S::Idle),

        // ── Connect mode ──
        (S::Selected(id), Gesture::InvokeConnect) => {
            if topology.contains_node(id) {
                Transition::to(S::Connecting { source: id.clone() })
            } else {
                Transition::to(S::Idle)
            }
        }

        // ── Escape ──
        (_, Gesture::Escape) => Transition::to(S::Idle),

        // ── Port dialog ──
        (
            S::PendingPortConfirmation { source, target },
            Gesture::ConfirmPorts {
                source_port,
                target_port,
            },
        ) => Transition::with(
            S::Idle,
            Effect::CreateLink {
                source: source.clone(),
                target: target.clone(),
                source_port: ports::normalize_port_label(source_port),
                target_port: ports::normalize_port_label(target_port),
            },
        ),
        (S::PendingPortConfirmation { .. }, Gesture::CancelPorts) => Transition::to(S::Idle),

        // Everything else (presses while the port dialog is open, pointer
        // motion, stray confirmations) leaves the state alone.
        _ => unchanged(),
    }
}
