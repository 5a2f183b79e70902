//! All possible UI actions. Actions are the sole mechanism for state mutation.

use std::sync::Arc;

use netsketch_core::{
    DeviceKind, EntityId, Gesture, InteractionState, NodeConfig, OperatingSystem, Point,
    ScreenTransform, Service, Topology,
};

/// Notification severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Error,
}

/// A toast notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
}

impl Notification {
    pub fn success(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Success,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Error,
        }
    }

    pub fn info(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Info,
        }
    }
}

/// Every state transition in the TUI is expressed as an Action.
#[derive(Debug, Clone)]
pub enum Action {
    // ── Lifecycle ──────────────────────────────────────────────────
    Quit,
    Tick,
    Resize(u16, u16),

    // ── Data Events (from the store's watch channels) ─────────────
    TopologyUpdated(Arc<Topology>),
    SelectionChanged(Option<EntityId>),

    // ── Canvas ────────────────────────────────────────────────────
    Gesture(Gesture),
    /// Controller state after a gesture, with the connect draft line
    /// (source, pointer) in canvas space.
    InteractionChanged {
        state: InteractionState,
        draft: Option<(Point, Point)>,
    },
    ViewportChanged(ScreenTransform),
    AddDevice(DeviceKind),
    CycleSelection,
    DeleteSelected,

    // ── Node properties ───────────────────────────────────────────
    SetOperatingSystem(EntityId, OperatingSystem),
    ToggleService(EntityId, Service),
    UpdateNodeConfig(EntityId, NodeConfig),
    OpenEditor,

    // ── Project ───────────────────────────────────────────────────
    Save,
    Reload,
    Analyze,
    AnalysisFinished(String),
    DismissReport,

    // ── Help ──────────────────────────────────────────────────────
    ToggleHelp,
}
