//! Topology model and editing engine shared by the netsketch CLI and TUI.
//!
//! This crate owns everything that is not presentation:
//!
//! - **[`TopologyStore`]**: the authoritative graph of [`Node`]s and
//!   [`Link`]s. Synchronous mutations that enforce the graph invariants
//!   (no dangling endpoints, no self-links, at most one link per unordered
//!   pair) and publish an `Arc<Topology>` snapshot on a `tokio::sync::watch`
//!   channel after each one.
//!
//! - **[`InteractionController`]**: the selection / drag / connect-then-
//!   confirm state machine. Hosts feed it [`Gesture`]s; it is the only
//!   thing that mutates the store in response to them. The transition
//!   table itself is the pure [`interaction::transition`] function.
//!
//! - **Policies**: [`ports`] (default port labels per device kind),
//!   [`policy`] (which services each operating system allows) and
//!   [`geometry`] (screen→canvas mapping, badge placement).
//!
//! - **[`codec`]**: the versioned JSON project document. Loads are atomic:
//!   a malformed file never reaches the store.
//!
//! - **[`analysis`]**: turns a topology into a review prompt for an
//!   external text generator and degrades every failure to a message.

pub mod analysis;
pub mod codec;
pub mod error;
pub mod geometry;
pub mod interaction;
pub mod model;
pub mod policy;
pub mod ports;
pub mod store;

// ── Primary re-exports ──────────────────────────────────────────────
pub use analysis::{TextGenerator, analyze_topology, build_prompt, describe_topology};
pub use codec::ProjectDocument;
pub use error::CoreError;
pub use geometry::{Point, ScreenTransform, map_to_canvas, point_along};
pub use interaction::{Gesture, InteractionController, InteractionState};
pub use ports::default_port_name;
pub use store::{NodeRemoval, SpawnPoint, TopologyStore};

// Re-export model types at the crate root for ergonomics.
pub use model::{
    DEFAULT_IP_ADDRESS, DEFAULT_SUBNET_MASK, DeviceKind, EntityId, Link, Node, NodeConfig,
    OperatingSystem, Service, Topology,
};
