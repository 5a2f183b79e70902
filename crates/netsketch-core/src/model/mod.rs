// ── Domain model ──
//
// Canonical types shared by the store, the canvas controller, the
// codec, and every front end.

mod device;
mod entity_id;
mod link;
mod node;
mod topology;

pub use device::{DeviceKind, OperatingSystem, Service};
pub use entity_id::EntityId;
pub use link::Link;
pub use node::{DEFAULT_IP_ADDRESS, DEFAULT_SUBNET_MASK, Node, NodeConfig};
pub use topology::Topology;
