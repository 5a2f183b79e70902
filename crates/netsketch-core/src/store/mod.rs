// ── Topology store ──
//
// The single authoritative graph plus push-based change notification.

mod topology_store;

pub use topology_store::{NodeRemoval, SpawnPoint, TopologyStore};
