// ── Node domain types ──

use serde::{Deserialize, Serialize};

use super::device::{DeviceKind, OperatingSystem, Service};
use super::entity_id::EntityId;
use crate::geometry::Point;

/// Default address written into every freshly placed device.
pub const DEFAULT_IP_ADDRESS: &str = "192.168.1.1";
/// Default mask written into every freshly placed device.
pub const DEFAULT_SUBNET_MASK: &str = "255.255.255.0";

/// Per-device settings edited through the properties form.
///
/// Address fields are free-form strings; nothing here validates them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeConfig {
    pub name: String,
    pub ip_address: String,
    pub subnet_mask: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gateway: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub os: Option<OperatingSystem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub services: Option<Vec<Service>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vlan: Option<u32>,
}

impl NodeConfig {
    /// Defaults for a new device of `kind` named `name`.
    pub fn for_kind(kind: DeviceKind, name: String) -> Self {
        Self {
            name,
            ip_address: DEFAULT_IP_ADDRESS.into(),
            subnet_mask: DEFAULT_SUBNET_MASK.into(),
            gateway: None,
            os: Some(kind.default_os()),
            services: Some(Vec::new()),
            vlan: None,
        }
    }

    /// Effective operating system (absent means none).
    pub fn operating_system(&self) -> OperatingSystem {
        self.os.unwrap_or(OperatingSystem::None)
    }

    /// Selected services in insertion order.
    pub fn services(&self) -> &[Service] {
        self.services.as_deref().unwrap_or_default()
    }

    pub fn has_service(&self, service: Service) -> bool {
        self.services().contains(&service)
    }
}

/// A device placed on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: EntityId,
    #[serde(rename = "type")]
    pub kind: DeviceKind,
    pub x: f64,
    pub y: f64,
    pub config: NodeConfig,
}

impl Node {
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }
}
