//! Default port labels offered by the connect dialog.
//!
//! Purely cosmetic: the user may type any label. An empty label is
//! stored as [`FALLBACK_PORT_LABEL`].

use crate::model::DeviceKind;

/// Label stored when the user clears a port field.
pub const FALLBACK_PORT_LABEL: &str = "port";

/// Suggested label for the `index`-th port of a `kind` device.
pub fn default_port_name(kind: DeviceKind, index: usize) -> String {
    match kind {
        DeviceKind::Router => format!("Gi0/{index}"),
        DeviceKind::Switch => format!("Fa0/{}", index + 1),
        DeviceKind::MultilayerSwitch => format!("Gi0/{}", index + 1),
        DeviceKind::Server | DeviceKind::PersonalComputer => format!("eth{index}"),
    }
}

/// Accept any non-empty label as typed; coerce an empty one.
pub fn normalize_port_label(label: &str) -> String {
    if label.is_empty() {
        FALLBACK_PORT_LABEL.to_owned()
    } else {
        label.to_owned()
    }
}
