// ── Core error types ──
//
// Structural violations are reported, never panicked on. Callers that
// want the "silently refuse" behaviour of the canvas simply drop the
// error after logging it.

use thiserror::Error;

use crate::model::EntityId;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Structural violations ────────────────────────────────────────
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    #[error("a link between {source_id} and {target_id} already exists")]
    DuplicateLink {
        source_id: EntityId,
        target_id: EntityId,
    },

    #[error("cannot link node {id} to itself")]
    SelfLink { id: EntityId },

    #[error("node position must be finite, got ({x}, {y})")]
    NonFiniteCoordinate { x: f64, y: f64 },

    // ── Document errors ──────────────────────────────────────────────
    #[error("malformed project document: {message}")]
    MalformedDocument { message: String },

    #[error("failed to serialize project: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CoreError {
    pub(crate) fn node_not_found(id: &EntityId) -> Self {
        Self::NotFound {
            entity_type: "node",
            identifier: id.to_string(),
        }
    }

    pub(crate) fn link_not_found(id: &EntityId) -> Self {
        Self::NotFound {
            entity_type: "link",
            identifier: id.to_string(),
        }
    }

    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedDocument {
            message: message.into(),
        }
    }
}
