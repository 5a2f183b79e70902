//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` / `ConfigError` variants into user-facing errors with
//! actionable help text and distinct exit codes.

use miette::Diagnostic;
use thiserror::Error;

use netsketch_config::ConfigError;
use netsketch_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const CONFLICT: i32 = 6;
    pub const MALFORMED: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Project file ─────────────────────────────────────────────────
    #[error("Project file not found: {path}")]
    #[diagnostic(
        code(netsketch::no_project),
        help(
            "Create one with: netsketch new -f {path}\n\
             Or point at an existing file with --project / NETSKETCH_PROJECT."
        )
    )]
    NoProject { path: String },

    #[error("Project file already exists: {path}")]
    #[diagnostic(
        code(netsketch::project_exists),
        help("Use --force to overwrite it.")
    )]
    ProjectExists { path: String },

    #[error("Malformed project document {path}: {message}")]
    #[diagnostic(
        code(netsketch::malformed),
        help("The file was left untouched. Fix the JSON or restore a previous export.")
    )]
    MalformedDocument { path: String, message: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(netsketch::not_found),
        help("Run: netsketch {list_command} to see available {resource_type}s")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    #[error("'{source_name}' and '{target_name}' are already connected")]
    #[diagnostic(
        code(netsketch::link_exists),
        help("At most one link may join a pair of devices. Remove the existing one first.")
    )]
    LinkExists {
        source_name: String,
        target_name: String,
    },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(netsketch::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error(transparent)]
    #[diagnostic(
        code(netsketch::config),
        help("Check the config file shown by: netsketch config path")
    )]
    Config(#[from] ConfigError),

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(netsketch::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO / Serialization ────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Serialization failed: {0}")]
    #[diagnostic(code(netsketch::json))]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NoProject { .. } | Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::ProjectExists { .. } | Self::LinkExists { .. } => exit_code::CONFLICT,
            Self::MalformedDocument { .. } => exit_code::MALFORMED,
            Self::Validation { .. } | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            Self::Config(_) | Self::Io(_) | Self::Json(_) => exit_code::GENERAL,
        }
    }

    pub fn validation(field: &str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NotFound {
                entity_type,
                identifier,
            } => CliError::NotFound {
                list_command: format!("{entity_type}s list"),
                resource_type: entity_type.into(),
                identifier,
            },

            CoreError::DuplicateLink {
                source_id,
                target_id,
            } => CliError::LinkExists {
                source_name: source_id.to_string(),
                target_name: target_id.to_string(),
            },

            CoreError::SelfLink { id } => CliError::Validation {
                field: "target".into(),
                reason: format!("cannot link node {id} to itself"),
            },

            err @ CoreError::NonFiniteCoordinate { .. } => CliError::Validation {
                field: "position".into(),
                reason: err.to_string(),
            },

            CoreError::MalformedDocument { message } => CliError::MalformedDocument {
                path: "<input>".into(),
                message,
            },

            CoreError::Serialization(e) => CliError::Json(e),

            CoreError::Io(e) => CliError::Io(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use netsketch_core::EntityId;

    #[test]
    fn core_errors_map_to_exit_codes() {
        let cases = [
            (
                CoreError::NotFound {
                    entity_type: "node",
                    identifier: "x".into(),
                },
                exit_code::NOT_FOUND,
            ),
            (
                CoreError::DuplicateLink {
                    source_id: EntityId::from("a"),
                    target_id: EntityId::from("b"),
                },
                exit_code::CONFLICT,
            ),
            (
                CoreError::SelfLink {
                    id: EntityId::from("a"),
                },
                exit_code::USAGE,
            ),
            (
                CoreError::NonFiniteCoordinate {
                    x: f64::NAN,
                    y: 0.0,
                },
                exit_code::USAGE,
            ),
            (
                CoreError::MalformedDocument {
                    message: "bad".into(),
                },
                exit_code::MALFORMED,
            ),
        ];
        for (core, code) in cases {
            assert_eq!(CliError::from(core).exit_code(), code);
        }
    }

    #[test]
    fn not_found_points_at_list_command() {
        let err = CliError::from(CoreError::NotFound {
            entity_type: "link",
            identifier: "l1".into(),
        });
        match err {
            CliError::NotFound { list_command, .. } => assert_eq!(list_command, "links list"),
            other => panic!("unexpected {other:?}"),
        }
    }
}
