//! CLI configuration — thin wrapper around `netsketch_config` shared types.
//!
//! Re-exports the shared types and adds CLI-specific resolution that
//! respects `GlobalOpts` flag overrides (`--project`).

use std::path::PathBuf;

use crate::cli::GlobalOpts;

// ── Re-exports from shared crate ────────────────────────────────────

pub use netsketch_config::{
    Config, config_path, load_config, load_config_or_default, resolve_api_key, store_api_key,
};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Project file selected by `--project`, the config, or the default name.
pub fn project_path(global: &GlobalOpts, cfg: &Config) -> PathBuf {
    netsketch_config::project_path(global.project.as_deref(), cfg)
}
