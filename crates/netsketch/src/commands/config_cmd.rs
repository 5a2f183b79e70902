//! Config subcommand handlers.

use std::fmt::Write as _;

use dialoguer::Password;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config};
use crate::error::CliError;
use crate::output;

// ── Helpers ─────────────────────────────────────────────────────────

/// Format config for display, masking the API key.
fn format_config_redacted(cfg: &Config) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "[defaults]");
    let _ = writeln!(out, "output = \"{}\"", cfg.defaults.output);
    let _ = writeln!(out, "color = \"{}\"", cfg.defaults.color);
    if let Some(ref project) = cfg.defaults.project {
        let _ = writeln!(out, "project = \"{}\"", project.display());
    }

    let c = &cfg.canvas;
    let _ = writeln!(out);
    let _ = writeln!(out, "[canvas]");
    let _ = writeln!(out, "spawn_x = {:?}", c.spawn_x);
    let _ = writeln!(out, "spawn_y = {:?}", c.spawn_y);
    let _ = writeln!(out, "spawn_step = {:?}", c.spawn_step);
    let _ = writeln!(out, "spawn_cycle = {}", c.spawn_cycle);
    let _ = writeln!(out, "badge_distance = {:?}", c.badge_distance);

    let a = &cfg.analysis;
    let _ = writeln!(out);
    let _ = writeln!(out, "[analysis]");
    let _ = writeln!(out, "endpoint = \"{}\"", a.endpoint);
    let _ = writeln!(out, "model = \"{}\"", a.model);
    let _ = writeln!(out, "timeout = {}", a.timeout);
    if a.api_key.is_some() {
        let _ = writeln!(out, "api_key = \"****\"");
    }
    if let Some(ref env) = a.api_key_env {
        let _ = writeln!(out, "api_key_env = \"{env}\"");
    }
    if let Some(ref ca) = a.ca_cert {
        let _ = writeln!(out, "ca_cert = \"{}\"", ca.display());
    }

    out
}

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::validation("interactive", format!("prompt failed: {e}"))
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Show => {
            let cfg = config::load_config()?;
            output::print_output(format_config_redacted(&cfg).trim_end(), global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            output::print_output(&config::config_path().display().to_string(), global.quiet);
            Ok(())
        }

        ConfigCommand::SetKey => {
            if !std::io::IsTerminal::is_terminal(&std::io::stdin()) {
                return Err(CliError::validation(
                    "set-key",
                    "an interactive terminal is required to enter the key",
                ));
            }
            let key = Password::new()
                .with_prompt("Analysis API key")
                .interact()
                .map_err(prompt_err)?;
            if key.trim().is_empty() {
                return Err(CliError::validation("api_key", "API key cannot be empty"));
            }
            config::store_api_key(key.trim())?;
            output::success(global, "API key stored in the system keyring");
            Ok(())
        }
    }
}
