//! Command dispatch: routes each subcommand to its handler.

pub mod analyze;
pub mod config_cmd;
pub mod links;
pub mod nodes;
pub mod project;
pub mod util;

use crate::cli::{Command, GlobalOpts};
use crate::config::{self, Config};
use crate::error::CliError;

/// Dispatch a project-level command.
pub async fn dispatch(cmd: Command, cfg: &Config, global: &GlobalOpts) -> Result<(), CliError> {
    let path = config::project_path(global, cfg);
    match cmd {
        Command::New(args) => project::handle_new(&path, &args, global),
        Command::Export(args) => project::handle_export(path, &args, cfg, global),
        Command::Nodes(args) => nodes::handle(args, path, cfg, global),
        Command::Links(args) => links::handle(args, path, cfg, global),
        Command::Describe => analyze::handle_describe(path, cfg, global),
        Command::Analyze => analyze::handle_analyze(path, cfg, global).await,
        // Handled in main before a project path is needed.
        Command::Config(_) | Command::Completions(_) => Ok(()),
    }
}
