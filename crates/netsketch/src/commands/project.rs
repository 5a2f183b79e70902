//! `new` and `export` handlers.

use std::path::{Path, PathBuf};

use chrono::Local;
use netsketch_core::codec;

use crate::cli::{ExportArgs, GlobalOpts, NewArgs};
use crate::config::Config;
use crate::error::CliError;
use crate::output;
use crate::project::Project;

pub fn handle_new(path: &Path, args: &NewArgs, global: &GlobalOpts) -> Result<(), CliError> {
    Project::create(path, args.force)?;
    output::success(global, &format!("Created {}", path.display()));
    Ok(())
}

/// Write a copy named after today's date into `args.dir`.
pub fn handle_export(
    path: PathBuf,
    args: &ExportArgs,
    cfg: &Config,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let project = Project::open(path, cfg)?;
    let target = args
        .dir
        .join(codec::default_file_name(Local::now().date_naive()));

    codec::save_to_path(&target, project.controller().topology())?;
    tracing::debug!(from = %project.path().display(), to = %target.display(), "exported");

    output::success(global, "Exported project");
    output::print_output(&target.display().to_string(), global.quiet);
    Ok(())
}
