//! `describe` and `analyze` handlers.

use std::path::PathBuf;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use netsketch_core::analysis::{self, FAILURE_MESSAGE};

use crate::cli::GlobalOpts;
use crate::config::Config;
use crate::error::CliError;
use crate::output;
use crate::project::Project;

pub fn handle_describe(path: PathBuf, cfg: &Config, global: &GlobalOpts) -> Result<(), CliError> {
    let project = Project::open(path, cfg)?;
    let text = analysis::describe_topology(project.controller().topology());
    output::print_output(text.trim_end(), global.quiet);
    Ok(())
}

/// Ask the review service about the project. Always prints a message;
/// service failures become user-facing text rather than an exit code.
pub async fn handle_analyze(
    path: PathBuf,
    cfg: &Config,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let project = Project::open(path, cfg)?;
    cfg.analysis.validate()?;

    let topology = project.controller().topology();
    let spinner = spinner(global);

    let message = match netsketch_config::analysis_client(&cfg.analysis) {
        Ok(client) => analysis::analyze_topology(client.as_ref(), topology).await,
        Err(e) => {
            tracing::warn!(error = %e, "could not build analysis client");
            FAILURE_MESSAGE.to_owned()
        }
    };

    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }
    output::print_output(&message, global.quiet);
    Ok(())
}

fn spinner(global: &GlobalOpts) -> Option<ProgressBar> {
    if global.quiet || !std::io::IsTerminal::is_terminal(&std::io::stderr()) {
        return None;
    }
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        pb.set_style(style);
    }
    pb.set_message("Analyzing topology...");
    pb.enable_steady_tick(Duration::from_millis(100));
    Some(pb)
}
