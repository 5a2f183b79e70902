//! Link command handlers.
//!
//! `links add` drives the same gesture sequence as the canvas: select the
//! source, enter connect mode, press the target, then confirm ports. A
//! refused link shows up as the state the controller was left in.

use std::path::PathBuf;

use netsketch_core::{EntityId, Gesture, InteractionController, InteractionState, Link, Topology};
use tabled::Tabled;

use crate::cli::{GlobalOpts, LinksArgs, LinksCommand};
use crate::config::Config;
use crate::error::CliError;
use crate::output;
use crate::project::Project;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct LinkRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Source")]
    source: String,
    #[tabled(rename = "Target")]
    target: String,
}

impl LinkRow {
    fn new(link: &Link, topology: &Topology) -> Self {
        Self {
            id: link.id.to_string(),
            source: endpoint(topology, &link.source_id, &link.source_port),
            target: endpoint(topology, &link.target_id, &link.target_port),
        }
    }
}

fn endpoint(topology: &Topology, id: &EntityId, port: &str) -> String {
    format!("{}:{port}", util::node_name(topology, id))
}

fn detail(link: &Link, topology: &Topology) -> String {
    [
        format!("ID:     {}", link.id),
        format!("Source: {}", endpoint(topology, &link.source_id, &link.source_port)),
        format!("Target: {}", endpoint(topology, &link.target_id, &link.target_port)),
    ]
    .join("\n")
}

/// Map the state a refused connect attempt left behind to an error.
///
/// Pressing the source again cancels back to idle; pressing a peer that is
/// already linked leaves connect mode running.
fn refusal(ctl: &InteractionController, source: &EntityId, target: &EntityId) -> CliError {
    let topology = ctl.topology();
    let source_name = util::node_name(topology, source);
    let target_name = util::node_name(topology, target);
    match ctl.state() {
        InteractionState::Idle if source == target => CliError::validation(
            "target",
            format!("cannot link {source_name} to itself"),
        ),
        InteractionState::Connecting { .. } => CliError::LinkExists {
            source_name,
            target_name,
        },
        _ => CliError::validation(
            "target",
            format!("{source_name} cannot be linked to {target_name}"),
        ),
    }
}

// ── Handler ─────────────────────────────────────────────────────────

#[allow(clippy::too_many_lines)]
pub fn handle(
    args: LinksArgs,
    path: PathBuf,
    cfg: &Config,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let mut project = Project::open(path, cfg)?;

    match args.command {
        LinksCommand::List => {
            let topology = project.controller().topology();
            let out = output::render_list(
                &global.output,
                &topology.links,
                |l| LinkRow::new(l, topology),
                |l| l.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        LinksCommand::Add {
            source,
            target,
            source_port,
            target_port,
        } => {
            let topology = project.controller().topology();
            let source_id = util::resolve_node_id(topology, &source)?;
            let target_id = util::resolve_node_id(topology, &target)?;

            let ctl = project.controller_mut();
            ctl.handle(Gesture::PressNode(source_id.clone()));
            ctl.handle(Gesture::PointerRelease);
            ctl.handle(Gesture::InvokeConnect);
            ctl.handle(Gesture::PressNode(target_id.clone()));

            let Some((default_source, default_target)) = ctl.pending_port_defaults() else {
                return Err(refusal(ctl, &source_id, &target_id));
            };
            let link = ctl.handle(Gesture::ConfirmPorts {
                source_port: source_port.unwrap_or(default_source),
                target_port: target_port.unwrap_or(default_target),
            });
            let Some(link) = link else {
                return Err(CliError::validation(
                    "target",
                    format!("{source} cannot be linked to {target}"),
                ));
            };

            project.save()?;
            let topology = project.controller().topology();
            output::success(
                global,
                &format!(
                    "Linked {} <---> {}",
                    endpoint(topology, &link.source_id, &link.source_port),
                    endpoint(topology, &link.target_id, &link.target_port)
                ),
            );
            let out = output::render_single(
                &global.output,
                &link,
                |l| detail(l, topology),
                |l| l.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        LinksCommand::Remove { link } => {
            let id = EntityId::from(link.as_str());
            let removed = project.controller_mut().remove_link(&id)?;
            project.save()?;
            let topology = project.controller().topology();
            output::success(
                global,
                &format!(
                    "Removed link {} <---> {}",
                    util::node_name(topology, &removed.source_id),
                    util::node_name(topology, &removed.target_id)
                ),
            );
            Ok(())
        }
    }
}
