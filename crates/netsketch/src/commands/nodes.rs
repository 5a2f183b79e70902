//! Node command handlers.

use std::path::PathBuf;

use netsketch_core::{Node, Point, Topology, policy};
use tabled::Tabled;

use crate::cli::{GlobalOpts, NodeSetArgs, NodesArgs, NodesCommand};
use crate::config::Config;
use crate::error::CliError;
use crate::output;
use crate::project::Project;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct NodeRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Address")]
    address: String,
    #[tabled(rename = "OS")]
    os: String,
    #[tabled(rename = "Links")]
    links: usize,
    #[tabled(rename = "Position")]
    position: String,
}

impl NodeRow {
    fn new(node: &Node, topology: &Topology) -> Self {
        Self {
            id: node.id.to_string(),
            name: node.config.name.clone(),
            kind: node.kind.to_string(),
            address: format!("{}/{}", node.config.ip_address, node.config.subnet_mask),
            os: node.config.operating_system().to_string(),
            links: topology.links_of(&node.id).count(),
            position: format!("{:.0},{:.0}", node.x, node.y),
        }
    }
}

fn detail(node: &Node, topology: &Topology) -> String {
    let cfg = &node.config;
    let mut lines = vec![
        format!("ID:       {}", node.id),
        format!("Name:     {}", cfg.name),
        format!("Type:     {} ({})", node.kind, node.kind.label()),
        format!("IP:       {}", cfg.ip_address),
        format!("Mask:     {}", cfg.subnet_mask),
        format!("Gateway:  {}", cfg.gateway.as_deref().unwrap_or("-")),
        format!(
            "VLAN:     {}",
            cfg.vlan.map_or_else(|| "-".into(), |v| v.to_string())
        ),
        format!("Position: {:.1}, {:.1}", node.x, node.y),
    ];
    if node.kind.hosts_services() {
        lines.push(format!("OS:       {}", cfg.operating_system()));
        let services: Vec<String> = cfg.services().iter().map(ToString::to_string).collect();
        lines.push(format!(
            "Services: {}",
            if services.is_empty() {
                "-".into()
            } else {
                services.join(", ")
            }
        ));
    }
    let links: Vec<String> = topology
        .links_of(&node.id)
        .filter_map(|l| {
            let peer = l.other_end(&node.id)?;
            Some(format!(
                "{} -> {}:{}",
                l.port_on(&node.id)?,
                util::node_name(topology, peer),
                l.port_on(peer)?
            ))
        })
        .collect();
    if !links.is_empty() {
        lines.push(format!("Links:    {}", links.join("\n          ")));
    }
    lines.join("\n")
}

fn print_node(node: &Node, topology: &Topology, global: &GlobalOpts) {
    let out = output::render_single(
        &global.output,
        node,
        |n| detail(n, topology),
        |n| n.id.to_string(),
    );
    output::print_output(&out, global.quiet);
}

// ── Handler ─────────────────────────────────────────────────────────

#[allow(clippy::too_many_lines)]
pub fn handle(
    args: NodesArgs,
    path: PathBuf,
    cfg: &Config,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let mut project = Project::open(path, cfg)?;

    match args.command {
        NodesCommand::List => {
            let topology = project.controller().topology();
            let out = output::render_list(
                &global.output,
                &topology.nodes,
                |n| NodeRow::new(n, topology),
                |n| n.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        NodesCommand::Get { node } => {
            let topology = project.controller().topology();
            let id = util::resolve_node_id(topology, &node)?;
            if let Some(n) = topology.node(&id) {
                print_node(n, topology, global);
            }
            Ok(())
        }

        NodesCommand::Add { kind, name, x, y } => {
            let kind = util::parse_kind(&kind)?;
            let ctl = project.controller_mut();
            let mut node = match (x, y) {
                (Some(x), Some(y)) => ctl.add_device_at(kind, Point::new(x, y))?,
                _ => ctl.add_device(kind),
            };
            if let Some(name) = name {
                let mut config = node.config.clone();
                config.name = name;
                node = ctl.update_node_config(&node.id, config)?;
            }
            project.save()?;
            output::success(global, &format!("Added {} ({kind})", node.config.name));
            print_node(&node, project.controller().topology(), global);
            Ok(())
        }

        NodesCommand::Move { node, x, y } => {
            let id = util::resolve_node_id(project.controller().topology(), &node)?;
            project.controller_mut().move_node(&id, x, y)?;
            project.save()?;
            output::success(
                global,
                &format!("Moved {node} to {}", fmt_point(Point::new(x, y))),
            );
            Ok(())
        }

        NodesCommand::Set(set) => handle_set(&mut project, set, global),

        NodesCommand::Service { node, service } => {
            let service = util::parse_service(&service)?;
            let topology = project.controller().topology();
            let id = util::resolve_node_id(topology, &node)?;
            let Some(current) = topology.node(&id) else {
                return Ok(());
            };

            if !current.kind.hosts_services() {
                return Err(CliError::validation(
                    "service",
                    format!("{} is a {}; only servers run services", current.name(), current.kind.label()),
                ));
            }
            let os = current.config.operating_system();
            if !current.config.has_service(service) && !policy::is_allowed(os, service) {
                let allowed: Vec<String> = policy::allowed_services(os)
                    .iter()
                    .map(ToString::to_string)
                    .collect();
                return Err(CliError::validation(
                    "service",
                    format!(
                        "{service} is not available on {os} (allowed: {})",
                        if allowed.is_empty() { "none".into() } else { allowed.join(", ") }
                    ),
                ));
            }

            let enabled = project.controller_mut().toggle_service(&id, service)?;
            project.save()?;
            let state = if enabled { "enabled" } else { "disabled" };
            output::success(global, &format!("{service} {state} on {node}"));
            Ok(())
        }

        NodesCommand::Delete { node } => {
            let id = util::resolve_node_id(project.controller().topology(), &node)?;
            let message = format!("Delete node '{node}' and all of its links?");
            if !util::confirm(&message, global.yes)? {
                return Ok(());
            }
            let removal = project.controller_mut().delete_node(&id)?;
            project.save()?;
            output::success(
                global,
                &format!(
                    "Deleted {} and {} link(s)",
                    removal.node.config.name,
                    removal.links.len()
                ),
            );
            Ok(())
        }
    }
}

fn handle_set(project: &mut Project, set: NodeSetArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let topology = project.controller().topology();
    let id = util::resolve_node_id(topology, &set.node)?;
    let Some(current) = topology.node(&id) else {
        return Ok(());
    };

    let mut config = current.config.clone();
    let before = config.services().to_vec();

    if let Some(name) = set.name {
        config.name = name;
    }
    if let Some(ip) = set.ip {
        config.ip_address = ip;
    }
    if let Some(mask) = set.mask {
        config.subnet_mask = mask;
    }
    if set.clear_gateway {
        config.gateway = None;
    } else if let Some(gw) = set.gateway {
        config.gateway = Some(gw);
    }
    if set.clear_vlan {
        config.vlan = None;
    } else if let Some(vlan) = set.vlan {
        config.vlan = Some(vlan);
    }
    if let Some(os) = set.os.as_deref() {
        config.os = Some(util::parse_os(os)?);
    }

    let updated = project.controller_mut().update_node_config(&id, config)?;
    project.save()?;

    let dropped: Vec<String> = before
        .iter()
        .filter(|s| !updated.config.has_service(**s))
        .map(ToString::to_string)
        .collect();
    if !dropped.is_empty() {
        output::warning(
            global,
            &format!(
                "{} no longer runs: {}",
                updated.config.name,
                dropped.join(", ")
            ),
        );
    }
    output::success(global, &format!("Updated {}", updated.config.name));
    print_node(&updated, project.controller().topology(), global);
    Ok(())
}

fn fmt_point(p: Point) -> String {
    format!("({:.1}, {:.1})", p.x, p.y)
}
