//! Clap derive structures for the `netsketch` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.
//! Only depends on clap so `build.rs` can include it for man pages.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// netsketch -- sketch network topologies from the command line
#[derive(Debug, Parser)]
#[command(
    name = "netsketch",
    version,
    about = "Sketch and review network topologies from the command line",
    long_about = "Edit a netsketch project file: place routers, switches, servers and PCs,\n\
        cable them together through named ports, configure addressing and server\n\
        services, and ask a text-generation service to review the design.\n\n\
        The same project files open in the `netsketch-tui` canvas.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Project file to operate on
    #[arg(long, short = 'f', env = "NETSKETCH_PROJECT", global = true)]
    pub project: Option<PathBuf>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "NETSKETCH_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create an empty project file
    New(NewArgs),

    /// Place, inspect, configure and delete devices
    #[command(alias = "node", alias = "n")]
    Nodes(NodesArgs),

    /// Cable devices together
    #[command(alias = "link", alias = "l")]
    Links(LinksArgs),

    /// Write a dated copy of the project
    Export(ExportArgs),

    /// Ask the analysis service to review the topology
    Analyze,

    /// Print the topology description sent to the analysis service
    Describe,

    /// Manage CLI configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  PROJECT
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct NewArgs {
    /// Overwrite an existing project file
    #[arg(long)]
    pub force: bool,
}

#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Directory to write into
    #[arg(long, short = 'd', default_value = ".")]
    pub dir: PathBuf,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  NODES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct NodesArgs {
    #[command(subcommand)]
    pub command: NodesCommand,
}

#[derive(Debug, Subcommand)]
pub enum NodesCommand {
    /// List devices in insertion order
    #[command(alias = "ls")]
    List,

    /// Show one device
    Get {
        /// Node ID or name
        node: String,
    },

    /// Place a new device
    Add {
        /// Device kind: router, switch, mls, server, pc
        kind: String,

        /// Display name (default: <KIND>-<n>)
        #[arg(long)]
        name: Option<String>,

        /// Canvas position, x coordinate
        #[arg(long, requires = "y", allow_negative_numbers = true, value_parser = finite_coordinate)]
        x: Option<f64>,

        /// Canvas position, y coordinate
        #[arg(long, requires = "x", allow_negative_numbers = true, value_parser = finite_coordinate)]
        y: Option<f64>,
    },

    /// Move a device on the canvas
    #[command(alias = "mv")]
    Move {
        /// Node ID or name
        node: String,

        #[arg(allow_negative_numbers = true, value_parser = finite_coordinate)]
        x: f64,

        #[arg(allow_negative_numbers = true, value_parser = finite_coordinate)]
        y: f64,
    },

    /// Edit a device's configuration
    Set(NodeSetArgs),

    /// Toggle a server service on or off
    #[command(alias = "svc")]
    Service {
        /// Node ID or name
        node: String,

        /// Service: dhcp, dns, apache, nginx, iis, ad, file-server, ftp, ssh, email
        service: String,
    },

    /// Delete a device and every link attached to it
    #[command(alias = "rm")]
    Delete {
        /// Node ID or name
        node: String,
    },
}

#[derive(Debug, Args)]
pub struct NodeSetArgs {
    /// Node ID or name
    pub node: String,

    /// Display name
    #[arg(long)]
    pub name: Option<String>,

    /// IP address
    #[arg(long)]
    pub ip: Option<String>,

    /// Subnet mask
    #[arg(long)]
    pub mask: Option<String>,

    /// Default gateway
    #[arg(long, conflicts_with = "clear_gateway")]
    pub gateway: Option<String>,

    /// Remove the default gateway
    #[arg(long)]
    pub clear_gateway: bool,

    /// Operating system: linux, windows-server, none (drops services it does not allow)
    #[arg(long)]
    pub os: Option<String>,

    /// VLAN number
    #[arg(long, conflicts_with = "clear_vlan")]
    pub vlan: Option<u32>,

    /// Remove the VLAN number
    #[arg(long)]
    pub clear_vlan: bool,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  LINKS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct LinksArgs {
    #[command(subcommand)]
    pub command: LinksCommand,
}

#[derive(Debug, Subcommand)]
pub enum LinksCommand {
    /// List links in insertion order
    #[command(alias = "ls")]
    List,

    /// Connect two devices
    Add {
        /// Source node ID or name
        source: String,

        /// Target node ID or name
        target: String,

        /// Port label on the source (default: next free port for its kind)
        #[arg(long)]
        source_port: Option<String>,

        /// Port label on the target (default: next free port for its kind)
        #[arg(long)]
        target_port: Option<String>,
    },

    /// Remove a link
    #[command(alias = "rm")]
    Remove {
        /// Link ID
        link: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Display current resolved configuration
    Show,

    /// Print the config file path
    Path,

    /// Store the analysis API key in the system keyring
    SetKey,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  VALUE PARSERS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Canvas coordinate. `inf` and `NaN` parse as `f64` but cannot be saved.
fn finite_coordinate(s: &str) -> Result<f64, String> {
    let value: f64 = s.parse().map_err(|e| format!("{e}"))?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(format!("'{s}' is not a finite number"))
    }
}
