//! Shared helpers for command handlers.

use std::io::IsTerminal;
use std::str::FromStr;

use netsketch_core::{DeviceKind, EntityId, OperatingSystem, Service, Topology};
use strum::IntoEnumIterator;

use crate::error::CliError;

/// Resolve a node identifier (ID or display name) to its EntityId.
pub fn resolve_node_id(topology: &Topology, identifier: &str) -> Result<EntityId, CliError> {
    topology
        .find_node(identifier)
        .map(|n| n.id.clone())
        .ok_or_else(|| CliError::NotFound {
            resource_type: "node".into(),
            identifier: identifier.into(),
            list_command: "nodes list".into(),
        })
}

/// Display name for a node id, falling back to the id itself.
pub fn node_name(topology: &Topology, id: &EntityId) -> String {
    topology
        .node(id)
        .map_or_else(|| id.to_string(), |n| n.name().to_owned())
}

pub fn parse_kind(raw: &str) -> Result<DeviceKind, CliError> {
    parse_choice(raw, "kind")
}

pub fn parse_os(raw: &str) -> Result<OperatingSystem, CliError> {
    parse_choice(raw, "os")
}

pub fn parse_service(raw: &str) -> Result<Service, CliError> {
    parse_choice(raw, "service")
}

/// Parse a closed-set value, listing the canonical spellings on failure.
fn parse_choice<T>(raw: &str, field: &str) -> Result<T, CliError>
where
    T: FromStr + IntoEnumIterator + std::fmt::Display,
{
    T::from_str(raw.trim()).map_err(|_| {
        let choices: Vec<String> = T::iter().map(|v| v.to_string()).collect();
        CliError::validation(
            field,
            format!("unknown {field} '{raw}' (expected one of: {})", choices.join(", ")),
        )
    })
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: message.into(),
        });
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn kinds_accept_tags_and_words() {
        assert_eq!(parse_kind("mls").unwrap(), DeviceKind::MultilayerSwitch);
        assert_eq!(parse_kind("PC").unwrap(), DeviceKind::PersonalComputer);
        assert_eq!(parse_kind(" Router ").unwrap(), DeviceKind::Router);
    }

    #[test]
    fn unknown_value_lists_choices() {
        let err = parse_os("beos").unwrap_err();
        let text = err.to_string();
        assert!(text.contains("Windows Server"), "{text}");
        assert_eq!(err.exit_code(), crate::error::exit_code::USAGE);
    }

    #[test]
    fn services_accept_short_names() {
        assert_eq!(parse_service("ad").unwrap(), Service::DirectoryService);
        assert_eq!(parse_service("Web (IIS)").unwrap(), Service::WebIis);
    }
}
