//! Which services are legal under which operating system.
//!
//! The policy only defines legality. Front ends decide whether to offer
//! an illegal toggle at all; changing a node's OS silently drops services
//! the new OS does not allow.

use crate::model::{NodeConfig, OperatingSystem, Service};

const WINDOWS_SERVER_SERVICES: &[Service] = &[
    Service::DirectoryService,
    Service::WebIis,
    Service::FileServer,
    Service::Dns,
    Service::Dhcp,
    Service::Ftp,
    Service::Email,
];

const LINUX_SERVICES: &[Service] = &[
    Service::Ssh,
    Service::WebApache,
    Service::WebNginx,
    Service::FileServer,
    Service::Dns,
    Service::Dhcp,
    Service::Ftp,
    Service::Email,
];

/// Services `os` allows, in presentation order.
pub fn allowed_services(os: OperatingSystem) -> &'static [Service] {
    match os {
        OperatingSystem::WindowsServer => WINDOWS_SERVER_SERVICES,
        OperatingSystem::Linux => LINUX_SERVICES,
        OperatingSystem::None => &[],
    }
}

pub fn is_allowed(os: OperatingSystem, service: Service) -> bool {
    allowed_services(os).contains(&service)
}

/// Keep only the services `os` allows, preserving order.
pub fn filter_for_os(services: &[Service], os: OperatingSystem) -> Vec<Service> {
    services
        .iter()
        .copied()
        .filter(|s| is_allowed(os, *s))
        .collect()
}

/// Flip `service` in `services`: remove it if present, else append it.
pub fn toggle(services: &[Service], service: Service) -> Vec<Service> {
    if services.contains(&service) {
        services.iter().copied().filter(|s| *s != service).collect()
    } else {
        let mut next = services.to_vec();
        next.push(service);
        next
    }
}

/// Switch `config` to `os`, dropping now-illegal services.
///
/// Returns the dropped services so callers can log them.
pub fn apply_os_change(config: &mut NodeConfig, os: OperatingSystem) -> Vec<Service> {
    let current = config.services().to_vec();
    let kept = filter_for_os(&current, os);
    let dropped = current.into_iter().filter(|s| !kept.contains(s)).collect();
    config.os = Some(os);
    if config.services.is_some() || !kept.is_empty() {
        config.services = Some(kept);
    }
    dropped
}

/// Toggle `service` on `config`. Returns whether it is now selected.
pub fn toggle_service(config: &mut NodeConfig, service: Service) -> bool {
    let next = toggle(config.services(), service);
    let selected = next.contains(&service);
    config.services = Some(next);
    selected
}
