// ── Device domain types ──
//
// Closed sets only. The serde tags are the on-disk spelling used by
// project files; the strum spellings are what humans type on the CLI.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// Category of network element placed on the canvas.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter, IntoStaticStr,
)]
#[strum(ascii_case_insensitive)]
pub enum DeviceKind {
    #[serde(rename = "ROUTER")]
    #[strum(to_string = "ROUTER", serialize = "router")]
    Router,
    #[serde(rename = "SWITCH")]
    #[strum(to_string = "SWITCH", serialize = "switch")]
    Switch,
    #[serde(rename = "MLS")]
    #[strum(to_string = "MLS", serialize = "multilayer-switch", serialize = "l3-switch")]
    MultilayerSwitch,
    #[serde(rename = "SERVER")]
    #[strum(to_string = "SERVER", serialize = "server")]
    Server,
    #[serde(rename = "PC")]
    #[strum(to_string = "PC", serialize = "personal-computer", serialize = "computer")]
    PersonalComputer,
}

impl DeviceKind {
    /// Human-friendly label for toolbars and tables.
    pub fn label(self) -> &'static str {
        match self {
            Self::Router => "Router",
            Self::Switch => "Switch",
            Self::MultilayerSwitch => "ML Switch",
            Self::Server => "Server",
            Self::PersonalComputer => "PC",
        }
    }

    /// Only servers carry an operating system and services.
    pub fn hosts_services(self) -> bool {
        matches!(self, Self::Server)
    }

    /// Operating system a freshly placed device starts with.
    pub fn default_os(self) -> OperatingSystem {
        if self.hosts_services() {
            OperatingSystem::Linux
        } else {
            OperatingSystem::None
        }
    }
}

/// Operating system installed on a device.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter, IntoStaticStr,
)]
#[strum(ascii_case_insensitive)]
pub enum OperatingSystem {
    #[serde(rename = "Linux")]
    #[strum(to_string = "Linux", serialize = "linux")]
    Linux,
    #[serde(rename = "Windows Server")]
    #[strum(to_string = "Windows Server", serialize = "windows-server", serialize = "windows")]
    WindowsServer,
    #[serde(rename = "None", alias = "Nincs operációs rendszer")]
    #[strum(to_string = "None", serialize = "none")]
    None,
}

/// Service capability a server can offer.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter, IntoStaticStr,
)]
#[strum(ascii_case_insensitive)]
pub enum Service {
    #[serde(rename = "DHCP")]
    #[strum(to_string = "DHCP")]
    Dhcp,
    #[serde(rename = "DNS")]
    #[strum(to_string = "DNS")]
    Dns,
    #[serde(rename = "Web (Apache)")]
    #[strum(to_string = "Web (Apache)", serialize = "apache", serialize = "web-apache")]
    WebApache,
    #[serde(rename = "Web (Nginx)")]
    #[strum(to_string = "Web (Nginx)", serialize = "nginx", serialize = "web-nginx")]
    WebNginx,
    #[serde(rename = "Web (IIS)")]
    #[strum(to_string = "Web (IIS)", serialize = "iis", serialize = "web-iis")]
    WebIis,
    #[serde(rename = "Active Directory")]
    #[strum(to_string = "Active Directory", serialize = "ad", serialize = "directory-service")]
    DirectoryService,
    #[serde(rename = "File Server", alias = "Fájl Szerver")]
    #[strum(to_string = "File Server", serialize = "file-server", serialize = "smb")]
    FileServer,
    #[serde(rename = "FTP")]
    #[strum(to_string = "FTP")]
    Ftp,
    #[serde(rename = "SSH")]
    #[strum(to_string = "SSH")]
    Ssh,
    #[serde(rename = "Email")]
    #[strum(to_string = "Email", serialize = "mail")]
    Email,
}

impl Service {
    pub fn is_web(self) -> bool {
        matches!(self, Self::WebApache | Self::WebNginx | Self::WebIis)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn kind_wire_tags_match_project_files() {
        assert_eq!(
            serde_json::to_string(&DeviceKind::MultilayerSwitch).unwrap(),
            "\"MLS\""
        );
        assert_eq!(
            serde_json::from_str::<DeviceKind>("\"PC\"").unwrap(),
            DeviceKind::PersonalComputer
        );
    }

    #[test]
    fn kind_parses_from_cli_spellings() {
        assert_eq!(
            "multilayer-switch".parse::<DeviceKind>().unwrap(),
            DeviceKind::MultilayerSwitch
        );
        assert_eq!("Router".parse::<DeviceKind>().unwrap(), DeviceKind::Router);
        assert_eq!("MLS".parse::<DeviceKind>().unwrap(), DeviceKind::MultilayerSwitch);
        assert!("toaster".parse::<DeviceKind>().is_err());
    }

    #[test]
    fn default_os_depends_on_kind() {
        assert_eq!(DeviceKind::Server.default_os(), OperatingSystem::Linux);
        assert_eq!(DeviceKind::Router.default_os(), OperatingSystem::None);
    }

    #[test]
    fn localized_aliases_are_accepted_on_load() {
        let os: OperatingSystem = serde_json::from_str("\"Nincs operációs rendszer\"").unwrap();
        assert_eq!(os, OperatingSystem::None);
        let svc: Service = serde_json::from_str("\"Fájl Szerver\"").unwrap();
        assert_eq!(svc, Service::FileServer);
        assert_eq!(serde_json::to_string(&svc).unwrap(), "\"File Server\"");
    }

    #[test]
    fn service_parses_short_names() {
        assert_eq!("ssh".parse::<Service>().unwrap(), Service::Ssh);
        assert_eq!("iis".parse::<Service>().unwrap(), Service::WebIis);
        assert_eq!("Web (Nginx)".parse::<Service>().unwrap(), Service::WebNginx);
        assert!(Service::WebApache.is_web());
        assert!(!Service::Dns.is_web());
    }
}
