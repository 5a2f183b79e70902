//! Configuration shared by the `netsketch` CLI and the `netsketch-tui`
//! canvas: TOML file + environment layering, analysis credentials, and
//! translation into core/api types.
//!
//! Layering (later wins): built-in defaults → `config.toml` in the
//! platform config dir → `NETSKETCH_*` environment variables, with `__`
//! separating nested keys (`NETSKETCH_ANALYSIS__MODEL`).

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use tracing::debug;

use netsketch_api::{GenerativeClient, TlsMode, TransportConfig};
use netsketch_core::{Point, SpawnPoint};

/// Environment variable consulted for the analysis API key.
pub const API_KEY_ENV: &str = "NETSKETCH_API_KEY";

/// Keyring service and entry holding the analysis API key.
pub const KEYRING_SERVICE: &str = "netsketch";
pub const KEYRING_API_KEY_ENTRY: &str = "analysis-api-key";

/// Project file used when neither a flag nor the config names one.
pub const DEFAULT_PROJECT_FILE: &str = "network-project.json";

// ── Errors ──────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("failed to load config: {0}")]
    Figment(#[from] Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(e: figment::Error) -> Self {
        Self::Figment(Box::new(e))
    }
}

// ── TOML config structs ──────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub defaults: Defaults,

    #[serde(default)]
    pub canvas: CanvasConfig,

    #[serde(default)]
    pub analysis: AnalysisConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    /// Project file opened when `--project` is not given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<PathBuf>,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            project: None,
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}

/// Placement of new devices and label layout.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CanvasConfig {
    #[serde(default = "default_spawn")]
    pub spawn_x: f64,
    #[serde(default = "default_spawn")]
    pub spawn_y: f64,
    /// Diagonal offset between consecutive new devices.
    #[serde(default = "default_spawn_step")]
    pub spawn_step: f64,
    /// Placements before the stagger wraps back to the spawn point.
    #[serde(default = "default_spawn_cycle")]
    pub spawn_cycle: usize,
    /// Distance of port badges from their node, in canvas units.
    #[serde(default = "default_badge_distance")]
    pub badge_distance: f64,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            spawn_x: default_spawn(),
            spawn_y: default_spawn(),
            spawn_step: default_spawn_step(),
            spawn_cycle: default_spawn_cycle(),
            badge_distance: default_badge_distance(),
        }
    }
}

impl CanvasConfig {
    pub fn spawn_point(&self) -> SpawnPoint {
        SpawnPoint {
            origin: Point::new(self.spawn_x, self.spawn_y),
            step: self.spawn_step,
            cycle: self.spawn_cycle,
        }
    }
}

fn default_spawn() -> f64 {
    150.0
}
fn default_spawn_step() -> f64 {
    10.0
}
fn default_spawn_cycle() -> usize {
    5
}
fn default_badge_distance() -> f64 {
    40.0
}

/// Topology review service settings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AnalysisConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_model")]
    pub model: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// API key (plaintext -- prefer keyring or env var).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Environment variable name containing the API key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key_env: Option<String>,

    /// Path to an extra CA certificate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca_cert: Option<PathBuf>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            model: default_model(),
            timeout: default_timeout(),
            api_key: None,
            api_key_env: None,
            ca_cert: None,
        }
    }
}

fn default_endpoint() -> String {
    netsketch_api::DEFAULT_ENDPOINT.into()
}
fn default_model() -> String {
    netsketch_api::DEFAULT_MODEL.into()
}
fn default_timeout() -> u64 {
    60
}

impl AnalysisConfig {
    pub fn transport(&self) -> TransportConfig {
        let tls = self
            .ca_cert
            .clone()
            .map_or(TlsMode::System, TlsMode::CustomCa);
        TransportConfig {
            tls,
            timeout: Duration::from_secs(self.timeout),
        }
    }

    /// Check the fields that can be wrong without talking to the network.
    pub fn validate(&self) -> Result<(), ConfigError> {
        url::Url::parse(&self.endpoint).map_err(|e| ConfigError::Validation {
            field: "analysis.endpoint".into(),
            reason: format!("invalid URL: {e}"),
        })?;
        if self.model.trim().is_empty() {
            return Err(ConfigError::Validation {
                field: "analysis.model".into(),
                reason: "model name cannot be empty".into(),
            });
        }
        if self.timeout == 0 {
            return Err(ConfigError::Validation {
                field: "analysis.timeout".into(),
                reason: "timeout must be at least one second".into(),
            });
        }
        Ok(())
    }
}

// ── Config file path ─────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "netsketch", "netsketch").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("netsketch");
    p
}

// ── Config loading ───────────────────────────────────────────────────

/// Load the full Config from file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from an explicit file path (still layered with the environment).
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("NETSKETCH_").split("__"));

    let config: Config = figment.extract()?;
    debug!(path = %path.display(), "config loaded");
    Ok(config)
}

/// Load config, returning a default if loading fails.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

/// Write `cfg` to the standard config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let text = toml::to_string_pretty(cfg)?;
    std::fs::write(path, text)?;
    Ok(())
}

/// Project file to open: explicit choice, then config, then the default
/// file name in the working directory.
pub fn project_path(explicit: Option<&Path>, cfg: &Config) -> PathBuf {
    explicit
        .map(Path::to_path_buf)
        .or_else(|| cfg.defaults.project.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_PROJECT_FILE))
}

// ── Credential helpers ───────────────────────────────────────────────

/// Resolve the analysis API key. Absence is not an error: analysis
/// degrades to an explanatory message instead.
///
/// Chain: `api_key_env` variable → `NETSKETCH_API_KEY` → system keyring →
/// plaintext `api_key`.
pub fn resolve_api_key(cfg: &AnalysisConfig) -> Option<SecretString> {
    resolve_api_key_with(cfg, |name| std::env::var(name).ok(), read_keyring)
}

fn resolve_api_key_with(
    cfg: &AnalysisConfig,
    env: impl Fn(&str) -> Option<String>,
    keyring: impl FnOnce() -> Option<String>,
) -> Option<SecretString> {
    let present = |v: String| (!v.trim().is_empty()).then_some(v);

    // 1. Config's api_key_env -> env var lookup
    if let Some(val) = cfg.api_key_env.as_deref().and_then(&env).and_then(present) {
        return Some(SecretString::from(val));
    }

    // 2. Well-known env var
    if let Some(val) = env(API_KEY_ENV).and_then(present) {
        return Some(SecretString::from(val));
    }

    // 3. System keyring
    if let Some(val) = keyring().and_then(present) {
        return Some(SecretString::from(val));
    }

    // 4. Plaintext in config
    cfg.api_key.clone().and_then(present).map(SecretString::from)
}

fn read_keyring() -> Option<String> {
    let entry = keyring::Entry::new(KEYRING_SERVICE, KEYRING_API_KEY_ENTRY).ok()?;
    entry.get_password().ok()
}

/// Store the analysis API key in the system keyring.
pub fn store_api_key(secret: &str) -> Result<(), ConfigError> {
    let to_err = |e: keyring::Error| ConfigError::Validation {
        field: "keyring".into(),
        reason: e.to_string(),
    };
    keyring::Entry::new(KEYRING_SERVICE, KEYRING_API_KEY_ENTRY)
        .map_err(to_err)?
        .set_password(secret)
        .map_err(to_err)
}

/// Build the analysis client, or `None` when no key is configured.
pub fn analysis_client(
    cfg: &AnalysisConfig,
) -> Result<Option<GenerativeClient>, netsketch_api::Error> {
    let Some(key) = resolve_api_key(cfg) else {
        return Ok(None);
    };
    GenerativeClient::from_api_key(&cfg.endpoint, cfg.model.clone(), &key, &cfg.transport())
        .map(Some)
}
