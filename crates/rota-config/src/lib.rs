//! Shared configuration for rota.
//!
//! A TOML file at the platform config path, overridden by `ROTA_*`
//! environment variables, translated into `rota_core::ControllerConfig`,
//! `rota_core::Preferences` and `rota_api::TransportConfig`.

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use chrono_tz::Tz;
use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use rota_api::TransportConfig;
use rota_core::{ColorScheme, ControllerConfig, Preferences, ViewType, WeekStart};

/// Environment variable naming an alternate config file.
pub const CONFIG_PATH_ENV: &str = "ROTA_CONFIG_PATH";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

fn invalid(field: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Validation {
        field: field.into(),
        reason: reason.into(),
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub data_source: DataSource,

    #[serde(default)]
    pub cache: CacheSettings,

    #[serde(default)]
    pub display: DisplaySettings,
}

/// Where events come from.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DataSource {
    /// Calendar backend base URL (e.g. "https://planning.example.org").
    #[serde(default = "default_url")]
    pub url: String,

    /// Request timeout, humantime notation.
    #[serde(default = "default_timeout")]
    pub timeout: String,

    #[serde(default)]
    pub accept_invalid_certs: bool,
}

impl Default for DataSource {
    fn default() -> Self {
        Self {
            url: default_url(),
            timeout: default_timeout(),
            accept_invalid_certs: false,
        }
    }
}

fn default_url() -> String {
    "http://localhost:3000".into()
}
fn default_timeout() -> String {
    "30s".into()
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CacheSettings {
    /// Lifetime of a cached query result.
    #[serde(default = "default_ttl")]
    pub ttl: String,

    #[serde(default = "default_sweep_interval")]
    pub sweep_interval: String,

    /// Periodic re-fetch of the visible window. Off when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_interval: Option<String>,

    /// Keep the cache in the state directory between runs.
    #[serde(default = "default_persist")]
    pub persist: bool,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            ttl: default_ttl(),
            sweep_interval: default_sweep_interval(),
            refresh_interval: None,
            persist: default_persist(),
        }
    }
}

fn default_ttl() -> String {
    "5m".into()
}
fn default_sweep_interval() -> String {
    "60s".into()
}
fn default_persist() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DisplaySettings {
    #[serde(default)]
    pub week_starts_on: WeekStart,

    #[serde(default)]
    pub default_view: ViewType,

    /// IANA timezone name used for window boundaries.
    #[serde(default = "default_timezone")]
    pub timezone: String,

    #[serde(default)]
    pub color_scheme: ColorScheme,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            week_starts_on: WeekStart::default(),
            default_view: ViewType::default(),
            timezone: default_timezone(),
            color_scheme: ColorScheme::default(),
        }
    }
}

fn default_timezone() -> String {
    "UTC".into()
}

// ── Paths ───────────────────────────────────────────────────────────

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("org", "rota", "rota")
}

fn home_fallback(parts: &[&str]) -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.extend(parts);
    p
}

/// Resolve the config file path: `$ROTA_CONFIG_PATH`, else the platform
/// config directory.
pub fn config_path() -> PathBuf {
    if let Some(path) = std::env::var_os(CONFIG_PATH_ENV) {
        return PathBuf::from(path);
    }
    project_dirs().map_or_else(
        || home_fallback(&[".config", "rota", "config.toml"]),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Directory for the persisted cache and preferences.
pub fn state_dir() -> PathBuf {
    project_dirs().map_or_else(
        || home_fallback(&[".local", "state", "rota"]),
        |dirs| dirs.data_local_dir().to_path_buf(),
    )
}

// ── Config loading ──────────────────────────────────────────────────

/// Defaults, then `path`, then `ROTA_*` environment variables
/// (`ROTA_DATA_SOURCE__URL`, `ROTA_CACHE__TTL`, ...).
pub fn figment_for(path: &Path) -> Figment {
    Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("ROTA_").split("__"))
}

/// Load the full Config from file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let config: Config = figment_for(path).extract()?;
    Ok(config)
}

/// Load config, returning a default if it cannot be read.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(cfg, &path)?;
    Ok(path)
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Translation ─────────────────────────────────────────────────────

fn duration(field: &str, raw: &str) -> Result<Duration, ConfigError> {
    let parsed = humantime::parse_duration(raw.trim()).map_err(|e| invalid(field, format!("{raw:?}: {e}")))?;
    if parsed.is_zero() {
        return Err(invalid(field, "must be greater than zero"));
    }
    Ok(parsed)
}

/// Parse an IANA timezone name.
pub fn parse_timezone(raw: &str) -> Result<Tz, ConfigError> {
    Tz::from_str(raw.trim()).map_err(|_| invalid("display.timezone", format!("unknown timezone {raw:?}")))
}

/// Validated backend base URL.
pub fn base_url(cfg: &Config) -> Result<url::Url, ConfigError> {
    let url: url::Url = cfg
        .data_source
        .url
        .parse()
        .map_err(|_| invalid("data_source.url", format!("invalid URL: {}", cfg.data_source.url)))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid("data_source.url", "expected an http or https URL"));
    }
    Ok(url)
}

/// Build a `ControllerConfig` from the `[cache]` section.
pub fn to_controller_config(cfg: &Config) -> Result<ControllerConfig, ConfigError> {
    let cache = &cfg.cache;
    let refresh_interval = cache
        .refresh_interval
        .as_deref()
        .map(|raw| duration("cache.refresh_interval", raw))
        .transpose()?;

    Ok(ControllerConfig {
        cache_ttl: duration("cache.ttl", &cache.ttl)?,
        sweep_interval: duration("cache.sweep_interval", &cache.sweep_interval)?,
        refresh_interval,
        ..ControllerConfig::default()
    })
}

/// Build display `Preferences` from the `[display]` section.
pub fn to_preferences(cfg: &Config) -> Result<Preferences, ConfigError> {
    let display = &cfg.display;
    Ok(Preferences {
        week_starts_on: display.week_starts_on,
        timezone: parse_timezone(&display.timezone)?,
        default_view: display.default_view,
        color_scheme: display.color_scheme,
    })
}

/// HTTP transport settings from the `[data_source]` section.
pub fn to_transport_config(cfg: &Config) -> Result<TransportConfig, ConfigError> {
    Ok(TransportConfig {
        timeout: duration("data_source.timeout", &cfg.data_source.timeout)?,
        accept_invalid_certs: cfg.data_source.accept_invalid_certs,
        ..TransportConfig::default()
    })
}
