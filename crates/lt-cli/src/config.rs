//! Configuration loading and management.

use std::path::{Path, PathBuf};

use anyhow::Context;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use lt_core::{HoursConfig, HoursPolicy, STANDARD_DAY_HOURS};
use serde::{Deserialize, Serialize};

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Login name whose "New session" lines start a day.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    /// Hours in a standard weekday.
    pub standard_day_hours: f64,
    /// How elapsed time is turned into worked hours.
    pub hours_policy: HoursPolicy,
    /// systemd unit whose journal is queried.
    pub unit: String,
    /// journalctl executable.
    pub journalctl: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            user: None,
            standard_day_hours: STANDARD_DAY_HOURS,
            hours_policy: HoursPolicy::default(),
            unit: "systemd-logind.service".to_string(),
            journalctl: PathBuf::from("journalctl"),
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Load from default config location
        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        // Load from specified config file
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Load from environment variables (LT_*)
        figment = figment.merge(Env::prefixed("LT_"));

        figment.extract()
    }

    pub const fn hours_config(&self) -> HoursConfig {
        HoursConfig {
            standard_day_hours: self.standard_day_hours,
            policy: self.hours_policy,
        }
    }

    /// Picks the current user: the command line wins over the config file,
    /// which wins over the login environment. Empty names are skipped, since
    /// an empty name would match every "New session" line.
    pub fn resolve_user(&self, cli_user: Option<&str>) -> anyhow::Result<String> {
        cli_user
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .or_else(|| self.user.clone().filter(|name| !name.is_empty()))
            .or_else(|| login_from_env(|key| std::env::var(key).ok()))
            .context("could not determine the current user; pass --user or set `user` in config")
    }
}

/// Reads the login name the way shells export it.
fn login_from_env(lookup: impl Fn(&str) -> Option<String>) -> Option<String> {
    ["USER", "LOGNAME"]
        .into_iter()
        .filter_map(lookup)
        .find(|name| !name.is_empty())
}

/// Returns the platform-specific config directory for lt.
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("lt"))
}
