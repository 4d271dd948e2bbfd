use std::path::{Path, PathBuf};

use serde::Deserialize;

use brawler_core::roster::Archetype;

use crate::error::HostError;

/// Default config file, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "brawler.toml";
/// Highest accepted tick rate.
pub const MAX_TICK_RATE_HZ: u32 = 240;

/// Log output format for the host binary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = HostError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(HostError::InvalidConfig(format!(
                "log_format must be pretty or json, got {other:?}"
            ))),
        }
    }
}

/// Runtime settings for a hosted session, loaded from `brawler.toml`.
///
/// Game rules are not configurable here; they are constants in `brawler-sim`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// Simulation ticks per second (the display refresh cadence).
    pub tick_rate_hz: u32,
    /// Fixed RNG seed for reproducible matches. Seeded from the OS when absent.
    pub seed: Option<u64>,
    /// Human fighter by roster name. Defaults to the first roster entry.
    pub fighter: Option<String>,
    /// Drive the human side with the scripted policy (headless play).
    pub autopilot: bool,
    pub log_format: LogFormat,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            tick_rate_hz: 60,
            seed: None,
            fighter: None,
            autopilot: true,
            log_format: LogFormat::Pretty,
        }
    }
}

impl HostConfig {
    /// Load from `$BRAWLER_CONFIG` (or `brawler.toml`) if present, then apply
    /// `BRAWLER_*` environment overrides.
    ///
    /// Never fails: an unparsable file falls back to defaults and a malformed
    /// override is skipped. Both are returned so the caller can report them
    /// once logging is up.
    pub fn load() -> (Self, Vec<HostError>) {
        let path = std::env::var("BRAWLER_CONFIG")
            .ok()
            .filter(|p| !p.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));

        let mut problems = Vec::new();
        let mut config = Self::from_file(&path).unwrap_or_else(|e| {
            problems.push(e);
            Self::default()
        });
        problems.extend(config.apply_env_overrides(|key| std::env::var(key).ok()));
        (config, problems)
    }

    /// Read a config file. A missing file yields defaults.
    pub fn from_file(path: &Path) -> Result<Self, HostError> {
        match std::fs::read_to_string(path) {
            Ok(content) => Self::parse(&content)
                .map_err(|e| HostError::InvalidConfig(format!("{}: {e}", path.display()))),
            Err(_) => Ok(Self::default()),
        }
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Apply `BRAWLER_*` overrides read through `lookup`. Empty values are
    /// ignored; malformed ones leave the field untouched and are returned.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Vec<HostError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let bad = |key: &str, val: &str| HostError::InvalidConfig(format!("{key}={val}"));
        let mut problems = Vec::new();

        if let Some(val) = var("BRAWLER_TICK_RATE") {
            match val.trim().parse() {
                Ok(hz) => self.tick_rate_hz = hz,
                Err(_) => problems.push(bad("BRAWLER_TICK_RATE", &val)),
            }
        }
        if let Some(val) = var("BRAWLER_SEED") {
            match val.trim().parse() {
                Ok(seed) => self.seed = Some(seed),
                Err(_) => problems.push(bad("BRAWLER_SEED", &val)),
            }
        }
        if let Some(name) = var("BRAWLER_FIGHTER") {
            self.fighter = Some(name);
        }
        if let Some(val) = var("BRAWLER_AUTOPILOT") {
            match val.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => self.autopilot = true,
                "0" | "false" | "no" | "off" => self.autopilot = false,
                _ => problems.push(bad("BRAWLER_AUTOPILOT", &val)),
            }
        }
        if let Some(val) = var("BRAWLER_LOG_FORMAT") {
            match val.parse() {
                Ok(format) => self.log_format = format,
                Err(e) => problems.push(e),
            }
        }
        problems
    }

    pub fn validate(&self) -> Result<(), HostError> {
        if self.tick_rate_hz == 0 || self.tick_rate_hz > MAX_TICK_RATE_HZ {
            return Err(HostError::InvalidConfig(format!(
                "tick_rate_hz must be in 1..={MAX_TICK_RATE_HZ}, got {}",
                self.tick_rate_hz
            )));
        }
        self.archetype()?;
        Ok(())
    }

    /// Resolve the configured human fighter against the roster.
    pub fn archetype(&self) -> Result<&'static Archetype, HostError> {
        match &self.fighter {
            Some(name) => {
                Archetype::by_name(name).ok_or_else(|| HostError::UnknownArchetype(name.clone()))
            },
            None => Ok(Archetype::default_pick()),
        }
    }
}
