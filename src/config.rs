// =============================================================================
// CONFIGURATION - Load sandbox settings from sandbox.toml
// =============================================================================
//
// Only the sandbox reads this. The window size is fixed by the engine.

use anyhow::{Context, Result};
use log::LevelFilter;
use serde::Deserialize;
use std::path::Path;

pub const CONFIG_PATH: &str = "sandbox.toml";

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub window: WindowConfig,
    pub debug: DebugConfig,
    pub sandbox: SandboxConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Antimony Engine Sandbox".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DebugConfig {
    /// off, error, warn, info, debug or trace
    pub log_level: String,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SandboxConfig {
    /// Upper bound on how long one event poll may block
    pub poll_interval_ms: u64,
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 16,
        }
    }
}

impl Config {
    /// Load configuration from file, falling back to defaults if not found
    /// or unreadable.
    pub fn load() -> Self {
        Self::load_or_default(CONFIG_PATH)
    }

    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        Self::load_from_path(path).unwrap_or_else(|e| {
            // Runs before the logger exists
            eprintln!("Failed to load {:?}: {:#}. Using defaults.", path, e);
            Config::default()
        })
    }

    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            log::info!("Config file not found at {:?}, using defaults", path);
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;

        log::info!("Loaded configuration from {:?}", path);
        log::debug!("Config: {:?}", config);

        Ok(config)
    }

    pub fn log_level(&self) -> LevelFilter {
        self.debug.log_level.parse().unwrap_or_else(|_| {
            // Logging isn't up yet when this runs
            eprintln!(
                "Unknown log level '{}', defaulting to info",
                self.debug.log_level
            );
            LevelFilter::Info
        })
    }
}
