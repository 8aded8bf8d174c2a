//! Engine configuration, read from `config.toml`.
//!
//! ```toml
//! [shortcuts]
//! poll_interval_ms = 4
//! storage_key = "controller_shortcuts"
//! reserved_identities = ["Virtual Controller"]
//!
//! [navigation]
//! poll_interval_ms = 50
//! wrap_right_to_tabs = false
//!
//! [sticks]
//! press = 0.5
//! release = 0.1
//! ```

use anyhow::{Context as _, Result};
use gamepad::StickThresholds;
use navigation::{NavigatorConfig, SessionConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::warn;

/// Identity reported by the on-screen emulated controller.
pub const VIRTUAL_CONTROLLER_ID: &str = "Virtual Controller";

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub shortcuts: ShortcutSection,
    pub navigation: NavigationSection,
    pub sticks: StickThresholds,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShortcutSection {
    pub poll_interval_ms: u64,
    pub storage_key: String,
    /// Identities hidden from the profile list.
    pub reserved_identities: Vec<String>,
}

impl Default for ShortcutSection {
    fn default() -> Self {
        Self {
            poll_interval_ms: 4,
            storage_key: keymap::DEFAULT_STORAGE_KEY.to_owned(),
            reserved_identities: vec![VIRTUAL_CONTROLLER_ID.to_owned()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationSection {
    pub poll_interval_ms: u64,
    pub wrap_right_to_tabs: bool,
}

impl Default for NavigationSection {
    fn default() -> Self {
        Self {
            poll_interval_ms: 50,
            wrap_right_to_tabs: false,
        }
    }
}

impl EngineConfig {
    pub fn from_toml(text: &str) -> Result<Self> {
        let mut config: EngineConfig =
            toml::from_str(text).context("Failed to parse engine config")?;
        config.sticks = config.sticks.sanitized();
        Ok(config)
    }

    /// Read `path`. A missing file yields defaults; a malformed one yields
    /// defaults and a warning.
    pub fn load_or_default(path: &Path) -> Self {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Self::default(),
            Err(err) => {
                warn!(path = %path.display(), "failed to read engine config: {err}");
                return Self::default();
            }
        };
        Self::from_toml(&text).unwrap_or_else(|err| {
            warn!(path = %path.display(), "using default engine config: {err:#}");
            Self::default()
        })
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize engine config")
    }

    pub fn shortcut_interval(&self) -> Duration {
        Duration::from_millis(self.shortcuts.poll_interval_ms)
    }

    pub fn session(&self) -> SessionConfig {
        SessionConfig {
            poll_interval: Duration::from_millis(self.navigation.poll_interval_ms),
            sticks: self.sticks,
            navigator: NavigatorConfig {
                wrap_right_to_tabs: self.navigation.wrap_right_to_tabs,
            },
        }
    }
}
