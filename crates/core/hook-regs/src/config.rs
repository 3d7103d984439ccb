//! Register profile configuration
//!
//! Profiles name the register sets a dispatcher builds banks from, so a
//! calling-convention table can live in a TOML file:
//!
//! ```toml
//! [[profile]]
//! name = "thiscall"
//! registers = ["ecx", "eax"]
//! ```

use std::collections::HashSet;
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::requirements::RegisterProfile;

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HookRegsConfig {
    #[serde(rename = "profile", default)]
    pub profiles: Vec<RegisterProfile>,
}

impl HookRegsConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        debug!("Loaded {} register profiles", config.profiles.len());
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&source)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string(self).map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    pub fn profile(&self, name: &str) -> Option<&RegisterProfile> {
        self.profiles.iter().find(|profile| profile.name == name)
    }

    /// Profile names must be non-empty and unique, and every profile needs at
    /// least one register.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for profile in &self.profiles {
            if profile.name.trim().is_empty() {
                return Err(ConfigError::Invalid(
                    "profile name must not be empty".to_string(),
                ));
            }
            if !seen.insert(profile.name.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate profile '{}'",
                    profile.name
                )));
            }
            if profile.registers.is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "profile '{}' lists no registers",
                    profile.name
                )));
            }
        }
        Ok(())
    }
}
