//! Capacity configuration for registries and entities.

use serde::{Deserialize, Serialize};

use crate::error::EcsResult;

/// Default number of component kinds an entity may ever register.
pub const DEFAULT_MAX_COMPONENTS: usize = 50;

/// Default capacity of a standalone component registry.
pub const DEFAULT_REGISTRY_CAPACITY: usize = 255;

/// Capacity settings, loadable from a TOML document.
///
/// ```toml
/// max_components = 16
/// registry_capacity = 64
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Slot count of every entity built from this config.
    pub max_components: usize,

    /// Capacity of standalone registries built from this config.
    pub registry_capacity: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            max_components: DEFAULT_MAX_COMPONENTS,
            registry_capacity: DEFAULT_REGISTRY_CAPACITY,
        }
    }
}

impl StoreConfig {
    /// Parse a config from TOML text. Missing keys keep their defaults.
    pub fn from_toml_str(text: &str) -> EcsResult<Self> {
        Ok(toml::from_str(text)?)
    }
}
