//! Entities - bounded containers holding at most one component per kind.

mod entity;
mod handle;
mod loader;
mod shared;

pub use entity::*;
pub use handle::*;
pub use shared::*;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for every entity instance.
///
/// Cloning an entity produces a new id, so two ids are equal only when they
/// name the same instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityId(pub Uuid);

impl EntityId {
    /// Create a new random entity ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
