//! # Entity Store
//!
//! Bounded per-entity component storage for the Tessera ECS runtime.
//!
//! ## Core Components
//!
//! - **components**: The component capability contract, kind identities, and the factory catalog
//! - **registry**: Insertion-only mapping from component kind to a dense slot index
//! - **entities**: Entities, generation-checked handles, shared ownership, and bulk loading
//! - **config**: Capacity settings loadable from TOML
//! - **error**: The error type shared with `event_publisher`
//!
//! Everything here is single-threaded and synchronous. An entity or registry
//! has one logical owner; callers that share one across threads must supply
//! their own synchronization.

pub mod components;
pub mod config;
pub mod entities;
pub mod error;
pub mod registry;

pub use components::*;
pub use config::*;
pub use entities::*;
pub use error::*;
pub use registry::*;
