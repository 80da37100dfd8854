//! Error types shared by the registry, entities, loader, and publisher.

use thiserror::Error;

/// Errors raised by component registries, entities, and the event publisher.
///
/// Every operation that returns one of these leaves the registry, entity,
/// or publisher exactly as it was before the call.
#[derive(Error, Debug)]
pub enum EcsError {
    /// The component kind already has a slot in this registry.
    #[error("component kind {kind} is already registered")]
    DuplicateRegistration { kind: &'static str },

    /// The entity already holds an instance of this kind.
    #[error("entity already holds a {kind} component")]
    DuplicateComponent { kind: &'static str },

    /// No free registry slot is left for a new kind.
    #[error("component capacity exceeded: {size} of {capacity} slots in use")]
    CapacityExceeded { size: usize, capacity: usize },

    /// The component kind has never been registered.
    #[error("component kind {kind} is not registered")]
    NotFound { kind: &'static str },

    /// The name does not identify a known component kind at all.
    #[error("{name:?} is not a known component kind")]
    InvalidKind { name: String },

    /// `process_top_event` was called with nothing queued.
    #[error("the event queue is empty")]
    EmptyQueue,

    /// A tracked entity was already borrowed when the publisher tried to dispatch to it.
    #[error("a tracked entity is already borrowed")]
    EntityBorrowed,

    /// A bulk component payload could not be applied.
    #[error("failed to load components: {0}")]
    Load(#[from] LoadError),

    /// A configuration document could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),
}

/// Reasons a bulk component payload is rejected.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("payload is not valid JSON: {0}")]
    Parse(#[source] serde_json::Error),

    #[error("payload has no \"components\" object")]
    MissingComponents,

    #[error("fields for {kind} must be an object")]
    NotAnObject { kind: String },

    #[error("unknown component kind {0:?}")]
    UnknownKind(String),

    /// The kind is known but was registered without a payload loader.
    #[error("component kind {0} cannot be loaded from a payload")]
    NotLoadable(&'static str),

    #[error("{kind} has no field {field:?}")]
    UnknownField { kind: &'static str, field: String },

    #[error("invalid value for {kind}: {source}")]
    Field {
        kind: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Result type for entity store and publisher operations.
pub type EcsResult<T> = Result<T, EcsError>;
