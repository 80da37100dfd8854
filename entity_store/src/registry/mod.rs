//! Component registry - assigns each component kind a dense, stable slot index.

use std::collections::HashMap;
use std::fmt;

use crate::components::{Component, ComponentCatalog, ComponentKind};
use crate::config::{StoreConfig, DEFAULT_REGISTRY_CAPACITY};
use crate::error::{EcsError, EcsResult};

/// Position of a component kind in an entity's slot array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotIndex(pub usize);

impl SlotIndex {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for SlotIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Insertion-only mapping from component kind to slot index.
///
/// Indices are handed out contiguously from zero in registration order and
/// never change or get reused. The registry never holds more than
/// `capacity` kinds.
#[derive(Debug, Clone)]
pub struct ComponentRegistry {
    slots: HashMap<ComponentKind, SlotIndex>,
    /// Kinds in registration order; `order[i]` owns slot `i`.
    order: Vec<ComponentKind>,
    capacity: usize,
}

impl ComponentRegistry {
    /// Create an empty registry that accepts at most `capacity` kinds.
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: HashMap::with_capacity(capacity),
            order: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Create an empty registry sized by `config.registry_capacity`.
    pub fn with_config(config: &StoreConfig) -> Self {
        Self::new(config.registry_capacity)
    }

    /// Assign the next free slot to `kind`.
    pub fn register(&mut self, kind: ComponentKind) -> EcsResult<SlotIndex> {
        if self.slots.contains_key(&kind) {
            return Err(EcsError::DuplicateRegistration { kind: kind.name() });
        }
        if self.is_full() {
            tracing::debug!(kind = kind.name(), capacity = self.capacity, "registry full");
            return Err(EcsError::CapacityExceeded {
                size: self.len(),
                capacity: self.capacity,
            });
        }

        let index = SlotIndex(self.order.len());
        self.slots.insert(kind, index);
        self.order.push(kind);
        tracing::trace!(kind = kind.name(), %index, "component kind registered");
        Ok(index)
    }

    /// Typed shorthand for [`register`](Self::register).
    pub fn register_type<T: Component>(&mut self) -> EcsResult<SlotIndex> {
        self.register(ComponentKind::of::<T>())
    }

    pub fn contains(&self, kind: ComponentKind) -> bool {
        self.slots.contains_key(&kind)
    }

    /// Slot of `kind`, failing with `NotFound` if it was never registered.
    pub fn lookup(&self, kind: ComponentKind) -> EcsResult<SlotIndex> {
        self.find(kind)
            .ok_or(EcsError::NotFound { kind: kind.name() })
    }

    /// Slot of `kind`, or `None` if it was never registered.
    pub fn find(&self, kind: ComponentKind) -> Option<SlotIndex> {
        self.slots.get(&kind).copied()
    }

    /// Slot of the kind called `name` in `catalog`.
    ///
    /// Fails with `InvalidKind` when the catalog has no such kind and with
    /// `NotFound` when the kind exists but is not registered here.
    pub fn lookup_name(&self, catalog: &ComponentCatalog, name: &str) -> EcsResult<SlotIndex> {
        self.lookup(catalog.kind(name)?)
    }

    /// Non-strict [`lookup_name`](Self::lookup_name): an unregistered kind
    /// yields `Ok(None)`, but an unknown name is still `InvalidKind`.
    pub fn find_name(&self, catalog: &ComponentCatalog, name: &str) -> EcsResult<Option<SlotIndex>> {
        Ok(self.find(catalog.kind(name)?))
    }

    /// Every kind ever registered, in slot order.
    ///
    /// Each call starts a fresh pass over the registry.
    pub fn all_kinds(&self) -> impl Iterator<Item = ComponentKind> + '_ {
        self.order.iter().copied()
    }

    /// The kind owning `index`, if that slot has been assigned.
    pub fn kind_at(&self, index: SlotIndex) -> Option<ComponentKind> {
        self.order.get(index.0).copied()
    }

    /// Number of registered kinds.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.order.len() >= self.capacity
    }
}

impl Default for ComponentRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_REGISTRY_CAPACITY)
    }
}
