//! Generation-checked component handles.

use std::fmt;
use std::marker::PhantomData;

use super::{Entity, EntityId};
use crate::components::{Component, ComponentKind};
use crate::registry::SlotIndex;

/// A detached reference to a component that is revalidated on every access.
///
/// Unlike a borrow, a handle can be held across mutations of its entity.
/// It stops resolving once the component it was taken from is removed or
/// cleared, even if the slot is later refilled.
pub struct ComponentHandle<T> {
    entity: EntityId,
    slot: SlotIndex,
    generation: u32,
    _marker: PhantomData<fn() -> T>,
}

impl<T> ComponentHandle<T> {
    pub fn entity(&self) -> EntityId {
        self.entity
    }

    pub fn slot(&self) -> SlotIndex {
        self.slot
    }
}

impl<T> Clone for ComponentHandle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ComponentHandle<T> {}

impl<T> PartialEq for ComponentHandle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.entity == other.entity && self.slot == other.slot && self.generation == other.generation
    }
}

impl<T> Eq for ComponentHandle<T> {}

impl<T: Component> fmt::Debug for ComponentHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentHandle")
            .field("kind", &ComponentKind::of::<T>())
            .field("entity", &self.entity)
            .field("slot", &self.slot)
            .field("generation", &self.generation)
            .finish()
    }
}

impl Entity {
    /// Take a handle to the current `T` component, if one is present.
    pub fn handle<T: Component>(&self) -> Option<ComponentHandle<T>> {
        let slot = self.registry().find(ComponentKind::of::<T>())?;
        let stored = &self.slots[slot.0];
        if stored.component.is_none() {
            return None;
        }
        Some(ComponentHandle {
            entity: self.id(),
            slot,
            generation: stored.generation,
            _marker: PhantomData,
        })
    }

    /// Whether `handle` still refers to a live component of this entity.
    pub fn is_valid<T: Component>(&self, handle: &ComponentHandle<T>) -> bool {
        self.resolve(handle).is_some()
    }

    pub fn resolve<T: Component>(&self, handle: &ComponentHandle<T>) -> Option<&T> {
        self.check(handle)?;
        self.typed_at(handle.slot)
    }

    pub fn resolve_mut<T: Component>(&mut self, handle: &ComponentHandle<T>) -> Option<&mut T> {
        self.check(handle)?;
        self.slot_typed_mut(handle.slot)
    }

    fn check<T>(&self, handle: &ComponentHandle<T>) -> Option<()> {
        let slot = self.slots.get(handle.slot.0)?;
        (handle.entity == self.id() && slot.generation == handle.generation).then_some(())
    }
}
