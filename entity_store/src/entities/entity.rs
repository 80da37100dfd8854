//! Per-entity component storage.

use super::EntityId;
use crate::components::{Component, ComponentKind, ErasedComponent};
use crate::config::{StoreConfig, DEFAULT_MAX_COMPONENTS};
use crate::error::{EcsError, EcsResult};
use crate::registry::{ComponentRegistry, SlotIndex};

/// One storage position. The generation advances every time the slot is
/// emptied so stale [`ComponentHandle`](super::ComponentHandle)s stop resolving.
#[derive(Debug, Clone, Default)]
pub(super) struct Slot {
    pub(super) component: Option<Box<dyn ErasedComponent>>,
    pub(super) generation: u32,
}

/// A bounded container holding at most one instance per component kind.
///
/// Each entity owns a private [`ComponentRegistry`] and a slot array of the
/// same capacity. A kind keeps its slot for the life of the registry: the
/// slot can be emptied with [`remove`](Self::remove) and refilled with
/// [`add`](Self::add) without registering the kind again.
///
/// Invariant: `num_components() <= num_registered_components() <= max_components()`.
#[derive(Debug)]
pub struct Entity {
    id: EntityId,
    registry: ComponentRegistry,
    pub(super) slots: Vec<Slot>,
    num_components: usize,
}

impl Entity {
    /// Create an empty entity that can register up to `max_components` kinds.
    pub fn new(max_components: usize) -> Self {
        let mut slots = Vec::with_capacity(max_components);
        slots.resize_with(max_components, Slot::default);
        Self {
            id: EntityId::new(),
            registry: ComponentRegistry::new(max_components),
            slots,
            num_components: 0,
        }
    }

    /// Create an empty entity sized by `config.max_components`.
    pub fn with_config(config: &StoreConfig) -> Self {
        Self::new(config.max_components)
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    /// The entity's private kind-to-slot mapping.
    pub fn registry(&self) -> &ComponentRegistry {
        &self.registry
    }

    /// Number of occupied slots.
    pub fn num_components(&self) -> usize {
        self.num_components
    }

    /// Number of kinds ever registered (occupied or not).
    pub fn num_registered_components(&self) -> usize {
        self.registry.len()
    }

    pub fn max_components(&self) -> usize {
        self.registry.capacity()
    }

    /// Add a default-constructed `T` and return a reference to the stored value.
    ///
    /// Registers `T` on first use. Fails with `DuplicateComponent` if a `T`
    /// is already present and with `CapacityExceeded` if `T` is new and every
    /// slot is taken; neither failure changes the entity.
    pub fn add<T: Component>(&mut self) -> EcsResult<&mut T> {
        let index = self.insert_with(ComponentKind::of::<T>(), || Box::new(T::default()))?;
        self.typed_mut_at(index)
    }

    /// Add a clone of `prototype`. The entity never aliases the prototype.
    pub fn add_from<T: Component>(&mut self, prototype: &T) -> EcsResult<&mut T> {
        let index = self.insert_with(ComponentKind::of::<T>(), || prototype.clone_boxed())?;
        self.typed_mut_at(index)
    }

    /// Store an already type-erased component in the slot for its kind.
    pub fn add_boxed(&mut self, component: Box<dyn ErasedComponent>) -> EcsResult<SlotIndex> {
        self.insert_with(component.kind(), move || component)
    }

    pub(super) fn insert_with(
        &mut self,
        kind: ComponentKind,
        make: impl FnOnce() -> Box<dyn ErasedComponent>,
    ) -> EcsResult<SlotIndex> {
        let index = match self.registry.find(kind) {
            Some(index) if self.slots[index.0].component.is_some() => {
                return Err(EcsError::DuplicateComponent { kind: kind.name() });
            }
            Some(index) => index,
            None => self.registry.register(kind)?,
        };

        self.slots[index.0].component = Some(make());
        self.num_components += 1;
        Ok(index)
    }

    /// Remove the `T` component.
    ///
    /// Returns `Ok(false)` if `T` is registered but its slot is already empty,
    /// and fails with `NotFound` if `T` was never registered.
    pub fn remove<T: Component>(&mut self) -> EcsResult<bool> {
        self.remove_kind(ComponentKind::of::<T>())
    }

    /// Non-strict [`remove`](Self::remove): unregistered kinds yield `false`.
    pub fn try_remove<T: Component>(&mut self) -> bool {
        match self.registry.find(ComponentKind::of::<T>()) {
            Some(index) => self.vacate(index),
            None => false,
        }
    }

    pub fn remove_kind(&mut self, kind: ComponentKind) -> EcsResult<bool> {
        let index = self.registry.lookup(kind)?;
        Ok(self.vacate(index))
    }

    fn vacate(&mut self, index: SlotIndex) -> bool {
        let slot = &mut self.slots[index.0];
        if slot.component.take().is_none() {
            return false;
        }
        slot.generation = slot.generation.wrapping_add(1);
        self.num_components -= 1;
        true
    }

    /// The `T` component, `None` if its slot is empty.
    ///
    /// Fails with `NotFound` if `T` was never registered.
    pub fn get<T: Component>(&self) -> EcsResult<Option<&T>> {
        let index = self.registry.lookup(ComponentKind::of::<T>())?;
        Ok(self.typed_at(index))
    }

    /// Non-strict [`get`](Self::get).
    pub fn try_get<T: Component>(&self) -> Option<&T> {
        let index = self.registry.find(ComponentKind::of::<T>())?;
        self.typed_at(index)
    }

    pub fn get_mut<T: Component>(&mut self) -> EcsResult<Option<&mut T>> {
        let index = self.registry.lookup(ComponentKind::of::<T>())?;
        Ok(self.slot_typed_mut(index))
    }

    pub fn try_get_mut<T: Component>(&mut self) -> Option<&mut T> {
        let index = self.registry.find(ComponentKind::of::<T>())?;
        self.slot_typed_mut(index)
    }

    /// Type-erased access to the component in `kind`'s slot.
    pub fn get_erased(&self, kind: ComponentKind) -> Option<&dyn ErasedComponent> {
        let index = self.registry.find(kind)?;
        self.slots[index.0].component.as_deref()
    }

    pub(super) fn typed_at<T: Component>(&self, index: SlotIndex) -> Option<&T> {
        self.slots[index.0]
            .component
            .as_deref()?
            .as_any()
            .downcast_ref::<T>()
    }

    pub(super) fn slot_typed_mut<T: Component>(&mut self, index: SlotIndex) -> Option<&mut T> {
        self.slots[index.0]
            .component
            .as_deref_mut()?
            .as_any_mut()
            .downcast_mut::<T>()
    }

    fn typed_mut_at<T: Component>(&mut self, index: SlotIndex) -> EcsResult<&mut T> {
        self.slot_typed_mut(index).ok_or(EcsError::NotFound {
            kind: T::kind_name(),
        })
    }

    pub fn has<T: Component>(&self) -> bool {
        self.has_kind(ComponentKind::of::<T>())
    }

    /// True when `kind` is registered and its slot is occupied.
    pub fn has_kind(&self, kind: ComponentKind) -> bool {
        self.registry
            .find(kind)
            .is_some_and(|index| self.slots[index.0].component.is_some())
    }

    /// True when every kind in `kinds` is present. An empty list is never satisfied.
    pub fn has_all(&self, kinds: &[ComponentKind]) -> bool {
        !kinds.is_empty() && kinds.iter().all(|kind| self.has_kind(*kind))
    }

    /// True when at least one kind in `kinds` is present.
    pub fn has_any(&self, kinds: &[ComponentKind]) -> bool {
        kinds.iter().any(|kind| self.has_kind(*kind))
    }

    /// True when all of `matches` and none of `excludes` are present.
    pub fn has_excluding(&self, matches: &[ComponentKind], excludes: &[ComponentKind]) -> bool {
        self.has_all(matches) && !self.has_any(excludes)
    }

    /// Kinds with an occupied slot, in slot order.
    pub fn kinds(&self) -> impl Iterator<Item = ComponentKind> + '_ {
        self.registry
            .all_kinds()
            .enumerate()
            .filter(|(index, _)| self.slots[*index].component.is_some())
            .map(|(_, kind)| kind)
    }

    /// Empty every slot but keep the kind-to-slot mapping.
    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            if slot.component.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
            }
        }
        self.num_components = 0;
        tracing::trace!(entity = %self.id, "components cleared");
    }

    /// Empty every slot and start over with a fresh registry of the same capacity.
    pub fn reset(&mut self) {
        self.clear();
        self.registry = ComponentRegistry::new(self.registry.capacity());
    }

    /// Deep copy that keeps this entity's id; used to stage all-or-nothing updates.
    pub(super) fn duplicate(&self) -> Self {
        Self {
            id: self.id,
            registry: self.registry.clone(),
            slots: self.slots.clone(),
            num_components: self.num_components,
        }
    }
}

impl Default for Entity {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_COMPONENTS)
    }
}

/// Deep copy under a fresh [`EntityId`].
///
/// The copy keeps the source's full registry layout, including kinds whose
/// slots are currently empty, and clones every occupied slot.
impl Clone for Entity {
    fn clone(&self) -> Self {
        let mut copy = self.duplicate();
        copy.id = EntityId::new();
        copy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::testing::*;

    fn kinds_ab() -> [ComponentKind; 2] {
        [ComponentKind::of::<A>(), ComponentKind::of::<B>()]
    }

    #[test]
    fn test_default_entity() {
        let entity = Entity::default();
        assert_eq!(entity.num_registered_components(), 0);
        assert_eq!(entity.num_components(), 0);
        assert_eq!(entity.max_components(), 50);
    }

    #[test]
    fn test_sized_entity() {
        let entity = Entity::new(2);
        assert_eq!(entity.max_components(), 2);
        assert_eq!(entity.num_components(), 0);
    }

    #[test]
    fn test_add_increments_counts() {
        let mut entity = Entity::default();
        entity.add::<A>().unwrap();
        assert_eq!(entity.num_registered_components(), 1);
        entity.add::<B>().unwrap();
        assert_eq!(entity.num_registered_components(), 2);
        assert_eq!(entity.num_components(), 2);
    }

    #[test]
    fn test_add_returns_stored_reference() {
        let mut entity = Entity::default();
        let position = entity.add::<Position>().unwrap();
        position.x = 4;
        assert_eq!(entity.try_get::<Position>(), Some(&Position::new(4, 0)));
    }

    #[test]
    fn test_add_from_prototype_copies() {
        let mut entity = Entity::default();
        let prototype = Position::new(3, 9);
        let stored = entity.add_from(&prototype).unwrap();
        stored.x = 100;
        assert_eq!(prototype, Position::new(3, 9));
        assert_eq!(entity.try_get::<Position>(), Some(&Position::new(100, 9)));
    }

    #[test]
    fn test_double_add_has_no_side_effects() {
        let mut entity = Entity::default();
        entity.add::<A>().unwrap();
        let err = entity.add::<A>().unwrap_err();
        assert!(matches!(err, EcsError::DuplicateComponent { kind: "A" }));
        assert_eq!(entity.num_components(), 1);
        assert_eq!(entity.num_registered_components(), 1);
    }

    #[test]
    fn test_add_beyond_capacity() {
        let mut entity = Entity::new(2);
        entity.add::<A>().unwrap();
        entity.add::<B>().unwrap();
        let err = entity.add::<C>().unwrap_err();
        assert!(matches!(err, EcsError::CapacityExceeded { .. }));
        assert_eq!(entity.num_components(), 2);
        assert!(!entity.registry().contains(ComponentKind::of::<C>()));
    }

    #[test]
    fn test_full_entity_still_refills_registered_slot() {
        let mut entity = Entity::new(1);
        entity.add::<A>().unwrap();
        entity.remove::<A>().unwrap();
        entity.add::<A>().unwrap();
        assert_eq!(entity.num_components(), 1);
    }

    #[test]
    fn test_add_remove_add_reuses_slot() {
        let mut entity = Entity::default();
        entity.add::<A>().unwrap();
        assert!(entity.remove::<A>().unwrap());
        entity.add::<A>().unwrap();
        assert_eq!(entity.num_components(), 1);
        assert_eq!(entity.num_registered_components(), 1);
    }

    #[test]
    fn test_add_after_removal() {
        let mut entity = Entity::default();
        entity.add::<A>().unwrap();
        entity.add::<B>().unwrap();
        entity.remove::<A>().unwrap();
        entity.remove::<B>().unwrap();
        assert_eq!(entity.num_components(), 0);

        entity.add_from(&A).unwrap();
        entity.add::<B>().unwrap();
        assert_eq!(entity.num_components(), 2);
        assert_eq!(entity.num_registered_components(), 2);
    }

    #[test]
    fn test_remove_keeps_registration() {
        let mut entity = Entity::default();
        entity.add::<A>().unwrap();
        entity.remove::<A>().unwrap();
        assert_eq!(entity.num_components(), 0);
        assert_eq!(entity.num_registered_components(), 1);
    }

    #[test]
    fn test_remove_results() {
        let mut entity = Entity::default();
        entity.add::<A>().unwrap();
        assert!(entity.remove::<A>().unwrap());
        assert!(!entity.remove::<A>().unwrap());
        assert!(!entity.try_remove::<B>());
        assert!(matches!(
            entity.remove::<B>(),
            Err(EcsError::NotFound { kind: "B" })
        ));
    }

    #[test]
    fn test_get_results() {
        let mut entity = Entity::default();
        entity.add::<A>().unwrap();
        entity.add::<B>().unwrap();
        entity.remove::<B>().unwrap();

        assert_eq!(entity.get::<A>().unwrap(), Some(&A));
        assert_eq!(entity.get::<B>().unwrap(), None);
        assert_eq!(entity.try_get::<C>(), None);
        assert!(matches!(entity.get::<C>(), Err(EcsError::NotFound { .. })));
    }

    #[test]
    fn test_get_mut_aliases_storage() {
        let mut entity = Entity::default();
        entity.add::<Position>().unwrap();
        entity.get_mut::<Position>().unwrap().unwrap().y = -2;
        entity.try_get_mut::<Position>().unwrap().x = 5;
        assert_eq!(entity.try_get::<Position>(), Some(&Position::new(5, -2)));
    }

    #[test]
    fn test_has() {
        let mut entity = Entity::default();
        entity.add::<A>().unwrap();
        assert!(entity.has::<A>());
        assert!(!entity.has::<B>());
        entity.remove::<A>().unwrap();
        assert!(!entity.has::<A>());
    }

    #[test]
    fn test_has_all_and_any() {
        let mut entity = Entity::default();
        assert!(!entity.has_all(&[]));
        assert!(!entity.has_any(&[]));

        entity.add::<A>().unwrap();
        assert!(!entity.has_all(&kinds_ab()));
        assert!(entity.has_any(&kinds_ab()));

        entity.add::<B>().unwrap();
        assert!(entity.has_all(&kinds_ab()));
        assert!(!entity.has_any(&[ComponentKind::of::<C>()]));
    }

    #[test]
    fn test_has_excluding() {
        let mut entity = Entity::default();
        entity.add::<A>().unwrap();
        let a = [ComponentKind::of::<A>()];
        let b = [ComponentKind::of::<B>()];

        assert_eq!(entity.has_excluding(&a, &[]), entity.has::<A>());
        assert!(entity.has_excluding(&a, &b));
        assert!(!entity.has_excluding(&[], &b));

        entity.add::<B>().unwrap();
        assert!(!entity.has_excluding(&a, &b));
    }

    #[test]
    fn test_clone_is_independent() {
        let mut entity = Entity::default();
        entity.add_from(&Position::new(5, 1)).unwrap();

        let mut copy = entity.clone();
        copy.try_get_mut::<Position>().unwrap().x = 999;
        assert_eq!(entity.try_get::<Position>().unwrap().x, 5);

        entity.try_get_mut::<Position>().unwrap().y = 42;
        assert_eq!(copy.try_get::<Position>().unwrap().y, 1);
        assert_ne!(copy.id(), entity.id());
        assert_eq!(copy.max_components(), entity.max_components());
    }

    #[test]
    fn test_clone_preserves_registry_layout() {
        let mut entity = Entity::default();
        entity.add::<A>().unwrap();
        entity.add::<B>().unwrap();
        entity.add::<C>().unwrap();
        entity.remove::<B>().unwrap();

        let copy = entity.clone();
        assert_eq!(copy.num_components(), 2);
        assert_eq!(copy.num_registered_components(), 3);
        let layout: Vec<_> = copy.registry().all_kinds().collect();
        let source: Vec<_> = entity.registry().all_kinds().collect();
        assert_eq!(layout, source);
        assert!(!copy.has::<B>());
    }

    #[test]
    fn test_clone_round_trip() {
        let mut entity = Entity::default();
        entity.add_from(&Position::new(7, -7)).unwrap();
        entity.add_from(&Name {
            value: "scout".to_string(),
        })
        .unwrap();

        let twice = entity.clone().clone();
        assert_eq!(twice.try_get::<Position>(), entity.try_get::<Position>());
        assert_eq!(twice.try_get::<Name>(), entity.try_get::<Name>());
        assert_eq!(twice.kinds().collect::<Vec<_>>(), entity.kinds().collect::<Vec<_>>());
    }

    #[test]
    fn test_clear_preserves_registry() {
        let mut entity = Entity::default();
        entity.add::<A>().unwrap();
        entity.add::<B>().unwrap();
        entity.clear();
        assert_eq!(entity.num_components(), 0);
        assert_eq!(entity.num_registered_components(), 2);
        assert!(!entity.has::<A>());
        assert_eq!(entity.get::<A>().unwrap(), None);
    }

    #[test]
    fn test_reset_drops_registry() {
        let mut entity = Entity::new(4);
        entity.add::<A>().unwrap();
        entity.add::<B>().unwrap();
        entity.reset();
        assert_eq!(entity.num_components(), 0);
        assert_eq!(entity.num_registered_components(), 0);
        assert_eq!(entity.max_components(), 4);
        assert!(matches!(entity.get::<A>(), Err(EcsError::NotFound { .. })));

        entity.add::<B>().unwrap();
        assert_eq!(entity.registry().lookup(ComponentKind::of::<B>()).unwrap(), SlotIndex(0));
    }

    #[test]
    fn test_add_boxed() {
        let mut entity = Entity::default();
        let index = entity.add_boxed(Box::new(Position::new(1, 1))).unwrap();
        assert_eq!(index, SlotIndex(0));
        assert!(entity.get_erased(ComponentKind::of::<Position>()).is_some());
        assert!(matches!(
            entity.add_boxed(Box::new(Position::default())),
            Err(EcsError::DuplicateComponent { .. })
        ));
    }
}
