//! Shared, single-threaded entity ownership for hosts that hand entities to a publisher.

use std::cell::{Ref, RefCell, RefMut};
use std::rc::{Rc, Weak};

use super::{Entity, EntityId};
use crate::error::{EcsError, EcsResult};

/// Identity of a shared entity's allocation.
///
/// Two handles have the same key exactly when they share one entity. The
/// [`EntityId`] stored inside is not used for this: it can be swapped or
/// taken out through a mutable borrow. A [`WeakEntity`] keeps the allocation
/// reserved, so a key stays unique while any handle to it exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityKey(*const RefCell<Entity>);

/// An entity owned by its creator and observable by others.
///
/// Clones share the same entity.
#[derive(Debug, Clone)]
pub struct SharedEntity {
    cell: Rc<RefCell<Entity>>,
}

impl SharedEntity {
    pub fn new(entity: Entity) -> Self {
        Self {
            cell: Rc::new(RefCell::new(entity)),
        }
    }

    pub fn key(&self) -> EntityKey {
        EntityKey(Rc::as_ptr(&self.cell))
    }

    /// The id currently held by the entity.
    ///
    /// Panics if the entity is mutably borrowed.
    pub fn id(&self) -> EntityId {
        self.cell.borrow().id()
    }

    /// Panics if the entity is mutably borrowed.
    pub fn borrow(&self) -> Ref<'_, Entity> {
        self.cell.borrow()
    }

    /// Panics if the entity is already borrowed.
    pub fn borrow_mut(&self) -> RefMut<'_, Entity> {
        self.cell.borrow_mut()
    }

    /// Fallible [`borrow_mut`](Self::borrow_mut).
    pub fn try_borrow_mut(&self) -> EcsResult<RefMut<'_, Entity>> {
        self.cell.try_borrow_mut().map_err(|_| EcsError::EntityBorrowed)
    }

    /// A non-owning reference to the same entity.
    pub fn downgrade(&self) -> WeakEntity {
        WeakEntity {
            cell: Rc::downgrade(&self.cell),
        }
    }
}

impl From<Entity> for SharedEntity {
    fn from(entity: Entity) -> Self {
        Self::new(entity)
    }
}

/// A tracking reference that does not keep its entity alive.
#[derive(Debug, Clone)]
pub struct WeakEntity {
    cell: Weak<RefCell<Entity>>,
}

impl WeakEntity {
    pub fn key(&self) -> EntityKey {
        EntityKey(Weak::as_ptr(&self.cell))
    }

    /// The entity, unless every owner has dropped it.
    pub fn upgrade(&self) -> Option<SharedEntity> {
        self.cell.upgrade().map(|cell| SharedEntity { cell })
    }

    pub fn is_alive(&self) -> bool {
        self.cell.strong_count() > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::testing::*;

    #[test]
    fn test_shared_entity_aliases() {
        let shared = SharedEntity::new(Entity::default());
        let other = shared.clone();
        other.borrow_mut().add::<A>().unwrap();
        assert!(shared.borrow().has::<A>());
        assert_eq!(shared.key(), other.key());
        assert_eq!(shared.id(), other.id());
    }

    #[test]
    fn test_key_ignores_entity_id() {
        let first = SharedEntity::new(Entity::default());
        let second = SharedEntity::new(first.borrow().duplicate());

        assert_eq!(first.id(), second.id());
        assert_ne!(first.key(), second.key());
    }

    #[test]
    fn test_try_borrow_mut_reports_conflict() {
        let shared = SharedEntity::new(Entity::default());
        let _reader = shared.borrow();
        assert!(matches!(shared.try_borrow_mut(), Err(EcsError::EntityBorrowed)));
    }

    #[test]
    fn test_weak_entity_does_not_own() {
        let shared = SharedEntity::from(Entity::default());
        let weak = shared.downgrade();
        assert!(weak.is_alive());
        assert_eq!(weak.key(), shared.key());
        assert_eq!(weak.upgrade().map(|e| e.key()), Some(shared.key()));

        drop(shared);
        assert!(!weak.is_alive());
        assert!(weak.upgrade().is_none());
    }
}
