//! Publisher - tracks entities and drains a priority-ordered event queue against them.

mod queue;

use std::cell::RefMut;
use std::collections::HashMap;

use entity_store::{EcsError, EcsResult, Entity, EntityKey, SharedEntity, WeakEntity};

use crate::events::Event;
use queue::EventQueue;

/// Coordinator holding tracked entities and pending events.
///
/// The publisher never owns entities: it keeps a [`WeakEntity`] per tracked
/// entity, and entities dropped by their owners silently stop receiving
/// events. Tracking is by [`EntityKey`], the identity of the shared
/// allocation, so a clone of a tracked entity is a different entity and the
/// ids held inside entities play no part.
///
/// Queued events are processed lowest priority value first; events with
/// equal priority are processed last-in-first-out.
#[derive(Default)]
pub struct Publisher {
    entities: HashMap<EntityKey, WeakEntity>,
    queue: EventQueue,
}

impl Publisher {
    /// Create a publisher with no entities or events.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking `entity`. Returns `false` if it is already tracked.
    pub fn add_entity(&mut self, entity: &SharedEntity) -> bool {
        self.prune();
        let key = entity.key();
        if self.entities.contains_key(&key) {
            return false;
        }
        self.entities.insert(key, entity.downgrade());
        tracing::debug!(?key, tracked = self.entities.len(), "entity tracked");
        true
    }

    /// Stop tracking `entity`. Returns `false` if it was not tracked.
    pub fn remove_entity(&mut self, entity: &SharedEntity) -> bool {
        let key = entity.key();
        let removed = self.entities.remove(&key).is_some();
        if removed {
            tracing::debug!(?key, tracked = self.entities.len(), "entity untracked");
        }
        removed
    }

    pub fn contains_entity(&self, entity: &SharedEntity) -> bool {
        self.entities
            .get(&entity.key())
            .is_some_and(WeakEntity::is_alive)
    }

    /// Number of tracked entities that are still alive.
    pub fn num_entities(&self) -> usize {
        self.entities.values().filter(|entity| entity.is_alive()).count()
    }

    /// Queue `event` for a later [`process_top_event`](Self::process_top_event)
    /// or [`process_queue`](Self::process_queue).
    pub fn add_event(&mut self, event: impl Event + 'static) {
        self.queue.push(Box::new(event));
    }

    pub fn num_pending_events(&self) -> usize {
        self.queue.len()
    }

    pub fn has_pending_events(&self) -> bool {
        !self.queue.is_empty()
    }

    /// Priority of the event [`process_top_event`](Self::process_top_event) would run next.
    pub fn next_priority(&self) -> Option<i32> {
        self.queue.peek_priority()
    }

    /// Dispatch `event` to every tracked entity right away, bypassing the queue.
    ///
    /// Returns how many entities the event was applied to. Fails with
    /// `EntityBorrowed`, applying nothing, if any tracked entity is currently
    /// borrowed.
    pub fn process_event(&mut self, mut event: impl Event) -> EcsResult<usize> {
        let live = self.live_entities();
        let mut targets = borrow_all(&live)?;
        Ok(apply(&mut event, &mut targets))
    }

    /// Dispatch the next queued event to every tracked entity.
    ///
    /// Fails with `EmptyQueue` if nothing is queued. If a tracked entity is
    /// borrowed the call fails with `EntityBorrowed` and the event stays queued.
    pub fn process_top_event(&mut self) -> EcsResult<usize> {
        if self.queue.is_empty() {
            return Err(EcsError::EmptyQueue);
        }
        let live = self.live_entities();
        let mut targets = borrow_all(&live)?;
        let mut event = self.queue.pop().ok_or(EcsError::EmptyQueue)?;
        Ok(apply(&mut *event, &mut targets))
    }

    /// Process queued events until the queue is empty. Returns the number processed.
    pub fn process_queue(&mut self) -> EcsResult<usize> {
        let mut processed = 0;
        while self.has_pending_events() {
            self.process_top_event()?;
            processed += 1;
        }
        tracing::debug!(processed, "event queue drained");
        Ok(processed)
    }

    /// Forget entities whose owners have dropped them.
    fn prune(&mut self) {
        self.entities.retain(|_, entity| entity.is_alive());
    }

    fn live_entities(&mut self) -> Vec<SharedEntity> {
        self.prune();
        self.entities.values().filter_map(WeakEntity::upgrade).collect()
    }
}

/// Borrow every entity up front so a conflict is reported before anything is mutated.
fn borrow_all(entities: &[SharedEntity]) -> EcsResult<Vec<RefMut<'_, Entity>>> {
    entities.iter().map(SharedEntity::try_borrow_mut).collect()
}

fn apply<E: Event + ?Sized>(event: &mut E, targets: &mut [RefMut<'_, Entity>]) -> usize {
    let mut applied = 0;
    for target in targets.iter_mut() {
        if event.dispatch_to_entity(target) {
            applied += 1;
        }
    }
    tracing::trace!(priority = event.priority(), targets = targets.len(), applied, "event dispatched");
    applied
}
