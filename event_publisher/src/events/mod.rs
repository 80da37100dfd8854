//! Events - one-shot behaviour units gated by a match/exclude predicate.
//!
//! A concrete event embeds an [`EventHeader`] and implements
//! [`Event::apply_to`]. Here is a damage event that only hits entities
//! with health that are not shielded:
//!
//! ```
//! use entity_store::{Component, Entity};
//! use event_publisher::{Event, EventHeader};
//!
//! #[derive(Debug, Clone, Default)]
//! struct Health(i32);
//! impl Component for Health {}
//!
//! #[derive(Debug, Clone, Default)]
//! struct Shielded;
//! impl Component for Shielded {}
//!
//! struct DamageEvent {
//!     header: EventHeader,
//!     damage: i32,
//! }
//!
//! impl Event for DamageEvent {
//!     fn header(&self) -> &EventHeader {
//!         &self.header
//!     }
//!
//!     fn apply_to(&mut self, entity: &mut Entity) {
//!         if let Some(health) = entity.try_get_mut::<Health>() {
//!             health.0 -= self.damage;
//!         }
//!     }
//! }
//!
//! let mut entity = Entity::default();
//! entity.add_from(&Health(10)).unwrap();
//!
//! let mut hit = DamageEvent {
//!     header: EventHeader::new().matching::<Health>().excluding::<Shielded>(),
//!     damage: 3,
//! };
//! assert!(hit.dispatch_to_entity(&mut entity));
//! assert_eq!(entity.try_get::<Health>().unwrap().0, 7);
//! ```

use entity_store::{Component, ComponentKind, Entity, EntityId};

/// Priority given to events that never set one; they are processed last.
pub const DEFAULT_PRIORITY: i32 = i32::MAX;

/// The applicability predicate and queue metadata every event carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventHeader {
    matches: Vec<ComponentKind>,
    excludes: Vec<ComponentKind>,
    priority: i32,
    source: Option<EntityId>,
}

impl EventHeader {
    /// A header with no match or exclude kinds. It applies to nothing until
    /// at least one match kind is added.
    pub fn new() -> Self {
        Self {
            matches: Vec::new(),
            excludes: Vec::new(),
            priority: DEFAULT_PRIORITY,
            source: None,
        }
    }

    /// Require `T` on target entities.
    pub fn matching<T: Component>(mut self) -> Self {
        self.matches.push(ComponentKind::of::<T>());
        self
    }

    /// Skip entities that hold `T`.
    pub fn excluding<T: Component>(mut self) -> Self {
        self.excludes.push(ComponentKind::of::<T>());
        self
    }

    /// Require every kind in `kinds`.
    pub fn with_matches(mut self, kinds: impl IntoIterator<Item = ComponentKind>) -> Self {
        self.matches.extend(kinds);
        self
    }

    /// Skip entities holding any kind in `kinds`.
    pub fn with_excludes(mut self, kinds: impl IntoIterator<Item = ComponentKind>) -> Self {
        self.excludes.extend(kinds);
        self
    }

    /// Lower values are processed sooner.
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Record the entity that raised the event. Purely informational.
    pub fn with_source(mut self, source: EntityId) -> Self {
        self.source = Some(source);
        self
    }

    pub fn matches(&self) -> &[ComponentKind] {
        &self.matches
    }

    pub fn excludes(&self) -> &[ComponentKind] {
        &self.excludes
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    pub fn set_priority(&mut self, priority: i32) {
        self.priority = priority;
    }

    pub fn source(&self) -> Option<EntityId> {
        self.source
    }

    /// Whether an entity satisfies the match/exclude predicate.
    pub fn applies_to(&self, entity: &Entity) -> bool {
        entity.has_excluding(&self.matches, &self.excludes)
    }
}

impl Default for EventHeader {
    fn default() -> Self {
        Self::new()
    }
}

/// A behaviour applied to every entity that passes its header's predicate.
pub trait Event {
    fn header(&self) -> &EventHeader;

    /// The event's effect. Only called for entities that hold every match
    /// kind and no exclude kind.
    fn apply_to(&mut self, entity: &mut Entity);

    fn priority(&self) -> i32 {
        self.header().priority()
    }

    /// Apply the event if `entity` passes the predicate.
    ///
    /// Returns whether the event was applied; a rejected entity is not an error.
    fn dispatch_to_entity(&mut self, entity: &mut Entity) -> bool {
        if !self.header().applies_to(entity) {
            return false;
        }
        self.apply_to(entity);
        true
    }
}

impl<E: Event + ?Sized> Event for Box<E> {
    fn header(&self) -> &EventHeader {
        (**self).header()
    }

    fn apply_to(&mut self, entity: &mut Entity) {
        (**self).apply_to(entity)
    }

    fn priority(&self) -> i32 {
        (**self).priority()
    }

    fn dispatch_to_entity(&mut self, entity: &mut Entity) -> bool {
        (**self).dispatch_to_entity(entity)
    }
}
