//! # Event Publisher
//!
//! The "systems" half of the Tessera ECS runtime. Events carry a match/exclude
//! predicate over component kinds; the publisher tracks entities and drains a
//! priority-ordered event queue against them.
//!
//! ## Core Components
//!
//! - **events**: The `Event` trait and the `EventHeader` every event embeds
//! - **publisher**: Entity tracking, immediate dispatch, and the pending-event queue
//!
//! ## Design Philosophy
//!
//! - **Non-owning**: The publisher observes entities; their creators own them
//! - **All-or-nothing**: A dispatch that cannot reach every tracked entity changes nothing
//! - **Single-threaded**: No locking; one logical owner per publisher

pub mod events;
pub mod publisher;

pub use events::*;
pub use publisher::*;
