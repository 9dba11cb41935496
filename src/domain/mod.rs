//! Domain layer: identifiers, entities, chain events, and the entity store.
//!
//! This module contains the projected data model (restaurants, drops,
//! reservations, listings), the decoded contract events that mutate it,
//! the store abstraction the projector writes through, and the change bus
//! that fans saved records out to subscribers.

pub mod chain_event;
pub mod entity;
pub mod entity_id;
pub mod entity_store;
pub mod event_bus;
pub mod numeric;

pub use chain_event::{ChainEvent, EventEnvelope, EventPosition};
pub use entity::{
    Drop, DropSchedule, Entity, EntityKind, EntityRecord, Listing, ListingStatus, Reservation,
    ReservationStatus, Restaurant,
};
pub use entity_id::{Address, EntityId};
pub use entity_store::{EntityStore, MemoryStore, RecordingStore, get_or_create};
pub use event_bus::{EntityChange, EventBus};
