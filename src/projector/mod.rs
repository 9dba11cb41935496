//! Event projector: turns decoded contract events into entity writes.
//!
//! [`process`] is the single entry point. It dispatches on the
//! [`ChainEvent`] variant to one handler per event kind; handlers load or
//! create the entities they touch, mutate them, and save them back. No
//! handler fails once an event has been decoded: a missing parent becomes
//! an unset reference and a repeated event overwrites the same ids.
//!
//! ```text
//! ChainEvent ──► process ──┬─► restaurant  (RestaurantRegistered, RestaurantActivationChanged)
//!                          ├─► drop        (DropCreated, DropActivationChanged)
//!                          ├─► reservation (ReservationCreated)
//!                          └─► marketplace (ReservationListed, ReservationBought, ReservationCancelled)
//!                                    │
//!                                    ▼
//!                               EntityStore
//! ```

pub mod drop;
pub mod marketplace;
pub mod reservation;
pub mod restaurant;

use crate::domain::{ChainEvent, EntityStore};

pub use drop::{on_drop_activation_changed, on_drop_created};
pub use marketplace::{on_reservation_bought, on_reservation_cancelled, on_reservation_listed};
pub use reservation::on_reservation_created;
pub use restaurant::{on_restaurant_activation_changed, on_restaurant_registered};

/// Applies one event to `store`.
pub fn process<S: EntityStore>(store: &mut S, event: &ChainEvent) {
    match event {
        ChainEvent::RestaurantRegistered(e) => on_restaurant_registered(store, e),
        ChainEvent::RestaurantActivationChanged(e) => on_restaurant_activation_changed(store, e),
        ChainEvent::DropCreated(e) => on_drop_created(store, e),
        ChainEvent::DropActivationChanged(e) => on_drop_activation_changed(store, e),
        ChainEvent::ReservationCreated(e) => on_reservation_created(store, e),
        ChainEvent::ReservationListed(e) => on_reservation_listed(store, e),
        ChainEvent::ReservationBought(e) => on_reservation_bought(store, e),
        ChainEvent::ReservationCancelled(e) => on_reservation_cancelled(store, e),
    }
}

/// Applies events in order.
pub fn process_all<'a, S, I>(store: &mut S, events: I)
where
    S: EntityStore,
    I: IntoIterator<Item = &'a ChainEvent>,
{
    for event in events {
        process(store, event);
    }
}
