//! RestaurantManager drop handlers.

use crate::domain::chain_event::{DropActivationChanged, DropCreated};
use crate::domain::{Drop, DropSchedule, EntityId, EntityStore, Restaurant, get_or_create};

/// Creates the drop, active by default.
///
/// The restaurant reference is attached only if the restaurant is already
/// stored; it is never resolved later. A reference already held by a
/// stored drop survives an unresolvable parent.
pub fn on_drop_created<S: EntityStore>(store: &mut S, event: &DropCreated) {
    let id = EntityId::from_numeric(event.drop_id);
    let restaurant_id = EntityId::from_numeric(event.restaurant_id);

    let previous = store.load::<Drop>(&id).and_then(|d| d.restaurant);
    let restaurant = store
        .load::<Restaurant>(&restaurant_id)
        .map(|r| r.id)
        .or(previous);
    if restaurant.is_none() {
        tracing::warn!(drop = %id, restaurant = %restaurant_id, "drop created for unknown restaurant");
    }
    tracing::debug!(drop = %id, restaurant = %restaurant_id, "drop created");

    store.save(Drop {
        id,
        restaurant,
        schedule: Some(DropSchedule {
            mint_price: event.mint_price,
            start_date: event.start_date,
            end_date: event.end_date,
            daily_start_time: event.daily_start_time,
            daily_end_time: event.daily_end_time,
            window_duration: event.window_duration,
            reservations_per_window: event.reservations_per_window,
        }),
        is_active: true,
    });
}

/// Flips `is_active`, creating a shell if the drop has not been seen yet.
pub fn on_drop_activation_changed<S: EntityStore>(store: &mut S, event: &DropActivationChanged) {
    let id = EntityId::from_numeric(event.drop_id);
    let mut drop = get_or_create(store, &id, Drop::shell);
    drop.is_active = event.is_active;
    tracing::debug!(drop = %id, is_active = event.is_active, "drop activation changed");
    store.save(drop);
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::{MemoryStore, Restaurant};

    fn drop_created(drop_id: u128, restaurant_id: u128) -> DropCreated {
        DropCreated {
            drop_id,
            restaurant_id,
            mint_price: 1000,
            start_date: 1_700_000_000,
            end_date: 1_700_500_000,
            daily_start_time: 32_400,
            daily_end_time: 72_000,
            window_duration: 1800,
            reservations_per_window: 5,
        }
    }

    fn load(store: &MemoryStore, id: u128) -> Drop {
        let Some(d) = store.load::<Drop>(&EntityId::from_numeric(id)) else {
            panic!("drop {id} missing");
        };
        d
    }

    #[test]
    fn drop_links_existing_restaurant_and_copies_terms() {
        let mut store = MemoryStore::new();
        store.save(Restaurant::shell(EntityId::from_numeric(1)));
        on_drop_created(&mut store, &drop_created(5, 1));

        let d = load(&store, 5);
        assert_eq!(d.id.as_str(), "05");
        assert_eq!(d.restaurant.as_ref().map(EntityId::as_str), Some("01"));
        assert!(d.is_active);
        let Some(schedule) = d.schedule else {
            panic!("schedule missing");
        };
        assert_eq!(schedule.mint_price, 1000);
        assert_eq!(schedule.start_date, 1_700_000_000);
        assert_eq!(schedule.end_date, 1_700_500_000);
        assert_eq!(schedule.daily_start_time, 32_400);
        assert_eq!(schedule.daily_end_time, 72_000);
        assert_eq!(schedule.window_duration, 1800);
        assert_eq!(schedule.reservations_per_window, 5);
    }

    #[test]
    fn drop_without_restaurant_leaves_reference_unset() {
        let mut store = MemoryStore::new();
        on_drop_created(&mut store, &drop_created(5, 1));
        assert!(load(&store, 5).restaurant.is_none());
    }

    #[test]
    fn redelivered_drop_keeps_resolved_reference() {
        let mut store = MemoryStore::new();
        store.save(Restaurant::shell(EntityId::from_numeric(1)));
        on_drop_created(&mut store, &drop_created(5, 1));
        // same drop re-emitted pointing at a restaurant the store never saw
        on_drop_created(&mut store, &drop_created(5, 2));

        assert_eq!(
            load(&store, 5).restaurant.as_ref().map(EntityId::as_str),
            Some("01")
        );
    }

    #[test]
    fn toggle_before_creation_creates_shell() {
        let mut store = MemoryStore::new();
        on_drop_activation_changed(
            &mut store,
            &DropActivationChanged {
                drop_id: 7,
                is_active: false,
            },
        );
        let d = load(&store, 7);
        assert!(!d.is_active);
        assert!(d.schedule.is_none());
        assert!(d.restaurant.is_none());
    }

    #[test]
    fn toggle_after_creation_only_flips_flag() {
        let mut store = MemoryStore::new();
        on_drop_created(&mut store, &drop_created(5, 1));
        on_drop_activation_changed(
            &mut store,
            &DropActivationChanged {
                drop_id: 5,
                is_active: false,
            },
        );
        let d = load(&store, 5);
        assert!(!d.is_active);
        assert!(d.schedule.is_some());
    }
}
