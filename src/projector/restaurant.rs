//! RestaurantManager restaurant handlers.

use crate::domain::chain_event::{RestaurantActivationChanged, RestaurantRegistered};
use crate::domain::{EntityId, EntityStore, Restaurant, get_or_create};

/// Creates the restaurant, active by default. A second registration of the
/// same id overwrites the first.
pub fn on_restaurant_registered<S: EntityStore>(store: &mut S, event: &RestaurantRegistered) {
    let id = EntityId::from_numeric(event.restaurant_id);
    tracing::debug!(restaurant = %id, owner = %event.owner, "restaurant registered");

    store.save(Restaurant {
        id,
        owner: Some(event.owner.clone()),
        name: Some(event.name.clone()),
        business_address: Some(event.business_address.clone()),
        is_active: true,
    });
}

/// Flips `is_active`, creating a shell if the registration has not been
/// seen yet.
pub fn on_restaurant_activation_changed<S: EntityStore>(
    store: &mut S,
    event: &RestaurantActivationChanged,
) {
    let id = EntityId::from_numeric(event.restaurant_id);
    let mut restaurant = get_or_create(store, &id, Restaurant::shell);
    if restaurant.owner.is_none() {
        tracing::warn!(restaurant = %id, "activation change for unregistered restaurant");
    }
    restaurant.is_active = event.is_active;
    store.save(restaurant);
}
