//! ReservNFT mint handler.

use crate::domain::chain_event::ReservationCreated;
use crate::domain::{Drop, EntityId, EntityStore, Reservation, Restaurant, get_or_create};

/// Creates the reservation with status `owned` and attaches whichever of
/// its restaurant and drop are already stored.
///
/// A record created earlier by a marketplace event keeps its status and
/// owner, so a mint delivered after its listing or sale neither hides an
/// open listing nor hands the token back to the minter.
pub fn on_reservation_created<S: EntityStore>(store: &mut S, event: &ReservationCreated) {
    let id = EntityId::from_numeric(event.token_id);
    let restaurant_id = EntityId::from_numeric(event.restaurant_id);
    let drop_id = EntityId::from_numeric(event.drop_id);

    let restaurant = store.load::<Restaurant>(&restaurant_id).map(|r| r.id);
    let drop = store.load::<Drop>(&drop_id).map(|d| d.id);
    if restaurant.is_none() || drop.is_none() {
        tracing::warn!(
            reservation = %id,
            restaurant = %restaurant_id,
            drop = %drop_id,
            "reservation minted with unresolved parent"
        );
    }

    let mut reservation = get_or_create(store, &id, Reservation::shell);
    if reservation.owner.is_none() {
        reservation.owner = Some(event.owner.clone());
    }
    reservation.reservation_timestamp = Some(event.reservation_timestamp);
    reservation.restaurant = restaurant.or(reservation.restaurant);
    reservation.drop = drop.or(reservation.drop);

    tracing::debug!(reservation = %id, owner = %event.owner, "reservation created");
    store.save(reservation);
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::{Address, MemoryStore, ReservationStatus};

    const CC: &str = "0x00000000000000000000000000000000000000CC";
    const DD: &str = "0x00000000000000000000000000000000000000DD";

    fn minted(token_id: u128) -> ReservationCreated {
        let Ok(owner) = Address::parse(CC) else {
            panic!("valid address");
        };
        ReservationCreated {
            token_id,
            owner,
            restaurant_id: 1,
            drop_id: 5,
            reservation_timestamp: 1_700_040_600,
        }
    }

    fn load(store: &MemoryStore, id: u128) -> Reservation {
        let Some(r) = store.load::<Reservation>(&EntityId::from_numeric(id)) else {
            panic!("reservation {id} missing");
        };
        r
    }

    #[test]
    fn mint_with_parents_links_both() {
        let mut store = MemoryStore::new();
        store.save(Restaurant::shell(EntityId::from_numeric(1)));
        store.save(Drop::shell(EntityId::from_numeric(5)));
        on_reservation_created(&mut store, &minted(0x10));

        let r = load(&store, 0x10);
        assert_eq!(r.id.as_str(), "10");
        assert_eq!(r.status, ReservationStatus::Owned);
        assert_eq!(
            r.owner.as_ref().map(Address::as_str),
            Some("0x00000000000000000000000000000000000000cc")
        );
        assert_eq!(r.restaurant.as_ref().map(EntityId::as_str), Some("01"));
        assert_eq!(r.drop.as_ref().map(EntityId::as_str), Some("05"));
        assert_eq!(r.reservation_timestamp, Some(1_700_040_600));
    }

    #[test]
    fn mint_without_parents_leaves_references_unset() {
        let mut store = MemoryStore::new();
        on_reservation_created(&mut store, &minted(0x10));

        let r = load(&store, 0x10);
        assert!(r.restaurant.is_none());
        assert!(r.drop.is_none());
        assert_eq!(r.status, ReservationStatus::Owned);
    }

    #[test]
    fn mint_after_listing_keeps_listed_status() {
        let mut store = MemoryStore::new();
        let mut listed = Reservation::shell(EntityId::from_numeric(0x10));
        listed.status = ReservationStatus::Listed;
        store.save(listed);

        on_reservation_created(&mut store, &minted(0x10));

        let r = load(&store, 0x10);
        assert_eq!(r.status, ReservationStatus::Listed);
        assert!(r.owner.is_some());
    }

    #[test]
    fn mint_after_sale_keeps_buyer_as_owner() {
        let mut store = MemoryStore::new();
        let Ok(buyer) = Address::parse(DD) else {
            panic!("valid address");
        };
        let mut sold = Reservation::shell(EntityId::from_numeric(0x10));
        sold.owner = Some(buyer.clone());
        store.save(sold);

        on_reservation_created(&mut store, &minted(0x10));

        let r = load(&store, 0x10);
        assert_eq!(r.owner, Some(buyer));
        assert_eq!(r.reservation_timestamp, Some(1_700_040_600));
    }
}
