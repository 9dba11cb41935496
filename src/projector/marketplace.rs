//! Marketplace listing handlers.
//!
//! Each handler writes the listing and its reservation together so that a
//! reservation is `listed` exactly while a listing for its token still has
//! the zero-address buyer.

use crate::domain::chain_event::{ReservationBought, ReservationCancelled, ReservationListed};
use crate::domain::{
    Address, EntityId, EntityStore, Listing, ListingStatus, Reservation, ReservationStatus,
    get_or_create,
};

/// Opens a listing and marks the reservation `listed`.
pub fn on_reservation_listed<S: EntityStore>(store: &mut S, event: &ReservationListed) {
    let token_id = EntityId::from_numeric(event.token_id);
    let listing = Listing {
        price: Some(event.price),
        ..Listing::shell(token_id.clone(), event.seller.clone())
    };
    tracing::debug!(listing = %listing.id, price = %event.price, "reservation listed");

    let mut reservation = get_or_create(store, &token_id, Reservation::shell);
    reservation.status = ReservationStatus::Listed;

    store.save(listing);
    store.save(reservation);
}

/// Records the buyer and transfers the reservation to them.
pub fn on_reservation_bought<S: EntityStore>(store: &mut S, event: &ReservationBought) {
    let token_id = EntityId::from_numeric(event.token_id);
    let mut listing = load_listing(store, &token_id, &event.seller);
    listing.buyer = event.buyer.clone();
    listing.status = ListingStatus::Bought;
    tracing::debug!(listing = %listing.id, buyer = %event.buyer, "reservation bought");

    let mut reservation = get_or_create(store, &token_id, Reservation::shell);
    reservation.owner = Some(event.buyer.clone());
    reservation.status = ReservationStatus::Owned;

    store.save(listing);
    store.save(reservation);
}

/// Closes the listing with the burn sentinel and returns the reservation to
/// `owned`.
pub fn on_reservation_cancelled<S: EntityStore>(store: &mut S, event: &ReservationCancelled) {
    let token_id = EntityId::from_numeric(event.token_id);
    let mut listing = load_listing(store, &token_id, &event.seller);
    listing.buyer = Address::burn();
    listing.status = ListingStatus::Cancelled;
    tracing::debug!(listing = %listing.id, "listing cancelled");

    let mut reservation = get_or_create(store, &token_id, Reservation::shell);
    reservation.status = ReservationStatus::Owned;

    store.save(listing);
    store.save(reservation);
}

fn load_listing<S: EntityStore>(store: &S, token_id: &EntityId, seller: &Address) -> Listing {
    let id = EntityId::listing(token_id, seller);
    store.load::<Listing>(&id).unwrap_or_else(|| {
        tracing::warn!(listing = %id, "listing closed before it was seen");
        Listing::shell(token_id.clone(), seller.clone())
    })
}
