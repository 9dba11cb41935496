//! Projected entities and the closed set of kinds the store holds.
//!
//! Entities are created lazily by the first relevant event and mutated by
//! later ones; nothing is ever deleted. Fields an out-of-order event cannot
//! know about are `Option`s left unset on shell records.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::{Address, EntityId};

/// Discriminator for the four entity kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// [`Restaurant`] records.
    Restaurant,
    /// [`Drop`] records.
    Drop,
    /// [`Reservation`] records.
    Reservation,
    /// [`Listing`] records.
    Listing,
}

impl EntityKind {
    /// All kinds, in display order.
    pub const ALL: [Self; 4] = [Self::Restaurant, Self::Drop, Self::Reservation, Self::Listing];

    /// Returns the kind as a static string slice.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Restaurant => "restaurant",
            Self::Drop => "drop",
            Self::Reservation => "reservation",
            Self::Listing => "listing",
        }
    }

    /// Parses a kind from its snake-case name.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == s)
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A restaurant registered with the RestaurantManager contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Restaurant {
    /// Hex of the on-chain restaurant id.
    pub id: EntityId,
    /// Registering account.
    pub owner: Option<Address>,
    /// Display name.
    pub name: Option<String>,
    /// Street address of the business.
    pub business_address: Option<String>,
    /// Whether the restaurant accepts new drops.
    pub is_active: bool,
}

impl Restaurant {
    /// Placeholder for a restaurant seen in an event before its registration.
    #[must_use]
    pub fn shell(id: EntityId) -> Self {
        Self {
            id,
            owner: None,
            name: None,
            business_address: None,
            is_active: false,
        }
    }
}

/// Minting terms of a drop, copied verbatim from `DropCreated`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DropSchedule {
    /// Price per reservation in wei.
    #[serde(with = "super::numeric")]
    pub mint_price: u128,
    /// First bookable day, unix seconds.
    pub start_date: u64,
    /// Last bookable day, unix seconds.
    pub end_date: u64,
    /// Daily opening offset, seconds of day.
    pub daily_start_time: u32,
    /// Daily closing offset, seconds of day.
    pub daily_end_time: u32,
    /// Length of one reservation window in seconds.
    pub window_duration: u32,
    /// Reservations mintable per window.
    pub reservations_per_window: u32,
}

/// A time-windowed batch of reservation slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Drop {
    /// Hex of the on-chain drop id.
    pub id: EntityId,
    /// Owning restaurant, set only if it was in the store at creation.
    pub restaurant: Option<EntityId>,
    /// Minting terms; unset on shells.
    pub schedule: Option<DropSchedule>,
    /// Whether reservations can currently be minted.
    pub is_active: bool,
}

impl Drop {
    /// Placeholder for a drop toggled before its creation event arrived.
    #[must_use]
    pub fn shell(id: EntityId) -> Self {
        Self {
            id,
            restaurant: None,
            schedule: None,
            is_active: false,
        }
    }
}

/// Ownership state of a reservation NFT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReservationStatus {
    /// Held by its owner, not for sale.
    #[default]
    Owned,
    /// Offered on the marketplace by an active listing.
    Listed,
}

/// A minted reservation NFT.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    /// Hex of the token id.
    pub id: EntityId,
    /// Current holder.
    pub owner: Option<Address>,
    /// Restaurant the slot belongs to, when resolved.
    pub restaurant: Option<EntityId>,
    /// Drop the slot was minted from, when resolved.
    pub drop: Option<EntityId>,
    /// Selected slot, unix seconds.
    pub reservation_timestamp: Option<u64>,
    /// Marketplace state.
    pub status: ReservationStatus,
}

impl Reservation {
    /// Placeholder for a token seen on the marketplace before its mint.
    #[must_use]
    pub fn shell(id: EntityId) -> Self {
        Self {
            id,
            owner: None,
            restaurant: None,
            drop: None,
            reservation_timestamp: None,
            status: ReservationStatus::Owned,
        }
    }
}

/// Lifecycle of a marketplace listing.
///
/// Mirrors the sentinel encoding of [`Listing::buyer`]: `Active` pairs
/// with [`Address::zero`], `Cancelled` with [`Address::burn`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListingStatus {
    /// Open for purchase.
    Active,
    /// Purchased by `buyer`.
    Bought,
    /// Withdrawn by the seller.
    Cancelled,
}

/// A marketplace offer to sell a reservation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    /// Token hex followed by seller hex digits.
    pub id: EntityId,
    /// Hex of the listed token id.
    pub token_id: EntityId,
    /// Listing account.
    pub seller: Address,
    /// Purchaser, or a sentinel while unsold / after cancellation.
    pub buyer: Address,
    /// Asking price in wei; unset on shells.
    #[serde(with = "super::numeric::option", default)]
    pub price: Option<u128>,
    /// The listed reservation.
    pub reservation: EntityId,
    /// Explicit lifecycle state.
    pub status: ListingStatus,
}

impl Listing {
    /// Placeholder for a purchase or cancellation whose listing was never seen.
    #[must_use]
    pub fn shell(token_id: EntityId, seller: Address) -> Self {
        Self {
            id: EntityId::listing(&token_id, &seller),
            reservation: token_id.clone(),
            token_id,
            seller,
            buyer: Address::zero(),
            price: None,
            status: ListingStatus::Active,
        }
    }

    /// `true` while the listing can still be bought.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.buyer.is_zero()
    }
}

/// Any entity held by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "entity", rename_all = "snake_case")]
pub enum EntityRecord {
    /// A restaurant.
    Restaurant(Restaurant),
    /// A drop.
    Drop(Drop),
    /// A reservation.
    Reservation(Reservation),
    /// A listing.
    Listing(Listing),
}

impl EntityRecord {
    /// Kind of the wrapped entity.
    #[must_use]
    pub const fn kind(&self) -> EntityKind {
        match self {
            Self::Restaurant(_) => EntityKind::Restaurant,
            Self::Drop(_) => EntityKind::Drop,
            Self::Reservation(_) => EntityKind::Reservation,
            Self::Listing(_) => EntityKind::Listing,
        }
    }

    /// Id of the wrapped entity.
    #[must_use]
    pub fn id(&self) -> &EntityId {
        match self {
            Self::Restaurant(e) => &e.id,
            Self::Drop(e) => &e.id,
            Self::Reservation(e) => &e.id,
            Self::Listing(e) => &e.id,
        }
    }
}

/// Typed access to one entity kind inside [`EntityRecord`].
pub trait Entity: Clone + fmt::Debug + Sized {
    /// Kind stored under.
    const KIND: EntityKind;

    /// Primary key.
    fn id(&self) -> &EntityId;

    /// Wraps `self` for storage.
    fn into_record(self) -> EntityRecord;

    /// Unwraps a record of the matching kind.
    fn from_record(record: EntityRecord) -> Option<Self>;
}

macro_rules! impl_entity {
    ($ty:ident) => {
        impl Entity for $ty {
            const KIND: EntityKind = EntityKind::$ty;

            fn id(&self) -> &EntityId {
                &self.id
            }

            fn into_record(self) -> EntityRecord {
                EntityRecord::$ty(self)
            }

            fn from_record(record: EntityRecord) -> Option<Self> {
                match record {
                    EntityRecord::$ty(e) => Some(e),
                    _ => None,
                }
            }
        }
    };
}

impl_entity!(Restaurant);
impl_entity!(Drop);
impl_entity!(Reservation);
impl_entity!(Listing);
