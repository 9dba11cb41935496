//! Decoded contract events consumed by the projector.
//!
//! Each event kind is its own payload struct so handlers take exactly the
//! fields they need. [`ChainEvent`] is the closed union dispatched by
//! [`crate::projector::process`]; [`EventEnvelope`] adds the position the
//! hosting runtime assigned to the log.

use serde::{Deserialize, Serialize};

use crate::domain::Address;

/// `RestaurantManager.RestaurantRegistered`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantRegistered {
    /// Registering account.
    pub owner: Address,
    /// On-chain restaurant id.
    #[serde(with = "super::numeric")]
    pub restaurant_id: u128,
    /// Display name.
    pub name: String,
    /// Street address.
    pub business_address: String,
}

/// `RestaurantManager.RestaurantActivationChanged`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantActivationChanged {
    /// On-chain restaurant id.
    #[serde(with = "super::numeric")]
    pub restaurant_id: u128,
    /// New activation flag.
    pub is_active: bool,
}

/// `RestaurantManager.DropCreated`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DropCreated {
    /// On-chain drop id.
    #[serde(with = "super::numeric")]
    pub drop_id: u128,
    /// Owning restaurant id.
    #[serde(with = "super::numeric")]
    pub restaurant_id: u128,
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
    /// Window length in seconds.
    pub window_duration: u32,
    /// Reservations per window.
    pub reservations_per_window: u32,
}

/// `RestaurantManager.DropActivationChanged`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DropActivationChanged {
    /// On-chain drop id.
    #[serde(with = "super::numeric")]
    pub drop_id: u128,
    /// New activation flag.
    pub is_active: bool,
}

/// `ReservNFT.ReservationCreated`, emitted on mint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationCreated {
    /// Minted token id.
    #[serde(with = "super::numeric")]
    pub token_id: u128,
    /// Minting account.
    pub owner: Address,
    /// Restaurant the slot belongs to.
    #[serde(with = "super::numeric")]
    pub restaurant_id: u128,
    /// Drop the slot was minted from.
    #[serde(with = "super::numeric")]
    pub drop_id: u128,
    /// Selected slot, unix seconds.
    pub reservation_timestamp: u64,
}

/// `Marketplace.ReservationListed`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationListed {
    /// Listed token id.
    #[serde(with = "super::numeric")]
    pub token_id: u128,
    /// Listing account.
    pub seller: Address,
    /// Asking price in wei.
    #[serde(with = "super::numeric")]
    pub price: u128,
}

/// `Marketplace.ReservationBought`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationBought {
    /// Purchased token id.
    #[serde(with = "super::numeric")]
    pub token_id: u128,
    /// Account that listed the token.
    pub seller: Address,
    /// Purchasing account.
    pub buyer: Address,
}

/// `Marketplace.ReservationCancelled`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationCancelled {
    /// Delisted token id.
    #[serde(with = "super::numeric")]
    pub token_id: u128,
    /// Account that listed the token.
    pub seller: Address,
}

/// Every event kind the projector handles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum ChainEvent {
    /// A restaurant was registered.
    RestaurantRegistered(RestaurantRegistered),
    /// A restaurant was activated or deactivated.
    RestaurantActivationChanged(RestaurantActivationChanged),
    /// A drop was created.
    DropCreated(DropCreated),
    /// A drop was activated or deactivated.
    DropActivationChanged(DropActivationChanged),
    /// A reservation NFT was minted.
    ReservationCreated(ReservationCreated),
    /// A reservation was listed for sale.
    ReservationListed(ReservationListed),
    /// A listed reservation was bought.
    ReservationBought(ReservationBought),
    /// A listing was withdrawn.
    ReservationCancelled(ReservationCancelled),
}

impl ChainEvent {
    /// Returns the event name as emitted by the contract.
    #[must_use]
    pub const fn kind_str(&self) -> &'static str {
        match self {
            Self::RestaurantRegistered(_) => "RestaurantRegistered",
            Self::RestaurantActivationChanged(_) => "RestaurantActivationChanged",
            Self::DropCreated(_) => "DropCreated",
            Self::DropActivationChanged(_) => "DropActivationChanged",
            Self::ReservationCreated(_) => "ReservationCreated",
            Self::ReservationListed(_) => "ReservationListed",
            Self::ReservationBought(_) => "ReservationBought",
            Self::ReservationCancelled(_) => "ReservationCancelled",
        }
    }
}

/// Position of a log within the chain, assigned by the hosting runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventPosition {
    /// Block the log was emitted in.
    pub block_number: u64,
    /// Index of the log within the block.
    pub log_index: u64,
}

/// A decoded event with its chain position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventEnvelope {
    /// Block the log was emitted in.
    pub block_number: u64,
    /// Index of the log within the block.
    pub log_index: u64,
    /// The decoded payload.
    pub event: ChainEvent,
}

impl EventEnvelope {
    /// Chain position of the event.
    #[must_use]
    pub const fn position(&self) -> EventPosition {
        EventPosition {
            block_number: self.block_number,
            log_index: self.log_index,
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn decodes_tagged_event_with_string_quantities() {
        let json = r#"{
            "blockNumber": 120,
            "logIndex": 3,
            "event": { "kind": "ReservationListed", "tokenId": "0x10", "seller": "0x00000000000000000000000000000000000000BB", "price": "500" }
        }"#;
        let Ok(envelope) = serde_json::from_str::<EventEnvelope>(json) else {
            panic!("envelope should decode");
        };
        assert_eq!(envelope.position().block_number, 120);
        let ChainEvent::ReservationListed(listed) = envelope.event else {
            panic!("wrong variant");
        };
        assert_eq!(listed.token_id, 0x10);
        assert_eq!(listed.seller.as_str(), "0x00000000000000000000000000000000000000bb");
        assert_eq!(listed.price, 500);
    }

    #[test]
    fn decodes_drop_created_with_integer_fields() {
        let json = r#"{
            "kind": "DropCreated", "dropId": 5, "restaurantId": "1", "mintPrice": 1000,
            "startDate": 1700000000, "endDate": 1700500000,
            "dailyStartTime": 32400, "dailyEndTime": 72000,
            "windowDuration": 1800, "reservationsPerWindow": 5
        }"#;
        let Ok(ChainEvent::DropCreated(drop)) = serde_json::from_str::<ChainEvent>(json) else {
            panic!("drop event should decode");
        };
        assert_eq!(drop.drop_id, 5);
        assert_eq!(drop.restaurant_id, 1);
        assert_eq!(drop.window_duration, 1800);
    }

    #[test]
    fn rejects_unknown_kind_and_missing_fields() {
        let unknown = serde_json::from_str::<ChainEvent>(r#"{"kind":"Transfer"}"#);
        assert!(unknown.is_err());
        let missing =
            serde_json::from_str::<ChainEvent>(r#"{"kind":"ReservationCancelled","tokenId":"1"}"#);
        assert!(missing.is_err());
        let bad_address = serde_json::from_str::<ChainEvent>(
            r#"{"kind":"ReservationCancelled","tokenId":"1","seller":"bob"}"#,
        );
        assert!(bad_address.is_err());
    }

    #[test]
    fn serializes_back_to_the_same_shape() {
        let event = ChainEvent::RestaurantActivationChanged(RestaurantActivationChanged {
            restaurant_id: 1,
            is_active: false,
        });
        let value = serde_json::to_value(&event).unwrap_or_default();
        assert_eq!(value["kind"], "RestaurantActivationChanged");
        assert_eq!(value["restaurantId"], "1");
        assert_eq!(value["isActive"], false);
        assert_eq!(event.kind_str(), "RestaurantActivationChanged");
    }
}
