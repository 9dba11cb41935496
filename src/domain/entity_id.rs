//! Deterministic entity identifiers and account addresses.
//!
//! [`EntityId`] is derived purely from on-chain integers so that replaying
//! the same event stream always lands on the same keys. [`Address`] is a
//! validated, full-width, lowercase `0x`-prefixed account address with the
//! two sentinel values used by marketplace listings.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::IndexerError;

/// Stable identifier of a projected entity.
///
/// Rendered as lowercase hex without a `0x` prefix, zero-padded to whole
/// bytes: `1 -> "01"`, `0x10 -> "10"`, `0x100 -> "0100"`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    /// Canonical id for an on-chain numeric identifier.
    #[must_use]
    pub fn from_numeric(value: u128) -> Self {
        let hex = format!("{value:x}");
        if hex.len() % 2 == 1 {
            Self(format!("0{hex}"))
        } else {
            Self(hex)
        }
    }

    /// Composite listing id: token hex followed by the seller's 40 hex
    /// digits.
    ///
    /// The seller part has a fixed width, so distinct (token, seller) pairs
    /// never share a listing record.
    #[must_use]
    pub fn listing(token_id: &Self, seller: &Address) -> Self {
        Self(format!("{}{}", token_id.0, seller.hex_digits()))
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<u128> for EntityId {
    fn from(value: u128) -> Self {
        Self::from_numeric(value)
    }
}

/// Account address as carried by contract events.
///
/// Always `0x` followed by exactly 40 lowercase hex digits. Shorter input
/// is left-padded with zeros and checksummed (mixed-case) input is folded
/// to lowercase, so every encoding of an account resolves to the same
/// listing key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    /// Number of hex digits in an address (20 bytes).
    pub const MAX_DIGITS: usize = 40;

    /// Buyer of a listing nobody has bought yet.
    #[must_use]
    pub fn zero() -> Self {
        Self(format!("0x{}", "0".repeat(Self::MAX_DIGITS)))
    }

    /// Buyer recorded on a cancelled listing.
    #[must_use]
    pub fn burn() -> Self {
        Self(format!("0x{}dead", "0".repeat(Self::MAX_DIGITS - 4)))
    }

    /// Parses and canonicalizes an address.
    ///
    /// # Errors
    ///
    /// Returns [`IndexerError::MalformedEvent`] when the value is not
    /// `0x`-prefixed or contains anything other than 1 to 40 hex digits.
    pub fn parse(raw: &str) -> Result<Self, IndexerError> {
        let digits = raw
            .strip_prefix("0x")
            .or_else(|| raw.strip_prefix("0X"))
            .ok_or_else(|| IndexerError::MalformedEvent(format!("address {raw:?} lacks 0x")))?;
        if digits.is_empty()
            || digits.len() > Self::MAX_DIGITS
            || !digits.chars().all(|c| c.is_ascii_hexdigit())
        {
            return Err(IndexerError::MalformedEvent(format!(
                "invalid address {raw:?}"
            )));
        }
        Ok(Self(format!(
            "0x{:0>width$}",
            digits.to_ascii_lowercase(),
            width = Self::MAX_DIGITS
        )))
    }

    /// Hex digits without the `0x` prefix.
    #[must_use]
    pub fn hex_digits(&self) -> &str {
        self.0.get(2..).unwrap_or_default()
    }

    /// Returns the address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `true` for the all-zero "not bought" sentinel.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        *self == Self::zero()
    }

    /// `true` for the burn "cancelled" sentinel.
    #[must_use]
    pub fn is_burn(&self) -> bool {
        *self == Self::burn()
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Address {
    type Err = IndexerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn addr(raw: &str) -> Address {
        let Ok(a) = Address::parse(raw) else {
            panic!("valid address {raw}");
        };
        a
    }

    #[test]
    fn numeric_ids_are_padded_to_whole_bytes() {
        assert_eq!(EntityId::from_numeric(0).as_str(), "00");
        assert_eq!(EntityId::from_numeric(1).as_str(), "01");
        assert_eq!(EntityId::from_numeric(0x10).as_str(), "10");
        assert_eq!(EntityId::from_numeric(0x100).as_str(), "0100");
        assert_eq!(EntityId::from_numeric(0xabcdef).as_str(), "abcdef");
    }

    #[test]
    fn listing_id_concatenates_token_and_seller() {
        let id = EntityId::listing(
            &EntityId::from_numeric(0x10),
            &addr("0x00000000000000000000000000000000000000BB"),
        );
        assert_eq!(id.as_str(), "1000000000000000000000000000000000000000bb");
    }

    #[test]
    fn listing_ids_do_not_collide_across_token_boundaries() {
        let a = EntityId::listing(&EntityId::from_numeric(0x01), &addr("0x0203"));
        let b = EntityId::listing(&EntityId::from_numeric(0x0102), &addr("0x03"));
        assert_ne!(a, b);
    }

    #[test]
    fn address_is_lowercased_and_padded() {
        assert_eq!(
            addr("0xAbCd").as_str(),
            "0x000000000000000000000000000000000000abcd"
        );
        assert_eq!(addr("0XFF"), addr("0x00000000000000000000000000000000000000ff"));
    }

    #[test]
    fn leading_zeros_name_the_same_account() {
        assert_eq!(addr("0x00aa"), addr("0xaa"));
        assert!(addr("0x0").is_zero());
        assert!(addr("0xdead").is_burn());
    }

    #[test]
    fn address_rejects_garbage() {
        assert!(Address::parse("abcd").is_err());
        assert!(Address::parse("0x").is_err());
        assert!(Address::parse("0xzz").is_err());
        let too_long = format!("0x{}", "1".repeat(41));
        assert!(Address::parse(&too_long).is_err());
    }

    #[test]
    fn sentinels_are_distinct_full_width_addresses() {
        let zero = Address::zero();
        let burn = Address::burn();
        assert_ne!(zero, burn);
        assert_eq!(zero.hex_digits().len(), Address::MAX_DIGITS);
        assert_eq!(burn.hex_digits().len(), Address::MAX_DIGITS);
        assert!(zero.is_zero() && !zero.is_burn());
        assert!(burn.is_burn() && !burn.is_zero());
        assert_eq!(addr("0x000000000000000000000000000000000000dEaD"), burn);
    }

    #[test]
    fn address_deserializes_with_validation() {
        let ok: Result<Address, _> =
            serde_json::from_str("\"0x00000000000000000000000000000000000000AA\"");
        assert_eq!(ok.ok(), Some(addr("0xaa")));
        let bad: Result<Address, _> = serde_json::from_str("\"nope\"");
        assert!(bad.is_err());
    }
}
