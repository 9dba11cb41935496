//! Serde helpers for `u128` quantities carried by contract events.
//!
//! Token ids and wei amounts are `uint256` on chain. They travel as JSON
//! strings (decimal or `0x`-hex) to survive JavaScript number precision,
//! and are narrowed to `u128`. JSON integers are accepted as well.

use serde::{Deserialize, Deserializer, Serializer};

use crate::error::IndexerError;

#[derive(Deserialize)]
#[serde(untagged)]
enum RawQuantity {
    Text(String),
    Number(u64),
}

/// Parses a decimal or `0x`-prefixed hex quantity.
///
/// # Errors
///
/// Returns [`IndexerError::MalformedEvent`] on empty input, invalid digits,
/// or a value that does not fit in `u128`.
pub fn parse_quantity(raw: &str) -> Result<u128, IndexerError> {
    let trimmed = raw.trim();
    let parsed = match trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        Some(hex) => u128::from_str_radix(hex, 16),
        None => trimmed.parse::<u128>(),
    };
    parsed.map_err(|e| IndexerError::MalformedEvent(format!("invalid quantity {raw:?}: {e}")))
}

/// Serializes a `u128` as a decimal string.
///
/// # Errors
///
/// Propagates serializer errors.
pub fn serialize<S: Serializer>(value: &u128, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&value.to_string())
}

/// Deserializes a `u128` from a decimal/hex string or a JSON integer.
///
/// # Errors
///
/// Fails when the input is neither, or does not fit in `u128`.
pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u128, D::Error> {
    match RawQuantity::deserialize(deserializer)? {
        RawQuantity::Text(s) => parse_quantity(&s).map_err(serde::de::Error::custom),
        RawQuantity::Number(n) => Ok(u128::from(n)),
    }
}

/// Same encoding for optional quantities.
pub mod option {
    use serde::{Deserialize, Deserializer, Serializer};

    /// Serializes `Some(v)` as a decimal string and `None` as `null`.
    ///
    /// # Errors
    ///
    /// Propagates serializer errors.
    pub fn serialize<S: Serializer>(value: &Option<u128>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(v) => serializer.serialize_some(&v.to_string()),
            None => serializer.serialize_none(),
        }
    }

    /// Deserializes an optional quantity.
    ///
    /// # Errors
    ///
    /// Fails on a present but malformed quantity.
    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<u128>, D::Error> {
        match Option::<super::RawQuantity>::deserialize(deserializer)? {
            Some(super::RawQuantity::Text(s)) => super::parse_quantity(&s)
                .map(Some)
                .map_err(serde::de::Error::custom),
            Some(super::RawQuantity::Number(n)) => Ok(Some(u128::from(n))),
            None => Ok(None),
        }
    }
}
