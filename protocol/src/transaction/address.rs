//! Addresses as the builder sees them: an opaque byte string.
//!
//! The ledger has several address kinds (enterprise, base, pointer, legacy)
//! and their internal layout is irrelevant to fee balancing and signing. The
//! builder only ever calls [`Address::to_bytes`] and writes the result into
//! an output verbatim.
//!
//! [`Bech32Address`] is provided for callers who hold the human-readable form
//! (`addr1...`, `addr_test1...`). Its bytes are the decoded bech32 payload,
//! header byte included.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Anything that can be written as the address of a transaction output.
pub trait Address {
    /// The raw address bytes as they appear on the wire.
    fn to_bytes(&self) -> Vec<u8>;
}

impl Address for [u8] {
    fn to_bytes(&self) -> Vec<u8> {
        self.to_vec()
    }
}

impl Address for Vec<u8> {
    fn to_bytes(&self) -> Vec<u8> {
        self.clone()
    }
}

impl<const N: usize> Address for [u8; N] {
    fn to_bytes(&self) -> Vec<u8> {
        self.to_vec()
    }
}

impl<A: Address + ?Sized> Address for &A {
    fn to_bytes(&self) -> Vec<u8> {
        (**self).to_bytes()
    }
}

/// Errors from parsing a bech32 address string.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AddressError {
    #[error("bech32 decode error: {0}")]
    Bech32Decode(String),

    #[error("address payload is empty")]
    EmptyPayload,
}

/// A bech32-encoded address, decoded once at parse time.
///
/// Equality is on the human-readable prefix and payload, so upper- and
/// lower-case renderings of the same address compare equal.
#[derive(Clone)]
pub struct Bech32Address {
    hrp: String,
    payload: Vec<u8>,
    encoded: String,
}

impl Bech32Address {
    /// Parse and checksum-verify a bech32 address.
    pub fn parse(s: &str) -> Result<Self, AddressError> {
        let (hrp, payload) =
            bech32::decode(s).map_err(|e| AddressError::Bech32Decode(e.to_string()))?;
        if payload.is_empty() {
            return Err(AddressError::EmptyPayload);
        }
        Ok(Self {
            hrp: hrp.as_str().to_ascii_lowercase(),
            payload,
            encoded: s.to_ascii_lowercase(),
        })
    }

    /// The human-readable prefix, e.g. `addr_test`.
    pub fn hrp(&self) -> &str {
        &self.hrp
    }

    /// The decoded payload.
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }
}

impl Address for Bech32Address {
    fn to_bytes(&self) -> Vec<u8> {
        self.payload.clone()
    }
}

impl PartialEq for Bech32Address {
    fn eq(&self, other: &Self) -> bool {
        self.hrp == other.hrp && self.payload == other.payload
    }
}

impl Eq for Bech32Address {}

impl fmt::Debug for Bech32Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Bech32Address({})", self.encoded)
    }
}

impl fmt::Display for Bech32Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encoded)
    }
}

impl FromStr for Bech32Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Bech32Address {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.encoded)
    }
}

impl<'de> Deserialize<'de> for Bech32Address {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TESTNET_ADDR: &str = "addr_test1vrct863kj4p2tpyzjzmjweyttquttk4z2kw7h42alj4p7gqma8ms5";
    const TESTNET_BYTES: &str = "60f0b3ea369542a5848290b727648b5838b5daa2559debd55dfcaa1f20";

    #[test]
    fn parses_enterprise_testnet_address() {
        let addr = Bech32Address::parse(TESTNET_ADDR).unwrap();
        assert_eq!(addr.hrp(), "addr_test");
        assert_eq!(hex::encode(addr.to_bytes()), TESTNET_BYTES);
        assert_eq!(addr.payload().len(), 29);
        assert_eq!(addr.to_string(), TESTNET_ADDR);
    }

    #[test]
    fn case_insensitive_equality() {
        let lower = Bech32Address::parse(TESTNET_ADDR).unwrap();
        let upper = Bech32Address::parse(&TESTNET_ADDR.to_ascii_uppercase()).unwrap();
        assert_eq!(lower, upper);
        assert_eq!(upper.to_string(), TESTNET_ADDR);
    }

    #[test]
    fn bad_checksum_rejected() {
        let mut corrupted = TESTNET_ADDR.to_string();
        corrupted.pop();
        corrupted.push('q');
        assert!(matches!(
            Bech32Address::parse(&corrupted),
            Err(AddressError::Bech32Decode(_))
        ));
        assert!("not an address".parse::<Bech32Address>().is_err());
    }

    #[test]
    fn raw_byte_containers_are_addresses() {
        let bytes = hex::decode(TESTNET_BYTES).unwrap();
        assert_eq!(Address::to_bytes(&bytes), bytes);
        assert_eq!(Address::to_bytes(bytes.as_slice()), bytes);
        assert_eq!(Address::to_bytes(&[0x60u8, 0x01]), vec![0x60, 0x01]);
    }

    #[test]
    fn serde_uses_bech32_string() {
        let addr = Bech32Address::parse(TESTNET_ADDR).unwrap();
        let json = serde_json::to_string(&addr).unwrap();
        assert_eq!(json, format!("\"{TESTNET_ADDR}\""));
        let back: Bech32Address = serde_json::from_str(&json).unwrap();
        assert_eq!(back, addr);
    }
}
