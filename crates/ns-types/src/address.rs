use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Length of an account address in bytes.
pub const ADDRESS_LEN: usize = 20;

/// Opaque, fixed-format account identifier.
///
/// Addresses are 20 raw bytes. The all-zero address is the "empty" address:
/// it never identifies a real account and operations carrying it are rejected
/// before they reach the state machine.
///
/// On the wire an address is a lowercase hex string, optionally prefixed with
/// `0x`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address([u8; ADDRESS_LEN]);

impl Address {
    /// The empty (all-zero) address.
    pub const fn zero() -> Self {
        Self([0u8; ADDRESS_LEN])
    }

    /// Derive an address deterministically from seed material.
    ///
    /// The address is the first 20 bytes of a domain-separated BLAKE3 hash, so
    /// the same seed always yields the same account.
    pub fn derive(seed: &[u8]) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(b"ns-address-v1:");
        hasher.update(seed);
        let hash = hasher.finalize();
        let mut bytes = [0u8; ADDRESS_LEN];
        bytes.copy_from_slice(&hash.as_bytes()[..ADDRESS_LEN]);
        Self(bytes)
    }

    /// Create a random address for tests and demos.
    pub fn random() -> Self {
        let mut seed = [0u8; 32];
        rand::Rng::fill(&mut rand::thread_rng(), &mut seed);
        Self::derive(&seed)
    }

    /// Create from raw bytes.
    pub const fn from_raw(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }

    /// Create from a byte slice, checking the length.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, TypeError> {
        let arr: [u8; ADDRESS_LEN] =
            bytes.try_into().map_err(|_| TypeError::InvalidLength {
                expected: ADDRESS_LEN,
                actual: bytes.len(),
            })?;
        Ok(Self(arr))
    }

    /// Returns `true` for the all-zero address.
    pub fn is_empty(&self) -> bool {
        self.0 == [0u8; ADDRESS_LEN]
    }

    /// The raw address bytes.
    pub fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.0
    }

    /// Full hex-encoded string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Short identifier (first 8 hex characters).
    pub fn short_hex(&self) -> String {
        hex::encode(&self.0[..4])
    }

    /// Parse from a hex string (40 hex characters, optional `0x` prefix).
    pub fn from_hex(s: &str) -> Result<Self, TypeError> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(s).map_err(|e| TypeError::InvalidHex(e.to_string()))?;
        Self::from_slice(&bytes)
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.short_hex())
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", self.to_hex())
    }
}

impl FromStr for Address {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl TryFrom<String> for Address {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::from_hex(&s)
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        address.to_string()
    }
}

impl From<[u8; ADDRESS_LEN]> for Address {
    fn from(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }
}

impl Default for Address {
    fn default() -> Self {
        Self::zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derive_is_deterministic() {
        assert_eq!(Address::derive(b"alice"), Address::derive(b"alice"));
    }

    #[test]
    fn different_seeds_produce_different_addresses() {
        assert_ne!(Address::derive(b"alice"), Address::derive(b"bob"));
    }

    #[test]
    fn derived_address_is_never_empty() {
        assert!(!Address::derive(b"").is_empty());
    }

    #[test]
    fn zero_is_empty() {
        assert!(Address::zero().is_empty());
        assert!(Address::default().is_empty());
    }

    #[test]
    fn random_addresses_are_unique() {
        assert_ne!(Address::random(), Address::random());
    }

    #[test]
    fn display_has_prefix() {
        let addr = Address::from_raw([0xab; ADDRESS_LEN]);
        let shown = addr.to_string();
        assert!(shown.starts_with("0x"));
        assert_eq!(shown.len(), 2 + 2 * ADDRESS_LEN);
    }

    #[test]
    fn parse_accepts_both_forms() {
        let addr = Address::derive(b"carol");
        assert_eq!(addr.to_hex().parse::<Address>().unwrap(), addr);
        assert_eq!(addr.to_string().parse::<Address>().unwrap(), addr);
    }

    #[test]
    fn parse_rejects_wrong_length() {
        let err = Address::from_hex("abcd").unwrap_err();
        assert_eq!(
            err,
            TypeError::InvalidLength {
                expected: ADDRESS_LEN,
                actual: 2
            }
        );
    }

    #[test]
    fn parse_rejects_bad_hex() {
        assert!(matches!(
            Address::from_hex("zz"),
            Err(TypeError::InvalidHex(_))
        ));
    }

    #[test]
    fn serializes_as_hex_string() {
        let addr = Address::from_raw([1; ADDRESS_LEN]);
        let json = serde_json::to_string(&addr).unwrap();
        assert_eq!(json, format!("\"0x{}\"", "01".repeat(ADDRESS_LEN)));
        let parsed: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, addr);
    }

    #[test]
    fn ordering_is_bytewise() {
        let a = Address::from_raw([0; ADDRESS_LEN]);
        let b = Address::from_raw([1; ADDRESS_LEN]);
        assert!(a < b);
    }
}
