//! Registry operations.
//!
//! The set of operations is closed: [`Operation`] is an enum and every consumer
//! matches on it exhaustively. Wire tags and decoding live in the registry's
//! codec, not here.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::address::Address;
use crate::amount::Amount;
use crate::error::TypeError;

/// Route shared by every name-service operation.
pub const ROUTE: &str = "nameservice";

/// Set the value a name resolves to. Only the current owner may do this.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rename {
    pub name: String,
    pub value: String,
    pub sender: Address,
}

impl Rename {
    pub fn new(name: impl Into<String>, value: impl Into<String>, sender: Address) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            sender,
        }
    }
}

/// Acquire a name by outbidding its current price.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Buy {
    pub name: String,
    pub bid: Amount,
    pub buyer: Address,
}

impl Buy {
    pub fn new(name: impl Into<String>, bid: Amount, buyer: Address) -> Self {
        Self {
            name: name.into(),
            bid,
            buyer,
        }
    }
}

/// Kind tag of an operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperationKind {
    #[serde(rename = "set_name")]
    Rename,
    #[serde(rename = "buy_name")]
    Buy,
}

impl OperationKind {
    /// Short action name used in receipts and events.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rename => "set_name",
            Self::Buy => "buy_name",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Any operation the registry understands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Operation {
    Rename(Rename),
    Buy(Buy),
}

impl Operation {
    /// Route of the module that handles this operation.
    pub fn route(&self) -> &'static str {
        ROUTE
    }

    pub fn kind(&self) -> OperationKind {
        match self {
            Self::Rename(_) => OperationKind::Rename,
            Self::Buy(_) => OperationKind::Buy,
        }
    }

    /// The name this operation targets.
    pub fn name(&self) -> &str {
        match self {
            Self::Rename(op) => &op.name,
            Self::Buy(op) => &op.name,
        }
    }

    /// Accounts whose signatures authorize this operation.
    pub fn signers(&self) -> Vec<Address> {
        match self {
            Self::Rename(op) => vec![op.sender],
            Self::Buy(op) => vec![op.buyer],
        }
    }

    /// Canonical bytes a signer commits to: compact JSON with keys sorted.
    ///
    /// Keys come out sorted because `serde_json::Value` objects are backed by
    /// a `BTreeMap`.
    pub fn sign_bytes(&self) -> Result<Vec<u8>, TypeError> {
        let value = match self {
            Self::Rename(op) => serde_json::to_value(op),
            Self::Buy(op) => serde_json::to_value(op),
        }
        .map_err(|e| TypeError::Serialization(e.to_string()))?;
        serde_json::to_vec(&value).map_err(|e| TypeError::Serialization(e.to_string()))
    }
}

impl From<Rename> for Operation {
    fn from(op: Rename) -> Self {
        Self::Rename(op)
    }
}

impl From<Buy> for Operation {
    fn from(op: Buy) -> Self {
        Self::Buy(op)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> Address {
        Address::derive(b"alice")
    }

    #[test]
    fn kinds_and_route() {
        let rename: Operation = Rename::new("a.id", "1.2.3.4", alice()).into();
        let buy: Operation = Buy::new("a.id", Amount::new(5), alice()).into();
        assert_eq!(rename.kind(), OperationKind::Rename);
        assert_eq!(buy.kind(), OperationKind::Buy);
        assert_eq!(rename.kind().as_str(), "set_name");
        assert_eq!(buy.kind().to_string(), "buy_name");
        assert_eq!(rename.route(), ROUTE);
        assert_eq!(buy.route(), ROUTE);
    }

    #[test]
    fn kind_serializes_as_its_action_name() {
        for kind in [OperationKind::Rename, OperationKind::Buy] {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
            let parsed: OperationKind = serde_json::from_str(&json).unwrap();
            assert_eq!(parsed, kind);
        }
        assert_eq!(
            serde_json::to_value(OperationKind::Rename).unwrap(),
            "set_name"
        );
    }

    #[test]
    fn signers_are_the_acting_account() {
        let bob = Address::derive(b"bob");
        let rename: Operation = Rename::new("a.id", "v", alice()).into();
        let buy: Operation = Buy::new("a.id", Amount::new(5), bob).into();
        assert_eq!(rename.signers(), vec![alice()]);
        assert_eq!(buy.signers(), vec![bob]);
    }

    #[test]
    fn sign_bytes_have_sorted_keys() {
        let buy: Operation = Buy::new("a.id", Amount::new(5), alice()).into();
        let bytes = buy.sign_bytes().unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let bid = text.find("\"bid\"").unwrap();
        let buyer = text.find("\"buyer\"").unwrap();
        let name = text.find("\"name\"").unwrap();
        assert!(bid < buyer && buyer < name, "keys not sorted: {text}");
        assert!(text.contains("\"bid\":\"5\""));
    }

    #[test]
    fn sign_bytes_are_deterministic() {
        let op: Operation = Rename::new("a.id", "x", alice()).into();
        assert_eq!(op.sign_bytes().unwrap(), op.sign_bytes().unwrap());
    }

    #[test]
    fn name_accessor() {
        let op: Operation = Buy::new("b.id", Amount::new(1), alice()).into();
        assert_eq!(op.name(), "b.id");
    }
}
