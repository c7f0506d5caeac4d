//! Wire envelopes and the registry of decoders for them.
//!
//! An envelope is `{ "type": <tag>, "value": { ... } }`. The set of accepted
//! tags is whatever was registered on the [`CodecRegistry`] the caller built;
//! there is no process-wide table.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use ns_types::{Buy, Operation, OperationKind, Rename};

use crate::error::{RegistryError, RegistryResult};

/// Wire tag of [`Rename`].
pub const SET_NAME_TAG: &str = "nameservice/SetName";
/// Wire tag of [`Buy`].
pub const BUY_NAME_TAG: &str = "nameservice/BuyName";

/// Tagged wire form of one operation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    #[serde(rename = "type")]
    pub tag: String,
    pub value: Value,
}

impl Envelope {
    pub fn new(tag: impl Into<String>, value: Value) -> Self {
        Self {
            tag: tag.into(),
            value,
        }
    }
}

/// Turns an envelope body into an operation.
pub type DecodeFn = fn(Value) -> RegistryResult<Operation>;

/// Wire tag for an operation kind.
pub fn tag_for(kind: OperationKind) -> &'static str {
    match kind {
        OperationKind::Rename => SET_NAME_TAG,
        OperationKind::Buy => BUY_NAME_TAG,
    }
}

/// Decoder table keyed by wire tag.
#[derive(Clone, Default)]
pub struct CodecRegistry {
    decoders: BTreeMap<String, DecodeFn>,
}

impl CodecRegistry {
    /// An empty registry that rejects every tag.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry that accepts both name-service operations.
    pub fn with_nameservice() -> Self {
        let mut decoders: BTreeMap<String, DecodeFn> = BTreeMap::new();
        decoders.insert(SET_NAME_TAG.to_string(), decode_set_name);
        decoders.insert(BUY_NAME_TAG.to_string(), decode_buy_name);
        Self { decoders }
    }

    /// Register `decode` for `tag`. A tag can only be registered once.
    pub fn register(&mut self, tag: impl Into<String>, decode: DecodeFn) -> RegistryResult<()> {
        let tag = tag.into();
        if self.decoders.contains_key(&tag) {
            return Err(RegistryError::AlreadyRegistered(format!("tag {tag:?}")));
        }
        self.decoders.insert(tag, decode);
        Ok(())
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.decoders.contains_key(tag)
    }

    /// Registered tags in sorted order.
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.decoders.keys().map(String::as_str)
    }

    /// Decode an envelope. Unregistered tags fail with `UnknownOperation`.
    pub fn decode(&self, envelope: &Envelope) -> RegistryResult<Operation> {
        let decode = self
            .decoders
            .get(&envelope.tag)
            .ok_or_else(|| RegistryError::UnknownOperation {
                tag: envelope.tag.clone(),
            })?;
        decode(envelope.value.clone())
    }

    /// Parse and decode a JSON envelope.
    pub fn decode_json(&self, json: &str) -> RegistryResult<Operation> {
        let envelope: Envelope =
            serde_json::from_str(json).map_err(|e| RegistryError::Codec(e.to_string()))?;
        self.decode(&envelope)
    }

    /// Wrap `op` in an envelope under its registered tag.
    pub fn encode(&self, op: &Operation) -> RegistryResult<Envelope> {
        let tag = tag_for(op.kind());
        if !self.contains(tag) {
            return Err(RegistryError::UnknownOperation {
                tag: tag.to_string(),
            });
        }
        let value = match op {
            Operation::Rename(rename) => serde_json::to_value(rename),
            Operation::Buy(buy) => serde_json::to_value(buy),
        }
        .map_err(|e| RegistryError::Codec(e.to_string()))?;
        Ok(Envelope::new(tag, value))
    }
}

impl std::fmt::Debug for CodecRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CodecRegistry")
            .field("tags", &self.tags().collect::<Vec<_>>())
            .finish()
    }
}

fn decode_set_name(value: Value) -> RegistryResult<Operation> {
    serde_json::from_value::<Rename>(value)
        .map(Operation::Rename)
        .map_err(|e| RegistryError::Codec(format!("{SET_NAME_TAG}: {e}")))
}

fn decode_buy_name(value: Value) -> RegistryResult<Operation> {
    serde_json::from_value::<Buy>(value)
        .map(Operation::Buy)
        .map_err(|e| RegistryError::Codec(format!("{BUY_NAME_TAG}: {e}")))
}
