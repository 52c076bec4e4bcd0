//! # Provider Traits
//!
//! The resolver reads DID state through a [`ChainClient`] supplied by the
//! caller. Implementers query the DID pallet of a Substrate node (or any
//! other source with the same storage layout) and return its storage entries
//! as the typed values below.

use std::fmt::{self, Display, Formatter};
use std::future::Future;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Block height on the chain.
pub type BlockNumber = u64;

/// A textual chain address (SS58 or `0x` hex) identifying an account.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Identifier(String);

impl Identifier {
    /// Create an identifier from its textual form. No validation is done
    /// here; see [`crate::AddressCodec::is_valid`].
    #[must_use]
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    /// The textual form of the identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Identifier {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Identifier {
    fn from(address: &str) -> Self {
        Self::new(address)
    }
}

impl From<String> for Identifier {
    fn from(address: String) -> Self {
        Self(address)
    }
}

impl AsRef<str> for Identifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Composite key of the `DelegateOf` storage map: identity, delegate type
/// and delegate account, in that order.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DelegateKey {
    /// The identity delegating.
    pub identity: Identifier,

    /// Raw delegate type, e.g. `sigAuth` or `veriKey`.
    pub delegate_type: String,

    /// The delegate account.
    pub delegate: Identifier,
}

/// An entry of the `DelegateOf` storage map.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DelegateEntry {
    /// Storage key of the entry.
    pub key: DelegateKey,

    /// The delegation is active while the current block is below this height.
    pub valid_before: BlockNumber,
}

/// An entry of the `AttributeOf` storage map.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AttributeEntry {
    /// The identity owning the attribute.
    pub identity: Identifier,

    /// Attribute name bytes, e.g. `did/svc/messaging`.
    pub name: Vec<u8>,

    /// Attribute value bytes.
    pub value: Vec<u8>,

    /// The attribute is active while the current block is below this height.
    pub valid_before: BlockNumber,
}

/// [`ChainClient`] is used by the resolver to read DID state from the chain.
///
/// Reads may be issued concurrently by several resolutions sharing one
/// client, so implementations must not serialize them.
pub trait ChainClient: Send + Sync {
    /// Current owner of the identity, or `None` if ownership has never been
    /// transferred.
    fn owner_of(
        &self, identity: &Identifier,
    ) -> impl Future<Output = Result<Option<Identifier>>> + Send;

    /// Height of the current best block.
    fn current_block(&self) -> impl Future<Output = Result<BlockNumber>> + Send;

    /// All delegate entries stored against the identity.
    fn delegates_of(
        &self, identity: &Identifier,
    ) -> impl Future<Output = Result<Vec<DelegateEntry>>> + Send;

    /// All attribute entries stored against the identity.
    fn attributes_of(
        &self, identity: &Identifier,
    ) -> impl Future<Output = Result<Vec<AttributeEntry>>> + Send;
}
