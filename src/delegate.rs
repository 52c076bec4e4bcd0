//! # Delegates
//!
//! Delegates are accounts authorized to act for an identity until a given
//! block. Each active `sigAuth` or `veriKey` delegate becomes an
//! `Ed25519VerificationKey2018` verification method (the default Substrate
//! keyring type) referring to the delegate's account. `sigAuth` delegates can
//! also authenticate as the DID.

use std::str::FromStr;

use anyhow::anyhow;

use crate::document::{Document, KeyFormat, MethodType, VerificationMethod};
use crate::provider::{BlockNumber, DelegateEntry};
use crate::resolve::Counters;

/// Delegate types published in the DID document.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DelegateType {
    /// Signature authentication: the delegate may authenticate as the DID.
    SigAuth,

    /// Verification key: the delegate may sign on behalf of the DID.
    VeriKey,
}

impl FromStr for DelegateType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s {
            "sigAuth" => Ok(Self::SigAuth),
            "veriKey" => Ok(Self::VeriKey),
            _ => Err(anyhow!("delegate type not supported: {s}")),
        }
    }
}

/// Add verification methods for active delegates to the document, in the
/// order the entries are given.
pub fn process(
    did: &str, entries: &[DelegateEntry], current_block: BlockNumber, counters: &mut Counters,
    document: &mut Document,
) {
    for entry in entries {
        if entry.valid_before <= current_block {
            tracing::trace!(
                "skipping delegate {}: expired at block {}",
                entry.key.delegate,
                entry.valid_before
            );
            continue;
        }
        let Ok(delegate_type) = DelegateType::from_str(&entry.key.delegate_type) else {
            tracing::trace!(
                "skipping delegate {}: unsupported type {}",
                entry.key.delegate,
                entry.key.delegate_type
            );
            continue;
        };

        let id = format!("{did}#delegate-{}", counters.next_delegate());
        document.verification_method.push(VerificationMethod {
            id: id.clone(),
            type_: MethodType::Ed25519VerificationKey2018,
            controller: did.to_string(),
            key: KeyFormat::BlockchainAccountId {
                blockchain_account_id: entry.key.delegate.to_string(),
            },
        });
        if delegate_type == DelegateType::SigAuth {
            document.authentication.push(id);
        }
        document.add_context(MethodType::Ed25519VerificationKey2018.context());
    }
}
