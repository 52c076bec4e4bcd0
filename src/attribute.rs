//! # Attributes
//!
//! Attributes are named byte values stored against an identity. The pallet
//! shares attribute storage with non-DID uses, so only names following one of
//! two forms contribute to the DID document:
//!
//! ```text
//! did/svc/<ServiceName>
//! did/pub/<Secp256k1|Ed25519|X25519>/<veriKey|sigAuth|enc>/<hex|base58>
//! ```
//!
//! Anything else is skipped without error.

use std::str::FromStr;
use std::sync::LazyLock;

use anyhow::anyhow;
use regex::Regex;

use crate::address::AddressCodec;
use crate::document::{Document, KeyFormat, MethodType, Service, VerificationMethod};
use crate::provider::{AttributeEntry, BlockNumber};
use crate::resolve::Counters;

static NAME_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^did/(pub|svc)/([0-9A-Za-z_]+)(/([0-9A-Za-z_]+))?(/([0-9A-Za-z_]+))?$")
        .expect("should compile")
});

/// Key algorithm of a published public key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Algorithm {
    /// `Secp256k1`
    Secp256k1,

    /// `Ed25519`
    Ed25519,

    /// `X25519`
    X25519,
}

impl Algorithm {
    /// Verification method type for keys of this algorithm.
    #[must_use]
    pub const fn method_type(self) -> MethodType {
        match self {
            Self::Secp256k1 => MethodType::EcdsaSecp256k1RecoveryMethod2020,
            Self::Ed25519 => MethodType::Ed25519VerificationKey2018,
            Self::X25519 => MethodType::X25519KeyAgreementKey2019,
        }
    }
}

impl FromStr for Algorithm {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s {
            "Secp256k1" => Ok(Self::Secp256k1),
            "Ed25519" => Ok(Self::Ed25519),
            "X25519" => Ok(Self::X25519),
            _ => Err(anyhow!("key algorithm not supported: {s}")),
        }
    }
}

/// Purpose of a published public key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Purpose {
    /// Verification key. Listed as a verification method only.
    VeriKey,

    /// Signature authentication. Referenced from `authentication`.
    SigAuth,

    /// Encryption. Referenced from `keyAgreement`.
    Enc,
}

impl FromStr for Purpose {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s {
            "veriKey" => Ok(Self::VeriKey),
            "sigAuth" => Ok(Self::SigAuth),
            "enc" => Ok(Self::Enc),
            _ => Err(anyhow!("key purpose not supported: {s}")),
        }
    }
}

/// Encoding used to publish the key material.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Encoding {
    /// Published as hex.
    Hex,

    /// Published as base58: either raw account bytes or base58 text.
    Base58,
}

impl FromStr for Encoding {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s {
            "hex" => Ok(Self::Hex),
            "base58" => Ok(Self::Base58),
            _ => Err(anyhow!("key encoding not supported: {s}")),
        }
    }
}

/// Algorithm, purpose and encoding of a published public key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeySpec {
    /// Key algorithm.
    pub algorithm: Algorithm,

    /// Key purpose.
    pub purpose: Purpose,

    /// Key encoding.
    pub encoding: Encoding,
}

/// A recognised attribute name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AttributeName {
    /// `did/svc/<ServiceName>`
    Service(String),

    /// `did/pub/<Algorithm>/<Purpose>/<Encoding>`
    PublicKey(KeySpec),
}

impl AttributeName {
    /// Parse raw attribute name bytes. Returns `None` for names that do not
    /// describe a service or a supported public key.
    #[must_use]
    pub fn parse(name: &[u8]) -> Option<Self> {
        let name = byte_string(name);
        let caps = NAME_REGEX.captures(&name)?;

        if &caps[1] == "svc" {
            return Some(Self::Service(caps[2].to_string()));
        }

        let algorithm = Algorithm::from_str(&caps[2]).ok()?;
        let purpose = Purpose::from_str(caps.get(4)?.as_str()).ok()?;
        let encoding = Encoding::from_str(caps.get(6)?.as_str()).ok()?;
        Some(Self::PublicKey(KeySpec {
            algorithm,
            purpose,
            encoding,
        }))
    }
}

/// Map each byte to the character with the same code point.
///
/// Only meaningful for ASCII; bytes above 0x7f become Latin-1 characters
/// rather than being decoded as UTF-8.
#[must_use]
pub fn byte_string(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

/// Add services and public keys described by active attributes to the
/// document, in the order the entries are given.
pub fn process(
    did: &str, entries: &[AttributeEntry], current_block: BlockNumber, counters: &mut Counters,
    codec: &impl AddressCodec, document: &mut Document,
) {
    for entry in entries {
        if entry.valid_before <= current_block {
            tracing::trace!("skipping attribute: expired at block {}", entry.valid_before);
            continue;
        }
        let Some(name) = AttributeName::parse(&entry.name) else {
            tracing::trace!("skipping attribute {}: not a DID attribute", byte_string(&entry.name));
            continue;
        };
        if entry.value.is_empty() {
            tracing::trace!("skipping attribute {}: empty value", byte_string(&entry.name));
            continue;
        }

        match name {
            AttributeName::Service(service_type) => {
                document.service.push(Service {
                    id: format!("{did}#service-{}", counters.next_service()),
                    type_: service_type,
                    service_endpoint: byte_string(&entry.value),
                });
            }
            AttributeName::PublicKey(spec) => {
                let vm = public_key(did, spec, &entry.value, counters, codec);
                match spec.purpose {
                    Purpose::VeriKey => {}
                    Purpose::SigAuth => document.authentication.push(vm.id.clone()),
                    Purpose::Enc => document.key_agreement.push(vm.id.clone()),
                }
                document.add_context(vm.type_.context());
                document.verification_method.push(vm);
            }
        }
    }
}

fn public_key(
    did: &str, spec: KeySpec, value: &[u8], counters: &mut Counters, codec: &impl AddressCodec,
) -> VerificationMethod {
    let key = match spec.encoding {
        Encoding::Hex => KeyFormat::PublicKeyHex {
            public_key_hex: format!("0x{}", hex::encode(value)),
        },
        // values may hold raw account bytes or base58 text
        Encoding::Base58 => {
            let address =
                codec.is_valid_bytes(value).then(|| codec.encode(value).ok()).flatten();
            KeyFormat::PublicKeyBase58 {
                public_key_base58: address.unwrap_or_else(|| byte_string(value)),
            }
        }
    };

    VerificationMethod {
        id: format!("{did}#delegate-{}", counters.next_delegate()),
        type_: spec.algorithm.method_type(),
        controller: did.to_string(),
        key,
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::address::Ss58Codec;
    use crate::provider::Identifier;

    const DID: &str = "did:substrate:5GrwvaEF5zXb26Fz9rcQpDWS57CtERHpNehXCPcNoHGKutQY";

    fn entry(name: &str, value: &[u8], valid_before: BlockNumber) -> AttributeEntry {
        AttributeEntry {
            identity: Identifier::new("5GrwvaEF5zXb26Fz9rcQpDWS57CtERHpNehXCPcNoHGKutQY"),
            name: name.as_bytes().to_vec(),
            value: value.to_vec(),
            valid_before,
        }
    }

    fn run(entries: &[AttributeEntry]) -> (Document, Counters) {
        let mut doc = Document::default();
        let mut counters = Counters::default();
        process(DID, entries, 100, &mut counters, &Ss58Codec::default(), &mut doc);
        (doc, counters)
    }

    #[test]
    fn parse_names() {
        assert_eq!(
            AttributeName::parse(b"did/svc/messaging"),
            Some(AttributeName::Service("messaging".into()))
        );
        assert_eq!(
            AttributeName::parse(b"did/pub/X25519/enc/base58"),
            Some(AttributeName::PublicKey(KeySpec {
                algorithm: Algorithm::X25519,
                purpose: Purpose::Enc,
                encoding: Encoding::Base58,
            }))
        );
        assert_eq!(AttributeName::parse(b"did/pub/RSA/veriKey/hex"), None);
        assert_eq!(AttributeName::parse(b"did/pub/Ed25519/veriKey/base64"), None);
        assert_eq!(AttributeName::parse(b"did/pub/Ed25519/sigAuth"), None);
        assert_eq!(AttributeName::parse(b"did/pub/Ed25519/other/hex"), None);
        assert_eq!(AttributeName::parse(b"did/svc/"), None);
        assert_eq!(AttributeName::parse(b"name"), None);
        assert_eq!(AttributeName::parse(b"did/svc/caf\xe9"), None);
        assert_eq!(AttributeName::parse(b"xdid/svc/messaging"), None);
    }

    #[test]
    fn service() {
        let (doc, counters) = run(&[entry("did/svc/messaging", b"https://example.com/ep", 200)]);

        assert_eq!(
            doc.service,
            vec![Service {
                id: format!("{DID}#service-1"),
                type_: "messaging".into(),
                service_endpoint: "https://example.com/ep".into(),
            }]
        );
        assert_eq!(counters.service_count, 1);
        assert_eq!(counters.delegate_count, 0);
        assert!(doc.context.is_empty());
    }

    #[test]
    fn empty_value() {
        let (doc, counters) = run(&[
            entry("did/svc/messaging", b"", 200),
            entry("did/pub/Ed25519/veriKey/hex", b"", 200),
        ]);

        assert!(doc.service.is_empty());
        assert!(doc.verification_method.is_empty());
        assert_eq!(counters, Counters::default());
    }

    #[test]
    fn expired() {
        let (doc, _) = run(&[
            entry("did/svc/messaging", b"https://example.com/ep", 100),
            entry("did/pub/Ed25519/sigAuth/hex", &[1, 2, 3], 50),
        ]);

        assert!(doc.service.is_empty());
        assert!(doc.verification_method.is_empty());
        assert!(doc.authentication.is_empty());
    }

    #[test]
    fn ed25519_sig_auth_hex() {
        let (doc, _) = run(&[
            entry("did/pub/Ed25519/sigAuth/hex", &[0xde, 0xad, 0xbe, 0xef], 200),
            entry("did/pub/Ed25519/veriKey/hex", &[0x01], 200),
        ]);

        let vm = &doc.verification_method[0];
        assert_eq!(vm.id, format!("{DID}#delegate-1"));
        assert_eq!(vm.type_, MethodType::Ed25519VerificationKey2018);
        assert_eq!(
            vm.key,
            KeyFormat::PublicKeyHex {
                public_key_hex: "0xdeadbeef".into()
            }
        );
        assert_eq!(doc.authentication, vec![format!("{DID}#delegate-1")]);
        assert_eq!(doc.verification_method[1].id, format!("{DID}#delegate-2"));
        assert_eq!(doc.context, vec![MethodType::Ed25519VerificationKey2018.context()]);
    }

    #[test]
    fn key_agreement() {
        let (doc, _) = run(&[entry("did/pub/X25519/enc/hex", &[9; 32], 200)]);

        assert_eq!(doc.verification_method[0].type_, MethodType::X25519KeyAgreementKey2019);
        assert_eq!(doc.key_agreement, vec![format!("{DID}#delegate-1")]);
        assert!(doc.authentication.is_empty());
        assert_eq!(doc.context, vec![MethodType::X25519KeyAgreementKey2019.context()]);
    }

    #[test]
    fn secp256k1_veri_key() {
        let (doc, _) = run(&[entry("did/pub/Secp256k1/veriKey/hex", &[2; 33], 200)]);

        assert_eq!(doc.verification_method[0].type_, MethodType::EcdsaSecp256k1RecoveryMethod2020);
        assert!(doc.authentication.is_empty());
        assert!(doc.key_agreement.is_empty());
        assert_eq!(doc.context, vec![MethodType::EcdsaSecp256k1RecoveryMethod2020.context()]);
    }

    #[test]
    fn base58_account_bytes() {
        let bytes = hex::decode("d43593c715fdd31c61141abd04a99fd6822c8558854ccde39a5684e7a56da27d")
            .expect("should decode");
        let (doc, _) = run(&[entry("did/pub/Ed25519/veriKey/base58", &bytes, 200)]);

        assert_eq!(
            doc.verification_method[0].key,
            KeyFormat::PublicKeyBase58 {
                public_key_base58: "5GrwvaEF5zXb26Fz9rcQpDWS57CtERHpNehXCPcNoHGKutQY".into()
            }
        );
    }

    #[test]
    fn base58_text() {
        let text = b"H3C2AVvLMv6gmMNam3uVAjZpfkcJCwDwnZn6z3wXmqPV";
        let (doc, _) = run(&[entry("did/pub/Ed25519/veriKey/base58", text, 200)]);

        assert_eq!(
            doc.verification_method[0].key,
            KeyFormat::PublicKeyBase58 {
                public_key_base58: "H3C2AVvLMv6gmMNam3uVAjZpfkcJCwDwnZn6z3wXmqPV".into()
            }
        );
    }

    #[test]
    fn shared_counters() {
        let mut doc = Document::default();
        let mut counters = Counters {
            delegate_count: 2,
            service_count: 0,
        };
        let entries = [
            entry("did/svc/hub", b"https://hub.example.com", 200),
            entry("did/pub/Ed25519/sigAuth/hex", &[1], 200),
            entry("did/svc/inbox", b"https://inbox.example.com", 200),
        ];
        process(DID, &entries, 100, &mut counters, &Ss58Codec::default(), &mut doc);

        assert_eq!(doc.verification_method[0].id, format!("{DID}#delegate-3"));
        assert_eq!(doc.service[0].id, format!("{DID}#service-1"));
        assert_eq!(doc.service[1].id, format!("{DID}#service-2"));
    }

    #[test]
    fn byte_mapping() {
        assert_eq!(byte_string(b"did/svc"), "did/svc");
        assert_eq!(byte_string(&[0x63, 0xe9]), "c\u{e9}");
    }
}
