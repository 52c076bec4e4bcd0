//! # DID Document
//!
//! A DID Document is a JSON-LD document that contains information related to a
//! DID.

use serde::{Deserialize, Serialize};

/// The default context for a DID document.
///
/// <https://www.w3.org/TR/did-core/#context>
pub const DID_CONTEXT: &str = "https://www.w3.org/ns/did/v1";

/// DID Document
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// The JSON-LD contexts of the DID document, in first-seen order and
    /// without duplicates. Use [`Document::add_context`] to extend.
    #[serde(rename = "@context")]
    pub context: Vec<String>,

    /// The DID for a particular DID subject.
    ///
    /// The subject is defined as the entity identified by the DID and described
    /// by the DID document.
    pub id: String,

    /// Verification methods for the DID subject.
    pub verification_method: Vec<VerificationMethod>,

    /// The `authentication` verification relationship is used to specify how
    /// the DID subject is expected to be authenticated, for purposes such
    /// as logging into a website or in any sort of challenge-response
    /// protocol.
    ///
    /// <https://www.w3.org/TR/did-core/#authentication>
    pub authentication: Vec<String>,

    /// The `assertion_method` verification relationship is used to specify how
    /// the DID subject is expected to express claims, such as for the
    /// purposes of issuing a Verifiable Credential.
    ///
    /// <https://www.w3.org/TR/did-core/#assertion>
    pub assertion_method: Vec<String>,

    /// A set of services, that express ways of communicating with the DID
    /// subject or related entities.
    pub service: Vec<Service>,

    /// The `key_agreement` verification relationship is used to specify how an
    /// entity can generate encryption material in order to transmit
    /// confidential information intended for the DID subject.
    ///
    /// <https://www.w3.org/TR/did-core/#key-agreement>
    pub key_agreement: Vec<String>,
}

impl Document {
    /// Add a JSON-LD context. Contexts already present are ignored so the list
    /// keeps the order in which each was first added.
    pub fn add_context(&mut self, context: impl Into<String>) {
        let context = context.into();
        if !self.context.iter().any(|c| *c == context) {
            self.context.push(context);
        }
    }

    /// Retrieve a service by its ID.
    #[must_use]
    pub fn service(&self, id: &str) -> Option<&Service> {
        self.service.iter().find(|s| s.id == id)
    }

    /// Retrieve a verification method by its ID.
    #[must_use]
    pub fn verification_method(&self, id: &str) -> Option<&VerificationMethod> {
        self.verification_method.iter().find(|vm| vm.id == id)
    }
}

/// A Service is used to express a way of communicating with the DID subject or
/// associated entities.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    /// A URI unique to the service.
    pub id: String,

    /// The service type, taken from the attribute name.
    #[serde(rename = "type")]
    pub type_: String,

    /// The service endpoint.
    #[allow(clippy::struct_field_names)]
    pub service_endpoint: String,
}

/// A DID document can express verification methods, such as cryptographic
/// public keys, which can be used to authenticate or authorize interactions
/// with the DID subject or associated parties.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VerificationMethod {
    /// A DID URL that identifies the verification method.
    pub id: String,

    /// The type of verification method.
    #[serde(rename = "type")]
    pub type_: MethodType,

    /// The DID of the controller of the verification method.
    pub controller: String,

    /// The key material.
    #[serde(flatten)]
    pub key: KeyFormat,
}

/// Key material of a verification method. Exactly one form is present.
#[derive(Clone, Debug, Deserialize, Serialize, Eq, PartialEq)]
#[serde(rename_all_fields = "camelCase")]
#[serde(untagged)]
pub enum KeyFormat {
    /// An on-chain account.
    BlockchainAccountId {
        /// The account address as text.
        blockchain_account_id: String,
    },

    /// A `0x`-prefixed hex encoded public key.
    PublicKeyHex {
        /// The hex encoded public key.
        public_key_hex: String,
    },

    /// A base58 encoded public key.
    PublicKeyBase58 {
        /// The base58 encoded public key.
        public_key_base58: String,
    },
}

impl Default for KeyFormat {
    fn default() -> Self {
        Self::BlockchainAccountId {
            blockchain_account_id: String::new(),
        }
    }
}

/// Verification method types produced by this resolver.
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, Eq, PartialEq)]
pub enum MethodType {
    /// `Ed25519` verification key, version 2018. Also used for Substrate
    /// accounts (Ed25519 or Sr25519).
    #[default]
    Ed25519VerificationKey2018,

    /// `Secp256k1` recovery method, version 2020.
    EcdsaSecp256k1RecoveryMethod2020,

    /// `X25519` key agreement key, version 2019.
    X25519KeyAgreementKey2019,
}

impl MethodType {
    /// The JSON-LD context defining the method type.
    #[must_use]
    pub const fn context(&self) -> &'static str {
        match self {
            Self::Ed25519VerificationKey2018 => "https://w3id.org/security/suites/ed25519-2018/v1",
            Self::EcdsaSecp256k1RecoveryMethod2020 => {
                "https://w3id.org/security/suites/secp256k1recovery-2020/v2"
            }
            Self::X25519KeyAgreementKey2019 => "https://w3id.org/security/suites/x25519-2019/v1",
        }
    }
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use super::*;

    #[test]
    fn add_context() {
        let mut doc = Document::default();
        doc.add_context(DID_CONTEXT);
        doc.add_context(MethodType::X25519KeyAgreementKey2019.context());
        doc.add_context(DID_CONTEXT);
        doc.add_context(MethodType::X25519KeyAgreementKey2019.context());

        assert_eq!(
            doc.context,
            vec![DID_CONTEXT, "https://w3id.org/security/suites/x25519-2019/v1"]
        );
    }

    #[test]
    fn verification_method_json() {
        let vm = VerificationMethod {
            id: "did:substrate:abc#delegate-1".into(),
            type_: MethodType::EcdsaSecp256k1RecoveryMethod2020,
            controller: "did:substrate:abc".into(),
            key: KeyFormat::PublicKeyHex {
                public_key_hex: "0x0102".into(),
            },
        };

        let value = serde_json::to_value(&vm).expect("should serialize");
        assert_eq!(
            value,
            json!({
                "id": "did:substrate:abc#delegate-1",
                "type": "EcdsaSecp256k1RecoveryMethod2020",
                "controller": "did:substrate:abc",
                "publicKeyHex": "0x0102"
            })
        );

        let back: VerificationMethod = serde_json::from_value(value).expect("should deserialize");
        assert_eq!(back, vm);
    }

    #[test]
    fn lookup() {
        let doc = Document {
            id: "did:substrate:abc".into(),
            service: vec![Service {
                id: "did:substrate:abc#service-1".into(),
                type_: "messaging".into(),
                service_endpoint: "https://example.com".into(),
            }],
            ..Document::default()
        };

        assert!(doc.service("did:substrate:abc#service-1").is_some());
        assert!(doc.service("did:substrate:abc#service-2").is_none());
        assert!(doc.verification_method("did:substrate:abc#controller").is_none());
    }
}
