//! # DID Resolver
//!
//! Resolves a `did:substrate` DID into a DID document by reading the DID
//! pallet's owner, delegate and attribute storage through a [`ChainClient`].
//!
//! See [DID resolution](https://www.w3.org/TR/did-core/#did-resolution) for more.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::address::{AddressCodec, DEFAULT_PREFIX, Ss58Codec};
use crate::document::{DID_CONTEXT, Document, KeyFormat, MethodType, Service, VerificationMethod};
use crate::error::Error;
use crate::provider::{ChainClient, Identifier};
use crate::url::Url;
use crate::{attribute, delegate};

/// Resolver configuration.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct Options {
    /// DID method served by the resolver.
    pub method: String,

    /// SS58 network prefix used when rendering raw key bytes as an address.
    pub ss58_prefix: u16,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            method: "substrate".to_string(),
            ss58_prefix: DEFAULT_PREFIX,
        }
    }
}

/// Verification method and service numbering for a single resolution.
///
/// Delegates and `did/pub` attributes share `delegate_count` so their
/// `#delegate-N` fragments never collide.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Counters {
    /// Number of `#delegate-N` verification methods issued so far.
    pub delegate_count: usize,

    /// Number of `#service-N` services issued so far.
    pub service_count: usize,
}

impl Counters {
    /// Advance and return the delegate number.
    pub fn next_delegate(&mut self) -> usize {
        self.delegate_count += 1;
        self.delegate_count
    }

    /// Advance and return the service number.
    pub fn next_service(&mut self) -> usize {
        self.service_count += 1;
        self.service_count
    }
}

/// Resolves DIDs against the chain reached through its own [`ChainClient`].
pub struct Resolver<C: ChainClient> {
    client: C,
    options: Options,
    codec: Ss58Codec,
}

impl<C: ChainClient> Resolver<C> {
    /// Create a resolver with default options.
    pub fn new(client: C) -> Self {
        Self::with_options(client, Options::default())
    }

    /// Create a resolver with the given options.
    pub fn with_options(client: C, options: Options) -> Self {
        Self {
            client,
            codec: Ss58Codec::new(options.ss58_prefix),
            options,
        }
    }

    /// Resolve `did`, whose method-specific identifier is `id`.
    ///
    /// An `id` that is not a valid address yields an `invalidDid` resolution
    /// result rather than an error.
    ///
    /// # Errors
    /// Returns [`Error::Chain`] if any chain read fails.
    #[instrument(level = "debug", skip(self))]
    pub async fn resolve(&self, did: &str, id: &str) -> crate::Result<Resolved> {
        if !self.codec.is_valid(id) {
            tracing::debug!("{id} is not a valid address");
            return Ok(Resolved::error(
                ErrorCode::InvalidDid,
                format!("Not a valid did:{}:{id}", self.options.method),
            ));
        }
        let identity = Identifier::new(id);

        let owner = self.client.owner_of(&identity).await?;
        let owner = owner.map_or_else(|| did.to_string(), |o| o.to_string());
        let mut document = base_document(did, owner);
        let mut counters = Counters::default();

        let current_block = self.client.current_block().await?;

        let delegates = self.client.delegates_of(&identity).await?;
        delegate::process(did, &delegates, current_block, &mut counters, &mut document);

        let attributes = self.client.attributes_of(&identity).await?;
        attribute::process(
            did,
            &attributes,
            current_block,
            &mut counters,
            &self.codec,
            &mut document,
        );

        tracing::debug!(
            "resolved {did} at block {current_block} with {} delegate(s) and {} service(s)",
            counters.delegate_count,
            counters.service_count
        );

        Ok(Resolved {
            did_document_metadata: DocumentMetadata {
                deactivated: Some(false),
            },
            did_resolution_metadata: Metadata {
                content_type: Some(ContentType::DidLdJson),
                ..Metadata::default()
            },
            did_document: Some(document),
        })
    }

    /// Parse a DID (or DID URL) string and resolve it. Any fragment is
    /// ignored.
    ///
    /// Malformed DIDs and DIDs for other methods yield an error resolution
    /// result.
    ///
    /// # Errors
    /// Returns [`Error::Chain`] if any chain read fails.
    pub async fn resolve_did(&self, did_url: &str) -> crate::Result<Resolved> {
        let url = match Url::from_str(did_url) {
            Ok(url) => url,
            Err(e) => return Ok(Resolved::error(ErrorCode::InvalidDid, e.message())),
        };
        if url.method != self.options.method {
            return Ok(Resolved::error(
                ErrorCode::MethodNotSupported,
                format!("method not supported: {}", url.method),
            ));
        }
        self.resolve(&url.did(), &url.id).await
    }

    /// Dereference a DID URL into the document, or the verification method
    /// or service named by its fragment.
    ///
    /// # Errors
    /// Returns an error if the URL cannot be parsed, names another method,
    /// the DID is invalid, the resource is not in the document, or a chain
    /// read fails.
    pub async fn dereference(&self, did_url: &str) -> crate::Result<Resource> {
        let url = Url::from_str(did_url)?;
        if url.method != self.options.method {
            return Err(Error::MethodNotSupported(format!("method not supported: {}", url.method)));
        }

        let resolved = self.resolve(&url.did(), &url.id).await?;
        let Some(document) = resolved.did_document else {
            let message = resolved.did_resolution_metadata.message.unwrap_or_default();
            return Err(Error::InvalidDidUrl(message));
        };
        document_resource(&url, &document)
    }
}

/// Get a resource from a DID document.
///
/// Uses the `Url` fragment to infer the type of resource to return.
///
/// # Errors
/// Will return an error if the resource is not found in the document.
pub fn document_resource(url: &Url, doc: &Document) -> crate::Result<Resource> {
    if url.fragment.is_none() {
        return Ok(Resource::Document(doc.clone()));
    }
    let id = url.to_string();
    if let Some(vm) = doc.verification_method(&id) {
        return Ok(Resource::VerificationMethod(vm.clone()));
    }
    if let Some(service) = doc.service(&id) {
        return Ok(Resource::Service(service.clone()));
    }
    Err(Error::InvalidDidUrl(format!("{id} not found in document")))
}

// The owner's account controls the DID and may both authenticate and assert.
fn base_document(did: &str, owner: String) -> Document {
    let controller = format!("{did}#controller");
    Document {
        context: vec![DID_CONTEXT.to_string()],
        id: did.to_string(),
        verification_method: vec![VerificationMethod {
            id: controller.clone(),
            type_: MethodType::Ed25519VerificationKey2018,
            controller: did.to_string(),
            key: KeyFormat::BlockchainAccountId {
                blockchain_account_id: owner,
            },
        }],
        authentication: vec![controller.clone()],
        assertion_method: vec![controller],
        service: vec![],
        key_agreement: vec![],
    }
}

/// Returned by [`Resolver::resolve`].
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Resolved {
    /// DID document metadata. Empty if resolution failed.
    pub did_document_metadata: DocumentMetadata,

    /// Resolution metadata.
    pub did_resolution_metadata: Metadata,

    /// The DID document, or `null` if resolution failed.
    pub did_document: Option<Document>,
}

impl Resolved {
    /// A failed resolution with the given error code and message.
    #[must_use]
    pub fn error(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            did_resolution_metadata: Metadata {
                error: Some(code),
                message: Some(message.into()),
                ..Metadata::default()
            },
            ..Self::default()
        }
    }
}

/// Resolution metadata.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    /// The Media Type of the returned document.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<ContentType>,

    /// The error code from the resolution process, if applicable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorCode>,

    /// A human-readable explanation of the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// DID document metadata.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DocumentMetadata {
    /// Always `false` for a resolved document. Omitted if resolution failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deactivated: Option<bool>,
}

/// The Media Type of the returned resource.
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub enum ContentType {
    /// JSON-LD representation of a DID document.
    #[default]
    #[serde(rename = "application/did+ld+json")]
    DidLdJson,
}

/// Resolution error codes.
///
/// See <https://www.w3.org/TR/did-spec-registries/#error>.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ErrorCode {
    /// The DID is malformed or its identifier is not a valid address.
    InvalidDid,

    /// The DID names a method this resolver does not serve.
    MethodNotSupported,

    /// The DID could not be found.
    NotFound,

    /// The DID names an unknown network.
    UnknownNetwork,
}

/// Resource represents the DID document resource returned as a result of DID
/// dereferencing. The resource is a DID document or a subset of a DID document.
#[allow(clippy::large_enum_variant)]
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub enum Resource {
    ///  DID `Document` resource.
    Document(Document),

    /// `VerificationMethod` resource.
    VerificationMethod(VerificationMethod),

    /// `Service` resource.
    Service(Service),
}
