//! # DID Substrate Resolver
//!
//! Resolves `did:substrate:<address>` DIDs into W3C DID documents by reading
//! the DID pallet's storage:
//!
//! - `OwnerOf` provides the controller account (defaulting to the DID itself),
//! - `DelegateOf` provides delegate accounts, published as verification
//!   methods while their validity window is open,
//! - `AttributeOf` provides public keys (`did/pub/...`) and service endpoints
//!   (`did/svc/...`).
//!
//! Chain access is supplied by the caller through the [`ChainClient`] trait.
//!
//! ```rust,ignore
//! let resolver = Resolver::new(client);
//! let did = "did:substrate:5GrwvaEF5zXb26Fz9rcQpDWS57CtERHpNehXCPcNoHGKutQY";
//! let resolved = resolver.resolve_did(did).await?;
//! ```

mod address;
pub mod attribute;
pub mod delegate;
mod document;
mod error;
mod provider;
mod resolve;
mod url;

pub use self::address::*;
pub use self::document::*;
pub use self::error::Error;
pub use self::provider::*;
pub use self::resolve::*;
pub use self::url::Url;

/// Result type for the resolver.
pub type Result<T, E = Error> = std::result::Result<T, E>;
