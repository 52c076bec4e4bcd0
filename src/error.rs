//! # Errors
//!
//! Errors returned by the resolver. Problems with the DID being resolved are
//! reported inside a [`crate::Resolved`] value; the variants here cover
//! failures the caller has to handle, such as an unreachable chain node.

use thiserror::Error;

use crate::resolve::ErrorCode;

/// Errors raised while parsing, decoding, or resolving a DID.
#[derive(Error, Debug)]
pub enum Error {
    /// The DID URL could not be parsed, or the resource it points to does not
    /// exist.
    #[error("invalid DID URL: {0}")]
    InvalidDidUrl(String),

    /// The DID method is not the one served by this resolver.
    #[error("method not supported: {0}")]
    MethodNotSupported(String),

    /// The text or bytes are not a valid SS58 address.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// A chain query failed. Retrying is left to the caller.
    #[error(transparent)]
    Chain(#[from] anyhow::Error),
}

impl Error {
    /// Resolution error code corresponding to the error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidDidUrl(_) | Self::InvalidAddress(_) => ErrorCode::InvalidDid,
            Self::MethodNotSupported(_) => ErrorCode::MethodNotSupported,
            // the chain could not be read, not a confirmed absence; callers
            // wanting to retry should match on `Error::Chain`
            Self::Chain(_) => ErrorCode::NotFound,
        }
    }

    /// Human-readable message, without the error code prefix.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::InvalidDidUrl(msg)
            | Self::MethodNotSupported(msg)
            | Self::InvalidAddress(msg) => msg.clone(),
            Self::Chain(err) => err.to_string(),
        }
    }
}

impl From<bs58::decode::Error> for Error {
    fn from(err: bs58::decode::Error) -> Self {
        Self::InvalidAddress(err.to_string())
    }
}

impl From<hex::FromHexError> for Error {
    fn from(err: hex::FromHexError) -> Self {
        Self::InvalidAddress(err.to_string())
    }
}
