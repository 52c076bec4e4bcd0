//! Destructure DID URLs into their components.
//!
//! A DID URL handled here is of the form
//!
//! `did:<method>:<method-specific-id>[#<fragment>]`.

use std::fmt::Display;
use std::str::FromStr;

use crate::error::Error;

/// Structure of a DID URL.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Url {
    /// DID method.
    pub method: String,

    /// Method-specific ID. For `did:substrate` this is the chain address of
    /// the identity.
    pub id: String,

    /// Fragment.
    ///
    /// If present, identifies a verification method or service within the
    /// DID document.
    pub fragment: Option<String>,
}

impl Url {
    /// The DID part of the URL, without the fragment.
    #[must_use]
    pub fn did(&self) -> String {
        format!("did:{}:{}", self.method, self.id)
    }
}

impl Display for Url {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "did:{}:{}", self.method, self.id)?;
        if let Some(fragment) = &self.fragment {
            write!(f, "#{fragment}")?;
        }
        Ok(())
    }
}

impl FromStr for Url {
    type Err = Error;

    /// Parse a string into a DID URL.
    ///
    /// # Errors
    /// If the string does not start with `did:` or is missing the method or
    /// method-specific ID, an error is returned.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (did, fragment) = match s.split_once('#') {
            Some((did, fragment)) => (did, Some(fragment.to_string())),
            None => (s, None),
        };

        let parts = did.splitn(3, ':').collect::<Vec<_>>();
        if parts.len() < 3 {
            return Err(Error::InvalidDidUrl(format!("{s} is not a DID URL")));
        }
        if parts[0] != "did" {
            return Err(Error::InvalidDidUrl(format!("{s} does not start with 'did'")));
        }
        if parts[1].is_empty() || parts[2].is_empty() {
            return Err(Error::InvalidDidUrl(format!("{s} has no method or identifier")));
        }

        Ok(Self {
            method: parts[1].to_string(),
            id: parts[2].to_string(),
            fragment,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn did_only() {
        let url = Url::from_str("did:substrate:5GrwvaEF5zXb26Fz9rcQpDWS57CtERHpNehXCPcNoHGKutQY")
            .expect("should parse");
        assert_eq!(url.method, "substrate");
        assert_eq!(url.id, "5GrwvaEF5zXb26Fz9rcQpDWS57CtERHpNehXCPcNoHGKutQY");
        assert_eq!(url.fragment, None);
    }

    #[test]
    fn with_fragment() {
        let s = "did:substrate:5GrwvaEF5zXb26Fz9rcQpDWS57CtERHpNehXCPcNoHGKutQY#delegate-1";
        let url = Url::from_str(s).expect("should parse");
        assert_eq!(url.fragment.as_deref(), Some("delegate-1"));
        assert_eq!(url.did(), "did:substrate:5GrwvaEF5zXb26Fz9rcQpDWS57CtERHpNehXCPcNoHGKutQY");
        assert_eq!(url.to_string(), s);
    }

    #[test]
    fn malformed() {
        assert!(Url::from_str("substrate:abc").is_err());
        assert!(Url::from_str("dod:substrate:abc").is_err());
        assert!(Url::from_str("did:substrate:").is_err());
        assert!(Url::from_str("did::abc").is_err());
    }
}
