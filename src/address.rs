//! # Address Codec
//!
//! Substrate identities are 32-byte public keys (or shorter account indices)
//! rendered as SS58 text: base58 over a network prefix, the key bytes and a
//! short `blake2b` checksum.
//!
//! See <https://docs.substrate.io/reference/address-formats/>.

use blake2::{Blake2b512, Digest};

use crate::error::Error;

/// Generic Substrate network prefix.
pub const DEFAULT_PREFIX: u16 = 42;

const CHECKSUM_PREFIX: &[u8] = b"SS58PRE";

// Payload sizes an SS58 address can carry.
const ALLOWED_LENGTHS: [usize; 6] = [1, 2, 4, 8, 32, 33];

/// Conversion between textual chain addresses and raw identifier bytes.
pub trait AddressCodec {
    /// Decode a textual address into its identifier bytes.
    ///
    /// # Errors
    /// Returns an error if the text is neither `0x` hex nor a well-formed
    /// address.
    fn decode(&self, text: &str) -> crate::Result<Vec<u8>>;

    /// Encode identifier bytes as a textual address.
    ///
    /// # Errors
    /// Returns an error if the byte length cannot be carried by an address.
    fn encode(&self, bytes: &[u8]) -> crate::Result<String>;

    /// Whether `text` is a well-formed chain identifier. Never fails.
    fn is_valid(&self, text: &str) -> bool {
        self.decode(text).and_then(|bytes| self.encode(&bytes)).is_ok()
    }

    /// Whether raw `bytes` can be rendered as a chain identifier.
    fn is_valid_bytes(&self, bytes: &[u8]) -> bool {
        self.encode(bytes).is_ok()
    }
}

/// SS58 address codec for a single network prefix.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ss58Codec {
    prefix: u16,
}

impl Default for Ss58Codec {
    fn default() -> Self {
        Self::new(DEFAULT_PREFIX)
    }
}

impl Ss58Codec {
    /// Create a codec that encodes with the given network prefix. Decoding
    /// accepts addresses for any network.
    #[must_use]
    pub const fn new(prefix: u16) -> Self {
        Self { prefix }
    }

    fn prefix_bytes(&self) -> crate::Result<Vec<u8>> {
        let prefix = self.prefix;
        match prefix {
            46 | 47 => Err(Error::InvalidAddress(format!("network prefix {prefix} is reserved"))),
            0..=63 => Ok(vec![prefix as u8]),
            64..=16_383 => {
                let first = ((prefix & 0b0000_0000_1111_1100) >> 2) as u8 | 0b0100_0000;
                let second =
                    ((prefix >> 8) as u8) | (((prefix & 0b0000_0000_0000_0011) << 6) as u8);
                Ok(vec![first, second])
            }
            _ => Err(Error::InvalidAddress(format!("network prefix {prefix} is out of range"))),
        }
    }
}

impl AddressCodec for Ss58Codec {
    fn decode(&self, text: &str) -> crate::Result<Vec<u8>> {
        if let Some(hex_str) = text.strip_prefix("0x") {
            return Ok(hex::decode(hex_str)?);
        }

        let decoded = bs58::decode(text).into_vec()?;
        let Some(&first) = decoded.first() else {
            return Err(Error::InvalidAddress("empty address".into()));
        };
        if first & 0b1000_0000 != 0 || matches!(first, 46 | 47) {
            return Err(Error::InvalidAddress(format!("{text} has a reserved network prefix")));
        }

        let prefix_len = if first & 0b0100_0000 == 0 { 1 } else { 2 };
        let payload_len = decoded.len().saturating_sub(prefix_len);
        let checksum_len = if matches!(payload_len, 34 | 35) { 2 } else { 1 };
        if decoded.len() < prefix_len + checksum_len + 1 {
            return Err(Error::InvalidAddress(format!("{text} is too short")));
        }

        let body_len = decoded.len() - checksum_len;
        let hash = checksum(&decoded[..body_len]);
        if decoded[body_len..] != hash[..checksum_len] {
            return Err(Error::InvalidAddress(format!("{text} has an invalid checksum")));
        }

        Ok(decoded[prefix_len..body_len].to_vec())
    }

    fn encode(&self, bytes: &[u8]) -> crate::Result<String> {
        if !ALLOWED_LENGTHS.contains(&bytes.len()) {
            return Err(Error::InvalidAddress(format!(
                "{} bytes cannot be encoded as an address",
                bytes.len()
            )));
        }

        let mut data = self.prefix_bytes()?;
        data.extend_from_slice(bytes);
        let checksum_len = if matches!(bytes.len(), 32 | 33) { 2 } else { 1 };
        let hash = checksum(&data);
        data.extend_from_slice(&hash[..checksum_len]);

        Ok(bs58::encode(data).into_string())
    }
}

fn checksum(data: &[u8]) -> Vec<u8> {
    let mut hasher = Blake2b512::new();
    hasher.update(CHECKSUM_PREFIX);
    hasher.update(data);
    hasher.finalize().to_vec()
}
