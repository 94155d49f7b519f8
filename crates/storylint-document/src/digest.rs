//! Content digests for loaded documents.
//!
//! Every story and referenced document gets a BLAKE3 digest of its raw
//! bytes at load time. Digests key the parse cache and let reports state
//! exactly which revision of a file was validated.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// BLAKE3 digest of a document's raw bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourceDigest([u8; 32]);

impl SourceDigest {
    /// Computes the digest of the given bytes.
    #[must_use]
    pub fn compute(bytes: &[u8]) -> Self {
        Self(*blake3::hash(bytes).as_bytes())
    }

    /// Returns the raw digest bytes.
    #[inline]
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Returns the full lowercase hex encoding.
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Returns an abbreviated hex form suitable for log lines and reports.
    #[must_use]
    pub fn short(&self) -> String {
        hex::encode(&self.0[..6])
    }
}

impl fmt::Display for SourceDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Error parsing a [`SourceDigest`] from hex text.
#[derive(Debug, Error)]
pub enum DigestParseError {
    /// The input was not valid hex.
    #[error("invalid hex in digest: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    /// The decoded input was not 32 bytes long.
    #[error("digest must be 32 bytes, got {0}")]
    InvalidLength(usize),
}

impl FromStr for SourceDigest {
    type Err = DigestParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s)?;
        let array: [u8; 32] = bytes
            .try_into()
            .map_err(|b: Vec<u8>| DigestParseError::InvalidLength(b.len()))?;
        Ok(Self(array))
    }
}

impl Serialize for SourceDigest {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for SourceDigest {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}
