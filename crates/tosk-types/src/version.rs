use std::fmt;

use serde::{Deserialize, Serialize};

use crate::digest::{Sha1Digest, DIGEST_BYTES};
use crate::error::TypeError;

/// Protocol version stamped into every [`VersionType`] produced by this
/// kernel.
pub const PROTOCOL_VERSION: u32 = 1;

/// Encoded size of a [`VersionType`]: two `u32` fields plus two digests.
pub const VERSION_TYPE_BYTES: usize = 8 + 2 * DIGEST_BYTES;

/// Wire tag identifying the digest algorithm behind a version identity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AlgorithmTag {
    /// SHA-1, 160-bit.
    Sha1,
}

impl AlgorithmTag {
    /// Fixed-width wire value of the tag.
    pub fn as_u32(&self) -> u32 {
        match self {
            Self::Sha1 => 1,
        }
    }

    /// Parse a wire value back into a tag.
    pub fn from_u32(value: u32) -> Result<Self, TypeError> {
        match value {
            1 => Ok(Self::Sha1),
            other => Err(TypeError::UnknownAlgorithm(other)),
        }
    }
}

impl fmt::Display for AlgorithmTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sha1 => write!(f, "sha1"),
        }
    }
}

/// A content-addressed identity.
///
/// `id` is the primary content digest. `conflict` distinguishes otherwise
/// identical identities that arose from different histories; the kernel
/// never computes it — it is opaque caller-supplied payload that is only
/// stored and compared.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VersionType {
    /// Protocol version under which this identity was produced.
    pub protocol: u32,
    /// Digest algorithm that produced `id`.
    pub algorithm: AlgorithmTag,
    /// Primary content digest.
    pub id: Sha1Digest,
    /// Caller-supplied conflict disambiguator. Zero when unset.
    pub conflict: Sha1Digest,
}

impl VersionType {
    /// Wrap a content digest with the current protocol and algorithm.
    pub fn new(id: Sha1Digest) -> Self {
        Self {
            protocol: PROTOCOL_VERSION,
            algorithm: AlgorithmTag::Sha1,
            id,
            conflict: Sha1Digest::zero(),
        }
    }

    /// Replace the conflict disambiguator.
    pub fn with_conflict(mut self, conflict: Sha1Digest) -> Self {
        self.conflict = conflict;
        self
    }

    /// Encode as four fixed-width fields in the order
    /// `{protocol, algorithm, id, conflict}`.
    pub fn encode(&self) -> [u8; VERSION_TYPE_BYTES] {
        let mut out = [0u8; VERSION_TYPE_BYTES];
        out[0..4].copy_from_slice(&self.protocol.to_be_bytes());
        out[4..8].copy_from_slice(&self.algorithm.as_u32().to_be_bytes());
        out[8..8 + DIGEST_BYTES].copy_from_slice(&self.id.to_bytes());
        out[8 + DIGEST_BYTES..].copy_from_slice(&self.conflict.to_bytes());
        out
    }

    /// Decode the fixed-width form. Exact inverse of [`VersionType::encode`].
    pub fn decode(bytes: &[u8]) -> Result<Self, TypeError> {
        if bytes.len() != VERSION_TYPE_BYTES {
            return Err(TypeError::InvalidLength {
                expected: VERSION_TYPE_BYTES,
                actual: bytes.len(),
            });
        }
        let protocol = u32::from_be_bytes(bytes[0..4].try_into().expect("fixed slice"));
        let algorithm =
            AlgorithmTag::from_u32(u32::from_be_bytes(bytes[4..8].try_into().expect("fixed slice")))?;
        let mut id = [0u8; DIGEST_BYTES];
        id.copy_from_slice(&bytes[8..8 + DIGEST_BYTES]);
        let mut conflict = [0u8; DIGEST_BYTES];
        conflict.copy_from_slice(&bytes[8 + DIGEST_BYTES..]);
        Ok(Self {
            protocol,
            algorithm,
            id: Sha1Digest::from_bytes(id),
            conflict: Sha1Digest::from_bytes(conflict),
        })
    }
}

impl fmt::Display for VersionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}:{}:{}", self.protocol, self.algorithm, self.id)
    }
}
