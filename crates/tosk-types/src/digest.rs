use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Number of 32-bit words in a SHA-1 digest.
pub const DIGEST_WORDS: usize = 5;

/// Number of bytes in a SHA-1 digest.
pub const DIGEST_BYTES: usize = 20;

/// A 160-bit SHA-1 digest, stored as five ordered 32-bit words.
///
/// Equality is byte-wise. The canonical string form is 40 lowercase hex
/// characters, and `from_hex` is the exact inverse of `to_hex`. The raw
/// binary form is the big-endian word sequence with no length prefix —
/// fixed width is the implicit framing.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Sha1Digest([u32; DIGEST_WORDS]);

impl Sha1Digest {
    /// Build a digest from its five words.
    pub const fn from_words(words: [u32; DIGEST_WORDS]) -> Self {
        Self(words)
    }

    /// The zero digest (all words zero). Represents "no digest".
    pub const fn zero() -> Self {
        Self([0; DIGEST_WORDS])
    }

    /// Returns `true` if every word is zero.
    pub fn is_zero(&self) -> bool {
        self.0 == [0; DIGEST_WORDS]
    }

    /// The ordered words of the digest.
    pub fn as_words(&self) -> &[u32; DIGEST_WORDS] {
        &self.0
    }

    /// Raw 20-byte big-endian form.
    pub fn to_bytes(&self) -> [u8; DIGEST_BYTES] {
        let mut out = [0u8; DIGEST_BYTES];
        for (i, word) in self.0.iter().enumerate() {
            out[i * 4..(i + 1) * 4].copy_from_slice(&word.to_be_bytes());
        }
        out
    }

    /// Rebuild from the raw 20-byte big-endian form.
    pub fn from_bytes(bytes: [u8; DIGEST_BYTES]) -> Self {
        let mut words = [0u32; DIGEST_WORDS];
        for (i, word) in words.iter_mut().enumerate() {
            let mut buf = [0u8; 4];
            buf.copy_from_slice(&bytes[i * 4..(i + 1) * 4]);
            *word = u32::from_be_bytes(buf);
        }
        Self(words)
    }

    /// Canonical lowercase hex representation (40 characters).
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    /// Short hex representation (first 8 characters).
    pub fn short_hex(&self) -> String {
        hex::encode(&self.to_bytes()[..4])
    }

    /// Parse the canonical hex form. Exact inverse of [`Sha1Digest::to_hex`].
    pub fn from_hex(s: &str) -> Result<Self, TypeError> {
        let bytes = hex::decode(s).map_err(|e| TypeError::InvalidHex(e.to_string()))?;
        if bytes.len() != DIGEST_BYTES {
            return Err(TypeError::InvalidLength {
                expected: DIGEST_BYTES,
                actual: bytes.len(),
            });
        }
        let mut arr = [0u8; DIGEST_BYTES];
        arr.copy_from_slice(&bytes);
        Ok(Self::from_bytes(arr))
    }
}

impl fmt::Debug for Sha1Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Sha1Digest({})", self.short_hex())
    }
}

impl fmt::Display for Sha1Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl From<[u32; DIGEST_WORDS]> for Sha1Digest {
    fn from(words: [u32; DIGEST_WORDS]) -> Self {
        Self(words)
    }
}
