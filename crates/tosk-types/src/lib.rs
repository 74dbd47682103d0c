//! Foundation types for the typed-object storage kernel (TOSK).
//!
//! This crate provides the value types shared by every other TOSK crate:
//!
//! - [`Sha1Digest`] — fixed-width content fingerprint with a canonical hex form
//! - [`AlgorithmTag`] — wire tag identifying the digest algorithm
//! - [`VersionType`] — structured content-addressed identity
//!
//! Nothing here computes hashes; the incremental engine lives in
//! `tosk-digest`. These are pure value types with exact binary and string
//! round-trips.

pub mod digest;
pub mod error;
pub mod version;

pub use digest::Sha1Digest;
pub use error::TypeError;
pub use version::{AlgorithmTag, VersionType, PROTOCOL_VERSION};
