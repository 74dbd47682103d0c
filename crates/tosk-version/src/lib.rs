//! Content-addressed versioning.
//!
//! Derives a [`VersionType`] identity from either a byte stream
//! ([`version_of_archive`]) or a bound value ([`version_of_object`]). The
//! object path streams the serialized form straight into the digest engine;
//! no intermediate buffer is materialized.
//!
//! The `conflict` field of a produced identity is always zero: it is an
//! opaque, caller-supplied disambiguator for values that legitimately hash
//! alike, and the kernel only stores and compares it.
//!
//! [`VersionType`]: tosk_types::VersionType

pub mod error;
pub mod version;

pub use error::{VersionError, VersionResult};
pub use version::{version_of_archive, version_of_object};
