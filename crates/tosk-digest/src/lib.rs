//! Incremental SHA-1 digest engine.
//!
//! Wraps the RustCrypto `sha1` implementation — no custom cryptography.
//! The engine accumulates bytes across any number of [`process_block`]
//! calls and produces the same digest for byte-identical input regardless
//! of how it was chunked. Finalization consumes the engine, so feeding more
//! data after finalizing is a compile error rather than a runtime state.
//!
//! [`process_block`]: DigestEngine::process_block

pub mod engine;

pub use engine::{digest_bytes, digest_reader, DigestEngine, DigestWriter};
