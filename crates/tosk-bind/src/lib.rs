//! Serialization dispatch for the typed-object storage kernel.
//!
//! The binder translates between statically-typed values and the generic
//! [`CommonObject`] representation without the storage layer knowing the
//! concrete type:
//!
//! - [`WireWriter`] / [`WireReader`] — fixed-width big-endian codec over any
//!   `io` stream
//! - [`Bind`] — the per-type seam; implementing it by hand is the open
//!   extension point for custom layouts
//! - [`BindContext`] — threads the in-process and external heaps through a
//!   binding, so payload fields land in the external store while scratch
//!   stays cheap
//! - [`Serializer`] / [`Deserializer`] — type-erased adapters between a
//!   `CommonObject` and a byte stream
//! - [`ExtBlob`] — a payload field stored behind an external-heap handle
//!
//! Stream failures (truncation, malformed fields) are propagated, never
//! masked; the dispatch layer only adds the name of the type being bound.
//!
//! [`CommonObject`]: tosk_object::CommonObject

pub mod bind;
pub mod dispatch;
pub mod error;
pub mod wire;

pub use bind::{Bind, BindContext, ExtBlob};
pub use dispatch::{encode_object, CommonObjectExt, Deserializer, Serializer};
pub use error::{BindError, BindResult};
pub use wire::{WireReader, WireWriter};
