//! Type-erased object and reference model.
//!
//! A [`CommonObject`] is an opaque carrier for a value of some registered
//! type: the type's id plus the value's stored bytes, which live either
//! inline (in-process heap) or behind an external-heap [`Handle`]. The
//! object does not prove its own type is correct; establishing that is the
//! caller's job, and [`TypedReference`] is where it happens.
//!
//! [`Handle`]: tosk_heap::Handle

pub mod error;
pub mod object;
pub mod reference;

pub use error::{ObjectError, ObjectResult};
pub use object::{CommonObject, ObjectStorage, RawBytes};
pub use reference::{Reference, TypedReference};
