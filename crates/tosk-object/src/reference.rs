use tosk_registry::TypeId;

use crate::error::{ObjectError, ObjectResult};
use crate::object::CommonObject;

/// A possibly-empty reference to a [`CommonObject`].
///
/// Default-constructed references are invalid; [`Reference::valid`] reports
/// whether the wrapped object is bound to storage at all.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Reference {
    object: Option<CommonObject>,
}

impl Reference {
    /// A reference bound to `object`.
    pub fn new(object: CommonObject) -> Self {
        Self {
            object: Some(object),
        }
    }

    /// An empty, invalid reference.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether this reference is bound to an object.
    pub fn valid(&self) -> bool {
        self.object.is_some()
    }

    /// The bound object, or [`ObjectError::Unbound`].
    pub fn object(&self) -> ObjectResult<&CommonObject> {
        self.object.as_ref().ok_or(ObjectError::Unbound)
    }

    /// Take the object out, leaving the reference invalid.
    pub fn take(&mut self) -> Option<CommonObject> {
        self.object.take()
    }
}

impl From<CommonObject> for Reference {
    fn from(object: CommonObject) -> Self {
        Self::new(object)
    }
}

/// A reference that additionally asserts the type of the object it wraps.
///
/// The checked constructor verifies `object.type_id() == asserted` — a
/// single id compare — and fails with [`ObjectError::TypeMismatch`]
/// otherwise. [`TypedReference::new_unchecked`] skips the compare for
/// callers that have already established the invariant; constructing an
/// unchecked reference with a mismatched type is a contract violation, and
/// every later interpretation of the bytes is the caller's fault.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypedReference {
    object: CommonObject,
    type_id: TypeId,
}

impl TypedReference {
    /// Bind `object` asserting it has type `asserted`, checking the
    /// assertion.
    pub fn new(object: CommonObject, asserted: TypeId) -> ObjectResult<Self> {
        if object.type_id() != asserted {
            return Err(ObjectError::TypeMismatch {
                asserted,
                actual: object.type_id(),
            });
        }
        Ok(Self {
            object,
            type_id: asserted,
        })
    }

    /// Bind `object` asserting it has type `asserted`, without checking.
    ///
    /// Caller contract: `object.type_id() == asserted` must already hold.
    /// This is the pay-no-cost-if-unused path; prefer
    /// [`TypedReference::new`].
    pub fn new_unchecked(object: CommonObject, asserted: TypeId) -> Self {
        Self {
            object,
            type_id: asserted,
        }
    }

    /// The asserted type.
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn object(&self) -> &CommonObject {
        &self.object
    }

    pub fn into_object(self) -> CommonObject {
        self.object
    }
}
