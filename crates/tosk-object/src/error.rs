use thiserror::Error;
use tosk_heap::HeapError;
use tosk_registry::TypeId;

/// Errors from object and reference operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ObjectError {
    /// A typed reference's asserted type does not match the object's actual
    /// type. This is a contract violation by the caller, not an I/O
    /// condition; it is never retried.
    #[error("type mismatch: asserted {asserted:?}, object is {actual:?}")]
    TypeMismatch { asserted: TypeId, actual: TypeId },

    /// The reference is not bound to any object.
    #[error("reference is not bound to an object")]
    Unbound,

    /// Reading externally stored bytes failed.
    #[error(transparent)]
    Heap(#[from] HeapError),
}

/// Result alias for object operations.
pub type ObjectResult<T> = Result<T, ObjectError>;
