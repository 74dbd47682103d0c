use thiserror::Error;
use tosk_heap::HeapError;
use tosk_object::ObjectError;

/// Errors from binding and wire codec operations.
#[derive(Debug, Error)]
pub enum BindError {
    /// The underlying byte stream failed (truncated input, broken pipe).
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A length-prefixed field does not fit in memory on this platform.
    #[error("field length {0} exceeds addressable size")]
    LengthOverflow(u64),

    /// A string field held invalid UTF-8.
    #[error("invalid UTF-8 in string field")]
    InvalidUtf8,

    /// A boolean field held something other than 0 or 1.
    #[error("invalid boolean byte: {0:#04x}")]
    InvalidBool(u8),

    /// An external payload operation failed.
    #[error(transparent)]
    Heap(#[from] HeapError),

    /// Reading an object's raw bytes failed.
    #[error(transparent)]
    Object(#[from] ObjectError),

    /// A lower-level failure, annotated with the type being bound.
    #[error("while binding {type_name}: {source}")]
    Context {
        type_name: &'static str,
        #[source]
        source: Box<BindError>,
    },
}

impl BindError {
    /// Wrap this error with the name of the type whose binding raised it.
    /// Applied once per dispatch; context is additive, never masking.
    pub fn in_type(self, type_name: &'static str) -> Self {
        Self::Context {
            type_name,
            source: Box::new(self),
        }
    }
}

/// Result alias for binding operations.
pub type BindResult<T> = Result<T, BindError>;
