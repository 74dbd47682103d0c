use thiserror::Error;

/// Errors from heap and external-heap operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HeapError {
    /// Allocation could not be satisfied. Surfaced immediately, never retried.
    #[error("out of memory: allocation of {size} bytes (align {align}) failed")]
    OutOfMemory { size: usize, align: usize },

    /// The requested size/alignment pair does not form a valid layout.
    #[error("invalid layout: size {size}, align {align}")]
    InvalidLayout { size: usize, align: usize },

    /// A handle was presented to an external heap that did not issue it.
    #[error("foreign handle: issued by heap {issued_by}, presented to heap {presented_to}")]
    ForeignHandle { issued_by: u64, presented_to: u64 },

    /// A handle was used after `free`, or never existed on this heap.
    #[error("freed or unknown handle: slot {slot}")]
    FreedHandle { slot: u64 },

    /// A view or write range falls outside the handle's span.
    #[error("range out of bounds: offset {offset} + len {len} exceeds handle size {size}")]
    RangeOutOfBounds { offset: u64, len: u64, size: u64 },
}

impl HeapError {
    /// Returns `true` for every form of invalid-handle failure: foreign,
    /// freed, or out-of-range use.
    pub fn is_invalid_handle(&self) -> bool {
        matches!(
            self,
            Self::ForeignHandle { .. } | Self::FreedHandle { .. } | Self::RangeOutOfBounds { .. }
        )
    }
}

/// Result alias for heap operations.
pub type HeapResult<T> = Result<T, HeapError>;
