use std::ops::Deref;
use std::sync::Arc;

use crate::error::HeapResult;

/// Opaque reference to a byte range held by an external heap.
///
/// A handle is `(issuing heap, slot, size)` — a logical address, not a
/// pointer. It is meaningful only relative to the [`ExtHeap`] instance that
/// issued it; presenting it to another instance fails with an
/// invalid-handle error. Handles carry no ownership: only the issuing heap
/// can free the storage behind one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Handle {
    heap: u64,
    slot: u64,
    size: u64,
}

impl Handle {
    /// Build a handle. For [`ExtHeap`] implementations only — a handle
    /// fabricated by anyone else will simply fail validation.
    pub fn new(heap: u64, slot: u64, size: u64) -> Self {
        Self { heap, slot, size }
    }

    /// Instance id of the heap that issued this handle.
    pub fn heap_id(&self) -> u64 {
        self.heap
    }

    /// Store-relative slot of the content.
    pub fn slot(&self) -> u64 {
        self.slot
    }

    /// Size in bytes of the span this handle addresses.
    pub fn size(&self) -> u64 {
        self.size
    }
}

/// A scoped, read-only lease over (part of) a handle's content.
///
/// The view pins its block for as long as it is held and releases the pin on
/// drop, on every exit path. A live view stays readable even if the handle is
/// freed concurrently; the handle itself becomes invalid either way.
#[derive(Clone, Debug)]
pub struct HeapView {
    block: Arc<Vec<u8>>,
    start: usize,
    len: usize,
}

impl HeapView {
    /// Build a view over `block[start..start + len]`. For [`ExtHeap`]
    /// implementations; callers obtain views through `read_view`.
    pub fn new(block: Arc<Vec<u8>>, start: usize, len: usize) -> Self {
        debug_assert!(start + len <= block.len());
        Self { block, start, len }
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.block[self.start..self.start + self.len]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl Deref for HeapView {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        self.as_slice()
    }
}

impl AsRef<[u8]> for HeapView {
    fn as_ref(&self) -> &[u8] {
        self.as_slice()
    }
}

/// An external, handle-addressed store.
///
/// Implementations must satisfy these invariants:
/// - `alloc(size)` reserves exactly `size` bytes and returns a handle scoped
///   to this instance.
/// - A handle presented to an instance that did not issue it, or used after
///   `free`, fails with an invalid-handle error — never silently succeeds.
/// - Views are scoped leases: the store may pin or map memory for the
///   duration of a view and reclaims it when the view is dropped.
/// - Partial views (`read_view_range`) let one allocated block back several
///   independently addressable sub-ranges.
/// - Implementations document their concurrency mode; nothing here implies
///   timeouts or retries.
pub trait ExtHeap {
    /// Reserve exactly `size` bytes and return a handle to them.
    fn alloc(&self, size: u64) -> HeapResult<Handle>;

    /// Copy `data` into the handle's span starting at `offset`.
    fn write(&self, handle: &Handle, offset: u64, data: &[u8]) -> HeapResult<()>;

    /// A read-only view over part of the handle's span.
    fn read_view_range(&self, handle: &Handle, offset: u64, len: u64) -> HeapResult<HeapView>;

    /// A read-only view over the handle's full span.
    fn read_view(&self, handle: &Handle) -> HeapResult<HeapView> {
        self.read_view_range(handle, 0, handle.size())
    }

    /// Invalidate the handle and reclaim its storage.
    fn free(&self, handle: &Handle) -> HeapResult<()>;

    /// Process-unique id of this instance; handles embed it.
    fn instance_id(&self) -> u64;
}
