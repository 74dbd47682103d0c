use std::alloc::Layout;
use std::ptr::NonNull;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::{HeapError, HeapResult};
use crate::next_instance_id;

/// Identity of a heap, used for identity (not value) equality.
///
/// Two heap references denote the same allocator when their identities are
/// equal. Kind-tagged heaps (like [`SystemHeap`]) compare equal across every
/// instance of the same kind; instance-tagged heaps compare equal only to
/// themselves. This replaces polymorphic type introspection with an explicit
/// tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HeapIdentity {
    /// All instances of this concrete implementation are interchangeable.
    Kind(&'static str),
    /// This instance only.
    Instance(u64),
}

/// An in-process allocator.
///
/// Implementations must satisfy these invariants:
/// - `allocate` never hands back an invalid block silently; it fails with
///   [`HeapError::OutOfMemory`] when the request cannot be satisfied.
/// - `release` is safe given the exact `(block, size, align)` triple used at
///   allocation; a mismatched triple is caller error (undefined behavior by
///   contract, not runtime-checked).
/// - Identity equality decides whether two abstract references denote the
///   same allocator, which callers use to decide whether a cross-heap copy
///   is needed.
pub trait Heap {
    /// Allocate `size` bytes with the given alignment.
    fn allocate(&self, size: usize, align: usize) -> HeapResult<NonNull<u8>>;

    /// Release a block previously returned by [`Heap::allocate`].
    ///
    /// # Safety
    ///
    /// `block` must have been returned by `allocate` on this same heap with
    /// this exact `size` and `align`, and must not be used afterwards.
    unsafe fn release(&self, block: NonNull<u8>, size: usize, align: usize);

    /// The identity tag of this heap.
    fn identity(&self) -> HeapIdentity;

    /// Whether `other` denotes the same concrete allocator as `self`.
    fn identity_equal(&self, other: &dyn Heap) -> bool {
        self.identity() == other.identity()
    }

    /// The heap this one decorates, if any.
    fn underlying(&self) -> Option<&dyn Heap> {
        None
    }
}

/// The default in-process heap: forwards to the platform allocator.
///
/// Every `SystemHeap` reports equal to every other, regardless of how it was
/// constructed — the platform allocator is a single shared resource, so this
/// is an identity statement, not a value comparison.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemHeap;

impl SystemHeap {
    pub const fn new() -> Self {
        Self
    }
}

impl Heap for SystemHeap {
    fn allocate(&self, size: usize, align: usize) -> HeapResult<NonNull<u8>> {
        let layout = Layout::from_size_align(size, align)
            .map_err(|_| HeapError::InvalidLayout { size, align })?;
        if size == 0 {
            // Zero-sized requests get a well-aligned dangling pointer; the
            // platform allocator must not see a zero-sized layout.
            return Ok(unsafe { NonNull::new_unchecked(align as *mut u8) });
        }
        let ptr = unsafe { std::alloc::alloc(layout) };
        NonNull::new(ptr).ok_or(HeapError::OutOfMemory { size, align })
    }

    unsafe fn release(&self, block: NonNull<u8>, size: usize, align: usize) {
        if size == 0 {
            return;
        }
        let layout = Layout::from_size_align_unchecked(size, align);
        std::alloc::dealloc(block.as_ptr(), layout);
    }

    fn identity(&self) -> HeapIdentity {
        HeapIdentity::Kind("system")
    }
}

/// A decorating heap that counts allocations and exposes the heap it wraps.
///
/// Unlike [`SystemHeap`], each `TrackingHeap` has its own identity: two
/// trackers over the same inner heap are distinct allocators as far as
/// identity equality is concerned.
#[derive(Debug)]
pub struct TrackingHeap<H: Heap> {
    inner: H,
    id: u64,
    live_bytes: AtomicU64,
    allocations: AtomicU64,
}

impl<H: Heap> TrackingHeap<H> {
    /// Wrap `inner` with a fresh instance identity.
    pub fn new(inner: H) -> Self {
        Self {
            inner,
            id: next_instance_id(),
            live_bytes: AtomicU64::new(0),
            allocations: AtomicU64::new(0),
        }
    }

    /// Bytes currently allocated through this tracker.
    pub fn live_bytes(&self) -> u64 {
        self.live_bytes.load(Ordering::Relaxed)
    }

    /// Total number of allocations made through this tracker.
    pub fn allocations(&self) -> u64 {
        self.allocations.load(Ordering::Relaxed)
    }
}

impl<H: Heap> Heap for TrackingHeap<H> {
    fn allocate(&self, size: usize, align: usize) -> HeapResult<NonNull<u8>> {
        let block = self.inner.allocate(size, align)?;
        self.live_bytes.fetch_add(size as u64, Ordering::Relaxed);
        self.allocations.fetch_add(1, Ordering::Relaxed);
        Ok(block)
    }

    unsafe fn release(&self, block: NonNull<u8>, size: usize, align: usize) {
        self.inner.release(block, size, align);
        self.live_bytes.fetch_sub(size as u64, Ordering::Relaxed);
    }

    fn identity(&self) -> HeapIdentity {
        HeapIdentity::Instance(self.id)
    }

    fn underlying(&self) -> Option<&dyn Heap> {
        Some(&self.inner)
    }
}

/// A scratch byte buffer owned by a [`Heap`] allocation.
///
/// The block is zero-filled on creation and released when the buffer is
/// dropped, on every exit path. This is the safe face of the raw
/// allocate/release pair for transient bookkeeping.
pub struct HeapBuf<'h> {
    heap: &'h dyn Heap,
    block: NonNull<u8>,
    len: usize,
}

impl<'h> HeapBuf<'h> {
    /// Allocate a zero-filled scratch buffer of `len` bytes from `heap`.
    pub fn new(heap: &'h dyn Heap, len: usize) -> HeapResult<Self> {
        let block = heap.allocate(len, 1)?;
        if len > 0 {
            unsafe { std::ptr::write_bytes(block.as_ptr(), 0, len) };
        }
        Ok(Self { heap, block, len })
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn as_slice(&self) -> &[u8] {
        if self.len == 0 {
            return &[];
        }
        unsafe { std::slice::from_raw_parts(self.block.as_ptr(), self.len) }
    }

    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        if self.len == 0 {
            return &mut [];
        }
        unsafe { std::slice::from_raw_parts_mut(self.block.as_ptr(), self.len) }
    }
}

impl Drop for HeapBuf<'_> {
    fn drop(&mut self) {
        unsafe { self.heap.release(self.block, self.len, 1) };
    }
}

impl std::fmt::Debug for HeapBuf<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeapBuf").field("len", &self.len).finish()
    }
}
