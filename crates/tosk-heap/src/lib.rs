//! Storage abstractions for the typed-object storage kernel.
//!
//! Two kinds of "heap" live here:
//!
//! - [`Heap`] — an in-process allocator. The default [`SystemHeap`] forwards
//!   to the platform allocator; [`TrackingHeap`] decorates another heap and
//!   exposes it through [`Heap::underlying`].
//! - [`ExtHeap`] — an external, handle-addressed store. Content is addressed
//!   by an opaque [`Handle`] rather than by pointer, so the backing store may
//!   relocate it (compaction, mapping, archival) without breaking references.
//!
//! # Design Rules
//!
//! 1. Heap equality is identity, not value: two references are equal only if
//!    they denote the same concrete allocator (see [`HeapIdentity`]).
//! 2. A handle is meaningful only relative to the `ExtHeap` instance that
//!    issued it; presenting it elsewhere fails, never silently succeeds.
//! 3. Read access to external content is a scoped lease ([`HeapView`])
//!    released on drop, on every exit path.
//! 4. No operation retries internally; allocation failure and handle misuse
//!    surface immediately.

pub mod error;
pub mod ext;
pub mod heap;
pub mod memory;

pub use error::{HeapError, HeapResult};
pub use ext::{ExtHeap, Handle, HeapView};
pub use heap::{Heap, HeapBuf, HeapIdentity, SystemHeap, TrackingHeap};
pub use memory::InMemoryExtHeap;

use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_INSTANCE_ID: AtomicU64 = AtomicU64::new(1);

/// Issue a process-unique heap instance id.
///
/// Used by every heap implementation whose identity is per-instance rather
/// than per-kind.
pub fn next_instance_id() -> u64 {
    NEXT_INSTANCE_ID.fetch_add(1, Ordering::Relaxed)
}
