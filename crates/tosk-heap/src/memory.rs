//! In-memory external heap for tests and embedding.
//!
//! [`InMemoryExtHeap`] keeps every block in a `HashMap` behind a `RwLock`.
//! It implements the full [`ExtHeap`] contract, including per-instance
//! handle scoping, and is safe for concurrent callers: `alloc`, `write`,
//! `read_view`, and `free` all take the lock internally.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use tracing::debug;

use crate::error::{HeapError, HeapResult};
use crate::ext::{ExtHeap, Handle, HeapView};
use crate::next_instance_id;

/// An in-memory implementation of [`ExtHeap`].
///
/// Blocks live in `Arc`s so a [`HeapView`] stays readable for its whole
/// scope even if the handle is freed underneath it. Writes copy-on-write
/// when a view is live, so a reader never observes a mutation mid-view.
pub struct InMemoryExtHeap {
    id: u64,
    blocks: RwLock<HashMap<u64, Arc<Vec<u8>>>>,
    next_slot: AtomicU64,
}

impl InMemoryExtHeap {
    /// Create a new empty external heap with a fresh instance id.
    pub fn new() -> Self {
        Self {
            id: next_instance_id(),
            blocks: RwLock::new(HashMap::new()),
            next_slot: AtomicU64::new(1),
        }
    }

    /// Number of live blocks.
    pub fn len(&self) -> usize {
        self.blocks.read().expect("lock poisoned").len()
    }

    /// Returns `true` if no blocks are allocated.
    pub fn is_empty(&self) -> bool {
        self.blocks.read().expect("lock poisoned").is_empty()
    }

    /// Total bytes across all live blocks.
    pub fn total_bytes(&self) -> u64 {
        self.blocks
            .read()
            .expect("lock poisoned")
            .values()
            .map(|block| block.len() as u64)
            .sum()
    }

    /// Reject handles this instance did not issue.
    fn check_owned(&self, handle: &Handle) -> HeapResult<()> {
        if handle.heap_id() != self.id {
            return Err(HeapError::ForeignHandle {
                issued_by: handle.heap_id(),
                presented_to: self.id,
            });
        }
        Ok(())
    }

    fn check_range(handle: &Handle, offset: u64, len: u64) -> HeapResult<()> {
        if offset.checked_add(len).map_or(true, |end| end > handle.size()) {
            return Err(HeapError::RangeOutOfBounds {
                offset,
                len,
                size: handle.size(),
            });
        }
        Ok(())
    }
}

impl Default for InMemoryExtHeap {
    fn default() -> Self {
        Self::new()
    }
}

impl ExtHeap for InMemoryExtHeap {
    fn alloc(&self, size: u64) -> HeapResult<Handle> {
        let capacity = usize::try_from(size).map_err(|_| HeapError::OutOfMemory {
            size: usize::MAX,
            align: 1,
        })?;
        let slot = self.next_slot.fetch_add(1, Ordering::Relaxed);
        let mut blocks = self.blocks.write().expect("lock poisoned");
        blocks.insert(slot, Arc::new(vec![0u8; capacity]));
        debug!(slot, size, "ext heap alloc");
        Ok(Handle::new(self.id, slot, size))
    }

    fn write(&self, handle: &Handle, offset: u64, data: &[u8]) -> HeapResult<()> {
        self.check_owned(handle)?;
        Self::check_range(handle, offset, data.len() as u64)?;
        let mut blocks = self.blocks.write().expect("lock poisoned");
        let block = blocks
            .get_mut(&handle.slot())
            .ok_or(HeapError::FreedHandle {
                slot: handle.slot(),
            })?;
        let start = offset as usize;
        Arc::make_mut(block)[start..start + data.len()].copy_from_slice(data);
        Ok(())
    }

    fn read_view_range(&self, handle: &Handle, offset: u64, len: u64) -> HeapResult<HeapView> {
        self.check_owned(handle)?;
        Self::check_range(handle, offset, len)?;
        let blocks = self.blocks.read().expect("lock poisoned");
        let block = blocks.get(&handle.slot()).ok_or(HeapError::FreedHandle {
            slot: handle.slot(),
        })?;
        Ok(HeapView::new(
            Arc::clone(block),
            offset as usize,
            len as usize,
        ))
    }

    fn free(&self, handle: &Handle) -> HeapResult<()> {
        self.check_owned(handle)?;
        let mut blocks = self.blocks.write().expect("lock poisoned");
        blocks.remove(&handle.slot()).ok_or(HeapError::FreedHandle {
            slot: handle.slot(),
        })?;
        debug!(slot = handle.slot(), size = handle.size(), "ext heap free");
        Ok(())
    }

    fn instance_id(&self) -> u64 {
        self.id
    }
}

impl std::fmt::Debug for InMemoryExtHeap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryExtHeap")
            .field("id", &self.id)
            .field("block_count", &self.len())
            .finish()
    }
}
