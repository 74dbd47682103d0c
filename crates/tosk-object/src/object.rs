use std::ops::Deref;

use tosk_heap::{ExtHeap, Handle, HeapView};
use tosk_registry::TypeId;

use crate::error::ObjectResult;

/// Where an object's bytes live.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ObjectStorage {
    /// In-process bytes.
    Inline(Vec<u8>),
    /// Bytes held by an external heap, addressed by handle.
    External(Handle),
}

/// A type-erased value: a registered type's id plus the value's stored
/// bytes.
///
/// The object records which type must be used to interpret its bytes but
/// cannot prove the pairing is right — that invariant is established by the
/// caller, normally through [`TypedReference`](crate::TypedReference).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommonObject {
    type_id: TypeId,
    storage: ObjectStorage,
}

impl CommonObject {
    /// An object backed by inline bytes.
    pub fn from_bytes(type_id: TypeId, bytes: Vec<u8>) -> Self {
        Self {
            type_id,
            storage: ObjectStorage::Inline(bytes),
        }
    }

    /// An object backed by an external-heap handle.
    pub fn from_handle(type_id: TypeId, handle: Handle) -> Self {
        Self {
            type_id,
            storage: ObjectStorage::External(handle),
        }
    }

    /// The type that must be used to interpret this object's bytes.
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn storage(&self) -> &ObjectStorage {
        &self.storage
    }

    /// Inline bytes, or `None` for an externally stored object.
    pub fn inline_bytes(&self) -> Option<&[u8]> {
        match &self.storage {
            ObjectStorage::Inline(bytes) => Some(bytes),
            ObjectStorage::External(_) => None,
        }
    }

    /// The external handle, or `None` for an inline object.
    pub fn handle(&self) -> Option<Handle> {
        match &self.storage {
            ObjectStorage::Inline(_) => None,
            ObjectStorage::External(handle) => Some(*handle),
        }
    }

    /// Read the object's raw bytes wherever they live.
    ///
    /// Externally stored objects need the issuing heap; the returned
    /// [`RawBytes`] keeps the view lease alive for as long as it is held.
    pub fn read_raw<'a>(&'a self, ext: &dyn ExtHeap) -> ObjectResult<RawBytes<'a>> {
        match &self.storage {
            ObjectStorage::Inline(bytes) => Ok(RawBytes::Inline(bytes)),
            ObjectStorage::External(handle) => Ok(RawBytes::Leased(ext.read_view(handle)?)),
        }
    }

    /// Size in bytes of the stored representation.
    pub fn stored_size(&self) -> u64 {
        match &self.storage {
            ObjectStorage::Inline(bytes) => bytes.len() as u64,
            ObjectStorage::External(handle) => handle.size(),
        }
    }
}

/// Raw bytes of an object: either a borrow of inline storage or a scoped
/// lease on an external view.
#[derive(Debug)]
pub enum RawBytes<'a> {
    Inline(&'a [u8]),
    Leased(HeapView),
}

impl Deref for RawBytes<'_> {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        match self {
            Self::Inline(bytes) => bytes,
            Self::Leased(view) => view.as_slice(),
        }
    }
}

impl AsRef<[u8]> for RawBytes<'_> {
    fn as_ref(&self) -> &[u8] {
        self
    }
}
