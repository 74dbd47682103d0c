use std::io::{Read, Write};
use std::marker::PhantomData;

use tosk_heap::{ExtHeap, InMemoryExtHeap};
use tosk_object::CommonObject;
use tosk_registry::TypeId;

use crate::bind::{Bind, BindContext};
use crate::error::BindResult;
use crate::wire::{WireReader, WireWriter};

/// Encode a typed value into a [`CommonObject`] tagged with `type_id`.
///
/// The pairing of `type_id` and `T` is the caller's assertion; the kernel
/// stores it, it does not verify it.
pub fn encode_object<T: Bind>(
    value: &T,
    type_id: TypeId,
    cx: &BindContext<'_>,
) -> BindResult<CommonObject> {
    let mut writer = WireWriter::new(Vec::new());
    value
        .bind_write(&mut writer, cx)
        .map_err(|e| e.in_type(T::TYPE_NAME))?;
    Ok(CommonObject::from_bytes(type_id, writer.into_inner()))
}

/// Binding-side extensions on [`CommonObject`].
pub trait CommonObjectExt {
    /// Interpret this object's raw bytes as a `T` — the unchecked cast.
    ///
    /// Nothing here verifies that the object's registered type corresponds
    /// to `T`; the caller must have established that, normally by going
    /// through a checked `TypedReference`. A wrong `T` reads mismatched
    /// layout and fails (or yields garbage values) rather than trapping —
    /// which is exactly why the name says unchecked.
    fn bind_as_unchecked<T: Bind>(&self, cx: &BindContext<'_>) -> BindResult<T>;
}

impl CommonObjectExt for CommonObject {
    fn bind_as_unchecked<T: Bind>(&self, cx: &BindContext<'_>) -> BindResult<T> {
        let raw = self.read_raw(cx.ext)?;
        let mut reader = WireReader::new(&*raw);
        T::bind_read(&mut reader, cx).map_err(|e| e.in_type(T::TYPE_NAME))
    }
}

/// Type-erased serializer: adapts a [`CommonObject`] holding a `T` to a
/// byte stream.
///
/// `apply` binds the object as a `T` without checking — the caller has
/// already paired object and type, normally via a checked typed reference —
/// and forwards it to the generic field-wise writer.
#[derive(Debug)]
pub struct Serializer<T: Bind> {
    _marker: PhantomData<fn() -> T>,
}

impl<T: Bind> Serializer<T> {
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }

    /// Write `object`'s value into `writer` using `T`'s wire layout.
    ///
    /// The intermediate `T` is transient, so its payload fields are staged
    /// in a private store reclaimed when this call returns; nothing is
    /// allocated in the caller's external heap.
    pub fn apply<W: Write>(
        &self,
        writer: &mut WireWriter<W>,
        object: &CommonObject,
        cx: &BindContext<'_>,
    ) -> BindResult<()> {
        let raw = object.read_raw(cx.ext)?;
        let staging = InMemoryExtHeap::new();
        let scx = BindContext::new(cx.heap, &staging);
        let mut reader = WireReader::new(&*raw);
        let value = T::bind_read(&mut reader, &scx).map_err(|e| e.in_type(T::TYPE_NAME))?;
        value
            .bind_write(writer, &scx)
            .map_err(|e| e.in_type(T::TYPE_NAME))
    }
}

impl<T: Bind> Default for Serializer<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Type-erased deserializer: reads a `T` from a byte stream and produces a
/// [`CommonObject`] tagged with the registered type.
///
/// The produced object's bytes (payload fields included) land in the
/// caller's external store behind the object's own handle, so the caller
/// can reach and free everything the dispatch allocated. Scratch comes
/// from the in-process heap.
#[derive(Debug)]
pub struct Deserializer<T: Bind> {
    type_id: TypeId,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Bind> Deserializer<T> {
    /// A deserializer producing objects of the registered type `type_id`.
    pub fn new(type_id: TypeId) -> Self {
        Self {
            type_id,
            _marker: PhantomData,
        }
    }

    /// The type every produced object is tagged with.
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Read one value from `reader` and wrap it as a [`CommonObject`]
    /// stored in the caller's external heap.
    ///
    /// The transient `T` stages its payload fields in a private store
    /// reclaimed on return; the only allocation that survives is the
    /// object's own block, reachable through its handle.
    pub fn apply<R: Read>(
        &self,
        reader: &mut WireReader<R>,
        cx: &BindContext<'_>,
    ) -> BindResult<CommonObject> {
        let staging = InMemoryExtHeap::new();
        let scx = BindContext::new(cx.heap, &staging);
        let value = T::bind_read(reader, &scx).map_err(|e| e.in_type(T::TYPE_NAME))?;

        let mut writer = WireWriter::new(Vec::new());
        value
            .bind_write(&mut writer, &scx)
            .map_err(|e| e.in_type(T::TYPE_NAME))?;
        let bytes = writer.into_inner();

        let handle = cx.ext.alloc(bytes.len() as u64)?;
        cx.ext.write(&handle, 0, &bytes)?;
        Ok(CommonObject::from_handle(self.type_id, handle))
    }
}
