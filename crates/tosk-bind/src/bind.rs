use std::io::{Read, Write};

use tosk_heap::{ExtHeap, Handle, Heap, HeapBuf, HeapView};

use crate::error::BindResult;
use crate::wire::{WireReader, WireWriter};

/// The two heaps threaded through every binding.
///
/// Deserialization places fields that need external storage (buffers,
/// nested blobs) in `ext`, while transient bookkeeping allocates scratch
/// from `heap`. Serialization needs `ext` too: a [`Handle`] is a logical
/// address, and reading the payload behind one back out requires the heap
/// that issued it.
#[derive(Clone, Copy)]
pub struct BindContext<'a> {
    /// In-process heap for scratch and temporaries.
    pub heap: &'a dyn Heap,
    /// External heap for payload fields.
    pub ext: &'a dyn ExtHeap,
}

impl<'a> BindContext<'a> {
    pub fn new(heap: &'a dyn Heap, ext: &'a dyn ExtHeap) -> Self {
        Self { heap, ext }
    }
}

impl std::fmt::Debug for BindContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BindContext")
            .field("ext_instance", &self.ext.instance_id())
            .finish_non_exhaustive()
    }
}

/// Translation between a statically-typed value and the wire format.
///
/// Implementing `Bind` by hand is the open extension point: a type may lay
/// its fields out however it likes (versioned formats, compact encodings)
/// as long as `bind_read` inverts `bind_write` under the same context.
/// There is no dispatch table to register with — the impl itself is the
/// specialization.
pub trait Bind: Sized {
    /// Name used when annotating dispatch errors and declaring the type in
    /// a registry.
    const TYPE_NAME: &'static str;

    /// Write `self` field-wise into the stream.
    fn bind_write<W: Write>(&self, writer: &mut WireWriter<W>, cx: &BindContext<'_>)
        -> BindResult<()>;

    /// Read a value field-wise from the stream.
    fn bind_read<R: Read>(reader: &mut WireReader<R>, cx: &BindContext<'_>) -> BindResult<Self>;
}

macro_rules! bind_scalar {
    ($ty:ty, $name:literal, $write:ident, $read:ident) => {
        impl Bind for $ty {
            const TYPE_NAME: &'static str = $name;

            fn bind_write<W: Write>(
                &self,
                writer: &mut WireWriter<W>,
                _cx: &BindContext<'_>,
            ) -> BindResult<()> {
                writer.$write(*self)
            }

            fn bind_read<R: Read>(
                reader: &mut WireReader<R>,
                _cx: &BindContext<'_>,
            ) -> BindResult<Self> {
                reader.$read()
            }
        }
    };
}

bind_scalar!(u8, "u8", write_u8, read_u8);
bind_scalar!(u16, "u16", write_u16, read_u16);
bind_scalar!(u32, "u32", write_u32, read_u32);
bind_scalar!(u64, "u64", write_u64, read_u64);
bind_scalar!(i64, "i64", write_i64, read_i64);
bind_scalar!(bool, "bool", write_bool, read_bool);

impl Bind for String {
    const TYPE_NAME: &'static str = "string";

    fn bind_write<W: Write>(
        &self,
        writer: &mut WireWriter<W>,
        _cx: &BindContext<'_>,
    ) -> BindResult<()> {
        writer.write_str(self)
    }

    fn bind_read<R: Read>(reader: &mut WireReader<R>, _cx: &BindContext<'_>) -> BindResult<Self> {
        reader.read_str()
    }
}

impl Bind for Vec<u8> {
    const TYPE_NAME: &'static str = "bytes";

    fn bind_write<W: Write>(
        &self,
        writer: &mut WireWriter<W>,
        _cx: &BindContext<'_>,
    ) -> BindResult<()> {
        writer.write_bytes(self)
    }

    fn bind_read<R: Read>(reader: &mut WireReader<R>, _cx: &BindContext<'_>) -> BindResult<Self> {
        reader.read_bytes()
    }
}

/// A payload stored out-of-band in the external heap.
///
/// On the wire an `ExtBlob` is a length-prefixed byte string like any
/// other; in memory it is just the handle. Reading one stages the bytes
/// through in-process scratch, then lands them in the external store —
/// the two-heap split in miniature.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExtBlob {
    handle: Handle,
}

impl ExtBlob {
    /// Store `data` in `ext` and wrap the resulting handle.
    pub fn store(data: &[u8], ext: &dyn ExtHeap) -> BindResult<Self> {
        let handle = ext.alloc(data.len() as u64)?;
        ext.write(&handle, 0, data)?;
        Ok(Self { handle })
    }

    /// Adopt an existing handle.
    pub fn from_handle(handle: Handle) -> Self {
        Self { handle }
    }

    pub fn handle(&self) -> Handle {
        self.handle
    }

    /// Size in bytes of the stored payload.
    pub fn len(&self) -> u64 {
        self.handle.size()
    }

    pub fn is_empty(&self) -> bool {
        self.handle.size() == 0
    }

    /// A scoped view of the payload. Must be the issuing heap.
    pub fn read(&self, ext: &dyn ExtHeap) -> BindResult<HeapView> {
        Ok(ext.read_view(&self.handle)?)
    }
}

impl Bind for ExtBlob {
    const TYPE_NAME: &'static str = "ext-blob";

    fn bind_write<W: Write>(
        &self,
        writer: &mut WireWriter<W>,
        cx: &BindContext<'_>,
    ) -> BindResult<()> {
        let view = cx.ext.read_view(&self.handle)?;
        writer.write_bytes(view.as_slice())
    }

    fn bind_read<R: Read>(reader: &mut WireReader<R>, cx: &BindContext<'_>) -> BindResult<Self> {
        let len = reader.read_len()?;
        let mut scratch = HeapBuf::new(cx.heap, len)?;
        reader.read_raw(scratch.as_mut_slice())?;
        let handle = cx.ext.alloc(len as u64)?;
        cx.ext.write(&handle, 0, scratch.as_slice())?;
        Ok(Self { handle })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tosk_heap::{InMemoryExtHeap, SystemHeap, TrackingHeap};

    fn context<'a>(heap: &'a dyn Heap, ext: &'a dyn ExtHeap) -> BindContext<'a> {
        BindContext::new(heap, ext)
    }

    #[test]
    fn scalar_bind_roundtrip() {
        let heap = SystemHeap::new();
        let ext = InMemoryExtHeap::new();
        let cx = context(&heap, &ext);

        let mut writer = WireWriter::new(Vec::new());
        42u32.bind_write(&mut writer, &cx).unwrap();
        true.bind_write(&mut writer, &cx).unwrap();
        "hello".to_string().bind_write(&mut writer, &cx).unwrap();

        let data = writer.into_inner();
        let mut reader = WireReader::new(data.as_slice());
        assert_eq!(u32::bind_read(&mut reader, &cx).unwrap(), 42);
        assert!(bool::bind_read(&mut reader, &cx).unwrap());
        assert_eq!(String::bind_read(&mut reader, &cx).unwrap(), "hello");
    }

    #[test]
    fn ext_blob_store_and_read() {
        let ext = InMemoryExtHeap::new();
        let blob = ExtBlob::store(b"payload bytes", &ext).unwrap();
        assert_eq!(blob.len(), 13);
        let view = blob.read(&ext).unwrap();
        assert_eq!(view.as_slice(), b"payload bytes");
    }

    #[test]
    fn ext_blob_bind_moves_payload_between_heaps() {
        let heap = SystemHeap::new();
        let source_ext = InMemoryExtHeap::new();
        let target_ext = InMemoryExtHeap::new();

        // Serialize out of the source heap.
        let blob = ExtBlob::store(b"migrating payload", &source_ext).unwrap();
        let mut writer = WireWriter::new(Vec::new());
        blob.bind_write(&mut writer, &context(&heap, &source_ext))
            .unwrap();

        // Deserialize into a different external heap.
        let data = writer.into_inner();
        let mut reader = WireReader::new(data.as_slice());
        let landed = ExtBlob::bind_read(&mut reader, &context(&heap, &target_ext)).unwrap();

        assert_eq!(landed.handle().heap_id(), target_ext.instance_id());
        let view = landed.read(&target_ext).unwrap();
        assert_eq!(view.as_slice(), b"migrating payload");
        // The copy is explicit: the original handle still belongs to the
        // source heap only.
        assert!(landed.read(&source_ext).is_err());
    }

    #[test]
    fn ext_blob_read_uses_in_process_scratch() {
        let tracker = TrackingHeap::new(SystemHeap::new());
        let ext = InMemoryExtHeap::new();

        let mut writer = WireWriter::new(Vec::new());
        Vec::from(&b"staged"[..])
            .bind_write(&mut writer, &context(&tracker, &ext))
            .unwrap();

        let data = writer.into_inner();
        let mut reader = WireReader::new(data.as_slice());
        let blob = ExtBlob::bind_read(&mut reader, &context(&tracker, &ext)).unwrap();

        // Scratch was allocated and fully released through the tracker.
        assert_eq!(tracker.allocations(), 1);
        assert_eq!(tracker.live_bytes(), 0);
        assert_eq!(blob.read(&ext).unwrap().as_slice(), b"staged");
    }

    #[test]
    fn ext_blob_of_zero_length() {
        let heap = SystemHeap::new();
        let ext = InMemoryExtHeap::new();
        let cx = context(&heap, &ext);

        let blob = ExtBlob::store(b"", &ext).unwrap();
        let mut writer = WireWriter::new(Vec::new());
        blob.bind_write(&mut writer, &cx).unwrap();

        let data = writer.into_inner();
        let mut reader = WireReader::new(data.as_slice());
        let back = ExtBlob::bind_read(&mut reader, &cx).unwrap();
        assert!(back.is_empty());
    }

    #[test]
    fn truncated_blob_payload_fails_and_leaks_nothing() {
        let tracker = TrackingHeap::new(SystemHeap::new());
        let ext = InMemoryExtHeap::new();
        let cx = context(&tracker, &ext);

        // Claim 100 bytes but provide only 3.
        let mut writer = WireWriter::new(Vec::new());
        writer.write_u64(100).unwrap();
        writer.write_raw(b"abc").unwrap();

        let data = writer.into_inner();
        let mut reader = WireReader::new(data.as_slice());
        assert!(ExtBlob::bind_read(&mut reader, &cx).is_err());
        // The scratch lease was released on the error path.
        assert_eq!(tracker.live_bytes(), 0);
        // Nothing landed in the external store.
        assert!(ext.is_empty());
    }
}
