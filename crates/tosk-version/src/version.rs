use std::io::Read;

use tosk_bind::{Bind, BindContext, WireWriter};
use tosk_digest::{digest_reader, DigestWriter};
use tosk_types::VersionType;

use crate::error::VersionResult;

/// Derive a version identity from up to `max_size` bytes of `stream`.
///
/// Two byte-identical archives yield the same identity as long as both
/// reads cover the same prefix length, wherever the truncation point came
/// from.
pub fn version_of_archive<R: Read>(stream: R, max_size: u64) -> VersionResult<VersionType> {
    let (digest, _consumed) = digest_reader(stream, max_size)?;
    Ok(VersionType::new(digest))
}

/// Derive a version identity from a bound value.
///
/// The value is serialized through the binder directly into the digest
/// engine — the byte stream is never materialized. Serializing the same
/// logical value independently always yields the same identity.
pub fn version_of_object<T: Bind>(value: &T, cx: &BindContext<'_>) -> VersionResult<VersionType> {
    let mut writer = WireWriter::new(DigestWriter::new());
    value.bind_write(&mut writer, cx)?;
    Ok(VersionType::new(writer.into_inner().finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tosk_bind::ExtBlob;
    use tosk_digest::digest_bytes;
    use tosk_heap::{InMemoryExtHeap, SystemHeap};
    use tosk_types::{AlgorithmTag, Sha1Digest, PROTOCOL_VERSION};

    #[test]
    fn archive_version_wraps_the_stream_digest() {
        let data = b"archive contents".as_slice();
        let version = version_of_archive(data, u64::MAX).unwrap();
        assert_eq!(version.protocol, PROTOCOL_VERSION);
        assert_eq!(version.algorithm, AlgorithmTag::Sha1);
        assert_eq!(version.id, digest_bytes(b"archive contents"));
        assert!(version.conflict.is_zero());
    }

    #[test]
    fn archive_version_respects_max_size() {
        let data = b"prefix|tail".as_slice();
        let version = version_of_archive(data, 6).unwrap();
        assert_eq!(version.id, digest_bytes(b"prefix"));
    }

    #[test]
    fn same_prefix_same_identity_regardless_of_truncation_point() {
        let a = b"shared prefix, then one tail".as_slice();
        let b = b"shared prefix, then another".as_slice();
        let va = version_of_archive(a, 13).unwrap();
        let vb = version_of_archive(b, 13).unwrap();
        assert_eq!(va.id, vb.id);
    }

    #[test]
    fn object_version_is_deterministic() {
        let heap = SystemHeap::new();
        let ext = InMemoryExtHeap::new();
        let cx = BindContext::new(&heap, &ext);

        let value = "the same logical value".to_string();
        let first = version_of_object(&value, &cx).unwrap();
        let second = version_of_object(&value, &cx).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn distinct_values_get_distinct_identities() {
        let heap = SystemHeap::new();
        let ext = InMemoryExtHeap::new();
        let cx = BindContext::new(&heap, &ext);

        let a = version_of_object(&"one".to_string(), &cx).unwrap();
        let b = version_of_object(&"two".to_string(), &cx).unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn object_version_matches_the_serialized_stream() {
        let heap = SystemHeap::new();
        let ext = InMemoryExtHeap::new();
        let cx = BindContext::new(&heap, &ext);

        let value = 0xdead_beef_u32;
        let version = version_of_object(&value, &cx).unwrap();
        // The identity is the digest of exactly the wire bytes.
        assert_eq!(version.id, digest_bytes(&value.to_be_bytes()));
    }

    #[test]
    fn external_payloads_hash_by_content_not_by_handle() {
        let heap = SystemHeap::new();
        let ext_a = InMemoryExtHeap::new();
        let ext_b = InMemoryExtHeap::new();

        // The same payload stored in two different heaps gets two different
        // handles but one identity.
        let blob_a = ExtBlob::store(b"identical payload", &ext_a).unwrap();
        let blob_b = ExtBlob::store(b"identical payload", &ext_b).unwrap();
        assert_ne!(blob_a.handle(), blob_b.handle());

        let va = version_of_object(&blob_a, &BindContext::new(&heap, &ext_a)).unwrap();
        let vb = version_of_object(&blob_b, &BindContext::new(&heap, &ext_b)).unwrap();
        assert_eq!(va.id, vb.id);
    }

    #[test]
    fn conflict_is_caller_payload() {
        let data = b"content".as_slice();
        let plain = version_of_archive(data, u64::MAX).unwrap();
        let marked = plain.with_conflict(Sha1Digest::from_words([9, 9, 9, 9, 9]));
        assert_eq!(plain.id, marked.id);
        assert_ne!(plain, marked);
    }
}
