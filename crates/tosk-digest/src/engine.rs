use std::io::{self, Read, Write};

use sha1::{Digest, Sha1};
use tosk_types::Sha1Digest;

/// Read/feed granularity for streaming helpers.
const STREAM_CHUNK: usize = 64 * 1024;

/// An incremental SHA-1 computation.
///
/// One computation is single-owner end-to-end: create the engine, feed it
/// blocks, finalize exactly once. [`finalize`](Self::finalize) takes the
/// engine by value, so the type system rules out feeding a finalized engine.
#[derive(Clone, Default)]
pub struct DigestEngine {
    inner: Sha1,
}

impl DigestEngine {
    /// A fresh, empty engine.
    pub fn new() -> Self {
        Self { inner: Sha1::new() }
    }

    /// Feed a block of bytes. May be called any number of times; the final
    /// digest depends only on the concatenation of all blocks, never on how
    /// they were split.
    pub fn process_block(&mut self, block: &[u8]) {
        self.inner.update(block);
    }

    /// Finalize the computation and return the digest.
    pub fn finalize(self) -> Sha1Digest {
        let bytes: [u8; 20] = self.inner.finalize().into();
        Sha1Digest::from_bytes(bytes)
    }
}

impl std::fmt::Debug for DigestEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DigestEngine").finish_non_exhaustive()
    }
}

/// Digest a byte slice in one shot.
pub fn digest_bytes(data: &[u8]) -> Sha1Digest {
    let mut engine = DigestEngine::new();
    engine.process_block(data);
    engine.finalize()
}

/// Feed up to `max_size` bytes of `reader` through a fresh engine.
///
/// Returns the digest together with the number of bytes actually consumed
/// (less than `max_size` if the stream ended first). Input is read in fixed
/// chunks; the result is chunk-invariant by construction.
pub fn digest_reader<R: Read>(mut reader: R, max_size: u64) -> io::Result<(Sha1Digest, u64)> {
    let mut engine = DigestEngine::new();
    let mut remaining = max_size;
    let mut buf = [0u8; STREAM_CHUNK];
    while remaining > 0 {
        let want = remaining.min(STREAM_CHUNK as u64) as usize;
        let got = reader.read(&mut buf[..want])?;
        if got == 0 {
            break;
        }
        engine.process_block(&buf[..got]);
        remaining -= got as u64;
    }
    Ok((engine.finalize(), max_size - remaining))
}

/// An [`io::Write`] adapter that feeds everything written into an engine.
///
/// Lets a serializer stream a value straight into the digest with no
/// intermediate byte buffer.
#[derive(Debug, Default)]
pub struct DigestWriter {
    engine: DigestEngine,
    written: u64,
}

impl DigestWriter {
    pub fn new() -> Self {
        Self {
            engine: DigestEngine::new(),
            written: 0,
        }
    }

    /// Bytes fed so far.
    pub fn bytes_written(&self) -> u64 {
        self.written
    }

    /// Finish and return the digest of everything written.
    pub fn finalize(self) -> Sha1Digest {
        self.engine.finalize()
    }
}

impl Write for DigestWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.engine.process_block(buf);
        self.written += buf.len() as u64;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
