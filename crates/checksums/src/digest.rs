use core::fmt;

use crc32fast::Hasher;

/// Error raised when a chunk's computed CRC32 disagrees with the trailing
/// checksum carried on the wire.
#[derive(Clone, Copy, Debug, Eq, PartialEq, thiserror::Error)]
#[error("chunk checksum mismatch: computed {computed:#010x}, stream carries {expected:#010x}")]
pub struct ChecksumMismatch {
    /// CRC32 accumulated over the bytes actually seen for the chunk.
    pub computed: u32,
    /// CRC32 the stream claims for the chunk.
    pub expected: u32,
}

/// Running CRC32 digest scoped to one wire chunk.
///
/// The digest is reset at the start of each chunk, fed every raw byte consumed
/// or produced for that chunk, and read out when the chunk closes. Reading the
/// value does not reset the state; callers open the next chunk explicitly with
/// [`start_chunk`](Self::start_chunk).
#[derive(Clone, Default)]
pub struct ChunkDigest {
    hasher: Hasher,
    len: usize,
}

impl fmt::Debug for ChunkDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChunkDigest")
            .field("len", &self.len)
            .field("crc", &self.end_chunk())
            .finish()
    }
}

impl ChunkDigest {
    /// Creates a digest in its base state, ready for the first chunk.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resets the digest for a new chunk.
    ///
    /// Idempotent, and safe to call before the first chunk has been opened.
    pub fn start_chunk(&mut self) {
        self.hasher = Hasher::new();
        self.len = 0;
    }

    /// Folds a byte range into the running digest.
    pub fn feed(&mut self, bytes: &[u8]) {
        self.hasher.update(bytes);
        self.len += bytes.len();
    }

    /// Returns the number of bytes fed since the chunk opened.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if no bytes have been fed since the chunk opened.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Finalizes and returns the 32-bit digest for the current chunk.
    ///
    /// The internal state is left untouched so the value can be read more than
    /// once; call [`start_chunk`](Self::start_chunk) before reusing the digest
    /// for another chunk.
    #[must_use]
    pub fn end_chunk(&self) -> u32 {
        self.hasher.clone().finalize()
    }

    /// Compares the finalized digest against the checksum read from the stream.
    ///
    /// # Errors
    ///
    /// Returns [`ChecksumMismatch`] when the two values disagree. Verification
    /// is unconditional; there is no build-mode-dependent bypass.
    pub fn verify(&self, expected: u32) -> Result<(), ChecksumMismatch> {
        let computed = self.end_chunk();
        if computed == expected {
            Ok(())
        } else {
            Err(ChecksumMismatch { computed, expected })
        }
    }
}
