use checksums::ChunkDigest;

use crate::error::WireError;
use crate::order::ByteOrder;

/// Cursor over an in-memory serialized stream.
///
/// The reader owns the decode position, the stream's byte order, and the
/// per-chunk digest. Every read inside a chunk advances the cursor
/// monotonically and feeds the consumed bytes to the digest as a side effect;
/// only the trailing checksum bytes bypass it. Text formatting lives
/// elsewhere so the reader can be exercised on raw bytes alone.
#[derive(Debug)]
pub struct ChunkReader<'a> {
    buf: &'a [u8],
    pos: usize,
    order: ByteOrder,
    digest: ChunkDigest,
}

macro_rules! read_fixed {
    ($($(#[$meta:meta])* $name:ident => $ty:ty, $conv:ident, $n:literal;)*) => {
        $(
            $(#[$meta])*
            pub fn $name(&mut self) -> Result<$ty, WireError> {
                let mut raw = [0u8; $n];
                raw.copy_from_slice(self.take($n)?);
                Ok(self.order.$conv(raw))
            }
        )*
    };
}

impl<'a> ChunkReader<'a> {
    /// Wraps a fully buffered stream in a reader using `order` for every
    /// fixed-width access.
    #[must_use]
    pub fn new(buf: &'a [u8], order: ByteOrder) -> Self {
        Self {
            buf,
            pos: 0,
            order,
            digest: ChunkDigest::new(),
        }
    }

    /// Returns the number of unread bytes.
    #[must_use]
    pub const fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// Returns the current decode position.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.pos
    }

    /// Returns the stream's byte order.
    #[must_use]
    pub const fn order(&self) -> ByteOrder {
        self.order
    }

    /// Resets the per-chunk digest for the next chunk.
    pub fn start_chunk(&mut self) {
        self.digest.start_chunk();
    }

    /// Consumes `n` bytes without feeding the digest.
    fn advance(&mut self, n: usize) -> Result<&'a [u8], WireError> {
        if n > self.remaining() {
            return Err(WireError::Truncated {
                needed: n as u64,
                remaining: self.remaining() as u64,
            });
        }
        let bytes = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(bytes)
    }

    /// Consumes `n` bytes of chunk content, feeding them to the digest.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::Truncated`] when fewer than `n` bytes remain.
    pub fn take(&mut self, n: usize) -> Result<&'a [u8], WireError> {
        let bytes = self.advance(n)?;
        self.digest.feed(bytes);
        Ok(bytes)
    }

    /// Reads one chunk-content byte.
    pub fn read_u8(&mut self) -> Result<u8, WireError> {
        Ok(self.take(1)?[0])
    }

    read_fixed! {
        /// Reads a 2-byte unsigned integer in the stream order.
        read_u16 => u16, u16_from, 2;
        /// Reads a 4-byte unsigned integer in the stream order.
        read_u32 => u32, u32_from, 4;
        /// Reads an 8-byte unsigned integer in the stream order.
        read_u64 => u64, u64_from, 8;
    }

    /// Reads a signed byte.
    pub fn read_i8(&mut self) -> Result<i8, WireError> {
        self.read_u8().map(|v| v as i8)
    }

    /// Reads a 2-byte signed integer in the stream order.
    pub fn read_i16(&mut self) -> Result<i16, WireError> {
        self.read_u16().map(|v| v as i16)
    }

    /// Reads a 4-byte signed integer in the stream order.
    pub fn read_i32(&mut self) -> Result<i32, WireError> {
        self.read_u32().map(|v| v as i32)
    }

    /// Reads an 8-byte signed integer in the stream order.
    pub fn read_i64(&mut self) -> Result<i64, WireError> {
        self.read_u64().map(|v| v as i64)
    }

    /// Reads an IEEE 754 single-precision float from its 4-byte bit pattern.
    pub fn read_f32(&mut self) -> Result<f32, WireError> {
        self.read_u32().map(f32::from_bits)
    }

    /// Reads an IEEE 754 double-precision float from its 8-byte bit pattern.
    pub fn read_f64(&mut self) -> Result<f64, WireError> {
        self.read_u64().map(f64::from_bits)
    }

    /// Reads the 8-byte length prefix of a variable-size field.
    ///
    /// The count bytes participate in the chunk checksum, same as the payload
    /// that follows them.
    pub fn read_count(&mut self) -> Result<u64, WireError> {
        self.read_u64()
    }

    /// Reads a length-prefixed payload: an 8-byte count followed by exactly
    /// that many bytes, all fed to the digest.
    pub fn read_prefixed(&mut self) -> Result<&'a [u8], WireError> {
        let count = self.read_count()?;
        let len = usize::try_from(count).map_err(|_| WireError::Truncated {
            needed: count,
            remaining: self.remaining() as u64,
        })?;
        self.take(len)
    }

    /// Closes the current chunk: reads the 4 trailing checksum bytes (which do
    /// not feed the digest) and verifies them against the accumulated CRC32.
    ///
    /// Returns the verified checksum value.
    ///
    /// # Errors
    ///
    /// [`WireError::Truncated`] when the trailer is missing or short;
    /// [`WireError::Checksum`] when the stream's value disagrees with the
    /// computed digest. Verification is unconditional.
    pub fn verify_chunk(&mut self) -> Result<u32, WireError> {
        let mut raw = [0u8; 4];
        raw.copy_from_slice(self.advance(4)?);
        let expected = self.order.u32_from(raw);
        self.digest.verify(expected)?;
        Ok(expected)
    }

    /// Returns the digest value accumulated for the current chunk without
    /// consuming a trailer. Used when checksumming is disabled for the stream.
    #[must_use]
    pub fn chunk_digest(&self) -> u32 {
        self.digest.end_chunk()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_read_reports_needed_and_remaining() {
        let mut reader = ChunkReader::new(&[1, 2], ByteOrder::Big);
        let err = reader.read_u32().expect_err("two bytes cannot yield a u32");
        assert_eq!(
            err,
            WireError::Truncated {
                needed: 4,
                remaining: 2
            }
        );
    }

    #[test]
    fn cursor_advances_monotonically() {
        let data = [0u8, 0, 0, 1, 0xff];
        let mut reader = ChunkReader::new(&data, ByteOrder::Big);
        assert_eq!(reader.read_u32().unwrap(), 1);
        assert_eq!(reader.position(), 4);
        assert_eq!(reader.remaining(), 1);
        assert_eq!(reader.read_u8().unwrap(), 0xff);
        assert_eq!(reader.remaining(), 0);
    }

    #[test]
    fn byte_order_is_threaded_through_reads() {
        let data = [1u8, 0, 0, 0];
        let mut le = ChunkReader::new(&data, ByteOrder::Little);
        assert_eq!(le.read_u32().unwrap(), 1);

        let mut be = ChunkReader::new(&data, ByteOrder::Big);
        assert_ne!(be.read_u32().unwrap(), 1);
    }

    #[test]
    fn prefixed_read_covers_count_and_payload() {
        let mut data = 3u64.to_le_bytes().to_vec();
        data.extend_from_slice(b"abc");

        let mut reader = ChunkReader::new(&data, ByteOrder::Little);
        reader.start_chunk();
        assert_eq!(reader.read_prefixed().unwrap(), b"abc");

        let mut expected = ChunkDigest::new();
        expected.feed(&data);
        assert_eq!(reader.chunk_digest(), expected.end_chunk());
    }

    #[test]
    fn verify_chunk_checks_and_consumes_trailer() {
        let payload = 42u32.to_be_bytes();
        let mut digest = ChunkDigest::new();
        digest.feed(&payload);
        let crc = digest.end_chunk();

        let mut data = payload.to_vec();
        data.extend_from_slice(&crc.to_be_bytes());

        let mut reader = ChunkReader::new(&data, ByteOrder::Big);
        reader.start_chunk();
        assert_eq!(reader.read_u32().unwrap(), 42);
        assert_eq!(reader.verify_chunk().unwrap(), crc);
        assert_eq!(reader.remaining(), 0);
    }

    #[test]
    fn corrupted_payload_fails_verification() {
        let payload = 42u32.to_be_bytes();
        let mut digest = ChunkDigest::new();
        digest.feed(&payload);
        let crc = digest.end_chunk();

        let mut data = payload.to_vec();
        data.extend_from_slice(&crc.to_be_bytes());
        data[1] ^= 0x40;

        let mut reader = ChunkReader::new(&data, ByteOrder::Big);
        reader.start_chunk();
        reader.read_u32().unwrap();
        assert!(matches!(
            reader.verify_chunk(),
            Err(WireError::Checksum(_))
        ));
    }

    #[test]
    fn missing_trailer_is_truncation_not_mismatch() {
        let payload = [7u8, 7, 7];
        let mut reader = ChunkReader::new(&payload, ByteOrder::Little);
        reader.start_chunk();
        reader.take(3).unwrap();
        assert!(matches!(
            reader.verify_chunk(),
            Err(WireError::Truncated { .. })
        ));
    }
}
