use checksums::ChunkDigest;

use crate::order::ByteOrder;

/// Growing byte sink for an encode pass.
///
/// Mirror image of [`ChunkReader`](crate::ChunkReader): every write inside a
/// chunk feeds the produced bytes to the per-chunk digest, and only the
/// trailing checksum bytes bypass it.
#[derive(Debug)]
pub struct ChunkWriter {
    out: Vec<u8>,
    order: ByteOrder,
    digest: ChunkDigest,
}

macro_rules! put_fixed {
    ($($(#[$meta:meta])* $name:ident => $ty:ty, $conv:ident;)*) => {
        $(
            $(#[$meta])*
            pub fn $name(&mut self, value: $ty) {
                let raw = self.order.$conv(value);
                self.put_bytes(&raw);
            }
        )*
    };
}

impl ChunkWriter {
    /// Creates an empty writer encoding in `order`.
    #[must_use]
    pub fn new(order: ByteOrder) -> Self {
        Self {
            out: Vec::new(),
            order,
            digest: ChunkDigest::new(),
        }
    }

    /// Returns the number of bytes produced so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.out.len()
    }

    /// Returns `true` if nothing has been written yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.out.is_empty()
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

    /// Appends chunk-content bytes, feeding them to the digest.
    pub fn put_bytes(&mut self, bytes: &[u8]) {
        self.digest.feed(bytes);
        self.out.extend_from_slice(bytes);
    }

    /// Writes one chunk-content byte.
    pub fn put_u8(&mut self, value: u8) {
        self.put_bytes(&[value]);
    }

    put_fixed! {
        /// Writes a 2-byte unsigned integer in the stream order.
        put_u16 => u16, u16_bytes;
        /// Writes a 4-byte unsigned integer in the stream order.
        put_u32 => u32, u32_bytes;
        /// Writes an 8-byte unsigned integer in the stream order.
        put_u64 => u64, u64_bytes;
    }

    /// Writes a signed byte.
    pub fn put_i8(&mut self, value: i8) {
        self.put_u8(value as u8);
    }

    /// Writes a 2-byte signed integer in the stream order.
    pub fn put_i16(&mut self, value: i16) {
        self.put_u16(value as u16);
    }

    /// Writes a 4-byte signed integer in the stream order.
    pub fn put_i32(&mut self, value: i32) {
        self.put_u32(value as u32);
    }

    /// Writes an 8-byte signed integer in the stream order.
    pub fn put_i64(&mut self, value: i64) {
        self.put_u64(value as u64);
    }

    /// Writes an IEEE 754 single-precision float as its 4-byte bit pattern.
    pub fn put_f32(&mut self, value: f32) {
        self.put_u32(value.to_bits());
    }

    /// Writes an IEEE 754 double-precision float as its 8-byte bit pattern.
    pub fn put_f64(&mut self, value: f64) {
        self.put_u64(value.to_bits());
    }

    /// Writes the 8-byte length prefix of a variable-size field.
    pub fn put_count(&mut self, count: u64) {
        self.put_u64(count);
    }

    /// Writes a length-prefixed payload: an 8-byte count followed by the raw
    /// bytes, all fed to the digest.
    pub fn put_prefixed(&mut self, payload: &[u8]) {
        self.put_count(payload.len() as u64);
        self.put_bytes(payload);
    }

    /// Closes the current chunk by appending the accumulated CRC32 as a 4-byte
    /// trailer in the stream order. The trailer bytes do not feed the digest.
    ///
    /// Returns the checksum that was written.
    pub fn put_trailing_checksum(&mut self) -> u32 {
        let crc = self.digest.end_chunk();
        let raw = self.order.u32_bytes(crc);
        self.out.extend_from_slice(&raw);
        crc
    }

    /// Returns the digest value accumulated for the current chunk.
    #[must_use]
    pub fn chunk_digest(&self) -> u32 {
        self.digest.end_chunk()
    }

    /// Consumes the writer, returning the full encoded stream.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.out
    }
}
