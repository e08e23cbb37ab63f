use crate::order::ByteOrder;

/// Per-stream configuration shared by [`Dump`](crate::Dump) and
/// [`Synthesize`](crate::Synthesize).
///
/// Both the byte order and the checksumming flag are fixed for the life of a
/// stream, mirroring a DAP4 response's declared endianness. The checksum
/// tracing toggle replaces the original tool's process-wide stderr flag with
/// per-instance configuration; traces go through `tracing` at debug level.
#[derive(Clone, Copy, Debug)]
pub struct StreamOptions {
    /// Byte order used for every fixed-width access.
    pub byte_order: ByteOrder,
    /// Whether each chunk carries a 4-byte CRC32 trailer.
    pub checksums: bool,
    /// Emit a debug-level trace event with each chunk's checksum.
    pub trace_checksums: bool,
}

impl StreamOptions {
    /// Creates options for `byte_order` with checksumming enabled.
    #[must_use]
    pub const fn new(byte_order: ByteOrder) -> Self {
        Self {
            byte_order,
            checksums: true,
            trace_checksums: false,
        }
    }

    /// Disables the per-chunk checksum trailer.
    #[must_use]
    pub const fn without_checksums(mut self) -> Self {
        self.checksums = false;
        self
    }

    /// Enables debug-level checksum trace events.
    #[must_use]
    pub const fn with_checksum_tracing(mut self) -> Self {
        self.trace_checksums = true;
        self
    }
}

impl Default for StreamOptions {
    fn default() -> Self {
        Self::new(ByteOrder::default())
    }
}
