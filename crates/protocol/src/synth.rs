use crate::error::WireError;
use crate::field::{SynthCmd, WireValue};
use crate::options::StreamOptions;
use crate::scalar;
use crate::varlen;
use crate::writer::ChunkWriter;

/// Encode pass producing one serialized stream.
///
/// The inverse of [`Dump`](crate::Dump): typed values are packed into the
/// wire format under a command script, with each chunk's CRC32 trailer
/// appended when checksumming is enabled for the stream. Any error aborts the
/// whole pass.
///
/// # Examples
///
/// ```
/// use protocol::{ByteOrder, StreamOptions, Synthesize, SynthCmd, WireValue};
///
/// # fn example() -> Result<(), protocol::WireError> {
/// let mut synth = Synthesize::new(StreamOptions::new(ByteOrder::Big));
/// synth.run(&[
///     SynthCmd::StartChunk,
///     SynthCmd::Value(WireValue::Signed { width: 4, value: 42 }),
///     SynthCmd::Checksum,
/// ])?;
///
/// let bytes = synth.into_bytes();
/// assert_eq!(bytes.len(), 8); // 4 value bytes + 4 checksum bytes
/// assert_eq!(&bytes[..4], &[0x00, 0x00, 0x00, 0x2a]);
/// # Ok(())
/// # }
/// # example().unwrap();
/// ```
#[derive(Debug)]
pub struct Synthesize {
    writer: ChunkWriter,
    checksums: bool,
    trace_checksums: bool,
}

impl Synthesize {
    /// Creates an encode pass with the stream's fixed options.
    #[must_use]
    pub fn new(options: StreamOptions) -> Self {
        Self {
            writer: ChunkWriter::new(options.byte_order),
            checksums: options.checksums,
            trace_checksums: options.trace_checksums,
        }
    }

    /// Opens the next chunk, resetting the running digest.
    pub fn start_chunk(&mut self) {
        self.writer.start_chunk();
    }

    /// Writes an 8-byte element count, fed to the chunk digest.
    pub fn put_count(&mut self, count: u64) {
        self.writer.put_count(count);
    }

    /// Encodes one typed value into the stream.
    ///
    /// # Errors
    ///
    /// [`WireError::InvalidField`] for an unrecognized width and
    /// [`WireError::OutOfRange`] when the value does not fit its declared
    /// width.
    pub fn put_value(&mut self, value: &WireValue) -> Result<(), WireError> {
        match value {
            WireValue::Text { value } => {
                varlen::encode_text(&mut self.writer, value);
                Ok(())
            }
            WireValue::Opaque { value } => {
                varlen::encode_opaque(&mut self.writer, value);
                Ok(())
            }
            fixed => scalar::encode(&mut self.writer, fixed),
        }
    }

    /// Closes the current chunk by appending its CRC32 trailer.
    ///
    /// A no-op returning `None` when checksumming is disabled for the stream.
    pub fn put_checksum(&mut self) -> Option<u32> {
        if !self.checksums {
            return None;
        }
        let crc = self.writer.put_trailing_checksum();
        if self.trace_checksums {
            tracing::debug!(checksum = crc, "chunk checksum written");
        }
        Some(crc)
    }

    /// Runs an explicit command script to completion.
    pub fn run(&mut self, script: &[SynthCmd]) -> Result<(), WireError> {
        for cmd in script {
            match cmd {
                SynthCmd::StartChunk => self.start_chunk(),
                SynthCmd::Count { value } => self.put_count(*value),
                SynthCmd::Value(value) => self.put_value(value)?,
                SynthCmd::Checksum => {
                    self.put_checksum();
                }
            }
        }
        Ok(())
    }

    /// Drives the pass with a caller-supplied closure instead of a script.
    pub fn run_with<F>(&mut self, op: F) -> Result<(), WireError>
    where
        F: FnOnce(&mut Self) -> Result<(), WireError>,
    {
        op(self)
    }

    /// Returns the number of bytes produced so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.writer.len()
    }

    /// Returns `true` if nothing has been encoded yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.writer.is_empty()
    }

    /// Consumes the pass, returning the encoded stream.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.writer.into_bytes()
    }
}
