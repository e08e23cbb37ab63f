use core::fmt::Write as _;

use crate::error::WireError;
use crate::field::{DumpCmd, FieldDesc, TypeTag};
use crate::options::StreamOptions;
use crate::reader::ChunkReader;
use crate::render;
use crate::scalar;
use crate::varlen;

/// Decode pass over one fully buffered serialized stream.
///
/// A `Dump` walks the stream under the direction of a command script that
/// mirrors the DMR schema, rendering one text line per value into a growing
/// buffer. The chunk digest is fed as a side effect of every read, and each
/// chunk's trailing CRC32 is verified when the script closes it. Any error
/// aborts the whole pass; partial output must be discarded.
///
/// # Examples
///
/// ```
/// use protocol::{ByteOrder, Dump, DumpCmd, FieldDesc, StreamOptions, TypeTag};
///
/// # fn example() -> Result<(), protocol::WireError> {
/// // One chunk holding a big-endian signed 32-bit 42 plus its CRC trailer.
/// let data = [0x00, 0x00, 0x00, 0x2a, 0xfa, 0xff, 0x16, 0xca];
///
/// let mut dump = Dump::new(&data, StreamOptions::new(ByteOrder::Big));
/// dump.run(&[
///     DumpCmd::StartChunk,
///     DumpCmd::Field(FieldDesc::new(TypeTag::Signed, 4)?),
///     DumpCmd::Checksum,
/// ])?;
/// assert_eq!(dump.text(), "42\n\n");
/// # Ok(())
/// # }
/// # example().unwrap();
/// ```
#[derive(Debug)]
pub struct Dump<'a> {
    reader: ChunkReader<'a>,
    text: String,
    checksums: bool,
    trace_checksums: bool,
}

impl<'a> Dump<'a> {
    /// Creates a decode pass over `data` with the stream's fixed options.
    #[must_use]
    pub fn new(data: &'a [u8], options: StreamOptions) -> Self {
        Self {
            reader: ChunkReader::new(data, options.byte_order),
            text: String::new(),
            checksums: options.checksums,
            trace_checksums: options.trace_checksums,
        }
    }

    /// Opens the next chunk, resetting the running digest.
    pub fn start_chunk(&mut self) {
        self.reader.start_chunk();
    }

    /// Reads an 8-byte element count, prints it, and returns it.
    ///
    /// The count bytes feed the chunk digest like any other content.
    pub fn read_count(&mut self) -> Result<u64, WireError> {
        let count = self.reader.read_count()?;
        let _ = writeln!(self.text, "count {count}");
        Ok(count)
    }

    /// Reads one field per its descriptor and appends its rendered line.
    ///
    /// Variable-length kinds route through the count-prefixed codec; fixed
    /// kinds through the scalar codec. An index tuple on the descriptor is
    /// appended as a display suffix.
    pub fn read_field(&mut self, desc: &FieldDesc) -> Result<(), WireError> {
        let rendered = match desc.tag() {
            TypeTag::Text => varlen::decode_text(&mut self.reader)?,
            TypeTag::Opaque => varlen::decode_opaque(&mut self.reader)?,
            _ => scalar::decode(&mut self.reader, desc)?,
        };
        self.text.push_str(&rendered);
        if let Some(index) = desc.index() {
            self.text.push_str(&render::index_suffix(index));
        }
        self.text.push('\n');
        Ok(())
    }

    /// Closes the current chunk.
    ///
    /// When checksumming is enabled this reads the 4 trailing CRC bytes,
    /// advances past them, and verifies them against the digest; verification
    /// is unconditional, never build-mode dependent. A blank separator line is
    /// appended either way. Returns the verified checksum, or `None` when the
    /// stream carries no trailers.
    pub fn verify_checksum(&mut self) -> Result<Option<u32>, WireError> {
        let verified = if self.checksums {
            let crc = self.reader.verify_chunk()?;
            if self.trace_checksums {
                tracing::debug!(checksum = crc, "chunk checksum verified");
            }
            Some(crc)
        } else {
            None
        };
        self.text.push('\n');
        Ok(verified)
    }

    /// Runs an explicit command script to completion.
    ///
    /// The stream is considered complete when the script is exhausted; the
    /// script determines how many chunks are processed.
    pub fn run(&mut self, script: &[DumpCmd]) -> Result<(), WireError> {
        for cmd in script {
            match cmd {
                DumpCmd::StartChunk => self.start_chunk(),
                DumpCmd::Count => {
                    self.read_count()?;
                }
                DumpCmd::Field(desc) => self.read_field(desc)?,
                DumpCmd::Checksum => {
                    self.verify_checksum()?;
                }
            }
        }
        Ok(())
    }

    /// Drives the pass with a caller-supplied closure instead of a script,
    /// for schemas whose field sequence is generated on the fly.
    pub fn run_with<F>(&mut self, op: F) -> Result<(), WireError>
    where
        F: FnOnce(&mut Self) -> Result<(), WireError>,
    {
        op(self)
    }

    /// Returns the number of unread stream bytes.
    #[must_use]
    pub const fn remaining(&self) -> usize {
        self.reader.remaining()
    }

    /// Returns the text accumulated so far.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Consumes the pass, returning the accumulated text.
    #[must_use]
    pub fn into_text(self) -> String {
        self.text
    }
}
