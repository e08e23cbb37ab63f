//! Variable-length field codec: DAP4's count-prefixed text and opaque
//! payloads.
//!
//! Both directions route the 8-byte count and the payload bytes through the
//! chunk digest; leaving the count out of the checksum is a correctness bug
//! the reader/writer primitives make impossible to reintroduce here.

use crate::error::WireError;
use crate::reader::ChunkReader;
use crate::render;
use crate::writer::ChunkWriter;

/// Reads a count-prefixed UTF-8 payload and renders it as a quoted,
/// backslash-escaped string.
pub(crate) fn decode_text(reader: &mut ChunkReader<'_>) -> Result<String, WireError> {
    let payload = reader.read_prefixed()?;
    let text = core::str::from_utf8(payload)?;
    Ok(render::quoted_escaped(text))
}

/// Reads a count-prefixed binary payload and renders it as lowercase hex.
pub(crate) fn decode_opaque(reader: &mut ChunkReader<'_>) -> Result<String, WireError> {
    let payload = reader.read_prefixed()?;
    Ok(render::hex_opaque(payload))
}

/// Writes text as an 8-byte count followed by its UTF-8 bytes.
pub(crate) fn encode_text(writer: &mut ChunkWriter, text: &str) {
    writer.put_prefixed(text.as_bytes());
}

/// Writes a binary blob as an 8-byte count followed by the raw bytes.
pub(crate) fn encode_opaque(writer: &mut ChunkWriter, payload: &[u8]) {
    writer.put_prefixed(payload);
}
