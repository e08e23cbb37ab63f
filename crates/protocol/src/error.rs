use checksums::ChecksumMismatch;

use crate::field::TypeTag;

/// Failures raised while decoding or encoding a chunked serialization stream.
///
/// Every variant is fatal to the pass that raised it: the sequencers never
/// resynchronize after an error, and callers are expected to discard any
/// partial output.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum WireError {
    /// Fewer bytes remain in the stream than the current field requires.
    #[error("stream truncated: field needs {needed} byte(s), {remaining} remain")]
    Truncated {
        /// Number of bytes the field declared needing.
        needed: u64,
        /// Number of bytes that were still available in the buffer.
        remaining: u64,
    },
    /// The chunk's computed CRC32 disagrees with the trailing checksum.
    #[error(transparent)]
    Checksum(#[from] ChecksumMismatch),
    /// The command script requested a type/width combination the codec does
    /// not recognize. This indicates a schema bug in the caller, not a data
    /// error in the stream.
    #[error("unrecognized field: type tag '{tag}' at width {width}")]
    InvalidField {
        /// Type tag the script supplied.
        tag: TypeTag,
        /// Byte width the script supplied.
        width: u8,
    },
    /// The synthesizer was handed a value that does not fit the declared
    /// wire width.
    #[error("value {value} does not fit in {width} byte(s)")]
    OutOfRange {
        /// Decimal rendering of the offending value.
        value: String,
        /// Wire width the script declared.
        width: u8,
    },
    /// A text payload was not valid UTF-8.
    #[error("text payload is not valid UTF-8: {0}")]
    Utf8(#[from] core::str::Utf8Error),
}
