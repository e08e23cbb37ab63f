#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! Wire model and codecs for DAP4 chunked serialization.
//!
//! A serialized DAP4 response is a sequence of chunks: runs of typed values,
//! each chunk trailed by a 4-byte CRC32 over exactly its own bytes. The byte
//! layout is not self-describing beyond per-field type and width, so both
//! directions are driven by a command script mirroring the schema the DMR
//! declared. The crate is split into small modules that mirror the layers of
//! the format:
//!
//! - [`ChunkReader`] / [`ChunkWriter`] own the cursor, the stream's byte
//!   order, and the per-chunk digest every access feeds;
//! - the scalar and variable-length codecs convert between wire bytes and
//!   rendered text or typed values;
//! - [`Dump`] and [`Synthesize`] sequence whole passes under a script of
//!   [`DumpCmd`] / [`SynthCmd`] steps (or a caller-supplied closure).
//!
//! The whole response is buffered in memory before a pass begins; this is a
//! deliberate simplification for an inspection tool, not a streaming decoder.
//!
//! # Examples
//!
//! Encode a value with its chunk trailer, then decode and verify it:
//!
//! ```
//! use protocol::{
//!     ByteOrder, Dump, DumpCmd, FieldDesc, StreamOptions, SynthCmd, Synthesize, TypeTag,
//!     WireValue,
//! };
//!
//! # fn example() -> Result<(), protocol::WireError> {
//! let options = StreamOptions::new(ByteOrder::Little);
//!
//! let mut synth = Synthesize::new(options);
//! synth.run(&[
//!     SynthCmd::StartChunk,
//!     SynthCmd::Value(WireValue::Unsigned { width: 8, value: u64::MAX }),
//!     SynthCmd::Checksum,
//! ])?;
//! let bytes = synth.into_bytes();
//!
//! let mut dump = Dump::new(&bytes, options);
//! dump.run(&[
//!     DumpCmd::StartChunk,
//!     DumpCmd::Field(FieldDesc::new(TypeTag::Unsigned, 8)?),
//!     DumpCmd::Checksum,
//! ])?;
//! assert_eq!(dump.text(), "18446744073709551615\n\n");
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

mod dump;
mod error;
mod field;
mod options;
mod order;
mod reader;
mod render;
mod scalar;
mod synth;
mod varlen;
mod writer;

pub use checksums::ChecksumMismatch;
pub use dump::Dump;
pub use error::WireError;
pub use field::{DumpCmd, FieldDesc, SynthCmd, TypeTag, WireValue};
pub use options::StreamOptions;
pub use order::{ByteOrder, ParseByteOrderError};
pub use reader::ChunkReader;
pub use render::{hex_opaque, index_suffix, quoted_escaped};
pub use synth::Synthesize;
pub use writer::ChunkWriter;
