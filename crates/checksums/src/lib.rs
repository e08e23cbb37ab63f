#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! Per-chunk CRC32 digest for the DAP4 chunked serialization format.
//!
//! Every chunk of a serialized DAP4 response is trailed by a 4-byte CRC32
//! covering exactly the bytes of that chunk. [`ChunkDigest`] is the running
//! accumulator both the decoder and the encoder feed as a side effect of every
//! read or write inside a chunk: reset it when a chunk opens, fold bytes in as
//! they are consumed or produced, and read the masked 32-bit value out when the
//! chunk closes.

mod digest;

pub use digest::{ChecksumMismatch, ChunkDigest};
