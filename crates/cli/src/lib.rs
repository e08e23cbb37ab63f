#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! Command-line frontend for the DAP4 chunked serialization codec.
//!
//! Two subcommands mirror the two passes the codec supports: `dump` decodes a
//! serialized stream against a JSON command script and prints one line per
//! value, `synth` encodes the typed values of a script into a stream file.
//! The script is the schema interface: an ordered JSON list of the commands
//! the sequencer should execute, as produced by whatever parsed the DMR.

mod frontend;

pub use frontend::run_with;
