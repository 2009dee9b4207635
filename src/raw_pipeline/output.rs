//! Output writing module
//!
//! This module encodes the rendered raster to PNG and writes the per-source
//! artifacts next to their source file.

mod writer;
mod atomic_file_writer;
mod png_encoder;
pub mod types;

pub use writer::OutputWriter;
pub use atomic_file_writer::AtomicFileWriter;
pub use png_encoder::encode_png;
pub use types::{ArtifactKind, ArtifactOutcome, OutputPaths, OutputTriple};
