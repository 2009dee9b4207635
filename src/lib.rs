//! Batch extraction of sensor data and metadata from camera RAW files.
//!
//! Every RAW file handed to the [`raw_pipeline::BatchDriver`] yields a raw
//! bitplane dump, a PNG rendering and, optionally, a text report of its
//! header and EXIF metadata, all written next to the source file.

pub mod logger;
pub mod raw_pipeline;
