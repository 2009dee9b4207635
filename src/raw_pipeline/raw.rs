//! RAW image decoding module
//!
//! This module provides format-agnostic RAW decoding and the raw bitplane
//! extraction built on top of it.

mod reader;
mod rawloader_reader;
mod extract;
pub mod types;

pub use reader::RawImageReader;
pub use rawloader_reader::RawLoaderReader;
pub use extract::extract_bitplane;
pub use types::{CfaDescriptor, DecodedRaw, RawPixelType, RawSamples};
