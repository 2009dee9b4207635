//! RAW image reader implementation using the rawloader library.
//!
//! This module provides support for reading the RAW formats rawloader knows about
//! (ARW, CR2, NEF, DNG, ORF, RW2, ...). It decodes the sensor data and copies out
//! the header fields the rest of the pipeline needs.

use std::io::Cursor;

use tracing::debug;
use rawloader::RawImageData as RawloaderImageData;
use crate::raw_pipeline::common::error::{Result, ExtractError};
use crate::raw_pipeline::raw::types::{CfaDescriptor, DecodedRaw, RawSamples};
use crate::raw_pipeline::raw::reader::RawImageReader;

/// RAW image reader that uses the rawloader library for decoding.
pub struct RawLoaderReader;

impl RawImageReader for RawLoaderReader {
    /// Reads and decodes RAW image data from a byte array.
    ///
    /// The sample buffer is kept in whatever representation rawloader produced
    /// (integer or float) so the bitplane dump stays byte-exact. White balance
    /// coefficients the camera did not record are replaced by rawloader's
    /// neutral estimate.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use rawdump::raw_pipeline::{RawImageReader, RawLoaderReader};
    ///
    /// let reader = RawLoaderReader;
    /// let raw_bytes = std::fs::read("image.arw").unwrap();
    /// let decoded = reader.read_raw(&raw_bytes).unwrap();
    /// println!("{}x{}", decoded.width, decoded.height);
    /// ```
    fn read_raw(&self, data: &[u8]) -> Result<DecodedRaw> {
        debug!("Decoding RAW image, {} bytes", data.len());

        let decoded = rawloader::decode(&mut Cursor::new(data))
            .map_err(|e| ExtractError::DecodeError(e.to_string()))?;

        debug!("Decoded image: {}x{} ({} cpp)", decoded.width, decoded.height, decoded.cpp);

        let cfa = if decoded.cfa.width == 0 || decoded.cfa.height == 0 {
            CfaDescriptor::default()
        } else {
            CfaDescriptor {
                name: decoded.cfa.name.clone(),
                pattern: (0..decoded.cfa.height)
                    .map(|row| (0..decoded.cfa.width).map(|col| decoded.cfa.color_at(row, col)).collect())
                    .collect(),
            }
        };

        let wb_coeffs = if !decoded.wb_coeffs[0].is_normal() ||
                           !decoded.wb_coeffs[1].is_normal() ||
                           !decoded.wb_coeffs[2].is_normal() {
            decoded.neutralwb()
        } else {
            decoded.wb_coeffs
        };
        let cam_to_xyz = decoded.cam_to_xyz_normalized();

        let samples = match decoded.data {
            RawloaderImageData::Integer(values) => RawSamples::Integer(values),
            RawloaderImageData::Float(values) => RawSamples::Float(values),
        };

        let raw = DecodedRaw {
            width: decoded.width,
            height: decoded.height,
            cpp: decoded.cpp,
            samples,
            cfa,
            whitelevels: decoded.whitelevels,
            blacklevels: decoded.blacklevels,
            xyz_to_cam: decoded.xyz_to_cam,
            cam_to_xyz,
            wb_coeffs,
            make: decoded.clean_make,
            model: decoded.clean_model,
        };

        debug!(
            "Calculated bits_per_sample: {} (max white level: {})",
            raw.bits_per_sample(),
            raw.max_white_level()
        );

        Ok(raw)
    }
}
