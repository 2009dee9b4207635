use tracing::debug;

use crate::raw_pipeline::raw::types::{DecodedRaw, RawSamples};

/// Dumps the decoded sensor buffer byte for byte.
///
/// Samples are written row-major at their native width and in native byte order,
/// with no header, scaling or demosaicing. The result is an archival artifact,
/// not a viewable image.
pub fn extract_bitplane(raw: &DecodedRaw) -> Vec<u8> {
    let bytes: Vec<u8> = match &raw.samples {
        RawSamples::Integer(values) => values.iter().flat_map(|v| v.to_ne_bytes()).collect(),
        RawSamples::Float(values) => values.iter().flat_map(|v| v.to_ne_bytes()).collect(),
    };

    debug!(
        "Extracted {} byte bitplane ({} samples of {})",
        bytes.len(),
        raw.samples.len(),
        raw.pixel_type()
    );
    bytes
}
