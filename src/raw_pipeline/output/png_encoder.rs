use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};
use tracing::debug;

use crate::raw_pipeline::common::error::{ExtractError, Result};
use crate::raw_pipeline::render::types::RgbImage8;

/// Encodes an 8-bit RGB raster as a lossless PNG.
pub fn encode_png(image: &RgbImage8) -> Result<Vec<u8>> {
    debug!("Encoding PNG image: {}x{}", image.width, image.height);

    if image.data.len() != image.width * image.height * 3 {
        return Err(ExtractError::EncodeError(format!(
            "raster holds {} bytes, {}x{} RGB needs {}",
            image.data.len(), image.width, image.height, image.width * image.height * 3
        )));
    }

    let mut buffer = Vec::new();
    PngEncoder::new(&mut buffer)
        .write_image(
            &image.data,
            image.width as u32,
            image.height as u32,
            ExtendedColorType::Rgb8,
        )
        .map_err(|e| ExtractError::EncodeError(e.to_string()))?;

    debug!("PNG encoding complete, {} bytes", buffer.len());
    Ok(buffer)
}
