//! Types for rendering operations

/// 8-bit RGB raster
#[derive(Debug, Clone, PartialEq)]
pub struct RgbImage8 {
    /// Width of the image in pixels
    pub width: usize,
    /// Height of the image in pixels
    pub height: usize,
    /// RGB pixel data interleaved [R, G, B, R, G, B, ...]
    pub data: Vec<u8>,
}

/// How the PNG rendering is developed from the sensor data
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RenderMode {
    /// Levels, white balance, camera to sRGB matrix and sRGB gamma
    #[default]
    Color,
    /// Demosaic and level normalization only, linear output
    Demosaic,
}
