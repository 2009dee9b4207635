//! RAW image data types

use std::fmt;

/// Sample buffer exactly as the decoding library hands it over
#[derive(Debug, Clone, PartialEq)]
pub enum RawSamples {
    Integer(Vec<u16>),
    /// Normalized 0.0-1.0 samples
    Float(Vec<f32>),
}

impl RawSamples {
    pub fn len(&self) -> usize {
        match self {
            RawSamples::Integer(values) => values.len(),
            RawSamples::Float(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn pixel_type(&self) -> RawPixelType {
        match self {
            RawSamples::Integer(_) => RawPixelType::Uint16,
            RawSamples::Float(_) => RawPixelType::Float32,
        }
    }

    /// Samples as u16, float data is scaled to the full u16 range.
    pub fn to_u16(&self) -> Vec<u16> {
        match self {
            RawSamples::Integer(values) => values.clone(),
            RawSamples::Float(values) => {
                values.iter().map(|&v| (v.clamp(0.0, 1.0) * u16::MAX as f32) as u16).collect()
            }
        }
    }
}

/// Storage type of one sensor sample
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawPixelType {
    Uint16,
    Float32,
}

impl RawPixelType {
    pub fn bytes_per_sample(self) -> usize {
        match self {
            RawPixelType::Uint16 => 2,
            RawPixelType::Float32 => 4,
        }
    }
}

impl fmt::Display for RawPixelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawPixelType::Uint16 => write!(f, "uint16"),
            RawPixelType::Float32 => write!(f, "float32"),
        }
    }
}

/// Color filter array layout of the sensor
///
/// `pattern[row][col]` holds the color index of that photosite within the repeating
/// block (0 = red, 1 = green, 2 = blue, 3 = second green or emerald).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CfaDescriptor {
    /// Filter string as reported by the decoder (e.g. "RGGB")
    pub name: String,
    pub pattern: Vec<Vec<usize>>,
}

impl CfaDescriptor {
    pub fn is_empty(&self) -> bool {
        self.pattern.is_empty()
    }

    /// Four-letter Bayer name of a 2x2 pattern, `None` for any other layout.
    pub fn bayer_name(&self) -> Option<String> {
        if self.pattern.len() != 2 || self.pattern.iter().any(|row| row.len() != 2) {
            return None;
        }

        let mut name = String::with_capacity(4);
        for &color in self.pattern.iter().flatten() {
            name.push(match color {
                0 => 'R',
                1 | 3 => 'G',
                2 => 'B',
                _ => return None,
            });
        }

        match name.as_str() {
            "RGGB" | "BGGR" | "GRBG" | "GBRG" => Some(name),
            _ => None,
        }
    }
}

/// Represents a decoded RAW image
#[derive(Debug, Clone)]
pub struct DecodedRaw {
    /// Width of the image in pixels
    pub width: usize,
    /// Height of the image in pixels
    pub height: usize,
    /// Components per pixel (1 for CFA sensors, 3 for linear RAW)
    pub cpp: usize,
    pub samples: RawSamples,
    pub cfa: CfaDescriptor,
    pub whitelevels: [u16; 4],
    pub blacklevels: [u16; 4],
    /// XYZ to camera matrix, one row per CFA color
    pub xyz_to_cam: [[f32; 3]; 4],
    /// Normalized camera to XYZ matrix used for rendering
    pub cam_to_xyz: [[f32; 4]; 3],
    pub wb_coeffs: [f32; 4],
    pub make: String,
    pub model: String,
}

/// Default bit depth when no white level information is available.
const DEFAULT_BITS_PER_SAMPLE: u32 = 16;

/// The bit width of the u16 data type, used for calculating actual bits per sample.
const U16_BITS: u32 = 16;

impl DecodedRaw {
    pub fn pixel_type(&self) -> RawPixelType {
        self.samples.pixel_type()
    }

    pub fn max_white_level(&self) -> u16 {
        self.whitelevels.iter().max().copied().unwrap_or(u16::MAX)
    }

    /// Bits per sample implied by the sensor's white level, e.g. 4095 -> 12 bits.
    pub fn bits_per_sample(&self) -> u32 {
        let max_white_level = self.max_white_level();
        if max_white_level == 0 {
            DEFAULT_BITS_PER_SAMPLE
        } else {
            U16_BITS - max_white_level.leading_zeros()
        }
    }

    /// "Make Model" with empty parts dropped, `None` if the decoder knew neither.
    pub fn camera_model(&self) -> Option<String> {
        let joined = [self.make.trim(), self.model.trim()]
            .iter()
            .filter(|part| !part.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join(" ");
        if joined.is_empty() { None } else { Some(joined) }
    }

    pub fn expected_samples(&self) -> usize {
        self.width * self.height * self.cpp
    }
}
