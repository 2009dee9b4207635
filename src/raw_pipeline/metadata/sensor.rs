use crate::raw_pipeline::metadata::types::MetaValue;
use crate::raw_pipeline::raw::types::{DecodedRaw, RawPixelType};

/// RAW header fields shown in the report
#[derive(Debug, Clone, PartialEq)]
pub struct SensorInfo {
    pub height: usize,
    pub width: usize,
    pub pixel_type: RawPixelType,
    /// CFA filter string
    pub color: MetaValue<String>,
    pub pattern: MetaValue<Vec<Vec<usize>>>,
    pub white_level: u16,
    pub black_levels: [u16; 4],
    pub color_matrix: [[f32; 3]; 4],
    pub camera_model: MetaValue<String>,
}

impl SensorInfo {
    pub fn from_decoded(raw: &DecodedRaw) -> Self {
        let color = if raw.cfa.name.trim().is_empty() {
            MetaValue::NotAvailable
        } else {
            MetaValue::Present(raw.cfa.name.trim().to_string())
        };
        let pattern = if raw.cfa.is_empty() {
            MetaValue::NotAvailable
        } else {
            MetaValue::Present(raw.cfa.pattern.clone())
        };

        Self {
            height: raw.height,
            width: raw.width,
            pixel_type: raw.pixel_type(),
            color,
            pattern,
            white_level: raw.max_white_level(),
            black_levels: raw.blacklevels,
            color_matrix: raw.xyz_to_cam,
            camera_model: raw.camera_model().into(),
        }
    }
}
