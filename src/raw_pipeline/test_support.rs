//! Fixtures shared by the unit tests of the pipeline modules.

use crate::raw_pipeline::raw::types::{CfaDescriptor, DecodedRaw, RawSamples};

pub const SAMPLE_WIDTH: usize = 8;
pub const SAMPLE_HEIGHT: usize = 6;

/// An 8x6 RGGB frame with a horizontal gradient and a 12-bit white level.
pub fn sample_raw() -> DecodedRaw {
    let data = (0..SAMPLE_HEIGHT)
        .flat_map(|_| (0..SAMPLE_WIDTH).map(|x| (x * 500) as u16))
        .collect();

    DecodedRaw {
        width: SAMPLE_WIDTH,
        height: SAMPLE_HEIGHT,
        cpp: 1,
        samples: RawSamples::Integer(data),
        cfa: CfaDescriptor {
            name: "RGGB".to_string(),
            pattern: vec![vec![0, 1], vec![1, 2]],
        },
        whitelevels: [4095; 4],
        blacklevels: [0; 4],
        xyz_to_cam: [
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.0, 0.0, 1.0],
            [0.0, 0.0, 0.0],
        ],
        cam_to_xyz: [
            [0.4124, 0.3576, 0.1805, 0.0],
            [0.2126, 0.7152, 0.0722, 0.0],
            [0.0193, 0.1192, 0.9505, 0.0],
        ],
        wb_coeffs: [2.0, 1.0, 1.5, f32::NAN],
        make: "Canon".to_string(),
        model: "EOS 5D".to_string(),
    }
}
