use std::io::Cursor;

use bayer::{BayerDepth, CFA, Demosaic, RasterDepth, RasterMut};
use tracing::debug;

use crate::raw_pipeline::common::error::{ExtractError, Result};
use crate::raw_pipeline::raw::types::DecodedRaw;
use crate::raw_pipeline::render::renderer::ImageRenderer;
use crate::raw_pipeline::render::types::{RenderMode, RgbImage8};

/// Standard XYZ to sRGB D65 illuminant matrix
const XYZ_TO_SRGB: [[f32; 3]; 3] = [
    [ 3.2404542, -1.5371385, -0.4985314],
    [-0.9692660,  1.8760108,  0.0415560],
    [ 0.0556434, -0.2040259,  1.0572252],
];

/// CPU renderer: bilinear Bayer demosaic followed by a fixed development.
pub struct DevelopRenderer;

impl ImageRenderer for DevelopRenderer {
    fn render(&self, raw: &DecodedRaw, mode: RenderMode) -> Result<RgbImage8> {
        let width = raw.width;
        let height = raw.height;
        debug!("Rendering {}x{} image ({:?})", width, height, mode);

        if raw.samples.len() < raw.expected_samples() {
            return Err(ExtractError::RenderError(format!(
                "sample buffer holds {} values, {}x{}x{} needed",
                raw.samples.len(), width, height, raw.cpp
            )));
        }

        let rgb = match raw.cpp {
            1 => demosaic(raw)?,
            3 => {
                let mut data = raw.samples.to_u16();
                data.truncate(width * height * 3);
                data
            }
            cpp => {
                return Err(ExtractError::UnsupportedFormat(format!(
                    "{} components per pixel cannot be rendered",
                    cpp
                )))
            }
        };

        let data = match mode {
            RenderMode::Color => develop_color(raw, &rgb),
            RenderMode::Demosaic => develop_linear(raw, &rgb),
        };

        Ok(RgbImage8 { width, height, data })
    }
}

fn demosaic(raw: &DecodedRaw) -> Result<Vec<u16>> {
    let pattern = raw.cfa.bayer_name().ok_or_else(|| {
        ExtractError::UnsupportedFormat(format!(
            "CFA pattern {:?} ({}) is not a 2x2 Bayer layout",
            raw.cfa.pattern, raw.cfa.name
        ))
    })?;
    let cfa = match pattern.as_str() {
        "RGGB" => CFA::RGGB,
        "BGGR" => CFA::BGGR,
        "GRBG" => CFA::GRBG,
        _ => CFA::GBRG,
    };

    let bayer_bytes: Vec<u8> = raw.samples.to_u16().iter()
        .take(raw.width * raw.height)
        .flat_map(|&val| val.to_le_bytes())
        .collect();

    let mut output_buf = vec![0u8; raw.width * raw.height * 3 * 2];
    {
        let mut output_raster = RasterMut::new(
            raw.width,
            raw.height,
            RasterDepth::Depth16,
            &mut output_buf,
        );

        debug!("Running demosaic with depth=Depth16LE, CFA={}, algo=Linear", pattern);

        bayer::run_demosaic(
            &mut Cursor::new(&bayer_bytes[..]),
            BayerDepth::Depth16LE,
            cfa,
            Demosaic::Linear,
            &mut output_raster,
        ).map_err(|e| ExtractError::RenderError(format!("Demosaic failed: {:?}", e)))?;
    }

    Ok(output_buf
        .chunks_exact(2)
        .map(|b| u16::from_ne_bytes([b[0], b[1]]))
        .collect())
}

/// Per channel (black, range) from the R, G and B sensor levels.
fn levels(raw: &DecodedRaw) -> [(f32, f32); 3] {
    let fallback_white = ((1u32 << raw.bits_per_sample()) - 1) as f32;
    let mut out = [(0.0, 1.0); 3];
    for (c, level) in out.iter_mut().enumerate() {
        let black = raw.blacklevels[c] as f32;
        let white = match raw.whitelevels[c] {
            0 => fallback_white,
            w => w as f32,
        };
        *level = (black, (white - black).max(1.0));
    }
    out
}

fn normalize(value: u16, (black, range): (f32, f32)) -> f32 {
    ((value as f32 - black).max(0.0) / range).min(1.0)
}

fn to_u8(value: f32) -> u8 {
    (value * 255.0).round().clamp(0.0, 255.0) as u8
}

fn develop_linear(raw: &DecodedRaw, rgb: &[u16]) -> Vec<u8> {
    let levels = levels(raw);
    rgb.chunks_exact(3)
        .flat_map(|px| {
            [
                to_u8(normalize(px[0], levels[0])),
                to_u8(normalize(px[1], levels[1])),
                to_u8(normalize(px[2], levels[2])),
            ]
        })
        .collect()
}

fn develop_color(raw: &DecodedRaw, rgb: &[u16]) -> Vec<u8> {
    let levels = levels(raw);

    // Cam -> XYZ -> sRGB, the fourth CFA color has already been folded into green
    let mut cam_to_srgb = [[0.0f32; 3]; 3];
    for r in 0..3 {
        for c in 0..3 {
            cam_to_srgb[r][c] = (0..3).map(|k| XYZ_TO_SRGB[r][k] * raw.cam_to_xyz[k][c]).sum();
        }
    }

    let green = if raw.wb_coeffs[1].is_normal() { raw.wb_coeffs[1] } else { 1.0 };
    let wb = [0, 1, 2].map(|c| {
        let coeff = raw.wb_coeffs[c] / green;
        if coeff.is_normal() { coeff } else { 1.0 }
    });

    rgb.chunks_exact(3)
        .flat_map(|px| {
            let lin = [0, 1, 2].map(|c| normalize(px[c], levels[c]) * wb[c]);
            [0, 1, 2].map(|r| {
                let v = cam_to_srgb[r][0] * lin[0] + cam_to_srgb[r][1] * lin[1] + cam_to_srgb[r][2] * lin[2];
                to_u8(srgb_gamma(v.clamp(0.0, 1.0)))
            })
        })
        .collect()
}

fn srgb_gamma(v: f32) -> f32 {
    if v <= 0.0031308 {
        v * 12.92
    } else {
        1.055 * v.powf(1.0 / 2.4) - 0.055
    }
}
