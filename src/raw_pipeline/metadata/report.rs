//! Fixed-schema text report
//!
//! The report always carries both sections and every line, in this order, so
//! downstream parsers can rely on a fixed line set. Values the source does not
//! carry render as `N/A`.

use std::fmt::Write;

use crate::raw_pipeline::metadata::sensor::SensorInfo;
use crate::raw_pipeline::metadata::types::{CameraMetadata, MetaValue};

pub const RAW_SECTION: &str = "RAW image information:";
pub const CAMERA_SECTION: &str = "Camera information:";

pub const RAW_KEYS: [&str; 8] = [
    "Size",
    "Type",
    "Color",
    "Pattern",
    "White_level",
    "Black_level",
    "Color_matrix",
    "Camera_model",
];

pub const CAMERA_KEYS: [&str; 6] = [
    "Camera_model",
    "ISO",
    "Shutter_speed",
    "Aperture",
    "Focal_length",
    "Shooting_date",
];

pub fn format_report(sensor: &SensorInfo, camera: &CameraMetadata) -> String {
    let pattern = match &sensor.pattern {
        MetaValue::Present(grid) => format!("{:?}", grid),
        MetaValue::NotAvailable => MetaValue::<String>::NotAvailable.to_string(),
    };

    let raw_values = [
        format!("(H: {}, W: {})", sensor.height, sensor.width),
        sensor.pixel_type.to_string(),
        sensor.color.to_string(),
        pattern,
        sensor.white_level.to_string(),
        format!("{:?}", sensor.black_levels),
        format_matrix(&sensor.color_matrix),
        sensor.camera_model.to_string(),
    ];

    let camera_values = [
        camera.model.to_string(),
        camera.iso.to_string(),
        camera.shutter_speed.to_string(),
        camera.aperture.to_string(),
        camera.focal_length.to_string(),
        camera.shooting_date.to_string(),
    ];

    let mut out = String::new();
    push_section(&mut out, RAW_SECTION, &RAW_KEYS, &raw_values);
    out.push('\n');
    push_section(&mut out, CAMERA_SECTION, &CAMERA_KEYS, &camera_values);
    out
}

/// Report headed by the file name, as printed on the console at verbosity 2.
pub fn format_console_block(name: &str, sensor: &SensorInfo, camera: &CameraMetadata) -> String {
    format!("==> {} <==\n{}\n", name, format_report(sensor, camera))
}

fn push_section(out: &mut String, title: &str, keys: &[&str], values: &[String]) {
    out.push_str(title);
    out.push('\n');
    for (key, value) in keys.iter().zip(values) {
        // writing into a String cannot fail
        let _ = writeln!(out, "{}: {}", key, value);
    }
}

fn format_matrix(matrix: &[[f32; 3]; 4]) -> String {
    let rows = matrix
        .iter()
        .map(|row| {
            let cells = row.iter().map(|v| format!("{:.4}", v)).collect::<Vec<_>>();
            format!("[{}]", cells.join(", "))
        })
        .collect::<Vec<_>>();
    format!("[{}]", rows.join(", "))
}
