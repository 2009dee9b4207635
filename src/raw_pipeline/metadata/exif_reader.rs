//! EXIF metadata reader built on kamadak-exif.
//!
//! CR2, NEF, ARW and most other RAW containers are TIFF files, so the EXIF block
//! can be read straight from the file bytes without decoding the sensor data.
//! RAF, CRW and MRW are not TIFF based and always read as having no EXIF; for
//! those the pipeline falls back to the camera name reported by the decoder and
//! every other camera field stays not available.

use std::io::Cursor;

use exif::{Exif, In, Tag, Value};
use tracing::{debug, warn};

use crate::raw_pipeline::metadata::types::{
    Aperture, CameraMetadata, ExposureTime, FocalLength, ShootingDate,
};

pub struct ExifReader;

impl ExifReader {
    /// Reads the shooting parameters from the file bytes.
    ///
    /// Never fails: a container without EXIF yields a record where every field is
    /// not available, and each missing tag is reported the same way.
    pub fn read_metadata(&self, data: &[u8]) -> CameraMetadata {
        let exif = match exif::Reader::new().read_from_container(&mut Cursor::new(data)) {
            Ok(exif) => exif,
            Err(e) => {
                warn!("No EXIF metadata available: {}", e);
                return CameraMetadata::default();
            }
        };

        let metadata = CameraMetadata {
            model: ascii(&exif, Tag::Model).into(),
            iso: integer(&exif, Tag::PhotographicSensitivity).into(),
            shutter_speed: rational(&exif, Tag::ExposureTime)
                .map(|(num, denom)| ExposureTime { num, denom })
                .into(),
            aperture: rational(&exif, Tag::FNumber)
                .filter(|&(_, denom)| denom != 0)
                .map(|(num, denom)| Aperture(num as f64 / denom as f64))
                .into(),
            focal_length: rational(&exif, Tag::FocalLength)
                .filter(|&(_, denom)| denom != 0)
                .map(|(num, denom)| FocalLength(num as f64 / denom as f64))
                .into(),
            shooting_date: ascii(&exif, Tag::DateTimeOriginal)
                .map(|text| ShootingDate::parse(&text))
                .into(),
        };

        let missing = [
            ("Model", metadata.model.is_present()),
            ("ISO", metadata.iso.is_present()),
            ("ExposureTime", metadata.shutter_speed.is_present()),
            ("FNumber", metadata.aperture.is_present()),
            ("FocalLength", metadata.focal_length.is_present()),
            ("DateTimeOriginal", metadata.shooting_date.is_present()),
        ]
        .iter()
        .filter(|(_, present)| !present)
        .map(|(name, _)| *name)
        .collect::<Vec<_>>();

        if !missing.is_empty() {
            debug!("EXIF tags not available: {}", missing.join(", "));
        }

        metadata
    }
}

fn ascii(exif: &Exif, tag: Tag) -> Option<String> {
    let field = exif.get_field(tag, In::PRIMARY)?;
    match field.value {
        Value::Ascii(ref values) => values.first().and_then(|bytes| {
            let text = String::from_utf8_lossy(bytes);
            let text = text.trim_matches(|c: char| c == '\0' || c.is_whitespace());
            if text.is_empty() { None } else { Some(text.to_string()) }
        }),
        _ => None,
    }
}

fn integer(exif: &Exif, tag: Tag) -> Option<u32> {
    let field = exif.get_field(tag, In::PRIMARY)?;
    match field.value {
        Value::Short(ref v) if !v.is_empty() => Some(v[0] as u32),
        Value::Long(ref v) if !v.is_empty() => Some(v[0]),
        _ => None,
    }
}

fn rational(exif: &Exif, tag: Tag) -> Option<(u32, u32)> {
    let field = exif.get_field(tag, In::PRIMARY)?;
    match field.value {
        Value::Rational(ref v) if !v.is_empty() => Some((v[0].num, v[0].denom)),
        _ => None,
    }
}
