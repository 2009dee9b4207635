//! Camera metadata types

use std::fmt;

use chrono::NaiveDateTime;

/// Placeholder rendered for any value the source file does not carry.
pub const NOT_AVAILABLE: &str = "N/A";

/// A metadata value that is either present in the source or explicitly not available
#[derive(Debug, Clone, PartialEq)]
pub enum MetaValue<T> {
    Present(T),
    NotAvailable,
}

impl<T> MetaValue<T> {
    pub fn is_present(&self) -> bool {
        matches!(self, MetaValue::Present(_))
    }
}

impl<T> Default for MetaValue<T> {
    fn default() -> Self {
        MetaValue::NotAvailable
    }
}

impl<T> From<Option<T>> for MetaValue<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => MetaValue::Present(value),
            None => MetaValue::NotAvailable,
        }
    }
}

impl<T: fmt::Display> fmt::Display for MetaValue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetaValue::Present(value) => value.fmt(f),
            MetaValue::NotAvailable => f.write_str(NOT_AVAILABLE),
        }
    }
}

/// Exposure time as the EXIF rational it was stored as
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExposureTime {
    pub num: u32,
    pub denom: u32,
}

impl fmt::Display for ExposureTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.num == 0 || self.denom == 0 {
            return write!(f, "0");
        }
        if self.num < self.denom {
            if self.denom % self.num == 0 {
                write!(f, "1/{}", self.denom / self.num)
            } else {
                write!(f, "{}/{}", self.num, self.denom)
            }
        } else {
            write!(f, "{}", self.num as f64 / self.denom as f64)
        }
    }
}

/// Aperture f-number
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aperture(pub f64);

impl fmt::Display for Aperture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "f/{:.1}", self.0)
    }
}

/// Focal length in millimetres
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FocalLength(pub f64);

impl fmt::Display for FocalLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.fract() == 0.0 {
            write!(f, "{:.0} mm", self.0)
        } else {
            write!(f, "{:.1} mm", self.0)
        }
    }
}

/// Capture timestamp, kept verbatim when it is not in EXIF's `YYYY:MM:DD HH:MM:SS` form
#[derive(Debug, Clone, PartialEq)]
pub enum ShootingDate {
    Parsed(NaiveDateTime),
    Verbatim(String),
}

const EXIF_DATE_FORMAT: &str = "%Y:%m:%d %H:%M:%S";

impl ShootingDate {
    pub fn parse(text: &str) -> Self {
        let text = text.trim();
        match NaiveDateTime::parse_from_str(text, EXIF_DATE_FORMAT) {
            Ok(parsed) => ShootingDate::Parsed(parsed),
            Err(_) => ShootingDate::Verbatim(text.to_string()),
        }
    }
}

impl fmt::Display for ShootingDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShootingDate::Parsed(parsed) => write!(f, "{}", parsed.format("%Y-%m-%d %H:%M:%S")),
            ShootingDate::Verbatim(text) => f.write_str(text),
        }
    }
}

/// Shooting parameters read from EXIF
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CameraMetadata {
    pub model: MetaValue<String>,
    pub iso: MetaValue<u32>,
    pub shutter_speed: MetaValue<ExposureTime>,
    pub aperture: MetaValue<Aperture>,
    pub focal_length: MetaValue<FocalLength>,
    pub shooting_date: MetaValue<ShootingDate>,
}

impl CameraMetadata {
    /// Uses `model` when EXIF carried no camera model of its own.
    pub fn with_fallback_model(mut self, model: &MetaValue<String>) -> Self {
        if !self.model.is_present() {
            self.model = model.clone();
        }
        self
    }
}
