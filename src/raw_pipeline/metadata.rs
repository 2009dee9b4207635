//! Metadata module
//!
//! Camera metadata comes from the EXIF block embedded in the RAW container,
//! sensor metadata from the decoded RAW header. Both end up in the fixed-schema
//! text report.

mod exif_reader;
mod sensor;
pub mod report;
pub mod types;

pub use exif_reader::ExifReader;
pub use sensor::SensorInfo;
pub use types::{Aperture, CameraMetadata, ExposureTime, FocalLength, MetaValue, ShootingDate, NOT_AVAILABLE};
