//! RAW extraction pipeline module
//!
//! This module provides a structured approach to turning RAW camera files into
//! their derived artifacts, with separate modules for RAW decoding, metadata
//! reading, rendering, output writing, and batch orchestration.

pub mod raw;
pub mod metadata;
pub mod render;
pub mod output;
pub mod batch;
pub mod common;

pub use common::{
    ExtractError,
    Result,
};

pub use raw::{
    DecodedRaw,
    RawImageReader,
    RawLoaderReader,
    RawPixelType,
    RawSamples,
    CfaDescriptor,
    extract_bitplane,
};

pub use metadata::{
    CameraMetadata,
    ExifReader,
    ExposureTime,
    MetaValue,
    SensorInfo,
    NOT_AVAILABLE,
};

pub use render::{
    DevelopRenderer,
    ImageRenderer,
    RenderMode,
    RgbImage8,
};

pub use output::{
    AtomicFileWriter,
    ArtifactKind,
    ArtifactOutcome,
    OutputPaths,
    OutputTriple,
    OutputWriter,
    encode_png,
};

pub use batch::{
    BatchDriver,
    BatchReport,
    ExtensionAllowList,
    ExtractConfig,
    ExtractConfigBuilder,
    FileFailure,
    RawExtractPipeline,
    Reporter,
    SourceFile,
    Verbosity,
    DEFAULT_INPUT_PATH,
    discover,
    resolve_input,
};

#[cfg(test)]
pub(crate) mod test_support;
