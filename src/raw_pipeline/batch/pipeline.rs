use std::path::PathBuf;

use tracing::{debug, info, instrument, warn};

use crate::raw_pipeline::{
    batch::{config::ExtractConfig, discover::SourceFile, timing::PipelineTimings},
    common::error::{ExtractError, Result},
    metadata::{report, CameraMetadata, ExifReader, SensorInfo},
    output::{encode_png, AtomicFileWriter, OutputTriple, OutputWriter},
    raw::{extract_bitplane, DecodedRaw, RawImageReader, RawLoaderReader},
    render::{DevelopRenderer, ImageRenderer},
};

/// Artifacts and metadata derived in memory from one RAW file
#[derive(Debug)]
pub struct DerivedArtifacts {
    pub triple: OutputTriple,
    pub sensor: SensorInfo,
    pub camera: CameraMetadata,
}

/// A source whose artifacts were all written
#[derive(Debug)]
pub struct ProcessedFile {
    pub source: SourceFile,
    pub sensor: SensorInfo,
    pub camera: CameraMetadata,
    pub written: Vec<PathBuf>,
}

/// Per-file pipeline: decode, read metadata, extract, render, encode, write.
///
/// Every artifact is derived before anything touches the disk, so a file that
/// fails to decode or render leaves no outputs behind.
pub struct RawExtractPipeline<R: RawImageReader, G: ImageRenderer, W: OutputWriter> {
    reader: R,
    renderer: G,
    writer: W,
    exif: ExifReader,
    config: ExtractConfig,
}

impl RawExtractPipeline<RawLoaderReader, DevelopRenderer, AtomicFileWriter> {
    pub fn new(config: ExtractConfig) -> Self {
        Self {
            reader: RawLoaderReader,
            renderer: DevelopRenderer,
            writer: AtomicFileWriter,
            exif: ExifReader,
            config,
        }
    }
}

impl<R: RawImageReader, G: ImageRenderer, W: OutputWriter> RawExtractPipeline<R, G, W> {
    pub fn with_custom(reader: R, renderer: G, writer: W, config: ExtractConfig) -> Self {
        Self {
            reader,
            renderer,
            writer,
            exif: ExifReader,
            config,
        }
    }

    fn validate_dimensions(&self, raw: &DecodedRaw) -> Result<()> {
        if !self.config.validate_dimensions {
            return Ok(());
        }

        let (width, height) = (raw.width, raw.height);
        if width == 0 || height == 0 {
            return Err(ExtractError::InvalidDimensions(width, height));
        }

        if let Some(max) = self.config.max_dimension {
            if width > max || height > max {
                warn!(
                    "Image dimensions {}x{} exceed maximum {}",
                    width, height, max
                );
                return Err(ExtractError::InvalidDimensions(width, height));
            }
        }

        if raw.samples.len() != raw.expected_samples() {
            warn!(
                "Sample buffer holds {} values, expected {}",
                raw.samples.len(),
                raw.expected_samples()
            );
            return Err(ExtractError::InvalidDimensions(width, height));
        }

        Ok(())
    }

    /// Derives every artifact of one RAW file from its bytes without writing anything.
    #[instrument(skip(self, input_data), fields(input_size = input_data.len()))]
    pub fn derive(&self, input_data: &[u8]) -> Result<DerivedArtifacts> {
        let mut timings = PipelineTimings::new();

        let raw_image = timings.time("decode_raw", || self.reader.read_raw(input_data))?;

        {
            let _span = tracing::info_span!("validate_dimensions",
                width = raw_image.width,
                height = raw_image.height
            ).entered();
            self.validate_dimensions(&raw_image)?;
        }

        let sensor = SensorInfo::from_decoded(&raw_image);
        let camera = timings
            .time("read_exif", || self.exif.read_metadata(input_data))
            .with_fallback_model(&sensor.camera_model);

        let raw = timings.time("extract_bitplane", || extract_bitplane(&raw_image));

        let rendered = {
            let _span = tracing::info_span!("render").entered();
            timings.time("render", || self.renderer.render(&raw_image, self.config.render_mode))?
        };
        drop(raw_image);

        let png = timings.time("encode_png", || encode_png(&rendered))?;

        let report = self
            .config
            .save_info
            .then(|| report::format_report(&sensor, &camera));

        debug!("{}", timings.summary());

        Ok(DerivedArtifacts {
            triple: OutputTriple { raw, png, report },
            sensor,
            camera,
        })
    }

    /// Runs the whole pipeline for one source file.
    #[instrument(skip(self, source), fields(file = %source.path.display()))]
    pub fn process(&self, source: &SourceFile) -> Result<ProcessedFile> {
        info!("Processing {}", source.path.display());

        let input_data = {
            let _span = tracing::info_span!("read_input_file").entered();
            std::fs::read(&source.path).map_err(|e| {
                ExtractError::InputReadError(format!("{}: {}", source.path.display(), e))
            })?
        };

        let DerivedArtifacts { triple, sensor, camera } = self.derive(&input_data)?;
        drop(input_data);

        let outcomes = {
            let _span = tracing::info_span!("write_outputs").entered();
            self.writer.write_triple(&triple, &source.output_paths())
        };

        let mut written = Vec::new();
        let mut failed = Vec::new();
        for outcome in outcomes {
            match outcome.result {
                Ok(()) => written.push(outcome.path),
                Err(e) => failed.push(format!("{} ({})", outcome.kind, e)),
            }
        }

        if !failed.is_empty() {
            return Err(ExtractError::OutputWriteError(failed.join("; ")));
        }

        info!(
            width = sensor.width,
            height = sensor.height,
            artifacts = written.len(),
            "Extraction complete"
        );

        Ok(ProcessedFile {
            source: source.clone(),
            sensor,
            camera,
            written,
        })
    }

    pub fn config(&self) -> &ExtractConfig {
        &self.config
    }
}
