use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tracing_subscriber::EnvFilter;

use crate::logger;
use crate::raw_pipeline::batch::config::{ExtensionAllowList, ExtractConfig, Verbosity};
use crate::raw_pipeline::batch::discover::SourceFile;
use crate::raw_pipeline::batch::driver::{BatchDriver, BatchReport, EXIT_FAILURES, EXIT_SUCCESS};
use crate::raw_pipeline::batch::pipeline::RawExtractPipeline;
use crate::raw_pipeline::batch::progress::Reporter;
use crate::raw_pipeline::common::error::{ExtractError, Result};
use crate::raw_pipeline::output::{
    ArtifactKind, ArtifactOutcome, AtomicFileWriter, OutputPaths, OutputTriple, OutputWriter,
};
use crate::raw_pipeline::raw::{DecodedRaw, RawImageReader, RawSamples};
use crate::raw_pipeline::render::{ImageRenderer, RenderMode, RgbImage8};
use crate::raw_pipeline::test_support::{sample_raw, SAMPLE_HEIGHT, SAMPLE_WIDTH};

struct MockReader {
    mock_data: Option<DecodedRaw>,
}

impl RawImageReader for MockReader {
    fn read_raw(&self, data: &[u8]) -> Result<DecodedRaw> {
        if data.starts_with(b"corrupt") {
            return Err(ExtractError::DecodeError("Mock decode error".to_string()));
        }
        let mut raw = self.mock_data.clone().unwrap_or_else(sample_raw);
        if let RawSamples::Integer(values) = &mut raw.samples {
            for (value, byte) in values.iter_mut().zip(data) {
                *value = *byte as u16 * 16;
            }
        }
        Ok(raw)
    }
}

struct MockRenderer {
    should_fail: bool,
}

impl ImageRenderer for MockRenderer {
    fn render(&self, raw: &DecodedRaw, _mode: RenderMode) -> Result<RgbImage8> {
        if self.should_fail {
            return Err(ExtractError::RenderError("Mock render error".to_string()));
        }
        Ok(RgbImage8 {
            width: raw.width,
            height: raw.height,
            data: vec![128; raw.width * raw.height * 3],
        })
    }
}

/// Pretends every PNG write fails and never touches the disk.
struct FailingPngWriter;

impl OutputWriter for FailingPngWriter {
    fn write_triple(&self, triple: &OutputTriple, paths: &OutputPaths) -> Vec<ArtifactOutcome> {
        triple
            .artifacts()
            .into_iter()
            .map(|(kind, _)| ArtifactOutcome {
                kind,
                path: paths.path(kind),
                result: match kind {
                    ArtifactKind::Png => Err(ExtractError::OutputWriteError("disk full".to_string())),
                    _ => Ok(()),
                },
            })
            .collect()
    }
}

#[derive(Clone, Default)]
struct SharedBuf(Arc<Mutex<Vec<u8>>>);

impl SharedBuf {
    fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn mock_driver(config: ExtractConfig) -> BatchDriver<MockReader, MockRenderer, AtomicFileWriter> {
    BatchDriver::with_pipeline(RawExtractPipeline::with_custom(
        MockReader { mock_data: None },
        MockRenderer { should_fail: false },
        AtomicFileWriter,
        config,
    ))
}

fn info_config() -> ExtractConfig {
    ExtractConfig::builder().save_info(true).build()
}

fn run(driver_config: ExtractConfig, input: &Path) -> (BatchReport, String) {
    let out = SharedBuf::default();
    let reporter = Reporter::new(driver_config.verbosity, Box::new(out.clone()));
    let report = mock_driver(driver_config).run(input, &reporter);
    (report, out.contents())
}

fn write_file(dir: &Path, name: &str, contents: &[u8]) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}

fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn test_directory_yields_one_triple_per_raw_file() {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "a.CR2", b"first frame");
    write_file(dir.path(), "b.NEF", b"second frame");
    write_file(dir.path(), "notes.txt", b"not a raw");
    write_file(dir.path(), "pic.jpg", b"not a raw either");

    let (report, _) = run(info_config(), dir.path());

    assert_eq!(report.candidates, 2);
    assert_eq!(report.processed.len(), 2);
    assert!(!report.has_failures());
    assert_eq!(report.exit_code(), EXIT_SUCCESS);
    assert_eq!(
        file_names(dir.path()),
        vec![
            "a.CR2", "a.png", "a.raw", "a.txt",
            "b.NEF", "b.png", "b.raw", "b.txt",
            "notes.txt", "pic.jpg",
        ]
    );
}

#[test]
fn test_corrupt_file_does_not_abort_batch() {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "bad.CR2", b"corrupt header");
    write_file(dir.path(), "good.CR2", b"valid frame");

    let (report, _) = run(info_config(), dir.path());

    assert_eq!(report.candidates, 2);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].path, dir.path().join("bad.CR2"));
    assert!(report.failures[0].error.contains("Mock decode error"));
    assert_eq!(report.exit_code(), EXIT_FAILURES);

    for ext in ["raw", "png", "txt"] {
        assert!(dir.path().join(format!("good.{}", ext)).exists());
        assert!(!dir.path().join(format!("bad.{}", ext)).exists());
    }
}

#[test]
fn test_raw_dump_size_and_determinism() {
    let dir = tempfile::tempdir().unwrap();
    let source = write_file(dir.path(), "IMG_0001.ARW", b"some sensor bytes");

    run(info_config(), &source);
    let raw_first = fs::read(dir.path().join("IMG_0001.raw")).unwrap();
    let txt_first = fs::read(dir.path().join("IMG_0001.txt")).unwrap();

    run(info_config(), &source);
    let raw_second = fs::read(dir.path().join("IMG_0001.raw")).unwrap();
    let txt_second = fs::read(dir.path().join("IMG_0001.txt")).unwrap();

    assert_eq!(raw_first.len(), SAMPLE_WIDTH * SAMPLE_HEIGHT * 2);
    assert_eq!(raw_first, raw_second);
    assert_eq!(txt_first, txt_second);
}

#[test]
fn test_report_written_only_with_info_flag() {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "IMG_0002.CR2", b"frame");

    let (report, _) = run(ExtractConfig::default(), dir.path());

    assert_eq!(report.processed.len(), 1);
    assert!(dir.path().join("IMG_0002.raw").exists());
    assert!(dir.path().join("IMG_0002.png").exists());
    assert!(!dir.path().join("IMG_0002.txt").exists());
}

#[test]
fn test_report_file_contents() {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "IMG_0003.CR2", b"frame");

    run(info_config(), dir.path());

    let text = fs::read_to_string(dir.path().join("IMG_0003.txt")).unwrap();
    assert!(text.starts_with("RAW image information:\nSize: (H: 6, W: 8)\n"));
    assert!(text.contains("\nCamera information:\n"));
    assert!(text.contains("Camera_model: Canon EOS 5D\n"));
    assert!(text.contains("\nCamera information:\nCamera_model: Canon EOS 5D\nISO: N/A\n"));
    assert!(text.contains("Shooting_date: N/A\n"));
}

#[test]
fn test_silent_run_prints_nothing() {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "IMG_0004.CR2", b"frame");

    let (report, console) = run(info_config(), dir.path());

    assert!(!report.has_failures());
    assert_eq!(console, "");
}

fn run_with_logs(config: ExtractConfig, input: &Path) -> (BatchReport, String) {
    let logs = SharedBuf::default();
    let writer = logs.clone();
    let filter = EnvFilter::new(logger::default_directive(config.verbosity));
    let subscriber = logger::subscriber(filter, move || writer.clone());

    let (report, _) = tracing::subscriber::with_default(subscriber, || run(config, input));
    (report, logs.contents())
}

#[test]
fn test_silent_run_logs_nothing_on_success() {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "IMG_0007.CR2", b"frame");

    let (report, logs) = run_with_logs(info_config(), dir.path());

    assert!(!report.has_failures());
    assert_eq!(logs, "");
}

#[test]
fn test_silent_run_logs_failures() {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "IMG_0008.CR2", b"frame");
    write_file(dir.path(), "IMG_0009.CR2", b"corrupt");

    let (report, logs) = run_with_logs(info_config(), dir.path());

    assert_eq!(report.failures.len(), 1);
    assert!(logs.contains("ERROR"));
    assert!(logs.contains("IMG_0009.CR2"));
    assert!(!logs.contains("IMG_0008.CR2"));
}

#[test]
fn test_progress_verbosity_prints_one_line_per_file() {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "a.CR2", b"frame");
    write_file(dir.path(), "b.CR2", b"corrupt");

    let config = ExtractConfig::builder().verbosity(Verbosity::Progress).build();
    let (_, console) = run(config, dir.path());

    let lines: Vec<&str> = console.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "[1/2]  50% a.CR2 done");
    assert_eq!(lines[1], "[2/2] 100% b.CR2 FAILED");
    assert_eq!(lines[2], "Processed 1 of 2 file(s), 1 failed");
}

#[test]
fn test_info_verbosity_prints_model_and_size() {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "a.CR2", b"frame one");
    write_file(dir.path(), "b.CR2", b"frame two");

    let config = ExtractConfig::builder().verbosity(Verbosity::Info).build();
    let (_, console) = run(config, dir.path());

    assert!(console.contains("==> a.CR2 <=="));
    assert!(console.contains("==> b.CR2 <=="));
    assert_eq!(console.matches("Camera_model: Canon EOS 5D").count(), 4);
    assert_eq!(console.matches("Size: (H: 6, W: 8)").count(), 2);
}

#[test]
fn test_parallel_run_matches_sequential() {
    let sequential = tempfile::tempdir().unwrap();
    let parallel = tempfile::tempdir().unwrap();
    for i in 0..6 {
        let contents = format!("frame number {}", i);
        write_file(sequential.path(), &format!("IMG_{:04}.NEF", i), contents.as_bytes());
        write_file(parallel.path(), &format!("IMG_{:04}.NEF", i), contents.as_bytes());
    }

    let (seq_report, _) = run(info_config(), sequential.path());
    let (par_report, _) = run(ExtractConfig::builder().save_info(true).jobs(4).build(), parallel.path());

    assert_eq!(seq_report.processed.len(), 6);
    assert_eq!(par_report.processed.len(), 6);
    assert_eq!(file_names(sequential.path()), file_names(parallel.path()));
    for i in 0..6 {
        let name = format!("IMG_{:04}.raw", i);
        assert_eq!(
            fs::read(sequential.path().join(&name)).unwrap(),
            fs::read(parallel.path().join(&name)).unwrap()
        );
    }
}

#[test]
fn test_source_is_never_overwritten_by_its_own_dump() {
    let dir = tempfile::tempdir().unwrap();
    let source = write_file(dir.path(), "scan.raw", b"original sensor bytes");

    let config = ExtractConfig::builder()
        .extensions(ExtensionAllowList::new(["raw"]))
        .build();
    let (report, _) = run(config, &source);

    assert_eq!(report.failures.len(), 1);
    assert!(report.failures[0].error.starts_with("Output conflict"));
    assert_eq!(report.exit_code(), EXIT_FAILURES);
    assert_eq!(fs::read(&source).unwrap(), b"original sensor bytes");
    assert_eq!(file_names(dir.path()), vec!["scan.raw"]);
}

#[test]
fn test_shared_base_name_keeps_first_source_outputs() {
    for jobs in [1, 4] {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "x.CR2", b"canon frame");
        write_file(dir.path(), "x.NEF", b"nikon frame");
        write_file(dir.path(), "y.NEF", b"other frame");

        let config = ExtractConfig::builder().save_info(true).jobs(jobs).build();
        let (report, _) = run(config, dir.path());

        assert_eq!(report.candidates, 3);
        assert_eq!(
            report.processed,
            vec![dir.path().join("x.CR2"), dir.path().join("y.NEF")]
        );
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].path, dir.path().join("x.NEF"));
        assert_eq!(report.exit_code(), EXIT_FAILURES);

        let dump = fs::read(dir.path().join("x.raw")).unwrap();
        assert_eq!(&dump[..2], &(b'c' as u16 * 16).to_ne_bytes());
    }
}

#[test]
fn test_missing_input_is_one_failure() {
    let dir = tempfile::tempdir().unwrap();

    let (report, _) = run(ExtractConfig::default(), &dir.path().join("missing"));

    assert_eq!(report.candidates, 1);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.exit_code(), EXIT_FAILURES);
}

#[test]
fn test_unsupported_single_file_is_one_failure() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "holiday.jpg", b"jpeg");

    let (report, _) = run(ExtractConfig::default(), &path);

    assert_eq!(report.failures.len(), 1);
    assert!(report.failures[0].error.starts_with("Unsupported format"));
    assert_eq!(file_names(dir.path()), vec!["holiday.jpg"]);
}

#[test]
fn test_empty_directory_succeeds() {
    let dir = tempfile::tempdir().unwrap();

    let (report, _) = run(ExtractConfig::default(), dir.path());

    assert_eq!(report.candidates, 0);
    assert_eq!(report.exit_code(), EXIT_SUCCESS);
}

#[test]
fn test_render_failure_leaves_no_outputs() {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "IMG_0005.CR2", b"frame");

    let driver = BatchDriver::with_pipeline(RawExtractPipeline::with_custom(
        MockReader { mock_data: None },
        MockRenderer { should_fail: true },
        AtomicFileWriter,
        info_config(),
    ));
    let report = driver.run(dir.path(), &Reporter::new(Verbosity::Silent, Box::new(io::sink())));

    assert_eq!(report.failures.len(), 1);
    assert_eq!(file_names(dir.path()), vec!["IMG_0005.CR2"]);
}

#[test]
fn test_write_failure_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let source = SourceFile::new(write_file(dir.path(), "IMG_0006.CR2", b"frame")).unwrap();

    let pipeline = RawExtractPipeline::with_custom(
        MockReader { mock_data: None },
        MockRenderer { should_fail: false },
        FailingPngWriter,
        info_config(),
    );
    let result = pipeline.process(&source);

    match result {
        Err(ExtractError::OutputWriteError(message)) => {
            assert!(message.contains(".png"));
            assert!(message.contains("disk full"));
        }
        other => panic!("expected an output error, got {:?}", other),
    }
}

#[test]
fn test_derive_builds_full_triple() {
    let pipeline = RawExtractPipeline::with_custom(
        MockReader { mock_data: None },
        MockRenderer { should_fail: false },
        AtomicFileWriter,
        info_config(),
    );

    let derived = pipeline.derive(b"frame").unwrap();

    assert_eq!(derived.triple.raw.len(), SAMPLE_WIDTH * SAMPLE_HEIGHT * 2);
    assert_eq!(&derived.triple.png[..4], b"\x89PNG");
    assert!(derived.triple.report.is_some());
    assert_eq!((derived.sensor.height, derived.sensor.width), (SAMPLE_HEIGHT, SAMPLE_WIDTH));
}

#[test]
fn test_dimension_validation_zero_size() {
    let mut raw = sample_raw();
    raw.width = 0;
    raw.samples = RawSamples::Integer(vec![]);

    let pipeline = RawExtractPipeline::with_custom(
        MockReader { mock_data: Some(raw) },
        MockRenderer { should_fail: false },
        AtomicFileWriter,
        ExtractConfig::default(),
    );

    let result = pipeline.derive(b"frame");
    assert!(matches!(result, Err(ExtractError::InvalidDimensions(0, 6))));
}

#[test]
fn test_dimension_validation_failure() {
    let pipeline = RawExtractPipeline::with_custom(
        MockReader { mock_data: None },
        MockRenderer { should_fail: false },
        AtomicFileWriter,
        ExtractConfig::builder().max_dimension(Some(4)).build(),
    );

    let result = pipeline.derive(b"frame");
    assert!(matches!(result, Err(ExtractError::InvalidDimensions(8, 6))));
}

#[test]
fn test_sample_count_mismatch_is_rejected() {
    let mut raw = sample_raw();
    raw.samples = RawSamples::Integer(vec![0; 10]);

    let pipeline = RawExtractPipeline::with_custom(
        MockReader { mock_data: Some(raw) },
        MockRenderer { should_fail: false },
        AtomicFileWriter,
        ExtractConfig::default(),
    );

    assert!(matches!(pipeline.derive(b"frame"), Err(ExtractError::InvalidDimensions(_, _))));
}

#[test]
fn test_dimension_validation_disabled() {
    let pipeline = RawExtractPipeline::with_custom(
        MockReader { mock_data: None },
        MockRenderer { should_fail: false },
        AtomicFileWriter,
        ExtractConfig::builder()
            .validate_dimensions(false)
            .max_dimension(Some(4))
            .build(),
    );

    assert!(pipeline.derive(b"frame").is_ok());
}
