use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::{error, info, instrument, warn};

use crate::raw_pipeline::{
    batch::{
        config::ExtractConfig,
        discover::{claim_outputs, discover, SourceFile},
        pipeline::{ProcessedFile, RawExtractPipeline},
        progress::Reporter,
    },
    common::error::Result,
    output::{AtomicFileWriter, OutputWriter},
    raw::{RawImageReader, RawLoaderReader},
    render::{DevelopRenderer, ImageRenderer},
};

/// Exit status of a batch where every candidate succeeded
pub const EXIT_SUCCESS: u8 = 0;
/// Exit status of a batch where at least one candidate failed
pub const EXIT_FAILURES: u8 = 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFailure {
    pub path: PathBuf,
    pub error: String,
}

/// Outcome of a batch run, in candidate order
#[derive(Debug, Default)]
pub struct BatchReport {
    pub candidates: usize,
    /// Sources whose artifacts were all written
    pub processed: Vec<PathBuf>,
    pub failures: Vec<FileFailure>,
}

impl BatchReport {
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    pub fn exit_code(&self) -> u8 {
        if self.has_failures() { EXIT_FAILURES } else { EXIT_SUCCESS }
    }

    fn record(&mut self, path: PathBuf, outcome: Result<ProcessedFile>) {
        match outcome {
            Ok(_) => self.processed.push(path),
            Err(e) => self.failures.push(FileFailure {
                path,
                error: e.to_string(),
            }),
        }
    }
}

/// Runs the per-file pipeline over every RAW file of an input path.
///
/// Per-file failures are logged and recorded; they never stop the batch.
pub struct BatchDriver<R: RawImageReader, G: ImageRenderer, W: OutputWriter> {
    pipeline: RawExtractPipeline<R, G, W>,
}

impl BatchDriver<RawLoaderReader, DevelopRenderer, AtomicFileWriter> {
    pub fn new(config: ExtractConfig) -> Self {
        Self {
            pipeline: RawExtractPipeline::new(config),
        }
    }
}

impl<R: RawImageReader, G: ImageRenderer, W: OutputWriter> BatchDriver<R, G, W> {
    pub fn with_pipeline(pipeline: RawExtractPipeline<R, G, W>) -> Self {
        Self { pipeline }
    }

    pub fn config(&self) -> &ExtractConfig {
        self.pipeline.config()
    }

    #[instrument(skip(self, input, reporter), fields(input = %input.display()))]
    pub fn run(&self, input: &Path, reporter: &Reporter) -> BatchReport {
        let mut report = BatchReport::default();

        let candidates = match discover(input, &self.config().extensions) {
            Ok(candidates) => candidates,
            Err(e) => {
                error!("{}", e);
                report.candidates = 1;
                report.record(input.to_path_buf(), Err(e));
                reporter.finish(&report);
                return report;
            }
        };

        report.candidates = candidates.len();
        reporter.start(candidates.len());
        info!(count = candidates.len(), "Found RAW files");

        let work: Vec<(&SourceFile, Result<()>)> =
            candidates.iter().zip(claim_outputs(&candidates)).collect();

        let jobs = self.config().jobs;
        let outcomes = if jobs > 1 && work.len() > 1 {
            match rayon::ThreadPoolBuilder::new().num_threads(jobs).build() {
                Ok(pool) => pool.install(|| {
                    work.into_par_iter()
                        .map(|(source, claim)| self.process_one(source, claim, reporter))
                        .collect::<Vec<_>>()
                }),
                Err(e) => {
                    warn!("Could not start {} workers, processing sequentially: {}", jobs, e);
                    self.process_sequential(work, reporter)
                }
            }
        } else {
            self.process_sequential(work, reporter)
        };

        for (path, outcome) in outcomes {
            report.record(path, outcome);
        }

        if report.has_failures() {
            error!(
                failed = report.failures.len(),
                total = report.candidates,
                "Batch finished with failures"
            );
        } else {
            info!(total = report.candidates, "Batch finished");
        }
        reporter.finish(&report);
        report
    }

    fn process_sequential(
        &self,
        work: Vec<(&SourceFile, Result<()>)>,
        reporter: &Reporter,
    ) -> Vec<(PathBuf, Result<ProcessedFile>)> {
        work.into_iter()
            .map(|(source, claim)| self.process_one(source, claim, reporter))
            .collect()
    }

    /// Candidates whose outputs are not theirs to write are failed without being read.
    fn process_one(
        &self,
        source: &SourceFile,
        claim: Result<()>,
        reporter: &Reporter,
    ) -> (PathBuf, Result<ProcessedFile>) {
        let outcome = claim.and_then(|()| self.pipeline.process(source));
        if let Err(e) = &outcome {
            error!(file = %source.path.display(), "{}", e);
        }
        reporter.file_done(source, &outcome);
        (source.path.clone(), outcome)
    }
}
