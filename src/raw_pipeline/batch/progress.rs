use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::raw_pipeline::batch::config::Verbosity;
use crate::raw_pipeline::batch::discover::SourceFile;
use crate::raw_pipeline::batch::driver::BatchReport;
use crate::raw_pipeline::batch::pipeline::ProcessedFile;
use crate::raw_pipeline::common::error::Result;
use crate::raw_pipeline::metadata::report;

/// Console reporting for a batch run
///
/// All output goes through one mutex-guarded writer so lines from parallel
/// workers never interleave.
pub struct Reporter {
    verbosity: Verbosity,
    total: AtomicUsize,
    done: AtomicUsize,
    out: Mutex<Box<dyn Write + Send>>,
}

impl Reporter {
    pub fn new(verbosity: Verbosity, out: Box<dyn Write + Send>) -> Self {
        Self {
            verbosity,
            total: AtomicUsize::new(0),
            done: AtomicUsize::new(0),
            out: Mutex::new(out),
        }
    }

    pub fn stdout(verbosity: Verbosity) -> Self {
        Self::new(verbosity, Box::new(std::io::stdout()))
    }

    pub fn start(&self, total: usize) {
        self.total.store(total, Ordering::SeqCst);
        self.done.store(0, Ordering::SeqCst);
    }

    pub fn file_done(&self, source: &SourceFile, outcome: &Result<ProcessedFile>) {
        let done = self.done.fetch_add(1, Ordering::SeqCst) + 1;
        let total = self.total.load(Ordering::SeqCst).max(done);

        match self.verbosity {
            Verbosity::Silent => {}
            Verbosity::Progress => {
                let status = if outcome.is_ok() { "done" } else { "FAILED" };
                let width = total.to_string().len();
                self.emit(&format!(
                    "[{:>width$}/{}] {:>3}% {} {}\n",
                    done,
                    total,
                    done * 100 / total,
                    source.file_name(),
                    status,
                    width = width
                ));
            }
            Verbosity::Info => match outcome {
                Ok(processed) => self.emit(&report::format_console_block(
                    &source.file_name(),
                    &processed.sensor,
                    &processed.camera,
                )),
                Err(e) => self.emit(&format!("==> {} <==\nFAILED: {}\n\n", source.file_name(), e)),
            },
        }
    }

    pub fn finish(&self, report: &BatchReport) {
        if self.verbosity == Verbosity::Silent {
            return;
        }
        self.emit(&format!(
            "Processed {} of {} file(s), {} failed\n",
            report.processed.len(),
            report.candidates,
            report.failures.len()
        ));
    }

    fn emit(&self, text: &str) {
        let mut out = match self.out.lock() {
            Ok(out) => out,
            Err(poisoned) => poisoned.into_inner(),
        };
        // console output is best effort, a closed pipe must not fail the batch
        let _ = out.write_all(text.as_bytes());
        let _ = out.flush();
    }
}
