//! Batch orchestration module
//!
//! Input enumeration, the per-file pipeline and the batch loop that drives it.

mod config;
mod discover;
mod pipeline;
mod progress;
mod driver;
mod timing;

#[cfg(test)]
mod tests;

pub use config::{
    ExtensionAllowList, ExtractConfig, ExtractConfigBuilder, Verbosity, DEFAULT_EXTENSIONS,
    DEFAULT_INPUT_PATH, resolve_input,
};
pub use discover::{discover, SourceFile};
pub use pipeline::{DerivedArtifacts, ProcessedFile, RawExtractPipeline};
pub use progress::Reporter;
pub use driver::{BatchDriver, BatchReport, FileFailure, EXIT_FAILURES, EXIT_SUCCESS};
pub use timing::PipelineTimings;
