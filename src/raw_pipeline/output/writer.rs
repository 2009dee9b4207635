use crate::raw_pipeline::output::types::{ArtifactOutcome, OutputPaths, OutputTriple};

/// Writes the artifacts of one source file.
///
/// Every artifact is attempted and reported on its own; a failed write does not
/// remove the artifacts that were already written.
pub trait OutputWriter: Send + Sync {
    fn write_triple(&self, triple: &OutputTriple, paths: &OutputPaths) -> Vec<ArtifactOutcome>;
}
