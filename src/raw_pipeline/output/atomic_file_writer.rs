use std::io::Write;
use std::path::Path;

use tempfile::Builder;
use tracing::{debug, error};

use crate::raw_pipeline::common::error::{ExtractError, Result};
use crate::raw_pipeline::output::types::{ArtifactOutcome, OutputPaths, OutputTriple};
use crate::raw_pipeline::output::writer::OutputWriter;

/// Writes each artifact to a temporary file in the destination directory and
/// renames it into place, so a final path never holds a partial file.
pub struct AtomicFileWriter;

impl OutputWriter for AtomicFileWriter {
    fn write_triple(&self, triple: &OutputTriple, paths: &OutputPaths) -> Vec<ArtifactOutcome> {
        triple
            .artifacts()
            .into_iter()
            .map(|(kind, bytes)| {
                let path = paths.path(kind);
                let result = write_atomic(paths.dir(), &path, bytes);
                match &result {
                    Ok(()) => debug!("Wrote {} ({} bytes)", path.display(), bytes.len()),
                    Err(e) => error!("Failed to write {} artifact: {}", kind, e),
                }
                ArtifactOutcome { kind, path, result }
            })
            .collect()
    }
}

fn write_atomic(dir: &Path, path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = if dir.as_os_str().is_empty() { Path::new(".") } else { dir };
    let output_error = |e: &dyn std::fmt::Display| {
        ExtractError::OutputWriteError(format!("{}: {}", path.display(), e))
    };

    let mut tmp = Builder::new()
        .prefix(".rawdump-")
        .suffix(".part")
        .tempfile_in(dir)
        .map_err(|e| output_error(&e))?;

    tmp.write_all(bytes).map_err(|e| output_error(&e))?;
    tmp.flush().map_err(|e| output_error(&e))?;
    tmp.persist(path).map_err(|e| output_error(&e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raw_pipeline::output::types::ArtifactKind;

    fn triple(report: Option<&str>) -> OutputTriple {
        OutputTriple {
            raw: vec![0xde, 0xad, 0xbe, 0xef],
            png: b"\x89PNG fake".to_vec(),
            report: report.map(str::to_string),
        }
    }

    #[test]
    fn test_writes_all_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let paths = OutputPaths::new(dir.path(), "IMG_0001");

        let outcomes = AtomicFileWriter.write_triple(&triple(Some("report\n")), &paths);

        assert_eq!(outcomes.len(), 3);
        assert!(outcomes.iter().all(|o| o.result.is_ok()));
        assert_eq!(std::fs::read(paths.path(ArtifactKind::Raw)).unwrap(), vec![0xde, 0xad, 0xbe, 0xef]);
        assert_eq!(std::fs::read_to_string(paths.path(ArtifactKind::Report)).unwrap(), "report\n");

        let leftovers = std::fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".part"))
            .count();
        assert_eq!(leftovers, 0);
    }

    #[test]
    fn test_overwrites_existing_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let paths = OutputPaths::new(dir.path(), "IMG_0002");
        std::fs::write(paths.path(ArtifactKind::Raw), b"stale contents that are longer").unwrap();

        AtomicFileWriter.write_triple(&triple(None), &paths);

        assert_eq!(std::fs::read(paths.path(ArtifactKind::Raw)).unwrap().len(), 4);
        assert!(!paths.path(ArtifactKind::Report).exists());
    }

    #[test]
    fn test_missing_directory_fails_per_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let paths = OutputPaths::new(dir.path().join("missing"), "IMG_0003");

        let outcomes = AtomicFileWriter.write_triple(&triple(Some("x")), &paths);

        assert_eq!(outcomes.len(), 3);
        assert!(outcomes
            .iter()
            .all(|o| matches!(o.result, Err(ExtractError::OutputWriteError(_)))));
    }
}
