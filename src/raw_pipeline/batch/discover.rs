use std::collections::{HashMap, HashSet};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::raw_pipeline::batch::config::ExtensionAllowList;
use crate::raw_pipeline::common::error::{ExtractError, Result};
use crate::raw_pipeline::output::types::{ArtifactKind, OutputPaths};

/// One RAW file selected for processing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    /// File name without its extension
    pub base_name: String,
    /// Directory holding the file, where its artifacts are written
    pub dir: PathBuf,
}

impl SourceFile {
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let base_name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .ok_or_else(|| ExtractError::InvalidInput(path.clone()))?;
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        Ok(Self { path, base_name, dir })
    }

    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.base_name.clone())
    }

    pub fn output_paths(&self) -> OutputPaths {
        OutputPaths::new(&self.dir, &self.base_name)
    }
}

/// Enumerates the RAW files named by `input`.
///
/// A file must carry an allowed extension. A directory contributes every regular
/// file directly inside it with an allowed extension, sorted by path;
/// subdirectories and other files are skipped.
pub fn discover(input: &Path, extensions: &ExtensionAllowList) -> Result<Vec<SourceFile>> {
    let metadata = fs::metadata(input).map_err(|e| match e.kind() {
        ErrorKind::NotFound => ExtractError::InputNotFound(input.to_path_buf()),
        _ => ExtractError::InputReadError(format!("{}: {}", input.display(), e)),
    })?;

    if metadata.is_file() {
        if !extensions.matches(input) {
            return Err(ExtractError::UnsupportedFormat(format!(
                "{}: extension is not a recognized RAW format",
                input.display()
            )));
        }
        return Ok(vec![SourceFile::new(input)?]);
    }

    if !metadata.is_dir() {
        return Err(ExtractError::InvalidInput(input.to_path_buf()));
    }

    let entries = fs::read_dir(input)
        .map_err(|e| ExtractError::InputReadError(format!("{}: {}", input.display(), e)))?;

    let mut paths = Vec::new();
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable entry in {}: {}", input.display(), e);
                continue;
            }
        };
        let path = entry.path();
        if !path.is_file() {
            debug!("Skipping non-file {}", path.display());
            continue;
        }
        if !extensions.matches(&path) {
            debug!("Skipping non-RAW file {}", path.display());
            continue;
        }
        paths.push(path);
    }
    paths.sort();

    paths.into_iter().map(SourceFile::new).collect()
}

/// File names are compared case-insensitively so that `scan.RAW` and `scan.raw`
/// collide on case-insensitive filesystems too.
fn name_key(dir: &Path, file_name: &str) -> (PathBuf, String) {
    (dir.to_path_buf(), file_name.to_lowercase())
}

/// Checks that every candidate owns its output paths, in candidate order.
///
/// A candidate fails with `OutputConflict` when one of its outputs would land
/// on a candidate source (its own or another one), or when an earlier
/// candidate in the same directory already claimed its base name.
pub fn claim_outputs(candidates: &[SourceFile]) -> Vec<Result<()>> {
    let sources: HashSet<(PathBuf, String)> = candidates
        .iter()
        .map(|source| name_key(&source.dir, &source.file_name()))
        .collect();
    let mut owners: HashMap<(PathBuf, String), String> = HashMap::new();

    candidates
        .iter()
        .map(|source| {
            for kind in ArtifactKind::ALL {
                let output = format!("{}.{}", source.base_name, kind.extension());
                if sources.contains(&name_key(&source.dir, &output)) {
                    return Err(ExtractError::OutputConflict(format!(
                        "{}: {} output would overwrite source {}",
                        source.path.display(),
                        kind,
                        source.dir.join(&output).display()
                    )));
                }
            }

            let key = name_key(&source.dir, &source.base_name);
            if let Some(owner) = owners.get(&key) {
                return Err(ExtractError::OutputConflict(format!(
                    "{}: outputs already claimed by {}",
                    source.path.display(),
                    owner
                )));
            }
            owners.insert(key, source.file_name());
            Ok(())
        })
        .collect()
}
