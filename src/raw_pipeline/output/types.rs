//! Output artifact types

use std::fmt;
use std::path::{Path, PathBuf};

use crate::raw_pipeline::common::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Raw,
    Png,
    Report,
}

impl ArtifactKind {
    pub const ALL: [ArtifactKind; 3] = [ArtifactKind::Raw, ArtifactKind::Png, ArtifactKind::Report];

    pub fn extension(self) -> &'static str {
        match self {
            ArtifactKind::Raw => "raw",
            ArtifactKind::Png => "png",
            ArtifactKind::Report => "txt",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ".{}", self.extension())
    }
}

/// Everything derived from one source file, ready to be written
#[derive(Debug, Clone, PartialEq)]
pub struct OutputTriple {
    /// Sensor bitplane dump
    pub raw: Vec<u8>,
    /// Encoded PNG rendering
    pub png: Vec<u8>,
    /// Text report, only present when info output is enabled
    pub report: Option<String>,
}

impl OutputTriple {
    /// Artifacts in write order with their bytes.
    pub fn artifacts(&self) -> Vec<(ArtifactKind, &[u8])> {
        let mut artifacts = vec![
            (ArtifactKind::Raw, self.raw.as_slice()),
            (ArtifactKind::Png, self.png.as_slice()),
        ];
        if let Some(report) = &self.report {
            artifacts.push((ArtifactKind::Report, report.as_bytes()));
        }
        artifacts
    }
}

/// Destination paths sharing one directory and base name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    dir: PathBuf,
    base_name: String,
}

impl OutputPaths {
    pub fn new(dir: impl Into<PathBuf>, base_name: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            base_name: base_name.into(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path(&self, kind: ArtifactKind) -> PathBuf {
        self.dir.join(format!("{}.{}", self.base_name, kind.extension()))
    }
}

/// Result of writing a single artifact
#[derive(Debug)]
pub struct ArtifactOutcome {
    pub kind: ArtifactKind,
    pub path: PathBuf,
    pub result: Result<()>,
}
