use std::path::{Path, PathBuf};

use crate::raw_pipeline::common::error::{ExtractError, Result};
use crate::raw_pipeline::render::types::RenderMode;

/// Input used when none is given on the command line. Unset by default, so a
/// missing `--file` is a configuration error.
pub const DEFAULT_INPUT_PATH: Option<&str> = None;

/// RAW container extensions accepted out of the box
pub const DEFAULT_EXTENSIONS: [&str; 21] = [
    "3FR", "ARW", "CR2", "CRW", "DCR", "DNG", "ERF", "IIQ", "KDC", "MEF", "MOS",
    "MRW", "NEF", "NRW", "ORF", "PEF", "RAF", "RW2", "SRF", "SR2", "SRW",
];

/// Console output level
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    /// Nothing on the console for a successful run
    #[default]
    Silent,
    /// One progress line per file
    Progress,
    /// Extracted RAW and camera information per file
    Info,
}

impl Verbosity {
    pub fn from_level(level: u8) -> Option<Self> {
        match level {
            0 => Some(Verbosity::Silent),
            1 => Some(Verbosity::Progress),
            2 => Some(Verbosity::Info),
            _ => None,
        }
    }
}

/// Case-insensitive allow-list of RAW file extensions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionAllowList(Vec<String>);

impl ExtensionAllowList {
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut list: Vec<String> = extensions
            .into_iter()
            .map(|e| e.as_ref().trim().trim_start_matches('.').to_ascii_uppercase())
            .filter(|e| !e.is_empty())
            .collect();
        list.sort();
        list.dedup();
        Self(list)
    }

    pub fn matches(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| self.0.iter().any(|allowed| allowed.eq_ignore_ascii_case(e)))
            .unwrap_or(false)
    }
}

impl Default for ExtensionAllowList {
    fn default() -> Self {
        Self::new(DEFAULT_EXTENSIONS)
    }
}

/// Configuration for a batch extraction run
#[derive(Debug, Clone)]
pub struct ExtractConfig {
    pub verbosity: Verbosity,
    /// Whether to write the `.txt` report
    pub save_info: bool,
    /// Number of files processed in parallel
    pub jobs: usize,
    pub render_mode: RenderMode,
    pub extensions: ExtensionAllowList,
    /// Whether to validate image dimensions before deriving artifacts
    pub validate_dimensions: bool,
    pub max_dimension: Option<usize>,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            verbosity: Verbosity::Silent,
            save_info: false,
            jobs: 1,
            render_mode: RenderMode::Color,
            extensions: ExtensionAllowList::default(),
            validate_dimensions: true,
            max_dimension: Some(50000),
        }
    }
}

impl ExtractConfig {
    pub fn builder() -> ExtractConfigBuilder {
        ExtractConfigBuilder::default()
    }
}

/// Builder for ExtractConfig
#[derive(Default)]
pub struct ExtractConfigBuilder {
    verbosity: Option<Verbosity>,
    save_info: Option<bool>,
    jobs: Option<usize>,
    render_mode: Option<RenderMode>,
    extensions: Option<ExtensionAllowList>,
    validate_dimensions: Option<bool>,
    max_dimension: Option<Option<usize>>,
}

impl ExtractConfigBuilder {
    pub fn verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = Some(verbosity);
        self
    }

    pub fn save_info(mut self, enable: bool) -> Self {
        self.save_info = Some(enable);
        self
    }

    pub fn jobs(mut self, jobs: usize) -> Self {
        self.jobs = Some(jobs);
        self
    }

    pub fn render_mode(mut self, mode: RenderMode) -> Self {
        self.render_mode = Some(mode);
        self
    }

    pub fn extensions(mut self, extensions: ExtensionAllowList) -> Self {
        self.extensions = Some(extensions);
        self
    }

    pub fn validate_dimensions(mut self, validate: bool) -> Self {
        self.validate_dimensions = Some(validate);
        self
    }

    pub fn max_dimension(mut self, max: Option<usize>) -> Self {
        self.max_dimension = Some(max);
        self
    }

    pub fn build(self) -> ExtractConfig {
        let default = ExtractConfig::default();
        ExtractConfig {
            verbosity: self.verbosity.unwrap_or(default.verbosity),
            save_info: self.save_info.unwrap_or(default.save_info),
            jobs: self.jobs.unwrap_or(default.jobs).max(1),
            render_mode: self.render_mode.unwrap_or(default.render_mode),
            extensions: self.extensions.unwrap_or(default.extensions),
            validate_dimensions: self.validate_dimensions.unwrap_or(default.validate_dimensions),
            max_dimension: self.max_dimension.unwrap_or(default.max_dimension),
        }
    }
}

/// Picks the command-line input, falling back to the configured default.
pub fn resolve_input(cli: Option<PathBuf>, default: Option<&str>) -> Result<PathBuf> {
    cli.or_else(|| default.map(PathBuf::from))
        .ok_or(ExtractError::NoInput)
}
