//! Configuration of the routine extractor.
//!
//! Three sections, all with values in `defaults/fsplit.default.toml`:
//!
//! - `[output]`: directory receiving one file per unit, manifest path, and
//!   whether a missing directory is created
//! - `[banner]`: author and copyright written into every header, the comment
//!   marker and the editor mode named in the footer
//! - `[extraction]`: nesting policy and names kept out of the manifest
//!
//! The defaults file is compiled in. A [`Loader`] stacks a project file (the
//! `fsplit.toml` picked up from the working directory), an explicit
//! `--config` file and single-key overrides from command-line flags on top,
//! later layers winning.

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub use config::ConfigError as Error;

const DEFAULT_TOML: &str = include_str!("../defaults/fsplit.default.toml");

/// Top-level configuration consumed by the extractor.
#[derive(Debug, Clone, Deserialize)]
pub struct FsplitConfig {
    pub output: OutputConfig,
    pub banner: BannerConfig,
    pub extraction: ExtractionConfig,
}

/// Where extracted units and the manifest land.
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    pub directory: PathBuf,
    pub manifest: PathBuf,
    pub create_directory: bool,
}

/// Text of the generated header and footer comments.
#[derive(Debug, Clone, Deserialize)]
pub struct BannerConfig {
    pub author: String,
    pub copyright: String,
    pub comment_marker: String,
    pub editor_mode: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExtractionConfig {
    pub strict_nesting: bool,
    #[serde(default)]
    pub manifest_exclude: Vec<String>,
}

/// Builds an [`FsplitConfig`] from the compiled-in defaults plus any layers.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Loader holding only `fsplit.default.toml`.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Add a TOML file that must exist, e.g. one named with `--config`.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Add a TOML file if it exists, e.g. a project's `fsplit.toml`.
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Set one dotted key such as `output.directory`, above every file.
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Merge the layers and deserialize them.
    pub fn build(self) -> Result<FsplitConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<FsplitConfig, ConfigError> {
    Loader::new().build()
}
