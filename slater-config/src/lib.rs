//! Shared configuration loading for the slater toolchain.
//!
//! The defaults live in `defaults/slater.default.toml`, embedded into every
//! binary so documentation and behavior cannot drift apart. Applications
//! layer user files and overrides on top through [`Loader`] before
//! deserializing into [`SlaterConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat};
use serde::Deserialize;

/// The embedded default configuration.
pub const DEFAULT_TOML: &str = include_str!("../defaults/slater.default.toml");

#[derive(Debug, Clone, Deserialize)]
pub struct SlaterConfig {
    pub output: OutputConfig,
    pub rows: RowsConfig,
    pub manifest: ManifestConfig,
    pub project: ProjectConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Output path pattern with `<...>` tokens.
    pub pattern: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RowsConfig {
    /// 1-based row that names the columns.
    pub header: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ManifestConfig {
    pub filename: String,
    /// 1-based line of the manifest template replaced by the name entries.
    pub insert_line: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProjectConfig {
    /// Host application project tree for anchoring relative patterns.
    pub setups_root: String,
}

/// Layered configuration builder: embedded defaults first, then any files
/// and overrides in the order they are added.
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    pub fn new() -> Self {
        Loader {
            builder: Config::builder()
                .add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml)),
        }
    }

    /// Layer a configuration file; missing files are an error.
    pub fn with_file(mut self, path: &str) -> Self {
        self.builder = self.builder.add_source(File::with_name(path));
        self
    }

    /// Layer a configuration file that may be absent.
    pub fn with_optional_file(mut self, path: &str) -> Self {
        self.builder = self.builder.add_source(File::with_name(path).required(false));
        self
    }

    /// Force a single key, dotted-path style, over everything else.
    pub fn set_override<V>(mut self, key: &str, value: V) -> Result<Self, ConfigError>
    where
        V: Into<config::Value>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    pub fn build(self) -> Result<SlaterConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// The embedded defaults alone.
pub fn load_defaults() -> Result<SlaterConfig, ConfigError> {
    Loader::new().build()
}
