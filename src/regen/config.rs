//! Configuration loading
//!
//! `defaults/regen.default.toml` is embedded into the library so documentation and runtime
//! behavior stay in sync. Callers layer their own files (and single key overrides) on top
//! with [`Loader`] before deserializing into [`RegenConfig`].

use crate::regen::error::ConfigError;
use crate::regen::extraction::{ClassKindRules, Extractor, MacroRegistry, DEFAULT_MACRO_KEYWORDS};
use crate::regen::merging::{SectionRegenerator, SyncEngine};
use crate::regen::tags::SyncMode;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../../defaults/regen.default.toml");

/// Top-level configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RegenConfig {
    pub extraction: ExtractionConfig,
    pub tags: TagsConfig,
    pub merge: MergeConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExtractionConfig {
    /// Known macro keywords; the built-in list when unset
    #[serde(default = "default_macros")]
    pub macros: Vec<String>,
    #[serde(default)]
    pub class_kinds: ClassKindRules,
}

fn default_macros() -> Vec<String> {
    DEFAULT_MACRO_KEYWORDS.iter().map(|keyword| keyword.to_string()).collect()
}

#[derive(Debug, Clone, Deserialize)]
pub struct TagsConfig {
    pub comment_delimiter: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MergeConfig {
    pub default_sync_mode: SyncMode,
}

impl RegenConfig {
    /// Build the macro registry; fails on keywords of unknown shape.
    pub fn macro_registry(&self) -> Result<MacroRegistry, ConfigError> {
        MacroRegistry::new(&self.extraction.macros)
    }

    pub fn extractor(&self) -> Result<Extractor, ConfigError> {
        Ok(Extractor::new(
            self.macro_registry()?,
            self.extraction.class_kinds.clone(),
        ))
    }

    pub fn sync_engine(&self) -> SyncEngine {
        SyncEngine::new(self.tags.comment_delimiter.as_str())
    }

    pub fn section_regenerator(&self) -> SectionRegenerator {
        SectionRegenerator::new(self.tags.comment_delimiter.as_str())
    }
}

/// Layers user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override, e.g. from a command line flag.
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    pub fn build(self) -> Result<RegenConfig, ConfigError> {
        Ok(self.builder.build()?.try_deserialize()?)
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<RegenConfig, ConfigError> {
    Loader::new().build()
}
