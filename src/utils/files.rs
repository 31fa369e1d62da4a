//! Locating engine bundles and the dependency metadata file
//!
//! The runtime never touches the filesystem directly. It asks a
//! [`BundleResolver`] for sources, so bundles can come from:
//! - `DirBundleResolver`: a directory on disk (the default)
//! - `MemoryBundleResolver`: sources registered in memory (tests, embedding)

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::data::constants::{BUNDLE_DIR, BUNDLE_DIR_ENV, METADATA_FILE};
use crate::data::registry::OutputFormat;

/// Trait for reading bundle sources
pub trait BundleResolver: Send + Sync {
    /// Read the bundle source for `format`
    fn read_bundle(&self, format: OutputFormat) -> Result<String, BundleResolveError>;

    /// Read the dependency metadata document
    fn read_metadata(&self) -> Result<String, BundleResolveError>;

    /// Human-readable location of the bundle for `format`
    fn bundle_location(&self, format: OutputFormat) -> String;

    /// Human-readable location of the metadata document
    fn metadata_location(&self) -> String;
}

/// Error type for bundle resolution
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BundleResolveError {
    #[error("file not found: {0}")]
    NotFound(String),
    #[error("read error: {0}")]
    ReadError(String),
}

// ============================================================================
// Filesystem
// ============================================================================

/// Bundles stored as files in one directory
#[derive(Debug, Clone)]
pub struct DirBundleResolver {
    directory: PathBuf,
}

impl DirBundleResolver {
    pub fn new(directory: impl AsRef<Path>) -> Self {
        Self {
            directory: directory.as_ref().to_path_buf(),
        }
    }

    /// The directory named by `MATHJAX_BRIDGE_BUNDLE_DIR`, or the package's
    /// resource directory when unset
    pub fn from_env() -> Self {
        match std::env::var_os(BUNDLE_DIR_ENV) {
            Some(dir) if !dir.is_empty() => Self::new(dir),
            _ => Self::new(Path::new(env!("CARGO_MANIFEST_DIR")).join(BUNDLE_DIR)),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    fn read(&self, name: &str) -> Result<String, BundleResolveError> {
        let path = self.directory.join(name);
        if !path.is_file() {
            return Err(BundleResolveError::NotFound(path.display().to_string()));
        }
        std::fs::read_to_string(&path)
            .map_err(|e| BundleResolveError::ReadError(format!("{}: {}", path.display(), e)))
    }
}

impl Default for DirBundleResolver {
    fn default() -> Self {
        Self::from_env()
    }
}

impl BundleResolver for DirBundleResolver {
    fn read_bundle(&self, format: OutputFormat) -> Result<String, BundleResolveError> {
        self.read(format.bundle_file())
    }

    fn read_metadata(&self) -> Result<String, BundleResolveError> {
        self.read(METADATA_FILE)
    }

    fn bundle_location(&self, format: OutputFormat) -> String {
        self.directory.join(format.bundle_file()).display().to_string()
    }

    fn metadata_location(&self) -> String {
        self.directory.join(METADATA_FILE).display().to_string()
    }
}

// ============================================================================
// Memory
// ============================================================================

/// Bundles held in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryBundleResolver {
    bundles: HashMap<OutputFormat, String>,
    metadata: Option<String>,
}

impl MemoryBundleResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the source for `format`, replacing any previous one
    pub fn add_bundle(&mut self, format: OutputFormat, source: impl Into<String>) {
        self.bundles.insert(format, source.into());
    }

    pub fn with_bundle(mut self, format: OutputFormat, source: impl Into<String>) -> Self {
        self.add_bundle(format, source);
        self
    }

    pub fn set_metadata(&mut self, metadata: impl Into<String>) {
        self.metadata = Some(metadata.into());
    }

    pub fn with_metadata(mut self, metadata: impl Into<String>) -> Self {
        self.set_metadata(metadata);
        self
    }
}

impl BundleResolver for MemoryBundleResolver {
    fn read_bundle(&self, format: OutputFormat) -> Result<String, BundleResolveError> {
        self.bundles
            .get(&format)
            .cloned()
            .ok_or_else(|| BundleResolveError::NotFound(self.bundle_location(format)))
    }

    fn read_metadata(&self) -> Result<String, BundleResolveError> {
        self.metadata
            .clone()
            .ok_or_else(|| BundleResolveError::NotFound(self.metadata_location()))
    }

    fn bundle_location(&self, format: OutputFormat) -> String {
        format!("memory:{}", format.bundle_file())
    }

    fn metadata_location(&self) -> String {
        format!("memory:{}", METADATA_FILE)
    }
}
