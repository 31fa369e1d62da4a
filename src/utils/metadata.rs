//! Engine version check
//!
//! The bundles ship with a lock-file-style `package-lock.json`. Its
//! `dependencies` map records the exact engine release that was bundled,
//! which must match [`MATHJAX_VERSION`].

use serde::Deserialize;
use std::collections::HashMap;
use tracing::warn;

use crate::data::constants::{MATHJAX_PACKAGE, MATHJAX_VERSION};
use crate::utils::error::{MathJaxError, Result};

/// One locked dependency
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Dependency {
    pub version: String,
    #[serde(default)]
    pub resolved: Option<String>,
    #[serde(default)]
    pub integrity: Option<String>,
}

/// Parsed dependency metadata
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct PackageMetadata {
    #[serde(default)]
    pub dependencies: HashMap<String, Dependency>,
}

impl PackageMetadata {
    /// Parse the metadata document; a document that is not the expected
    /// shape has no usable dependency information
    pub fn parse(text: &str) -> Result<Self> {
        serde_json::from_str(text)
            .map_err(|e| MathJaxError::DependencyInfoMissing(format!("{}: {}", MATHJAX_PACKAGE, e)))
    }

    pub fn dependency(&self, name: &str) -> Option<&Dependency> {
        self.dependencies.get(name)
    }

    /// The locked engine dependency
    pub fn engine(&self) -> Result<&Dependency> {
        self.dependency(MATHJAX_PACKAGE)
            .ok_or_else(|| MathJaxError::DependencyInfoMissing(MATHJAX_PACKAGE.to_string()))
    }

    /// Fail with `UnexpectedVersion` unless the engine is `expected`
    pub fn check_version(&self, expected: &str) -> Result<()> {
        let found = &self.engine()?.version;
        if found == expected {
            Ok(())
        } else {
            warn!(%found, %expected, "bundled engine version mismatch");
            Err(MathJaxError::UnexpectedVersion {
                expected: expected.to_string(),
                found: found.clone(),
            })
        }
    }

    /// Check against the version this crate targets
    pub fn check_engine_version(&self) -> Result<()> {
        self.check_version(MATHJAX_VERSION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOCK: &str = r#"{
        "name": "mjn",
        "lockfileVersion": 1,
        "dependencies": {
            "mathjax-full": {
                "version": "3.2.2",
                "resolved": "https://registry.npmjs.org/mathjax-full/-/mathjax-full-3.2.2.tgz",
                "integrity": "sha512-+LfG9Fik+OuI8SLwsiR02IVdjcnRCy5MufYLi0C3TdMT56L/pjB0alMVGgoWJF8pN9Rc7FESycZB9BMNWIid5w=="
            },
            "esm": { "version": "3.2.25" }
        }
    }"#;

    #[test]
    fn test_parse_lock_file() {
        let metadata = PackageMetadata::parse(LOCK).unwrap();
        let engine = metadata.engine().unwrap();
        assert_eq!(engine.version, "3.2.2");
        assert!(engine.resolved.as_deref().unwrap().ends_with("mathjax-full-3.2.2.tgz"));
        assert!(engine.integrity.as_deref().unwrap().starts_with("sha512-"));
        assert_eq!(metadata.dependency("esm").unwrap().resolved, None);
    }

    #[test]
    fn test_check_version() {
        let metadata = PackageMetadata::parse(LOCK).unwrap();
        assert!(metadata.check_engine_version().is_ok());
        assert_eq!(
            metadata.check_version("3.1.0"),
            Err(MathJaxError::UnexpectedVersion {
                expected: "3.1.0".to_string(),
                found: "3.2.2".to_string(),
            })
        );
    }

    #[test]
    fn test_missing_engine_entry() {
        let metadata = PackageMetadata::parse(r#"{"dependencies": {}}"#).unwrap();
        assert_eq!(
            metadata.check_engine_version(),
            Err(MathJaxError::DependencyInfoMissing("mathjax-full".to_string()))
        );
    }

    #[test]
    fn test_malformed_document() {
        let err = PackageMetadata::parse("[1, 2, 3]").unwrap_err();
        assert!(err.is_metadata_error());
    }
}
