//! Error handling for MathJax conversions
//!
//! This module provides the unified error type and result type for every
//! runtime, invocation and validation step.

use thiserror::Error;

/// Conversion error type
///
/// Variants are grouped by where they originate: the script environment,
/// the dependency metadata, the engine call itself, or the markup returned
/// by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MathJaxError {
    // ------------------------------------------------------------------
    // Environment
    // ------------------------------------------------------------------
    /// The script runtime or context could not be created
    #[error("failed to create the script runtime: {0}")]
    RuntimeCreationFailed(String),
    /// An engine bundle is absent, unreadable or failed to evaluate
    #[error("engine bundle missing or unreadable: {0}")]
    BundleMissing(String),
    /// The converter namespace of a loaded bundle is absent
    #[error("converter module `{0}` is not defined")]
    ModuleMissing(String),
    /// A converter class is absent from its namespace
    #[error("converter class `{0}` is not defined")]
    ClassMissing(String),
    /// A converter function is absent or not callable
    #[error("converter function `{0}` is not defined")]
    FunctionMissing(String),

    // ------------------------------------------------------------------
    // Metadata
    // ------------------------------------------------------------------
    /// The dependency metadata file could not be read
    #[error("package metadata file missing: {0}")]
    PackageFileMissing(String),
    /// The dependency metadata has no entry for the engine package
    #[error("dependency information missing for `{0}`")]
    DependencyInfoMissing(String),
    /// The bundled engine is not the version this crate targets
    #[error("unexpected engine version {found} (expected {expected})")]
    UnexpectedVersion { expected: String, found: String },

    // ------------------------------------------------------------------
    // Call
    // ------------------------------------------------------------------
    /// The engine call produced no value
    #[error("conversion `{0}` produced no result")]
    ConversionFailed(String),
    /// The engine call produced a value that is not text
    #[error("conversion `{0}` returned a non-string value")]
    ConversionInvalidFormat(String),
    /// Any failure that does not fit another variant
    #[error("unknown conversion error: {0}")]
    ConversionUnknownError(String),

    // ------------------------------------------------------------------
    // Content
    // ------------------------------------------------------------------
    /// The engine embedded an error node in its output; carries the engine's
    /// diagnostic verbatim
    #[error("{0}")]
    ConversionError(String),

    // ------------------------------------------------------------------
    // Internal
    // ------------------------------------------------------------------
    /// The runtime serving this call has already been torn down
    #[error("the runtime was torn down before the call completed")]
    DeallocatedSelf,
    /// A call reached the runtime from its own worker thread, e.g. from an
    /// exception sink
    #[error("the runtime was called from its own worker thread")]
    ReentrantCall,
    /// A configuration group could not be encoded or decoded
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}

impl MathJaxError {
    /// Content error with the engine's diagnostic text
    pub fn content(message: impl Into<String>) -> Self {
        MathJaxError::ConversionError(message.into())
    }

    /// Whether this error came from an error node in the engine output
    pub fn is_content_error(&self) -> bool {
        matches!(self, MathJaxError::ConversionError(_))
    }

    /// Whether this error describes a broken script environment
    pub fn is_environment_error(&self) -> bool {
        matches!(
            self,
            MathJaxError::RuntimeCreationFailed(_)
                | MathJaxError::BundleMissing(_)
                | MathJaxError::ModuleMissing(_)
                | MathJaxError::ClassMissing(_)
                | MathJaxError::FunctionMissing(_)
        )
    }

    /// Whether this error comes from the version compatibility check
    pub fn is_metadata_error(&self) -> bool {
        matches!(
            self,
            MathJaxError::PackageFileMissing(_)
                | MathJaxError::DependencyInfoMissing(_)
                | MathJaxError::UnexpectedVersion { .. }
        )
    }
}

impl From<serde_json::Error> for MathJaxError {
    fn from(err: serde_json::Error) -> Self {
        MathJaxError::InvalidConfiguration(err.to_string())
    }
}

/// Result type for conversion operations
pub type Result<T> = std::result::Result<T, MathJaxError>;

/// Markup as returned by the engine, together with the content error it
/// carries, if any
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionOutput {
    /// The converted markup, unchanged
    pub content: String,
    /// The error node found in `content`
    pub error: Option<MathJaxError>,
}

impl ConversionOutput {
    pub fn new(content: String) -> Self {
        Self {
            content,
            error: None,
        }
    }

    pub fn with_error(content: String, error: MathJaxError) -> Self {
        Self {
            content,
            error: Some(error),
        }
    }

    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }

    /// Convert into a plain result, failing if an error node was found
    pub fn into_result(self) -> Result<String> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.content),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_error_display_is_verbatim() {
        let err = MathJaxError::content("Missing close brace");
        assert_eq!(err.to_string(), "Missing close brace");
        assert!(err.is_content_error());
    }

    #[test]
    fn test_unexpected_version_display() {
        let err = MathJaxError::UnexpectedVersion {
            expected: "3.2.2".to_string(),
            found: "3.1.0".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("3.1.0"));
        assert!(msg.contains("3.2.2"));
        assert!(err.is_metadata_error());
        assert!(!err.is_environment_error());
    }

    #[test]
    fn test_environment_classification() {
        assert!(MathJaxError::FunctionMissing("tex2svg".into()).is_environment_error());
        assert!(MathJaxError::BundleMissing("svg.bundle.js".into()).is_environment_error());
        assert!(!MathJaxError::ConversionFailed("tex2svg".into()).is_environment_error());
    }

    #[test]
    fn test_conversion_output() {
        let output = ConversionOutput::new("<math></math>".to_string());
        assert!(!output.has_error());
        assert_eq!(output.into_result().unwrap(), "<math></math>");

        let output = ConversionOutput::with_error(
            "<merror/>".to_string(),
            MathJaxError::content("Undefined control sequence \\foo"),
        );
        assert!(output.has_error());
        assert_eq!(
            output.into_result(),
            Err(MathJaxError::content("Undefined control sequence \\foo"))
        );
    }
}
