//! Utility modules
//!
//! This module contains utilities and helpers:
//! - Error types and result types
//! - Bundle resolution
//! - Engine version metadata
//! - Output validation

pub mod error;
pub mod files;
pub mod metadata;
pub mod parsers;

// Re-export commonly used items
pub use error::{ConversionOutput, MathJaxError, Result};
pub use files::{BundleResolveError, BundleResolver, DirBundleResolver, MemoryBundleResolver};
pub use metadata::{Dependency, PackageMetadata};
pub use parsers::Parser;
