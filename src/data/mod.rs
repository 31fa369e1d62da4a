//! Data layer - Static tables and constants
//!
//! This module contains the static data the runtime is driven by:
//! - Engine version, resource paths and defaults
//! - The operation registry
//! - Known TeX extension packages

pub mod constants;
pub mod packages;
pub mod registry;

// Re-export commonly used items
pub use constants::{BUNDLE_DIR, BUNDLE_DIR_ENV, MATHJAX_PACKAGE, MATHJAX_VERSION, METADATA_FILE};
pub use registry::{
    operations_for, resolve, FunctionLocator, InputFormat, Operation, OutputFormat, Resolution,
};
