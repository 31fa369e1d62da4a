//! # mathjax-bridge
//!
//! Typeset TeX, MathML and AsciiMath with an embedded MathJax engine.
//!
//! ## Features
//!
//! - **Seven Conversions**: TeX, MathML and AsciiMath into CommonHTML, MathML or SVG
//! - **Embedded Engine**: MathJax bundles evaluated in QuickJS, no Node.js required
//! - **Typed Options**: every MathJax option group as a serde record with documented defaults
//! - **Content Errors**: engine error nodes surfaced as `MathJaxError::ConversionError`
//! - **Lazy Loading**: bundles load on first use, or up front when preferred
//! - **Sync and Async**: blocking, `async`, batch and diagnostic forms of each operation
//!
//! ## Usage Examples
//!
//! ### Single Conversion
//!
//! ```rust,no_run
//! use mathjax_bridge::{MathJax, OutputFormat, TexMmlOptions};
//!
//! let mathjax = MathJax::new(&[OutputFormat::Mathml])?;
//! let mml = mathjax.tex2mml(r"\frac{2}{3}", false, &TexMmlOptions::default())?;
//! assert!(mml.contains("<mfrac>"));
//! # Ok::<(), mathjax_bridge::MathJaxError>(())
//! ```
//!
//! ### Content Errors
//!
//! ```rust,no_run
//! use mathjax_bridge::{MathJax, MathJaxError, TexSvgOptions};
//!
//! let mathjax = MathJax::new(&[])?;
//! match mathjax.tex2svg(r"\frac{2}{3", true, &TexSvgOptions::default()) {
//!     Err(MathJaxError::ConversionError(message)) => eprintln!("bad input: {}", message),
//!     other => println!("{:?}", other),
//! }
//! # Ok::<(), mathjax_bridge::MathJaxError>(())
//! ```

/// Core runtime modules
pub mod core;

/// Data layer - static tables and constants
pub mod data;

/// Configuration groups
pub mod options;

/// Utility modules
pub mod utils;

// Re-export the runtime
pub use core::engine::{Argument, ExceptionSink};
pub use core::{MathJax, RuntimeOptions};

// Re-export data modules
pub use data::constants;
pub use data::constants::MATHJAX_VERSION;
pub use data::packages;
pub use data::registry::{InputFormat, Operation, OutputFormat};

// Re-export options
pub use options::{
    AsciiMathChtmlOptions, AsciiMathMmlOptions, ConfigGroup, ConvertOptions, MmlChtmlOptions,
    MmlSvgOptions, TexChtmlOptions, TexMmlOptions, TexSvgOptions,
};

// Re-export utilities
pub use utils::error::{ConversionOutput, MathJaxError, Result};
pub use utils::files::{BundleResolver, DirBundleResolver, MemoryBundleResolver};
pub use utils::metadata::PackageMetadata;
pub use utils::parsers;

/// Look up an operation by its engine function name
///
/// # Arguments
/// * `name` - function name such as `tex2svg`
///
/// # Returns
/// The operation, or `None` for names no bundle exposes
pub fn operation(name: &str) -> Option<Operation> {
    Operation::from_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_lookup() {
        assert_eq!(operation("am2mml"), Some(Operation::AsciiMathToMml));
        assert_eq!(operation("tex2png"), None);
    }

    #[test]
    fn test_every_operation_is_named() {
        for op in Operation::ALL {
            assert_eq!(operation(op.name()), Some(op));
        }
    }

    #[test]
    fn test_engine_version() {
        assert_eq!(MATHJAX_VERSION, "3.2.2");
    }
}
