//! Configuration groups
//!
//! Each group is a plain record with MathJax's documented defaults. A group
//! crosses the engine boundary as its own JSON argument, so keys left at
//! their default on the engine side stay untouched by the host.
//!
//! Groups share fields by composition: the output processors embed
//! [`OutputOptions`] and the document options embed [`AccessibilityOptions`],
//! both flattened into the same JSON object.
//!
//! ## Example
//!
//! ```rust
//! use mathjax_bridge::options::{ConfigGroup, ContainerOptions};
//!
//! let container = ContainerOptions { em: 20.0, ..Default::default() };
//! let text = container.to_canonical().unwrap();
//! assert_eq!(ContainerOptions::from_canonical(&text).unwrap(), container);
//! ```

pub mod container;
pub mod document;
pub mod input;
pub mod output;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::core::engine::Argument;
use crate::utils::error::Result;

pub use container::ContainerOptions;
pub use document::{
    AccessibilityOptions, DocumentOptions, SafeAllowOptions, SafeOptions, SreOptions,
};
pub use input::{AsciiMathInputOptions, MmlInputOptions, MmlVerifyOptions, TexInputOptions};
pub use output::{ChtmlOutputOptions, FontCache, OutputOptions, SvgOutputOptions};

/// A named option group with a canonical text form
pub trait ConfigGroup: Serialize + DeserializeOwned + Default + Clone + PartialEq {
    /// Name used in logs and diagnostics
    const NAME: &'static str;

    /// Serialize to the JSON text handed to the engine
    fn to_canonical(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse a canonical text form; missing keys take their defaults
    fn from_canonical(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

/// Something that contributes zero or more positional arguments to a call
pub trait Marshal {
    fn marshal(&self, args: &mut Vec<Argument>) -> Result<()>;
}

impl<T: ConfigGroup> Marshal for T {
    fn marshal(&self, args: &mut Vec<Argument>) -> Result<()> {
        args.push(Argument::group(self)?);
        Ok(())
    }
}

/// No group: used where an operation has no output processor (MathML output)
impl Marshal for () {
    fn marshal(&self, _args: &mut Vec<Argument>) -> Result<()> {
        Ok(())
    }
}

/// The four groups passed with every conversion
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConvertOptions<I, O = ()> {
    /// Container sizing
    pub container: ContainerOptions,
    /// Input processor behaviour
    pub input: I,
    /// Output processor behaviour; `()` when the output is MathML
    pub output: O,
    /// Document-level behaviour
    pub document: DocumentOptions,
}

impl<I: Marshal, O: Marshal> ConvertOptions<I, O> {
    /// Build the positional arguments for one input, in engine order:
    /// `input, inline, container, input-group, [output-group,] document`
    pub fn arguments(&self, input: &str, inline: bool) -> Result<Vec<Argument>> {
        let mut args = vec![Argument::Text(input.to_string()), Argument::Flag(inline)];
        self.container.marshal(&mut args)?;
        self.input.marshal(&mut args)?;
        self.output.marshal(&mut args)?;
        self.document.marshal(&mut args)?;
        Ok(args)
    }
}

impl<I, O> ConvertOptions<I, O> {
    pub fn with_container(mut self, container: ContainerOptions) -> Self {
        self.container = container;
        self
    }

    pub fn with_input(mut self, input: I) -> Self {
        self.input = input;
        self
    }

    pub fn with_output(mut self, output: O) -> Self {
        self.output = output;
        self
    }

    pub fn with_document(mut self, document: DocumentOptions) -> Self {
        self.document = document;
        self
    }
}

pub type TexChtmlOptions = ConvertOptions<TexInputOptions, ChtmlOutputOptions>;
pub type TexMmlOptions = ConvertOptions<TexInputOptions>;
pub type TexSvgOptions = ConvertOptions<TexInputOptions, SvgOutputOptions>;
pub type MmlChtmlOptions = ConvertOptions<MmlInputOptions, ChtmlOutputOptions>;
pub type MmlSvgOptions = ConvertOptions<MmlInputOptions, SvgOutputOptions>;
pub type AsciiMathChtmlOptions = ConvertOptions<AsciiMathInputOptions, ChtmlOutputOptions>;
pub type AsciiMathMmlOptions = ConvertOptions<AsciiMathInputOptions>;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn assert_round_trip<T: ConfigGroup + std::fmt::Debug>(group: T) {
        let text = group.to_canonical().unwrap();
        assert_eq!(T::from_canonical(&text).unwrap(), group, "group {}", T::NAME);
    }

    #[test]
    fn test_every_group_round_trips() {
        assert_round_trip(ContainerOptions::default());
        assert_round_trip(TexInputOptions::default());
        assert_round_trip(MmlInputOptions::default());
        assert_round_trip(AsciiMathInputOptions::default());
        assert_round_trip(OutputOptions::default());
        assert_round_trip(ChtmlOutputOptions::default());
        assert_round_trip(SvgOutputOptions::default());
        assert_round_trip(AccessibilityOptions::default());
        assert_round_trip(SafeOptions::default());
        assert_round_trip(DocumentOptions::default());
    }

    #[test]
    fn test_modified_groups_round_trip() {
        assert_round_trip(ContainerOptions {
            em: 12.5,
            ex: 6.0,
            css: true,
            ..Default::default()
        });
        assert_round_trip(TexInputOptions::base_only());
        assert_round_trip(SvgOutputOptions {
            font_cache: FontCache::Global,
            ..Default::default()
        });
        let mut document = DocumentOptions::default();
        document.accessibility.enable_enrichment = true;
        document.safe_options.length_max = 5;
        assert_round_trip(document);
    }

    #[test]
    fn test_missing_keys_take_defaults() {
        let container = ContainerOptions::from_canonical(r#"{"em":10}"#).unwrap();
        assert_eq!(container.em, 10.0);
        assert_eq!(container.ex, ContainerOptions::default().ex);
    }

    #[test]
    fn test_invalid_canonical_text() {
        let err = ContainerOptions::from_canonical("{not json").unwrap_err();
        assert!(matches!(
            err,
            crate::utils::error::MathJaxError::InvalidConfiguration(_)
        ));
    }

    #[test]
    fn test_arguments_keep_groups_separate() {
        let options = TexSvgOptions::default();
        let args = options.arguments(r"\sqrt{x}", true).unwrap();

        assert_eq!(args.len(), 6);
        assert_eq!(args[0], Argument::Text(r"\sqrt{x}".to_string()));
        assert_eq!(args[1], Argument::Flag(true));
        assert!(matches!(&args[2], Argument::Group { name, .. } if *name == ContainerOptions::NAME));
        assert!(matches!(&args[3], Argument::Group { name, .. } if *name == TexInputOptions::NAME));
        assert!(matches!(&args[4], Argument::Group { name, .. } if *name == SvgOutputOptions::NAME));
        assert!(matches!(&args[5], Argument::Group { name, .. } if *name == DocumentOptions::NAME));
    }

    #[test]
    fn test_mathml_output_has_no_output_group() {
        let options = TexMmlOptions::default();
        let args = options.arguments("x", false).unwrap();
        assert_eq!(args.len(), 5);
        assert!(matches!(&args[4], Argument::Group { name, .. } if *name == DocumentOptions::NAME));
    }
}
