//! Public conversion API
//!
//! Every operation comes in four forms on [`MathJax`]:
//! - `op(input, inline, options)` blocks until the markup is ready
//! - `op_async` awaits the same job
//! - `op_batch` / `op_batch_async` convert many inputs as one job, failing
//!   as a whole on the first bad input
//!
//! The TeX operations also have `tex2*_with_diagnostics`, which return the
//! markup even when it carries an error node.

use super::runtime::{Job, MathJax};
use crate::data::registry::{resolve, Operation};
use crate::options::{
    AsciiMathChtmlOptions, AsciiMathMmlOptions, ConvertOptions, Marshal, MmlChtmlOptions,
    MmlSvgOptions, TexChtmlOptions, TexMmlOptions, TexSvgOptions,
};
use crate::utils::error::{ConversionOutput, MathJaxError, Result};

fn single(mut results: Vec<String>) -> Result<String> {
    results
        .pop()
        .ok_or_else(|| MathJaxError::ConversionUnknownError("empty reply".to_string()))
}

impl MathJax {
    /// Convert one input with any operation. The option groups must be the
    /// ones `operation` takes; the typed per-operation methods enforce that.
    pub fn convert<I: Marshal, O: Marshal>(
        &self,
        operation: Operation,
        input: &str,
        inline: bool,
        options: &ConvertOptions<I, O>,
    ) -> Result<String> {
        let args = options.arguments(input, inline)?;
        let results = self.dispatch(|reply| Job::Invoke {
            operation,
            calls: vec![args],
            validate: true,
            reply,
        })?;
        single(results)
    }

    /// Convert many inputs in one job; results follow input order
    pub fn convert_batch<I: Marshal, O: Marshal, S: AsRef<str>>(
        &self,
        operation: Operation,
        inputs: &[S],
        inline: bool,
        options: &ConvertOptions<I, O>,
    ) -> Result<Vec<String>> {
        let calls = inputs
            .iter()
            .map(|input| options.arguments(input.as_ref(), inline))
            .collect::<Result<Vec<_>>>()?;
        self.dispatch(|reply| Job::Invoke {
            operation,
            calls,
            validate: true,
            reply,
        })
    }

    pub async fn convert_async<I: Marshal, O: Marshal>(
        &self,
        operation: Operation,
        input: &str,
        inline: bool,
        options: &ConvertOptions<I, O>,
    ) -> Result<String> {
        let args = options.arguments(input, inline)?;
        let results = self
            .dispatch_async(|reply| Job::Invoke {
                operation,
                calls: vec![args],
                validate: true,
                reply,
            })
            .await?;
        single(results)
    }

    pub async fn convert_batch_async<I: Marshal, O: Marshal, S: AsRef<str>>(
        &self,
        operation: Operation,
        inputs: &[S],
        inline: bool,
        options: &ConvertOptions<I, O>,
    ) -> Result<Vec<String>> {
        let calls = inputs
            .iter()
            .map(|input| options.arguments(input.as_ref(), inline))
            .collect::<Result<Vec<_>>>()?;
        self.dispatch_async(|reply| Job::Invoke {
            operation,
            calls,
            validate: true,
            reply,
        })
        .await
    }

    /// Convert and keep the markup even when it carries an error node.
    ///
    /// Environment and call failures are still returned as `Err`; only a
    /// content error ends up in [`ConversionOutput::error`].
    pub fn convert_with_diagnostics<I: Marshal, O: Marshal>(
        &self,
        operation: Operation,
        input: &str,
        inline: bool,
        options: &ConvertOptions<I, O>,
    ) -> Result<ConversionOutput> {
        let args = options.arguments(input, inline)?;
        let content = single(self.dispatch(|reply| Job::Invoke {
            operation,
            calls: vec![args],
            validate: false,
            reply,
        })?)?;
        Ok(match resolve(operation).parser.find_error(&content) {
            Some(message) => ConversionOutput::with_error(content, MathJaxError::content(message)),
            None => ConversionOutput::new(content),
        })
    }
}

macro_rules! conversions {
    ($($name:literal: $variant:ident, $options:ty => $op:ident, $op_async:ident, $op_batch:ident, $op_batch_async:ident;)*) => {
        impl MathJax {
            $(
                #[doc = concat!("`", $name, "`: convert one input")]
                pub fn $op(&self, input: &str, inline: bool, options: &$options) -> Result<String> {
                    self.convert(Operation::$variant, input, inline, options)
                }

                #[doc = concat!("`", $name, "`, awaiting the worker")]
                pub async fn $op_async(
                    &self,
                    input: &str,
                    inline: bool,
                    options: &$options,
                ) -> Result<String> {
                    self.convert_async(Operation::$variant, input, inline, options).await
                }

                #[doc = concat!("`", $name, "` over many inputs, all or nothing")]
                pub fn $op_batch<S: AsRef<str>>(
                    &self,
                    inputs: &[S],
                    inline: bool,
                    options: &$options,
                ) -> Result<Vec<String>> {
                    self.convert_batch(Operation::$variant, inputs, inline, options)
                }

                #[doc = concat!("`", $name, "` over many inputs, awaiting the worker")]
                pub async fn $op_batch_async<S: AsRef<str>>(
                    &self,
                    inputs: &[S],
                    inline: bool,
                    options: &$options,
                ) -> Result<Vec<String>> {
                    self.convert_batch_async(Operation::$variant, inputs, inline, options)
                        .await
                }
            )*
        }
    };
}

conversions! {
    "tex2chtml": TexToChtml, TexChtmlOptions
        => tex2chtml, tex2chtml_async, tex2chtml_batch, tex2chtml_batch_async;
    "tex2mml": TexToMml, TexMmlOptions
        => tex2mml, tex2mml_async, tex2mml_batch, tex2mml_batch_async;
    "tex2svg": TexToSvg, TexSvgOptions
        => tex2svg, tex2svg_async, tex2svg_batch, tex2svg_batch_async;
    "mml2chtml": MmlToChtml, MmlChtmlOptions
        => mml2chtml, mml2chtml_async, mml2chtml_batch, mml2chtml_batch_async;
    "mml2svg": MmlToSvg, MmlSvgOptions
        => mml2svg, mml2svg_async, mml2svg_batch, mml2svg_batch_async;
    "am2chtml": AsciiMathToChtml, AsciiMathChtmlOptions
        => am2chtml, am2chtml_async, am2chtml_batch, am2chtml_batch_async;
    "am2mml": AsciiMathToMml, AsciiMathMmlOptions
        => am2mml, am2mml_async, am2mml_batch, am2mml_batch_async;
}

impl MathJax {
    pub fn tex2chtml_with_diagnostics(
        &self,
        input: &str,
        inline: bool,
        options: &TexChtmlOptions,
    ) -> Result<ConversionOutput> {
        self.convert_with_diagnostics(Operation::TexToChtml, input, inline, options)
    }

    pub fn tex2mml_with_diagnostics(
        &self,
        input: &str,
        inline: bool,
        options: &TexMmlOptions,
    ) -> Result<ConversionOutput> {
        self.convert_with_diagnostics(Operation::TexToMml, input, inline, options)
    }

    pub fn tex2svg_with_diagnostics(
        &self,
        input: &str,
        inline: bool,
        options: &TexSvgOptions,
    ) -> Result<ConversionOutput> {
        self.convert_with_diagnostics(Operation::TexToSvg, input, inline, options)
    }
}
