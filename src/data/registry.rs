//! Function registry
//!
//! Static table from each conversion operation to the place its converter
//! lives inside the engine bundles:
//! - the bundle module (global namespace) that defines it
//! - the converter class inside that namespace
//! - the function name
//! - the output format, which selects both the bundle and the result parser

use phf::phf_map;
use std::fmt;

use crate::utils::parsers::Parser;

// ============================================================================
// Formats
// ============================================================================

/// Output family produced by the engine; one bundle per family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OutputFormat {
    /// CommonHTML markup (`mjx-container` trees)
    Chtml,
    /// Presentation MathML
    Mathml,
    /// Standalone SVG
    Svg,
}

impl OutputFormat {
    /// Every output format, in bundle load order
    pub const ALL: [OutputFormat; 3] = [OutputFormat::Chtml, OutputFormat::Mathml, OutputFormat::Svg];

    /// Global namespace the bundle for this format exports
    pub fn module_name(self) -> &'static str {
        match self {
            OutputFormat::Chtml => "chtml",
            OutputFormat::Mathml => "mml",
            OutputFormat::Svg => "svg",
        }
    }

    /// File name of the bundle for this format
    pub fn bundle_file(self) -> &'static str {
        match self {
            OutputFormat::Chtml => "chtml.bundle.js",
            OutputFormat::Mathml => "mml.bundle.js",
            OutputFormat::Svg => "svg.bundle.js",
        }
    }

    /// Parser that scans output of this format for error nodes
    pub fn parser(self) -> Parser {
        match self {
            OutputFormat::Chtml => Parser::Chtml,
            OutputFormat::Mathml => Parser::Mathml,
            OutputFormat::Svg => Parser::Svg,
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Chtml => write!(f, "CommonHTML"),
            OutputFormat::Mathml => write!(f, "MathML"),
            OutputFormat::Svg => write!(f, "SVG"),
        }
    }
}

/// Input notation accepted by an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputFormat {
    Tex,
    Mathml,
    AsciiMath,
}

impl fmt::Display for InputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputFormat::Tex => write!(f, "TeX"),
            InputFormat::Mathml => write!(f, "MathML"),
            InputFormat::AsciiMath => write!(f, "AsciiMath"),
        }
    }
}

// ============================================================================
// Operations
// ============================================================================

/// A conversion the engine bundles expose
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    TexToChtml,
    TexToMml,
    TexToSvg,
    MmlToChtml,
    MmlToSvg,
    AsciiMathToChtml,
    AsciiMathToMml,
}

static OPERATION_NAMES: phf::Map<&'static str, Operation> = phf_map! {
    "tex2chtml" => Operation::TexToChtml,
    "tex2mml" => Operation::TexToMml,
    "tex2svg" => Operation::TexToSvg,
    "mml2chtml" => Operation::MmlToChtml,
    "mml2svg" => Operation::MmlToSvg,
    "am2chtml" => Operation::AsciiMathToChtml,
    "am2mml" => Operation::AsciiMathToMml,
};

impl Operation {
    /// Every operation, grouped by input notation
    pub const ALL: [Operation; 7] = [
        Operation::TexToChtml,
        Operation::TexToMml,
        Operation::TexToSvg,
        Operation::MmlToChtml,
        Operation::MmlToSvg,
        Operation::AsciiMathToChtml,
        Operation::AsciiMathToMml,
    ];

    /// Look up an operation by its engine function name (e.g. `tex2svg`)
    pub fn from_name(name: &str) -> Option<Operation> {
        OPERATION_NAMES.get(name).copied()
    }

    /// Engine function name
    pub fn name(self) -> &'static str {
        self.locator().function
    }

    pub fn input_format(self) -> InputFormat {
        match self {
            Operation::TexToChtml | Operation::TexToMml | Operation::TexToSvg => InputFormat::Tex,
            Operation::MmlToChtml | Operation::MmlToSvg => InputFormat::Mathml,
            Operation::AsciiMathToChtml | Operation::AsciiMathToMml => InputFormat::AsciiMath,
        }
    }

    pub fn output_format(self) -> OutputFormat {
        match self {
            Operation::TexToChtml | Operation::MmlToChtml | Operation::AsciiMathToChtml => {
                OutputFormat::Chtml
            }
            Operation::TexToMml | Operation::AsciiMathToMml => OutputFormat::Mathml,
            Operation::TexToSvg | Operation::MmlToSvg => OutputFormat::Svg,
        }
    }

    /// Where the converter for this operation lives
    pub fn locator(self) -> FunctionLocator {
        let class = match self.input_format() {
            InputFormat::Tex => "TeXConverter",
            InputFormat::Mathml => "MMLConverter",
            InputFormat::AsciiMath => "AMConverter",
        };
        let function = match self {
            Operation::TexToChtml => "tex2chtml",
            Operation::TexToMml => "tex2mml",
            Operation::TexToSvg => "tex2svg",
            Operation::MmlToChtml => "mml2chtml",
            Operation::MmlToSvg => "mml2svg",
            Operation::AsciiMathToChtml => "am2chtml",
            Operation::AsciiMathToMml => "am2mml",
        };
        FunctionLocator {
            module: self.output_format().module_name(),
            class,
            function,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Path of a converter function: `globalThis[module][class][function]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FunctionLocator {
    pub module: &'static str,
    pub class: &'static str,
    pub function: &'static str,
}

impl fmt::Display for FunctionLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.module, self.class, self.function)
    }
}

/// Everything needed to run an operation and check its result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub locator: FunctionLocator,
    pub format: OutputFormat,
    pub parser: Parser,
}

/// Resolve an operation; total over the closed set of operations
pub fn resolve(operation: Operation) -> Resolution {
    let format = operation.output_format();
    Resolution {
        locator: operation.locator(),
        format,
        parser: format.parser(),
    }
}

/// Operations served by the bundle for `format`
pub fn operations_for(format: OutputFormat) -> impl Iterator<Item = Operation> {
    Operation::ALL
        .into_iter()
        .filter(move |op| op.output_format() == format)
}
