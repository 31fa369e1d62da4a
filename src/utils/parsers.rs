//! Output validation
//!
//! The engine does not throw for content-level problems such as malformed
//! TeX. It renders an error node into the output tree instead. Each output
//! format gets a small textual grammar that finds such a node and pulls the
//! diagnostic out of its `data-mjx-error` attribute.
//!
//! This is a best-effort scan, not a markup parser: surrounding markup is
//! ignored and only the exact marker shapes below are recognised.
//!
//! ## Example
//!
//! ```rust
//! use mathjax_bridge::parsers::Parser;
//!
//! let html = r#"<mjx-container><mjx-merror data-mjx-error="Missing argument for \frac"></mjx-merror></mjx-container>"#;
//! let err = Parser::Chtml.validate(html.to_string()).unwrap_err();
//! assert_eq!(err.to_string(), r"Missing argument for \frac");
//! ```

use lazy_static::lazy_static;
use regex::Regex;

use crate::utils::error::{MathJaxError, Result};

lazy_static! {
    /// `<mjx-merror ... data-mjx-error ...>`
    static ref CHTML_ERROR_NODE: Regex =
        Regex::new(r"<mjx-merror\b[^>]*\bdata-mjx-error\b[^>]*>").unwrap();

    /// `<merror ... data-mjx-error ...>`
    static ref MATHML_ERROR_NODE: Regex =
        Regex::new(r"<merror\b[^>]*\bdata-mjx-error\b[^>]*>").unwrap();

    /// Any tag carrying both `data-mml-node="merror"` and `data-mjx-error`, in either order
    static ref SVG_ERROR_NODE: Regex = Regex::new(
        r#"<[A-Za-z][^>]*\bdata-mml-node="merror"[^>]*\bdata-mjx-error\b[^>]*>|<[A-Za-z][^>]*\bdata-mjx-error\b[^>]*\bdata-mml-node="merror"[^>]*>"#
    )
    .unwrap();

    /// The quoted diagnostic itself
    static ref ERROR_ATTRIBUTE: Regex = Regex::new(r#"\bdata-mjx-error="([^"]*)""#).unwrap();
}

/// Error-node grammar for one output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Parser {
    /// CommonHTML: `mjx-merror` elements
    Chtml,
    /// MathML: `merror` elements
    Mathml,
    /// SVG: generic containers marked `data-mml-node="merror"`
    Svg,
}

impl Parser {
    fn node_pattern(self) -> &'static Regex {
        match self {
            Parser::Chtml => &CHTML_ERROR_NODE,
            Parser::Mathml => &MATHML_ERROR_NODE,
            Parser::Svg => &SVG_ERROR_NODE,
        }
    }

    /// Find the diagnostic of the first error node in `output`.
    ///
    /// Returns `None` when there is no error node, and also when a node
    /// matched but its attribute could not be extracted.
    pub fn find_error(self, output: &str) -> Option<String> {
        let node = self.node_pattern().find(output)?;
        let captures = ERROR_ATTRIBUTE.captures(node.as_str())?;
        captures.get(1).map(|m| unescape_attribute(m.as_str()))
    }

    /// Return `output` unchanged, or the content error it embeds
    pub fn validate(self, output: String) -> Result<String> {
        match self.find_error(&output) {
            Some(message) => Err(MathJaxError::ConversionError(message)),
            None => Ok(output),
        }
    }
}

/// Resolve the character references the engine writes into attribute values
pub fn unescape_attribute(value: &str) -> String {
    if !value.contains('&') {
        return value.to_string();
    }

    let mut result = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(amp) = rest.find('&') {
        result.push_str(&rest[..amp]);
        let tail = &rest[amp..];

        let decoded = tail
            .find(';')
            .filter(|&end| end <= 10)
            .and_then(|end| decode_reference(&tail[1..end]).map(|c| (c, end)));

        match decoded {
            Some((c, end)) => {
                result.push(c);
                rest = &tail[end + 1..];
            }
            None => {
                // Not a reference we know; keep the ampersand literally
                result.push('&');
                rest = &tail[1..];
            }
        }
    }

    result.push_str(rest);
    result
}

fn decode_reference(name: &str) -> Option<char> {
    match name {
        "quot" => Some('"'),
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        _ => {
            let digits = name.strip_prefix('#')?;
            let code = match digits.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => digits.parse::<u32>().ok()?,
            };
            char::from_u32(code)
        }
    }
}
