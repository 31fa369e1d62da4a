//! Input processor options (TeX, MathML, AsciiMath)

use serde::{Deserialize, Serialize};

use super::ConfigGroup;
use crate::data::constants::TEX_DIGITS_PATTERN;
use crate::data::packages;

// ============================================================================
// TeX
// ============================================================================

/// TeX input processor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TexInputOptions {
    /// Extension packages to load
    pub packages: Vec<String>,
    /// Delimiter pairs for in-line math
    pub inline_math: Vec<[String; 2]>,
    /// Delimiter pairs for displayed math
    pub display_math: Vec<[String; 2]>,
    /// Use `\$` to produce a literal dollar sign
    pub process_escapes: bool,
    /// Process `\begin{xxx}...\end{xxx}` outside math mode
    pub process_environments: bool,
    /// Process `\ref{...}` outside math mode
    pub process_refs: bool,
    /// Pattern recognising numbers
    pub digits: String,
    /// Equation numbering: `none`, `ams` or `all`
    pub tags: String,
    /// Side for equation numbers: `left` or `right`
    pub tag_side: String,
    /// Distance between tags and the container edge
    pub tag_indent: String,
    /// Use label names for element ids
    pub use_label_ids: bool,
    /// Maximum number of macro substitutions per expression
    pub max_macros: u32,
    /// Maximum size of the string buffer while expanding macros
    pub max_buffer: u32,
    /// Base for `href` links
    #[serde(rename = "baseURL")]
    pub base_url: String,
}

impl Default for TexInputOptions {
    fn default() -> Self {
        Self {
            packages: Self::PACKAGES.iter().map(|p| p.to_string()).collect(),
            inline_math: vec![delimiters(r"\(", r"\)")],
            display_math: vec![delimiters("$$", "$$"), delimiters(r"\[", r"\]")],
            process_escapes: true,
            process_environments: true,
            process_refs: true,
            digits: TEX_DIGITS_PATTERN.to_string(),
            tags: "none".to_string(),
            tag_side: "right".to_string(),
            tag_indent: "0.8em".to_string(),
            use_label_ids: true,
            max_macros: 10_000,
            max_buffer: 5 * 1024,
            base_url: String::new(),
        }
    }
}

impl TexInputOptions {
    /// Every package the bundles carry; the default `packages` value
    pub const PACKAGES: &'static [&'static str] = packages::ALL;

    pub fn new() -> Self {
        Self::default()
    }

    /// Load only the listed packages
    pub fn with_packages<I, S>(packages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            packages: packages.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Load nothing but the `base` package
    pub fn base_only() -> Self {
        Self::with_packages([packages::BASE])
    }

    /// Packages that no bundle provides
    pub fn unknown_packages(&self) -> Vec<&str> {
        self.packages
            .iter()
            .map(String::as_str)
            .filter(|p| !packages::is_known(p))
            .collect()
    }
}

impl ConfigGroup for TexInputOptions {
    const NAME: &'static str = "tex";
}

fn delimiters(open: &str, close: &str) -> [String; 2] {
    [open.to_string(), close.to_string()]
}

// ============================================================================
// MathML
// ============================================================================

/// Checks the MathML input processor runs on parsed markup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MmlVerifyOptions {
    pub check_arity: bool,
    pub check_attributes: bool,
    pub full_errors: bool,
    pub fix_mmultiscripts: bool,
    pub fix_mtables: bool,
}

impl Default for MmlVerifyOptions {
    fn default() -> Self {
        Self {
            check_arity: true,
            check_attributes: false,
            full_errors: false,
            fix_mmultiscripts: true,
            fix_mtables: true,
        }
    }
}

/// MathML input processor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MmlInputOptions {
    /// Parse the input as `html` or `xml`
    pub parse_as: String,
    /// Re-parse MathML that is already a DOM tree
    pub force_reparse: bool,
    pub verify: MmlVerifyOptions,
}

impl Default for MmlInputOptions {
    fn default() -> Self {
        Self {
            parse_as: "html".to_string(),
            force_reparse: false,
            verify: MmlVerifyOptions::default(),
        }
    }
}

impl MmlInputOptions {
    /// Strict XML parsing with full error messages
    pub fn strict() -> Self {
        Self {
            parse_as: "xml".to_string(),
            verify: MmlVerifyOptions {
                check_attributes: true,
                full_errors: true,
                ..MmlVerifyOptions::default()
            },
            ..Self::default()
        }
    }
}

impl ConfigGroup for MmlInputOptions {
    const NAME: &'static str = "mml";
}

// ============================================================================
// AsciiMath
// ============================================================================

/// AsciiMath input processor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AsciiMathInputOptions {
    /// Swap the meanings of `phi` and `varphi`
    pub fixphi: bool,
    /// Typeset in display style
    pub displaystyle: bool,
    /// Decimal separator
    pub decimalsign: String,
}

impl Default for AsciiMathInputOptions {
    fn default() -> Self {
        Self {
            fixphi: true,
            displaystyle: true,
            decimalsign: ".".to_string(),
        }
    }
}

impl ConfigGroup for AsciiMathInputOptions {
    const NAME: &'static str = "asciimath";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tex_defaults() {
        let tex = TexInputOptions::default();
        assert_eq!(tex.packages.len(), packages::ALL.len());
        assert_eq!(tex.inline_math, vec![[r"\(".to_string(), r"\)".to_string()]]);
        assert_eq!(tex.display_math.len(), 2);
        assert_eq!(tex.tags, "none");
        assert_eq!(tex.max_buffer, 5120);
    }

    #[test]
    fn test_tex_base_url_key() {
        let text = TexInputOptions::default().to_canonical().unwrap();
        assert!(text.contains("\"baseURL\""));
        assert!(text.contains("\"processEscapes\":true"));
    }

    #[test]
    fn test_unknown_packages() {
        let tex = TexInputOptions::with_packages(["base", "ams", "tikz"]);
        assert_eq!(tex.unknown_packages(), vec!["tikz"]);
        assert!(TexInputOptions::base_only().unknown_packages().is_empty());
    }

    #[test]
    fn test_mml_strict() {
        let mml = MmlInputOptions::strict();
        assert_eq!(mml.parse_as, "xml");
        assert!(mml.verify.full_errors);
        assert!(mml.verify.check_arity);
    }

    #[test]
    fn test_asciimath_keys_are_lowercase() {
        let text = AsciiMathInputOptions::default().to_canonical().unwrap();
        assert!(text.contains("\"decimalsign\":\".\""));
        assert!(text.contains("\"fixphi\":true"));
    }
}
