//! Output processor options
//!
//! [`OutputOptions`] holds what every output processor understands; the
//! CommonHTML and SVG records embed it and add their own fields.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::ConfigGroup;
use crate::data::constants::CHTML_FONT_URL;

/// Options common to all output processors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OutputOptions {
    /// Global scaling factor for all expressions
    pub scale: f64,
    /// Smallest scaling factor to use
    pub min_scale: f64,
    /// Make `mtext` elements use the surrounding font
    pub mtext_inherit_font: bool,
    /// Make `merror` text use the surrounding font
    pub merror_inherit_font: bool,
    /// Font family for `mtext` when not inherited
    pub mtext_font: String,
    /// Font family for `merror` when not inherited
    pub merror_font: String,
    /// Font for characters not in the MathJax fonts
    pub unknown_family: String,
    /// Use MathML spacing rules instead of TeX rules
    pub mathml_spacing: bool,
    /// RFDa and other attributes not to copy to the output
    pub skip_attributes: BTreeMap<String, bool>,
    /// Default size of ex in em units
    pub ex_factor: f64,
    /// Default alignment for displayed equations
    pub display_align: String,
    /// Default indentation for displayed equations
    pub display_indent: String,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            scale: 1.0,
            min_scale: 0.5,
            mtext_inherit_font: false,
            merror_inherit_font: true,
            mtext_font: String::new(),
            merror_font: "serif".to_string(),
            unknown_family: "serif".to_string(),
            mathml_spacing: false,
            skip_attributes: BTreeMap::new(),
            ex_factor: 0.5,
            display_align: "center".to_string(),
            display_indent: "0".to_string(),
        }
    }
}

impl ConfigGroup for OutputOptions {
    const NAME: &'static str = "output";
}

/// CommonHTML output processor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChtmlOutputOptions {
    #[serde(flatten)]
    pub common: OutputOptions,
    /// Match the ex-height of the surrounding font
    pub match_font_height: bool,
    /// Where the web fonts live
    #[serde(rename = "fontURL")]
    pub font_url: String,
    /// Only emit CSS for the characters actually used
    #[serde(rename = "adaptiveCSS")]
    pub adaptive_css: bool,
}

impl Default for ChtmlOutputOptions {
    fn default() -> Self {
        Self {
            common: OutputOptions::default(),
            match_font_height: true,
            font_url: CHTML_FONT_URL.to_string(),
            adaptive_css: true,
        }
    }
}

impl ChtmlOutputOptions {
    pub fn with_font_url(font_url: impl Into<String>) -> Self {
        Self {
            font_url: font_url.into(),
            ..Self::default()
        }
    }
}

impl ConfigGroup for ChtmlOutputOptions {
    const NAME: &'static str = "chtml";
}

/// How SVG paths for glyphs are shared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontCache {
    /// Every glyph path is repeated in place
    None,
    /// Paths are shared within one expression
    #[default]
    Local,
    /// Paths are shared across the whole document
    Global,
}

/// SVG output processor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SvgOutputOptions {
    #[serde(flatten)]
    pub common: OutputOptions,
    pub font_cache: FontCache,
    /// Put speech strings into SVG `<title>` elements
    pub internal_speech_titles: bool,
}

impl Default for SvgOutputOptions {
    fn default() -> Self {
        Self {
            common: OutputOptions::default(),
            font_cache: FontCache::Local,
            internal_speech_titles: true,
        }
    }
}

impl ConfigGroup for SvgOutputOptions {
    const NAME: &'static str = "svg";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_fields_are_flattened() {
        let text = ChtmlOutputOptions::default().to_canonical().unwrap();
        assert!(text.contains("\"minScale\":0.5"));
        assert!(text.contains("\"fontURL\""));
        assert!(text.contains("\"adaptiveCSS\":true"));
        assert!(!text.contains("\"common\""));
    }

    #[test]
    fn test_font_cache_serializes_lowercase() {
        let svg = SvgOutputOptions {
            font_cache: FontCache::Global,
            ..Default::default()
        };
        let text = svg.to_canonical().unwrap();
        assert!(text.contains("\"fontCache\":\"global\""));
    }

    #[test]
    fn test_flattened_fields_decode_into_base() {
        let svg = SvgOutputOptions::from_canonical(r#"{"scale":2,"fontCache":"none"}"#).unwrap();
        assert_eq!(svg.common.scale, 2.0);
        assert_eq!(svg.common.min_scale, 0.5);
        assert_eq!(svg.font_cache, FontCache::None);
    }

    #[test]
    fn test_chtml_font_url() {
        let chtml = ChtmlOutputOptions::with_font_url("/fonts");
        assert_eq!(chtml.font_url, "/fonts");
        assert!(chtml.match_font_height);
    }
}
