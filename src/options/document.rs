//! Document-level options, with the accessibility and safety groups they carry

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::ConfigGroup;

// ============================================================================
// Accessibility
// ============================================================================

/// Speech rule engine settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SreOptions {
    pub speech: String,
    pub domain: String,
    pub style: String,
    pub locale: String,
}

impl Default for SreOptions {
    fn default() -> Self {
        Self {
            speech: "none".to_string(),
            domain: "mathspeak".to_string(),
            style: "default".to_string(),
            locale: "en".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AccessibilityOptions {
    /// Add semantic enrichment to the internal MathML
    pub enable_enrichment: bool,
    /// Compute complexity values
    pub enable_complexity: bool,
    /// Collapse complex sub-expressions
    pub make_collapsible: bool,
    /// Attach the interactive explorer
    pub enable_explorer: bool,
    pub sre: SreOptions,
}

impl AccessibilityOptions {
    /// Enrichment with spoken output
    pub fn with_speech() -> Self {
        Self {
            enable_enrichment: true,
            sre: SreOptions {
                speech: "shallow".to_string(),
                ..SreOptions::default()
            },
            ..Self::default()
        }
    }
}

impl ConfigGroup for AccessibilityOptions {
    const NAME: &'static str = "accessibility";
}

// ============================================================================
// Safety
// ============================================================================

/// How each kind of user-supplied attribute is filtered:
/// `all`, `safe` or `none`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SafeAllowOptions {
    #[serde(rename = "URLs")]
    pub urls: String,
    pub classes: String,
    #[serde(rename = "cssIDs")]
    pub css_ids: String,
    pub styles: String,
}

impl Default for SafeAllowOptions {
    fn default() -> Self {
        Self {
            urls: "safe".to_string(),
            classes: "safe".to_string(),
            css_ids: "safe".to_string(),
            styles: "safe".to_string(),
        }
    }
}

/// Filters applied to attributes that come from the input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SafeOptions {
    pub allow: SafeAllowOptions,
    /// Largest number of digits allowed in a length
    pub length_max: u32,
    pub scriptsizemultiplier_range: [f64; 2],
    pub scriptlevel_range: [i32; 2],
    /// Pattern class names must match
    pub class_pattern: String,
    /// Pattern ids must match
    pub id_pattern: String,
    /// Pattern data attribute names must match
    pub data_pattern: String,
    /// URL protocols allowed in links
    pub safe_protocols: BTreeMap<String, bool>,
}

impl Default for SafeOptions {
    fn default() -> Self {
        let safe_protocols = [
            ("http", true),
            ("https", true),
            ("file", true),
            ("javascript", false),
            ("data", false),
        ]
        .into_iter()
        .map(|(name, allowed)| (name.to_string(), allowed))
        .collect();

        Self {
            allow: SafeAllowOptions::default(),
            length_max: 3,
            scriptsizemultiplier_range: [0.6, 1.0],
            scriptlevel_range: [-2, 2],
            class_pattern: r"^mjx-[-a-zA-Z0-9_.]+$".to_string(),
            id_pattern: r"^mjx-[-a-zA-Z0-9_.]+$".to_string(),
            data_pattern: r"^data-mjx-".to_string(),
            safe_protocols,
        }
    }
}

impl ConfigGroup for SafeOptions {
    const NAME: &'static str = "safe";
}

// ============================================================================
// Document
// ============================================================================

/// Options of the MathJax document the conversion runs in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DocumentOptions {
    /// Tags whose content is never searched for math
    pub skip_html_tags: Vec<String>,
    /// Tags that may appear inside math delimiters, with their text replacement
    pub include_html_tags: BTreeMap<String, String>,
    /// Class marking subtrees to skip
    pub ignore_html_class: String,
    /// Class marking subtrees to process inside skipped ones
    pub process_html_class: String,
    #[serde(flatten)]
    pub accessibility: AccessibilityOptions,
    pub safe_options: SafeOptions,
}

impl Default for DocumentOptions {
    fn default() -> Self {
        let skip_html_tags = [
            "script",
            "noscript",
            "style",
            "textarea",
            "pre",
            "code",
            "annotation",
            "annotation-xml",
        ]
        .iter()
        .map(|t| t.to_string())
        .collect();

        let include_html_tags = [("br", "\n"), ("wbr", ""), ("#comment", "")]
            .into_iter()
            .map(|(tag, text)| (tag.to_string(), text.to_string()))
            .collect();

        Self {
            skip_html_tags,
            include_html_tags,
            ignore_html_class: "mathjax_ignore".to_string(),
            process_html_class: "mathjax_process".to_string(),
            accessibility: AccessibilityOptions::default(),
            safe_options: SafeOptions::default(),
        }
    }
}

impl ConfigGroup for DocumentOptions {
    const NAME: &'static str = "document";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessibility_is_flattened() {
        let text = DocumentOptions::default().to_canonical().unwrap();
        assert!(text.contains("\"enableEnrichment\":false"));
        assert!(text.contains("\"safeOptions\""));
        assert!(!text.contains("\"accessibility\""));
    }

    #[test]
    fn test_safe_option_keys() {
        let text = SafeOptions::default().to_canonical().unwrap();
        assert!(text.contains("\"URLs\":\"safe\""));
        assert!(text.contains("\"cssIDs\":\"safe\""));
        assert!(text.contains("\"scriptlevelRange\":[-2,2]"));
    }

    #[test]
    fn test_default_protocols() {
        let safe = SafeOptions::default();
        assert_eq!(safe.safe_protocols.get("https"), Some(&true));
        assert_eq!(safe.safe_protocols.get("javascript"), Some(&false));
    }

    #[test]
    fn test_with_speech() {
        let accessibility = AccessibilityOptions::with_speech();
        assert!(accessibility.enable_enrichment);
        assert_eq!(accessibility.sre.speech, "shallow");
        assert_eq!(accessibility.sre.locale, "en");
    }

    #[test]
    fn test_skip_tags() {
        let document = DocumentOptions::default();
        assert!(document.skip_html_tags.iter().any(|t| t == "script"));
        assert_eq!(document.include_html_tags.get("br").map(String::as_str), Some("\n"));
    }
}
