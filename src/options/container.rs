//! Container sizing

use serde::{Deserialize, Serialize};

use super::ConfigGroup;

/// Metrics of the surrounding container the math is laid out in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ContainerOptions {
    /// Size of an em, in pixels
    pub em: f64,
    /// Size of an ex, in pixels
    pub ex: f64,
    /// Width of the container, in pixels
    pub container_width: f64,
    /// Line-breaking width, in pixels
    pub line_width: f64,
    /// Scaling factor applied on top of the output processor's scale
    pub scale: f64,
    /// Append the output processor's stylesheet to the result
    pub css: bool,
    /// Attach hidden assistive MathML to the result
    pub assistive_mml: bool,
}

impl Default for ContainerOptions {
    fn default() -> Self {
        Self {
            em: 16.0,
            ex: 8.0,
            container_width: 80.0 * 16.0,
            line_width: 1_000_000.0,
            scale: 1.0,
            css: false,
            assistive_mml: false,
        }
    }
}

impl ContainerOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Container derived from a font size, using MathJax's ex ≈ em / 2
    pub fn for_font_size(em: f64) -> Self {
        Self {
            em,
            ex: em / 2.0,
            container_width: 80.0 * em,
            ..Self::default()
        }
    }
}

impl ConfigGroup for ContainerOptions {
    const NAME: &'static str = "container";
}
