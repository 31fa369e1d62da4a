//! TeX extension packages compiled into the engine bundles
//!
//! Names match the identifiers MathJax accepts in `loadPackages`.

use fxhash::FxHashSet;
use lazy_static::lazy_static;

pub const BASE: &str = "base";
pub const ACTION: &str = "action";
pub const AMS: &str = "ams";
pub const AMSCD: &str = "amscd";
pub const BBOX: &str = "bbox";
pub const BOLDSYMBOL: &str = "boldsymbol";
pub const BRAKET: &str = "braket";
pub const BUSSPROOFS: &str = "bussproofs";
pub const CANCEL: &str = "cancel";
pub const CASES: &str = "cases";
pub const CENTERNOT: &str = "centernot";
pub const COLOR: &str = "color";
pub const COLORV2: &str = "colorv2";
pub const COLORTBL: &str = "colortbl";
pub const EMPHEQ: &str = "empheq";
pub const ENCLOSE: &str = "enclose";
pub const EXTPFEIL: &str = "extpfeil";
pub const GENSYMB: &str = "gensymb";
pub const HTML: &str = "html";
pub const MATHTOOLS: &str = "mathtools";
pub const MHCHEM: &str = "mhchem";
pub const NEWCOMMAND: &str = "newcommand";
pub const NOERRORS: &str = "noerrors";
pub const NOUNDEFINED: &str = "noundefined";
pub const UPGREEK: &str = "upgreek";
pub const UNICODE: &str = "unicode";
pub const VERB: &str = "verb";
pub const CONFIGMACROS: &str = "configmacros";
pub const TAGFORMAT: &str = "tagformat";
pub const TEXTCOMP: &str = "textcomp";
pub const TEXTMACROS: &str = "textmacros";

/// Every package the bundles carry, `base` first
pub const ALL: &[&str] = &[
    BASE, ACTION, AMS, AMSCD, BBOX, BOLDSYMBOL, BRAKET, BUSSPROOFS, CANCEL, CASES, CENTERNOT,
    COLOR, COLORV2, COLORTBL, EMPHEQ, ENCLOSE, EXTPFEIL, GENSYMB, HTML, MATHTOOLS, MHCHEM,
    NEWCOMMAND, NOERRORS, NOUNDEFINED, UPGREEK, UNICODE, VERB, CONFIGMACROS, TAGFORMAT, TEXTCOMP,
    TEXTMACROS,
];

lazy_static! {
    static ref KNOWN: FxHashSet<&'static str> = ALL.iter().copied().collect();
}

/// Whether `name` is a package the bundles can load
pub fn is_known(name: &str) -> bool {
    KNOWN.contains(name)
}
