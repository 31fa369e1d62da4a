//! Constants shared by the runtime and the metadata check

/// MathJax release the bundles are built from
pub const MATHJAX_VERSION: &str = "3.2.2";

/// Name of the engine package in the dependency metadata
pub const MATHJAX_PACKAGE: &str = "mathjax-full";

/// Dependency metadata file shipped next to the bundles
pub const METADATA_FILE: &str = "package-lock.json";

/// Environment variable that overrides the bundle directory
pub const BUNDLE_DIR_ENV: &str = "MATHJAX_BRIDGE_BUNDLE_DIR";

/// Bundle directory relative to the package root
pub const BUNDLE_DIR: &str = "resources/mjn/dist";

/// Default font location for CommonHTML output
pub const CHTML_FONT_URL: &str =
    "https://cdn.jsdelivr.net/npm/mathjax@3/es5/output/chtml/fonts/woff-v2";

/// Default pattern MathJax uses to recognise numbers in TeX
pub const TEX_DIGITS_PATTERN: &str =
    r"^(?:[0-9]+(?:\{,\}[0-9]{3})*(?:\.[0-9]*)?|\.[0-9]+)";

/// Script stack limit applied when none is configured
pub const SCRIPT_STACK_SIZE: usize = 1 << 20;

/// Smallest native stack given to a runtime worker thread
pub const WORKER_STACK_FLOOR: usize = 8 << 20;

/// Native stack reserved beyond the script stack limit, for engine frames
/// the limit does not account for
pub const WORKER_STACK_MARGIN: usize = 4 << 20;
