//! Script host abstraction
//!
//! Everything above this module talks to the embedded engine through
//! [`ScriptHost`]: load a bundle, check that a converter exists, call it.
//! The only implementation is [`QuickJsHost`]; a host is created on and
//! confined to the runtime's worker thread, so it need not be `Send`.

mod quickjs;

pub use quickjs::QuickJsHost;

use std::fmt;
use std::sync::Arc;

use crate::data::registry::{FunctionLocator, OutputFormat};
use crate::options::ConfigGroup;
use crate::utils::error::Result;

/// Observer for uncaught script exceptions. Receives the raw diagnostic,
/// or `None` when the engine provided none.
pub type ExceptionSink = Arc<dyn Fn(Option<&str>) + Send + Sync>;

/// Source of one engine bundle
#[derive(Clone, PartialEq, Eq)]
pub struct Bundle {
    pub format: OutputFormat,
    /// Where the source came from, for diagnostics
    pub location: String,
    pub source: String,
}

impl fmt::Debug for Bundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bundle")
            .field("format", &self.format)
            .field("location", &self.location)
            .field("source_len", &self.source.len())
            .finish()
    }
}

/// A positional argument of an engine call
#[derive(Debug, Clone, PartialEq)]
pub enum Argument {
    /// Passed as a script string
    Text(String),
    /// Passed as a script boolean
    Flag(bool),
    /// A configuration group in its canonical text form, passed as a string
    Group { name: &'static str, text: String },
}

impl Argument {
    /// Serialize `group` into an argument
    pub fn group<G: ConfigGroup>(group: &G) -> Result<Self> {
        Ok(Argument::Group {
            name: G::NAME,
            text: group.to_canonical()?,
        })
    }
}

/// Capability the runtime needs from an embedded script engine
pub trait ScriptHost {
    /// Evaluate a bundle's source in the global scope
    fn load(&mut self, bundle: &Bundle) -> Result<()>;

    /// Whether `locator` names a callable
    fn has_function(&self, locator: &FunctionLocator) -> bool;

    /// Call the function at `locator` and return its result as text
    fn call(&mut self, locator: &FunctionLocator, args: &[Argument]) -> Result<String>;
}
