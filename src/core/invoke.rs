//! Invoker
//!
//! A [`Session`] is the state living on a runtime's worker thread: the
//! script host, the resolver bundles are read from, and the set of bundles
//! already evaluated. It performs one conversion end-to-end: make sure the
//! bundle is there, resolve the converter, call it, check the output.

use fxhash::FxHashSet;
use std::sync::Arc;
use tracing::{debug, trace};

use super::engine::{Argument, Bundle, ScriptHost};
use crate::data::registry::{operations_for, resolve, Operation, OutputFormat};
use crate::utils::error::{MathJaxError, Result};
use crate::utils::files::BundleResolver;

pub struct Session<H: ScriptHost> {
    host: H,
    resolver: Arc<dyn BundleResolver>,
    loaded: FxHashSet<OutputFormat>,
}

impl<H: ScriptHost> Session<H> {
    pub fn new(host: H, resolver: Arc<dyn BundleResolver>) -> Self {
        Self {
            host,
            resolver,
            loaded: FxHashSet::default(),
        }
    }

    pub fn is_loaded(&self, format: OutputFormat) -> bool {
        self.loaded.contains(&format)
    }

    /// Loaded formats, in a stable order
    pub fn loaded_formats(&self) -> Vec<OutputFormat> {
        let mut formats: Vec<_> = self.loaded.iter().copied().collect();
        formats.sort();
        formats
    }

    /// Evaluate the bundle for `format` unless that already happened, then
    /// check it defines every converter the registry expects of it
    pub fn ensure_loaded(&mut self, format: OutputFormat) -> Result<()> {
        if self.is_loaded(format) {
            return Ok(());
        }

        let location = self.resolver.bundle_location(format);
        let source = self.resolver.read_bundle(format).map_err(|e| {
            debug!(%format, error = %e, "bundle unavailable");
            MathJaxError::BundleMissing(location.clone())
        })?;

        self.host.load(&Bundle {
            format,
            location: location.clone(),
            source,
        })?;

        if let Some(missing) = operations_for(format)
            .map(Operation::locator)
            .find(|locator| !self.host.has_function(locator))
        {
            return Err(MathJaxError::FunctionMissing(missing.function.to_string()));
        }

        self.loaded.insert(format);
        debug!(%format, %location, "loaded engine bundle");
        Ok(())
    }

    /// Call the converter for `operation` and return its raw text
    pub fn invoke(&mut self, operation: Operation, args: &[Argument]) -> Result<String> {
        let resolution = resolve(operation);
        self.ensure_loaded(resolution.format)?;
        trace!(%operation, "invoking");
        self.host.call(&resolution.locator, args)
    }

    /// Invoke and validate; the result is either clean markup or the
    /// content error the markup carries
    pub fn convert(&mut self, operation: Operation, args: &[Argument]) -> Result<String> {
        let raw = self.invoke(operation, args)?;
        resolve(operation).parser.validate(raw)
    }

    /// Run `calls` in order, stopping at the first failure
    pub fn run_all(
        &mut self,
        operation: Operation,
        calls: &[Vec<Argument>],
        validate: bool,
    ) -> Result<Vec<String>> {
        calls
            .iter()
            .map(|args| {
                if validate {
                    self.convert(operation, args)
                } else {
                    self.invoke(operation, args)
                }
            })
            .collect()
    }
}
