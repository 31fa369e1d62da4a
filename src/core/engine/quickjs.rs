//! QuickJS implementation of [`ScriptHost`]

use rquickjs::function::Rest;
use rquickjs::{
    CatchResultExt, CaughtError, Context, Ctx, Function, IntoJs, Object, Runtime, Value,
};
use tracing::{debug, trace, warn};

use super::{Argument, Bundle, ExceptionSink, ScriptHost};
use crate::data::registry::FunctionLocator;
use crate::utils::error::{MathJaxError, Result};

/// One QuickJS runtime with a single full context
pub struct QuickJsHost {
    context: Context,
    // Kept alive for as long as the context
    _runtime: Runtime,
    sink: Option<ExceptionSink>,
}

impl QuickJsHost {
    /// Create a runtime, applying the optional memory and stack limits
    pub fn new(
        memory_limit: Option<usize>,
        max_stack_size: Option<usize>,
        sink: Option<ExceptionSink>,
    ) -> Result<Self> {
        let runtime =
            Runtime::new().map_err(|e| MathJaxError::RuntimeCreationFailed(e.to_string()))?;
        if let Some(limit) = memory_limit {
            runtime.set_memory_limit(limit);
        }
        if let Some(size) = max_stack_size {
            runtime.set_max_stack_size(size);
        }
        let context = Context::full(&runtime)
            .map_err(|e| MathJaxError::RuntimeCreationFailed(e.to_string()))?;

        debug!(?memory_limit, ?max_stack_size, "created QuickJS runtime");
        Ok(Self {
            context,
            _runtime: runtime,
            sink,
        })
    }

    fn report(&self, caught: &CaughtError<'_>) {
        let detail = describe(caught);
        warn!(detail = detail.as_deref().unwrap_or("<none>"), "uncaught script exception");
        if let Some(sink) = &self.sink {
            sink(detail.as_deref());
        }
    }

    /// Read `object[key]`; a throwing accessor is reported and reads as absent
    fn property<'js>(
        &self,
        ctx: &Ctx<'js>,
        object: &Object<'js>,
        key: &str,
    ) -> Option<Value<'js>> {
        match object.get::<_, Value>(key).catch(ctx) {
            Ok(value) => Some(value),
            Err(caught) => {
                self.report(&caught);
                None
            }
        }
    }

    /// Walk `globalThis[module][class][function]`
    fn lookup<'js>(&self, ctx: &Ctx<'js>, locator: &FunctionLocator) -> Result<Function<'js>> {
        let module = self
            .property(ctx, &ctx.globals(), locator.module)
            .and_then(Value::into_object)
            .ok_or_else(|| MathJaxError::ModuleMissing(locator.module.to_string()))?;

        let class = self
            .property(ctx, &module, locator.class)
            .and_then(Value::into_object)
            .ok_or_else(|| MathJaxError::ClassMissing(locator.class.to_string()))?;

        self.property(ctx, &class, locator.function)
            .and_then(Value::into_function)
            .ok_or_else(|| MathJaxError::FunctionMissing(locator.function.to_string()))
    }
}

impl ScriptHost for QuickJsHost {
    fn load(&mut self, bundle: &Bundle) -> Result<()> {
        self.context.with(|ctx| {
            ctx.eval::<(), _>(bundle.source.as_str())
                .catch(&ctx)
                .map_err(|caught| {
                    self.report(&caught);
                    MathJaxError::BundleMissing(format!(
                        "{} (evaluation failed: {})",
                        bundle.location, caught
                    ))
                })
        })
    }

    fn has_function(&self, locator: &FunctionLocator) -> bool {
        self.context.with(|ctx| self.lookup(&ctx, locator).is_ok())
    }

    fn call(&mut self, locator: &FunctionLocator, args: &[Argument]) -> Result<String> {
        self.context.with(|ctx| {
            let function = self.lookup(&ctx, locator)?;

            let values = args
                .iter()
                .map(|arg| to_value(&ctx, arg))
                .collect::<rquickjs::Result<Vec<_>>>()
                .map_err(|e| MathJaxError::ConversionUnknownError(e.to_string()))?;

            trace!(%locator, argc = values.len(), "calling converter");
            let result = match function.call::<_, Value>((Rest(values),)).catch(&ctx) {
                Ok(value) => value,
                Err(caught) => {
                    self.report(&caught);
                    return Err(MathJaxError::ConversionFailed(locator.function.to_string()));
                }
            };

            if result.is_undefined() || result.is_null() {
                return Err(MathJaxError::ConversionFailed(locator.function.to_string()));
            }

            result
                .as_string()
                .and_then(|s| s.to_string().ok())
                .ok_or_else(|| MathJaxError::ConversionInvalidFormat(locator.function.to_string()))
        })
    }
}

fn to_value<'js>(ctx: &Ctx<'js>, arg: &Argument) -> rquickjs::Result<Value<'js>> {
    match arg {
        Argument::Text(text) | Argument::Group { text, .. } => text.as_str().into_js(ctx),
        Argument::Flag(flag) => flag.into_js(ctx),
    }
}

/// Best available text for a thrown value
fn describe(caught: &CaughtError<'_>) -> Option<String> {
    match caught {
        CaughtError::Exception(exception) => exception.message(),
        CaughtError::Value(value) => value.as_string().and_then(|s| s.to_string().ok()),
        CaughtError::Error(error) => Some(error.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::registry::OutputFormat;
    use std::sync::{Arc, Mutex};

    const LOCATOR: FunctionLocator = FunctionLocator {
        module: "mml",
        class: "TeXConverter",
        function: "tex2mml",
    };

    fn bundle(source: &str) -> Bundle {
        Bundle {
            format: OutputFormat::Mathml,
            location: "memory:mml.bundle.js".to_string(),
            source: source.to_string(),
        }
    }

    fn host_with(source: &str) -> QuickJsHost {
        let mut host = QuickJsHost::new(None, None, None).unwrap();
        host.load(&bundle(source)).unwrap();
        host
    }

    #[test]
    fn test_call_passes_arguments_in_order() {
        let mut host = host_with(
            r#"globalThis.mml = { TeXConverter: {
                tex2mml: function (input, inline, group) {
                    return input + "|" + inline + "|" + JSON.parse(group).em;
                }
            } };"#,
        );
        let args = [
            Argument::Text("x".to_string()),
            Argument::Flag(true),
            Argument::Group {
                name: "container",
                text: r#"{"em":16}"#.to_string(),
            },
        ];
        assert_eq!(host.call(&LOCATOR, &args).unwrap(), "x|true|16");
    }

    #[test]
    fn test_lookup_failures() {
        let mut host = host_with("globalThis.mml = { TeXConverter: { tex2mml: 42 } };");
        assert!(!host.has_function(&LOCATOR));
        assert_eq!(
            host.call(&LOCATOR, &[]),
            Err(MathJaxError::FunctionMissing("tex2mml".to_string()))
        );

        let mut host = host_with("globalThis.mml = {};");
        assert_eq!(
            host.call(&LOCATOR, &[]),
            Err(MathJaxError::ClassMissing("TeXConverter".to_string()))
        );

        let mut host = QuickJsHost::new(None, None, None).unwrap();
        assert_eq!(
            host.call(&LOCATOR, &[]),
            Err(MathJaxError::ModuleMissing("mml".to_string()))
        );
    }

    #[test]
    fn test_result_kinds() {
        let mut host = host_with(
            r#"globalThis.mml = { TeXConverter: { tex2mml: function (input) {
                if (input === "number") return 7;
                if (input === "null") return null;
                return undefined;
            } } };"#,
        );
        assert_eq!(
            host.call(&LOCATOR, &[Argument::Text("number".to_string())]),
            Err(MathJaxError::ConversionInvalidFormat("tex2mml".to_string()))
        );
        assert_eq!(
            host.call(&LOCATOR, &[Argument::Text("null".to_string())]),
            Err(MathJaxError::ConversionFailed("tex2mml".to_string()))
        );
        assert_eq!(
            host.call(&LOCATOR, &[Argument::Text("other".to_string())]),
            Err(MathJaxError::ConversionFailed("tex2mml".to_string()))
        );
    }

    #[test]
    fn test_exception_reaches_sink() {
        let seen: Arc<Mutex<Vec<Option<String>>>> = Arc::default();
        let recorder = Arc::clone(&seen);
        let sink: ExceptionSink = Arc::new(move |detail: Option<&str>| {
            recorder.lock().unwrap().push(detail.map(str::to_string));
        });

        let mut host = QuickJsHost::new(None, None, Some(sink)).unwrap();
        host.load(&bundle(
            r#"globalThis.mml = { TeXConverter: { tex2mml: function () {
                throw new Error("engine exploded");
            } } };"#,
        ))
        .unwrap();

        assert_eq!(
            host.call(&LOCATOR, &[]),
            Err(MathJaxError::ConversionFailed("tex2mml".to_string()))
        );
        assert_eq!(
            seen.lock().unwrap().as_slice(),
            &[Some("engine exploded".to_string())]
        );
    }

    #[test]
    fn test_throwing_accessor_reaches_sink() {
        let seen: Arc<Mutex<Vec<Option<String>>>> = Arc::default();
        let recorder = Arc::clone(&seen);
        let sink: ExceptionSink = Arc::new(move |detail: Option<&str>| {
            recorder.lock().unwrap().push(detail.map(str::to_string));
        });

        let mut host = QuickJsHost::new(None, None, Some(sink)).unwrap();
        host.load(&bundle(
            r#"var converter = {};
            Object.defineProperty(converter, "tex2mml", {
                get: function () { throw new Error("accessor exploded"); }
            });
            globalThis.mml = { TeXConverter: converter };"#,
        ))
        .unwrap();

        assert_eq!(
            host.call(&LOCATOR, &[]),
            Err(MathJaxError::FunctionMissing("tex2mml".to_string()))
        );
        assert!(!host.has_function(&LOCATOR));
        assert_eq!(
            seen.lock().unwrap().as_slice(),
            &[
                Some("accessor exploded".to_string()),
                Some("accessor exploded".to_string())
            ]
        );
    }

    #[test]
    fn test_bad_bundle_source() {
        let mut host = QuickJsHost::new(None, None, None).unwrap();
        let err = host.load(&bundle("this is not javascript (")).unwrap_err();
        assert!(matches!(err, MathJaxError::BundleMissing(ref loc) if loc.contains("memory:mml.bundle.js")));
    }
}
