//! Runtime manager
//!
//! A [`MathJax`] owns one script environment. The environment lives on a
//! dedicated worker thread and every request reaches it through a FIFO job
//! queue, so calls on one instance run one at a time and in the order they
//! were dispatched. Separate instances share nothing and run in parallel.
//!
//! Jobs that were dispatched always run to completion. An async caller that
//! stops waiting only discards the reply.

use std::fmt;
use std::sync::mpsc;
use std::sync::Arc;
use std::thread::{self, JoinHandle, ThreadId};

use tokio::sync::oneshot;
use tracing::{debug, warn};

use super::engine::{Argument, ExceptionSink, QuickJsHost};
use super::invoke::Session;
use crate::data::constants::{SCRIPT_STACK_SIZE, WORKER_STACK_FLOOR, WORKER_STACK_MARGIN};
use crate::data::registry::{Operation, OutputFormat};
use crate::utils::error::{MathJaxError, Result};
use crate::utils::files::{BundleResolver, DirBundleResolver};
use crate::utils::metadata::PackageMetadata;

// ============================================================================
// Options
// ============================================================================

/// How a runtime is set up
#[derive(Clone)]
pub struct RuntimeOptions {
    /// Bundles loaded at construction; the rest load on first use
    pub preferred_formats: Vec<OutputFormat>,
    /// Observer for uncaught script exceptions
    pub exception_sink: Option<ExceptionSink>,
    /// Where bundle sources come from
    pub resolver: Arc<dyn BundleResolver>,
    /// QuickJS heap limit in bytes
    pub memory_limit: Option<usize>,
    /// QuickJS stack limit in bytes; the worker thread's native stack is
    /// sized to fit it
    pub max_stack_size: Option<usize>,
}

impl Default for RuntimeOptions {
    fn default() -> Self {
        Self {
            preferred_formats: Vec::new(),
            exception_sink: None,
            resolver: Arc::new(DirBundleResolver::from_env()),
            memory_limit: None,
            max_stack_size: None,
        }
    }
}

impl RuntimeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_preferred_formats(mut self, formats: &[OutputFormat]) -> Self {
        self.preferred_formats = formats.to_vec();
        self
    }

    /// Load every bundle at construction
    pub fn eager(self) -> Self {
        self.with_preferred_formats(&OutputFormat::ALL)
    }

    /// Observe uncaught script exceptions.
    ///
    /// The sink runs on the runtime's worker thread while a job is in
    /// progress. Calls it makes back into the same [`MathJax`] fail with
    /// [`MathJaxError::ReentrantCall`] instead of waiting on themselves.
    pub fn with_exception_sink<F>(mut self, sink: F) -> Self
    where
        F: Fn(Option<&str>) + Send + Sync + 'static,
    {
        self.exception_sink = Some(Arc::new(sink));
        self
    }

    pub fn with_resolver<R: BundleResolver + 'static>(mut self, resolver: R) -> Self {
        self.resolver = Arc::new(resolver);
        self
    }

    pub fn with_memory_limit(mut self, bytes: usize) -> Self {
        self.memory_limit = Some(bytes);
        self
    }

    /// Raise or lower the script recursion limit. Zero keeps the default,
    /// as QuickJS would otherwise stop checking altogether.
    pub fn with_max_stack_size(mut self, bytes: usize) -> Self {
        self.max_stack_size = Some(bytes);
        self
    }
}

impl fmt::Debug for RuntimeOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuntimeOptions")
            .field("preferred_formats", &self.preferred_formats)
            .field("exception_sink", &self.exception_sink.is_some())
            .field("memory_limit", &self.memory_limit)
            .field("max_stack_size", &self.max_stack_size)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Jobs
// ============================================================================

/// Reply channel of a job: blocking callers wait on std, async callers on
/// a oneshot
pub(crate) enum Reply<T> {
    Blocking(mpsc::Sender<Result<T>>),
    Async(oneshot::Sender<Result<T>>),
}

impl<T> Reply<T> {
    fn send(self, result: Result<T>) {
        // A closed channel means the caller stopped waiting
        match self {
            Reply::Blocking(tx) => {
                let _ = tx.send(result);
            }
            Reply::Async(tx) => {
                let _ = tx.send(result);
            }
        }
    }
}

pub(crate) enum Job {
    Load {
        format: OutputFormat,
        reply: Reply<()>,
    },
    Loaded {
        reply: Reply<Vec<OutputFormat>>,
    },
    Invoke {
        operation: Operation,
        calls: Vec<Vec<Argument>>,
        validate: bool,
        reply: Reply<Vec<String>>,
    },
}

/// Script stack limit for a configured value
fn script_stack_limit(configured: Option<usize>) -> usize {
    match configured {
        Some(0) | None => SCRIPT_STACK_SIZE,
        Some(bytes) => bytes,
    }
}

/// Native stack for a worker whose script stack is `script_limit`; the
/// script limit must trip before the thread itself overflows
fn worker_stack_size(script_limit: usize) -> usize {
    script_limit
        .saturating_add(WORKER_STACK_MARGIN)
        .max(WORKER_STACK_FLOOR)
}

fn serve(mut session: Session<QuickJsHost>, jobs: mpsc::Receiver<Job>) {
    while let Ok(job) = jobs.recv() {
        match job {
            Job::Load { format, reply } => reply.send(session.ensure_loaded(format)),
            Job::Loaded { reply } => reply.send(Ok(session.loaded_formats())),
            Job::Invoke {
                operation,
                calls,
                validate,
                reply,
            } => reply.send(session.run_all(operation, &calls, validate)),
        }
    }
    debug!("runtime worker stopped");
}

// ============================================================================
// Runtime
// ============================================================================

/// A MathJax runtime: one embedded script environment and its job queue
///
/// Dropping the last handle blocks until the queued jobs have run and the
/// worker has exited. In async code, drop it where blocking is acceptable
/// (e.g. inside `tokio::task::spawn_blocking`).
pub struct MathJax {
    queue: Option<mpsc::Sender<Job>>,
    worker: Option<JoinHandle<()>>,
    worker_id: ThreadId,
    resolver: Arc<dyn BundleResolver>,
}

impl MathJax {
    /// Create a runtime with the default bundle location, loading the
    /// `preferred` bundles up front
    pub fn new(preferred: &[OutputFormat]) -> Result<Self> {
        Self::with_options(RuntimeOptions::default().with_preferred_formats(preferred))
    }

    /// Create a runtime from explicit options
    pub fn with_options(options: RuntimeOptions) -> Result<Self> {
        let RuntimeOptions {
            mut preferred_formats,
            exception_sink,
            resolver,
            memory_limit,
            max_stack_size,
        } = options;
        preferred_formats.sort();
        preferred_formats.dedup();

        let (queue, jobs) = mpsc::channel::<Job>();
        let (ready_tx, ready_rx) = mpsc::channel::<Result<()>>();
        let worker_resolver = Arc::clone(&resolver);
        let script_limit = script_stack_limit(max_stack_size);

        let worker = thread::Builder::new()
            .name("mathjax-runtime".to_string())
            .stack_size(worker_stack_size(script_limit))
            .spawn(move || {
                let host = match QuickJsHost::new(memory_limit, Some(script_limit), exception_sink) {
                    Ok(host) => host,
                    Err(err) => {
                        let _ = ready_tx.send(Err(err));
                        return;
                    }
                };
                let mut session = Session::new(host, worker_resolver);
                for format in preferred_formats {
                    if let Err(err) = session.ensure_loaded(format) {
                        let _ = ready_tx.send(Err(err));
                        return;
                    }
                }
                let _ = ready_tx.send(Ok(()));
                serve(session, jobs);
            })
            .map_err(|e| MathJaxError::RuntimeCreationFailed(e.to_string()))?;

        let startup = ready_rx.recv().unwrap_or_else(|_| {
            Err(MathJaxError::RuntimeCreationFailed(
                "runtime worker exited during start-up".to_string(),
            ))
        });
        if let Err(err) = startup {
            let _ = worker.join();
            return Err(err);
        }

        debug!(script_limit, "runtime ready");
        Ok(Self {
            queue: Some(queue),
            worker_id: worker.thread().id(),
            worker: Some(worker),
            resolver,
        })
    }

    fn on_worker(&self) -> bool {
        thread::current().id() == self.worker_id
    }

    fn send(&self, job: Job) -> Result<()> {
        // The worker would wait on a reply only it can produce
        if self.on_worker() {
            return Err(MathJaxError::ReentrantCall);
        }
        self.queue
            .as_ref()
            .ok_or(MathJaxError::DeallocatedSelf)?
            .send(job)
            .map_err(|_| MathJaxError::DeallocatedSelf)
    }

    /// Queue a job and block until its reply arrives
    pub(crate) fn dispatch<T>(&self, job: impl FnOnce(Reply<T>) -> Job) -> Result<T> {
        let (tx, rx) = mpsc::channel();
        self.send(job(Reply::Blocking(tx)))?;
        rx.recv().map_err(|_| MathJaxError::DeallocatedSelf)?
    }

    /// Queue a job and await its reply
    pub(crate) async fn dispatch_async<T>(&self, job: impl FnOnce(Reply<T>) -> Job) -> Result<T> {
        let (tx, rx) = oneshot::channel();
        self.send(job(Reply::Async(tx)))?;
        rx.await.map_err(|_| MathJaxError::DeallocatedSelf)?
    }

    /// Load the bundle for `format` if it is not loaded yet
    pub fn ensure_loaded(&self, format: OutputFormat) -> Result<()> {
        self.dispatch(|reply| Job::Load { format, reply })
    }

    pub async fn ensure_loaded_async(&self, format: OutputFormat) -> Result<()> {
        self.dispatch_async(|reply| Job::Load { format, reply }).await
    }

    /// Formats whose bundles are currently loaded
    pub fn loaded_formats(&self) -> Result<Vec<OutputFormat>> {
        self.dispatch(|reply| Job::Loaded { reply })
    }

    /// Call a converter and return its raw output, without validation
    pub fn invoke(&self, operation: Operation, args: Vec<Argument>) -> Result<String> {
        let mut results = self.dispatch(|reply| Job::Invoke {
            operation,
            calls: vec![args],
            validate: false,
            reply,
        })?;
        results
            .pop()
            .ok_or_else(|| MathJaxError::ConversionUnknownError("empty reply".to_string()))
    }

    /// Read the dependency metadata that ships with the bundles
    pub fn metadata(&self) -> Result<PackageMetadata> {
        let text = self
            .resolver
            .read_metadata()
            .map_err(|_| MathJaxError::PackageFileMissing(self.resolver.metadata_location()))?;
        PackageMetadata::parse(&text)
    }

    /// Check that the bundled engine is the version this crate targets.
    /// Advisory: conversions do not depend on it.
    pub fn check_version(&self) -> Result<()> {
        self.metadata()?.check_engine_version()
    }
}

impl fmt::Debug for MathJax {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MathJax")
            .field("running", &self.queue.is_some())
            .finish_non_exhaustive()
    }
}

impl Drop for MathJax {
    fn drop(&mut self) {
        // Closing the queue ends the worker loop once pending jobs are done
        self.queue.take();
        if let Some(worker) = self.worker.take() {
            if self.on_worker() {
                debug!("runtime dropped on its own worker; detaching");
                return;
            }
            if worker.join().is_err() {
                warn!("runtime worker panicked");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::files::MemoryBundleResolver;

    const MML_BUNDLE: &str = r#"globalThis.mml = {
        TeXConverter: { tex2mml: function (input) { return "<math><mi>" + input + "</mi></math>"; } },
        AMConverter: { am2mml: function (input) { return "<math><mn>" + input + "</mn></math>"; } }
    };"#;

    fn options() -> RuntimeOptions {
        RuntimeOptions::new()
            .with_resolver(MemoryBundleResolver::new().with_bundle(OutputFormat::Mathml, MML_BUNDLE))
    }

    #[test]
    fn test_invoke_returns_raw_output() {
        let mathjax = MathJax::with_options(options()).unwrap();
        let raw = mathjax
            .invoke(Operation::TexToMml, vec![Argument::Text("z".to_string())])
            .unwrap();
        assert_eq!(raw, "<math><mi>z</mi></math>");
        assert_eq!(mathjax.loaded_formats().unwrap(), vec![OutputFormat::Mathml]);
    }

    #[test]
    fn test_stopped_worker() {
        let mut mathjax = MathJax::with_options(options()).unwrap();
        mathjax.queue.take();
        assert_eq!(mathjax.loaded_formats(), Err(MathJaxError::DeallocatedSelf));
        assert_eq!(
            mathjax.ensure_loaded(OutputFormat::Mathml),
            Err(MathJaxError::DeallocatedSelf)
        );
    }

    #[test]
    fn test_start_up_failure() {
        let err = MathJax::with_options(options().eager()).unwrap_err();
        assert_eq!(err, MathJaxError::BundleMissing("memory:chtml.bundle.js".to_string()));
    }

    const RECURSIVE_BUNDLE: &str = r#"globalThis.mml = {
        TeXConverter: { tex2mml: function () {
            function depth(n) { return n === 0 ? 0 : 1 + depth(n - 1); }
            return String(depth(1000000));
        } },
        AMConverter: { am2mml: function () { throw new Error("am2mml failed"); } }
    };"#;

    fn recursive_options() -> RuntimeOptions {
        RuntimeOptions::new().with_resolver(
            MemoryBundleResolver::new().with_bundle(OutputFormat::Mathml, RECURSIVE_BUNDLE),
        )
    }

    fn text(input: &str) -> Vec<Argument> {
        vec![Argument::Text(input.to_string())]
    }

    #[test]
    fn test_worker_stack_fits_script_limit() {
        assert_eq!(script_stack_limit(None), SCRIPT_STACK_SIZE);
        assert_eq!(script_stack_limit(Some(0)), SCRIPT_STACK_SIZE);
        assert_eq!(script_stack_limit(Some(64 << 20)), 64 << 20);

        assert_eq!(worker_stack_size(SCRIPT_STACK_SIZE), WORKER_STACK_FLOOR);
        assert_eq!(worker_stack_size(64 << 20), (64 << 20) + WORKER_STACK_MARGIN);
        assert_eq!(worker_stack_size(usize::MAX), usize::MAX);
    }

    #[test]
    fn test_deep_recursion_fails_cleanly() {
        let mathjax = MathJax::with_options(recursive_options()).unwrap();
        assert_eq!(
            mathjax.invoke(Operation::TexToMml, text("x")),
            Err(MathJaxError::ConversionFailed("tex2mml".to_string()))
        );
    }

    #[test]
    fn test_deep_recursion_with_raised_limit() {
        for limit in [0, 16 << 20, 64 << 20] {
            let mathjax =
                MathJax::with_options(recursive_options().with_max_stack_size(limit)).unwrap();
            assert_eq!(
                mathjax.invoke(Operation::TexToMml, text("x")),
                Err(MathJaxError::ConversionFailed("tex2mml".to_string())),
                "limit {}",
                limit
            );
            // The worker survives and keeps serving
            assert_eq!(mathjax.loaded_formats().unwrap(), vec![OutputFormat::Mathml]);
        }
    }

    #[test]
    fn test_sink_calling_back_into_runtime() {
        use std::sync::{Mutex, Weak};

        let slot: Arc<Mutex<Option<Weak<MathJax>>>> = Arc::default();
        let seen: Arc<Mutex<Vec<Result<Vec<OutputFormat>>>>> = Arc::default();
        let (sink_slot, sink_seen) = (Arc::clone(&slot), Arc::clone(&seen));

        let mathjax = Arc::new(
            MathJax::with_options(recursive_options().with_exception_sink(move |_| {
                let runtime = sink_slot.lock().unwrap().as_ref().and_then(Weak::upgrade);
                if let Some(runtime) = runtime {
                    sink_seen.lock().unwrap().push(runtime.loaded_formats());
                }
            }))
            .unwrap(),
        );
        *slot.lock().unwrap() = Some(Arc::downgrade(&mathjax));

        assert_eq!(
            mathjax.invoke(Operation::AsciiMathToMml, text("x")),
            Err(MathJaxError::ConversionFailed("am2mml".to_string()))
        );
        assert_eq!(
            seen.lock().unwrap().as_slice(),
            &[Err(MathJaxError::ReentrantCall)]
        );
        assert!(mathjax.loaded_formats().is_ok());
    }

    #[test]
    fn test_options_debug_hides_sink() {
        let text = format!("{:?}", options().with_exception_sink(|_| {}).with_memory_limit(1 << 20));
        assert!(text.contains("exception_sink: true"));
        assert!(text.contains("memory_limit: Some(1048576)"));
    }
}
