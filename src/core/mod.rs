//! Core runtime modules
//!
//! This module contains the pieces between the public API and the engine:
//! - `engine`: script host abstraction and the QuickJS host
//! - `invoke`: bundle loading and converter calls on the worker thread
//! - `runtime`: the `MathJax` runtime manager and its job queue
//! - `convert`: per-operation conversion methods

pub mod convert;
pub mod engine;
pub mod invoke;
pub mod runtime;

pub use engine::{Argument, Bundle, ExceptionSink, QuickJsHost, ScriptHost};
pub use invoke::Session;
pub use runtime::{MathJax, RuntimeOptions};
