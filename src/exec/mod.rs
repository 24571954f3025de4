// Copyright 2025 Cowboy AI, LLC.

//! Execution layer: handlers, the expression compiler seam, process runs

mod expression;
mod handler;
mod process;

pub use expression::{ExpressionCompiler, ExpressionFn, StaticExpressionCompiler};
pub use handler::{
    ExpressionHandler, ImplementationHandler, ProcessHandler, ScriptFunctionHandler,
};
pub use process::run_shell;

use crate::errors::EngineResult;
use crate::model::{ArgumentMap, OutputMap};
use futures::future::BoxFuture;
use std::sync::Arc;

/// The future a compiled callable resolves to
pub type CallableFuture = BoxFuture<'static, EngineResult<OutputMap>>;

/// A compiled, ready-to-invoke realization of an implementation
///
/// All variants compile down to this uniform shape, which is what lets the
/// registry stay agnostic of the calling convention that produced it.
pub type Callable = Arc<dyn Fn(ArgumentMap) -> CallableFuture + Send + Sync>;
