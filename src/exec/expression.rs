// Copyright 2025 Cowboy AI, LLC.

//! Source-to-callable compilation seam
//!
//! Descriptors carry expression implementations as opaque source text. This
//! module is the trust boundary around turning that text into something
//! invocable: the engine itself never evaluates descriptor-supplied code.
//! The shipped compiler only resolves source text that the host program
//! statically registered; unknown source fails to compile.

use crate::errors::{EngineError, EngineResult};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// A compiled expression body
///
/// Invoked with argument values bound positionally in the stored order of
/// the implementation's property parameters.
pub type ExpressionFn = Arc<dyn Fn(&[Value]) -> EngineResult<Value> + Send + Sync>;

/// Compiles stored source text into an invocable expression
///
/// Implementors define the trust policy. Anything that executes text it did
/// not validate is executing code supplied by whoever authored the
/// descriptors.
pub trait ExpressionCompiler: Send + Sync {
    /// Compile `source` into a callable over the named parameters
    ///
    /// `parameter_names` lists the declared property names in stored order;
    /// a compiler that parses the source can bind them, the static compiler
    /// ignores them.
    fn compile(&self, source: &str, parameter_names: &[String]) -> EngineResult<ExpressionFn>;
}

/// Compiler over statically registered callables
///
/// The host registers `(source text, callable)` pairs up front; compilation
/// is an exact-match lookup on the source text. Descriptor text that was
/// never registered cannot run.
#[derive(Clone, Default)]
pub struct StaticExpressionCompiler {
    entries: Arc<RwLock<HashMap<String, ExpressionFn>>>,
}

impl StaticExpressionCompiler {
    /// Create an empty compiler
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callable for an exact source text
    pub fn register<F>(&self, source: impl Into<String>, body: F)
    where
        F: Fn(&[Value]) -> EngineResult<Value> + Send + Sync + 'static,
    {
        self.entries
            .write()
            .unwrap()
            .insert(source.into(), Arc::new(body));
    }

    /// Number of registered sources
    pub fn len(&self) -> usize {
        self.entries.read().unwrap().len()
    }

    /// Whether no sources are registered
    pub fn is_empty(&self) -> bool {
        self.entries.read().unwrap().is_empty()
    }
}

impl ExpressionCompiler for StaticExpressionCompiler {
    fn compile(&self, source: &str, _parameter_names: &[String]) -> EngineResult<ExpressionFn> {
        self.entries
            .read()
            .unwrap()
            .get(source)
            .cloned()
            .ok_or_else(|| {
                EngineError::Compile(format!(
                    "expression source not registered with the static compiler: `{source}`"
                ))
            })
    }
}
