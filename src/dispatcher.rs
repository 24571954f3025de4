// Copyright 2025 Cowboy AI, LLC.

//! Unified function dispatcher
//!
//! Owns the store, the registry and the expression compiler. Dispatch tries
//! direct mapping resolution first, composition resolution second, and
//! fails with a not-found error naming the function when neither path
//! yields something executable. Atomic and composite executions share the
//! registry's single entry point.

use crate::errors::{EngineError, EngineResult};
use crate::exec::ExpressionCompiler;
use crate::loader::ImplementationLoader;
use crate::model::{ArgumentMap, Function, OutputMap};
use crate::registry::ImplementationRegistry;
use crate::resolver::{CompositionResolver, MappingResolver};
use crate::store::{MemoryDescriptorStore, Triple};
use std::sync::Arc;
use tracing::{debug, info_span, Instrument};
use uuid::Uuid;

/// Resolves and executes declaratively described functions
pub struct FunctionDispatcher {
    store: MemoryDescriptorStore,
    registry: ImplementationRegistry,
    compiler: Arc<dyn ExpressionCompiler>,
}

impl FunctionDispatcher {
    /// Create a dispatcher over the given expression compiler
    pub fn new(compiler: Arc<dyn ExpressionCompiler>) -> Self {
        Self {
            store: MemoryDescriptorStore::new(),
            registry: ImplementationRegistry::new(),
            compiler,
        }
    }

    /// The descriptor store backing this dispatcher
    pub fn store(&self) -> &MemoryDescriptorStore {
        &self.store
    }

    /// The implementation registry backing this dispatcher
    pub fn registry(&self) -> &ImplementationRegistry {
        &self.registry
    }

    /// Ingest a named descriptor graph and re-run the implementation load
    /// pass
    pub fn add_graph(&self, iri: &str, triples: Vec<Triple>) -> EngineResult<()> {
        self.store.add_graph(iri, triples);
        self.load_implementations()
    }

    /// Ingest a named descriptor graph without loading implementations
    ///
    /// Use when batching several graphs; call `load_implementations` once
    /// at the end.
    pub fn add_graph_deferred(&self, iri: &str, triples: Vec<Triple>) {
        self.store.add_graph(iri, triples);
    }

    /// Run the implementation load pass over everything currently in the
    /// store
    pub fn load_implementations(&self) -> EngineResult<()> {
        ImplementationLoader::new(&self.store, &self.registry, self.compiler.clone()).load_all()
    }

    /// Materialize a function by iri
    pub fn get_function(&self, iri: &str) -> EngineResult<Function> {
        Function::from_store(&self.store, iri)
    }

    /// Execute a function over an argument map keyed by parameter predicate
    ///
    /// Tries the mapping resolver's pick-first selection, then the first
    /// successfully resolved composition; otherwise fails naming the
    /// function. Never hangs on missing structure, never returns an empty
    /// success for it.
    pub async fn execute_function(
        &self,
        function: &Function,
        args: &ArgumentMap,
    ) -> EngineResult<OutputMap> {
        let invocation = Uuid::new_v4();
        let span = info_span!("execute_function", function = %function.id, %invocation);
        self.dispatch(function, args).instrument(span).await
    }

    async fn dispatch(&self, function: &Function, args: &ArgumentMap) -> EngineResult<OutputMap> {
        let mapping_resolver = MappingResolver::new(&self.store, &self.registry);
        if let Some(implementation) = mapping_resolver.first_usable(function)? {
            debug!(%implementation, "dispatching via mapping");
            return self.registry.execute_implementation(&implementation, args).await;
        }

        let composition_resolver = CompositionResolver::new(&self.store, &self.registry);
        if let Some(executable) = composition_resolver.resolve(function)? {
            debug!(%executable, "dispatching via composition");
            return self.registry.execute_implementation(&executable, args).await;
        }

        Err(EngineError::NoExecutionPath {
            function: function.id.clone(),
        })
    }
}

impl Default for FunctionDispatcher {
    fn default() -> Self {
        Self::new(Arc::new(crate::exec::StaticExpressionCompiler::new()))
    }
}
