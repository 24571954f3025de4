// Copyright 2025 Cowboy AI, LLC.

//! # CIM FnO
//!
//! Declarative function resolution and execution for the Composable
//! Information Machine. Functions are described, not coded: an abstract
//! operation with declared parameters and outputs is linked - through
//! declarative mappings - to concrete implementations with incompatible
//! calling conventions, or to acyclic pipelines composed of other
//! functions.
//!
//! This crate provides the building blocks:
//! - **Descriptor Store**: pattern-matching seam over loaded descriptions
//! - **Parameter Mapping Model**: Position / Property / PositionProperty /
//!   Output classification of calling-convention slots
//! - **Implementation Variants**: external processes, registered script
//!   expressions, and (unexecutable) script functions as one closed union
//! - **Implementation Registry**: the strategy table between resolution and
//!   execution
//! - **Mapping Resolver**: links a function to a usable implementation with
//!   resolved direction tables
//! - **Composition Resolver**: builds, validates and registers dependency
//!   graphs chaining functions
//! - **Function Dispatcher**: the unified execution entry point
//!
//! ## Design Principles
//!
//! 1. **Closed unions**: one variant per calling convention, so adding one
//!    is compiler-enforced exhaustive
//! 2. **Explicit trust boundary**: descriptor-supplied source only runs if
//!    the host statically registered it
//! 3. **Typed graphs**: composition ordering uses explicit node kinds and
//!    an explicit topological sort with cycle detection
//! 4. **Degrade on optional, reject on required**: missing optional
//!    structure warns and continues; missing required structure fails the
//!    call
//! 5. **Single execution seam**: atomic and composite runs share one
//!    registry entry point

#![warn(missing_docs)]

mod dispatcher;
mod errors;
mod loader;
mod registry;

pub mod exec;
pub mod model;
pub mod resolver;
pub mod store;
pub mod vocabulary;

// Re-export core types
pub use dispatcher::FunctionDispatcher;
pub use errors::{EngineError, EngineResult};
pub use exec::{
    Callable, CallableFuture, ExpressionCompiler, ExpressionFn, ExpressionHandler,
    ImplementationHandler, ProcessHandler, ScriptFunctionHandler, StaticExpressionCompiler,
};
pub use loader::ImplementationLoader;
pub use model::{
    ArgumentMap, ClassifiedParameterMappings, Composition, CompositionEdge, CompositionEndpoint,
    Function, Implementation, ImplementationKind, Mapping, Output, OutputMap,
    ParameterMappingKind, Parameter, PositionParameter, PositionPropertyParameter,
    PropertyParameter, Signature, SlotKind, DEFAULT_SHELL,
};
pub use registry::{
    ArgumentSlot, ArgumentTable, AtomicEntry, CompositionPlan, FunctionWiring, HandlerOptions,
    ImplementationRegistry, ReturnTable,
};
pub use resolver::{
    graph::{DependencyGraph, Node, NodeKind},
    CompositionResolver, MappingResolver, ResolvedMapping,
};
pub use store::{DescriptorStore, Iri, MemoryDescriptorStore, Triple};
