// Copyright 2025 Cowboy AI, LLC.

//! Error types for function resolution and execution

use thiserror::Error;

/// Errors that can occur while resolving or executing functions
#[derive(Debug, Clone, Error)]
pub enum EngineError {
    /// No function resource with the given iri
    #[error("Function not found: {0}")]
    FunctionNotFound(String),

    /// No implementation loaded under the given iri
    #[error("Implementation not found: {0}")]
    ImplementationNotFound(String),

    /// Neither a mapping nor a composition yielded something executable
    #[error("No implementation or composition available to execute {function}")]
    NoExecutionPath {
        /// The function that could not be dispatched
        function: String,
    },

    /// A return mapping of a kind other than the default kind
    #[error("Unsupported return mapping kind on {mapping}: only the default kind is supported")]
    UnsupportedReturnKind {
        /// The return mapping resource that carried the unsupported kind
        mapping: String,
    },

    /// A parameter mapping linked to more than one function parameter
    #[error("Parameter mapping {mapping} links to {count} function parameters (expected 1)")]
    AmbiguousParameterMapping {
        /// The offending parameter mapping resource
        mapping: String,
        /// How many function parameters it linked to
        count: usize,
    },

    /// Classified plus dropped parameter mappings did not reconcile with the input
    #[error("Parameter mappings of {subject} did not reconcile: {classified} classified + {dropped} dropped != {total} total")]
    ClassificationMismatch {
        /// The mapping or implementation whose parameter mappings were classified
        subject: String,
        /// Mappings that classified into exactly one kind
        classified: usize,
        /// Mappings that matched no kind and were dropped
        dropped: usize,
        /// Total parameter mappings inspected
        total: usize,
    },

    /// The flattened composition order did not reduce to a unique root
    #[error("No unique composed function detected: found {first} and {last}")]
    NoUniqueRoot {
        /// First entry of the flattened dependency order
        first: String,
        /// Last entry of the flattened dependency order
        last: String,
    },

    /// The composition dependency graph contains a cycle
    #[error("Cycle detected in composition {composition} involving: {}", .nodes.join(", "))]
    CompositionCycle {
        /// The composition whose graph failed to flatten
        composition: String,
        /// Nodes left unordered by the topological sort
        nodes: Vec<String>,
    },

    /// A subprocess exited with an error or wrote to its error stream
    #[error("Process `{command}` failed (exit {}): {stderr}", .status.map(|s| s.to_string()).unwrap_or_else(|| "none".to_string()))]
    Process {
        /// The command line that was invoked
        command: String,
        /// Exit status code, if the process ran to completion
        status: Option<i32>,
        /// Captured standard output
        stdout: String,
        /// Captured error stream
        stderr: String,
    },

    /// Execution was requested for a variant that is not wired up
    #[error("Not implemented: {0}")]
    Unimplemented(String),

    /// Required descriptor structure was absent from the store
    #[error("Subject {subject} without {predicate} defined")]
    MissingDescriptor {
        /// The subject that was inspected
        subject: String,
        /// The predicate that had no object
        predicate: String,
    },

    /// A descriptor value could not be interpreted
    #[error("Malformed descriptor value on {subject}: {reason}")]
    MalformedDescriptor {
        /// The subject carrying the value
        subject: String,
        /// Why the value was rejected
        reason: String,
    },

    /// Expression source was not registered with the compiler
    #[error("Expression compile error: {0}")]
    Compile(String),
}

/// Result type for engine operations
pub type EngineResult<T> = Result<T, EngineError>;

impl EngineError {
    /// Check if this is a not-found class error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            EngineError::FunctionNotFound(_)
                | EngineError::ImplementationNotFound(_)
                | EngineError::NoExecutionPath { .. }
        )
    }

    /// Check if this is a structural error in descriptors or compositions
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            EngineError::NoUniqueRoot { .. }
                | EngineError::CompositionCycle { .. }
                | EngineError::ClassificationMismatch { .. }
                | EngineError::AmbiguousParameterMapping { .. }
        )
    }

    /// Check if this error came from a subprocess run
    pub fn is_process_error(&self) -> bool {
        matches!(self, EngineError::Process { .. })
    }
}
