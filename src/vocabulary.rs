// Copyright 2025 Cowboy AI, LLC.

//! IRI vocabulary recognized by the engine
//!
//! Descriptors are plain subject/predicate/object triples; these constants
//! are the predicates and classes the engine looks for when it materializes
//! Functions, Mappings, Implementations and Compositions from a store.

/// A namespace prefix that joins a base IRI with local names
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Namespace(&'static str);

impl Namespace {
    /// Create a namespace over a base IRI
    pub const fn new(base: &'static str) -> Self {
        Namespace(base)
    }

    /// The base IRI of this namespace
    pub const fn base(&self) -> &'static str {
        self.0
    }

    /// Join the base IRI with a local name
    pub fn term(&self, local: &str) -> String {
        format!("{}{}", self.0, local)
    }
}

/// RDF core vocabulary
pub mod rdf {
    /// Base IRI of the RDF namespace
    pub const NS: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
    /// `rdf:type`
    pub const TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
    /// `rdf:first` - head of a collection cell
    pub const FIRST: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#first";
    /// `rdf:rest` - tail of a collection cell
    pub const REST: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#rest";
    /// `rdf:nil` - the empty collection
    pub const NIL: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#nil";
    /// `rdf:List` - parameters typed as lists accumulate values
    pub const LIST: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#List";
}

/// Function Ontology core: functions, parameters, mappings
pub mod fno {
    /// Base IRI of the FnO namespace
    pub const NS: &str = "https://w3id.org/function/ontology#";
    /// Class of abstract functions
    pub const FUNCTION: &str = "https://w3id.org/function/ontology#Function";
    /// Class of function-to-implementation mappings
    pub const MAPPING: &str = "https://w3id.org/function/ontology#Mapping";
    /// Ordered list of parameters a function expects
    pub const EXPECTS: &str = "https://w3id.org/function/ontology#expects";
    /// Ordered list of outputs a function returns
    pub const RETURNS: &str = "https://w3id.org/function/ontology#returns";
    /// Semantic predicate of a parameter or output; argument maps key on it
    pub const PREDICATE: &str = "https://w3id.org/function/ontology#predicate";
    /// Declared value type of a parameter or output
    pub const TYPE: &str = "https://w3id.org/function/ontology#type";
    /// Whether a parameter is required
    pub const REQUIRED: &str = "https://w3id.org/function/ontology#required";
    /// Links a mapping to the function it describes
    pub const FUNCTION_PRED: &str = "https://w3id.org/function/ontology#function";
    /// Links a mapping to an implementation realizing the function
    pub const IMPLEMENTATION: &str = "https://w3id.org/function/ontology#implementation";
    /// Links a mapping to one of its parameter mappings
    pub const PARAMETER_MAPPING: &str = "https://w3id.org/function/ontology#parameterMapping";
    /// Links a mapping to one of its return mappings
    pub const RETURN_MAPPING: &str = "https://w3id.org/function/ontology#returnMapping";
    /// Links a mapping to its method mapping (method-name hint)
    pub const METHOD_MAPPING: &str = "https://w3id.org/function/ontology#methodMapping";
}

/// Parameter and return mapping vocabulary
pub mod fnom {
    /// Base IRI of the mapping namespace
    pub const NS: &str = "https://w3id.org/function/vocabulary/mapping#";
    /// Tag: the mapped parameter is passed by ordinal position
    pub const POSITION_PARAMETER_MAPPING: &str =
        "https://w3id.org/function/vocabulary/mapping#PositionParameterMapping";
    /// Tag: the mapped parameter is passed by named property/flag
    pub const PROPERTY_PARAMETER_MAPPING: &str =
        "https://w3id.org/function/vocabulary/mapping#PropertyParameterMapping";
    /// The function parameter a parameter mapping translates
    pub const FUNCTION_PARAMETER: &str =
        "https://w3id.org/function/vocabulary/mapping#functionParameter";
    /// The function output a return mapping translates
    pub const FUNCTION_OUTPUT: &str =
        "https://w3id.org/function/vocabulary/mapping#functionOutput";
    /// Ordinal position on the implementation side
    pub const IMPLEMENTATION_PARAMETER_POSITION: &str =
        "https://w3id.org/function/vocabulary/mapping#implementationParameterPosition";
    /// Property/flag name on the implementation side
    pub const IMPLEMENTATION_PROPERTY: &str =
        "https://w3id.org/function/vocabulary/mapping#implementationProperty";
    /// The only supported return mapping kind
    pub const DEFAULT_RETURN_MAPPING: &str =
        "https://w3id.org/function/vocabulary/mapping#DefaultReturnMapping";
    /// Method-name hint on a method mapping
    pub const METHOD_NAME: &str = "https://w3id.org/function/vocabulary/mapping#method-name";
}

/// Implementation vocabulary: the calling-convention classes
pub mod fnoi {
    /// Base IRI of the implementation namespace
    pub const NS: &str = "https://w3id.org/function/vocabulary/implementation#";
    /// Class of external-process implementations
    pub const RUNTIME_PROCESS: &str =
        "https://w3id.org/function/vocabulary/implementation#RuntimeProcess";
    /// Class of single-expression script implementations
    pub const JAVASCRIPT_EXPRESSION: &str =
        "https://w3id.org/function/vocabulary/implementation#JavaScriptExpression";
    /// Class of full-callable script implementations
    pub const JAVASCRIPT_FUNCTION: &str =
        "https://w3id.org/function/vocabulary/implementation#JavaScriptFunction";
    /// Base command of a process implementation
    pub const BASE_COMMAND: &str =
        "https://w3id.org/function/vocabulary/implementation#baseCommand";
    /// Shell a process implementation runs under
    pub const SHELL: &str = "https://w3id.org/function/vocabulary/implementation#shell";
}

/// Composition vocabulary: chaining functions into pipelines
pub mod fnoc {
    /// Base IRI of the composition namespace
    pub const NS: &str = "https://w3id.org/function/vocabulary/composition#";
    /// Class of compositions
    pub const COMPOSITION: &str =
        "https://w3id.org/function/vocabulary/composition#Composition";
    /// Links a composition to one of its wiring edges
    pub const COMPOSED_OF: &str =
        "https://w3id.org/function/vocabulary/composition#composedOf";
    /// Source endpoint of a wiring edge
    pub const MAP_FROM: &str = "https://w3id.org/function/vocabulary/composition#mapFrom";
    /// Target endpoint of a wiring edge
    pub const MAP_TO: &str = "https://w3id.org/function/vocabulary/composition#mapTo";
    /// The constituent function an endpoint belongs to
    pub const CONSTITUENT_FUNCTION: &str =
        "https://w3id.org/function/vocabulary/composition#constituentFunction";
    /// Input-parameter slot of an endpoint
    pub const FUNCTION_PARAMETER: &str =
        "https://w3id.org/function/vocabulary/composition#functionParameter";
    /// Output slot of an endpoint
    pub const FUNCTION_OUTPUT: &str =
        "https://w3id.org/function/vocabulary/composition#functionOutput";
}

/// Description-of-a-project vocabulary, used for the source release chain
pub mod doap {
    /// Base IRI of the DOAP namespace
    pub const NS: &str = "http://usefulinc.com/ns/doap#";
    /// Links an implementation to its release
    pub const RELEASE: &str = "http://usefulinc.com/ns/doap#release";
    /// Links a release to its file release
    pub const FILE_RELEASE: &str = "http://usefulinc.com/ns/doap#file-release";
}

/// Example/extension vocabulary carrying literal source values
pub mod ex {
    /// Base IRI of the extension namespace
    pub const NS: &str = "http://www.example.com#";
    /// Literal value of a file release (source text)
    pub const VALUE: &str = "http://www.example.com#value";
}
