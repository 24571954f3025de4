// Copyright 2025 Cowboy AI, LLC.

//! Abstract functions and their declared parameters

use crate::errors::{EngineError, EngineResult};
use crate::store::{DescriptorStore, Iri};
use crate::vocabulary::fno;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// A declared parameter or output slot of a function
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    /// The parameter resource itself
    pub iri: Iri,
    /// Semantic predicate; argument and output maps key on it
    pub predicate: Iri,
    /// Declared value type, if any
    pub type_hint: Option<Iri>,
    /// Whether the descriptor marks the parameter required
    pub required: bool,
}

impl Parameter {
    /// Read a parameter resource from the store
    ///
    /// The predicate is required; type and required flags are optional.
    pub fn from_store(store: &dyn DescriptorStore, iri: &str) -> EngineResult<Self> {
        let predicate = store.single_object(iri, fno::PREDICATE)?;
        let types = store.objects(iri, fno::TYPE);
        if types.is_empty() {
            warn!(parameter = iri, "no type information for parameter found");
        }
        if types.len() > 1 {
            warn!(
                parameter = iri,
                "more types than expected (1), picking one at random"
            );
        }
        let required = store
            .opt_object(iri, fno::REQUIRED)
            .map(|v| v == "true")
            .unwrap_or(false);
        Ok(Self {
            iri: iri.to_string(),
            predicate,
            type_hint: types.into_iter().next(),
            required,
        })
    }
}

/// An abstract, implementation-independent operation
///
/// Declares what it expects and what it returns; how it runs is the concern
/// of the mapping and composition resolvers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Function {
    /// The function resource iri
    pub id: Iri,
    /// Ordered input parameters
    pub expects: Vec<Parameter>,
    /// Declared outputs; only the first is ever populated
    pub returns: Vec<Parameter>,
}

impl Function {
    /// Materialize a function from the store
    ///
    /// The resource must be typed `fno:Function`; `expects` and `returns`
    /// are RDF collections of parameter resources. A parameter that cannot
    /// be read (no predicate) is skipped with a warning.
    pub fn from_store(store: &dyn DescriptorStore, iri: &str) -> EngineResult<Self> {
        if store.subject_of_type(iri, fno::FUNCTION).is_none() {
            return Err(EngineError::FunctionNotFound(iri.to_string()));
        }

        Ok(Self {
            id: iri.to_string(),
            expects: Self::parameter_list(store, iri, fno::EXPECTS),
            returns: Self::parameter_list(store, iri, fno::RETURNS),
        })
    }

    fn parameter_list(store: &dyn DescriptorStore, iri: &str, predicate: &str) -> Vec<Parameter> {
        let Some(head) = store.opt_object(iri, predicate) else {
            return Vec::new();
        };
        store
            .list_elements(&head)
            .iter()
            .filter_map(|p| match Parameter::from_store(store, p) {
                Ok(parameter) => Some(parameter),
                Err(e) => {
                    warn!(parameter = %p, error = %e, "skipping unreadable parameter");
                    None
                }
            })
            .collect()
    }

    /// Predicates of the declared inputs, in declaration order
    pub fn input_predicates(&self) -> Vec<&str> {
        self.expects.iter().map(|p| p.predicate.as_str()).collect()
    }

    /// Resource iris of the declared outputs, in declaration order
    pub fn output_resources(&self) -> Vec<&str> {
        self.returns.iter().map(|p| p.iri.as_str()).collect()
    }
}
