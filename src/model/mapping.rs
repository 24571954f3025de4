// Copyright 2025 Cowboy AI, LLC.

//! Declarative links between functions and implementations

use crate::errors::EngineResult;
use crate::store::{DescriptorStore, Iri};
use crate::vocabulary::{fno, fnom};
use serde::{Deserialize, Serialize};

/// A declarative link between a function and its implementations
///
/// Carries the parameter/return direction translation as raw descriptor
/// references; the mapping resolver interprets them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mapping {
    /// The mapping resource iri
    pub id: Iri,
    /// The function this mapping describes
    pub function: Iri,
    /// Implementations realizing the function
    pub implementations: Vec<Iri>,
    /// Parameter mapping resources
    pub parameter_mappings: Vec<Iri>,
    /// Return mapping resources
    pub return_mappings: Vec<Iri>,
    /// Optional method-name hint
    pub method_name: Option<String>,
}

impl Mapping {
    /// Read a mapping resource from the store
    pub fn from_store(store: &dyn DescriptorStore, iri: &str) -> EngineResult<Self> {
        let function = store.single_object(iri, fno::FUNCTION_PRED)?;
        let method_name = store
            .opt_object(iri, fno::METHOD_MAPPING)
            .and_then(|m| store.opt_object(&m, fnom::METHOD_NAME));

        Ok(Self {
            id: iri.to_string(),
            function,
            implementations: store.objects(iri, fno::IMPLEMENTATION),
            parameter_mappings: store.objects(iri, fno::PARAMETER_MAPPING),
            return_mappings: store.objects(iri, fno::RETURN_MAPPING),
            method_name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryDescriptorStore, Triple};
    use pretty_assertions::assert_eq;

    /// Test reading a mapping with its references and method hint
    #[test]
    fn test_mapping_from_store() {
        let store = MemoryDescriptorStore::new();
        store.add_graph(
            "g:mapping",
            vec![
                Triple::new("fns:sumMapping", fno::FUNCTION_PRED, "fns:sum"),
                Triple::new("fns:sumMapping", fno::IMPLEMENTATION, "fns:sumImpl"),
                Triple::new("fns:sumMapping", fno::PARAMETER_MAPPING, "fns:aMapping"),
                Triple::new("fns:sumMapping", fno::PARAMETER_MAPPING, "fns:bMapping"),
                Triple::new("fns:sumMapping", fno::RETURN_MAPPING, "fns:sumReturn"),
                Triple::new("fns:sumMapping", fno::METHOD_MAPPING, "fns:sumMethod"),
                Triple::new("fns:sumMethod", fnom::METHOD_NAME, "sum"),
            ],
        );

        let mapping = Mapping::from_store(&store, "fns:sumMapping").unwrap();

        assert_eq!(mapping.function, "fns:sum");
        assert_eq!(mapping.implementations, vec!["fns:sumImpl"]);
        assert_eq!(mapping.parameter_mappings.len(), 2);
        assert_eq!(mapping.return_mappings, vec!["fns:sumReturn"]);
        assert_eq!(mapping.method_name, Some("sum".to_string()));
    }

    /// Test a mapping without a function reference is rejected
    #[test]
    fn test_mapping_requires_function() {
        let store = MemoryDescriptorStore::new();
        store.add_graph(
            "g:mapping",
            vec![Triple::new("fns:bad", fno::IMPLEMENTATION, "fns:impl")],
        );

        assert!(Mapping::from_store(&store, "fns:bad").is_err());
    }
}
