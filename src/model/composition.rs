// Copyright 2025 Cowboy AI, LLC.

//! Declared pipelines chaining functions' outputs into other functions' inputs

use crate::errors::EngineResult;
use crate::store::{DescriptorStore, Iri};
use crate::vocabulary::{fno, fnoc};
use serde::{Deserialize, Serialize};

/// Which slot of a constituent function an endpoint references
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlotKind {
    /// An input parameter, by its predicate
    Input(Iri),
    /// An output, by its predicate
    Output(Iri),
    /// A bare pass-through value slot
    Value,
}

/// One end of a wiring edge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompositionEndpoint {
    /// The constituent function the endpoint belongs to
    pub function: Iri,
    /// The referenced slot
    pub slot: SlotKind,
    /// Resource iri of the referenced parameter/output, when there is one
    pub resource: Option<Iri>,
}

impl CompositionEndpoint {
    /// Read an endpoint resource from the store
    ///
    /// The constituent function is required. A `functionParameter` reference
    /// makes it an input endpoint, a `functionOutput` reference an output
    /// endpoint; neither makes it a bare value slot.
    pub fn from_store(store: &dyn DescriptorStore, iri: &str) -> EngineResult<Self> {
        let function = store.single_object(iri, fnoc::CONSTITUENT_FUNCTION)?;

        if let Some(parameter) = store.opt_object(iri, fnoc::FUNCTION_PARAMETER) {
            let predicate = store.single_object(&parameter, fno::PREDICATE)?;
            return Ok(Self {
                function,
                slot: SlotKind::Input(predicate),
                resource: Some(parameter),
            });
        }
        if let Some(output) = store.opt_object(iri, fnoc::FUNCTION_OUTPUT) {
            let predicate = store.single_object(&output, fno::PREDICATE)?;
            return Ok(Self {
                function,
                slot: SlotKind::Output(predicate),
                resource: Some(output),
            });
        }
        Ok(Self {
            function,
            slot: SlotKind::Value,
            resource: None,
        })
    }
}

/// One wiring edge of a composition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompositionEdge {
    /// The `composedOf` resource; doubles as the value-slot id at execution
    pub id: Iri,
    /// Where the value comes from
    pub map_from: CompositionEndpoint,
    /// Where the value goes
    pub map_to: CompositionEndpoint,
}

/// A declared acyclic pipeline, itself invokable as one composed function
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Composition {
    /// The composition resource iri
    pub id: Iri,
    /// Wiring edges in stored order
    pub edges: Vec<CompositionEdge>,
}

impl Composition {
    /// Read a composition resource and all of its edges from the store
    pub fn from_store(store: &dyn DescriptorStore, iri: &str) -> EngineResult<Self> {
        let mut edges = Vec::new();
        for edge in store.objects(iri, fnoc::COMPOSED_OF) {
            let map_from_iri = store.single_object(&edge, fnoc::MAP_FROM)?;
            let map_to_iri = store.single_object(&edge, fnoc::MAP_TO)?;
            edges.push(CompositionEdge {
                id: edge.clone(),
                map_from: CompositionEndpoint::from_store(store, &map_from_iri)?,
                map_to: CompositionEndpoint::from_store(store, &map_to_iri)?,
            });
        }
        Ok(Self {
            id: iri.to_string(),
            edges,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryDescriptorStore, Triple};
    use pretty_assertions::assert_eq;

    fn composition_graph() -> MemoryDescriptorStore {
        let store = MemoryDescriptorStore::new();
        store.add_graph(
            "g:comp",
            vec![
                Triple::new("fns:chain", fnoc::COMPOSED_OF, "fns:wire1"),
                Triple::new("fns:wire1", fnoc::MAP_FROM, "fns:from1"),
                Triple::new("fns:wire1", fnoc::MAP_TO, "fns:to1"),
                // from: the chain's own message parameter
                Triple::new("fns:from1", fnoc::CONSTITUENT_FUNCTION, "fns:chainFn"),
                Triple::new("fns:from1", fnoc::FUNCTION_PARAMETER, "fns:messageParam"),
                Triple::new("fns:messageParam", fno::PREDICATE, "fns:message"),
                // to: echo's output
                Triple::new("fns:to1", fnoc::CONSTITUENT_FUNCTION, "fns:echo"),
                Triple::new("fns:to1", fnoc::FUNCTION_OUTPUT, "fns:echoOut"),
                Triple::new("fns:echoOut", fno::PREDICATE, "fns:stdout"),
            ],
        );
        store
    }

    /// Test endpoint classification into input, output and value slots
    #[test]
    fn test_endpoint_classification() {
        let store = composition_graph();

        let input = CompositionEndpoint::from_store(&store, "fns:from1").unwrap();
        assert_eq!(input.function, "fns:chainFn");
        assert_eq!(input.slot, SlotKind::Input("fns:message".to_string()));
        assert_eq!(input.resource, Some("fns:messageParam".to_string()));

        let output = CompositionEndpoint::from_store(&store, "fns:to1").unwrap();
        assert_eq!(output.slot, SlotKind::Output("fns:stdout".to_string()));

        store.add_graph(
            "g:bare",
            vec![Triple::new(
                "fns:bare",
                fnoc::CONSTITUENT_FUNCTION,
                "fns:someFn",
            )],
        );
        let bare = CompositionEndpoint::from_store(&store, "fns:bare").unwrap();
        assert_eq!(bare.slot, SlotKind::Value);
        assert_eq!(bare.resource, None);
    }

    /// Test reading a composition with its edges
    #[test]
    fn test_composition_from_store() {
        let store = composition_graph();
        let composition = Composition::from_store(&store, "fns:chain").unwrap();

        assert_eq!(composition.id, "fns:chain");
        assert_eq!(composition.edges.len(), 1);
        assert_eq!(composition.edges[0].id, "fns:wire1");
        assert_eq!(composition.edges[0].map_from.function, "fns:chainFn");
        assert_eq!(composition.edges[0].map_to.function, "fns:echo");
    }

    /// Test an endpoint without a constituent function is rejected
    #[test]
    fn test_endpoint_requires_function() {
        let store = MemoryDescriptorStore::new();
        store.add_graph("g:empty", vec![Triple::new("a", "b", "c")]);

        assert!(CompositionEndpoint::from_store(&store, "fns:nothing").is_err());
    }
}
