// Copyright 2025 Cowboy AI, LLC.

//! Composition resolver
//!
//! Builds the typed dependency graph of a declared pipeline, validates that
//! it reduces to exactly one composed root function, resolves every
//! constituent through the mapping resolver, and registers the composite
//! plan. Resolution is all-or-nothing: a constituent that cannot resolve
//! leaves the registry untouched.

use crate::errors::{EngineError, EngineResult};
use crate::model::{Composition, CompositionEndpoint, Function, SlotKind};
use crate::registry::{CompositionPlan, FunctionWiring, ImplementationRegistry};
use crate::resolver::graph::{DependencyGraph, Node, NodeKind};
use crate::resolver::mapping::MappingResolver;
use crate::store::{DescriptorStore, Iri};
use crate::vocabulary::{fnoc, rdf};
use indexmap::IndexMap;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Resolves declared pipelines into registered composite plans
pub struct CompositionResolver<'a> {
    store: &'a dyn DescriptorStore,
    registry: &'a ImplementationRegistry,
}

impl<'a> CompositionResolver<'a> {
    /// Create a resolver over a store and registry
    pub fn new(store: &'a dyn DescriptorStore, registry: &'a ImplementationRegistry) -> Self {
        Self { store, registry }
    }

    /// Resolve the first composition that can execute the function
    ///
    /// Returns the id to execute: the registered composition, or the root
    /// function itself when it is already registered. Zero candidate
    /// compositions degrade to `None` with a warning.
    pub fn resolve(&self, function: &Function) -> EngineResult<Option<Iri>> {
        let candidates = self.compositions_for(function)?;
        if candidates.is_empty() {
            warn!(function = %function.id, "could not find any relevant composition for function");
            return Ok(None);
        }
        for composition in candidates {
            if let Some(executable) = self.try_load(&composition)? {
                return Ok(Some(executable));
            }
        }
        Ok(None)
    }

    /// Compositions whose output wiring to the function covers exactly its
    /// declared returns
    fn compositions_for(&self, function: &Function) -> EngineResult<Vec<Composition>> {
        let mut expected: Vec<&str> = function.output_resources();
        expected.sort_unstable();

        let mut candidates = Vec::new();
        for iri in self.store.subjects(rdf::TYPE, fnoc::COMPOSITION) {
            let composition = Composition::from_store(self.store, &iri)?;
            let mut wired: Vec<&str> = composition
                .edges
                .iter()
                .filter(|edge| edge.map_to.function == function.id)
                .filter_map(|edge| match edge.map_to.slot {
                    SlotKind::Output(_) => edge.map_to.resource.as_deref(),
                    _ => None,
                })
                .collect();
            wired.sort_unstable();
            if wired == expected {
                candidates.push(composition);
            }
        }
        Ok(candidates)
    }

    /// Build, validate and register one composition
    ///
    /// Returns the executable id on success, `None` when a constituent
    /// failed to resolve. Structural problems (no unique root, cycles) are
    /// hard errors.
    fn try_load(&self, composition: &Composition) -> EngineResult<Option<Iri>> {
        if composition.edges.is_empty() {
            return Err(EngineError::MalformedDescriptor {
                subject: composition.id.clone(),
                reason: "composition has no composedOf edges".to_string(),
            });
        }

        let mut graph = DependencyGraph::new();
        let mut wiring: IndexMap<Iri, FunctionWiring> = IndexMap::new();
        for edge in &composition.edges {
            let from = wire_endpoint(&mut graph, &mut wiring, &edge.map_from, &edge.id);
            let to = wire_endpoint(&mut graph, &mut wiring, &edge.map_to, &edge.id);
            graph.add_dependency(to, from);
        }

        let order = graph
            .flatten()
            .map_err(|stuck| EngineError::CompositionCycle {
                composition: composition.id.clone(),
                nodes: stuck.iter().map(ToString::to_string).collect(),
            })?;

        let root = composed_root(&order)?;
        if self.registry.has_implementation(&root) {
            debug!(composition = %composition.id, %root, "root already registered, short-circuiting");
            return Ok(Some(root));
        }

        let mapping_resolver = MappingResolver::new(self.store, self.registry);
        let mut bindings: HashMap<Iri, Iri> = HashMap::new();
        for node in &order {
            if node.kind != NodeKind::Function || node.function == root {
                continue;
            }
            let function = match Function::from_store(self.store, &node.function) {
                Ok(function) => function,
                Err(e) => {
                    warn!(function = %node.function, error = %e, "could not materialize constituent function");
                    return Ok(None);
                }
            };
            let Some(implementation) = mapping_resolver.first_usable(&function)? else {
                warn!(function = %node.function, "couldn't link implementation of constituent");
                return Ok(None);
            };
            bindings.insert(node.function.clone(), implementation);
        }

        let plan = CompositionPlan {
            composition: composition.id.clone(),
            root,
            order,
            wiring,
            bindings,
        };
        self.registry.load_composition(composition.id.clone(), plan);
        Ok(Some(composition.id.clone()))
    }
}

/// Identify the composed root from the flattened order
///
/// The first entry must be the inputs gate of the same function whose
/// outputs gate comes last; anything else means the composition does not
/// reduce to a unique composed function.
fn composed_root(order: &[Node]) -> EngineResult<Iri> {
    match (order.first(), order.last()) {
        (Some(first), Some(last))
            if first.kind == NodeKind::FunctionInputs
                && last.kind == NodeKind::FunctionOutputs
                && first.function == last.function =>
        {
            Ok(first.function.clone())
        }
        (Some(first), Some(last)) => Err(EngineError::NoUniqueRoot {
            first: first.to_string(),
            last: last.to_string(),
        }),
        _ => Err(EngineError::NoUniqueRoot {
            first: "(empty)".to_string(),
            last: "(empty)".to_string(),
        }),
    }
}

/// Wire one endpoint into the graph and the slot tables
///
/// Input endpoints gate on the function's inputs node, output endpoints on
/// its outputs node; bare value endpoints attach to the function node
/// itself.
fn wire_endpoint(
    graph: &mut DependencyGraph,
    wiring: &mut IndexMap<Iri, FunctionWiring>,
    endpoint: &CompositionEndpoint,
    slot: &str,
) -> Node {
    graph.ensure_function(&endpoint.function);
    let function_wiring = wiring.entry(endpoint.function.clone()).or_default();
    match &endpoint.slot {
        SlotKind::Input(predicate) => {
            function_wiring.add_input(predicate.clone(), slot.to_string());
            Node::inputs(&endpoint.function)
        }
        SlotKind::Output(predicate) => {
            function_wiring.add_output(predicate.clone(), slot.to_string());
            Node::outputs(&endpoint.function)
        }
        SlotKind::Value => Node::function(&endpoint.function),
    }
}
