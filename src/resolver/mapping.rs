// Copyright 2025 Cowboy AI, LLC.

//! Mapping resolver
//!
//! For a function: find its mappings, link each implementation to the
//! function in the registry, and compute the argument and return direction
//! tables. An implementation only counts as usable when both steps succeed;
//! mappings with zero usable implementations are dropped.

use crate::errors::{EngineError, EngineResult};
use crate::model::{Function, Mapping};
use crate::registry::{ArgumentTable, ImplementationRegistry, ReturnTable};
use crate::store::{DescriptorStore, Iri};
use crate::vocabulary::{fno, fnom, rdf};
use tracing::warn;

/// A mapping that survived resolution, paired with its usable implementations
#[derive(Debug, Clone)]
pub struct ResolvedMapping {
    /// The surviving mapping
    pub mapping: Mapping,
    /// Implementations that linked and configured successfully
    pub implementations: Vec<Iri>,
}

/// Links functions to usable atomic implementations
pub struct MappingResolver<'a> {
    store: &'a dyn DescriptorStore,
    registry: &'a ImplementationRegistry,
}

impl<'a> MappingResolver<'a> {
    /// Create a resolver over a store and registry
    pub fn new(store: &'a dyn DescriptorStore, registry: &'a ImplementationRegistry) -> Self {
        Self { store, registry }
    }

    /// Resolve every mapping of the function
    ///
    /// Zero mappings found is a warning and an empty result, not an error.
    /// Unsupported return kinds and ambiguous parameter mappings are fatal.
    pub fn resolve(&self, function: &Function) -> EngineResult<Vec<ResolvedMapping>> {
        let mapping_iris = self.store.subjects(fno::FUNCTION_PRED, &function.id);
        if mapping_iris.is_empty() {
            warn!(function = %function.id, "could not find any relevant mapping for function");
            return Ok(Vec::new());
        }

        let mut resolved = Vec::new();
        for iri in mapping_iris {
            let mapping = Mapping::from_store(self.store, &iri)?;
            let arguments = self.argument_table(&mapping)?;
            let returns = self.return_table(&mapping)?;

            let usable: Vec<Iri> = mapping
                .implementations
                .iter()
                .filter(|implementation| {
                    let linked = self
                        .registry
                        .link_implementation_to_function(implementation, &function.id);
                    let configured =
                        self.registry
                            .set_options(implementation, arguments.clone(), returns.clone());
                    linked && configured
                })
                .cloned()
                .collect();

            if usable.is_empty() {
                warn!(mapping = %mapping.id, "mapping yielded no usable implementation, dropping it");
            } else {
                resolved.push(ResolvedMapping {
                    mapping,
                    implementations: usable,
                });
            }
        }
        Ok(resolved)
    }

    /// The pick-first selection: first implementation of the first surviving
    /// mapping
    pub fn first_usable(&self, function: &Function) -> EngineResult<Option<Iri>> {
        let resolved = self.resolve(function)?;
        Ok(resolved
            .into_iter()
            .next()
            .and_then(|r| r.implementations.into_iter().next()))
    }

    /// Compute the argument direction table of a mapping
    ///
    /// Keys are implementation-side positions and flag names, values the
    /// function parameter's predicate. Parameters whose declared type is
    /// `rdf:List` append instead of overwriting.
    fn argument_table(&self, mapping: &Mapping) -> EngineResult<ArgumentTable> {
        let mut table = ArgumentTable::default();
        for pm in &mapping.parameter_mappings {
            let parameters = self.store.objects(pm, fnom::FUNCTION_PARAMETER);
            if parameters.is_empty() {
                warn!(parameter_mapping = %pm, "could not find parameter assigned to mapping");
                continue;
            }
            if parameters.len() > 1 {
                return Err(EngineError::AmbiguousParameterMapping {
                    mapping: pm.clone(),
                    count: parameters.len(),
                });
            }
            let parameter = &parameters[0];
            let is_list = self.list_typed(parameter);
            let predicate = self.store.single_object(parameter, fno::PREDICATE)?;

            if self.store.is_a(pm, fnom::PROPERTY_PARAMETER_MAPPING) {
                for property in self.store.objects(pm, fnom::IMPLEMENTATION_PROPERTY) {
                    table.insert_property(property, predicate.clone(), is_list);
                }
            }
            if self.store.is_a(pm, fnom::POSITION_PARAMETER_MAPPING) {
                for position in self
                    .store
                    .objects(pm, fnom::IMPLEMENTATION_PARAMETER_POSITION)
                {
                    let position: u32 = position.parse().map_err(|_| {
                        EngineError::MalformedDescriptor {
                            subject: pm.clone(),
                            reason: format!("position `{position}` is not an unsigned integer"),
                        }
                    })?;
                    table.insert_position(position, predicate.clone(), is_list);
                }
            }
        }
        Ok(table)
    }

    /// Compute the return direction table of a mapping
    ///
    /// Only the default return kind is accepted; anything else is fatal.
    fn return_table(&self, mapping: &Mapping) -> EngineResult<ReturnTable> {
        let mut table = ReturnTable::default();
        for rm in &mapping.return_mappings {
            let outputs = self.store.objects(rm, fnom::FUNCTION_OUTPUT);
            if outputs.is_empty() {
                warn!(return_mapping = %rm, "could not find output assigned to mapping");
                continue;
            }
            if outputs.len() > 1 {
                warn!(return_mapping = %rm, "more outputs than expected (1), picking one at random");
            }
            let output = &outputs[0];

            let predicates = self.store.objects(output, fno::PREDICATE);
            if predicates.is_empty() {
                warn!(output = %output, "could not find predicate of output");
                continue;
            }
            let is_list = self.list_typed(output);

            if self.store.is_a(rm, fnom::DEFAULT_RETURN_MAPPING) {
                table.insert_default(predicates[0].clone(), is_list);
            } else {
                return Err(EngineError::UnsupportedReturnKind { mapping: rm.clone() });
            }
        }
        Ok(table)
    }

    fn list_typed(&self, resource: &str) -> bool {
        let types = self.store.objects(resource, fno::TYPE);
        if types.is_empty() {
            warn!(resource, "no type information for parameter found");
        }
        if types.len() > 1 {
            warn!(resource, "more types than expected (1), picking one at random");
        }
        types.first().map(|t| t == rdf::LIST).unwrap_or(false)
    }
}
