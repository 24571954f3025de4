// Copyright 2025 Cowboy AI, LLC.

//! Implementation registry
//!
//! In-memory table of loaded implementations and composition plans, keyed by
//! opaque iri. The single source of truth for "can I run this": resolution
//! writes entries, dispatch reads them, and atomic and composite executions
//! share the one `execute_implementation` entry point.
//!
//! Semantics are load-then-execute: mutation and execution of the same id
//! are serialized by the table lock, but entries are not meant to be
//! reconfigured while a run is in flight.

use crate::errors::{EngineError, EngineResult};
use crate::exec::{Callable, ImplementationHandler};
use crate::model::{ArgumentMap, OutputMap};
use crate::resolver::graph::{Node, NodeKind};
use crate::store::Iri;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::debug;

/// One resolved argument direction: a parameter predicate, or several for
/// list-typed parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgumentSlot {
    /// A single predicate feeds this slot
    Single(Iri),
    /// List-typed: predicates accumulate instead of overwriting
    List(Vec<Iri>),
}

/// Argument direction table of one mapping
///
/// Keys are the implementation-side positions and flag names; values are the
/// function-side parameter predicates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArgumentTable {
    /// Directions keyed by ordinal position
    pub by_position: IndexMap<u32, ArgumentSlot>,
    /// Directions keyed by property/flag name
    pub by_property: IndexMap<String, ArgumentSlot>,
}

impl ArgumentTable {
    /// Record a direction keyed by position
    pub fn insert_position(&mut self, position: u32, predicate: Iri, is_list: bool) {
        Self::insert(&mut self.by_position, position, predicate, is_list);
    }

    /// Record a direction keyed by property name
    pub fn insert_property(&mut self, property: String, predicate: Iri, is_list: bool) {
        Self::insert(&mut self.by_property, property, predicate, is_list);
    }

    fn insert<K>(slots: &mut IndexMap<K, ArgumentSlot>, key: K, predicate: Iri, is_list: bool)
    where
        K: std::hash::Hash + Eq + std::fmt::Debug,
    {
        let appendable = is_list && matches!(slots.get(&key), Some(ArgumentSlot::List(_)));
        if appendable {
            if let Some(ArgumentSlot::List(values)) = slots.get_mut(&key) {
                values.push(predicate);
            }
        } else if slots.contains_key(&key) {
            tracing::warn!(key = ?key, "multiple values found for argument, keeping a random one");
        } else if is_list {
            slots.insert(key, ArgumentSlot::List(vec![predicate]));
        } else {
            slots.insert(key, ArgumentSlot::Single(predicate));
        }
    }
}

/// Return direction table of one mapping; only the default kind exists
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReturnTable {
    /// The default return direction, when declared
    pub default: Option<ArgumentSlot>,
}

impl ReturnTable {
    /// Record the default return direction
    pub fn insert_default(&mut self, predicate: Iri, is_list: bool) {
        match self.default.take() {
            None if is_list => self.default = Some(ArgumentSlot::List(vec![predicate])),
            None => self.default = Some(ArgumentSlot::Single(predicate)),
            Some(ArgumentSlot::List(mut values)) if is_list => {
                values.push(predicate);
                self.default = Some(ArgumentSlot::List(values));
            }
            Some(existing) => {
                tracing::warn!("multiple values found for return direction, keeping a random one");
                self.default = Some(existing);
            }
        }
    }
}

/// Options attached to an atomic registry entry
#[derive(Clone)]
pub struct HandlerOptions {
    /// The compiled callable the handler invokes
    pub callable: Callable,
    /// The function this implementation is linked to, once resolved
    pub function: Option<Iri>,
    /// Resolved argument direction table
    pub arguments: ArgumentTable,
    /// Resolved return direction table
    pub returns: ReturnTable,
}

/// An atomic (single-implementation) registry entry
#[derive(Clone)]
pub struct AtomicEntry {
    /// Strategy adapter for this implementation's calling convention
    pub handler: Arc<dyn ImplementationHandler>,
    /// Callable plus resolved direction tables
    pub options: HandlerOptions,
    /// When this entry was loaded
    pub loaded_at: DateTime<Utc>,
}

/// Which value slots feed and drain one constituent function
///
/// Keys are parameter/output predicates; values are the `composedOf` slot
/// ids wired to them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FunctionWiring {
    /// Slots feeding each input predicate
    pub inputs: IndexMap<Iri, Vec<Iri>>,
    /// Slots drained by each output predicate
    pub outputs: IndexMap<Iri, Vec<Iri>>,
}

impl FunctionWiring {
    /// Record a slot feeding an input predicate
    pub fn add_input(&mut self, predicate: Iri, slot: Iri) {
        self.inputs.entry(predicate).or_default().push(slot);
    }

    /// Record a slot drained by an output predicate
    pub fn add_output(&mut self, predicate: Iri, slot: Iri) {
        self.outputs.entry(predicate).or_default().push(slot);
    }
}

/// A registered composite execution plan
///
/// The slot-value map starts empty and fills during execution as upstream
/// outputs arrive; the plan itself carries only wiring.
#[derive(Debug, Clone)]
pub struct CompositionPlan {
    /// The composition resource this plan was built from
    pub composition: Iri,
    /// The composed root function
    pub root: Iri,
    /// Flattened dependency order
    pub order: Vec<Node>,
    /// Per-function slot wiring
    pub wiring: IndexMap<Iri, FunctionWiring>,
    /// Constituent function to implementation bindings
    pub bindings: HashMap<Iri, Iri>,
}

/// A live registry entry
#[derive(Clone)]
enum RegistryEntry {
    Atomic(AtomicEntry),
    Composite(CompositionPlan),
}

/// Strategy table from implementation id to executable entry
#[derive(Clone, Default)]
pub struct ImplementationRegistry {
    entries: Arc<RwLock<HashMap<Iri, RegistryEntry>>>,
}

impl ImplementationRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Load (or re-load) an implementation; idempotent upsert
    ///
    /// Re-loading overwrites the previous entry, dropping any link and
    /// options that were attached to it.
    pub fn load_implementation(
        &self,
        id: impl Into<String>,
        handler: Arc<dyn ImplementationHandler>,
        callable: Callable,
    ) {
        let id = id.into();
        debug!(implementation = %id, handler = handler.id(), "loading implementation");
        self.entries.write().unwrap().insert(
            id,
            RegistryEntry::Atomic(AtomicEntry {
                handler,
                options: HandlerOptions {
                    callable,
                    function: None,
                    arguments: ArgumentTable::default(),
                    returns: ReturnTable::default(),
                },
                loaded_at: Utc::now(),
            }),
        );
    }

    /// Link a loaded implementation to the function it realizes
    ///
    /// Returns false when the id was never loaded (or is a composition).
    pub fn link_implementation_to_function(&self, id: &str, function: &str) -> bool {
        let mut entries = self.entries.write().unwrap();
        match entries.get_mut(id) {
            Some(RegistryEntry::Atomic(entry)) => {
                entry.options.function = Some(function.to_string());
                true
            }
            _ => false,
        }
    }

    /// Attach resolved direction tables to a loaded implementation
    ///
    /// Returns false when the id was never loaded (or is a composition).
    pub fn set_options(&self, id: &str, arguments: ArgumentTable, returns: ReturnTable) -> bool {
        let mut entries = self.entries.write().unwrap();
        match entries.get_mut(id) {
            Some(RegistryEntry::Atomic(entry)) => {
                entry.options.arguments = arguments;
                entry.options.returns = returns;
                true
            }
            _ => false,
        }
    }

    /// Register a composite plan under the shared execution entry point
    pub fn load_composition(&self, id: impl Into<String>, plan: CompositionPlan) {
        let id = id.into();
        debug!(composition = %id, root = %plan.root, "loading composition plan");
        self.entries
            .write()
            .unwrap()
            .insert(id, RegistryEntry::Composite(plan));
    }

    /// Whether anything is registered under the id
    pub fn has_implementation(&self, id: &str) -> bool {
        self.entries.read().unwrap().contains_key(id)
    }

    /// The function an atomic entry is linked to, if any
    pub fn linked_function(&self, id: &str) -> Option<Iri> {
        match self.entries.read().unwrap().get(id) {
            Some(RegistryEntry::Atomic(entry)) => entry.options.function.clone(),
            _ => None,
        }
    }

    /// When an atomic entry was loaded, if it exists
    pub fn loaded_at(&self, id: &str) -> Option<DateTime<Utc>> {
        match self.entries.read().unwrap().get(id) {
            Some(RegistryEntry::Atomic(entry)) => Some(entry.loaded_at),
            _ => None,
        }
    }

    /// Execute whatever is registered under the id
    ///
    /// Dispatches to the entry's handler for atomic implementations, or
    /// walks the plan for compositions. Fails with a not-found error when
    /// the id was never loaded.
    pub async fn execute_implementation(
        &self,
        id: &str,
        args: &ArgumentMap,
    ) -> EngineResult<OutputMap> {
        let entry = self
            .entries
            .read()
            .unwrap()
            .get(id)
            .cloned()
            .ok_or_else(|| EngineError::ImplementationNotFound(id.to_string()))?;

        match entry {
            RegistryEntry::Atomic(atomic) => {
                atomic
                    .handler
                    .execute_function(args.clone(), &atomic.options)
                    .await
            }
            RegistryEntry::Composite(plan) => self.execute_plan(&plan, args).await,
        }
    }

    /// Walk a composite plan in dependency order
    ///
    /// Seeds the root's input slots from the caller's arguments, runs each
    /// constituent as its node comes up (its inputs are complete by then),
    /// feeds its outputs into the wired slots, and finally collects the
    /// root's output slots. The root itself never runs; it is the plan.
    async fn execute_plan(
        &self,
        plan: &CompositionPlan,
        args: &ArgumentMap,
    ) -> EngineResult<OutputMap> {
        let mut slot_values: HashMap<Iri, Value> = HashMap::new();

        if let Some(wiring) = plan.wiring.get(&plan.root) {
            for (predicate, slots) in &wiring.inputs {
                if let Some(value) = args.get(predicate) {
                    for slot in slots {
                        slot_values.insert(slot.clone(), value.clone());
                    }
                }
            }
        }

        for node in &plan.order {
            if node.kind != NodeKind::Function || node.function == plan.root {
                continue;
            }
            let empty = FunctionWiring::default();
            let wiring = plan.wiring.get(&node.function).unwrap_or(&empty);

            let mut step_args = ArgumentMap::new();
            for (predicate, slots) in &wiring.inputs {
                if let Some(value) = slots.iter().find_map(|s| slot_values.get(s)) {
                    step_args.insert(predicate.clone(), value.clone());
                }
            }

            let implementation = plan.bindings.get(&node.function).ok_or_else(|| {
                EngineError::ImplementationNotFound(node.function.clone())
            })?;
            debug!(
                function = %node.function,
                implementation = %implementation,
                "executing composition step"
            );
            let outputs = self.execute_atomic(implementation, step_args).await?;

            for (predicate, slots) in &wiring.outputs {
                if let Some(value) = outputs.get(predicate) {
                    for slot in slots {
                        slot_values.insert(slot.clone(), value.clone());
                    }
                }
            }
        }

        let mut result = OutputMap::new();
        if let Some(wiring) = plan.wiring.get(&plan.root) {
            for (predicate, slots) in &wiring.outputs {
                if let Some(value) = slots.iter().find_map(|s| slot_values.get(s)) {
                    result.insert(predicate.clone(), value.clone());
                }
            }
        }
        Ok(result)
    }

    /// Execute a constituent, which must be an atomic entry
    async fn execute_atomic(&self, id: &str, args: ArgumentMap) -> EngineResult<OutputMap> {
        let entry = self
            .entries
            .read()
            .unwrap()
            .get(id)
            .cloned()
            .ok_or_else(|| EngineError::ImplementationNotFound(id.to_string()))?;

        match entry {
            RegistryEntry::Atomic(atomic) => {
                atomic.handler.execute_function(args, &atomic.options).await
            }
            RegistryEntry::Composite(_) => Err(EngineError::MalformedDescriptor {
                subject: id.to_string(),
                reason: "composition steps must resolve to atomic implementations".to_string(),
            }),
        }
    }
}
