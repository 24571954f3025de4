// Copyright 2025 Cowboy AI, LLC.

//! Data model: functions, parameters, mappings, implementations, compositions
//!
//! Everything here is constructed on demand from a descriptor store;
//! nothing is persisted independently.

mod composition;
mod function;
mod implementation;
mod mapping;
mod parameters;

pub use composition::{Composition, CompositionEdge, CompositionEndpoint, SlotKind};
pub use function::{Function, Parameter};
pub use implementation::{Implementation, ImplementationKind, Signature, DEFAULT_SHELL};
pub use mapping::Mapping;
pub use parameters::{
    ClassifiedParameterMappings, Output, ParameterMappingKind, PositionParameter,
    PositionPropertyParameter, PropertyParameter,
};

use crate::store::Iri;
use std::collections::HashMap;

/// Argument values for one execution, keyed by parameter predicate iri
pub type ArgumentMap = HashMap<Iri, serde_json::Value>;

/// Output values of one execution, keyed by output predicate iri
pub type OutputMap = HashMap<Iri, serde_json::Value>;
