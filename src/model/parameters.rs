// Copyright 2025 Cowboy AI, LLC.

//! Parameter mapping model
//!
//! Classifies raw parameter-mapping descriptors into the three supported
//! calling-convention slot kinds and carries the slot types the
//! implementation variants marshal with.

use crate::errors::{EngineError, EngineResult};
use crate::store::{DescriptorStore, Iri};
use crate::vocabulary::fnom;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// An argument passed by ordinal position
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionParameter {
    /// Semantic predicate the argument value is keyed by
    pub predicate: Iri,
    /// Ordinal position on the implementation side
    pub position: u32,
}

/// An argument passed by named property/flag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyParameter {
    /// Semantic predicate the argument value is keyed by
    pub predicate: Iri,
    /// Property/flag name on the implementation side
    pub property: String,
}

/// An argument passed as a flag at an ordinal position
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionPropertyParameter {
    /// Semantic predicate the argument value is keyed by
    pub predicate: Iri,
    /// Ordinal position on the implementation side
    pub position: u32,
    /// Flag name rendered before the value
    pub property: String,
}

/// A return slot keyed by its output predicate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Output {
    /// Semantic predicate the output value is keyed by
    pub predicate: Iri,
}

/// The three supported calling-convention slot kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParameterMappingKind {
    /// Ordinal argument
    Position,
    /// Named flag
    Property,
    /// Ordinal flag
    PositionProperty,
}

/// Classify one parameter-mapping resource by its two independent type tags
///
/// Both tags -> PositionProperty; only the position tag -> Position; only
/// the property tag -> Property; neither -> `None` (the argument will never
/// populate, which is worth a warning but not fatal).
pub fn classify_parameter_mapping(
    store: &dyn DescriptorStore,
    mapping: &str,
) -> Option<ParameterMappingKind> {
    let position = store.is_a(mapping, fnom::POSITION_PARAMETER_MAPPING);
    let property = store.is_a(mapping, fnom::PROPERTY_PARAMETER_MAPPING);
    match (position, property) {
        (true, true) => Some(ParameterMappingKind::PositionProperty),
        (true, false) => Some(ParameterMappingKind::Position),
        (false, true) => Some(ParameterMappingKind::Property),
        (false, false) => {
            warn!(
                mapping,
                "parameter mapping matches no classification, dropping it"
            );
            None
        }
    }
}

/// Parameter mappings partitioned by classification
///
/// The partition is exhaustive and exclusive: classified plus dropped must
/// reconcile with the input count, anything else is an internal
/// inconsistency and aborts the load.
#[derive(Debug, Clone, Default)]
pub struct ClassifiedParameterMappings {
    /// Mappings tagged position-only
    pub position: Vec<Iri>,
    /// Mappings tagged property-only
    pub property: Vec<Iri>,
    /// Mappings tagged both ways
    pub position_property: Vec<Iri>,
    /// Count of mappings matching neither tag
    pub dropped: usize,
}

impl ClassifiedParameterMappings {
    /// Classify every parameter mapping of `subject`
    pub fn from_store(
        store: &dyn DescriptorStore,
        subject: &str,
        mappings: &[Iri],
    ) -> EngineResult<Self> {
        let mut classified = Self::default();
        for mapping in mappings {
            match classify_parameter_mapping(store, mapping) {
                Some(ParameterMappingKind::Position) => classified.position.push(mapping.clone()),
                Some(ParameterMappingKind::Property) => classified.property.push(mapping.clone()),
                Some(ParameterMappingKind::PositionProperty) => {
                    classified.position_property.push(mapping.clone())
                }
                None => classified.dropped += 1,
            }
        }

        let total_classified =
            classified.position.len() + classified.property.len() + classified.position_property.len();
        if total_classified + classified.dropped != mappings.len() {
            return Err(EngineError::ClassificationMismatch {
                subject: subject.to_string(),
                classified: total_classified,
                dropped: classified.dropped,
                total: mappings.len(),
            });
        }

        Ok(classified)
    }
}
