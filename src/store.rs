// Copyright 2025 Cowboy AI, LLC.

//! Descriptor store seam
//!
//! The engine consumes function/mapping/implementation/composition
//! descriptions exclusively through a wildcardable subject/predicate/object
//! pattern match over the union of loaded named graphs. It never parses a
//! wire format; ingestion hands the store pre-parsed triples.

use crate::errors::{EngineError, EngineResult};
use crate::vocabulary::rdf;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock};
use tracing::warn;

/// An iri (or literal) rendered as a plain string
pub type Iri = String;

/// A single subject/predicate/object statement
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Triple {
    /// Subject resource
    pub subject: Iri,
    /// Predicate resource
    pub predicate: Iri,
    /// Object resource or literal value
    pub object: Iri,
}

impl Triple {
    /// Create a triple from its three terms
    pub fn new(
        subject: impl Into<String>,
        predicate: impl Into<String>,
        object: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object: object.into(),
        }
    }
}

/// Pattern-matching query interface over loaded descriptions
///
/// `None` terms are wildcards. All provided helpers are defined in terms of
/// `match_pattern`, so implementors only supply the one method.
pub trait DescriptorStore: Send + Sync {
    /// All triples matching the given pattern, in deterministic store order
    fn match_pattern(
        &self,
        subject: Option<&str>,
        predicate: Option<&str>,
        object: Option<&str>,
    ) -> Vec<Triple>;

    /// Objects of all `(subject, predicate, _)` statements
    fn objects(&self, subject: &str, predicate: &str) -> Vec<Iri> {
        self.match_pattern(Some(subject), Some(predicate), None)
            .into_iter()
            .map(|t| t.object)
            .collect()
    }

    /// Subjects of all `(_, predicate, object)` statements
    fn subjects(&self, predicate: &str, object: &str) -> Vec<Iri> {
        self.match_pattern(None, Some(predicate), Some(object))
            .into_iter()
            .map(|t| t.subject)
            .collect()
    }

    /// The single object of `(subject, predicate, _)`
    ///
    /// Missing is an error; extra objects log a warning and the first wins.
    fn single_object(&self, subject: &str, predicate: &str) -> EngineResult<Iri> {
        let mut objects = self.objects(subject, predicate);
        if objects.is_empty() {
            return Err(EngineError::MissingDescriptor {
                subject: subject.to_string(),
                predicate: predicate.to_string(),
            });
        }
        if objects.len() > 1 {
            warn!(
                subject,
                predicate, "too many objects found, just picking one at random"
            );
        }
        Ok(objects.remove(0))
    }

    /// The object of `(subject, predicate, _)` if present, first one wins
    fn opt_object(&self, subject: &str, predicate: &str) -> Option<Iri> {
        self.objects(subject, predicate).into_iter().next()
    }

    /// Whether `(subject, predicate, object)` is asserted
    fn exists(&self, subject: &str, predicate: &str, object: &str) -> bool {
        !self
            .match_pattern(Some(subject), Some(predicate), Some(object))
            .is_empty()
    }

    /// Whether `subject` carries `rdf:type class`
    fn is_a(&self, subject: &str, class: &str) -> bool {
        self.exists(subject, rdf::TYPE, class)
    }

    /// The subject itself, if it is typed with the given class
    fn subject_of_type(&self, iri: &str, class: &str) -> Option<Iri> {
        if self.is_a(iri, class) {
            Some(iri.to_string())
        } else {
            None
        }
    }

    /// Elements of the RDF collection starting at `head`, in order
    ///
    /// Walks `rdf:first`/`rdf:rest` until `rdf:nil`. A broken cell (missing
    /// first or rest) ends the walk with a warning rather than failing:
    /// collection structure is optional-but-expected, not load-bearing.
    fn list_elements(&self, head: &str) -> Vec<Iri> {
        let mut elements = Vec::new();
        let mut cell = head.to_string();
        while cell != rdf::NIL {
            match self.opt_object(&cell, rdf::FIRST) {
                Some(first) => elements.push(first),
                None => {
                    warn!(cell = %cell, "collection cell without rdf:first, ending walk");
                    break;
                }
            }
            match self.opt_object(&cell, rdf::REST) {
                Some(rest) => cell = rest,
                None => {
                    warn!(cell = %cell, "collection cell without rdf:rest, ending walk");
                    break;
                }
            }
        }
        elements
    }
}

/// In-memory descriptor store over named graph parts
///
/// Each loaded description is a named graph identified by its iri; queries
/// run over the union of all parts. Re-adding a graph under the same iri
/// replaces the previous part.
#[derive(Clone, Default)]
pub struct MemoryDescriptorStore {
    parts: Arc<RwLock<IndexMap<Iri, Vec<Triple>>>>,
}

impl MemoryDescriptorStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a named graph part
    pub fn add_graph(&self, iri: impl Into<String>, triples: Vec<Triple>) {
        self.parts.write().unwrap().insert(iri.into(), triples);
    }

    /// Remove a named graph part; returns whether it existed
    pub fn remove_graph(&self, iri: &str) -> bool {
        self.parts.write().unwrap().shift_remove(iri).is_some()
    }

    /// Number of loaded graph parts
    pub fn graph_count(&self) -> usize {
        self.parts.read().unwrap().len()
    }

    /// Total number of triples across all parts
    pub fn triple_count(&self) -> usize {
        self.parts.read().unwrap().values().map(Vec::len).sum()
    }
}

impl DescriptorStore for MemoryDescriptorStore {
    fn match_pattern(
        &self,
        subject: Option<&str>,
        predicate: Option<&str>,
        object: Option<&str>,
    ) -> Vec<Triple> {
        let parts = self.parts.read().unwrap();
        parts
            .values()
            .flatten()
            .filter(|t| {
                subject.map_or(true, |s| t.subject == s)
                    && predicate.map_or(true, |p| t.predicate == p)
                    && object.map_or(true, |o| t.object == o)
            })
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_store() -> MemoryDescriptorStore {
        let store = MemoryDescriptorStore::new();
        store.add_graph(
            "g:one",
            vec![
                Triple::new("s:a", rdf::TYPE, "c:Widget"),
                Triple::new("s:a", "p:name", "alpha"),
                Triple::new("s:b", "p:name", "beta"),
            ],
        );
        store
    }

    /// Test wildcard pattern matching over the union of graphs
    #[test]
    fn test_match_pattern_wildcards() {
        let store = sample_store();

        assert_eq!(store.match_pattern(None, None, None).len(), 3);
        assert_eq!(store.match_pattern(Some("s:a"), None, None).len(), 2);
        assert_eq!(store.match_pattern(None, Some("p:name"), None).len(), 2);
        assert_eq!(
            store.match_pattern(None, Some("p:name"), Some("beta")),
            vec![Triple::new("s:b", "p:name", "beta")]
        );
        assert!(store.match_pattern(Some("s:z"), None, None).is_empty());
    }

    /// Test the single-object helper: missing errors, extras pick first
    #[test]
    fn test_single_object() {
        let store = sample_store();

        assert_eq!(store.single_object("s:a", "p:name").unwrap(), "alpha");

        let err = store.single_object("s:a", "p:missing").unwrap_err();
        assert!(matches!(err, EngineError::MissingDescriptor { .. }));

        store.add_graph("g:extra", vec![Triple::new("s:a", "p:name", "alpha2")]);
        // Two objects now; the first asserted one wins
        assert_eq!(store.single_object("s:a", "p:name").unwrap(), "alpha");
    }

    /// Test type checks
    #[test]
    fn test_is_a_and_subject_of_type() {
        let store = sample_store();

        assert!(store.is_a("s:a", "c:Widget"));
        assert!(!store.is_a("s:b", "c:Widget"));
        assert_eq!(
            store.subject_of_type("s:a", "c:Widget"),
            Some("s:a".to_string())
        );
        assert_eq!(store.subject_of_type("s:b", "c:Widget"), None);
    }

    /// Test re-adding a graph replaces its triples
    #[test]
    fn test_add_graph_replaces_part() {
        let store = sample_store();
        assert_eq!(store.triple_count(), 3);

        store.add_graph("g:one", vec![Triple::new("s:c", "p:name", "gamma")]);
        assert_eq!(store.graph_count(), 1);
        assert_eq!(store.triple_count(), 1);
        assert!(store.match_pattern(Some("s:a"), None, None).is_empty());
    }

    /// Test RDF collection traversal
    ///
    /// ```mermaid
    /// graph LR
    ///     L0 -->|rdf:first| A
    ///     L0 -->|rdf:rest| L1
    ///     L1 -->|rdf:first| B
    ///     L1 -->|rdf:rest| nil
    /// ```
    #[test]
    fn test_list_elements() {
        let store = MemoryDescriptorStore::new();
        store.add_graph(
            "g:list",
            vec![
                Triple::new("_:l0", rdf::FIRST, "e:a"),
                Triple::new("_:l0", rdf::REST, "_:l1"),
                Triple::new("_:l1", rdf::FIRST, "e:b"),
                Triple::new("_:l1", rdf::REST, rdf::NIL),
            ],
        );

        assert_eq!(store.list_elements("_:l0"), vec!["e:a", "e:b"]);
        assert!(store.list_elements(rdf::NIL).is_empty());
    }

    /// Test that a broken collection cell ends the walk instead of looping
    #[test]
    fn test_list_elements_broken_cell() {
        let store = MemoryDescriptorStore::new();
        store.add_graph(
            "g:list",
            vec![
                Triple::new("_:l0", rdf::FIRST, "e:a"),
                // no rdf:rest on _:l0
            ],
        );

        assert_eq!(store.list_elements("_:l0"), vec!["e:a"]);
    }
}
