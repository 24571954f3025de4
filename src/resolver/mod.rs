// Copyright 2025 Cowboy AI, LLC.

//! Resolution: linking functions to something executable
//!
//! The mapping resolver links a function to a usable atomic implementation;
//! the composition resolver builds and validates a dependency graph chaining
//! multiple functions and registers it as a composite plan.

mod composition;
pub mod graph;
mod mapping;

pub use composition::CompositionResolver;
pub use mapping::{MappingResolver, ResolvedMapping};
