//! Metadata providers: the shape of a type, independent of how it is obtained
//!
//! The engine never inspects Rust types directly. Everything it knows about a
//! bean (its properties, accessors, mutators and constructors) comes through
//! the [`MetadataProvider`] trait. [`TypeRegistry`] is the in-memory
//! implementation, fed by [`TypeShapeBuilder`], by [`crate::Bean`] types or by
//! a JSON document.
//!
//! - [`types`] - Shape definitions and declared constraints
//! - [`builder`] - Fluent builder for shapes
//! - [`registry`] - Thread-safe in-memory provider
//!
//! Copyright (c) 2025 Beanmorph Team
//! Licensed under the Apache-2.0 license

pub mod types;
pub mod builder;
pub mod registry;

pub use types::{Constraint, ConstructorShape, ParamShape, PropertyShape, TypeShape};
pub use builder::TypeShapeBuilder;
pub use registry::TypeRegistry;

/// Read-only source of type shapes
pub trait MetadataProvider: Send + Sync {
    /// Shape of the named type, or `None` if the provider does not know it
    fn shape_of(&self, type_name: &str) -> Option<TypeShape>;
}
