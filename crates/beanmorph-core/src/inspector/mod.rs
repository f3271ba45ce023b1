//! Type inspection
//!
//! Turns the raw shapes of a [`crate::metadata::MetadataProvider`] into
//! [`TypeDescriptor`]s: readable/writable flags per field, MUTABLE or
//! IMMUTABLE classification and the constructor used for immutable types.
//!
//! Copyright (c) 2025 Beanmorph Team
//! Licensed under the Apache-2.0 license

pub mod descriptor;
pub mod cache;

pub use descriptor::{ClassType, FieldDescriptor, TypeDescriptor};
pub use cache::TypeInspector;
