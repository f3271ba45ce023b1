//! Object graph mapping
//!
//! The mapping engine copies a source object graph into a destination type,
//! field by field, honouring the per-transformer configuration.
//!
//! # Module Organization
//!
//! - [`coercer`] - Scalar conversion, widening and default injection
//! - [`container`] - Element-wise mapping of sequences and maps
//! - [`context`] - Per-call state: cycle tracking and phases
//! - [`object`] - The per-field decision procedure and construction
//! - [`registry`] - Field transformers, field mappings and skips
//! - [`transformer`] - [`BeanTransformer`], the public entry point
//!
//! # Examples
//!
//! ```
//! use beanmorph_core::{BeanTransformer, FieldTransformer, Instance, TypeRef, TypeRegistry, TypeShapeBuilder, Value};
//! use std::sync::Arc;
//!
//! let registry = TypeRegistry::new();
//! for name in ["FromPerson", "ToPerson"] {
//!     registry.register(
//!         TypeShapeBuilder::new(name)
//!             .property("name", TypeRef::String)
//!             .default_constructor()
//!             .build()
//!             .unwrap(),
//!     );
//! }
//!
//! let mut transformer = BeanTransformer::new(Arc::new(registry));
//! transformer.with_field_transformer(FieldTransformer::new("name", |v| {
//!     Value::from(format!("prefix-{}", v.as_str().unwrap_or_default()))
//! }));
//!
//! let source = Instance::new("FromPerson").with("name", "Goofy").into_value();
//! let mapped = transformer.transform_to(&source, "ToPerson").unwrap();
//! assert_eq!(mapped.get("name"), Some(Value::from("prefix-Goofy")));
//! ```
//!
//! Copyright (c) 2025 Beanmorph Team
//! Licensed under the Apache-2.0 license

pub mod coercer;
pub mod container;
pub mod context;
pub mod object;
pub mod registry;
pub mod transformer;


pub use coercer::ValueCoercer;
pub use container::{ContainerMapper, ElementMapper};
pub use context::{MappingContext, TransformPhase};
pub use object::{Destination, ObjectMapper};
pub use registry::{FieldMapping, FieldTransformer, TransformationRegistry, TransformerFunction};
pub use transformer::BeanTransformer;
