//! Beanmorph Core - Object graph mapping between structurally similar types
//!
//! This crate copies an object graph of one type into a fresh (or existing)
//! instance of another type, matching fields by name, recursing into nested
//! objects and containers, and applying per-field overrides.
//!
//! # Main Components
//!
//! - **Error Handling**: Error types using `thiserror` and `anyhow`
//! - **Object Model**: Dynamic values, shared object handles and type references
//! - **Metadata**: Type shapes supplied by a pluggable provider
//! - **Inspection**: Cached descriptors with MUTABLE/IMMUTABLE classification
//! - **Mapping**: Coercion, container mapping and the object mapper
//! - **Validation**: Declared constraints checked on constructed beans
//!
//! # Example
//!
//! ```
//! use beanmorph_core::{BeanTransformer, Instance, Result, TypeRef, TypeRegistry, TypeShapeBuilder, Value};
//! use std::sync::Arc;
//!
//! fn example() -> Result<()> {
//!     let registry = TypeRegistry::new();
//!     registry.register(
//!         TypeShapeBuilder::new("FromFoo")
//!             .property("name", TypeRef::String)
//!             .default_constructor()
//!             .build()?,
//!     );
//!     registry.register(
//!         TypeShapeBuilder::new("ImmutableToFoo")
//!             .property("name", TypeRef::String)
//!             .all_args_constructor()
//!             .build()?,
//!     );
//!
//!     let transformer = BeanTransformer::new(Arc::new(registry));
//!     let source = Instance::new("FromFoo").with("name", "Goofy").into_value();
//!     let mapped = transformer.transform_to(&source, "ImmutableToFoo")?;
//!     assert_eq!(mapped.get("name"), Some(Value::from("Goofy")));
//!     Ok(())
//! }
//! # example().unwrap();
//! ```

pub mod error;
pub mod types;
pub mod bean;
pub mod metadata;
pub mod inspector;
pub mod mapping;
pub mod validation;
pub mod settings;

// Re-export main types for convenience
pub use error::{Error, ErrorKind, Result};
pub use types::{
    // Object model
    Instance, MapValue, ObjectRef, Value,

    // Type references
    ScalarKind, TypeRef,
};
pub use bean::{Bean, FromValue};
pub use metadata::{
    Constraint, ConstructorShape, MetadataProvider, ParamShape, PropertyShape, TypeRegistry,
    TypeShape, TypeShapeBuilder,
};
pub use inspector::{ClassType, FieldDescriptor, TypeDescriptor, TypeInspector};
pub use mapping::{BeanTransformer, FieldMapping, FieldTransformer, TransformationRegistry};
pub use validation::{BeanValidator, ConstraintValidator, ConstraintViolation};
pub use settings::TransformerSettings;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
