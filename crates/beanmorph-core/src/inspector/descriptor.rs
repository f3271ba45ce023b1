//! Resolved type descriptors
//!
//! Copyright (c) 2025 Beanmorph Team
//! Licensed under the Apache-2.0 license

use crate::metadata::{Constraint, ConstructorShape};
use crate::types::{Instance, TypeRef, Value};

/// How a destination instance gets built
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassType {
    /// Default constructor followed by mutators
    Mutable,
    /// One call to a parameterized constructor
    Immutable,
}

/// A single property of a described type
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    pub name: String,
    pub ty: TypeRef,
    /// Nested object or container
    pub composite: bool,
    /// Readable through a field or a getter
    pub readable: bool,
    /// Has a setter
    pub writable: bool,
    /// Backing field that can be written without a setter
    pub field_access: bool,
    pub read_only: bool,
    /// Value left by the default constructor, if declared
    pub initial: Option<Value>,
    pub constraints: Vec<Constraint>,
}

impl FieldDescriptor {
    /// Value the field holds straight after default construction
    pub fn default_value(&self) -> Value {
        self.initial.clone().unwrap_or_else(|| self.ty.zero_value())
    }

    /// A constructor may omit this field
    pub fn is_defaultable(&self) -> bool {
        self.initial.is_some()
    }
}

/// Cached description of one type
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDescriptor {
    pub name: String,
    pub fields: Vec<FieldDescriptor>,
    pub constructors: Vec<ConstructorShape>,
    pub class_type: ClassType,
    /// Constructor whose parameters match the declared fields (immutable types only)
    pub value_constructor: Option<ConstructorShape>,
}

impl TypeDescriptor {
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn is_immutable(&self) -> bool {
        self.class_type == ClassType::Immutable
    }

    pub fn has_default_constructor(&self) -> bool {
        self.constructors.iter().any(ConstructorShape::is_default)
    }

    /// Instance as produced by the default constructor
    pub fn default_instance(&self) -> Instance {
        self.fields
            .iter()
            .fold(Instance::new(self.name.clone()), |instance, field| {
                instance.with(field.name.clone(), field.default_value())
            })
    }
}
