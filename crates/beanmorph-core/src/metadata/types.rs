//! Declarative type shapes returned by metadata providers
//!
//! Copyright (c) 2025 Beanmorph Team
//! Licensed under the Apache-2.0 license

use crate::types::TypeRef;
use serde::{Deserialize, Serialize};

fn default_true() -> bool {
    true
}

/// Structural constraint declared on a property, checked by the bean validator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Constraint {
    /// Value must not be null or an absent optional
    NotNull,
    /// String must contain at least one non-whitespace character
    NotBlank,
    /// Number must be greater than or equal to the bound
    Min(i64),
    /// Number must be lower than or equal to the bound
    Max(i64),
    /// Length of a string, sequence or map must fall within the bounds
    Size {
        #[serde(default)]
        min: Option<usize>,
        #[serde(default)]
        max: Option<usize>,
    },
    /// String must match the whole regular expression
    Pattern(String),
}

/// One property of a type as seen by the metadata provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyShape {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeRef,
    /// A backing field exists
    #[serde(default = "default_true")]
    pub has_field: bool,
    /// A getter exists
    #[serde(default = "default_true")]
    pub has_accessor: bool,
    /// A setter exists
    #[serde(default = "default_true")]
    pub has_mutator: bool,
    /// The backing field is final
    #[serde(default)]
    pub read_only: bool,
    /// Value the default constructor leaves in the property
    #[serde(default)]
    pub initializer: Option<serde_json::Value>,
    #[serde(default)]
    pub constraints: Vec<Constraint>,
}

impl PropertyShape {
    /// Property with a field, a getter and a setter
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
            has_field: true,
            has_accessor: true,
            has_mutator: true,
            read_only: false,
            initializer: None,
            constraints: Vec::new(),
        }
    }

    pub fn without_field(mut self) -> Self {
        self.has_field = false;
        self
    }

    pub fn without_accessor(mut self) -> Self {
        self.has_accessor = false;
        self
    }

    pub fn without_mutator(mut self) -> Self {
        self.has_mutator = false;
        self
    }

    /// Final field: no setter, value fixed by the constructor
    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self.has_mutator = false;
        self
    }

    pub fn initializer(mut self, value: serde_json::Value) -> Self {
        self.initializer = Some(value);
        self
    }

    pub fn constraint(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }
}

/// Constructor parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamShape {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeRef,
}

impl ParamShape {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self { name: name.into(), ty }
    }
}

/// Constructor signature; an empty parameter list is the default constructor
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConstructorShape {
    #[serde(default)]
    pub params: Vec<ParamShape>,
}

impl ConstructorShape {
    pub fn new(params: Vec<ParamShape>) -> Self {
        Self { params }
    }

    pub fn is_default(&self) -> bool {
        self.params.is_empty()
    }
}

/// Everything a metadata provider knows about one type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeShape {
    pub name: String,
    #[serde(default)]
    pub properties: Vec<PropertyShape>,
    #[serde(default)]
    pub constructors: Vec<ConstructorShape>,
    /// Declared immutable regardless of available constructors
    #[serde(default)]
    pub value_type: bool,
    /// Supertype whose properties this type inherits
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
}
