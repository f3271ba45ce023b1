//! Builder for declaring type shapes
//!
//! This module provides a fluent builder API for describing a bean: its
//! properties, its constructors and whether it is a value type.
//!
//! Copyright (c) 2025 Beanmorph Team
//! Licensed under the Apache-2.0 license

use crate::{Error, Result};
use crate::types::TypeRef;
use super::types::{ConstructorShape, ParamShape, PropertyShape, TypeShape};

enum PendingConstructor {
    /// Parameters named after declared properties
    Named(Vec<String>),
    /// One parameter per declared property, in declaration order
    AllArgs,
    Explicit(ConstructorShape),
}

/// Builder for creating type shapes
pub struct TypeShapeBuilder {
    name: String,
    properties: Vec<PropertyShape>,
    constructors: Vec<PendingConstructor>,
    value_type: bool,
    parent: Option<String>,
}

impl TypeShapeBuilder {
    /// Create a new shape builder
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: Vec::new(),
            constructors: Vec::new(),
            value_type: false,
            parent: None,
        }
    }

    /// Add a property with a field, a getter and a setter
    pub fn property(self, name: impl Into<String>, ty: TypeRef) -> Self {
        self.with_property(PropertyShape::new(name, ty))
    }

    /// Add a fully described property, replacing an inherited one of the same name
    pub fn with_property(mut self, property: PropertyShape) -> Self {
        match self.properties.iter_mut().find(|p| p.name == property.name) {
            Some(existing) => *existing = property,
            None => self.properties.push(property),
        }
        self
    }

    /// Add the no-argument constructor
    pub fn default_constructor(mut self) -> Self {
        self.constructors
            .push(PendingConstructor::Explicit(ConstructorShape::default()));
        self
    }

    /// Add a constructor whose parameters are the named properties
    pub fn constructor<I, S>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.constructors.push(PendingConstructor::Named(
            params.into_iter().map(Into::into).collect(),
        ));
        self
    }

    /// Add a constructor taking every property in declaration order
    pub fn all_args_constructor(mut self) -> Self {
        self.constructors.push(PendingConstructor::AllArgs);
        self
    }

    /// Add a constructor with explicit parameter types
    pub fn constructor_shape(mut self, constructor: ConstructorShape) -> Self {
        self.constructors.push(PendingConstructor::Explicit(constructor));
        self
    }

    /// Inherit the properties of `parent`
    ///
    /// Inherited properties come first, so constructors built afterwards can
    /// name them and all-args constructors take them before the own ones.
    /// Properties declared later with the same name override them.
    pub fn extends(mut self, parent: &TypeShape) -> Self {
        let own = std::mem::take(&mut self.properties);
        self.properties = parent.properties.clone();
        self.parent = Some(parent.name.clone());
        for property in own {
            self = self.with_property(property);
        }
        self
    }

    /// Declare the type immutable
    pub fn value_type(mut self) -> Self {
        self.value_type = true;
        self
    }

    /// Build the type shape
    pub fn build(self) -> Result<TypeShape> {
        let mut constructors = Vec::with_capacity(self.constructors.len());
        for pending in self.constructors {
            let constructor = match pending {
                PendingConstructor::Explicit(constructor) => constructor,
                PendingConstructor::AllArgs => ConstructorShape::new(
                    self.properties
                        .iter()
                        .map(|p| ParamShape::new(p.name.clone(), p.ty.clone()))
                        .collect(),
                ),
                PendingConstructor::Named(names) => {
                    let mut params = Vec::with_capacity(names.len());
                    for name in names {
                        let property = self
                            .properties
                            .iter()
                            .find(|p| p.name == name)
                            .ok_or_else(|| {
                                Error::configuration(format!(
                                    "constructor parameter '{}' of {} does not name a property",
                                    name, self.name
                                ))
                            })?;
                        params.push(ParamShape::new(name, property.ty.clone()));
                    }
                    ConstructorShape::new(params)
                }
            };
            constructors.push(constructor);
        }

        Ok(TypeShape {
            name: self.name,
            properties: self.properties,
            constructors,
            value_type: self.value_type,
            parent: self.parent,
        })
    }
}
