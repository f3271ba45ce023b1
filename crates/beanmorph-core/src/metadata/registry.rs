//! In-memory metadata provider
//!
//! Copyright (c) 2025 Beanmorph Team
//! Licensed under the Apache-2.0 license

use crate::bean::Bean;
use crate::{Error, Result};
use super::types::TypeShape;
use super::MetadataProvider;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::sync::{PoisonError, RwLock};

/// JSON document accepted by [`TypeRegistry::from_json_str`]
#[derive(Debug, Deserialize)]
struct ShapeDocument {
    types: Vec<TypeShape>,
}

/// Thread-safe registry of type shapes
///
/// Shapes are registered programmatically, from [`Bean`] implementations or
/// from a JSON document. Re-registering a name replaces the previous shape,
/// but inspectors that already described the type keep their cached view.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    shapes: RwLock<HashMap<String, TypeShape>>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register or replace a shape
    pub fn register(&self, shape: TypeShape) -> &Self {
        self.shapes
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(shape.name.clone(), shape);
        self
    }

    /// Register the shape of a typed bean
    pub fn register_bean<B: Bean>(&self) -> &Self {
        self.register(B::shape())
    }

    /// Load shapes from a JSON document of the form `{"types": [...]}`
    pub fn from_json_str(document: &str) -> Result<Self> {
        let document: ShapeDocument = serde_json::from_str(document)?;
        let registry = Self::new();
        for shape in document.types {
            if shape.name.is_empty() {
                return Err(Error::configuration("type shape without a name"));
            }
            registry.register(shape);
        }
        Ok(registry)
    }

    /// Load shapes from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.shapes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(type_name)
    }

    pub fn len(&self) -> usize {
        self.shapes.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl MetadataProvider for TypeRegistry {
    fn shape_of(&self, type_name: &str) -> Option<TypeShape> {
        self.shapes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(type_name)
            .cloned()
    }
}
