//! Transformation registry: field transformers, field mappings and skips
//!
//! Copyright (c) 2025 Beanmorph Team
//! Licensed under the Apache-2.0 license

use crate::settings::TransformerSettings;
use crate::types::Value;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

/// Function value held by a [`FieldTransformer`]
#[derive(Clone)]
pub enum TransformerFunction {
    /// Produces a value without looking at the source
    Supplier(Arc<dyn Fn() -> Value + Send + Sync>),
    /// Derives the destination value from the source value
    Function(Arc<dyn Fn(Value) -> Value + Send + Sync>),
}

/// Override for the value of one destination field
#[derive(Clone)]
pub struct FieldTransformer {
    destination_field: String,
    function: TransformerFunction,
}

impl FieldTransformer {
    /// Transformer receiving the source value (null when the source lacks the field)
    pub fn new<F>(destination_field: impl Into<String>, function: F) -> Self
    where
        F: Fn(Value) -> Value + Send + Sync + 'static,
    {
        Self {
            destination_field: destination_field.into(),
            function: TransformerFunction::Function(Arc::new(function)),
        }
    }

    /// Transformer ignoring the source; populates fields the source does not have
    pub fn supplier<F>(destination_field: impl Into<String>, supplier: F) -> Self
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        Self {
            destination_field: destination_field.into(),
            function: TransformerFunction::Supplier(Arc::new(supplier)),
        }
    }

    pub fn destination_field(&self) -> &str {
        &self.destination_field
    }

    /// Number of arguments the function takes
    pub fn arity(&self) -> usize {
        match self.function {
            TransformerFunction::Supplier(_) => 0,
            TransformerFunction::Function(_) => 1,
        }
    }

    pub fn apply(&self, source_value: Value) -> Value {
        match &self.function {
            TransformerFunction::Supplier(supplier) => supplier(),
            TransformerFunction::Function(function) => function(source_value),
        }
    }
}

impl fmt::Debug for FieldTransformer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldTransformer")
            .field("destination_field", &self.destination_field)
            .field("arity", &self.arity())
            .finish()
    }
}

/// Populate a destination field from a differently named source field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMapping {
    source_field: String,
    destination_field: String,
}

impl FieldMapping {
    /// `source_field` may be a dotted path into the current source object
    pub fn new(source_field: impl Into<String>, destination_field: impl Into<String>) -> Self {
        Self {
            source_field: source_field.into(),
            destination_field: destination_field.into(),
        }
    }

    pub fn source_field(&self) -> &str {
        &self.source_field
    }

    pub fn destination_field(&self) -> &str {
        &self.destination_field
    }
}

/// Last segment of a dotted field path
pub fn flat_name(path: &str) -> &str {
    path.rsplit('.').next().unwrap_or(path)
}

/// Configuration consulted by the object mapper for every destination field
#[derive(Debug, Clone, Default)]
pub struct TransformationRegistry {
    transformers: HashMap<String, FieldTransformer>,
    mappings: HashMap<String, FieldMapping>,
    skipped: HashSet<String>,
    settings: TransformerSettings,
}

impl TransformationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: TransformerSettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    pub fn settings(&self) -> &TransformerSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut TransformerSettings {
        &mut self.settings
    }

    /// Register or replace the transformer for its destination field
    pub fn add_transformer(&mut self, transformer: FieldTransformer) {
        self.transformers
            .insert(transformer.destination_field.clone(), transformer);
    }

    pub fn remove_transformer(&mut self, destination_field: &str) -> Option<FieldTransformer> {
        self.transformers.remove(destination_field)
    }

    pub fn clear_transformers(&mut self) {
        self.transformers.clear();
    }

    /// Register or replace the mapping for its destination field
    pub fn add_mapping(&mut self, mapping: FieldMapping) {
        self.mappings
            .insert(mapping.destination_field.clone(), mapping);
    }

    pub fn remove_mapping(&mut self, destination_field: &str) -> Option<FieldMapping> {
        self.mappings.remove(destination_field)
    }

    pub fn clear_mappings(&mut self) {
        self.mappings.clear();
    }

    pub fn add_skip(&mut self, path: impl Into<String>) {
        self.skipped.insert(path.into());
    }

    pub fn clear_skips(&mut self) {
        self.skipped.clear();
    }

    pub fn transformer_count(&self) -> usize {
        self.transformers.len()
    }

    pub fn mapping_count(&self) -> usize {
        self.mappings.len()
    }

    pub fn skip_count(&self) -> usize {
        self.skipped.len()
    }

    /// Whether the field at `path` must be left untouched
    pub fn is_skipped(&self, path: &str) -> bool {
        self.skipped.contains(path)
            || (self.settings.flat_field_name_transformation && self.skipped.contains(flat_name(path)))
    }

    /// Transformer for `path`; an exact path match beats a flat-name match
    pub fn transformer_for(&self, path: &str) -> Option<&FieldTransformer> {
        self.transformers.get(path).or_else(|| {
            if self.settings.flat_field_name_transformation {
                self.transformers.get(flat_name(path))
            } else {
                None
            }
        })
    }

    /// Mapping for `path`; an exact path match beats a flat-name match
    pub fn mapping_for(&self, path: &str) -> Option<&FieldMapping> {
        self.mappings.get(path).or_else(|| {
            if self.settings.flat_field_name_transformation {
                self.mappings.get(flat_name(path))
            } else {
                None
            }
        })
    }
}
