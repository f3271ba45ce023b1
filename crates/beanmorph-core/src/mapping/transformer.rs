//! Public transformation surface
//!
//! [`BeanTransformer`] owns the configuration (transformers, mappings, skips
//! and settings) and runs one [`ObjectMapper`] per call. Configuration
//! methods chain and take effect on the next call.
//!
//! Copyright (c) 2025 Beanmorph Team
//! Licensed under the Apache-2.0 license

use crate::bean::{Bean, FromValue};
use crate::inspector::TypeInspector;
use crate::metadata::MetadataProvider;
use crate::settings::TransformerSettings;
use crate::types::{ObjectRef, Value};
use crate::validation::{BeanValidator, ConstraintValidator};
use crate::{Error, Result};
use super::context::MappingContext;
use super::object::{Destination, ObjectMapper};
use super::registry::{FieldMapping, FieldTransformer, TransformationRegistry};
use std::sync::Arc;
use tracing::debug_span;

/// Maps object graphs between types described by a metadata provider
///
/// Clones share the inspector cache and the validator but carry their own
/// configuration, so concurrent callers should each hold a clone.
#[derive(Clone)]
pub struct BeanTransformer {
    inspector: Arc<TypeInspector>,
    registry: TransformationRegistry,
    validator: Arc<dyn BeanValidator>,
    bound_destination: Option<String>,
}

impl BeanTransformer {
    pub fn new(provider: Arc<dyn MetadataProvider>) -> Self {
        Self::with_inspector(Arc::new(TypeInspector::new(provider)))
    }

    /// Share an existing inspector (and its descriptor cache)
    pub fn with_inspector(inspector: Arc<TypeInspector>) -> Self {
        Self {
            inspector,
            registry: TransformationRegistry::new(),
            validator: Arc::new(ConstraintValidator::new()),
            bound_destination: None,
        }
    }

    /// Register a transformer; replaces any previous one for the same field
    pub fn with_field_transformer(&mut self, transformer: FieldTransformer) -> &mut Self {
        self.registry.add_transformer(transformer);
        self
    }

    pub fn remove_field_transformer(&mut self, destination_field: &str) -> &mut Self {
        self.registry.remove_transformer(destination_field);
        self
    }

    pub fn reset_fields_transformer(&mut self) -> &mut Self {
        self.registry.clear_transformers();
        self
    }

    /// Populate `destination_field` from a differently named (or nested) source field
    pub fn with_field_mapping(&mut self, mapping: FieldMapping) -> &mut Self {
        self.registry.add_mapping(mapping);
        self
    }

    pub fn remove_field_mapping(&mut self, destination_field: &str) -> &mut Self {
        self.registry.remove_mapping(destination_field);
        self
    }

    pub fn reset_fields_mapping(&mut self) -> &mut Self {
        self.registry.clear_mappings();
        self
    }

    /// Leave the given destination fields at their default
    pub fn skip_transformation_for_field<I, S>(&mut self, paths: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for path in paths {
            self.registry.add_skip(path);
        }
        self
    }

    pub fn reset_fields_transformation_skip(&mut self) -> &mut Self {
        self.registry.clear_skips();
        self
    }

    pub fn set_flat_field_name_transformation(&mut self, enabled: bool) -> &mut Self {
        self.registry.settings_mut().flat_field_name_transformation = enabled;
        self
    }

    pub fn set_default_value_set_enabled(&mut self, enabled: bool) -> &mut Self {
        self.registry.settings_mut().default_value_set_enabled = enabled;
        self
    }

    pub fn set_validation_enabled(&mut self, enabled: bool) -> &mut Self {
        self.registry.settings_mut().validation_enabled = enabled;
        self
    }

    /// Replace all three settings at once
    pub fn with_settings(&mut self, settings: TransformerSettings) -> &mut Self {
        *self.registry.settings_mut() = settings;
        self
    }

    pub fn with_validator(&mut self, validator: Arc<dyn BeanValidator>) -> &mut Self {
        self.validator = validator;
        self
    }

    /// Destination type used by [`BeanTransformer::transform`]
    pub fn bind_destination(&mut self, type_name: impl Into<String>) -> &mut Self {
        self.bound_destination = Some(type_name.into());
        self
    }

    pub fn settings(&self) -> &TransformerSettings {
        self.registry.settings()
    }

    pub fn inspector(&self) -> &Arc<TypeInspector> {
        &self.inspector
    }

    pub fn registry(&self) -> &TransformationRegistry {
        &self.registry
    }

    /// Transform into the bound destination type
    pub fn transform(&self, source: &Value) -> Result<Value> {
        let destination = self.bound_destination.as_deref().ok_or_else(|| {
            Error::configuration("no destination type bound; call bind_destination first")
        })?;
        self.transform_to(source, destination)
    }

    /// Transform into a new instance of `destination`
    pub fn transform_to(&self, source: &Value, destination: &str) -> Result<Value> {
        let source = source_object(source)?;
        let span = debug_span!("transform", source = %source.type_name(), destination);
        let _enter = span.enter();

        let mut context = MappingContext::new();
        let instance = self.mapper().map_object(
            source,
            Destination::Type(destination.to_string()),
            "",
            &mut context,
        )?;
        Ok(Value::from(instance))
    }

    /// Update an existing mutable instance in place
    ///
    /// Fields without a source counterpart keep their current values. The
    /// handle is only updated when the whole transformation succeeds.
    pub fn transform_into(&self, source: &Value, destination: &ObjectRef) -> Result<ObjectRef> {
        let source = source_object(source)?;
        let current = destination.snapshot();
        let span = debug_span!(
            "transform",
            source = %source.type_name(),
            destination = current.type_name()
        );
        let _enter = span.enter();

        let mut context = MappingContext::new();
        let updated = self
            .mapper()
            .map_object(source, Destination::Existing(current), "", &mut context)?;
        destination.replace(updated);
        Ok(destination.clone())
    }

    /// Transform between two [`Bean`] types
    pub fn transform_bean<S: Bean, D: Bean>(&self, source: &S) -> Result<D> {
        let mapped = self.transform_to(&source.to_value(), D::TYPE_NAME)?;
        <D as FromValue>::from_value(&mapped)
    }

    /// Check an object against its declared constraints
    pub fn validate(&self, value: &Value) -> Result<()> {
        let object = source_object(value)?;
        let instance = object.snapshot();
        let descriptor = self.inspector.describe(instance.type_name())?;
        let violations = self.validator.validate(&instance, &descriptor);
        if violations.is_empty() {
            Ok(())
        } else {
            Err(Error::InvalidBean {
                type_name: descriptor.name.clone(),
                message: "constraint violations".to_string(),
                violations: violations.iter().map(ToString::to_string).collect(),
            })
        }
    }

    pub(crate) fn mapper(&self) -> ObjectMapper<'_> {
        ObjectMapper::new(&self.inspector, &self.registry, self.validator.as_ref())
    }
}

impl std::fmt::Debug for BeanTransformer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BeanTransformer")
            .field("registry", &self.registry)
            .field("bound_destination", &self.bound_destination)
            .finish()
    }
}

fn source_object(value: &Value) -> Result<&ObjectRef> {
    value
        .as_object()
        .ok_or_else(|| Error::mapping("", format!("source must be an object, got {}", value.type_label())))
}
