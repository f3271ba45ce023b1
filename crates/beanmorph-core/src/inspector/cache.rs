//! Type inspector with a write-once descriptor cache
//!
//! Copyright (c) 2025 Beanmorph Team
//! Licensed under the Apache-2.0 license

use crate::metadata::{ConstructorShape, MetadataProvider, PropertyShape, TypeShape};
use crate::types::Value;
use crate::{Error, Result};
use super::descriptor::{ClassType, FieldDescriptor, TypeDescriptor};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::debug;

/// Describes types through a metadata provider and caches the result
///
/// Descriptors are computed once per type name and kept for the lifetime of
/// the inspector. Share one inspector (behind an `Arc`) between transformers
/// to share the cache.
pub struct TypeInspector {
    provider: Arc<dyn MetadataProvider>,
    cache: RwLock<HashMap<String, Arc<TypeDescriptor>>>,
}

impl TypeInspector {
    /// Create an inspector with an empty cache
    pub fn new(provider: Arc<dyn MetadataProvider>) -> Self {
        Self {
            provider,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Describe a type, computing and caching its descriptor on first use
    pub fn describe(&self, type_name: &str) -> Result<Arc<TypeDescriptor>> {
        if let Some(descriptor) = self
            .cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(type_name)
        {
            return Ok(Arc::clone(descriptor));
        }

        debug!(type_name, "describing type");
        let shape = self.resolve_shape(type_name)?;
        let descriptor = Arc::new(build_descriptor(shape)?);

        // Another thread may have won the race; keep the first descriptor.
        let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        let entry = cache
            .entry(type_name.to_string())
            .or_insert(descriptor);
        Ok(Arc::clone(entry))
    }

    /// Shape of `type_name` with the properties of all its supertypes
    ///
    /// Supertype properties come first; a property redeclared lower in the
    /// chain replaces the inherited one in place.
    fn resolve_shape(&self, type_name: &str) -> Result<TypeShape> {
        let mut shape = self.shape_of(type_name, type_name)?;
        let mut ancestors: Vec<TypeShape> = Vec::new();
        let mut next = shape.parent.clone();
        while let Some(parent) = next {
            if parent == type_name || ancestors.iter().any(|a| a.name == parent) {
                return Err(Error::UnsupportedType {
                    type_name: type_name.to_string(),
                    message: format!("inheritance cycle through {}", parent),
                });
            }
            let ancestor = self.shape_of(&parent, type_name)?;
            next = ancestor.parent.clone();
            ancestors.push(ancestor);
        }
        if ancestors.is_empty() {
            return Ok(shape);
        }

        let mut properties = Vec::new();
        for ancestor in ancestors.into_iter().rev() {
            merge_properties(&mut properties, ancestor.properties);
        }
        merge_properties(&mut properties, std::mem::take(&mut shape.properties));
        shape.properties = properties;
        Ok(shape)
    }

    fn shape_of(&self, name: &str, requested: &str) -> Result<TypeShape> {
        self.provider.shape_of(name).ok_or_else(|| Error::UnsupportedType {
            type_name: requested.to_string(),
            message: if name == requested {
                "unknown to the metadata provider".to_string()
            } else {
                format!("supertype {} is unknown to the metadata provider", name)
            },
        })
    }

    /// Number of descriptors computed so far
    pub fn cached_types(&self) -> usize {
        self.cache.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_cached(&self, type_name: &str) -> bool {
        self.cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(type_name)
    }

    pub fn provider(&self) -> &Arc<dyn MetadataProvider> {
        &self.provider
    }
}

impl std::fmt::Debug for TypeInspector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeInspector")
            .field("cached_types", &self.cached_types())
            .finish()
    }
}

fn merge_properties(target: &mut Vec<PropertyShape>, properties: Vec<PropertyShape>) {
    for property in properties {
        match target.iter_mut().find(|p| p.name == property.name) {
            Some(existing) => *existing = property,
            None => target.push(property),
        }
    }
}

fn build_descriptor(shape: TypeShape) -> Result<TypeDescriptor> {
    if shape.properties.is_empty() && shape.constructors.is_empty() {
        return Err(Error::UnsupportedType {
            type_name: shape.name,
            message: "no accessible fields and no constructor".to_string(),
        });
    }

    let mut fields = Vec::with_capacity(shape.properties.len());
    for property in shape.properties {
        let initial = match &property.initializer {
            Some(json) => Some(Value::from_json(json, &property.ty).map_err(|e| {
                Error::UnsupportedType {
                    type_name: shape.name.clone(),
                    message: format!("invalid initializer for '{}': {}", property.name, e),
                }
            })?),
            None => None,
        };
        fields.push(FieldDescriptor {
            composite: property.ty.is_composite(),
            readable: property.has_field || property.has_accessor,
            writable: property.has_mutator && !property.read_only,
            field_access: property.has_field && !property.read_only,
            read_only: property.read_only,
            initial,
            constraints: property.constraints,
            ty: property.ty,
            name: property.name,
        });
    }

    let has_default = shape.constructors.iter().any(ConstructorShape::is_default);
    let class_type = if shape.value_type || !has_default {
        ClassType::Immutable
    } else {
        ClassType::Mutable
    };

    let value_constructor = match class_type {
        ClassType::Immutable => select_value_constructor(&fields, &shape.constructors),
        ClassType::Mutable => None,
    };

    Ok(TypeDescriptor {
        name: shape.name,
        fields,
        constructors: shape.constructors,
        class_type,
        value_constructor,
    })
}

/// Widest constructor whose parameter names all name fields and which covers
/// every field the default constructor cannot initialize
fn select_value_constructor(
    fields: &[FieldDescriptor],
    constructors: &[ConstructorShape],
) -> Option<ConstructorShape> {
    constructors
        .iter()
        .filter(|constructor| {
            let names_fields = constructor
                .params
                .iter()
                .all(|param| fields.iter().any(|f| f.name == param.name));
            let covers_required = fields
                .iter()
                .filter(|f| !f.is_defaultable())
                .all(|f| constructor.params.iter().any(|p| p.name == f.name));
            names_fields && covers_required
        })
        .max_by_key(|constructor| constructor.params.len())
        .cloned()
}
