//! Object mapper: the per-field decision procedure
//!
//! For every destination field the mapper decides, in this order:
//!
//! 1. skipped fields are left at their destination-side default;
//! 2. a registered field transformer supplies or derives the value;
//! 3. otherwise the same-named (or mapped) source field is copied, recursing
//!    into nested objects and containers and coercing scalars.
//!
//! Immutable destinations are then built with one constructor call, mutable
//! ones by applying the resolved values to a default-constructed (or
//! caller-supplied) instance. The result is validated when enabled.
//!
//! Copyright (c) 2025 Beanmorph Team
//! Licensed under the Apache-2.0 license

use crate::inspector::{ClassType, FieldDescriptor, TypeDescriptor, TypeInspector};
use crate::metadata::ConstructorShape;
use crate::types::{Instance, ObjectRef, TypeRef, Value};
use crate::validation::BeanValidator;
use crate::{Error, Result};
use super::coercer::ValueCoercer;
use super::container::{ContainerMapper, ElementMapper};
use super::context::{child_path, MappingContext, TransformPhase};
use super::registry::TransformationRegistry;
use tracing::{trace, warn};

/// Where the mapped values end up
#[derive(Debug)]
pub enum Destination {
    /// Build a new instance of the named type
    Type(String),
    /// Update a copy of an existing instance
    Existing(Instance),
}

impl Destination {
    pub fn type_name(&self) -> &str {
        match self {
            Destination::Type(name) => name,
            Destination::Existing(instance) => instance.type_name(),
        }
    }
}

/// Outcome of resolving one destination field
#[derive(Debug, Clone, PartialEq)]
enum Resolution {
    /// Leave the destination-side value alone
    Untouched,
    Assign(Value),
}

/// Mapping engine borrowing the transformer's configuration for one call
pub struct ObjectMapper<'a> {
    inspector: &'a TypeInspector,
    registry: &'a TransformationRegistry,
    validator: &'a dyn BeanValidator,
    coercer: ValueCoercer,
}

impl<'a> ObjectMapper<'a> {
    pub fn new(
        inspector: &'a TypeInspector,
        registry: &'a TransformationRegistry,
        validator: &'a dyn BeanValidator,
    ) -> Self {
        Self {
            inspector,
            registry,
            validator,
            coercer: ValueCoercer::new(),
        }
    }

    /// Map one source object into a destination, guarding against cycles
    pub fn map_object(
        &self,
        source: &ObjectRef,
        destination: Destination,
        path: &str,
        context: &mut MappingContext,
    ) -> Result<Instance> {
        let source_id = source.id();
        let destination_type = destination.type_name().to_string();

        if !context.enter(source_id, &destination_type) {
            return Err(Error::CyclicGraph {
                path: path.to_string(),
                type_name: source.type_name(),
                destination: destination_type,
            });
        }

        let result = self.map_object_inner(source, destination, path, context);
        context.leave(source_id, &destination_type);
        result
    }

    fn map_object_inner(
        &self,
        source: &ObjectRef,
        destination: Destination,
        path: &str,
        context: &mut MappingContext,
    ) -> Result<Instance> {
        context.set_phase(TransformPhase::DescribeTypes, path);
        // A shallow snapshot: no lock is held while nested objects are mapped.
        let source = source.snapshot();
        let source_descriptor = self.inspector.describe(source.type_name())?;
        let destination_descriptor = self.inspector.describe(destination.type_name())?;

        let (base, constructor) = match destination {
            Destination::Type(_) => match destination_descriptor.class_type {
                ClassType::Mutable => (destination_descriptor.default_instance(), None),
                ClassType::Immutable => {
                    let constructor = destination_descriptor
                        .value_constructor
                        .clone()
                        .ok_or_else(|| {
                            Error::invalid_bean(
                                destination_descriptor.name.clone(),
                                "no default constructor and no constructor matching its fields",
                            )
                        })?;
                    (destination_descriptor.default_instance(), Some(constructor))
                }
            },
            Destination::Existing(instance) => {
                if destination_descriptor.is_immutable() {
                    return Err(Error::invalid_bean(
                        destination_descriptor.name.clone(),
                        "an existing instance can only be updated when the type is mutable",
                    ));
                }
                (instance, None)
            }
        };

        context.set_phase(TransformPhase::ResolveFields, path);
        let mut resolved = Vec::with_capacity(destination_descriptor.fields.len());
        for field in &destination_descriptor.fields {
            let field_path = child_path(path, &field.name);
            let resolution = self.resolve_field(&source, &source_descriptor, field, &field_path, context)?;
            resolved.push(resolution);
        }

        context.set_phase(TransformPhase::Construct, path);
        let instance = match constructor {
            Some(constructor) => self.construct(&destination_descriptor, &constructor, base, &resolved, path, context)?,
            None => self.apply(&destination_descriptor, base, resolved, path)?,
        };

        if self.registry.settings().validation_enabled {
            context.set_phase(TransformPhase::Validate, path);
            let violations = self.validator.validate(&instance, &destination_descriptor);
            if !violations.is_empty() {
                warn!(
                    destination = %destination_descriptor.name,
                    path,
                    violations = violations.len(),
                    "destination bean failed validation"
                );
                return Err(Error::InvalidBean {
                    type_name: destination_descriptor.name.clone(),
                    message: "constraint violations".to_string(),
                    violations: violations.iter().map(ToString::to_string).collect(),
                });
            }
        }

        context.set_phase(TransformPhase::Done, path);
        Ok(instance)
    }

    /// Decide the value of one destination field
    fn resolve_field(
        &self,
        source: &Instance,
        source_descriptor: &TypeDescriptor,
        field: &FieldDescriptor,
        path: &str,
        context: &mut MappingContext,
    ) -> Result<Resolution> {
        if self.registry.is_skipped(path) {
            trace!(path, "field skipped");
            return Ok(Resolution::Untouched);
        }

        let source_field = match self.registry.mapping_for(path) {
            Some(mapping) => {
                trace!(path, source = mapping.source_field(), "field mapped");
                mapping.source_field()
            }
            None => field.name.as_str(),
        };
        let source_value = read_source(source, source_descriptor, source_field);

        if let Some(transformer) = self.registry.transformer_for(path) {
            trace!(path, arity = transformer.arity(), "field transformer applied");
            let produced = transformer.apply(source_value.unwrap_or(Value::Null));
            let value = self.map_value(produced, &field.ty, path, false, context)?;
            return Ok(Resolution::Assign(value));
        }

        match source_value {
            None => {
                trace!(path, "no source counterpart");
                Ok(Resolution::Untouched)
            }
            Some(value) => {
                trace!(path, composite = field.composite, "field copied");
                let inject_defaults = self.registry.settings().default_value_set_enabled;
                let value = self.map_value(value, &field.ty, path, inject_defaults, context)?;
                Ok(Resolution::Assign(value))
            }
        }
    }

    /// Route a value to the object mapper, the container mapper or the coercer
    pub fn map_value(
        &self,
        value: Value,
        target: &TypeRef,
        path: &str,
        inject_defaults: bool,
        context: &mut MappingContext,
    ) -> Result<Value> {
        let mismatch = |value: &Value| Error::TypeMismatch {
            path: path.to_string(),
            from: value.type_label(),
            to: target.to_string(),
        };

        if !target.is_composite() {
            return self.coercer.coerce(value, target, path, inject_defaults);
        }

        let value = match target {
            TypeRef::Optional(_) => value,
            _ => match value {
                Value::Optional(Some(inner)) => *inner,
                Value::Optional(None) => Value::Null,
                other => other,
            },
        };

        match target {
            TypeRef::Object(type_name) => match value {
                Value::Null => Ok(Value::Null),
                Value::Object(object) => {
                    let instance = self.map_object(
                        &object,
                        Destination::Type(type_name.clone()),
                        path,
                        context,
                    )?;
                    Ok(Value::from(instance))
                }
                other => Err(mismatch(&other)),
            },
            TypeRef::Seq(element) => match value {
                Value::Null => Ok(Value::Null),
                Value::Seq(items) => {
                    ContainerMapper::map_sequence(self, items, element, path, context)
                }
                other => Err(mismatch(&other)),
            },
            TypeRef::Map(key, entry) => match value {
                Value::Null => Ok(Value::Null),
                Value::Map(entries) => {
                    ContainerMapper::map_map(self, entries, key, entry, path, context)
                }
                other => Err(mismatch(&other)),
            },
            TypeRef::Optional(inner) => {
                let content = match value {
                    Value::Null | Value::Optional(None) => return Ok(Value::none()),
                    Value::Optional(Some(content)) => *content,
                    other => other,
                };
                let mapped = self.map_value(content, inner, path, inject_defaults, context)?;
                Ok(if mapped.is_null() { Value::none() } else { Value::some(mapped) })
            }
            _ => self.coercer.coerce(value, target, path, inject_defaults),
        }
    }

    /// Build an immutable destination with one constructor call
    fn construct(
        &self,
        descriptor: &TypeDescriptor,
        constructor: &ConstructorShape,
        mut instance: Instance,
        resolved: &[Resolution],
        path: &str,
        context: &mut MappingContext,
    ) -> Result<Instance> {
        let mut arguments = Vec::with_capacity(constructor.params.len());
        for param in &constructor.params {
            let position = descriptor
                .fields
                .iter()
                .position(|f| f.name == param.name)
                .ok_or_else(|| {
                    Error::invalid_bean(
                        descriptor.name.clone(),
                        format!("constructor parameter '{}' has no matching field", param.name),
                    )
                })?;
            let field = &descriptor.fields[position];

            let argument = match &resolved[position] {
                Resolution::Assign(value) if !value.is_null() || !param.ty.is_primitive() => {
                    if param.ty == field.ty {
                        value.clone()
                    } else {
                        let param_path = child_path(path, &param.name);
                        self.map_value(value.clone(), &param.ty, &param_path, true, context)?
                    }
                }
                _ => param.ty.zero_value(),
            };
            arguments.push((param.name.clone(), argument));
        }

        for (name, argument) in arguments {
            instance.set(name, argument);
        }
        Ok(instance)
    }

    /// Apply resolved values to a mutable instance in declaration order
    fn apply(
        &self,
        descriptor: &TypeDescriptor,
        mut instance: Instance,
        resolved: Vec<Resolution>,
        path: &str,
    ) -> Result<Instance> {
        for (field, resolution) in descriptor.fields.iter().zip(resolved) {
            let value = match resolution {
                Resolution::Untouched => continue,
                // nothing resolvable for a primitive: keep what the constructor left
                Resolution::Assign(value) if value.is_null() && field.ty.is_primitive() => continue,
                Resolution::Assign(value) => value,
            };

            if field.writable || field.field_access {
                instance.set(field.name.clone(), value);
                continue;
            }

            let current = instance
                .get(&field.name)
                .cloned()
                .unwrap_or_else(|| field.default_value());
            if current != value {
                return Err(Error::mapping(
                    child_path(path, &field.name),
                    format!(
                        "read-only property '{}' of {} cannot be assigned",
                        field.name, descriptor.name
                    ),
                ));
            }
        }
        Ok(instance)
    }
}

impl ElementMapper for ObjectMapper<'_> {
    fn map_element(
        &self,
        value: Value,
        target: &TypeRef,
        path: &str,
        inject_defaults: bool,
        context: &mut MappingContext,
    ) -> Result<Value> {
        self.map_value(value, target, path, inject_defaults, context)
    }
}

/// Value of a readable source property; dotted names walk nested objects
///
/// `None` means the source has no such property at all, as opposed to a
/// property holding null.
fn read_source(source: &Instance, descriptor: &TypeDescriptor, name: &str) -> Option<Value> {
    let (head, rest) = match name.split_once('.') {
        Some((head, rest)) => (head, Some(rest)),
        None => (name, None),
    };

    let field = descriptor.field(head).filter(|f| f.readable)?;
    let value = source.get(&field.name).cloned().unwrap_or(Value::Null);

    match rest {
        None => Some(value),
        Some(rest) => {
            let mut current = value;
            for segment in rest.split('.') {
                current = match current {
                    Value::Null | Value::Optional(None) => return Some(Value::Null),
                    Value::Optional(Some(inner)) => inner.get(segment)?,
                    other => other.get(segment)?,
                };
            }
            Some(current)
        }
    }
}
