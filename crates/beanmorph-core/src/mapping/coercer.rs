//! Scalar value coercion
//!
//! Converts one source value into the shape a destination slot requires:
//! identity for compatible values, numeric widening, checked big-integer
//! narrowing, optional wrapping/unwrapping and zero-value injection.
//!
//! Copyright (c) 2025 Beanmorph Team
//! Licensed under the Apache-2.0 license

use crate::types::{ScalarKind, TypeRef, Value};
use crate::{Error, Result};

/// Stateless coercer for scalar slots
#[derive(Debug, Clone, Copy, Default)]
pub struct ValueCoercer;

impl ValueCoercer {
    pub fn new() -> Self {
        Self
    }

    /// Coerce `value` into a slot of type `target`
    ///
    /// A null (or absent optional) going into a primitive slot becomes the
    /// zero value when `inject_defaults` is set and stays null otherwise,
    /// leaving the caller to keep whatever the slot already holds.
    pub fn coerce(&self, value: Value, target: &TypeRef, path: &str, inject_defaults: bool) -> Result<Value> {
        if let TypeRef::Any = target {
            return Ok(value);
        }

        if let TypeRef::Optional(inner) = target {
            let content = match value {
                Value::Null | Value::Optional(None) => return Ok(Value::none()),
                Value::Optional(Some(inner_value)) => *inner_value,
                other => other,
            };
            let coerced = self.coerce(content, inner, path, inject_defaults)?;
            return Ok(if coerced.is_null() {
                Value::none()
            } else {
                Value::some(coerced)
            });
        }

        let value = match value {
            Value::Optional(Some(inner)) => *inner,
            Value::Optional(None) => Value::Null,
            other => other,
        };

        if value.is_null() {
            return Ok(match target {
                TypeRef::Primitive(kind) if inject_defaults => kind.zero(),
                _ => Value::Null,
            });
        }

        let mismatch = |value: &Value| Error::TypeMismatch {
            path: path.to_string(),
            from: value.type_label(),
            to: target.to_string(),
        };

        match target {
            TypeRef::Primitive(kind) | TypeRef::Boxed(kind) => {
                coerce_scalar(&value, *kind).ok_or_else(|| mismatch(&value))
            }
            TypeRef::BigInteger => match value {
                Value::Char(_) => Err(mismatch(&value)),
                _ => value
                    .as_integer()
                    .map(Value::BigInteger)
                    .ok_or_else(|| mismatch(&value)),
            },
            TypeRef::String => match value {
                Value::String(_) => Ok(value),
                _ => Err(mismatch(&value)),
            },
            TypeRef::Timestamp => match value {
                Value::Timestamp(_) => Ok(value),
                _ => Err(mismatch(&value)),
            },
            TypeRef::Enum(type_name) => match value {
                Value::Enum { variant, .. } | Value::String(variant) => Ok(Value::Enum {
                    type_name: type_name.clone(),
                    variant,
                }),
                _ => Err(mismatch(&value)),
            },
            // Composite slots are never coerced; the object mapper handles them.
            TypeRef::Seq(_) | TypeRef::Map(_, _) | TypeRef::Object(_) => Err(mismatch(&value)),
            TypeRef::Any | TypeRef::Optional(_) => Ok(value),
        }
    }
}

/// Widening rank of an integral or char source
fn integral_rank(value: &Value) -> Option<u8> {
    match value {
        Value::Byte(_) => Some(1),
        Value::Short(_) | Value::Char(_) => Some(2),
        Value::Int(_) => Some(3),
        Value::Long(_) => Some(4),
        _ => None,
    }
}

fn integral_value(value: &Value) -> Option<i128> {
    match value {
        Value::Char(c) => Some(i128::from(u32::from(*c))),
        other => other.as_integer(),
    }
}

fn coerce_scalar(value: &Value, kind: ScalarKind) -> Option<Value> {
    match kind {
        ScalarKind::Bool => value.as_bool().map(Value::Bool),
        ScalarKind::Char => match value {
            Value::Char(c) => Some(Value::Char(*c)),
            _ => None,
        },
        ScalarKind::Byte | ScalarKind::Short | ScalarKind::Int | ScalarKind::Long => {
            let target_rank = match kind {
                ScalarKind::Byte => 1,
                ScalarKind::Short => 2,
                ScalarKind::Int => 3,
                _ => 4,
            };
            let raw = match value {
                // explicit narrowing, refused when out of range
                Value::BigInteger(v) => *v,
                // a char only widens to int and long
                Value::Char(_) if target_rank < 3 => return None,
                other if integral_rank(other)? <= target_rank => integral_value(other)?,
                _ => return None,
            };
            match kind {
                ScalarKind::Byte => i8::try_from(raw).ok().map(Value::Byte),
                ScalarKind::Short => i16::try_from(raw).ok().map(Value::Short),
                ScalarKind::Int => i32::try_from(raw).ok().map(Value::Int),
                _ => i64::try_from(raw).ok().map(Value::Long),
            }
        }
        ScalarKind::Float => match value {
            Value::Float(v) => Some(Value::Float(*v)),
            other => integral_rank(other)
                .and_then(|_| integral_value(other))
                .map(|v| Value::Float(v as f32)),
        },
        ScalarKind::Double => match value {
            Value::Double(v) => Some(Value::Double(*v)),
            Value::Float(v) => Some(Value::Double(f64::from(*v))),
            other => integral_rank(other)
                .and_then(|_| integral_value(other))
                .map(|v| Value::Double(v as f64)),
        },
    }
}
