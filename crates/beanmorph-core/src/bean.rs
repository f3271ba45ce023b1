//! Typed access to the object model
//!
//! [`Bean`] lets ordinary Rust structs take part in a transformation: they
//! describe their own shape, convert themselves into a [`Value`] and are
//! rebuilt from the mapped result through [`FromValue`].
//!
//! Copyright (c) 2025 Beanmorph Team
//! Licensed under the Apache-2.0 license

use crate::metadata::TypeShape;
use crate::types::{Instance, MapValue, Value};
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// Conversion out of a dynamically typed [`Value`]
pub trait FromValue: Sized {
    fn from_value(value: &Value) -> Result<Self>;
}

/// A Rust type with a registered shape
///
/// ```
/// use beanmorph_core::{Bean, FromValue, Instance, Result, TypeRef, TypeShape, TypeShapeBuilder, Value};
/// use beanmorph_core::bean::read_property;
///
/// struct Person {
///     name: String,
/// }
///
/// impl FromValue for Person {
///     fn from_value(value: &Value) -> Result<Self> {
///         Ok(Person { name: read_property(value, "name")? })
///     }
/// }
///
/// impl Bean for Person {
///     const TYPE_NAME: &'static str = "Person";
///
///     fn shape() -> TypeShape {
///         TypeShapeBuilder::new(Self::TYPE_NAME)
///             .property("name", TypeRef::String)
///             .default_constructor()
///             .build()
///             .expect("valid shape")
///     }
///
///     fn to_value(&self) -> Value {
///         Instance::new(Self::TYPE_NAME).with("name", self.name.as_str()).into_value()
///     }
/// }
/// ```
pub trait Bean: FromValue {
    const TYPE_NAME: &'static str;

    fn shape() -> TypeShape;

    fn to_value(&self) -> Value;
}

/// Read and convert one property of an object value
pub fn read_property<T: FromValue>(value: &Value, name: &str) -> Result<T> {
    let object = value.as_object().ok_or_else(|| Error::TypeMismatch {
        path: name.to_string(),
        from: value.type_label(),
        to: "object".to_string(),
    })?;
    let property = object.read().get(name).cloned().unwrap_or(Value::Null);
    T::from_value(&property).map_err(|err| match err {
        Error::TypeMismatch { path, from, to } if path.is_empty() => Error::TypeMismatch {
            path: name.to_string(),
            from,
            to,
        },
        other => other,
    })
}

fn mismatch(value: &Value, to: &str) -> Error {
    Error::TypeMismatch {
        path: String::new(),
        from: value.type_label(),
        to: to.to_string(),
    }
}

/// Present optionals are read as their content
fn unwrap_optional(value: &Value) -> &Value {
    match value {
        Value::Optional(Some(inner)) => inner,
        other => other,
    }
}

macro_rules! integral_from_value {
    ($($ty:ty => $label:literal),* $(,)?) => {
        $(
            impl FromValue for $ty {
                fn from_value(value: &Value) -> Result<Self> {
                    let value = unwrap_optional(value);
                    value
                        .as_integer()
                        .and_then(|v| <$ty>::try_from(v).ok())
                        .ok_or_else(|| mismatch(value, $label))
                }
            }
        )*
    };
}

integral_from_value! {
    i8 => "byte",
    i16 => "short",
    i32 => "int",
    i64 => "long",
    i128 => "BigInteger",
}

impl FromValue for f64 {
    fn from_value(value: &Value) -> Result<Self> {
        let value = unwrap_optional(value);
        value.as_f64().ok_or_else(|| mismatch(value, "double"))
    }
}

impl FromValue for f32 {
    fn from_value(value: &Value) -> Result<Self> {
        match unwrap_optional(value) {
            Value::Float(v) => Ok(*v),
            other => other
                .as_integer()
                .map(|v| v as f32)
                .ok_or_else(|| mismatch(other, "float")),
        }
    }
}

impl FromValue for bool {
    fn from_value(value: &Value) -> Result<Self> {
        let value = unwrap_optional(value);
        value.as_bool().ok_or_else(|| mismatch(value, "boolean"))
    }
}

impl FromValue for char {
    fn from_value(value: &Value) -> Result<Self> {
        match unwrap_optional(value) {
            Value::Char(c) => Ok(*c),
            other => Err(mismatch(other, "char")),
        }
    }
}

impl FromValue for String {
    fn from_value(value: &Value) -> Result<Self> {
        match unwrap_optional(value) {
            Value::String(s) => Ok(s.clone()),
            Value::Enum { variant, .. } => Ok(variant.clone()),
            other => Err(mismatch(other, "String")),
        }
    }
}

impl FromValue for DateTime<Utc> {
    fn from_value(value: &Value) -> Result<Self> {
        match unwrap_optional(value) {
            Value::Timestamp(ts) => Ok(*ts),
            other => Err(mismatch(other, "Timestamp")),
        }
    }
}

impl FromValue for Value {
    fn from_value(value: &Value) -> Result<Self> {
        Ok(value.clone())
    }
}

impl FromValue for Instance {
    fn from_value(value: &Value) -> Result<Self> {
        match unwrap_optional(value) {
            Value::Object(object) => Ok(object.snapshot()),
            other => Err(mismatch(other, "object")),
        }
    }
}

/// Null and absent optionals read as `None`
impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: &Value) -> Result<Self> {
        if value.is_absent() {
            Ok(None)
        } else {
            T::from_value(unwrap_optional(value)).map(Some)
        }
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(value: &Value) -> Result<Self> {
        match unwrap_optional(value) {
            Value::Seq(items) => items.iter().map(T::from_value).collect(),
            other => Err(mismatch(other, "List")),
        }
    }
}

impl<T: FromValue> FromValue for BTreeMap<String, T> {
    fn from_value(value: &Value) -> Result<Self> {
        match unwrap_optional(value) {
            Value::Map(map) => map
                .iter()
                .map(|(key, value)| Ok((String::from_value(key)?, T::from_value(value)?)))
                .collect(),
            other => Err(mismatch(other, "Map")),
        }
    }
}

impl<T: Into<Value>> From<BTreeMap<String, T>> for Value {
    fn from(map: BTreeMap<String, T>) -> Self {
        Value::Map(map.into_iter().collect::<MapValue>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integral_narrowing_is_checked() {
        assert_eq!(i32::from_value(&Value::Long(12)).unwrap(), 12);
        assert!(i8::from_value(&Value::Int(300)).is_err());
        assert_eq!(i128::from_value(&Value::BigInteger(1234)).unwrap(), 1234);
    }

    #[test]
    fn test_option_reads_null_and_optionals() {
        assert_eq!(Option::<String>::from_value(&Value::Null).unwrap(), None);
        assert_eq!(Option::<String>::from_value(&Value::none()).unwrap(), None);
        assert_eq!(
            Option::<String>::from_value(&Value::some("Goofy")).unwrap(),
            Some("Goofy".to_string())
        );
    }

    #[test]
    fn test_collections() {
        let list: Vec<i32> = FromValue::from_value(&Value::from(vec![1, 2, 3])).unwrap();
        assert_eq!(list, vec![1, 2, 3]);

        let mut source = BTreeMap::new();
        source.insert("donald".to_string(), "duck".to_string());
        let map: BTreeMap<String, String> = FromValue::from_value(&Value::from(source.clone())).unwrap();
        assert_eq!(map, source);
    }

    #[test]
    fn test_read_property_reports_path() {
        let value = Instance::new("Foo").with("age", "old").into_value();
        let err = read_property::<i32>(&value, "age").unwrap_err();
        match err {
            Error::TypeMismatch { path, .. } => assert_eq!(path, "age"),
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(read_property::<Option<String>>(&value, "missing").unwrap(), None);
    }
}
