//! Core type definitions for Beanmorph
//!
//! This module contains the in-memory object model the engine operates on:
//! dynamically typed [`Value`]s, object [`Instance`]s shared through
//! [`ObjectRef`] handles, and the declared [`TypeRef`] of every field slot.
//!
//! Copyright (c) 2025 Beanmorph Team
//! Licensed under the Apache-2.0 license

use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

// ============================================================================
// Declared types
// ============================================================================

/// Primitive scalar kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScalarKind {
    Bool,
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
    Char,
}

impl ScalarKind {
    /// The zero value a primitive slot of this kind holds by default
    pub fn zero(self) -> Value {
        match self {
            ScalarKind::Bool => Value::Bool(false),
            ScalarKind::Byte => Value::Byte(0),
            ScalarKind::Short => Value::Short(0),
            ScalarKind::Int => Value::Int(0),
            ScalarKind::Long => Value::Long(0),
            ScalarKind::Float => Value::Float(0.0),
            ScalarKind::Double => Value::Double(0.0),
            ScalarKind::Char => Value::Char('\0'),
        }
    }

    /// Whether the kind is an integral number
    pub fn is_integral(self) -> bool {
        matches!(
            self,
            ScalarKind::Byte | ScalarKind::Short | ScalarKind::Int | ScalarKind::Long
        )
    }

    fn primitive_name(self) -> &'static str {
        match self {
            ScalarKind::Bool => "boolean",
            ScalarKind::Byte => "byte",
            ScalarKind::Short => "short",
            ScalarKind::Int => "int",
            ScalarKind::Long => "long",
            ScalarKind::Float => "float",
            ScalarKind::Double => "double",
            ScalarKind::Char => "char",
        }
    }

    fn boxed_name(self) -> &'static str {
        match self {
            ScalarKind::Bool => "Boolean",
            ScalarKind::Byte => "Byte",
            ScalarKind::Short => "Short",
            ScalarKind::Int => "Integer",
            ScalarKind::Long => "Long",
            ScalarKind::Float => "Float",
            ScalarKind::Double => "Double",
            ScalarKind::Char => "Character",
        }
    }
}

/// Declared type of a field, constructor parameter or container element
///
/// Primitive slots always hold a value (their zero value when nothing else is
/// known); every other slot is nullable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeRef {
    /// Accepts any value unchanged
    Any,
    /// Non-nullable scalar
    Primitive(ScalarKind),
    /// Nullable scalar
    Boxed(ScalarKind),
    /// Arbitrary precision integer (bounded to 128 bits)
    BigInteger,
    String,
    Timestamp,
    /// Enumeration identified by its type name
    Enum(String),
    /// Optional wrapper around another type
    Optional(Box<TypeRef>),
    /// Ordered sequence
    Seq(Box<TypeRef>),
    /// Key to value map
    Map(Box<TypeRef>, Box<TypeRef>),
    /// Bean described by the metadata provider
    Object(String),
}

impl TypeRef {
    pub fn object(name: impl Into<String>) -> Self {
        TypeRef::Object(name.into())
    }

    pub fn seq(element: TypeRef) -> Self {
        TypeRef::Seq(Box::new(element))
    }

    pub fn map(key: TypeRef, value: TypeRef) -> Self {
        TypeRef::Map(Box::new(key), Box::new(value))
    }

    pub fn optional(inner: TypeRef) -> Self {
        TypeRef::Optional(Box::new(inner))
    }

    pub fn is_primitive(&self) -> bool {
        matches!(self, TypeRef::Primitive(_))
    }

    /// Composite slots are mapped recursively instead of being coerced
    pub fn is_composite(&self) -> bool {
        match self {
            TypeRef::Object(_) | TypeRef::Seq(_) | TypeRef::Map(_, _) => true,
            TypeRef::Optional(inner) => inner.is_composite(),
            _ => false,
        }
    }

    /// Zero/null value for this slot: primitives get their zero, optionals are empty
    pub fn zero_value(&self) -> Value {
        match self {
            TypeRef::Primitive(kind) => kind.zero(),
            TypeRef::Optional(_) => Value::Optional(None),
            _ => Value::Null,
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Any => write!(f, "Any"),
            TypeRef::Primitive(kind) => write!(f, "{}", kind.primitive_name()),
            TypeRef::Boxed(kind) => write!(f, "{}", kind.boxed_name()),
            TypeRef::BigInteger => write!(f, "BigInteger"),
            TypeRef::String => write!(f, "String"),
            TypeRef::Timestamp => write!(f, "Timestamp"),
            TypeRef::Enum(name) | TypeRef::Object(name) => write!(f, "{}", name),
            TypeRef::Optional(inner) => write!(f, "Optional<{}>", inner),
            TypeRef::Seq(element) => write!(f, "List<{}>", element),
            TypeRef::Map(key, value) => write!(f, "Map<{}, {}>", key, value),
        }
    }
}

// ============================================================================
// Runtime values
// ============================================================================

/// A live value inside an object graph
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Char(char),
    BigInteger(i128),
    String(String),
    Timestamp(DateTime<Utc>),
    Enum { type_name: String, variant: String },
    /// Present or absent optional
    Optional(Option<Box<Value>>),
    Seq(Vec<Value>),
    Map(MapValue),
    Object(ObjectRef),
}

impl Value {
    /// Shorthand for a present optional
    pub fn some(value: impl Into<Value>) -> Self {
        Value::Optional(Some(Box::new(value.into())))
    }

    /// Shorthand for an absent optional
    pub fn none() -> Self {
        Value::Optional(None)
    }

    pub fn enumeration(type_name: impl Into<String>, variant: impl Into<String>) -> Self {
        Value::Enum {
            type_name: type_name.into(),
            variant: variant.into(),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Null or an absent optional
    pub fn is_absent(&self) -> bool {
        matches!(self, Value::Null | Value::Optional(None))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Integral value widened to i128, if this is any integral number
    pub fn as_integer(&self) -> Option<i128> {
        match self {
            Value::Byte(v) => Some(i128::from(*v)),
            Value::Short(v) => Some(i128::from(*v)),
            Value::Int(v) => Some(i128::from(*v)),
            Value::Long(v) => Some(i128::from(*v)),
            Value::BigInteger(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(f64::from(*v)),
            Value::Double(v) => Some(*v),
            other => other.as_integer().map(|v| v as f64),
        }
    }

    pub fn as_seq(&self) -> Option<&[Value]> {
        match self {
            Value::Seq(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&MapValue> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Value::Object(object) => Some(object),
            _ => None,
        }
    }

    /// Property of an object value, cloned out of the shared instance
    pub fn get(&self, property: &str) -> Option<Value> {
        self.as_object()
            .and_then(|object| object.read().get(property).cloned())
    }

    /// Property reached through a dotted path such as `nestedObject.name`
    pub fn get_path(&self, path: &str) -> Option<Value> {
        let mut current = self.clone();
        for segment in path.split('.') {
            current = current.get(segment)?;
        }
        Some(current)
    }

    /// Human readable name of the runtime type, used in error messages
    pub fn type_label(&self) -> String {
        match self {
            Value::Null => "null".to_string(),
            Value::Bool(_) => "boolean".to_string(),
            Value::Byte(_) => "byte".to_string(),
            Value::Short(_) => "short".to_string(),
            Value::Int(_) => "int".to_string(),
            Value::Long(_) => "long".to_string(),
            Value::Float(_) => "float".to_string(),
            Value::Double(_) => "double".to_string(),
            Value::Char(_) => "char".to_string(),
            Value::BigInteger(_) => "BigInteger".to_string(),
            Value::String(_) => "String".to_string(),
            Value::Timestamp(_) => "Timestamp".to_string(),
            Value::Enum { type_name, .. } => type_name.clone(),
            Value::Optional(_) => "Optional".to_string(),
            Value::Seq(_) => "List".to_string(),
            Value::Map(_) => "Map".to_string(),
            Value::Object(object) => object.type_name(),
        }
    }

    /// Render the value as JSON; back-references are rendered as `"#ref:<Type>"`
    pub fn to_json(&self) -> serde_json::Value {
        let mut active = Vec::new();
        self.to_json_inner(&mut active)
    }

    fn to_json_inner(&self, active: &mut Vec<usize>) -> serde_json::Value {
        use serde_json::Value as Json;
        match self {
            Value::Null | Value::Optional(None) => Json::Null,
            Value::Bool(b) => Json::Bool(*b),
            Value::Byte(v) => Json::from(*v),
            Value::Short(v) => Json::from(*v),
            Value::Int(v) => Json::from(*v),
            Value::Long(v) => Json::from(*v),
            Value::Float(v) => serde_json::Number::from_f64(f64::from(*v))
                .map(Json::Number)
                .unwrap_or(Json::Null),
            Value::Double(v) => serde_json::Number::from_f64(*v)
                .map(Json::Number)
                .unwrap_or(Json::Null),
            Value::Char(c) => Json::String(c.to_string()),
            Value::BigInteger(v) => match i64::try_from(*v) {
                Ok(small) => Json::from(small),
                Err(_) => Json::String(v.to_string()),
            },
            Value::String(s) => Json::String(s.clone()),
            Value::Timestamp(ts) => Json::String(ts.to_rfc3339()),
            Value::Enum { variant, .. } => Json::String(variant.clone()),
            Value::Optional(Some(inner)) => inner.to_json_inner(active),
            Value::Seq(items) => Json::Array(items.iter().map(|v| v.to_json_inner(active)).collect()),
            Value::Map(map) => {
                let mut object = serde_json::Map::new();
                for (key, value) in map.iter() {
                    let key = match key {
                        Value::String(s) => s.clone(),
                        other => other.to_json_inner(active).to_string(),
                    };
                    object.insert(key, value.to_json_inner(active));
                }
                Json::Object(object)
            }
            Value::Object(object) => {
                let id = object.id();
                if active.contains(&id) {
                    return Json::String(format!("#ref:{}", object.type_name()));
                }
                active.push(id);
                let instance = object.snapshot();
                let mut fields = serde_json::Map::new();
                for (name, value) in instance.properties() {
                    fields.insert(name.clone(), value.to_json_inner(active));
                }
                active.pop();
                Json::Object(fields)
            }
        }
    }

    /// Build a value of the declared type from JSON
    ///
    /// Object types are not supported here since their shape lives in the
    /// metadata provider; use the transformer to build beans.
    pub fn from_json(json: &serde_json::Value, ty: &TypeRef) -> Result<Value> {
        use serde_json::Value as Json;
        let mismatch = || Error::TypeMismatch {
            path: String::new(),
            from: json_label(json).to_string(),
            to: ty.to_string(),
        };

        if json.is_null() {
            return Ok(ty.zero_value());
        }

        match ty {
            TypeRef::Any => Ok(match json {
                Json::Null => Value::Null,
                Json::Bool(b) => Value::Bool(*b),
                Json::Number(n) => match n.as_i64() {
                    Some(i) => Value::Long(i),
                    None => Value::Double(n.as_f64().unwrap_or_default()),
                },
                Json::String(s) => Value::String(s.clone()),
                Json::Array(items) => Value::Seq(
                    items
                        .iter()
                        .map(|item| Value::from_json(item, &TypeRef::Any))
                        .collect::<Result<_>>()?,
                ),
                Json::Object(fields) => {
                    let mut map = MapValue::new();
                    for (key, value) in fields {
                        map.insert(Value::String(key.clone()), Value::from_json(value, &TypeRef::Any)?);
                    }
                    Value::Map(map)
                }
            }),
            TypeRef::Primitive(kind) | TypeRef::Boxed(kind) => {
                scalar_from_json(json, *kind).ok_or_else(mismatch)
            }
            TypeRef::BigInteger => match json {
                Json::Number(n) => n
                    .as_i64()
                    .map(i128::from)
                    .or_else(|| n.as_u64().map(i128::from))
                    .map(Value::BigInteger)
                    .ok_or_else(mismatch),
                Json::String(s) => s.parse::<i128>().map(Value::BigInteger).map_err(|_| mismatch()),
                _ => Err(mismatch()),
            },
            TypeRef::String => json
                .as_str()
                .map(|s| Value::String(s.to_string()))
                .ok_or_else(mismatch),
            TypeRef::Timestamp => json
                .as_str()
                .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
                .map(|ts| Value::Timestamp(ts.with_timezone(&Utc)))
                .ok_or_else(mismatch),
            TypeRef::Enum(name) => json
                .as_str()
                .map(|s| Value::enumeration(name.clone(), s))
                .ok_or_else(mismatch),
            TypeRef::Optional(inner) => Ok(Value::some(Value::from_json(json, inner)?)),
            TypeRef::Seq(element) => match json {
                Json::Array(items) => Ok(Value::Seq(
                    items
                        .iter()
                        .map(|item| Value::from_json(item, element))
                        .collect::<Result<_>>()?,
                )),
                _ => Err(mismatch()),
            },
            TypeRef::Map(key_ty, value_ty) => match json {
                Json::Object(fields) => {
                    let mut map = MapValue::new();
                    for (key, value) in fields {
                        let key = match key_ty.as_ref() {
                            TypeRef::String | TypeRef::Any => Value::String(key.clone()),
                            other => {
                                let parsed: Json = serde_json::from_str(key)
                                    .unwrap_or_else(|_| Json::String(key.clone()));
                                Value::from_json(&parsed, other)?
                            }
                        };
                        map.insert(key, Value::from_json(value, value_ty)?);
                    }
                    Ok(Value::Map(map))
                }
                _ => Err(mismatch()),
            },
            TypeRef::Object(name) => Err(Error::UnsupportedType {
                type_name: name.clone(),
                message: "objects cannot be built directly from JSON".to_string(),
            }),
        }
    }
}

fn json_label(json: &serde_json::Value) -> &'static str {
    match json {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

fn scalar_from_json(json: &serde_json::Value, kind: ScalarKind) -> Option<Value> {
    match kind {
        ScalarKind::Bool => json.as_bool().map(Value::Bool),
        ScalarKind::Byte => json.as_i64().and_then(|v| i8::try_from(v).ok()).map(Value::Byte),
        ScalarKind::Short => json.as_i64().and_then(|v| i16::try_from(v).ok()).map(Value::Short),
        ScalarKind::Int => json.as_i64().and_then(|v| i32::try_from(v).ok()).map(Value::Int),
        ScalarKind::Long => json.as_i64().map(Value::Long),
        ScalarKind::Float => json.as_f64().map(|v| Value::Float(v as f32)),
        ScalarKind::Double => json.as_f64().map(Value::Double),
        ScalarKind::Char => {
            let s = json.as_str()?;
            let mut chars = s.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Some(Value::Char(c)),
                _ => None,
            }
        }
    }
}

// Conversions from plain Rust values
macro_rules! value_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v)
                }
            }
        )*
    };
}

value_from! {
    bool => Bool,
    i8 => Byte,
    i16 => Short,
    i32 => Int,
    i64 => Long,
    f32 => Float,
    f64 => Double,
    char => Char,
    i128 => BigInteger,
    String => String,
    DateTime<Utc> => Timestamp,
    MapValue => Map,
    ObjectRef => Object,
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<Instance> for Value {
    fn from(instance: Instance) -> Self {
        Value::Object(ObjectRef::new(instance))
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Seq(items.into_iter().map(Into::into).collect())
    }
}

/// `None` becomes a plain null; use [`Value::none`] for an absent optional
impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

// ============================================================================
// Maps
// ============================================================================

/// Insertion-ordered map with arbitrary value keys
///
/// String keys are looked up through a hash index; other keys are found by a
/// linear scan, so maps keyed by numbers or objects cost O(n) per lookup.
/// Equality ignores entry order.
#[derive(Debug, Clone, Default)]
pub struct MapValue {
    entries: Vec<(Value, Value)>,
    /// Position of every string key in `entries`
    index: HashMap<String, usize>,
}

impl MapValue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            index: HashMap::new(),
        }
    }

    /// Insert or replace an entry; replacing keeps the original position
    pub fn insert(&mut self, key: impl Into<Value>, value: impl Into<Value>) -> Option<Value> {
        let key = key.into();
        let value = value.into();
        match self.position(&key) {
            Some(position) => Some(std::mem::replace(&mut self.entries[position].1, value)),
            None => {
                self.push(key, value);
                None
            }
        }
    }

    /// Append an entry without looking for an equal key
    ///
    /// Used for object keys, which are distinct by identity even when their
    /// properties are equal. Lookups by such a key find the first entry.
    pub fn push(&mut self, key: impl Into<Value>, value: impl Into<Value>) {
        let key = key.into();
        if let Value::String(s) = &key {
            self.index.entry(s.clone()).or_insert(self.entries.len());
        }
        self.entries.push((key, value.into()));
    }

    pub fn get(&self, key: &Value) -> Option<&Value> {
        self.position(key).map(|position| &self.entries[position].1)
    }

    pub fn contains_key(&self, key: &Value) -> bool {
        self.position(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Value, &Value)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|(k, _)| k)
    }

    fn position(&self, key: &Value) -> Option<usize> {
        match key {
            Value::String(s) => self.index.get(s).copied(),
            _ => self.entries.iter().position(|(k, _)| k == key),
        }
    }
}

impl PartialEq for MapValue {
    fn eq(&self, other: &Self) -> bool {
        if self.len() != other.len() {
            return false;
        }
        // each entry must pair with a distinct entry of `other`
        let mut matched = vec![false; other.len()];
        self.entries.iter().all(|(key, value)| {
            let indexed = match key {
                Value::String(s) => other
                    .index
                    .get(s)
                    .copied()
                    .filter(|&i| !matched[i] && other.entries[i].1 == *value),
                _ => None,
            };
            let candidate = indexed.or_else(|| {
                other
                    .entries
                    .iter()
                    .enumerate()
                    .position(|(i, (k, v))| !matched[i] && k == key && v == value)
            });
            match candidate {
                Some(i) => {
                    matched[i] = true;
                    true
                }
                None => false,
            }
        })
    }
}

impl<K: Into<Value>, V: Into<Value>> FromIterator<(K, V)> for MapValue {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = MapValue::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

// ============================================================================
// Objects
// ============================================================================

/// Property values of one bean
#[derive(Debug, Clone, PartialEq)]
pub struct Instance {
    type_name: String,
    properties: BTreeMap<String, Value>,
}

impl Instance {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            properties: BTreeMap::new(),
        }
    }

    /// Builder style property setter
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.properties.insert(name.into(), value.into())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.properties.contains_key(name)
    }

    pub fn properties(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.properties.iter()
    }

    /// Wrap into a shared object value
    pub fn into_value(self) -> Value {
        Value::from(self)
    }
}

/// Shared handle to an [`Instance`]
///
/// The handle gives every object an identity, so a graph may contain the same
/// object twice or refer back to one of its ancestors.
#[derive(Clone)]
pub struct ObjectRef(Arc<RwLock<Instance>>);

impl ObjectRef {
    pub fn new(instance: Instance) -> Self {
        ObjectRef(Arc::new(RwLock::new(instance)))
    }

    pub fn read(&self) -> RwLockReadGuard<'_, Instance> {
        self.0.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn write(&self) -> RwLockWriteGuard<'_, Instance> {
        self.0.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Shallow copy of the instance; nested objects keep their identity
    pub fn snapshot(&self) -> Instance {
        self.read().clone()
    }

    /// Replace the whole instance at once
    pub fn replace(&self, instance: Instance) -> Instance {
        std::mem::replace(&mut *self.write(), instance)
    }

    pub fn type_name(&self) -> String {
        self.read().type_name().to_string()
    }

    /// Identity of the shared instance
    pub fn id(&self) -> usize {
        Arc::as_ptr(&self.0) as *const () as usize
    }

    pub fn ptr_eq(&self, other: &ObjectRef) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// Structural equality; comparing two distinct cyclic graphs does not terminate
impl PartialEq for ObjectRef {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || *self.read() == *other.read()
    }
}

thread_local! {
    static DEBUG_ACTIVE: RefCell<Vec<usize>> = const { RefCell::new(Vec::new()) };
}

impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let id = self.id();
        if DEBUG_ACTIVE.with(|active| active.borrow().contains(&id)) {
            return match self.0.try_read() {
                Ok(instance) => write!(f, "#ref:{}", instance.type_name()),
                Err(_) => write!(f, "#ref"),
            };
        }
        let instance = match self.0.try_read() {
            Ok(instance) => instance,
            Err(_) => return write!(f, "ObjectRef(<locked>)"),
        };
        DEBUG_ACTIVE.with(|active| active.borrow_mut().push(id));
        let result = instance.fmt(f);
        DEBUG_ACTIVE.with(|active| active.borrow_mut().pop());
        result
    }
}
