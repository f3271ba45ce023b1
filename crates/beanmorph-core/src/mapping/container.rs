//! Element-wise mapping of sequences and maps
//!
//! Elements have no previous value to fall back on, so a null going into a
//! primitive element slot always becomes the zero value.
//!
//! Copyright (c) 2025 Beanmorph Team
//! Licensed under the Apache-2.0 license

use crate::types::{MapValue, TypeRef, Value};
use crate::{Error, Result};
use super::context::MappingContext;

/// Maps a single element into its declared type
///
/// Implemented by the object mapper so containers can recurse into nested
/// objects and containers.
pub trait ElementMapper {
    fn map_element(
        &self,
        value: Value,
        target: &TypeRef,
        path: &str,
        inject_defaults: bool,
        context: &mut MappingContext,
    ) -> Result<Value>;
}

/// Maps containers one element at a time, preserving order and size
#[derive(Debug, Clone, Copy, Default)]
pub struct ContainerMapper;

impl ContainerMapper {
    /// Map every element of a sequence; elements share the field path
    pub fn map_sequence<M: ElementMapper + ?Sized>(
        mapper: &M,
        items: Vec<Value>,
        element: &TypeRef,
        path: &str,
        context: &mut MappingContext,
    ) -> Result<Value> {
        let mut mapped = Vec::with_capacity(items.len());
        for item in items {
            mapped.push(mapper.map_element(item, element, path, true, context)?);
        }
        Ok(Value::Seq(mapped))
    }

    /// Map keys and values of a map, keeping insertion order and size
    ///
    /// Object keys stay distinct by identity even when the destination key
    /// type makes them structurally equal. Two scalar keys converting to the
    /// same destination key are a mapping error.
    pub fn map_map<M: ElementMapper + ?Sized>(
        mapper: &M,
        entries: MapValue,
        key: &TypeRef,
        value: &TypeRef,
        path: &str,
        context: &mut MappingContext,
    ) -> Result<Value> {
        let mut mapped = MapValue::with_capacity(entries.len());
        for (entry_key, entry_value) in entries.iter() {
            let entry_key = mapper.map_element(entry_key.clone(), key, path, true, context)?;
            let entry_value = mapper.map_element(entry_value.clone(), value, path, true, context)?;
            if !matches!(entry_key, Value::Object(_)) && mapped.contains_key(&entry_key) {
                return Err(Error::mapping(
                    path,
                    format!("map keys collide on {} after conversion to {}", entry_key.to_json(), key),
                ));
            }
            mapped.push(entry_key, entry_value);
        }
        Ok(Value::Map(mapped))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::coercer::ValueCoercer;
    use crate::types::ScalarKind;
    use crate::ErrorKind;

    /// Element mapper that only coerces scalars
    struct ScalarOnly;

    impl ElementMapper for ScalarOnly {
        fn map_element(
            &self,
            value: Value,
            target: &TypeRef,
            path: &str,
            inject_defaults: bool,
            _context: &mut MappingContext,
        ) -> Result<Value> {
            ValueCoercer::new().coerce(value, target, path, inject_defaults)
        }
    }

    #[test]
    fn test_sequence_preserves_order_and_length() {
        let mut context = MappingContext::new();
        let mapped = ContainerMapper::map_sequence(
            &ScalarOnly,
            vec![Value::Int(3), Value::Int(1), Value::Int(3)],
            &TypeRef::Boxed(ScalarKind::Long),
            "phones",
            &mut context,
        )
        .unwrap();
        assert_eq!(mapped, Value::Seq(vec![Value::Long(3), Value::Long(1), Value::Long(3)]));
    }

    #[test]
    fn test_null_primitive_element_becomes_zero() {
        let mut context = MappingContext::new();
        let mapped = ContainerMapper::map_sequence(
            &ScalarOnly,
            vec![Value::Int(1), Value::Null],
            &TypeRef::Primitive(ScalarKind::Int),
            "nums",
            &mut context,
        )
        .unwrap();
        assert_eq!(mapped, Value::Seq(vec![Value::Int(1), Value::Int(0)]));

        let entries: MapValue = vec![("a", Value::Null)].into_iter().collect();
        let mapped = ContainerMapper::map_map(
            &ScalarOnly,
            entries,
            &TypeRef::String,
            &TypeRef::Primitive(ScalarKind::Long),
            "sampleMap",
            &mut context,
        )
        .unwrap();
        assert_eq!(mapped.as_map().unwrap().get(&Value::from("a")), Some(&Value::Long(0)));
    }

    #[test]
    fn test_map_keeps_insertion_order() {
        let mut context = MappingContext::new();
        let entries: MapValue = vec![("b", 2), ("a", 1)].into_iter().collect();
        let mapped = ContainerMapper::map_map(
            &ScalarOnly,
            entries,
            &TypeRef::String,
            &TypeRef::Primitive(ScalarKind::Long),
            "sampleMap",
            &mut context,
        )
        .unwrap();

        let map = mapped.as_map().unwrap();
        let keys: Vec<_> = map.keys().cloned().collect();
        assert_eq!(keys, vec![Value::from("b"), Value::from("a")]);
        assert_eq!(map.get(&Value::from("a")), Some(&Value::Long(1)));
    }

    #[test]
    fn test_colliding_scalar_keys_are_rejected() {
        let mut context = MappingContext::new();
        let entries: MapValue = vec![(Value::Int(1), "first"), (Value::Long(1), "second")]
            .into_iter()
            .collect();
        assert_eq!(entries.len(), 2);

        let err = ContainerMapper::map_map(
            &ScalarOnly,
            entries,
            &TypeRef::Primitive(ScalarKind::Long),
            &TypeRef::String,
            "byNumber",
            &mut context,
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Mapping);
    }

    #[test]
    fn test_element_failure_fails_the_container() {
        let mut context = MappingContext::new();
        let result = ContainerMapper::map_sequence(
            &ScalarOnly,
            vec![Value::Int(1), Value::from("two")],
            &TypeRef::Primitive(ScalarKind::Int),
            "phones",
            &mut context,
        );
        assert!(result.is_err());
    }
}
