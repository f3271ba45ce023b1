//! Integration tests for mapping between the fixture types
//!
//! Covers mutable and immutable destinations, existing destinations,
//! field transformers, skips, flat name matching and default values.

use beanmorph_core::{ErrorKind, FieldTransformer, Instance, ObjectRef, TransformerSettings, Value};
use pretty_assertions::assert_eq;
use serde_json::json;

use test_support::*;

fn expected_sub_foo() -> serde_json::Value {
    json!({
        "name": NESTED_NAME,
        "phones": PHONES,
        "index": 1,
        "sampleMap": {"donald": "duck"},
        "complexMap": {"donald": ["duck", "mouse"]},
        "veryComplexMap": {"donald": {"donald": "duck"}},
    })
}

#[test]
fn test_identity_copy_between_identical_types() {
    let source = from_foo();
    let mapped = transformer().transform_to(&source, "FromFoo").unwrap();

    assert_eq!(mapped.to_json(), source.to_json());
    assert_eq!(mapped, source);
    // a fresh graph, not the source objects
    assert!(!mapped.as_object().unwrap().ptr_eq(source.as_object().unwrap()));
}

#[test]
fn test_mutable_destination() {
    init_tracing();
    let mapped = transformer().transform_to(&from_foo(), "MutableToFoo").unwrap();

    assert_eq!(
        mapped.to_json(),
        json!({
            "name": NAME,
            "id": ID as i64,
            "nestedObjectList": [expected_sub_foo(), expected_sub_foo()],
            "list": ["donald", "duck"],
            "nestedObject": expected_sub_foo(),
            "description": null,
        })
    );
    assert_eq!(mapped.as_object().unwrap().type_name(), "MutableToFoo");
}

#[test]
fn test_immutable_destination() {
    let mapped = transformer().transform_to(&from_foo(), "ImmutableToFoo").unwrap();

    assert_eq!(mapped.get("name"), Some(Value::from(NAME)));
    assert_eq!(mapped.get("id"), Some(Value::BigInteger(ID)));
    assert_eq!(mapped.get("nestedObject").unwrap().to_json(), expected_sub_foo());
    let nested = mapped.get("nestedObject").unwrap();
    assert_eq!(nested.as_object().unwrap().type_name(), "ImmutableToSubFoo");
}

#[test]
fn test_immutable_without_matching_constructor() {
    let err = transformer()
        .transform_to(&from_foo(), "ImmutableWithoutConstructor")
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidBean);
}

#[test]
fn test_existing_destination_keeps_unmatched_fields() {
    let existing = ObjectRef::new(
        Instance::new("MutableToFoo")
            .with("name", "Donald")
            .with("description", "kept"),
    );

    let updated = transformer().transform_into(&from_foo(), &existing).unwrap();

    assert!(updated.ptr_eq(&existing));
    let snapshot = existing.snapshot();
    assert_eq!(snapshot.get("name"), Some(&Value::from(NAME)));
    assert_eq!(snapshot.get("description"), Some(&Value::from("kept")));
}

#[test]
fn test_existing_destination_untouched_on_failure() {
    let existing = ObjectRef::new(Instance::new("MutableToFoo").with("name", "Donald"));
    let source = Instance::new("FromFoo")
        .with("name", NAME)
        .with("id", "not a number")
        .into_value();

    let err = transformer().transform_into(&source, &existing).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TypeMismatch);
    assert_eq!(existing.snapshot().get("name"), Some(&Value::from("Donald")));
}

#[test]
fn test_existing_immutable_destination_is_rejected() {
    let existing = ObjectRef::new(Instance::new("ImmutableToFoo"));
    let err = transformer().transform_into(&from_foo(), &existing).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidBean);
}

#[test]
fn test_nested_field_transformer() {
    let mut transformer = transformer();
    transformer.with_field_transformer(FieldTransformer::new("nestedObject.name", |v| {
        Value::from(format!("prefix-{}", v.as_str().unwrap_or_default()))
    }));

    let mapped = transformer.transform_to(&from_foo(), "ImmutableToFoo").unwrap();
    assert_eq!(mapped.get("name"), Some(Value::from(NAME)));
    assert_eq!(mapped.get_path("nestedObject.name"), Some(Value::from("prefix-Smith")));
    let list = mapped.get("nestedObjectList").unwrap();
    assert_eq!(list.as_seq().unwrap()[0].get("name"), Some(Value::from(NESTED_NAME)));
}

#[test]
fn test_flat_name_transformer_applies_at_every_depth() {
    let mut transformer = transformer();
    transformer
        .set_flat_field_name_transformation(true)
        .with_field_transformer(FieldTransformer::new("name", |v| {
            Value::from(v.as_str().unwrap_or_default().to_uppercase())
        }));

    let mapped = transformer.transform_to(&from_foo(), "MutableToFoo").unwrap();
    assert_eq!(mapped.get("name"), Some(Value::from("GOOFY")));
    assert_eq!(mapped.get_path("nestedObject.name"), Some(Value::from("SMITH")));
    let list = mapped.get("nestedObjectList").unwrap();
    for item in list.as_seq().unwrap() {
        assert_eq!(item.get("name"), Some(Value::from("SMITH")));
    }
}

#[test]
fn test_supplier_populates_field_missing_from_source() {
    let mut transformer = transformer();
    transformer.with_field_transformer(FieldTransformer::supplier("description", || {
        Value::from("supplied")
    }));

    let mapped = transformer.transform_to(&from_foo(), "MutableToFoo").unwrap();
    assert_eq!(mapped.get("description"), Some(Value::from("supplied")));
}

#[test]
fn test_remove_and_reset_transformers() {
    let mut transformer = transformer();
    transformer
        .with_field_transformer(FieldTransformer::supplier("name", || Value::from("a")))
        .with_field_transformer(FieldTransformer::supplier("description", || Value::from("b")))
        .remove_field_transformer("name");

    let mapped = transformer.transform_to(&from_foo(), "MutableToFoo").unwrap();
    assert_eq!(mapped.get("name"), Some(Value::from(NAME)));
    assert_eq!(mapped.get("description"), Some(Value::from("b")));

    transformer.reset_fields_transformer();
    let mapped = transformer.transform_to(&from_foo(), "MutableToFoo").unwrap();
    assert_eq!(mapped.get("description"), Some(Value::Null));
}

#[test]
fn test_skip_fields() {
    init_tracing();
    let mut transformer = transformer();
    transformer.skip_transformation_for_field(["name", "nestedObject.phones"]);

    for destination in ["MutableToFoo", "ImmutableToFoo"] {
        let mapped = transformer.transform_to(&from_foo(), destination).unwrap();
        assert_eq!(mapped.get("name"), Some(Value::Null), "{destination}");
        assert_eq!(mapped.get_path("nestedObject.name"), Some(Value::from(NESTED_NAME)));
        assert_eq!(mapped.get_path("nestedObject.phones"), Some(Value::Null));
    }

    transformer.reset_fields_transformation_skip();
    let mapped = transformer.transform_to(&from_foo(), "MutableToFoo").unwrap();
    assert_eq!(mapped.get("name"), Some(Value::from(NAME)));
}

#[test]
fn test_default_values_for_primitives() {
    let transformer = transformer();
    let source = Instance::new("FromFooWithAge")
        .with("name", NAME)
        .with("age", Value::Null)
        .into_value();

    let mapped = transformer.transform_to(&source, "MutableToFooWithAge").unwrap();
    assert_eq!(mapped.get("age"), Some(Value::Int(0)));

    let mapped = transformer.transform_to(&source, "ImmutableToFooWithAge").unwrap();
    assert_eq!(mapped.get("age"), Some(Value::Int(0)));
}

#[test]
fn test_disabled_defaults_keep_constructor_value() {
    let mut transformer = transformer();
    transformer.set_default_value_set_enabled(false);
    let source = Instance::new("FromFooWithAge").with("name", NAME).into_value();

    let mapped = transformer.transform_to(&source, "MutableToFooWithAge").unwrap();
    assert_eq!(mapped.get("age"), Some(Value::Int(18)));

    // immutable construction cannot leave a primitive unset
    let mapped = transformer.transform_to(&source, "ImmutableToFooWithAge").unwrap();
    assert_eq!(mapped.get("age"), Some(Value::Int(0)));
}

#[test]
fn test_settings_applied_together() {
    let mut transformer = transformer();
    transformer.with_settings(
        TransformerSettings::from_json_str(r#"{"flat_field_name_transformation": true}"#).unwrap(),
    );
    assert!(transformer.settings().flat_field_name_transformation);
    assert!(transformer.settings().default_value_set_enabled);

    transformer.skip_transformation_for_field(["phones"]);
    let mapped = transformer.transform_to(&from_foo(), "MutableToFoo").unwrap();
    assert_eq!(mapped.get_path("nestedObject.phones"), Some(Value::Null));
}

#[test]
fn test_inspector_cache_is_shared_between_clones() {
    let transformer = transformer();
    let clone = transformer.clone();
    transformer.transform_to(&from_foo(), "MutableToFoo").unwrap();

    assert!(clone.inspector().is_cached("MutableToFoo"));
    assert!(clone.inspector().is_cached("FromSubFoo"));
}

#[test]
fn test_subclass_copies_inherited_and_own_fields() {
    let source = from_foo_sub_class();
    let mutable = transformer().transform_to(&source, "MutableToFooSubClass").unwrap();

    assert_eq!(mutable.get("name"), Some(Value::from(NAME)));
    assert_eq!(mutable.get("id"), Some(Value::BigInteger(ID)));
    assert_eq!(mutable.get("surname"), Some(Value::from("surname")));
    assert_eq!(mutable.get("check"), Some(Value::Bool(true)));
    assert_eq!(mutable.get_path("nestedObject.name"), Some(Value::from(NESTED_NAME)));
    assert_eq!(mutable.get("description"), Some(Value::Null));

    let immutable = transformer().transform_to(&source, "ImmutableToFooSubClass").unwrap();
    assert_eq!(immutable.get("phone"), Some(Value::from(PHONES.to_vec())));
    assert_eq!(immutable.get("name"), Some(Value::from(NAME)));
    assert_eq!(
        immutable.get_path("nestedObject.name"),
        Some(Value::from(NESTED_NAME))
    );
}
