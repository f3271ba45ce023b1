//! Integration tests for bean validation during transformation

use beanmorph_core::metadata::PropertyShape;
use beanmorph_core::{
    BeanTransformer, BeanValidator, Constraint, ConstraintViolation, Error, ErrorKind, Instance,
    ScalarKind, TypeDescriptor, TypeRef, TypeRegistry, TypeShapeBuilder, Value,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn registry() -> TypeRegistry {
    let registry = TypeRegistry::new();
    registry
        .register(
            TypeShapeBuilder::new("FromAccount")
                .property("name", TypeRef::String)
                .property("age", TypeRef::Primitive(ScalarKind::Int))
                .property("owner", TypeRef::object("FromAccount"))
                .default_constructor()
                .build()
                .unwrap(),
        )
        .register(
            TypeShapeBuilder::new("Account")
                .with_property(
                    PropertyShape::new("name", TypeRef::String).constraint(Constraint::NotBlank),
                )
                .with_property(
                    PropertyShape::new("age", TypeRef::Primitive(ScalarKind::Int))
                        .constraint(Constraint::Min(18)),
                )
                .property("owner", TypeRef::object("Account"))
                .all_args_constructor()
                .build()
                .unwrap(),
        );
    registry
}

fn account(name: &str, age: i32) -> Instance {
    Instance::new("FromAccount").with("name", name).with("age", age)
}

fn transformer() -> BeanTransformer {
    let mut transformer = BeanTransformer::new(Arc::new(registry()));
    transformer.set_validation_enabled(true);
    transformer
}

#[test]
fn test_valid_bean_passes() {
    let mapped = transformer()
        .transform_to(&account("Goofy", 34).into_value(), "Account")
        .unwrap();
    assert_eq!(mapped.get("age"), Some(Value::Int(34)));
}

#[test]
fn test_violations_raise_invalid_bean() {
    let err = transformer()
        .transform_to(&account(" ", 12).into_value(), "Account")
        .unwrap_err();

    match err {
        Error::InvalidBean { type_name, violations, .. } => {
            assert_eq!(type_name, "Account");
            assert_eq!(violations.len(), 2);
            assert!(violations[0].starts_with("name:"));
            assert!(violations[1].starts_with("age:"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_nested_violation_fails_the_whole_call() {
    let source = account("Goofy", 34).with("owner", account("", 40)).into_value();
    let err = transformer().transform_to(&source, "Account").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidBean);
}

#[test]
fn test_validation_disabled_by_default() {
    let transformer = BeanTransformer::new(Arc::new(registry()));
    let mapped = transformer
        .transform_to(&account("", 12).into_value(), "Account")
        .unwrap();
    assert_eq!(mapped.get("age"), Some(Value::Int(12)));

    let err = transformer.validate(&mapped).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidBean);
}

/// Validator counting how many instances it saw
#[derive(Default)]
struct CountingValidator {
    calls: AtomicUsize,
}

impl BeanValidator for CountingValidator {
    fn validate(&self, _instance: &Instance, _descriptor: &TypeDescriptor) -> Vec<ConstraintViolation> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Vec::new()
    }
}

#[test]
fn test_custom_validator_sees_every_constructed_instance() {
    let validator = Arc::new(CountingValidator::default());
    let mut transformer = transformer();
    transformer.with_validator(validator.clone());

    let source = account("", 1).with("owner", account("", 2)).into_value();
    transformer.transform_to(&source, "Account").unwrap();
    assert_eq!(validator.calls.load(Ordering::SeqCst), 2);
}
