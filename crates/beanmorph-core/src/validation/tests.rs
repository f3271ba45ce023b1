//! Tests for the declared-constraint validator
//!
//! Copyright (c) 2025 Beanmorph Team
//! Licensed under the Apache-2.0 license

use super::{BeanValidator, ConstraintValidator};
use crate::inspector::TypeInspector;
use crate::metadata::{Constraint, PropertyShape, TypeRegistry, TypeShapeBuilder};
use crate::types::{Instance, ScalarKind, TypeRef, Value};
use std::sync::Arc;

fn inspector() -> TypeInspector {
    let registry = TypeRegistry::new();
    registry.register(
        TypeShapeBuilder::new("Account")
            .with_property(PropertyShape::new("id", TypeRef::BigInteger).constraint(Constraint::NotNull))
            .with_property(PropertyShape::new("name", TypeRef::String).constraint(Constraint::NotBlank))
            .with_property(
                PropertyShape::new("age", TypeRef::Primitive(ScalarKind::Int))
                    .constraint(Constraint::Min(18))
                    .constraint(Constraint::Max(120)),
            )
            .with_property(
                PropertyShape::new("code", TypeRef::String).constraint(Constraint::Pattern("[A-Z]{3}".to_string())),
            )
            .with_property(
                PropertyShape::new("tags", TypeRef::seq(TypeRef::String))
                    .constraint(Constraint::Size { min: Some(1), max: Some(2) }),
            )
            .default_constructor()
            .build()
            .unwrap(),
    );
    TypeInspector::new(Arc::new(registry))
}

fn valid_account() -> Instance {
    Instance::new("Account")
        .with("id", Value::BigInteger(1234))
        .with("name", "Goofy")
        .with("age", 34)
        .with("code", "ABC")
        .with("tags", vec!["donald"])
}

#[test]
fn test_valid_instance_has_no_violations() {
    let descriptor = inspector().describe("Account").unwrap();
    let violations = ConstraintValidator::new().validate(&valid_account(), &descriptor);
    assert!(violations.is_empty(), "unexpected violations: {:?}", violations);
}

#[test]
fn test_not_null_and_not_blank() {
    let descriptor = inspector().describe("Account").unwrap();
    let account = valid_account().with("id", Value::Null).with("name", "   ");
    let violations = ConstraintValidator::new().validate(&account, &descriptor);

    let properties: Vec<_> = violations.iter().map(|v| v.property.as_str()).collect();
    assert_eq!(properties, vec!["id", "name"]);
    assert_eq!(violations[0].constraint, Constraint::NotNull);
    assert_eq!(violations[0].invalid_value, "null");
}

#[test]
fn test_numeric_bounds() {
    let descriptor = inspector().describe("Account").unwrap();
    let validator = ConstraintValidator::new();

    let young = validator.validate(&valid_account().with("age", 12), &descriptor);
    assert_eq!(young.len(), 1);
    assert_eq!(young[0].constraint, Constraint::Min(18));

    let old = validator.validate(&valid_account().with("age", 200), &descriptor);
    assert_eq!(old[0].constraint, Constraint::Max(120));
}

#[test]
fn test_pattern_matches_whole_string() {
    let descriptor = inspector().describe("Account").unwrap();
    let validator = ConstraintValidator::new();

    let violations = validator.validate(&valid_account().with("code", "ABCD"), &descriptor);
    assert_eq!(violations.len(), 1);
    assert!(violations[0].message.contains("must match"));

    // cached regex is reused
    assert!(validator.validate(&valid_account(), &descriptor).is_empty());
}

#[test]
fn test_size_and_null_tolerance() {
    let descriptor = inspector().describe("Account").unwrap();
    let validator = ConstraintValidator::new();

    let empty = validator.validate(&valid_account().with("tags", Vec::<String>::new()), &descriptor);
    assert_eq!(empty.len(), 1);
    assert!(empty[0].to_string().starts_with("tags: size must be between 1 and 2"));

    let null_tags = validator.validate(&valid_account().with("tags", Value::Null), &descriptor);
    assert!(null_tags.is_empty());
}

#[test]
fn test_invalid_pattern_is_reported() {
    let registry = TypeRegistry::new();
    registry.register(
        TypeShapeBuilder::new("Broken")
            .with_property(PropertyShape::new("code", TypeRef::String).constraint(Constraint::Pattern("(".to_string())))
            .default_constructor()
            .build()
            .unwrap(),
    );
    let descriptor = TypeInspector::new(Arc::new(registry)).describe("Broken").unwrap();
    let violations = ConstraintValidator::new()
        .validate(&Instance::new("Broken").with("code", "x"), &descriptor);
    assert!(violations[0].message.starts_with("invalid pattern"));
}
