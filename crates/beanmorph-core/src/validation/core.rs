//! Bean validator seam and the declared-constraint validator
//!
//! Copyright (c) 2025 Beanmorph Team
//! Licensed under the Apache-2.0 license

use crate::inspector::TypeDescriptor;
use crate::metadata::Constraint;
use crate::types::{Instance, Value};
use super::ConstraintViolation;
use regex::Regex;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

/// Checks a fully constructed instance; an empty result means valid
pub trait BeanValidator: Send + Sync {
    fn validate(&self, instance: &Instance, descriptor: &TypeDescriptor) -> Vec<ConstraintViolation>;
}

/// Validator that evaluates the constraints declared on each property
///
/// Null values only fail `NotNull` and `NotBlank`; every other constraint
/// treats null as valid.
#[derive(Debug, Default)]
pub struct ConstraintValidator {
    patterns: RwLock<HashMap<String, Regex>>,
}

impl ConstraintValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check one value against one constraint, returning the failure message
    fn check(&self, constraint: &Constraint, value: &Value) -> Option<String> {
        let value = match value {
            Value::Optional(Some(inner)) => inner.as_ref(),
            other => other,
        };

        match constraint {
            Constraint::NotNull => value.is_absent().then(|| "must not be null".to_string()),
            Constraint::NotBlank => match value {
                Value::String(s) if !s.trim().is_empty() => None,
                _ => Some("must not be blank".to_string()),
            },
            Constraint::Min(min) => value
                .as_f64()
                .filter(|v| *v < *min as f64)
                .map(|_| format!("must be greater than or equal to {}", min)),
            Constraint::Max(max) => value
                .as_f64()
                .filter(|v| *v > *max as f64)
                .map(|_| format!("must be less than or equal to {}", max)),
            Constraint::Size { min, max } => {
                let len = match value {
                    Value::String(s) => s.chars().count(),
                    Value::Seq(items) => items.len(),
                    Value::Map(map) => map.len(),
                    _ => return None,
                };
                let too_small = min.is_some_and(|min| len < min);
                let too_large = max.is_some_and(|max| len > max);
                (too_small || too_large).then(|| {
                    format!(
                        "size must be between {} and {}",
                        min.unwrap_or(0),
                        max.map(|m| m.to_string()).unwrap_or_else(|| "unbounded".to_string())
                    )
                })
            }
            Constraint::Pattern(pattern) => {
                let Value::String(s) = value else {
                    return None;
                };
                match self.matches(pattern, s) {
                    Ok(true) => None,
                    Ok(false) => Some(format!("must match \"{}\"", pattern)),
                    Err(err) => Some(format!("invalid pattern \"{}\": {}", pattern, err)),
                }
            }
        }
    }

    fn matches(&self, pattern: &str, text: &str) -> Result<bool, regex::Error> {
        if let Some(regex) = self
            .patterns
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(pattern)
        {
            return Ok(regex.is_match(text));
        }

        let regex = Regex::new(&format!("^(?:{})$", pattern))?;
        let matched = regex.is_match(text);
        self.patterns
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(pattern.to_string(), regex);
        Ok(matched)
    }
}

impl BeanValidator for ConstraintValidator {
    fn validate(&self, instance: &Instance, descriptor: &TypeDescriptor) -> Vec<ConstraintViolation> {
        let mut violations = Vec::new();

        for field in &descriptor.fields {
            if field.constraints.is_empty() {
                continue;
            }
            let value = instance.get(&field.name).cloned().unwrap_or(Value::Null);
            for constraint in &field.constraints {
                if let Some(message) = self.check(constraint, &value) {
                    violations.push(ConstraintViolation {
                        property: field.name.clone(),
                        constraint: constraint.clone(),
                        message,
                        invalid_value: value.to_json().to_string(),
                    });
                }
            }
        }

        violations
    }
}
