//! Core validation types
//!
//! Copyright (c) 2025 Beanmorph Team
//! Licensed under the Apache-2.0 license

use crate::metadata::Constraint;
use std::fmt;

/// One broken constraint on a constructed bean
#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintViolation {
    /// Property holding the invalid value
    pub property: String,
    pub constraint: Constraint,
    pub message: String,
    /// JSON rendering of the offending value
    pub invalid_value: String,
}

impl fmt::Display for ConstraintViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} (was {})", self.property, self.message, self.invalid_value)
    }
}
