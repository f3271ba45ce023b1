//! Bean validation
//!
//! The engine treats validation as an external collaborator: anything that
//! implements [`BeanValidator`] can be plugged into a transformer. The
//! default [`ConstraintValidator`] evaluates the [`crate::metadata::Constraint`]s
//! declared in each type's metadata.
//!
//! - `types`: Violation type
//! - `core`: Validator trait and the declared-constraint validator
//! - `tests`: Test suite
//!
//! Copyright (c) 2025 Beanmorph Team
//! Licensed under the Apache-2.0 license

pub mod types;
pub mod core;
#[cfg(test)]
mod tests;

pub use types::ConstraintViolation;
pub use self::core::{BeanValidator, ConstraintValidator};
