//! Transformer settings
//!
//! Mapper-wide switches, loadable from JSON so a set of transformers can be
//! configured without recompiling.
//!
//! Copyright (c) 2025 Beanmorph Team
//! Licensed under the Apache-2.0 license

use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Mapper-wide settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformerSettings {
    /// Match transformers, mappings and skips on the last path segment too
    pub flat_field_name_transformation: bool,

    /// Give primitive fields their zero value when the source value is null
    pub default_value_set_enabled: bool,

    /// Run the bean validator on every constructed instance
    pub validation_enabled: bool,
}

impl Default for TransformerSettings {
    fn default() -> Self {
        Self {
            flat_field_name_transformation: false,
            default_value_set_enabled: true,
            validation_enabled: false,
        }
    }
}

impl TransformerSettings {
    /// Parse settings from a JSON document; missing keys keep their defaults
    pub fn from_json_str(document: &str) -> Result<Self> {
        Ok(serde_json::from_str(document)?)
    }

    /// Load settings from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }
}
