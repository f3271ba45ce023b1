//! Error types for the Beanmorph core library
//!
//! This module defines the error handling system for Beanmorph,
//! using thiserror for ergonomic error definitions and anyhow for flexible error contexts.
//! Every failing `transform` call surfaces exactly one of these errors and never a
//! partially built destination.

use std::fmt;
use thiserror::Error;
use serde::{Deserialize, Serialize};

/// Main error type for Beanmorph operations
#[derive(Error, Debug)]
pub enum Error {
    /// Destination type cannot be constructed or fails validation
    #[error("Invalid bean {type_name}: {message}")]
    InvalidBean {
        type_name: String,
        message: String,
        violations: Vec<String>,
    },

    /// A scalar value cannot be coerced into its destination slot
    #[error("Type mismatch at '{path}': cannot convert {from} to {to}")]
    TypeMismatch {
        path: String,
        from: String,
        to: String,
    },

    /// Unexpected introspection or mapping failure
    #[error("Mapping failed at '{path}': {message}")]
    Mapping {
        path: String,
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// The source graph references an object that is already being mapped
    #[error("Cyclic object graph at '{path}': {type_name} is already being mapped into {destination}")]
    CyclicGraph {
        path: String,
        type_name: String,
        destination: String,
    },

    /// The metadata provider has no usable description of a type
    #[error("Unsupported type {type_name}: {message}")]
    UnsupportedType {
        type_name: String,
        message: String,
    },

    /// Invalid transformer or registry configuration
    #[error("Configuration error: {message}")]
    Configuration {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// JSON parsing and serialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    /// IO errors
    #[error("IO error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience type alias for Results using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Discriminant of [`Error`], handy for assertions and metrics labels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    InvalidBean,
    TypeMismatch,
    Mapping,
    CyclicGraph,
    UnsupportedType,
    Configuration,
    Json,
    Io,
}

impl Error {
    /// Build a mapping error without an underlying cause
    pub fn mapping(path: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Mapping {
            path: path.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Build an invalid-bean error without constraint violations
    pub fn invalid_bean(type_name: impl Into<String>, message: impl Into<String>) -> Self {
        Error::InvalidBean {
            type_name: type_name.into(),
            message: message.into(),
            violations: Vec::new(),
        }
    }

    /// Build a configuration error without an underlying cause
    pub fn configuration(message: impl Into<String>) -> Self {
        Error::Configuration {
            message: message.into(),
            source: None,
        }
    }

    /// The kind of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidBean { .. } => ErrorKind::InvalidBean,
            Error::TypeMismatch { .. } => ErrorKind::TypeMismatch,
            Error::Mapping { .. } => ErrorKind::Mapping,
            Error::CyclicGraph { .. } => ErrorKind::CyclicGraph,
            Error::UnsupportedType { .. } => ErrorKind::UnsupportedType,
            Error::Configuration { .. } => ErrorKind::Configuration,
            Error::Json { .. } => ErrorKind::Json,
            Error::Io { .. } => ErrorKind::Io,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::InvalidBean => write!(f, "InvalidBean"),
            ErrorKind::TypeMismatch => write!(f, "TypeMismatch"),
            ErrorKind::Mapping => write!(f, "Mapping"),
            ErrorKind::CyclicGraph => write!(f, "CyclicGraph"),
            ErrorKind::UnsupportedType => write!(f, "UnsupportedType"),
            ErrorKind::Configuration => write!(f, "Configuration"),
            ErrorKind::Json => write!(f, "Json"),
            ErrorKind::Io => write!(f, "Io"),
        }
    }
}

// Conversion implementations
impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Mapping {
            path: String::new(),
            message: err.to_string(),
            source: Some(err),
        }
    }
}
