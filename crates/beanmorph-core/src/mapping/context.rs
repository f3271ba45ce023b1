//! Per-call mapping state
//!
//! Copyright (c) 2025 Beanmorph Team
//! Licensed under the Apache-2.0 license

use std::collections::HashSet;
use std::fmt;
use tracing::trace;

/// Stage of a single `transform` call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformPhase {
    Start,
    DescribeTypes,
    ResolveFields,
    Construct,
    Validate,
    Done,
}

impl fmt::Display for TransformPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransformPhase::Start => write!(f, "start"),
            TransformPhase::DescribeTypes => write!(f, "describe_types"),
            TransformPhase::ResolveFields => write!(f, "resolve_fields"),
            TransformPhase::Construct => write!(f, "construct"),
            TransformPhase::Validate => write!(f, "validate"),
            TransformPhase::Done => write!(f, "done"),
        }
    }
}

/// State threaded through one top-level transformation
#[derive(Debug)]
pub struct MappingContext {
    /// (source identity, destination type) pairs on the active recursion path
    active: HashSet<(usize, String)>,
    depth: usize,
    phase: TransformPhase,
}

impl MappingContext {
    pub fn new() -> Self {
        Self {
            active: HashSet::new(),
            depth: 0,
            phase: TransformPhase::Start,
        }
    }

    /// Mark a source object as being mapped into `destination`
    ///
    /// Returns `false` if the pair is already on the recursion path.
    pub fn enter(&mut self, source_id: usize, destination: &str) -> bool {
        let inserted = self.active.insert((source_id, destination.to_string()));
        if inserted {
            self.depth += 1;
        }
        inserted
    }

    pub fn leave(&mut self, source_id: usize, destination: &str) {
        if self.active.remove(&(source_id, destination.to_string())) {
            self.depth -= 1;
        }
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn phase(&self) -> TransformPhase {
        self.phase
    }

    pub fn set_phase(&mut self, phase: TransformPhase, path: &str) {
        trace!(depth = self.depth, path, from = %self.phase, to = %phase, "phase transition");
        self.phase = phase;
    }
}

impl Default for MappingContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Qualified path of a child field
pub fn child_path(parent: &str, field: &str) -> String {
    if parent.is_empty() {
        field.to_string()
    } else {
        format!("{}.{}", parent, field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enter_detects_revisit() {
        let mut context = MappingContext::new();
        assert!(context.enter(1, "ToFoo"));
        assert!(context.enter(1, "ToSubFoo"));
        assert!(!context.enter(1, "ToFoo"));
        assert_eq!(context.depth(), 2);

        context.leave(1, "ToFoo");
        assert!(context.enter(1, "ToFoo"));
    }

    #[test]
    fn test_child_path() {
        assert_eq!(child_path("", "name"), "name");
        assert_eq!(child_path("nestedObject", "name"), "nestedObject.name");
    }
}
