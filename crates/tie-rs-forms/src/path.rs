//! Property paths: structured, dot-separated addresses into the bound source.
//!
//! A path like `address.city` selects the object at the prefix (`address`,
//! arbitrary depth) as the container and the final segment (`city`) as the
//! property key. Resolution is a recursive descent over the live JSON tree,
//! re-run on every access, so shape changes to the source between calls are
//! honored. The engine never auto-creates intermediate objects: a missing
//! prefix is the typed [`TieError::BindingResolution`] error.

use std::fmt;

use serde_json::Value;

use tie_rs_core::error::{TieError, TieResult};

/// A parsed property path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyPath {
    segments: Vec<String>,
}

impl PropertyPath {
    /// Parses a dotted path string into segments.
    pub fn parse(path: &str) -> Self {
        Self {
            segments: path.split('.').map(str::to_string).collect(),
        }
    }

    /// The final segment: the property key on the container object.
    pub fn key(&self) -> &str {
        self.segments
            .last()
            .map_or("", String::as_str)
    }

    /// The container segments preceding the key.
    pub fn prefix(&self) -> &[String] {
        &self.segments[..self.segments.len().saturating_sub(1)]
    }

    /// Whether the path addresses a nested container.
    pub fn is_dotted(&self) -> bool {
        self.segments.len() > 1
    }

    /// Resolves the value this path points at, if any.
    ///
    /// The prefix must evaluate to an existing object (`Err` otherwise); the
    /// leaf property itself may be absent (`Ok(None)`).
    pub fn lookup<'a>(&self, source: &'a Value) -> TieResult<Option<&'a Value>> {
        let container = self.walk_prefix(source)?;
        Ok(container.get(self.key()))
    }

    /// Writes a value at this path.
    ///
    /// Fails if the prefix does not resolve to an existing object; the leaf
    /// key is created on the container if it does not exist yet.
    pub fn set(&self, source: &mut Value, value: Value) -> TieResult<()> {
        let mut current = source;
        for segment in self.prefix() {
            current = current.get_mut(segment).ok_or_else(|| self.unresolved(segment))?;
        }
        let container = current
            .as_object_mut()
            .ok_or_else(|| self.unresolved(self.key()))?;
        container.insert(self.key().to_string(), value);
        Ok(())
    }

    fn walk_prefix<'a>(&self, source: &'a Value) -> TieResult<&'a Value> {
        let mut current = source;
        for segment in self.prefix() {
            current = current.get(segment).ok_or_else(|| self.unresolved(segment))?;
        }
        if current.is_object() {
            Ok(current)
        } else {
            Err(self.unresolved(self.key()))
        }
    }

    fn unresolved(&self, segment: &str) -> TieError {
        TieError::BindingResolution {
            path: self.to_string(),
            segment: segment.to_string(),
        }
    }
}

impl fmt::Display for PropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("."))
    }
}
