//! Per-item parameter access.
//!
//! The host hands each item its parameters as a JSON object. Collections
//! (`filters`, `additionalOptions`, `updateFields`) are nested objects where
//! an empty string means "not set".

use rendercloud_client::ListMode;
use serde_json::{Map, Value};

use crate::error::{NodeError, Result};

/// Parameter map of one input item.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Parameters(Map<String, Value>);

impl Parameters {
    /// Create an empty parameter map.
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Wrap a JSON value. Anything but an object is rejected.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            Value::Null => Ok(Self::new()),
            other => Err(NodeError::invalid(
                "item",
                format!("expected an object, got {}", other),
            )),
        }
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Get a required, non-empty string. Numbers are accepted as their text.
    pub fn string(&self, name: &str) -> Result<String> {
        match self.0.get(name) {
            None | Some(Value::Null) => Err(NodeError::MissingParameter(name.to_string())),
            Some(Value::String(s)) if s.is_empty() => {
                Err(NodeError::MissingParameter(name.to_string()))
            }
            Some(Value::String(s)) => Ok(s.clone()),
            Some(Value::Number(n)) => Ok(n.to_string()),
            Some(other) => Err(NodeError::invalid(name, format!("expected a string, got {}", other))),
        }
    }

    /// Get a string, treating absent and empty as `None`.
    pub fn optional_string(&self, name: &str) -> Option<String> {
        match self.0.get(name)? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// Get a string, falling back to `default` when absent or empty.
    pub fn string_or(&self, name: &str, default: &str) -> String {
        self.optional_string(name)
            .unwrap_or_else(|| default.to_string())
    }

    /// Get a boolean. `"true"`/`"false"` strings are accepted.
    pub fn optional_bool(&self, name: &str) -> Option<bool> {
        match self.0.get(name)? {
            Value::Bool(b) => Some(*b),
            Value::String(s) => s.parse().ok(),
            _ => None,
        }
    }

    pub fn bool_or(&self, name: &str, default: bool) -> bool {
        self.optional_bool(name).unwrap_or(default)
    }

    /// Get a non-negative integer. Absent, null, zero-length strings and
    /// zero all count as unset.
    pub fn optional_u32(&self, name: &str) -> Result<Option<u32>> {
        let n = match self.0.get(name) {
            None | Some(Value::Null) => return Ok(None),
            Some(Value::String(s)) if s.is_empty() => return Ok(None),
            Some(Value::String(s)) => s
                .trim()
                .parse::<u64>()
                .map_err(|_| NodeError::invalid(name, format!("'{}' is not a number", s)))?,
            Some(Value::Number(n)) => match n.as_u64() {
                Some(n) => n,
                None => match n.as_f64() {
                    Some(f) if f >= 0.0 && f.fract() == 0.0 => f as u64,
                    _ => return Err(NodeError::invalid(name, format!("{} is not a whole number", n))),
                },
            },
            Some(other) => {
                return Err(NodeError::invalid(name, format!("expected a number, got {}", other)));
            }
        };
        if n == 0 {
            return Ok(None);
        }
        u32::try_from(n)
            .map(Some)
            .map_err(|_| NodeError::invalid(name, format!("{} is too large", n)))
    }

    pub fn u32_or(&self, name: &str, default: u32) -> Result<u32> {
        Ok(self.optional_u32(name)?.unwrap_or(default))
    }

    /// Get a required positive integer.
    pub fn u32(&self, name: &str) -> Result<u32> {
        self.optional_u32(name)?
            .ok_or_else(|| NodeError::MissingParameter(name.to_string()))
    }

    /// Get a nested collection. Empty when absent or not an object.
    pub fn collection(&self, name: &str) -> Parameters {
        match self.0.get(name) {
            Some(Value::Object(map)) => Parameters(map.clone()),
            _ => Parameters::new(),
        }
    }

    /// Get a list of strings from an array or a comma-separated string.
    ///
    /// Entries are trimmed and empty ones dropped.
    pub fn string_list(&self, name: &str) -> Vec<String> {
        match self.0.get(name) {
            Some(Value::Array(values)) => values
                .iter()
                .filter_map(|v| match v {
                    Value::String(s) => Some(s.trim().to_string()),
                    Value::Number(n) => Some(n.to_string()),
                    _ => None,
                })
                .filter(|s| !s.is_empty())
                .collect(),
            Some(Value::String(s)) => rendercloud_client::split_ids(s),
            _ => Vec::new(),
        }
    }

    /// Get the rows of a fixed collection: `name.group` as a list of maps.
    pub fn entries(&self, name: &str, group: &str) -> Vec<Parameters> {
        let Some(Value::Object(outer)) = self.0.get(name) else {
            return Vec::new();
        };
        match outer.get(group) {
            Some(Value::Array(rows)) => rows
                .iter()
                .filter_map(|row| row.as_object().cloned().map(Parameters))
                .collect(),
            Some(Value::Object(row)) => vec![Parameters(row.clone())],
            _ => Vec::new(),
        }
    }

    /// Read the `returnAll` / `limit` pair of a list operation.
    pub fn list_mode(&self, default_limit: u32) -> Result<ListMode> {
        let return_all = self.bool_or("returnAll", false);
        Ok(ListMode::from_flags(
            return_all,
            self.u32_or("limit", default_limit)?,
        ))
    }
}

impl From<Map<String, Value>> for Parameters {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}
