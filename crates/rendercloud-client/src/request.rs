//! Request descriptors.

use reqwest::Method;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// A single call against the Render API: method, path, optional JSON body
/// and optional query map.
///
/// Descriptors are built per call and consumed by
/// [`RenderClient::request`](crate::RenderClient::request).
#[derive(Debug, Clone)]
pub struct ApiRequest {
    /// HTTP method.
    pub method: Method,
    /// Path below the API base URL, starting with `/`.
    pub path: String,
    /// JSON body. Absent and empty are both sent without a body.
    pub body: Option<Map<String, Value>>,
    /// Query parameters. Absent and empty are both sent without a query string.
    pub query: Option<Map<String, Value>>,
}

impl ApiRequest {
    /// Create a descriptor with no body and no query.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            query: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Attach a JSON object body.
    pub fn body(mut self, body: Map<String, Value>) -> Self {
        self.body = Some(body);
        self
    }

    /// Attach a body serialized from a typed request struct.
    ///
    /// The value must serialize to a JSON object.
    pub fn json_body<T: Serialize + ?Sized>(self, body: &T) -> Result<Self> {
        match serde_json::to_value(body)? {
            Value::Object(map) => Ok(self.body(map)),
            other => Err(Error::Config(format!(
                "request body must be a JSON object, got {}",
                json_kind(&other)
            ))),
        }
    }

    /// Replace the query map.
    pub fn query(mut self, query: Map<String, Value>) -> Self {
        self.query = Some(query);
        self
    }

    /// Replace the query map with one serialized from a typed filter struct.
    pub fn query_from<T: Serialize + ?Sized>(self, query: &T) -> Result<Self> {
        match serde_json::to_value(query)? {
            Value::Object(map) => Ok(self.query(map)),
            Value::Null => Ok(self),
            other => Err(Error::Config(format!(
                "query must be a JSON object, got {}",
                json_kind(&other)
            ))),
        }
    }

    /// Set a single query parameter, keeping the others.
    pub fn query_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.query
            .get_or_insert_with(Map::new)
            .insert(key.into(), value.into());
        self
    }

    /// The body to send, if any. Empty maps count as no body.
    pub fn effective_body(&self) -> Option<&Map<String, Value>> {
        self.body.as_ref().filter(|b| !b.is_empty())
    }

    /// Query pairs to send. Empty when the query is absent or empty.
    ///
    /// Strings are sent verbatim, numbers and booleans as their JSON text,
    /// arrays as repeated keys. Nulls are skipped.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        let Some(query) = &self.query else {
            return pairs;
        };
        for (key, value) in query {
            match value {
                Value::Null => {}
                Value::Array(values) => {
                    for v in values {
                        if let Some(s) = scalar_text(v) {
                            pairs.push((key.clone(), s));
                        }
                    }
                }
                other => {
                    if let Some(s) = scalar_text(other) {
                        pairs.push((key.clone(), s));
                    }
                }
            }
        }
        pairs
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
