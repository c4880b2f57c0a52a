//! Cursor pagination over list endpoints.
//!
//! Render list endpoints return arrays of wrapper objects, each holding the
//! resource under a single named key plus a `cursor` string:
//!
//! ```json
//! [{"service": {"id": "srv-1"}, "cursor": "abc"}, ...]
//! ```
//!
//! [`RenderClient::request_all`] walks every page and returns the unwrapped
//! resources in provider order.

use serde_json::Value;
use tracing::debug;

use crate::client::RenderClient;
use crate::error::Result;
use crate::request::ApiRequest;

/// Items requested per page while aggregating.
pub const PAGE_SIZE: usize = 100;

/// How many items a list call should return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListMode {
    /// Walk every page.
    All,
    /// Single request, at most this many items.
    Limit(u32),
}

impl ListMode {
    /// Build from the host's `returnAll` / `limit` pair.
    pub fn from_flags(return_all: bool, limit: u32) -> Self {
        if return_all {
            ListMode::All
        } else {
            ListMode::Limit(limit)
        }
    }
}

impl Default for ListMode {
    fn default() -> Self {
        ListMode::Limit(20)
    }
}

/// Take the resource out of a pagination wrapper.
///
/// The resource key is the first key that is not `cursor`. Returns `None`
/// when there is no such key or its value is empty (null, false, zero or an
/// empty string).
pub fn unwrap_envelope(item: &Value) -> Option<Value> {
    let obj = item.as_object()?;
    let (_, value) = obj.iter().find(|(k, _)| k.as_str() != "cursor")?;
    if is_truthy(value) {
        Some(value.clone())
    } else {
        None
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn item_cursor(item: &Value) -> Option<&str> {
    item.get("cursor")
        .and_then(Value::as_str)
        .filter(|c| !c.is_empty())
}

impl RenderClient {
    /// Fetch every page of a list endpoint.
    ///
    /// Each page is requested with `limit=100` and the cursor of the last
    /// item seen on the previous page. A page shorter than [`PAGE_SIZE`]
    /// ends the walk, as does a response that is not an array. Any error
    /// aborts the whole walk and the partial result is dropped.
    pub async fn request_all(&self, request: ApiRequest) -> Result<Vec<Value>> {
        let mut results = Vec::new();
        let mut cursor: Option<String> = None;
        let mut page = 0usize;

        loop {
            page += 1;
            let mut req = request.clone().query_param("limit", PAGE_SIZE as u64);
            if let Some(c) = &cursor {
                req = req.query_param("cursor", c.as_str());
            }

            let response = self.request(req).await?;
            let Value::Array(items) = response else {
                debug!(page, "non-array page, stopping");
                break;
            };

            let page_len = items.len();
            for item in &items {
                if let Some(resource) = unwrap_envelope(item) {
                    results.push(resource);
                }
                if let Some(c) = item_cursor(item) {
                    cursor = Some(c.to_string());
                }
            }

            if page_len < PAGE_SIZE {
                cursor = None;
            }
            debug!(
                page,
                items = page_len,
                total = results.len(),
                has_cursor = cursor.is_some(),
                "fetched page"
            );

            if cursor.is_none() {
                break;
            }
        }

        Ok(results)
    }

    /// Fetch a single page of at most `limit` items.
    ///
    /// Each item is unwrapped through `item[key]`, falling back to the item
    /// itself. A response that is not an array yields one item.
    pub async fn request_page(
        &self,
        request: ApiRequest,
        key: &str,
        limit: u32,
    ) -> Result<Vec<Value>> {
        let response = self.request(request.query_param("limit", limit)).await?;
        Ok(unwrap_items(response, key, limit as usize))
    }

    /// Dispatch to [`request_all`](Self::request_all) or
    /// [`request_page`](Self::request_page).
    pub async fn list(&self, request: ApiRequest, key: &str, mode: ListMode) -> Result<Vec<Value>> {
        match mode {
            ListMode::All => self.request_all(request).await,
            ListMode::Limit(limit) => self.request_page(request, key, limit).await,
        }
    }
}

/// Unwrap a single-request list response.
pub(crate) fn unwrap_items(response: Value, key: &str, limit: usize) -> Vec<Value> {
    match response {
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item.get(key) {
                Some(inner) if !inner.is_null() => inner.clone(),
                _ => item,
            })
            .take(limit)
            .collect(),
        other => vec![other],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unwrap_envelope_takes_first_non_cursor_key() {
        let item = json!({"cursor": "c1", "service": {"id": "srv-1"}});
        assert_eq!(unwrap_envelope(&item), Some(json!({"id": "srv-1"})));

        let item = json!({"deploy": {"id": "dep-1"}, "cursor": "c2"});
        assert_eq!(unwrap_envelope(&item), Some(json!({"id": "dep-1"})));
    }

    #[test]
    fn test_unwrap_envelope_skips_empty() {
        assert_eq!(unwrap_envelope(&json!({"cursor": "c"})), None);
        assert_eq!(unwrap_envelope(&json!({"service": null, "cursor": "c"})), None);
        assert_eq!(unwrap_envelope(&json!({"service": false})), None);
        assert_eq!(unwrap_envelope(&json!("srv-1")), None);
    }

    #[test]
    fn test_item_cursor() {
        assert_eq!(item_cursor(&json!({"cursor": "abc"})), Some("abc"));
        assert_eq!(item_cursor(&json!({"cursor": ""})), None);
        assert_eq!(item_cursor(&json!({"service": {}})), None);
    }

    #[test]
    fn test_unwrap_items_falls_back_to_item() {
        let response = json!([
            {"service": {"id": "srv-1"}, "cursor": "a"},
            {"id": "srv-2"},
            {"service": {"id": "srv-3"}, "cursor": "c"},
        ]);
        let items = unwrap_items(response, "service", 2);
        assert_eq!(items, vec![json!({"id": "srv-1"}), json!({"id": "srv-2"})]);
    }

    #[test]
    fn test_unwrap_items_wraps_non_array() {
        let items = unwrap_items(json!({"id": "x"}), "service", 20);
        assert_eq!(items, vec![json!({"id": "x"})]);
    }

    #[test]
    fn test_list_mode_from_flags() {
        assert_eq!(ListMode::from_flags(true, 5), ListMode::All);
        assert_eq!(ListMode::from_flags(false, 5), ListMode::Limit(5));
        assert_eq!(ListMode::default(), ListMode::Limit(20));
    }
}
