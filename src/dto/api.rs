//! JSON envelopes returned by the API endpoints.

use serde::Serialize;
use serde_json::Value;

use crate::listing::{Page, PageLinks};

/// Envelope for paginated list endpoints.
#[derive(Debug, Serialize)]
pub struct ListResponse {
    pub success: bool,
    /// Number of items on this page, not the unpaged total.
    pub count: usize,
    pub pagination: PageLinks,
    pub data: Vec<Value>,
}

impl ListResponse {
    /// Wraps a result page, applying the requested field projection.
    ///
    /// When the page carries a `select` list, every item keeps only `id`
    /// plus the selected keys. Unknown keys are simply absent from the
    /// output rather than an error.
    #[must_use]
    pub fn new<T: Serialize>(page: &Page<T>) -> Self {
        let data: Vec<Value> = page
            .items
            .iter()
            .map(|item| {
                let mut value = serde_json::to_value(item).unwrap_or_default();
                if let (Some(fields), Value::Object(map)) = (&page.params.select, &mut value) {
                    map.retain(|key, _| key == "id" || fields.contains(key));
                }
                value
            })
            .collect();

        Self {
            success: true,
            count: data.len(),
            pagination: page.links(),
            data,
        }
    }
}

/// Envelope for unpaginated collection endpoints, such as the radius search.
#[derive(Debug, Serialize)]
pub struct CollectionResponse<T> {
    pub success: bool,
    pub count: usize,
    pub data: Vec<T>,
}

impl<T: Serialize> CollectionResponse<T> {
    #[must_use]
    pub fn new(data: Vec<T>) -> Self {
        Self {
            success: true,
            count: data.len(),
            data,
        }
    }
}

/// Envelope for single-entity endpoints.
#[derive(Debug, Serialize)]
pub struct ItemResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> ItemResponse<T> {
    #[must_use]
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

impl ItemResponse<Value> {
    /// Body used by delete endpoints, `data` is an empty object.
    #[must_use]
    pub fn deleted() -> Self {
        Self {
            success: true,
            data: Value::Object(serde_json::Map::new()),
        }
    }
}

/// Envelope for every error the API emits.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

impl ErrorResponse {
    #[must_use]
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}
