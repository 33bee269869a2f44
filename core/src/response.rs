//! Full-response envelope returned by the `*_with_http_info` operations.

use std::collections::BTreeMap;

/// Response headers: case-sensitive name to values in arrival order.
pub type Headers = BTreeMap<String, Vec<String>>;

/// Group header pairs by name, keeping the order repeated values arrived in.
pub fn collect_headers(pairs: &[(String, String)]) -> Headers {
    let mut headers = Headers::new();
    for (name, value) in pairs {
        headers.entry(name.clone()).or_default().push(value.clone());
    }
    headers
}

/// Status code, headers and deserialized body of one call.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse<T> {
    pub status_code: u16,
    pub headers: Headers,
    pub data: T,
}

impl<T> ApiResponse<T> {
    /// Drop status and headers, keeping only the body.
    pub fn into_data(self) -> T {
        self.data
    }
}
