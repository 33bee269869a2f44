//! HTTP requests and responses as plain data.
//!
//! # Design
//! `SystemApi` builds `HttpRequest` values and parses `HttpResponse` values;
//! a `Transport` sits between the two and is the only place that touches the
//! network. Tests swap the transport for a stub that returns canned
//! responses, and hosts that do their own I/O can call the `build_*` /
//! `parse_*` pairs directly.
//!
//! All fields use owned types (`String`, `Vec`) so values can be moved onto
//! a blocking thread or across an await point without lifetime concerns.

/// HTTP method for a request. The System controller is read-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
        }
    }
}

/// An HTTP request described as plain data.
///
/// `path` is the absolute URL: the configured base path followed by the
/// endpoint path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    /// First value of the header `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

/// An HTTP response described as plain data.
///
/// A `status` of 0 means no HTTP status line was received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn content_type(&self) -> Option<&str> {
        find_header(&self.headers, "content-type")
    }
}

fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}
