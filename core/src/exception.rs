//! Response inspection hook that turns an HTTP response into an error.

use std::sync::Arc;

use crate::error::ApiError;
use crate::http::HttpResponse;

/// Inspects the raw response of the named operation and returns the error
/// to raise, or `None` to let the call deserialize the body.
pub type ExceptionFactory = Arc<dyn Fn(&str, &HttpResponse) -> Option<ApiError> + Send + Sync>;

/// Flags status 0 and any status of 400 or above.
pub fn default_exception_factory() -> ExceptionFactory {
    Arc::new(|operation: &str, response: &HttpResponse| {
        if response.status == 0 {
            return Some(ApiError::Call {
                status: 0,
                message: format!("Error calling {operation}: no response received"),
                body: response.body.clone(),
            });
        }
        if response.status >= 400 {
            return Some(ApiError::Call {
                status: response.status,
                message: format!("Error calling {operation}: {}", response.body),
                body: response.body.clone(),
            });
        }
        None
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    #[test]
    fn passes_success_and_redirect_statuses() {
        let factory = default_exception_factory();
        assert!(factory("GetStatus", &response(200, "{}")).is_none());
        assert!(factory("GetStatus", &response(304, "")).is_none());
    }

    #[test]
    fn flags_client_and_server_errors() {
        let factory = default_exception_factory();
        let err = factory("GetStatus", &response(503, "unavailable")).unwrap();
        match err {
            ApiError::Call { status, message, body } => {
                assert_eq!(status, 503);
                assert_eq!(message, "Error calling GetStatus: unavailable");
                assert_eq!(body, "unavailable");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(factory("GetVersions", &response(404, "")).unwrap().status(), Some(404));
    }

    #[test]
    fn flags_missing_status() {
        let factory = default_exception_factory();
        let err = factory("Landing", &response(0, "")).unwrap();
        assert_eq!(err.status(), Some(0));
        assert!(err.to_string().contains("no response received"));
    }
}
