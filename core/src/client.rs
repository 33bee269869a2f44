//! Request wrappers for the System controller.
//!
//! # Design
//! Every endpoint is a GET to a fixed path with no parameters, so each
//! operation is split the same way: `build_*` produces an `HttpRequest`,
//! `parse_*` consumes an `HttpResponse`, and the four public forms run the
//! configured transport in between. Hosts that execute HTTP themselves can
//! use the `build_*` / `parse_*` pairs alone.
//!
//! `parse_*` first hands the raw response to the exception factory. If the
//! factory returns an error, that error is the result of the call and the
//! body is never deserialized.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::config::Configuration;
use crate::error::ApiError;
use crate::exception::{default_exception_factory, ExceptionFactory};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::response::{collect_headers, ApiResponse};
use crate::transport::{AsyncTransport, Transport};
use crate::types::{CacheInstances, SystemLanding, SystemStatus, UserInfo, Versions};

const LANDING_PATH: &str = "/system";
const CACHE_INSTANCES_PATH: &str = "/system/cacheinstances";
const STATUS_PATH: &str = "/system/status";
const USER_INFO_PATH: &str = "/system/userinfo";
const VERSIONS_PATH: &str = "/system/versions";

const LANDING_OP: &str = "Landing";
const CACHE_INSTANCES_OP: &str = "GetCacheInstances";
const STATUS_OP: &str = "GetStatus";
const USER_INFO_OP: &str = "GetUserInfo";
const VERSIONS_OP: &str = "GetVersions";

/// Client for the System controller.
///
/// Cheap to clone: the configuration is shared and the exception factory is
/// reference counted.
#[derive(Clone)]
pub struct SystemApi {
    config: Arc<Configuration>,
    exception_factory: Option<ExceptionFactory>,
}

impl SystemApi {
    /// Client with the default exception factory installed.
    pub fn new(config: impl Into<Arc<Configuration>>) -> Self {
        Self {
            config: config.into(),
            exception_factory: Some(default_exception_factory()),
        }
    }

    pub fn from_base_path(base_path: &str) -> Result<Self, ApiError> {
        let config = Configuration::builder().base_path(base_path).build()?;
        Ok(Self::new(config))
    }

    pub fn configuration(&self) -> &Configuration {
        &self.config
    }

    pub fn exception_factory(&self) -> Option<&ExceptionFactory> {
        self.exception_factory.as_ref()
    }

    /// Replace the exception factory. Only one factory is held at a time.
    pub fn set_exception_factory<F>(&mut self, factory: F)
    where
        F: Fn(&str, &HttpResponse) -> Option<ApiError> + Send + Sync + 'static,
    {
        self.exception_factory = Some(Arc::new(factory));
    }

    /// Remove the exception factory; every response is then deserialized.
    pub fn clear_exception_factory(&mut self) {
        self.exception_factory = None;
    }

    // -----------------------------------------------------------------------
    // Landing
    // -----------------------------------------------------------------------

    pub fn build_landing(&self) -> HttpRequest {
        self.build_get(LANDING_PATH)
    }

    pub fn parse_landing(&self, response: HttpResponse) -> Result<ApiResponse<SystemLanding>, ApiError> {
        self.parse(LANDING_OP, response)
    }

    /// Links to the other System resources.
    pub fn landing(&self) -> Result<SystemLanding, ApiError> {
        self.landing_with_http_info().map(ApiResponse::into_data)
    }

    pub fn landing_with_http_info(&self) -> Result<ApiResponse<SystemLanding>, ApiError> {
        self.call(LANDING_OP, self.build_landing())
    }

    pub async fn landing_async(&self, cancel: Option<&CancellationToken>) -> Result<SystemLanding, ApiError> {
        self.landing_with_http_info_async(cancel).await.map(ApiResponse::into_data)
    }

    pub async fn landing_with_http_info_async(
        &self,
        cancel: Option<&CancellationToken>,
    ) -> Result<ApiResponse<SystemLanding>, ApiError> {
        self.call_async(LANDING_OP, self.build_landing(), cancel).await
    }

    // -----------------------------------------------------------------------
    // Cache instances
    // -----------------------------------------------------------------------

    pub fn build_cache_instances(&self) -> HttpRequest {
        self.build_get(CACHE_INSTANCES_PATH)
    }

    pub fn parse_cache_instances(&self, response: HttpResponse) -> Result<ApiResponse<CacheInstances>, ApiError> {
        self.parse(CACHE_INSTANCES_OP, response)
    }

    /// AF cache instances currently held by the service, one per user.
    pub fn cache_instances(&self) -> Result<CacheInstances, ApiError> {
        self.cache_instances_with_http_info().map(ApiResponse::into_data)
    }

    pub fn cache_instances_with_http_info(&self) -> Result<ApiResponse<CacheInstances>, ApiError> {
        self.call(CACHE_INSTANCES_OP, self.build_cache_instances())
    }

    pub async fn cache_instances_async(
        &self,
        cancel: Option<&CancellationToken>,
    ) -> Result<CacheInstances, ApiError> {
        self.cache_instances_with_http_info_async(cancel)
            .await
            .map(ApiResponse::into_data)
    }

    pub async fn cache_instances_with_http_info_async(
        &self,
        cancel: Option<&CancellationToken>,
    ) -> Result<ApiResponse<CacheInstances>, ApiError> {
        self.call_async(CACHE_INSTANCES_OP, self.build_cache_instances(), cancel)
            .await
    }

    // -----------------------------------------------------------------------
    // Status
    // -----------------------------------------------------------------------

    pub fn build_status(&self) -> HttpRequest {
        self.build_get(STATUS_PATH)
    }

    pub fn parse_status(&self, response: HttpResponse) -> Result<ApiResponse<SystemStatus>, ApiError> {
        self.parse(STATUS_OP, response)
    }

    /// Uptime, run state and license state of the service.
    pub fn status(&self) -> Result<SystemStatus, ApiError> {
        self.status_with_http_info().map(ApiResponse::into_data)
    }

    pub fn status_with_http_info(&self) -> Result<ApiResponse<SystemStatus>, ApiError> {
        self.call(STATUS_OP, self.build_status())
    }

    pub async fn status_async(&self, cancel: Option<&CancellationToken>) -> Result<SystemStatus, ApiError> {
        self.status_with_http_info_async(cancel).await.map(ApiResponse::into_data)
    }

    pub async fn status_with_http_info_async(
        &self,
        cancel: Option<&CancellationToken>,
    ) -> Result<ApiResponse<SystemStatus>, ApiError> {
        self.call_async(STATUS_OP, self.build_status(), cancel).await
    }

    // -----------------------------------------------------------------------
    // User info
    // -----------------------------------------------------------------------

    pub fn build_user_info(&self) -> HttpRequest {
        self.build_get(USER_INFO_PATH)
    }

    pub fn parse_user_info(&self, response: HttpResponse) -> Result<ApiResponse<UserInfo>, ApiError> {
        self.parse(USER_INFO_OP, response)
    }

    /// Identity the service resolved for the credentials sent.
    pub fn user_info(&self) -> Result<UserInfo, ApiError> {
        self.user_info_with_http_info().map(ApiResponse::into_data)
    }

    pub fn user_info_with_http_info(&self) -> Result<ApiResponse<UserInfo>, ApiError> {
        self.call(USER_INFO_OP, self.build_user_info())
    }

    pub async fn user_info_async(&self, cancel: Option<&CancellationToken>) -> Result<UserInfo, ApiError> {
        self.user_info_with_http_info_async(cancel).await.map(ApiResponse::into_data)
    }

    pub async fn user_info_with_http_info_async(
        &self,
        cancel: Option<&CancellationToken>,
    ) -> Result<ApiResponse<UserInfo>, ApiError> {
        self.call_async(USER_INFO_OP, self.build_user_info(), cancel).await
    }

    // -----------------------------------------------------------------------
    // Versions
    // -----------------------------------------------------------------------

    pub fn build_versions(&self) -> HttpRequest {
        self.build_get(VERSIONS_PATH)
    }

    pub fn parse_versions(&self, response: HttpResponse) -> Result<ApiResponse<Versions>, ApiError> {
        self.parse(VERSIONS_OP, response)
    }

    /// Installed component versions keyed by component name.
    pub fn versions(&self) -> Result<Versions, ApiError> {
        self.versions_with_http_info().map(ApiResponse::into_data)
    }

    pub fn versions_with_http_info(&self) -> Result<ApiResponse<Versions>, ApiError> {
        self.call(VERSIONS_OP, self.build_versions())
    }

    pub async fn versions_async(&self, cancel: Option<&CancellationToken>) -> Result<Versions, ApiError> {
        self.versions_with_http_info_async(cancel).await.map(ApiResponse::into_data)
    }

    pub async fn versions_with_http_info_async(
        &self,
        cancel: Option<&CancellationToken>,
    ) -> Result<ApiResponse<Versions>, ApiError> {
        self.call_async(VERSIONS_OP, self.build_versions(), cancel).await
    }

    // -----------------------------------------------------------------------
    // Shared plumbing
    // -----------------------------------------------------------------------

    /// `Accept` and `User-Agent` first, then the configured default headers.
    /// A default `User-Agent` header replaces the configured user agent.
    fn build_get(&self, path: &str) -> HttpRequest {
        let defaults = self.config.default_headers();
        let mut headers = Vec::with_capacity(defaults.len() + 2);
        headers.push(("Accept".to_string(), "application/json".to_string()));
        if !defaults.iter().any(|(k, _)| k.eq_ignore_ascii_case("user-agent")) {
            headers.push(("User-Agent".to_string(), self.config.user_agent().to_string()));
        }
        headers.extend(defaults.iter().cloned());

        HttpRequest {
            method: HttpMethod::Get,
            path: format!("{}{path}", self.config.base_path()),
            headers,
            body: None,
        }
    }

    fn parse<T: DeserializeOwned>(&self, operation: &str, response: HttpResponse) -> Result<ApiResponse<T>, ApiError> {
        debug!(operation, status = response.status, "response received");

        if let Some(factory) = &self.exception_factory {
            if let Some(err) = factory(operation, &response) {
                warn!(operation, status = response.status, error = %err, "call failed");
                return Err(err);
            }
        }

        let data = serde_json::from_str(&response.body)?;
        Ok(ApiResponse {
            status_code: response.status,
            headers: collect_headers(&response.headers),
            data,
        })
    }

    fn call<T: DeserializeOwned>(&self, operation: &str, request: HttpRequest) -> Result<ApiResponse<T>, ApiError> {
        debug!(operation, path = %request.path, "calling");
        let response = self.config.transport().execute(request)?;
        self.parse(operation, response)
    }

    async fn call_async<T: DeserializeOwned>(
        &self,
        operation: &str,
        request: HttpRequest,
        cancel: Option<&CancellationToken>,
    ) -> Result<ApiResponse<T>, ApiError> {
        debug!(operation, path = %request.path, "calling");
        let transport = self.config.async_transport();
        let response = match cancel {
            Some(token) => tokio::select! {
                biased;
                () = token.cancelled() => {
                    debug!(operation, "cancelled before response");
                    return Err(ApiError::Cancelled);
                }
                result = transport.execute_async(request) => result?,
            },
            None => transport.execute_async(request).await?,
        };
        self.parse(operation, response)
    }
}

impl std::fmt::Debug for SystemApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SystemApi")
            .field("config", &self.config)
            .field("exception_factory", &self.exception_factory.is_some())
            .finish()
    }
}
