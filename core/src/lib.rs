//! Client for the PI Web API System controller.
//!
//! # Overview
//! Five read-only endpoints (`/system`, `/system/cacheinstances`,
//! `/system/status`, `/system/userinfo`, `/system/versions`), each available
//! as a blocking call, a blocking call returning the full response, and the
//! async, cancelable versions of both.
//!
//! # Design
//! - `SystemApi` holds a shared, read-only `Configuration` and one optional
//!   exception factory. It carries no other state between calls.
//! - Each operation is split into `build_*` (produces request) and
//!   `parse_*` (consumes response); the configured `Transport` runs between
//!   them, so tests and hosts can supply their own I/O.
//! - Status codes are data until the exception factory says otherwise.

pub mod client;
pub mod config;
pub mod error;
pub mod exception;
pub mod http;
pub mod response;
pub mod transport;
pub mod types;

pub use client::SystemApi;
pub use config::{Configuration, ConfigurationBuilder};
pub use error::ApiError;
pub use exception::{default_exception_factory, ExceptionFactory};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use response::{ApiResponse, Headers};
pub use transport::{AsyncTransport, HttpTransport, Transport};
pub use types::{
    CacheInstance, CacheInstances, PaginationLinks, SystemLanding, SystemLinks, SystemStatus, UserInfo, Version,
    Versions, WebException,
};

pub use tokio_util::sync::CancellationToken;
