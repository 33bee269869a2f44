//! Client configuration shared by every call.
//!
//! # Design
//! A `Configuration` is built once and then only read: `SystemApi` holds it
//! behind an `Arc`, so clones of the client and concurrent calls share the
//! same base path, default headers and transport. The transport is stored
//! twice, once per face, but both handles point at the same object.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::error::ApiError;
use crate::transport::{AsyncTransport, HttpTransport, Transport};

pub const DEFAULT_BASE_PATH: &str = "http://localhost/piwebapi";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(100);

pub const ENV_BASE_URL: &str = "PIWEBAPI_BASE_URL";
pub const ENV_TIMEOUT_SECS: &str = "PIWEBAPI_TIMEOUT_SECS";

/// Request defaults and the shared transport.
#[derive(Clone)]
pub struct Configuration {
    base_path: String,
    default_headers: Vec<(String, String)>,
    user_agent: String,
    timeout: Duration,
    transport: Arc<dyn Transport>,
    async_transport: Arc<dyn AsyncTransport>,
}

impl Configuration {
    pub fn builder() -> ConfigurationBuilder {
        ConfigurationBuilder::default()
    }

    /// Defaults overridden by `PIWEBAPI_BASE_URL` and `PIWEBAPI_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self, ApiError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ApiError> {
        let mut builder = Self::builder();
        if let Some(url) = lookup(ENV_BASE_URL) {
            builder = builder.base_path(&url);
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            let secs: u64 = raw
                .trim()
                .parse()
                .map_err(|_| ApiError::Config(format!("{ENV_TIMEOUT_SECS} is not a number of seconds: {raw:?}")))?;
            builder = builder.timeout(Duration::from_secs(secs));
        }
        builder.build()
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    pub fn default_headers(&self) -> &[(String, String)] {
        &self.default_headers
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn transport(&self) -> &dyn Transport {
        self.transport.as_ref()
    }

    pub fn async_transport(&self) -> &dyn AsyncTransport {
        self.async_transport.as_ref()
    }
}

impl fmt::Debug for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Configuration")
            .field("base_path", &self.base_path)
            .field("default_headers", &self.default_headers)
            .field("user_agent", &self.user_agent)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

fn default_user_agent() -> String {
    format!("piwebapi-system/{}", env!("CARGO_PKG_VERSION"))
}

/// Scheme compared case-insensitively, as URL schemes are.
fn has_http_scheme(url: &str) -> bool {
    url.split_once("://").is_some_and(|(scheme, _)| {
        scheme.eq_ignore_ascii_case("http") || scheme.eq_ignore_ascii_case("https")
    })
}

type TransportPair = (Arc<dyn Transport>, Arc<dyn AsyncTransport>);

/// Chained setters for `Configuration`.
#[derive(Default)]
pub struct ConfigurationBuilder {
    base_path: Option<String>,
    default_headers: Vec<(String, String)>,
    user_agent: Option<String>,
    timeout: Option<Duration>,
    transport: Option<TransportPair>,
}

impl ConfigurationBuilder {
    pub fn base_path(mut self, base_path: &str) -> Self {
        self.base_path = Some(base_path.trim_end_matches('/').to_string());
        self
    }

    /// Append a header sent with every request.
    pub fn default_header(mut self, name: &str, value: &str) -> Self {
        self.default_headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn user_agent(mut self, user_agent: &str) -> Self {
        self.user_agent = Some(user_agent.to_string());
        self
    }

    /// Request timeout for the bundled transport. Custom transports enforce
    /// their own.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Use `transport` for both blocking and async calls.
    pub fn transport<T>(mut self, transport: T) -> Self
    where
        T: Transport + AsyncTransport + 'static,
    {
        let shared = Arc::new(transport);
        self.transport = Some((shared.clone() as Arc<dyn Transport>, shared as Arc<dyn AsyncTransport>));
        self
    }

    pub fn build(self) -> Result<Configuration, ApiError> {
        let base_path = self.base_path.unwrap_or_else(|| DEFAULT_BASE_PATH.to_string());
        if !has_http_scheme(&base_path) {
            return Err(ApiError::Config(format!(
                "base path must be an http(s) URL: {base_path:?}"
            )));
        }

        let timeout = self.timeout.unwrap_or(DEFAULT_TIMEOUT);
        if timeout.is_zero() {
            return Err(ApiError::Config("timeout must be greater than zero".to_string()));
        }

        let (transport, async_transport) = match self.transport {
            Some(pair) => pair,
            None => {
                let shared = Arc::new(HttpTransport::new(timeout)?);
                (shared.clone() as Arc<dyn Transport>, shared as Arc<dyn AsyncTransport>)
            }
        };

        Ok(Configuration {
            base_path,
            default_headers: self.default_headers,
            user_agent: self.user_agent.unwrap_or_else(default_user_agent),
            timeout,
            transport,
            async_transport,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn defaults() {
        let config = Configuration::builder().build().unwrap();
        assert_eq!(config.base_path(), DEFAULT_BASE_PATH);
        assert_eq!(config.timeout(), DEFAULT_TIMEOUT);
        assert!(config.default_headers().is_empty());
        assert!(config.user_agent().starts_with("piwebapi-system/"));
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let config = Configuration::builder()
            .base_path("https://pi.example.com/piwebapi/")
            .build()
            .unwrap();
        assert_eq!(config.base_path(), "https://pi.example.com/piwebapi");
    }

    #[test]
    fn default_headers_keep_insertion_order() {
        let config = Configuration::builder()
            .default_header("Authorization", "Basic abc")
            .default_header("X-Requested-With", "piwebapi-system")
            .build()
            .unwrap();
        assert_eq!(
            config.default_headers(),
            &[
                ("Authorization".to_string(), "Basic abc".to_string()),
                ("X-Requested-With".to_string(), "piwebapi-system".to_string()),
            ]
        );
    }

    #[test]
    fn rejects_non_http_base_path() {
        let err = Configuration::builder().base_path("ftp://pi").build().unwrap_err();
        assert!(matches!(err, ApiError::Config(_)));
    }

    #[test]
    fn scheme_check_ignores_case() {
        let config = Configuration::builder()
            .base_path("HTTPS://PI.example.com/piwebapi")
            .build()
            .unwrap();
        assert_eq!(config.base_path(), "HTTPS://PI.example.com/piwebapi");
        assert!(Configuration::builder().base_path("Http://pi").build().is_ok());
        assert!(Configuration::builder().base_path("pi.example.com/piwebapi").build().is_err());
        assert!(Configuration::builder().base_path("httpx://pi").build().is_err());
    }

    #[test]
    fn rejects_zero_timeout() {
        let err = Configuration::builder().timeout(Duration::ZERO).build().unwrap_err();
        assert!(matches!(err, ApiError::Config(_)));
    }

    #[test]
    fn env_overrides_defaults() {
        let config = Configuration::from_lookup(lookup(&[
            (ENV_BASE_URL, "https://historian:8443/piwebapi/"),
            (ENV_TIMEOUT_SECS, " 15 "),
        ]))
        .unwrap();
        assert_eq!(config.base_path(), "https://historian:8443/piwebapi");
        assert_eq!(config.timeout(), Duration::from_secs(15));
    }

    #[test]
    fn env_absent_uses_defaults() {
        let config = Configuration::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.base_path(), DEFAULT_BASE_PATH);
    }

    #[test]
    fn env_bad_timeout_is_config_error() {
        let err = Configuration::from_lookup(lookup(&[(ENV_TIMEOUT_SECS, "soon")])).unwrap_err();
        assert!(matches!(err, ApiError::Config(msg) if msg.contains(ENV_TIMEOUT_SECS)));
    }
}
