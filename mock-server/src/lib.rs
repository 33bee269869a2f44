//! Stand-in for the PI Web API System controller.
//!
//! Serves the five read-only System endpoints from a `Fixture`. The DTOs here
//! are defined independently of the client crate so integration tests catch
//! schema drift between the two.

use std::{collections::BTreeMap, sync::Arc, time::Duration};

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tokio::net::TcpListener;

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Links {
    #[serde(rename = "Self")]
    pub self_link: String,
    pub cache_instances: String,
    pub configuration: String,
    pub user_info: String,
    pub versions: String,
    pub status: String,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Landing {
    pub links: Links,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CacheInstance {
    pub id: String,
    pub last_refresh_time: String,
    pub will_refresh_after: String,
    pub scheduled_expiration_time: String,
    pub user: String,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CacheInstances {
    pub items: Vec<CacheInstance>,
    pub links: BTreeMap<String, String>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Status {
    pub up_time_in_minutes: f64,
    pub state: String,
    pub is_licensed: bool,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct UserInfo {
    pub identity_type: String,
    pub name: String,
    pub is_authenticated: bool,
    #[serde(rename = "SID")]
    pub sid: String,
    pub impersonation_level: String,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Version {
    pub full_version: String,
    pub major_minor_revision: String,
    pub build: String,
}

impl Version {
    /// Split `1.13.0.6518` into `1.13.0` and build `6518`.
    pub fn from_full(full: &str) -> Self {
        let (mmr, build) = full.rsplit_once('.').unwrap_or((full, ""));
        Self {
            full_version: full.to_string(),
            major_minor_revision: mmr.to_string(),
            build: build.to_string(),
        }
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct WebException {
    pub status_code: u16,
    pub errors: Vec<String>,
}

/// Data served by the mock and the failure knobs tests turn.
#[derive(Clone, Debug)]
pub struct Fixture {
    pub cache_instances: Vec<CacheInstance>,
    pub status: Status,
    pub user: UserInfo,
    /// Component name to full version string.
    pub versions: BTreeMap<String, String>,
    /// Answer every route with this status and a `WebException` body.
    pub fail_with: Option<u16>,
    /// Delay before every answer.
    pub latency: Option<Duration>,
}

impl Default for Fixture {
    fn default() -> Self {
        Self {
            cache_instances: vec![CacheInstance {
                id: "4d2c0b1e-2f60-4c83-9f52-3e9b2f7a0c11".to_string(),
                last_refresh_time: "2026-10-18T08:00:00Z".to_string(),
                will_refresh_after: "2026-10-18T08:05:00Z".to_string(),
                scheduled_expiration_time: "2026-10-18T09:00:00Z".to_string(),
                user: "CORP\\svc-historian".to_string(),
            }],
            status: Status {
                up_time_in_minutes: 1440.5,
                state: "Running".to_string(),
                is_licensed: true,
            },
            user: UserInfo {
                identity_type: "WindowsIdentity".to_string(),
                name: "CORP\\svc-historian".to_string(),
                is_authenticated: true,
                sid: "S-1-5-21-1004336348-1177238915-682003330-512".to_string(),
                impersonation_level: "Impersonation".to_string(),
            },
            versions: BTreeMap::from([
                ("OSIsoft.REST.Core".to_string(), "1.13.0.6518".to_string()),
                ("PIWebAPI".to_string(), "1.13.0.6518".to_string()),
            ]),
            fail_with: None,
            latency: None,
        }
    }
}

pub type Shared = Arc<Fixture>;

pub fn app() -> Router {
    app_with(Fixture::default())
}

pub fn app_with(fixture: Fixture) -> Router {
    Router::new()
        .route("/system", get(landing))
        .route("/system/cacheinstances", get(cache_instances))
        .route("/system/status", get(status))
        .route("/system/userinfo", get(user_info))
        .route("/system/versions", get(versions))
        .with_state(Arc::new(fixture))
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    run_with(listener, Fixture::default()).await
}

pub async fn run_with(listener: TcpListener, fixture: Fixture) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with(fixture)).await
}

async fn answer<T: Serialize>(fixture: &Fixture, route: &str, body: T) -> Response {
    if let Some(delay) = fixture.latency {
        tokio::time::sleep(delay).await;
    }
    if let Some(code) = fixture.fail_with {
        let status = StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        tracing::debug!(route, status = code, "forced failure");
        let exception = WebException {
            status_code: status.as_u16(),
            errors: vec![format!("{route} is unavailable")],
        };
        return (status, Json(exception)).into_response();
    }
    tracing::debug!(route, "ok");
    Json(body).into_response()
}

async fn landing(State(fixture): State<Shared>, headers: HeaderMap) -> Response {
    let host = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("localhost");
    let base = format!("http://{host}/system");
    let body = Landing {
        links: Links {
            self_link: base.clone(),
            cache_instances: format!("{base}/cacheinstances"),
            configuration: format!("{base}/configuration"),
            user_info: format!("{base}/userinfo"),
            versions: format!("{base}/versions"),
            status: format!("{base}/status"),
        },
    };
    answer(&fixture, "/system", body).await
}

async fn cache_instances(State(fixture): State<Shared>) -> Response {
    let body = CacheInstances {
        items: fixture.cache_instances.clone(),
        links: BTreeMap::new(),
    };
    answer(&fixture, "/system/cacheinstances", body).await
}

async fn status(State(fixture): State<Shared>) -> Response {
    answer(&fixture, "/system/status", fixture.status.clone()).await
}

async fn user_info(State(fixture): State<Shared>) -> Response {
    answer(&fixture, "/system/userinfo", fixture.user.clone()).await
}

async fn versions(State(fixture): State<Shared>) -> Response {
    let body: BTreeMap<&str, Version> = fixture
        .versions
        .iter()
        .map(|(name, full)| (name.as_str(), Version::from_full(full)))
        .collect();
    answer(&fixture, "/system/versions", body).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_splits_build_number() {
        let v = Version::from_full("1.13.0.6518");
        assert_eq!(v.major_minor_revision, "1.13.0");
        assert_eq!(v.build, "6518");
    }

    #[test]
    fn version_without_build_keeps_full_string() {
        let v = Version::from_full("1");
        assert_eq!(v.major_minor_revision, "1");
        assert_eq!(v.build, "");
    }

    #[test]
    fn links_serialize_with_self_key() {
        let landing = Landing {
            links: Links {
                self_link: "http://h/system".to_string(),
                cache_instances: String::new(),
                configuration: String::new(),
                user_info: String::new(),
                versions: String::new(),
                status: String::new(),
            },
        };
        let json = serde_json::to_value(&landing).unwrap();
        assert_eq!(json["Links"]["Self"], "http://h/system");
        assert!(json["Links"].get("UserInfo").is_some());
    }

    #[test]
    fn user_info_serializes_sid_uppercase() {
        let json = serde_json::to_value(Fixture::default().user).unwrap();
        assert!(json.get("SID").is_some());
        assert!(json.get("Sid").is_none());
    }
}
