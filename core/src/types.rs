//! Payload models for the System controller.
//!
//! # Design
//! Field names follow the service's PascalCase JSON. Every field the service
//! may omit is optional or defaulted, and unknown fields are ignored so newer
//! servers do not break older clients. The mock-server crate defines its own
//! copies of these shapes; integration tests catch drift between the two.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Error details the service can embed in any payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct WebException {
    pub status_code: Option<i32>,
    pub errors: Vec<String>,
}

/// Navigation links returned by `GET /system`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct SystemLinks {
    #[serde(rename = "Self")]
    pub self_link: Option<String>,
    pub cache_instances: Option<String>,
    pub configuration: Option<String>,
    pub user_info: Option<String>,
    pub versions: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct SystemLanding {
    pub links: SystemLinks,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub web_exception: Option<WebException>,
}

/// One server-side AF cache instance, keyed by the user it was built for.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct CacheInstance {
    pub id: Option<String>,
    pub last_refresh_time: Option<String>,
    pub will_refresh_after: Option<String>,
    pub scheduled_expiration_time: Option<String>,
    pub user: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub web_exception: Option<WebException>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct PaginationLinks {
    pub first: Option<String>,
    pub previous: Option<String>,
    pub next: Option<String>,
    pub last: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct CacheInstances {
    pub items: Vec<CacheInstance>,
    pub links: PaginationLinks,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub web_exception: Option<WebException>,
}

/// Uptime and run state returned by `GET /system/status`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct SystemStatus {
    pub up_time_in_minutes: Option<f64>,
    pub state: Option<String>,
    pub is_licensed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub web_exception: Option<WebException>,
}

/// Identity the service resolved for the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct UserInfo {
    pub identity_type: Option<String>,
    pub name: Option<String>,
    pub is_authenticated: Option<bool>,
    #[serde(rename = "SID")]
    pub sid: Option<String>,
    pub impersonation_level: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub web_exception: Option<WebException>,
}

/// Version of one installed component.
///
/// Accepts both the detailed object and a bare version string; a bare
/// string fills `full_version` and `major_minor_revision`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", from = "VersionRepr")]
pub struct Version {
    pub full_version: Option<String>,
    pub major_minor_revision: Option<String>,
    pub build: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub web_exception: Option<WebException>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum VersionRepr {
    Bare(String),
    Detailed(VersionFields),
}

#[derive(Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
struct VersionFields {
    full_version: Option<String>,
    major_minor_revision: Option<String>,
    build: Option<String>,
    web_exception: Option<WebException>,
}

impl From<VersionRepr> for Version {
    fn from(repr: VersionRepr) -> Self {
        match repr {
            VersionRepr::Bare(v) => Version {
                full_version: Some(v.clone()),
                major_minor_revision: Some(v),
                build: None,
                web_exception: None,
            },
            VersionRepr::Detailed(f) => Version {
                full_version: f.full_version,
                major_minor_revision: f.major_minor_revision,
                build: f.build,
                web_exception: f.web_exception,
            },
        }
    }
}

/// Component name to installed version, as returned by `GET /system/versions`.
pub type Versions = BTreeMap<String, Version>;
