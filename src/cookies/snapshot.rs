use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Version written into new snapshots.
pub const SNAPSHOT_VERSION: &str = "tough-cookie@2.3.2";
/// Store type written into new snapshots.
pub const SNAPSHOT_STORE_TYPE: &str = "MemoryCookieStore";

/// A portable copy of a cookie jar. This is the layout of the saved cookie file.
///
/// All four fields are required. A value missing any of them is not a snapshot.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CookieJarSnapshot {
    pub version: String,
    pub store_type: String,
    pub reject_public_suffixes: bool,
    pub cookies: Vec<CookieRecord>,
}

impl CookieJarSnapshot {
    /// Creates a snapshot from a set of cookies.
    pub fn new(cookies: Vec<CookieRecord>) -> Self {
        Self {
            version: SNAPSHOT_VERSION.into(),
            store_type: SNAPSHOT_STORE_TYPE.into(),
            reject_public_suffixes: true,
            cookies,
        }
    }

    /// Reads a snapshot from an arbitrary JSON value. Returns `None` if any required field is
    /// missing or malformed.
    pub fn from_value(value: &Value) -> Option<Self> {
        match serde_json::from_value::<Self>(value.clone()) {
            Ok(snapshot) => Some(snapshot),
            Err(error) => {
                log::debug!("Ignoring cookie jar snapshot: {error}");
                None
            },
        }
    }
}

/// A single cookie.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CookieRecord {
    pub key: String,
    #[serde(default)]
    pub value: String,
    /// The domain without a leading dot.
    pub domain: String,
    #[serde(default = "default_path")]
    pub path: String,
    /// When the cookie expires. `None` for session cookies.
    #[serde(default, with = "crate::serializers::expires")]
    pub expires: Option<DateTime<Utc>>,
    #[serde(default)]
    pub secure: bool,
    #[serde(default)]
    pub http_only: bool,
    /// Whether the cookie only matches its exact domain, not subdomains.
    #[serde(default)]
    pub host_only: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_accessed: Option<DateTime<Utc>>,
    /// Fields not understood by this crate. Kept so that files round trip.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_path() -> String {
    String::from("/")
}

impl CookieRecord {
    /// Whether the cookie has expired at `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires.is_some_and(|expires| expires <= now)
    }

    /// Whether the cookie should be sent to `host`.
    pub fn domain_matches(&self, host: &str) -> bool {
        let host = host.to_ascii_lowercase();

        if self.host_only {
            return host == self.domain;
        }

        host == self.domain || host
            .strip_suffix(&self.domain)
            .is_some_and(|prefix| prefix.ends_with('.'))
    }

    /// Whether the cookie should be sent for `request_path`.
    pub fn path_matches(&self, request_path: &str) -> bool {
        if request_path == self.path {
            return true;
        }

        request_path.starts_with(&self.path) && (
            self.path.ends_with('/') ||
            request_path[self.path.len()..].starts_with('/')
        )
    }
}
