//! Cookie jar which can be saved and restored between runs.
//!
//! reqwest's own jar can't be read back out, so the client is given this jar instead.

mod file;
mod snapshot;

pub use file::{load_cookie_jar, save_cookie_jar};
pub use snapshot::{CookieJarSnapshot, CookieRecord, SNAPSHOT_STORE_TYPE, SNAPSHOT_VERSION};

use std::sync::RwLock;
use chrono::{DateTime, Duration, Utc};
use reqwest::cookie::CookieStore;
use reqwest::header::HeaderValue;
use serde_json::Map;
use url::Url;

/// Holds the cookies for a session.
#[derive(Debug, Default)]
pub struct CookieJar {
    cookies: RwLock<Vec<CookieRecord>>,
}

impl CookieJar {
    /// Creates an empty jar.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a jar holding the cookies in `snapshot`.
    pub fn from_snapshot(snapshot: CookieJarSnapshot) -> Self {
        let jar = Self::new();

        jar.restore(snapshot);
        jar
    }

    /// Adds a cookie in `Set-Cookie` format as if it was received from `url`.
    pub fn add_cookie_str(&self, cookie: &str, url: &Url) {
        if let Some(record) = parse_set_cookie(cookie, url, Utc::now()) {
            self.insert(record, Utc::now());
        }
    }

    /// Copies the current cookies into a snapshot.
    pub fn snapshot(&self) -> CookieJarSnapshot {
        CookieJarSnapshot::new(self.cookies.read().unwrap().clone())
    }

    /// Replaces all cookies with the cookies in `snapshot`.
    pub fn restore(&self, snapshot: CookieJarSnapshot) {
        *self.cookies.write().unwrap() = snapshot.cookies;
    }

    /// Removes all cookies.
    pub fn clear(&self) {
        self.cookies.write().unwrap().clear();
    }

    /// The number of cookies held.
    pub fn len(&self) -> usize {
        self.cookies.read().unwrap().len()
    }

    /// Whether the jar holds no cookies.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn insert(&self, record: CookieRecord, now: DateTime<Utc>) {
        let mut cookies = self.cookies.write().unwrap();
        let existing = cookies
            .iter()
            .position(|cookie| {
                cookie.key == record.key &&
                cookie.domain == record.domain &&
                cookie.path == record.path
            });
        let creation = existing
            .and_then(|index| cookies[index].creation)
            .or(record.creation);

        if let Some(index) = existing {
            cookies.remove(index);
        }

        // An expiry in the past deletes the cookie.
        if !record.is_expired(now) {
            cookies.push(CookieRecord {
                creation,
                ..record
            });
        }
    }

    fn matching(&self, url: &Url, now: DateTime<Utc>) -> Vec<(String, String)> {
        let Some(host) = url.host_str() else {
            return Vec::new();
        };
        let is_secure = url.scheme() == "https";

        self.cookies
            .read()
            .unwrap()
            .iter()
            .filter(|cookie| !cookie.is_expired(now))
            .filter(|cookie| !cookie.secure || is_secure)
            .filter(|cookie| cookie.domain_matches(host))
            .filter(|cookie| cookie.path_matches(url.path()))
            .map(|cookie| (cookie.key.clone(), cookie.value.clone()))
            .collect()
    }
}

impl CookieStore for CookieJar {
    fn set_cookies(&self, cookie_headers: &mut dyn Iterator<Item = &HeaderValue>, url: &Url) {
        let now = Utc::now();

        for header in cookie_headers {
            let Ok(cookie) = header.to_str() else {
                continue;
            };

            if let Some(record) = parse_set_cookie(cookie, url, now) {
                self.insert(record, now);
            }
        }
    }

    fn cookies(&self, url: &Url) -> Option<HeaderValue> {
        let cookies = self.matching(url, Utc::now());

        if cookies.is_empty() {
            return None;
        }

        let header = cookies
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect::<Vec<_>>()
            .join("; ");

        HeaderValue::from_str(&header).ok()
    }
}

/// The path a cookie defaults to when it has no `Path` attribute.
fn default_cookie_path(url: &Url) -> String {
    let path = url.path();

    match path.rfind('/') {
        Some(0) | None => String::from("/"),
        Some(index) => path[..index].to_string(),
    }
}

/// Parses a `Set-Cookie` header value received from `url`.
fn parse_set_cookie(cookie: &str, url: &Url, now: DateTime<Utc>) -> Option<CookieRecord> {
    let host = url.host_str()?.to_ascii_lowercase();
    let mut parts = cookie.split(';');
    let (key, value) = parts.next()?.split_once('=')?;
    let key = key.trim();

    if key.is_empty() {
        return None;
    }

    let mut record = CookieRecord {
        key: key.to_string(),
        value: value.trim().trim_matches('"').to_string(),
        domain: host.clone(),
        path: default_cookie_path(url),
        expires: None,
        secure: false,
        http_only: false,
        host_only: true,
        creation: Some(now),
        last_accessed: Some(now),
        extra: Map::new(),
    };
    let mut max_age = None;

    for attribute in parts {
        let (name, value) = match attribute.split_once('=') {
            Some((name, value)) => (name.trim(), value.trim()),
            None => (attribute.trim(), ""),
        };

        match name.to_ascii_lowercase().as_str() {
            "domain" if !value.is_empty() => {
                let domain = value.trim_start_matches('.').to_ascii_lowercase();

                // Cookies can't be set for a domain the response didn't come from.
                if host != domain && !host.ends_with(&format!(".{domain}")) {
                    return None;
                }

                record.domain = domain;
                record.host_only = false;
            },
            "path" if value.starts_with('/') => {
                record.path = value.to_string();
            },
            "expires" => {
                if let Ok(expires) = DateTime::parse_from_rfc2822(value) {
                    record.expires = Some(expires.with_timezone(&Utc));
                }
            },
            "max-age" => {
                max_age = value.parse::<i64>().ok();
            },
            "secure" => {
                record.secure = true;
            },
            "httponly" => {
                record.http_only = true;
            },
            _ => {},
        }
    }

    // Max-Age takes precedence over Expires.
    if let Some(seconds) = max_age {
        record.expires = Duration::try_seconds(seconds)
            .and_then(|max_age| now.checked_add_signed(max_age));
    }

    Some(record)
}
