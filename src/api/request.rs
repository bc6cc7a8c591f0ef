//! Models for making requests.

use crate::enums::HttpMethod;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::Serialize;
use serde_json::Value;

/// One logical call to the service.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestSpec {
    /// Path relative to the session's API URL.
    pub path: String,
    /// The verb sent in the override header. Defaults to GET.
    pub method: HttpMethod,
    /// Query parameters, in order.
    pub query: Vec<(String, String)>,
    /// JSON body.
    pub body: Option<Value>,
    /// Headers for this request. These take precedence over the session's headers.
    pub headers: HeaderMap,
}

impl RequestSpec {
    /// A GET request to `path`.
    pub fn get<P>(path: P) -> Self
    where
        P: Into<String>,
    {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    /// A request to `path` with the given verb.
    pub fn with_method<P>(method: HttpMethod, path: P) -> Self
    where
        P: Into<String>,
    {
        Self {
            path: path.into(),
            method,
            ..Default::default()
        }
    }

    /// Adds a query parameter.
    pub fn query<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: ToString,
    {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Sets the JSON body.
    pub fn json<T>(mut self, body: &T) -> Result<Self, serde_json::Error>
    where
        T: Serialize + ?Sized,
    {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    /// Adds a header.
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }
}

/// The request as it was sent, attached to API errors.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestContext {
    pub url: String,
    pub method: HttpMethod,
    /// The request's own headers including the override header. Session headers are left out.
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
}
