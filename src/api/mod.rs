//! Sends requests for a session and sorts out what came back.
//!
//! Every request is sent as a POST. The intended verb goes in the `X-HTTP-Method-Override`
//! header, which is what the service expects.

mod envelope;
mod request;
pub mod operations;
pub mod urls;

pub use request::{RequestContext, RequestSpec};

use envelope::ApiErrorEnvelope;
use crate::error::{ApiError, Error, Result};
use crate::session::SessionHandle;
use reqwest::StatusCode;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use serde_json::Value;

/// The header carrying the intended verb.
pub const METHOD_OVERRIDE_HEADER: HeaderName = HeaderName::from_static("x-http-method-override");

/// Sends `request` with the session in `handle` and returns the response body.
///
/// The request is sent exactly once. Errors are, in order of precedence:
/// - [`Error::Reqwest`] if the request could not be sent.
/// - [`Error::Unauthorized`] for a 401 response, whatever the body.
/// - [`Error::NotFound`] for a 404 response.
/// - [`Error::Api`] if the body is an error from the service itself.
/// - [`Error::Http`] for any other unsuccessful status.
pub async fn dispatch(
    handle: &SessionHandle,
    request: &RequestSpec,
) -> Result<Value> {
    let url = handle.url(&request.path)?;
    let headers = request_headers(request);
    let mut builder = handle.client.post(url.clone())
        .headers(handle.headers.clone())
        .headers(headers.clone());

    if !request.query.is_empty() {
        builder = builder.query(&request.query);
    }

    if let Some(body) = &request.body {
        builder = builder
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .body(serde_json::to_vec(body)?);
    }

    log::debug!("{} {}", request.method, url);

    let response = builder.send().await?;
    let status = response.status();
    let body = response.bytes().await?;

    classify_response(status, &body, || RequestContext {
        url: url.to_string(),
        method: request.method,
        headers: headers
            .iter()
            .map(|(name, value)| {
                (name.to_string(), String::from_utf8_lossy(value.as_bytes()).into_owned())
            })
            .collect(),
        body: request.body.clone(),
    })
}

/// The request's own headers plus the override header.
fn request_headers(request: &RequestSpec) -> HeaderMap {
    let mut headers = request.headers.clone();
    let method: &'static str = request.method.into();

    headers.insert(METHOD_OVERRIDE_HEADER, HeaderValue::from_static(method));
    headers
}

/// Turns a response into a body or an error. `context` is only built when an API error is found.
pub(crate) fn classify_response<F>(
    status: StatusCode,
    body: &[u8],
    context: F,
) -> Result<Value>
where
    F: FnOnce() -> RequestContext,
{
    let reason = || status.canonical_reason().unwrap_or_default().to_string();

    match status {
        StatusCode::UNAUTHORIZED => return Err(Error::Unauthorized(reason())),
        StatusCode::NOT_FOUND => return Err(Error::NotFound(reason())),
        _ => {},
    }

    let parsed = if body.iter().all(u8::is_ascii_whitespace) {
        Ok(Value::Null)
    } else {
        serde_json::from_slice::<Value>(body)
    };

    if let Ok(value) = &parsed {
        if let Some(envelope) = ApiErrorEnvelope::from_body(value) {
            return Err(ApiError {
                code: envelope.code,
                reason: envelope.reason,
                message: envelope.message,
                body: value.clone(),
                request: context(),
            }.into());
        }
    }

    if !status.is_success() {
        return Err(Error::Http(status));
    }

    Ok(parsed?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cookies::CookieJar;
    use crate::enums::HttpMethod;
    use crate::helpers::{get_default_client, USER_AGENT_STRING};
    use crate::session::LoginResponse;
    use std::sync::Arc;
    use serde_json::json;
    use crate::test_helpers::serve_once;

    fn context() -> RequestContext {
        RequestContext {
            url: String::from("https://utas.fut.ea.com/ut/game/fifa17/trade/55/bid"),
            method: HttpMethod::Put,
            headers: Vec::new(),
            body: Some(json!({ "bid": 150 })),
        }
    }

    #[test]
    fn unauthorized_wins_over_body() {
        let body = br#"{"code":"470","reason":"Not enough credits"}"#;
        let error = classify_response(StatusCode::UNAUTHORIZED, body, context).unwrap_err();

        assert!(matches!(error, Error::Unauthorized(_)));
    }

    #[test]
    fn not_found() {
        let error = classify_response(StatusCode::NOT_FOUND, b"", context).unwrap_err();

        assert!(matches!(error, Error::NotFound(_)));
    }

    #[test]
    fn envelope_in_success_response_is_api_error() {
        let body = br#"{"code":"470","reason":"Not enough credits","message":null}"#;
        let error = classify_response(StatusCode::OK, body, context).unwrap_err();

        assert_eq!(error.api_code(), Some(470));

        match error {
            Error::Api(error) => {
                assert_eq!(error.request, context());
                assert_eq!(error.body["reason"], "Not enough credits");
            },
            error => panic!("Expected API error, got {error}"),
        }
    }

    #[test]
    fn envelope_in_error_response_is_api_error() {
        let body = br#"{"code":461,"reason":"Permission denied"}"#;
        let error = classify_response(StatusCode::from_u16(458).unwrap(), body, context).unwrap_err();

        assert_eq!(error.api_code(), Some(461));
    }

    #[test]
    fn other_error_status_is_http_error() {
        let error = classify_response(StatusCode::INTERNAL_SERVER_ERROR, b"<html></html>", context).unwrap_err();

        assert!(matches!(error, Error::Http(StatusCode::INTERNAL_SERVER_ERROR)));
    }

    #[test]
    fn success_returns_body() {
        let body = classify_response(StatusCode::OK, br#"{"credits":1000}"#, context).unwrap();

        assert_eq!(body, json!({ "credits": 1000 }));
        assert_eq!(classify_response(StatusCode::OK, b"", context).unwrap(), Value::Null);
    }

    #[test]
    fn unparseable_success_body_is_parse_error() {
        let error = classify_response(StatusCode::OK, b"<html>", context).unwrap_err();

        assert!(matches!(error, Error::Parse(_)));
    }

    #[test]
    fn override_header_carries_method() {
        let request = RequestSpec::with_method(HttpMethod::Delete, "trade/sold");
        let headers = request_headers(&request);

        assert_eq!(headers.get(METHOD_OVERRIDE_HEADER).unwrap(), "DELETE");
    }

    fn handle(api_url: &str) -> SessionHandle {
        let client = get_default_client(Arc::new(CookieJar::new()), USER_AGENT_STRING).unwrap();
        let mut headers = HeaderMap::new();

        headers.insert("X-UT-SID", HeaderValue::from_static("session-id"));

        SessionHandle::new(client, LoginResponse {
            api_url: api_url.parse().unwrap(),
            headers,
        })
    }

    #[tokio::test]
    async fn sends_post_with_method_override() {
        let (api_url, server) = serve_once("200 OK", r#"{"credits":1000}"#).await;
        let handle = handle(&api_url);
        let request = RequestSpec::with_method(HttpMethod::Put, "trade/55/bid")
            .json(&json!({ "bid": 150 }))
            .unwrap();
        let body = dispatch(&handle, &request).await.unwrap();
        let received = server.await.unwrap();
        let lowercase = received.to_ascii_lowercase();

        assert_eq!(body, json!({ "credits": 1000 }));
        assert!(received.starts_with("POST /ut/game/fifa17/trade/55/bid HTTP/1.1"));
        assert!(lowercase.contains("x-http-method-override: put"));
        assert!(lowercase.contains("x-ut-sid: session-id"));
        assert!(received.ends_with(r#"{"bid":150}"#));
    }

    #[tokio::test]
    async fn sends_query_parameters() {
        let (api_url, server) = serve_once("200 OK", "{}").await;
        let handle = handle(&api_url);
        let request = RequestSpec::get("trade/status").query("tradeIds", "1,2");

        dispatch(&handle, &request).await.unwrap();

        let received = server.await.unwrap();

        assert!(received.starts_with("POST /ut/game/fifa17/trade/status?tradeIds=1%2C2 HTTP/1.1"));
        assert!(received.to_ascii_lowercase().contains("x-http-method-override: get"));
    }

    #[tokio::test]
    async fn api_error_carries_request() {
        let (api_url, server) = serve_once("200 OK", r#"{"code":"478","reason":"NO_TRADE_EXISTS"}"#).await;
        let handle = handle(&api_url);
        let request = RequestSpec::with_method(HttpMethod::Delete, "trade/9");
        let error = dispatch(&handle, &request).await.unwrap_err();

        server.await.unwrap();

        match error {
            Error::Api(error) => {
                assert_eq!(error.code, 478);
                assert_eq!(error.request.method, HttpMethod::Delete);
                assert!(error.request.url.ends_with("/ut/game/fifa17/trade/9"));
                assert!(error.request.headers.contains(&(
                    String::from("x-http-method-override"),
                    String::from("DELETE"),
                )));
            },
            error => panic!("Expected API error, got {error}"),
        }
    }

    #[tokio::test]
    async fn unauthorized_response() {
        let (api_url, server) = serve_once("401 Unauthorized", r#"{"code":401,"reason":"expired session"}"#).await;
        let handle = handle(&api_url);
        let error = dispatch(&handle, &RequestSpec::get("user/credits")).await.unwrap_err();

        server.await.unwrap();

        assert!(matches!(error, Error::Unauthorized(_)));
    }

    #[tokio::test]
    async fn connection_failure_is_transport_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        drop(listener);

        let handle = handle(&format!("http://{addr}/"));
        let error = dispatch(&handle, &RequestSpec::get("user/credits")).await.unwrap_err();

        assert!(matches!(error, Error::Reqwest(_)));
    }
}
