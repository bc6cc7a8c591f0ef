use crate::types::HttpClient;
use reqwest::header::HeaderMap;
use url::Url;

/// What the identity provider hands back once a login succeeds.
#[derive(Debug, Clone)]
pub struct LoginResponse {
    /// The base URL for transfer market requests, e.g.
    /// `https://utas.external.s2.fut.ea.com/ut/game/fifa17/`.
    pub api_url: Url,
    /// Headers identifying the session which are sent with every request.
    pub headers: HeaderMap,
}

/// An authenticated session. Requests can only be dispatched through a handle.
///
/// Cloning is cheap and clones share the same underlying client and cookies.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    pub(crate) client: HttpClient,
    pub(crate) api_url: Url,
    pub(crate) headers: HeaderMap,
}

impl SessionHandle {
    /// Creates a handle from a client bound to the session's cookies.
    pub fn new(client: HttpClient, response: LoginResponse) -> Self {
        let LoginResponse { mut api_url, headers } = response;

        // Relative paths are joined onto the last segment without this.
        if !api_url.path().ends_with('/') {
            let path = format!("{}/", api_url.path());

            api_url.set_path(&path);
        }

        Self {
            client,
            api_url,
            headers,
        }
    }

    /// The base URL requests are sent to.
    pub fn api_url(&self) -> &Url {
        &self.api_url
    }

    /// Resolves a path relative to the base URL.
    pub fn url(&self, path: &str) -> Result<Url, url::ParseError> {
        self.api_url.join(path)
    }
}
