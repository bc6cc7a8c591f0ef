use super::MarketplaceClient;
use crate::error::{Error, FileError};
use crate::helpers::{default_data_directory, USER_AGENT_STRING};
use crate::session::Authenticator;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use serde_json::Value;
use tokio::sync::mpsc::UnboundedSender;

/// The default location for the cookie file, inside the per-user data directory.
pub fn default_cookie_path() -> PathBuf {
    default_data_directory().join("cookies.json")
}

/// Builder for constructing a [`MarketplaceClient`].
#[derive(Clone)]
pub struct MarketplaceClientBuilder {
    /// Performs the login exchange with the identity provider.
    pub(crate) authenticator: Arc<dyn Authenticator>,
    /// Whether to save cookies after each successful login. Defaults to `false`.
    pub(crate) save_cookie: bool,
    /// Where cookies are saved to and loaded from.
    pub(crate) save_cookie_path: Option<PathBuf>,
    /// Whether to load cookies from `save_cookie_path` on construction. Defaults to `false`.
    pub(crate) load_cookie_from_save_path: bool,
    /// Cookies to start with, in the same format as the cookie file.
    pub(crate) cookie_jar_json: Option<Value>,
    /// User agent for requests.
    pub(crate) user_agent: &'static str,
    /// Where errors from saving cookies after login are sent.
    pub(crate) save_errors: Option<UnboundedSender<FileError>>,
}

impl fmt::Debug for MarketplaceClientBuilder {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("MarketplaceClientBuilder")
            .field("save_cookie", &self.save_cookie)
            .field("save_cookie_path", &self.save_cookie_path)
            .field("load_cookie_from_save_path", &self.load_cookie_from_save_path)
            .field("user_agent", &self.user_agent)
            .finish_non_exhaustive()
    }
}

impl MarketplaceClientBuilder {
    /// Creates a new [`MarketplaceClientBuilder`].
    pub fn new<A>(authenticator: A) -> Self
    where
        A: Authenticator + 'static,
    {
        Self {
            authenticator: Arc::new(authenticator),
            save_cookie: false,
            save_cookie_path: None,
            load_cookie_from_save_path: false,
            cookie_jar_json: None,
            user_agent: USER_AGENT_STRING,
            save_errors: None,
        }
    }

    /// Save cookies to `save_cookie_path` after each successful login. Nothing is saved unless a
    /// path is also set.
    pub fn save_cookie(mut self, save_cookie: bool) -> Self {
        self.save_cookie = save_cookie;
        self
    }

    /// The file cookies are saved to and loaded from. See also [`default_cookie_path`].
    pub fn save_cookie_path<T>(mut self, save_cookie_path: T) -> Self
    where
        T: Into<PathBuf>,
    {
        self.save_cookie_path = Some(save_cookie_path.into());
        self
    }

    /// Load cookies from `save_cookie_path` when building. A missing or unreadable file is
    /// ignored. When set, `cookie_jar_json` is not used.
    pub fn load_cookie_from_save_path(mut self, load_cookie_from_save_path: bool) -> Self {
        self.load_cookie_from_save_path = load_cookie_from_save_path;
        self
    }

    /// Cookies to start with. Ignored unless it has all of `version`, `storeType`,
    /// `rejectPublicSuffixes` and `cookies`.
    pub fn cookie_jar_json(mut self, cookie_jar_json: Value) -> Self {
        self.cookie_jar_json = Some(cookie_jar_json);
        self
    }

    /// User agent for requests.
    pub fn user_agent(mut self, user_agent: &'static str) -> Self {
        self.user_agent = user_agent;
        self
    }

    /// Saving cookies after login happens in the background, after `login` has already returned.
    /// Errors from saving are sent here. Without a sender they are only logged.
    pub fn save_errors(mut self, sender: UnboundedSender<FileError>) -> Self {
        self.save_errors = Some(sender);
        self
    }

    /// Builds the [`MarketplaceClient`].
    pub fn build(self) -> Result<MarketplaceClient, Error> {
        MarketplaceClient::from_builder(self)
    }
}
