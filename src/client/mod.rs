//! The client for the transfer market.

mod builder;

pub use builder::{MarketplaceClientBuilder, default_cookie_path};

use crate::api::{self, operations, RequestSpec};
use crate::cookies::{load_cookie_jar, save_cookie_jar, CookieJar, CookieJarSnapshot};
use crate::error::{Error, FileError, Result};
use crate::helpers::get_default_client;
use crate::request::{SearchFilter, TradeRef};
use crate::session::{AuthSession, AuthState, ChallengeResolver, Credentials, SessionHandle};
use crate::types::{Coins, ItemId, SquadId, TradeId};
use std::path::PathBuf;
use std::sync::Arc;
use serde_json::Value;
use tokio::sync::mpsc::UnboundedSender;

/// Logs in and performs operations on the transfer market.
///
/// Every operation returns the response body as JSON. Operations can run concurrently; the
/// service decides the outcome when they touch the same auction.
#[derive(Debug)]
pub struct MarketplaceClient {
    session: AuthSession,
    save_cookie: bool,
    save_cookie_path: Option<PathBuf>,
    save_errors: Option<UnboundedSender<FileError>>,
}

impl MarketplaceClient {
    /// Builder for constructing a [`MarketplaceClient`].
    pub fn builder<A>(authenticator: A) -> MarketplaceClientBuilder
    where
        A: crate::session::Authenticator + 'static,
    {
        MarketplaceClientBuilder::new(authenticator)
    }

    fn from_builder(builder: MarketplaceClientBuilder) -> Result<Self> {
        let snapshot = if builder.load_cookie_from_save_path {
            builder.save_cookie_path
                .as_deref()
                .and_then(load_cookie_jar)
        } else {
            builder.cookie_jar_json
                .as_ref()
                .and_then(CookieJarSnapshot::from_value)
        };
        let cookies = Arc::new(snapshot
            .map(CookieJar::from_snapshot)
            .unwrap_or_default());
        let client = get_default_client(Arc::clone(&cookies), builder.user_agent)?;

        Ok(Self {
            session: AuthSession::new(builder.authenticator, cookies, client),
            save_cookie: builder.save_cookie,
            save_cookie_path: builder.save_cookie_path,
            save_errors: builder.save_errors,
        })
    }

    /// Logs in. Challenges raised along the way are passed to `resolver`.
    ///
    /// If saving cookies is enabled they are saved in the background after this returns. Use
    /// [`MarketplaceClientBuilder::save_errors`] to be told if that fails.
    pub async fn login(
        &self,
        credentials: &Credentials,
        resolver: &dyn ChallengeResolver,
    ) -> Result<SessionHandle> {
        let handle = self.session.login(credentials, resolver).await?;

        self.spawn_save_cookies();

        Ok(handle)
    }

    fn spawn_save_cookies(&self) {
        let Some(filepath) = self.save_cookie_path.clone().filter(|_| self.save_cookie) else {
            return;
        };
        let snapshot = self.session.cookies().snapshot();
        let save_errors = self.save_errors.clone();

        tokio::spawn(async move {
            if let Err(error) = save_cookie_jar(&filepath, &snapshot).await {
                log::warn!("Failed to save cookies to {}: {error}", filepath.display());

                if let Some(sender) = save_errors {
                    let _ = sender.send(error);
                }
            }
        });
    }

    /// Saves cookies to the configured path now and waits for the write to finish. Does nothing
    /// if no path is set.
    pub async fn save_cookies(&self) -> Result<(), FileError> {
        match &self.save_cookie_path {
            Some(filepath) => save_cookie_jar(filepath, &self.session.cookies().snapshot()).await,
            None => Ok(()),
        }
    }

    /// Copies the current cookies.
    pub fn get_cookie_jar_json(&self) -> CookieJarSnapshot {
        self.session.cookies().snapshot()
    }

    /// Replaces the current cookies.
    pub fn set_cookie_jar_json(&self, snapshot: CookieJarSnapshot) {
        self.session.cookies().restore(snapshot);
    }

    /// The login state.
    pub fn state(&self) -> AuthState {
        self.session.state()
    }

    /// Whether there is a session to make requests with.
    pub fn is_logged_in(&self) -> bool {
        self.session.handle().is_some()
    }

    /// Sends a request with the current session.
    pub async fn dispatch(&self, request: &RequestSpec) -> Result<Value> {
        let handle = self.session.handle().ok_or(Error::NotLoggedIn)?;

        api::dispatch(&handle, request).await
    }

    /// Gets the coin balance.
    pub async fn get_credits(&self) -> Result<Value> {
        self.dispatch(&operations::get_credits()).await
    }

    /// Gets the items on the trade pile.
    pub async fn get_tradepile(&self) -> Result<Value> {
        self.dispatch(&operations::get_tradepile()).await
    }

    /// Gets the auctions on the watchlist.
    pub async fn get_watchlist(&self) -> Result<Value> {
        self.dispatch(&operations::get_watchlist()).await
    }

    /// Gets the maximum sizes of the piles.
    pub async fn get_pilesize(&self) -> Result<Value> {
        self.dispatch(&operations::get_pilesize()).await
    }

    /// Relists all expired items on the trade pile.
    pub async fn relist(&self) -> Result<Value> {
        self.dispatch(&operations::relist()).await
    }

    pub async fn get_squads(&self) -> Result<Value> {
        self.dispatch(&operations::get_squads()).await
    }

    pub async fn get_squad_details(&self, squad_id: SquadId) -> Result<Value> {
        self.dispatch(&operations::get_squad_details(squad_id)).await
    }

    /// Searches the transfer market.
    pub async fn search(&self, filter: &SearchFilter) -> Result<Value> {
        self.dispatch(&operations::search(filter)).await
    }

    /// Bids on an auction. The bid must be a valid price.
    pub async fn place_bid<T>(&self, trade: T, bid: Coins) -> Result<Value>
    where
        T: Into<TradeRef>,
    {
        let request = operations::place_bid(trade.into(), bid)?;

        self.dispatch(&request).await
    }

    /// Lists an item on the transfer market. Both prices must be valid and `duration` must be
    /// one of the [`ListingDuration`](crate::enums::ListingDuration) values in seconds.
    pub async fn list_item(
        &self,
        item_id: ItemId,
        starting_bid: Coins,
        buy_now_price: Coins,
        duration: u32,
    ) -> Result<Value> {
        let request = operations::list_item(item_id, starting_bid, buy_now_price, duration)?;

        self.dispatch(&request).await
    }

    /// Gets the current state of auctions.
    pub async fn get_status(&self, trade_ids: &[TradeId]) -> Result<Value> {
        let request = operations::get_status(trade_ids)?;

        self.dispatch(&request).await
    }

    pub async fn add_to_watchlist(&self, trade_id: TradeId) -> Result<Value> {
        let request = operations::add_to_watchlist(trade_id)?;

        self.dispatch(&request).await
    }

    pub async fn remove_from_watchlist(&self, trade_id: TradeId) -> Result<Value> {
        self.dispatch(&operations::remove_from_watchlist(trade_id)).await
    }

    pub async fn remove_from_tradepile(&self, trade_id: TradeId) -> Result<Value> {
        self.dispatch(&operations::remove_from_tradepile(trade_id)).await
    }

    pub async fn send_to_tradepile(&self, item_id: ItemId) -> Result<Value> {
        let request = operations::send_to_tradepile(item_id)?;

        self.dispatch(&request).await
    }

    pub async fn send_to_club(&self, item_id: ItemId) -> Result<Value> {
        let request = operations::send_to_club(item_id)?;

        self.dispatch(&request).await
    }

    /// Discards an item for coins.
    pub async fn quick_sell(&self, item_id: ItemId) -> Result<Value> {
        self.dispatch(&operations::quick_sell(item_id)).await
    }

    /// Clears sold items from the trade pile.
    pub async fn delete_sold_from_tradepile(&self) -> Result<Value> {
        self.dispatch(&operations::delete_sold_from_tradepile()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::Platform;
    use crate::error::{LoginError, ParameterError};
    use crate::session::{Authenticator, Challenge, LoginContext, LoginResponse};
    use crate::test_helpers::serve_once;
    use std::time::Duration;
    use futures::future::BoxFuture;
    use reqwest::header::HeaderMap;
    use serde_json::json;
    use url::Url;

    /// Sets a session cookie and points the session at `api_url`.
    struct MockAuthenticator {
        api_url: Url,
    }

    impl Default for MockAuthenticator {
        fn default() -> Self {
            Self {
                api_url: "https://utas.fut.ea.com/ut/game/fifa17/".parse().unwrap(),
            }
        }
    }

    impl Authenticator for MockAuthenticator {
        fn login<'a>(&'a self, context: LoginContext<'a>) -> BoxFuture<'a, Result<LoginResponse, LoginError>> {
            Box::pin(async move {
                context.cookies.add_cookie_str("sid=abc; Domain=ea.com", &"https://accounts.ea.com/".parse().unwrap());

                Ok(LoginResponse {
                    api_url: self.api_url.clone(),
                    headers: HeaderMap::new(),
                })
            })
        }
    }

    fn credentials() -> Credentials {
        Credentials {
            email: "user@example.com".into(),
            password: "hunter2".into(),
            secret: "answer".into(),
            platform: Platform::Pc,
        }
    }

    async fn no_challenges(_challenge: Challenge) -> Option<String> {
        None
    }

    fn valid_snapshot() -> Value {
        json!({
            "version": "1",
            "storeType": "x",
            "rejectPublicSuffixes": true,
            "cookies": [{ "key": "sid", "value": "abc", "domain": "ea.com" }],
        })
    }

    #[test]
    fn missing_cookie_file_starts_unauthenticated() {
        let dir = tempfile::tempdir().unwrap();
        let client = MarketplaceClient::builder(MockAuthenticator::default())
            .load_cookie_from_save_path(true)
            .save_cookie_path(dir.path().join("cookies.json"))
            .build()
            .unwrap();

        assert_eq!(client.state(), AuthState::Unauthenticated);
        assert!(!client.is_logged_in());
        assert!(client.get_cookie_jar_json().cookies.is_empty());
    }

    #[test]
    fn loads_cookies_from_save_path() {
        let dir = tempfile::tempdir().unwrap();
        let filepath = dir.path().join("cookies.json");

        std::fs::write(&filepath, valid_snapshot().to_string()).unwrap();

        let client = MarketplaceClient::builder(MockAuthenticator::default())
            .load_cookie_from_save_path(true)
            .save_cookie_path(&filepath)
            .build()
            .unwrap();

        assert_eq!(client.get_cookie_jar_json().cookies.len(), 1);
        assert!(!client.is_logged_in());
    }

    #[test]
    fn accepts_complete_inline_snapshot() {
        let client = MarketplaceClient::builder(MockAuthenticator::default())
            .cookie_jar_json(valid_snapshot())
            .build()
            .unwrap();

        assert_eq!(client.get_cookie_jar_json().cookies[0].key, "sid");
    }

    #[test]
    fn ignores_incomplete_inline_snapshot() {
        let client = MarketplaceClient::builder(MockAuthenticator::default())
            .cookie_jar_json(json!({ "version": "1" }))
            .build()
            .unwrap();

        assert!(client.get_cookie_jar_json().cookies.is_empty());
        assert_eq!(client.state(), AuthState::Unauthenticated);
    }

    #[test]
    fn save_path_takes_precedence_over_inline_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let client = MarketplaceClient::builder(MockAuthenticator::default())
            .load_cookie_from_save_path(true)
            .save_cookie_path(dir.path().join("cookies.json"))
            .cookie_jar_json(valid_snapshot())
            .build()
            .unwrap();

        assert!(client.get_cookie_jar_json().cookies.is_empty());
    }

    #[test]
    fn sets_cookie_jar() {
        let client = MarketplaceClient::builder(MockAuthenticator::default())
            .build()
            .unwrap();
        let snapshot = CookieJarSnapshot::from_value(&valid_snapshot()).unwrap();

        client.set_cookie_jar_json(snapshot.clone());

        assert_eq!(client.get_cookie_jar_json().cookies, snapshot.cookies);
    }

    #[tokio::test]
    async fn requests_fail_before_login() {
        let client = MarketplaceClient::builder(MockAuthenticator::default())
            .build()
            .unwrap();

        assert!(matches!(client.get_credits().await, Err(Error::NotLoggedIn)));
    }

    #[tokio::test]
    async fn validation_fails_before_dispatch() {
        let client = MarketplaceClient::builder(MockAuthenticator::default())
            .build()
            .unwrap();
        // Not logged in, so anything past validation would fail with NotLoggedIn.
        let bid = client.place_bid(55u64, 173).await;
        let listing = client.list_item(1, 150, 1_000, 7200).await;

        assert!(matches!(bid, Err(Error::Parameter(ParameterError::InvalidPrice(173)))));
        assert!(matches!(listing, Err(Error::Parameter(ParameterError::InvalidDuration(7200)))));
    }

    #[tokio::test]
    async fn saves_cookies_after_login() {
        let dir = tempfile::tempdir().unwrap();
        let filepath = dir.path().join("cookies.json");
        let client = MarketplaceClient::builder(MockAuthenticator::default())
            .save_cookie(true)
            .save_cookie_path(&filepath)
            .build()
            .unwrap();

        client.login(&credentials(), &no_challenges).await.unwrap();

        let mut saved = None;

        for _ in 0..100 {
            saved = load_cookie_jar(&filepath);

            if saved.is_some() {
                break;
            }

            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        assert_eq!(saved, Some(client.get_cookie_jar_json()));
        assert_eq!(client.state(), AuthState::Authenticated);
    }

    #[tokio::test]
    async fn reports_save_failure_after_login() {
        let dir = tempfile::tempdir().unwrap();
        let (sender, mut receiver) = tokio::sync::mpsc::unbounded_channel();
        let client = MarketplaceClient::builder(MockAuthenticator::default())
            .save_cookie(true)
            .save_cookie_path(dir.path().join("missing").join("cookies.json"))
            .save_errors(sender)
            .build()
            .unwrap();

        // login itself succeeds
        client.login(&credentials(), &no_challenges).await.unwrap();

        let error = tokio::time::timeout(Duration::from_secs(5), receiver.recv())
            .await
            .unwrap()
            .unwrap();

        assert!(matches!(error, FileError::FileSystem(_)));
        assert!(client.is_logged_in());
    }

    #[tokio::test]
    async fn dispatches_operations_after_login() {
        let (api_url, server) = serve_once("200 OK", r#"{"credits":1000}"#).await;
        let client = MarketplaceClient::builder(MockAuthenticator {
            api_url: api_url.parse().unwrap(),
        })
            .build()
            .unwrap();

        client.login(&credentials(), &no_challenges).await.unwrap();

        let body = client.get_credits().await.unwrap();
        let received = server.await.unwrap();

        assert_eq!(body["credits"], 1000);
        assert!(received.starts_with("POST /ut/game/fifa17/user/credits HTTP/1.1"));
    }

    #[tokio::test]
    async fn api_error_is_only_reported_as_error() {
        let (api_url, server) = serve_once("200 OK", r#"{"code":"470","reason":"Not enough credits"}"#).await;
        let client = MarketplaceClient::builder(MockAuthenticator {
            api_url: api_url.parse().unwrap(),
        })
            .build()
            .unwrap();

        client.login(&credentials(), &no_challenges).await.unwrap();

        let error = client.place_bid(55u64, 150).await.unwrap_err();
        let received = server.await.unwrap();

        assert_eq!(error.api_code(), Some(470));
        assert!(received.starts_with("POST /ut/game/fifa17/trade/55/bid HTTP/1.1"));
    }
}
