use super::{LoginResponse, SessionHandle};
use crate::cookies::{CookieJar, CookieJarSnapshot};
use crate::enums::{ChallengeKind, Platform};
use crate::error::LoginError;
use crate::types::HttpClient;
use std::fmt;
use std::future::Future;
use std::sync::{Arc, RwLock};
use futures::future::BoxFuture;

/// Credentials for logging in.
#[derive(Clone)]
pub struct Credentials {
    /// The account's email address.
    pub email: String,
    pub password: String,
    /// The answer to the account's security question.
    pub secret: String,
    pub platform: Platform,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("platform", &self.platform)
            .finish_non_exhaustive()
    }
}

/// Something the identity provider needs answered before login can continue.
#[derive(Debug, Clone, PartialEq)]
pub enum Challenge {
    /// A one-time code was sent, e.g. by email or generated by an authenticator app.
    TwoFactor {
        /// Where the code was sent, if known.
        method: Option<String>,
    },
    /// A captcha must be solved.
    Captcha {
        /// The captcha data as given by the identity provider, e.g. an image URL.
        data: String,
    },
}

impl Challenge {
    pub fn kind(&self) -> ChallengeKind {
        match self {
            Self::TwoFactor { .. } => ChallengeKind::TwoFactor,
            Self::Captcha { .. } => ChallengeKind::Captcha,
        }
    }
}

/// Answers challenges raised during login. The login waits on the returned future, so the answer
/// may come from anywhere, e.g. a prompt or another task.
///
/// Returning `None` abandons the login.
///
/// Any `Fn(Challenge) -> impl Future<Output = Option<String>>` is a resolver.
pub trait ChallengeResolver: Send + Sync {
    fn resolve(&self, challenge: Challenge) -> BoxFuture<'_, Option<String>>;
}

impl<F, Fut> ChallengeResolver for F
where
    F: Fn(Challenge) -> Fut + Send + Sync,
    Fut: Future<Output = Option<String>> + Send + 'static,
{
    fn resolve(&self, challenge: Challenge) -> BoxFuture<'_, Option<String>> {
        Box::pin(self(challenge))
    }
}

/// Everything an [`Authenticator`] gets to work with.
pub struct LoginContext<'a> {
    /// A client bound to `cookies`. Cookies set on responses are stored in the jar.
    pub client: &'a HttpClient,
    pub cookies: &'a CookieJar,
    pub credentials: &'a Credentials,
    pub resolver: &'a dyn ChallengeResolver,
}

/// Exchanges credentials with the identity provider for a session.
pub trait Authenticator: Send + Sync {
    fn login<'a>(&'a self, context: LoginContext<'a>) -> BoxFuture<'a, Result<LoginResponse, LoginError>>;
}

/// Where a session is in its login lifecycle.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthState {
    Unauthenticated,
    /// A login is running. `pending` is set while waiting on a challenge to be answered.
    Authenticating {
        pending: Option<ChallengeKind>,
    },
    Authenticated,
}

/// Wraps the caller's resolver to expose pending challenges through [`AuthState`].
struct TrackedResolver<'a> {
    inner: &'a dyn ChallengeResolver,
    state: &'a RwLock<AuthState>,
}

impl ChallengeResolver for TrackedResolver<'_> {
    fn resolve(&self, challenge: Challenge) -> BoxFuture<'_, Option<String>> {
        Box::pin(async move {
            let kind = challenge.kind();

            log::debug!("Login requires {kind} challenge");
            *self.state.write().unwrap() = AuthState::Authenticating { pending: Some(kind) };

            let resolution = self.inner.resolve(challenge).await;

            *self.state.write().unwrap() = AuthState::Authenticating { pending: None };
            resolution
        })
    }
}

/// Owns the login lifecycle and the resulting [`SessionHandle`].
pub struct AuthSession {
    authenticator: Arc<dyn Authenticator>,
    cookies: Arc<CookieJar>,
    client: HttpClient,
    state: RwLock<AuthState>,
    handle: RwLock<Option<SessionHandle>>,
}

impl fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("AuthSession")
            .field("state", &self.state())
            .field("cookies", &self.cookies)
            .finish_non_exhaustive()
    }
}

impl AuthSession {
    /// Creates a session. `client` must be bound to `cookies`.
    pub fn new(
        authenticator: Arc<dyn Authenticator>,
        cookies: Arc<CookieJar>,
        client: HttpClient,
    ) -> Self {
        Self {
            authenticator,
            cookies,
            client,
            state: RwLock::new(AuthState::Unauthenticated),
            handle: RwLock::new(None),
        }
    }

    /// The current state.
    pub fn state(&self) -> AuthState {
        self.state.read().unwrap().clone()
    }

    /// The cookies for this session.
    pub fn cookies(&self) -> &Arc<CookieJar> {
        &self.cookies
    }

    /// The handle for the current session, if logged in.
    pub fn handle(&self) -> Option<SessionHandle> {
        self.handle.read().unwrap().clone()
    }

    /// Logs in. On failure the cookie jar is put back to how it was before the attempt and any
    /// previous session is dropped. The same happens if the returned future is dropped before it
    /// completes.
    pub async fn login(
        &self,
        credentials: &Credentials,
        resolver: &dyn ChallengeResolver,
    ) -> Result<SessionHandle, LoginError> {
        {
            let mut state = self.state.write().unwrap();

            if matches!(*state, AuthState::Authenticating { .. }) {
                return Err(LoginError::InProgress);
            }

            *state = AuthState::Authenticating { pending: None };
        }

        let attempt = LoginAttempt {
            session: self,
            previous_cookies: Some(self.cookies.snapshot()),
        };

        log::debug!("Logging in as {} on {}", credentials.email, credentials.platform);

        let tracked = TrackedResolver {
            inner: resolver,
            state: &self.state,
        };
        let result = self.authenticator.login(LoginContext {
            client: &self.client,
            cookies: &self.cookies,
            credentials,
            resolver: &tracked,
        }).await;

        match result {
            Ok(response) => {
                let handle = SessionHandle::new(self.client.clone(), response);

                attempt.succeed(handle.clone());
                log::info!("Logged in as {}", credentials.email);

                Ok(handle)
            },
            Err(error) => {
                log::debug!("Login failed: {error}");
                drop(attempt);

                Err(error)
            },
        }
    }
}

/// A login in progress. Unless it succeeds, dropping it puts the cookie jar back to how it was
/// before the attempt, drops any previous session and returns to
/// [`AuthState::Unauthenticated`]. This includes the login future being dropped mid-way, e.g. by
/// a timeout.
struct LoginAttempt<'a> {
    session: &'a AuthSession,
    previous_cookies: Option<CookieJarSnapshot>,
}

impl LoginAttempt<'_> {
    fn succeed(mut self, handle: SessionHandle) {
        self.previous_cookies = None;
        *self.session.handle.write().unwrap() = Some(handle);
        *self.session.state.write().unwrap() = AuthState::Authenticated;
    }
}

impl Drop for LoginAttempt<'_> {
    fn drop(&mut self) {
        let Some(previous_cookies) = self.previous_cookies.take() else {
            return;
        };

        self.session.cookies.restore(previous_cookies);
        *self.session.handle.write().unwrap_or_else(|e| e.into_inner()) = None;
        *self.session.state.write().unwrap_or_else(|e| e.into_inner()) = AuthState::Unauthenticated;
    }
}
