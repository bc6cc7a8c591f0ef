//! Login and the authenticated session it produces.
//!
//! The exchange with the identity provider itself is supplied by the caller as an
//! [`Authenticator`]. This module runs it, tracks the login state and holds onto the resulting
//! [`SessionHandle`].

mod auth;
mod handle;

pub use auth::{
    AuthSession,
    AuthState,
    Authenticator,
    Challenge,
    ChallengeResolver,
    Credentials,
    LoginContext,
};
pub use handle::{LoginResponse, SessionHandle};
