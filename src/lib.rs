//! Client for the Ultimate Team transfer market web API.
//!
//! Log in with a [`MarketplaceClient`], then search, bid, list items and manage the trade pile
//! and watchlist. Cookies can be saved after login and restored on the next run.
//!
//! Price rules are available without a session in [`price`], so that bids can be checked before
//! anything is sent.
//!
//! ```no_run
//! use fut_api::{MarketplaceClient, Credentials, Challenge, SearchFilter};
//! use fut_api::enums::Platform;
//! # async fn run<A: fut_api::session::Authenticator + 'static>(authenticator: A) -> Result<(), fut_api::error::Error> {
//! let client = MarketplaceClient::builder(authenticator)
//!     .save_cookie(true)
//!     .save_cookie_path("cookies.json")
//!     .load_cookie_from_save_path(true)
//!     .build()?;
//! let credentials = Credentials {
//!     email: "user@example.com".into(),
//!     password: "password".into(),
//!     secret: "answer".into(),
//!     platform: Platform::Ps4,
//! };
//!
//! client.login(&credentials, &|_challenge: Challenge| async { Some(String::from("123456")) }).await?;
//!
//! let results = client.search(&SearchFilter::new().max_buy_now(1_000)).await?;
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod cookies;
pub mod enums;
pub mod error;
pub mod price;
pub mod request;
pub mod response;
pub mod session;
pub mod types;

mod client;
mod helpers;
mod resource;
mod serializers;

#[cfg(test)]
mod test_helpers;

pub use client::{MarketplaceClient, MarketplaceClientBuilder, default_cookie_path};
pub use cookies::{CookieJar, CookieJarSnapshot};
pub use error::{Error, ParameterError};
pub use price::{
    Price,
    is_price_valid,
    calculate_valid_price,
    calculate_next_lower_price,
    calculate_next_higher_price,
};
pub use request::{SearchFilter, TradeRef};
pub use resource::get_base_id;
pub use session::{Challenge, ChallengeResolver, Credentials, SessionHandle};
