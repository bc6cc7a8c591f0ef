//! Enumerated types.

mod challenge_kind;
mod http_method;
mod listing_duration;
mod platform;

pub use challenge_kind::ChallengeKind;
pub use http_method::HttpMethod;
pub use listing_duration::ListingDuration;
pub use platform::Platform;
