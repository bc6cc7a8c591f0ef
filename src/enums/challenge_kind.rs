use strum::{Display, EnumString};

/// The kind of challenge the identity provider can demand during login.
#[derive(Display, EnumString, Debug, PartialEq, Eq, Clone, Copy)]
#[strum(serialize_all = "kebab-case")]
pub enum ChallengeKind {
    TwoFactor,
    Captcha,
}
