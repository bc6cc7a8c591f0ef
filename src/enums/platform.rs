use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// The platform the account plays on. Each platform has its own club and transfer market.
#[derive(Serialize, Deserialize, Display, EnumString, Debug, PartialEq, Eq, Clone, Copy, Hash)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Platform {
    Pc,
    Ps3,
    Ps4,
    Xbox360,
    XboxOne,
}
