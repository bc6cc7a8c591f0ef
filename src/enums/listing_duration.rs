use num_enum::{TryFromPrimitive, IntoPrimitive};
use serde_repr::{Serialize_repr, Deserialize_repr};
use strum::{Display, EnumString};

/// How long an item stays listed on the transfer market, in seconds.
#[derive(Serialize_repr, Deserialize_repr, Display, EnumString, Debug, PartialEq, Eq, TryFromPrimitive, IntoPrimitive, Clone, Copy)]
#[repr(u32)]
pub enum ListingDuration {
    OneHour = 3600,
    ThreeHours = 10800,
    SixHours = 21600,
    TwelveHours = 43200,
    OneDay = 86400,
    ThreeDays = 259200,
}
