use strum::{Display, EnumString, IntoStaticStr};

/// The verb sent in the `X-HTTP-Method-Override` header. The request itself is always a POST.
#[derive(Display, EnumString, IntoStaticStr, Debug, Default, PartialEq, Eq, Clone, Copy)]
#[strum(serialize_all = "UPPERCASE")]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
    Put,
    Delete,
}
