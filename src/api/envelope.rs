use serde::Deserialize;
use serde_json::Value;

/// The body the service responds with when it rejects a request. These arrive with any HTTP
/// status, including 200.
#[derive(Deserialize, Debug)]
pub(crate) struct ApiErrorEnvelope {
    #[serde(deserialize_with = "crate::serializers::number_or_string::deserialize")]
    pub code: u32,
    pub reason: String,
    #[serde(default)]
    pub message: Option<String>,
}

impl ApiErrorEnvelope {
    /// Reads an envelope from a response body. Returns `None` for anything else.
    pub fn from_body(body: &Value) -> Option<Self> {
        if !body.is_object() {
            return None;
        }

        Self::deserialize(body).ok()
    }
}
