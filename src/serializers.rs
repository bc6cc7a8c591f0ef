//! Custom serde helpers for values which the service and cookie files encode loosely.

/// Cookie expiry times. Session cookies are written as `"Infinity"`.
pub mod expires {
    use chrono::{DateTime, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    const INFINITY: &str = "Infinity";

    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(time) => serializer.collect_str(&time.to_rfc3339_opts(chrono::SecondsFormat::Millis, true)),
            None => serializer.serialize_str(INFINITY),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            None => Ok(None),
            Some(s) if s == INFINITY => Ok(None),
            Some(s) => DateTime::parse_from_rfc3339(&s)
                .map(|time| Some(time.with_timezone(&Utc)))
                .map_err(de::Error::custom),
        }
    }
}

/// Numbers which may arrive either as JSON numbers or as numeric strings.
pub mod number_or_string {
    use std::fmt::Display;
    use std::str::FromStr;
    use serde::{de, Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString<T> {
        Number(T),
        String(String),
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<T, D::Error>
    where
        T: FromStr + Deserialize<'de>,
        T::Err: Display,
        D: Deserializer<'de>,
    {
        match NumberOrString::<T>::deserialize(deserializer)? {
            NumberOrString::Number(n) => Ok(n),
            NumberOrString::String(s) => s.trim().parse().map_err(de::Error::custom),
        }
    }
}
