//! Common (de)serialization functions

use serde::{Deserialize, Deserializer, Serializer};
use std::{fmt::Display, str::FromStr};

/////////////
// strings //
/////////////

/// Deserialize from `str`
pub fn from_str<'de, T, D>(de: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    <T as FromStr>::Err: Display,
{
    String::deserialize(de)?
        .parse()
        .map_err(serde::de::Error::custom)
}

/// Serialize to `str`
pub(crate) fn to_str<T, S>(value: T, ser: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    T: ToString,
{
    let s = value.to_string();
    ser.serialize_str(&s)
}

/////////////////////////
// strings or integers //
/////////////////////////

/// GraphQL returns some integral fields as JSON numbers and others as
/// strings, depending on the scalar type
#[derive(Deserialize)]
#[serde(untagged)]
enum StrOrNum {
    Str(String),
    Num(u64),
}

/// Deserialize from either a JSON string or a JSON number
pub fn from_str_or_num<'de, T, D>(de: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    <T as FromStr>::Err: Display,
{
    match StrOrNum::deserialize(de)? {
        StrOrNum::Str(s) => s.trim().parse().map_err(serde::de::Error::custom),
        StrOrNum::Num(n) => n.to_string().parse().map_err(serde::de::Error::custom),
    }
}
