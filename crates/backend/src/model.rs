//! Records exchanged with the backend.
//!
//! The backend assigns numeric ids to records it creates and stores fields
//! exactly as posted, so decoding here is lenient about scalar shapes.
use serde::{Deserialize, Deserializer, Serialize};

/// A user record.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// User id.
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: Option<String>,
    /// First name.
    #[serde(default)]
    pub first_name: Option<String>,
    /// Age in years.
    #[serde(default, deserialize_with = "integer_or_digits")]
    pub age: Option<i32>,
    /// Id of the company the user belongs to.
    #[serde(default, deserialize_with = "string_or_number")]
    pub company_id: Option<String>,
}

/// A company record.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct Company {
    /// Company id.
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: Option<String>,
    /// Company name.
    #[serde(default)]
    pub name: Option<String>,
    /// Free text description.
    #[serde(default)]
    pub description: Option<String>,
}

/// Body of `POST /users`.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    /// First name.
    pub first_name: String,
    /// Age, forwarded as given.
    pub age: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Number(serde_json::Number),
}

fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Scalar>::deserialize(deserializer)?.map(|value| match value {
        Scalar::Text(text) => text,
        Scalar::Number(number) => number.to_string(),
    }))
}

// Integers that do not fit in 32 bits and non-numeric text decode as absent.
fn integer_or_digits<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Scalar>::deserialize(deserializer)? {
        Some(Scalar::Number(number)) => number.as_i64().and_then(|v| i32::try_from(v).ok()),
        Some(Scalar::Text(text)) => text.trim().parse().ok(),
        None => None,
    })
}
