use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum_macros::{Display, EnumString, VariantNames};
use uuid::Uuid;

use crate::error::Result;
use crate::schema::SchemaVariant;

/// Closed role enumeration; membership is exact and case-sensitive.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, VariantNames,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Admin,
    User,
    Authenticated,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserBase {
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
    pub profile_picture_url: Option<String>,
    pub role: Option<UserRole>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserCreate {
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
    pub profile_picture_url: Option<String>,
    pub role: Option<UserRole>,
    pub password: String,
}

/// Partial update; a supplied field must be non-empty, an absent field
/// stays untouched downstream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
    pub profile_picture_url: Option<String>,
    pub role: Option<UserRole>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
    pub profile_picture_url: Option<String>,
    pub role: Option<UserRole>,
    pub id: Uuid,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserListResponse {
    pub items: Vec<UserResponse>,
    #[serde(with = "coerced_int")]
    pub total: i64,
    #[serde(with = "coerced_int")]
    pub page: i64,
    #[serde(with = "coerced_int")]
    pub size: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl UserBase {
    pub fn from_value(value: &Value) -> Result<Self> {
        parse_record(SchemaVariant::UserBase, value)
    }
}

impl UserCreate {
    pub fn from_value(value: &Value) -> Result<Self> {
        parse_record(SchemaVariant::UserCreate, value)
    }
}

impl UserUpdate {
    pub fn from_value(value: &Value) -> Result<Self> {
        parse_record(SchemaVariant::UserUpdate, value)
    }
}

impl UserResponse {
    pub fn from_value(value: &Value) -> Result<Self> {
        parse_record(SchemaVariant::UserResponse, value)
    }
}

impl UserListResponse {
    pub fn from_value(value: &Value) -> Result<Self> {
        parse_record(SchemaVariant::UserListResponse, value)
    }
}

impl LoginRequest {
    pub fn from_value(value: &Value) -> Result<Self> {
        parse_record(SchemaVariant::LoginRequest, value)
    }
}

/// A successfully validated record, tagged by its schema variant.
#[derive(Debug, Clone)]
pub enum Validated {
    UserBase(UserBase),
    UserCreate(UserCreate),
    UserUpdate(UserUpdate),
    UserResponse(UserResponse),
    UserListResponse(UserListResponse),
    LoginRequest(LoginRequest),
}

/// Validates a raw decoded record against `variant`.
///
/// Returns the typed record on success; on rejection the error carries
/// every violated field in schema order.
pub fn validate(variant: SchemaVariant, value: &Value) -> Result<Validated> {
    match variant {
        SchemaVariant::UserBase => UserBase::from_value(value).map(Validated::UserBase),
        SchemaVariant::UserCreate => UserCreate::from_value(value).map(Validated::UserCreate),
        SchemaVariant::UserUpdate => UserUpdate::from_value(value).map(Validated::UserUpdate),
        SchemaVariant::UserResponse => {
            UserResponse::from_value(value).map(Validated::UserResponse)
        }
        SchemaVariant::UserListResponse => {
            UserListResponse::from_value(value).map(Validated::UserListResponse)
        }
        SchemaVariant::LoginRequest => {
            LoginRequest::from_value(value).map(Validated::LoginRequest)
        }
    }
}

/// Runs the schema walk, then binds the raw record to its typed form.
fn parse_record<T>(variant: SchemaVariant, value: &Value) -> Result<T>
where
    T: serde::de::DeserializeOwned,
{
    variant.schema().check(value)?;
    tracing::trace!(schema = variant.schema().name, "record accepted");
    Ok(serde_json::from_value(value.clone())?)
}

/// Timestamp (de)serialization matching the schema walk: RFC 3339 in and
/// out, with the offset-less upstream form accepted on the way in.
mod timestamp {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer, de};

    use crate::validation;

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_rfc3339())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        validation::parse_timestamp(&text)
            .map_err(|_| de::Error::custom("invalid datetime format"))
    }
}

/// Integer (de)serialization matching the schema walk's coercions.
mod coerced_int {
    use serde::{Deserialize, Deserializer, Serializer, de};
    use serde_json::Value;

    use crate::validation;

    pub fn serialize<S>(value: &i64, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_i64(*value)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<i64, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Value::deserialize(deserializer)?;
        validation::parse_integer(&raw)
            .map_err(|_| de::Error::custom("value is not a valid integer"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::VariantNames;

    #[test]
    fn test_role_wire_names() {
        assert_eq!(UserRole::Admin.to_string(), "ADMIN");
        assert_eq!(UserRole::User.to_string(), "USER");
        assert_eq!(UserRole::Authenticated.to_string(), "AUTHENTICATED");
        assert_eq!(UserRole::VARIANTS, &["ADMIN", "USER", "AUTHENTICATED"]);
    }

    #[test]
    fn test_role_round_trips_through_serde() {
        let encoded = serde_json::to_string(&UserRole::Authenticated).unwrap();
        assert_eq!(encoded, "\"AUTHENTICATED\"");

        let decoded: UserRole = serde_json::from_str("\"ADMIN\"").unwrap();
        assert_eq!(decoded, UserRole::Admin);
    }
}
