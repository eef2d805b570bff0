//! Normalized user profiles and the pointer map that produces them.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Normalized identity fields shared by both flows.
///
/// `sub` is the only field a flow requires; everything else is filled on a
/// best-effort basis from whatever the provider returned.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub given_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub middle_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birthdate: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zoneinfo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_verified: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number_verified: Option<bool>,
}

/// JSON-pointer paths locating each profile field in a provider response.
///
/// Projection is a pure function of the map and the body: unresolved paths
/// and type mismatches leave the field absent, never error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileMap {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub given_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub middle_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birthdate: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zoneinfo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_verified: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number_verified: Option<String>,
}

impl ProfileMap {
    /// The standard OpenID Connect claim mapping.
    pub fn oidc() -> Self {
        Self {
            sub: Some("/sub".into()),
            name: Some("/name".into()),
            given_name: Some("/given_name".into()),
            family_name: Some("/family_name".into()),
            middle_name: Some("/middle_name".into()),
            nickname: Some("/nickname".into()),
            preferred_username: Some("/preferred_username".into()),
            profile: Some("/profile".into()),
            picture: Some("/picture".into()),
            website: Some("/website".into()),
            gender: Some("/gender".into()),
            birthdate: Some("/birthdate".into()),
            zoneinfo: Some("/zoneinfo".into()),
            locale: Some("/locale".into()),
            updated_at: Some("/updated_at".into()),
            email: Some("/email".into()),
            email_verified: Some("/email_verified".into()),
            phone_number: Some("/phone_number".into()),
            phone_number_verified: Some("/phone_number_verified".into()),
        }
    }

    /// Project `body` onto the profile schema.
    pub fn project(&self, body: &Value) -> Profile {
        Profile {
            sub: resolve_string(body, self.sub.as_deref()).unwrap_or_default(),
            name: resolve_string(body, self.name.as_deref()),
            given_name: resolve_string(body, self.given_name.as_deref()),
            family_name: resolve_string(body, self.family_name.as_deref()),
            middle_name: resolve_string(body, self.middle_name.as_deref()),
            nickname: resolve_string(body, self.nickname.as_deref()),
            preferred_username: resolve_string(body, self.preferred_username.as_deref()),
            profile: resolve_string(body, self.profile.as_deref()),
            picture: resolve_string(body, self.picture.as_deref()),
            website: resolve_string(body, self.website.as_deref()),
            gender: resolve_string(body, self.gender.as_deref()),
            birthdate: resolve_string(body, self.birthdate.as_deref()),
            zoneinfo: resolve_string(body, self.zoneinfo.as_deref()),
            locale: resolve_string(body, self.locale.as_deref()),
            updated_at: resolve_u64(body, self.updated_at.as_deref()),
            email: resolve_string(body, self.email.as_deref()),
            email_verified: resolve_bool(body, self.email_verified.as_deref()),
            phone_number: resolve_string(body, self.phone_number.as_deref()),
            phone_number_verified: resolve_bool(body, self.phone_number_verified.as_deref()),
        }
    }
}

fn resolve<'a>(body: &'a Value, path: Option<&str>) -> Option<&'a Value> {
    body.pointer(path?)
}

/// String fields also accept numbers and booleans (GitHub's numeric account
/// id is the canonical `sub` source).
fn resolve_string(body: &Value, path: Option<&str>) -> Option<String> {
    match resolve(body, path)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Numeric fields also accept decimal strings (form-decoded bodies carry
/// strings only).
fn resolve_u64(body: &Value, path: Option<&str>) -> Option<u64> {
    match resolve(body, path)? {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

fn resolve_bool(body: &Value, path: Option<&str>) -> Option<bool> {
    match resolve(body, path)? {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.as_str() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        },
        _ => None,
    }
}
