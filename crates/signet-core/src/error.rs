use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which protocol flow an error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowKind {
    OAuth2,
    Oidc,
}

impl FlowKind {
    /// Returns the wire/slug form of the flow kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            FlowKind::OAuth2 => "oauth2",
            FlowKind::Oidc => "oidc",
        }
    }
}

impl fmt::Display for FlowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Protocol-level authentication failure.
///
/// Covers everything the provider or the flow itself can reject: state
/// mismatches, provider-reported errors, unexpected statuses, failed claim
/// checks. When the provider supplied a machine-readable `error` code or a
/// documentation `error_uri`, they are carried alongside the message.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct AuthError {
    pub flow: FlowKind,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
}

impl AuthError {
    /// Create an error for the given flow.
    pub fn new(flow: FlowKind, message: impl Into<String>) -> Self {
        Self {
            flow,
            message: message.into(),
            code: None,
            uri: None,
        }
    }

    /// Shorthand for an OAuth 2.0 flow error.
    pub fn oauth2(message: impl Into<String>) -> Self {
        Self::new(FlowKind::OAuth2, message)
    }

    /// Shorthand for an OpenID Connect flow error.
    pub fn oidc(message: impl Into<String>) -> Self {
        Self::new(FlowKind::Oidc, message)
    }

    /// Attach the provider's machine-readable error code.
    pub fn with_code(mut self, code: Option<String>) -> Self {
        self.code = code;
        self
    }

    /// Attach the provider's documentation URI.
    pub fn with_uri(mut self, uri: Option<String>) -> Self {
        self.uri = uri;
        self
    }
}

/// Caller misuse detected before any protocol work happens.
///
/// Distinct from [`AuthError`]: this signals a programming mistake (a scope
/// without `openid`, `max_age` without `timestamp`), not a provider saying
/// no.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct UsageError(String);

impl UsageError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }

    pub fn message(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_error_displays_message_only() {
        let err = AuthError::oauth2("OAuth 2.0 state mismatch");
        assert_eq!(err.to_string(), "OAuth 2.0 state mismatch");
        assert_eq!(err.flow, FlowKind::OAuth2);
        assert_eq!(err.code, None);
    }

    #[test]
    fn auth_error_carries_provider_details() {
        let err = AuthError::oauth2("The grant is invalid")
            .with_code(Some("invalid_grant".into()))
            .with_uri(Some("https://provider.example/errors".into()));
        assert_eq!(err.code.as_deref(), Some("invalid_grant"));
        assert_eq!(err.uri.as_deref(), Some("https://provider.example/errors"));
    }

    #[test]
    fn flow_kind_serializes_as_slug() {
        let json = serde_json::to_string(&FlowKind::OAuth2).expect("serialize flow");
        assert_eq!(json, "\"oauth2\"");
        let json = serde_json::to_string(&FlowKind::Oidc).expect("serialize flow");
        assert_eq!(json, "\"oidc\"");
    }

    #[test]
    fn auth_error_serde_roundtrip() {
        let err = AuthError::oidc("Missing id token").with_code(Some("invalid_request".into()));
        let json = serde_json::to_string(&err).expect("serialize error");
        let parsed: AuthError = serde_json::from_str(&json).expect("deserialize error");
        assert_eq!(err, parsed);
    }
}
