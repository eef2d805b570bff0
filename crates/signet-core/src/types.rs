//! Flow parameters and token-endpoint results.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Token bundle returned by a provider's token endpoint.
///
/// Providers routinely attach fields beyond RFC 6749 (granted scope,
/// provider-specific hints); the full parsed response body is retained in
/// `extra` so nothing is lost.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenSet {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    /// Lifetime of the access token in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<u64>,
    /// Identity token; present on OpenID Connect token responses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_token: Option<String>,
    #[serde(default)]
    pub extra: Value,
}

/// Per-call authentication parameters for the OAuth 2.0 flow.
///
/// Never stored by the engines. The caller owns the lifecycle of `state`: it
/// must be generated before redirecting and supplied again when handling the
/// callback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowParams {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

/// OpenID Connect parameters: the OAuth 2.0 set plus nonce and freshness
/// controls.
///
/// `max_age` and `timestamp` are both milliseconds; `nonce`, like `state`,
/// is generated and remembered by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OidcParams {
    #[serde(flatten)]
    pub oauth2: FlowParams,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nonce: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_age: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{from_str, json, to_string};

    #[test]
    fn token_set_roundtrip() {
        let token = TokenSet {
            access_token: "access-xyz".to_owned(),
            token_type: Some("Bearer".to_owned()),
            refresh_token: Some("refresh-abc".to_owned()),
            expires_in: Some(3600),
            id_token: None,
            extra: json!({"scope": "openid email"}),
        };
        let json = to_string(&token).expect("serialize token");
        let parsed: TokenSet = from_str(&json).expect("deserialize token");
        assert_eq!(token, parsed);
    }

    #[test]
    fn absent_optionals_are_not_serialized() {
        let token = TokenSet {
            access_token: "a".to_owned(),
            ..TokenSet::default()
        };
        let json = to_string(&token).expect("serialize token");
        assert!(!json.contains("refresh_token"));
        assert!(!json.contains("id_token"));
    }

    #[test]
    fn oidc_params_flatten_the_oauth2_set() {
        let params = OidcParams {
            oauth2: FlowParams {
                client_id: "abc".into(),
                client_secret: "123".into(),
                redirect_uri: "https://app.example.com/callback".into(),
                scope: Some("openid".into()),
                state: None,
            },
            nonce: Some("n-1".into()),
            max_age: Some(60_000),
            timestamp: None,
        };
        let json = to_string(&params).expect("serialize params");
        let value: Value = from_str(&json).expect("parse params");
        assert_eq!(value["client_id"], "abc");
        assert_eq!(value["nonce"], "n-1");
        let parsed: OidcParams = from_str(&json).expect("deserialize params");
        assert_eq!(params, parsed);
    }
}
