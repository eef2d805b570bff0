//! OpenID Connect engine layered over the OAuth 2.0 one.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::{Map, Value};
use signet_core::query::{append_query, build_query};
use signet_core::{AuthError, OidcParams, Profile, ProfileMap, TokenSet, UsageError};
use tracing::{debug, instrument};

use crate::claims::{ClaimsDecoder, UnverifiedJwtDecoder};
use crate::error::{Error, Result};
use crate::oauth2::{OAuth2Client, OAuth2Provider};
use crate::transport::Transport;

/// Claims every identity token must carry.
const REQUIRED_CLAIMS: [&str; 5] = ["iss", "sub", "aud", "exp", "iat"];

/// Endpoint configuration for an OpenID Connect provider.
#[derive(Debug, Clone, PartialEq)]
pub struct OidcProvider {
    pub access_token_uri: String,
    pub authorization_uri: String,
    /// Trusted issuer identity the `iss` claim must match exactly.
    pub issuer: String,
    /// Claim-to-profile mapping; the standard OIDC claims when absent.
    pub profile_map: Option<ProfileMap>,
}

/// The OpenID Connect engine.
///
/// Composes an [`OAuth2Client`] for everything the flows share (token
/// exchange, refresh) and replaces redirect construction and profile
/// retrieval with the identity-token variants.
pub struct OidcClient {
    oauth2: OAuth2Client,
    issuer: String,
    decoder: Arc<dyn ClaimsDecoder>,
}

impl OidcClient {
    /// Create an engine that decodes identity tokens without signature
    /// verification; see [`UnverifiedJwtDecoder`] for when that is
    /// acceptable.
    pub fn new(provider: OidcProvider, transport: Arc<dyn Transport>) -> Self {
        Self::with_decoder(provider, transport, Arc::new(UnverifiedJwtDecoder))
    }

    /// Create an engine with a custom claims decoder, e.g. one that verifies
    /// signatures against the provider's JWKS.
    pub fn with_decoder(
        provider: OidcProvider,
        transport: Arc<dyn Transport>,
        decoder: Arc<dyn ClaimsDecoder>,
    ) -> Self {
        let OidcProvider {
            access_token_uri,
            authorization_uri,
            issuer,
            profile_map,
        } = provider;
        let oauth2 = OAuth2Client::new(
            OAuth2Provider {
                access_token_uri,
                authorization_uri,
                profile_uri: String::new(),
                profile_map: profile_map.unwrap_or_else(ProfileMap::oidc),
            },
            transport,
        );
        Self {
            oauth2,
            issuer,
            decoder,
        }
    }

    /// The OAuth 2.0 engine this one is built on, for operations the
    /// identity layer leaves untouched.
    pub fn oauth2(&self) -> &OAuth2Client {
        &self.oauth2
    }

    /// Build the provider redirect URL.
    ///
    /// `scope` must request `openid` as a whole token; anything else is a
    /// caller mistake, rejected before any query construction.
    pub fn authorize_url(&self, params: &OidcParams) -> Result<String> {
        let scope = params.oauth2.scope.as_deref().unwrap_or("");
        if !contains_openid_scope(scope) {
            return Err(
                UsageError::new(format!("Scope \"{scope}\" must contain \"openid\"")).into(),
            );
        }
        let max_age = params.max_age.map(|ms| (ms / 1000).to_string());
        let query = build_query([
            ("client_id", Some(params.oauth2.client_id.as_str())),
            ("redirect_uri", Some(params.oauth2.redirect_uri.as_str())),
            ("scope", Some(scope)),
            ("response_type", Some("code")),
            ("state", params.oauth2.state.as_deref()),
            ("nonce", params.nonce.as_deref()),
            ("max_age", max_age.as_deref()),
        ]);
        Ok(append_query(
            &self.oauth2.provider().authorization_uri,
            &query,
        ))
    }

    /// Run the OAuth 2.0 callback exchange and require an identity token in
    /// the result.
    #[instrument(skip_all)]
    pub async fn exchange_callback(
        &self,
        callback_uri: &str,
        params: &OidcParams,
    ) -> Result<TokenSet> {
        let token = self
            .oauth2
            .exchange_callback(callback_uri, &params.oauth2)
            .await?;
        if token.id_token.is_none() {
            return Err(AuthError::oidc("Missing id token").into());
        }
        Ok(token)
    }

    /// Obtain a fresh token set from a refresh token.
    pub async fn refresh(&self, refresh_token: &str, params: &OidcParams) -> Result<TokenSet> {
        self.oauth2.refresh(refresh_token, &params.oauth2).await
    }

    /// Decode the identity token, run the validation checklist and return
    /// the claims.
    #[instrument(skip_all, fields(issuer = %self.issuer))]
    pub async fn validate_id_token(
        &self,
        token: &TokenSet,
        params: &OidcParams,
    ) -> Result<Value> {
        let Some(id_token) = token.id_token.as_deref() else {
            return Err(AuthError::oidc("Missing id token").into());
        };
        let claims = self
            .decoder
            .decode(id_token)
            .await
            .map_err(Error::Transport)?;
        self.check_claims(&claims, params, now_secs())?;
        debug!("id token claims validated");
        Ok(claims)
    }

    /// Validate the identity token and project its claims onto the profile
    /// schema.
    pub async fn profile(&self, token: &TokenSet, params: &OidcParams) -> Result<Profile> {
        let claims = self.validate_id_token(token, params).await?;
        let profile = self.oauth2.provider().profile_map.project(&claims);
        if profile.sub.is_empty() {
            return Err(AuthError::oauth2("No profile sub").into());
        }
        Ok(profile)
    }

    /// The ID-token validation checklist. Order matters; every check
    /// short-circuits.
    fn check_claims(&self, claims: &Value, params: &OidcParams, now_secs: u64) -> Result<()> {
        let Some(object) = claims.as_object() else {
            return Err(AuthError::oidc("JWT payload is invalid").into());
        };

        let missing: Vec<&str> = REQUIRED_CLAIMS
            .iter()
            .copied()
            .filter(|name| !claim_present(object.get(*name)))
            .collect();
        if !missing.is_empty() {
            return Err(AuthError::oidc(format!(
                "ID token missing required parameters: {}",
                missing.join(", ")
            ))
            .into());
        }

        if claim_str(object, "iss") != Some(self.issuer.as_str()) {
            return Err(AuthError::oidc(format!(
                "ID token not issued by correct OpenID provider: {}",
                display_claim(object.get("iss"))
            ))
            .into());
        }

        let client_id = params.oauth2.client_id.as_str();
        match object.get("aud") {
            Some(Value::String(aud)) => {
                if aud != client_id {
                    return Err(AuthError::oidc(format!(
                        "Audience parameter is for a different client: {aud}"
                    ))
                    .into());
                }
            }
            Some(Value::Array(aud)) => {
                if !aud.iter().any(|entry| entry.as_str() == Some(client_id)) {
                    let joined = aud.iter().map(display_value).collect::<Vec<_>>().join(", ");
                    return Err(AuthError::oidc(format!(
                        "Audience parameter does not include this client: {joined}"
                    ))
                    .into());
                }
                if aud.len() > 1 && !claim_present(object.get("azp")) {
                    return Err(
                        AuthError::oidc("`azp` parameter required with multiple audiences").into(),
                    );
                }
            }
            _ => return Err(AuthError::oidc("Invalid `aud` parameter").into()),
        }

        if claim_present(object.get("azp")) && claim_str(object, "azp") != Some(client_id) {
            return Err(AuthError::oidc(format!(
                "This client is not the authorized party: {}",
                display_claim(object.get("azp"))
            ))
            .into());
        }

        let exp = claim_number(object.get("exp")).unwrap_or(0.0);
        if exp < now_secs as f64 {
            return Err(AuthError::oidc("ID token has expired").into());
        }

        if let Some(max_age) = params.max_age {
            let Some(timestamp) = params.timestamp else {
                return Err(UsageError::new(
                    "The timestamp must be provided with `max_age` parameter",
                )
                .into());
            };
            let oldest = (timestamp as f64 - max_age as f64) / 1000.0;
            match claim_number(object.get("auth_time")) {
                Some(auth_time) if auth_time > 0.0 && oldest <= auth_time => {}
                _ => {
                    return Err(
                        AuthError::oidc("Auth time is not included or too old").into(),
                    )
                }
            }
        }

        if let Some(nonce) = params.nonce.as_deref() {
            if claim_str(object, "nonce") != Some(nonce) {
                return Err(AuthError::oidc("Invalid nonce in ID token").into());
            }
        }

        Ok(())
    }
}

/// Whole-token match, so `openidx` or `xopenid` never qualify.
fn contains_openid_scope(scope: &str) -> bool {
    scope
        .split(|c: char| !c.is_ascii_alphanumeric() && c != '_')
        .any(|part| part == "openid")
}

/// Empty strings, zero and `false` count as absent claims.
fn claim_present(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Number(n)) => n.as_f64().is_some_and(|n| n != 0.0),
        Some(_) => true,
    }
}

fn claim_str<'a>(object: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    object
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

/// Numbers or their decimal-string forms; anything else is absent.
fn claim_number(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn display_claim(value: Option<&Value>) -> String {
    value.map(display_value).unwrap_or_default()
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
