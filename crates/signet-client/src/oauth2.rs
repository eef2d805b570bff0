//! Client-side engine for the OAuth 2.0 authorization-code flow.

use std::sync::Arc;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde_json::Value;
use signet_core::query::{append_query, build_query};
use signet_core::{AuthError, FlowParams, Profile, ProfileMap, TokenSet};
use tracing::{debug, instrument};

use crate::body::{auth_error_in, form_to_value, parse_response_body, ACCEPT, CONTENT_TYPE_FORM};
use crate::error::{Error, Result};
use crate::transport::{HttpMethod, HttpRequest, Transport};

/// Endpoint and profile configuration for an OAuth 2.0 provider.
///
/// Immutable after construction; owned by the engine it is given to.
#[derive(Debug, Clone, PartialEq)]
pub struct OAuth2Provider {
    pub access_token_uri: String,
    pub authorization_uri: String,
    pub profile_uri: String,
    pub profile_map: ProfileMap,
}

/// The OAuth 2.0 authorization-code engine.
///
/// Holds no mutable state: every operation takes `&self` and all per-call
/// data lives in [`FlowParams`], so calls may run concurrently against a
/// single instance without synchronization.
pub struct OAuth2Client {
    provider: OAuth2Provider,
    transport: Arc<dyn Transport>,
}

impl OAuth2Client {
    pub fn new(provider: OAuth2Provider, transport: Arc<dyn Transport>) -> Self {
        Self {
            provider,
            transport,
        }
    }

    pub fn provider(&self) -> &OAuth2Provider {
        &self.provider
    }

    /// Build the provider redirect URL that starts the authorization flow.
    ///
    /// Pure and synchronous; absent optional parameters are omitted from the
    /// query entirely.
    pub fn authorize_url(&self, params: &FlowParams) -> String {
        let query = build_query([
            ("client_id", Some(params.client_id.as_str())),
            ("redirect_uri", Some(params.redirect_uri.as_str())),
            ("scope", params.scope.as_deref()),
            ("response_type", Some("code")),
            ("state", params.state.as_deref()),
        ]);
        append_query(&self.provider.authorization_uri, &query)
    }

    /// Complete the flow from the provider's callback URL.
    ///
    /// Provider-reported errors in the callback query fail first; the
    /// `state` comparison (when the caller supplied one) runs before the
    /// code-presence check.
    #[instrument(skip_all)]
    pub async fn exchange_callback(
        &self,
        callback_uri: &str,
        params: &FlowParams,
    ) -> Result<TokenSet> {
        let query = parse_callback_query(callback_uri);
        if let Some(err) = auth_error_in(&query) {
            return Err(err.into());
        }
        if let Some(expected) = params.state.as_deref() {
            if query_field(&query, "state") != Some(expected) {
                return Err(AuthError::oauth2("OAuth 2.0 state mismatch").into());
            }
        }
        let Some(code) = query_field(&query, "code") else {
            return Err(AuthError::oauth2("Missing OAuth 2.0 code").into());
        };
        debug!("exchanging authorization code");
        self.request_token(
            &[
                ("code", Some(code)),
                ("grant_type", Some("authorization_code")),
                ("redirect_uri", Some(params.redirect_uri.as_str())),
            ],
            params,
        )
        .await
    }

    /// Obtain a fresh token set from a refresh token.
    #[instrument(skip_all)]
    pub async fn refresh(&self, refresh_token: &str, params: &FlowParams) -> Result<TokenSet> {
        self.request_token(
            &[
                ("refresh_token", Some(refresh_token)),
                ("grant_type", Some("refresh_token")),
            ],
            params,
        )
        .await
    }

    /// POST a form-encoded payload to the token endpoint and interpret the
    /// response.
    ///
    /// Lower-level building block behind [`Self::exchange_callback`] and
    /// [`Self::refresh`]; exposed for grant types the engine does not model.
    #[instrument(skip_all, fields(url = %self.provider.access_token_uri))]
    pub async fn request_token(
        &self,
        payload: &[(&str, Option<&str>)],
        params: &FlowParams,
    ) -> Result<TokenSet> {
        let credentials =
            BASE64.encode(format!("{}:{}", params.client_id, params.client_secret));
        let request = HttpRequest {
            url: self.provider.access_token_uri.clone(),
            method: HttpMethod::Post,
            headers: vec![
                ("Authorization".into(), format!("Basic {credentials}")),
                ("Accept".into(), ACCEPT.into()),
                ("Content-Type".into(), CONTENT_TYPE_FORM.into()),
            ],
            body: Some(build_query(payload.iter().copied())),
        };
        let response = self
            .transport
            .send(request)
            .await
            .map_err(Error::Transport)?;
        let body = parse_response_body(&response.body);

        if let Some(err) = auth_error_in(&body) {
            debug!(code = err.code.as_deref(), "token endpoint reported an error");
            return Err(err.into());
        }
        if response.status != 200 {
            return Err(
                AuthError::oauth2(format!("Invalid response status: {}", response.status)).into(),
            );
        }
        token_set_from_body(body)
    }

    /// Fetch the provider's profile endpoint and normalize the response.
    #[instrument(skip_all, fields(url = %self.provider.profile_uri))]
    pub async fn profile(&self, token: &TokenSet, _params: &FlowParams) -> Result<Profile> {
        let request = HttpRequest {
            url: self.provider.profile_uri.clone(),
            method: HttpMethod::Get,
            headers: vec![
                (
                    "Authorization".into(),
                    format!("Bearer {}", token.access_token),
                ),
                ("Accept".into(), ACCEPT.into()),
                ("Content-Type".into(), CONTENT_TYPE_FORM.into()),
            ],
            body: None,
        };
        let response = self
            .transport
            .send(request)
            .await
            .map_err(Error::Transport)?;
        if response.status != 200 {
            return Err(
                AuthError::oauth2(format!("Invalid response status: {}", response.status)).into(),
            );
        }
        let body = parse_response_body(&response.body);
        let profile = self.provider.profile_map.project(&body);
        if profile.sub.is_empty() {
            return Err(AuthError::oauth2("No profile sub").into());
        }
        Ok(profile)
    }
}

/// Extract the query component of a callback URL as a JSON object, so the
/// provider-error check can share [`auth_error_in`].
fn parse_callback_query(callback_uri: &str) -> Value {
    let after_scheme = callback_uri
        .split_once('?')
        .map(|(_, rest)| rest)
        .unwrap_or("");
    let query = after_scheme.split('#').next().unwrap_or("");
    form_to_value(query)
}

fn query_field<'a>(query: &'a Value, key: &str) -> Option<&'a str> {
    query.get(key).and_then(Value::as_str).filter(|s| !s.is_empty())
}

fn token_set_from_body(body: Value) -> Result<TokenSet> {
    let Some(access_token) = string_field(&body, "access_token") else {
        return Err(AuthError::oauth2("Unable to retrieve access token from response").into());
    };
    let expires_in = match body.get("expires_in") {
        Some(Value::Number(n)) => n.as_u64(),
        Some(Value::String(s)) => s.parse().ok(),
        _ => None,
    };
    Ok(TokenSet {
        access_token,
        token_type: string_field(&body, "token_type"),
        refresh_token: string_field(&body, "refresh_token"),
        expires_in,
        id_token: string_field(&body, "id_token"),
        extra: body,
    })
}

fn string_field(body: &Value, key: &str) -> Option<String> {
    body.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}
