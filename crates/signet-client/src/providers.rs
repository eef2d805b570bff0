//! Ready-made configurations for common providers.
//!
//! Presets only fill in endpoints and profile mappings; credentials and
//! redirect URIs stay per-call in the flow params.

use signet_core::ProfileMap;

use crate::oauth2::OAuth2Provider;
use crate::oidc::OidcProvider;

/// GitHub's OAuth 2.0 endpoints; `sub` comes from the numeric account id.
pub fn github() -> OAuth2Provider {
    OAuth2Provider {
        authorization_uri: "https://github.com/login/oauth/authorize".into(),
        access_token_uri: "https://github.com/login/oauth/access_token".into(),
        profile_uri: "https://api.github.com/user".into(),
        profile_map: ProfileMap {
            sub: Some("/id".into()),
            name: Some("/name".into()),
            nickname: Some("/login".into()),
            picture: Some("/avatar_url".into()),
            website: Some("/blog".into()),
            email: Some("/email".into()),
            ..ProfileMap::default()
        },
    }
}

/// Google's OpenID Connect endpoints.
pub fn google() -> OidcProvider {
    OidcProvider {
        authorization_uri: "https://accounts.google.com/o/oauth2/v2/auth".into(),
        access_token_uri: "https://oauth2.googleapis.com/token".into(),
        issuer: "https://accounts.google.com".into(),
        profile_map: None,
    }
}

/// Microsoft identity platform (common tenant) OpenID Connect endpoints.
pub fn microsoft() -> OidcProvider {
    OidcProvider {
        authorization_uri: "https://login.microsoftonline.com/common/oauth2/v2.0/authorize".into(),
        access_token_uri: "https://login.microsoftonline.com/common/oauth2/v2.0/token".into(),
        issuer: "https://login.microsoftonline.com/common/v2.0".into(),
        profile_map: None,
    }
}
