//! Client-side OAuth 2.0 and OpenID Connect relying-party engines.
//!
//! The engines shape protocol requests and interpret responses; the HTTP
//! stack and identity-token signature verification are injected
//! collaborators ([`Transport`], [`ClaimsDecoder`]).
//!
//! ```no_run
//! use std::sync::Arc;
//! use signet_client::{providers, FlowParams, OAuth2Client, ReqwestTransport};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let transport = Arc::new(ReqwestTransport::new()?);
//! let github = OAuth2Client::new(providers::github(), transport);
//!
//! let params = FlowParams {
//!     client_id: "client-id".into(),
//!     client_secret: "client-secret".into(),
//!     redirect_uri: "https://app.example.com/login/callback".into(),
//!     scope: Some("read:user".into()),
//!     state: Some("opaque-state".into()),
//! };
//!
//! // 1. Send the user to the provider.
//! println!("visit {}", github.authorize_url(&params));
//!
//! // 2. Exchange the code the provider called back with.
//! let callback = "https://app.example.com/login/callback?code=...&state=opaque-state";
//! let token = github.exchange_callback(callback, &params).await?;
//!
//! // 3. Fetch the normalized profile.
//! let profile = github.profile(&token, &params).await?;
//! println!("authenticated {}", profile.sub);
//! # Ok(())
//! # }
//! ```

mod body;

pub mod claims;
pub mod error;
pub mod oauth2;
pub mod oidc;
pub mod providers;
pub mod transport;

pub use claims::{ClaimsDecoder, UnverifiedJwtDecoder};
pub use error::{BoxError, Error, Result};
pub use oauth2::{OAuth2Client, OAuth2Provider};
pub use oidc::{OidcClient, OidcProvider};
pub use transport::{HttpMethod, HttpRequest, HttpResponse, ReqwestTransport, Transport};

pub use signet_core::{
    AuthError, FlowKind, FlowParams, OidcParams, Profile, ProfileMap, TokenSet, UsageError,
};
