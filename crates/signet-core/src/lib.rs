//! Protocol primitives shared by the signet OAuth 2.0 / OpenID Connect
//! client: the error model, deterministic query construction, the normalized
//! profile schema and its pointer map, and the per-call flow types.
//!
//! Nothing here performs I/O; the engines in `signet-client` compose these
//! pieces around an injected transport.

pub mod error;
pub mod profile;
pub mod query;
pub mod types;

pub use error::{AuthError, FlowKind, UsageError};
pub use profile::{Profile, ProfileMap};
pub use types::{FlowParams, OidcParams, TokenSet};
