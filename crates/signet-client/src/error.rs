use signet_core::{AuthError, UsageError};
use thiserror::Error;

/// Boxed error used at the transport and claims-decoder seams.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Failures surfaced by the OAuth 2.0 and OpenID Connect engines.
///
/// The three variants keep the caller's distinctions intact: the provider
/// rejected the flow, the caller misused the API, or a collaborator (the
/// transport or claims decoder) failed and its error is passed through
/// unchanged.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Usage(#[from] UsageError),
    #[error(transparent)]
    Transport(BoxError),
}

impl Error {
    /// Returns the protocol error, if that is what this is.
    pub fn as_auth(&self) -> Option<&AuthError> {
        match self {
            Error::Auth(err) => Some(err),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use signet_core::FlowKind;

    #[test]
    fn auth_errors_convert_and_display_transparently() {
        let err: Error = AuthError::oauth2("Missing OAuth 2.0 code").into();
        assert_eq!(err.to_string(), "Missing OAuth 2.0 code");
        assert_eq!(err.as_auth().map(|e| e.flow), Some(FlowKind::OAuth2));
    }

    #[test]
    fn transport_errors_keep_their_source_message() {
        let source: BoxError = "connection reset".into();
        let err = Error::Transport(source);
        assert_eq!(err.to_string(), "connection reset");
        assert!(err.as_auth().is_none());
    }
}
