//! Identity-token decoding seam.

use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use serde_json::Value;

use crate::error::BoxError;

/// Turns a compact identity token into decoded claims.
///
/// Signature trust is this collaborator's responsibility: the validation
/// checklist treats whatever it returns as already verified. Implementations
/// that fetch the provider's JWKS may do so asynchronously.
#[async_trait]
pub trait ClaimsDecoder: Send + Sync {
    async fn decode(&self, id_token: &str) -> Result<Value, BoxError>;
}

/// Decoder that reads the payload segment without checking the signature.
///
/// Performs **no** cryptographic verification whatsoever; use it only where
/// trust is established elsewhere (tests, tokens received over a direct TLS
/// channel from the issuer). Plug a JWKS-backed decoder for anything else.
///
/// Malformed tokens decode to `Value::Null`, which the validation checklist
/// rejects as an invalid payload.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnverifiedJwtDecoder;

#[async_trait]
impl ClaimsDecoder for UnverifiedJwtDecoder {
    async fn decode(&self, id_token: &str) -> Result<Value, BoxError> {
        Ok(decode_payload(id_token).unwrap_or(Value::Null))
    }
}

fn decode_payload(id_token: &str) -> Option<Value> {
    let mut segments = id_token.split('.');
    let _header = segments.next()?;
    let payload = segments.next()?;
    let bytes = URL_SAFE_NO_PAD.decode(payload).ok()?;
    serde_json::from_slice(&bytes).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn unsigned_token(claims: &Value) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none"}"#);
        let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
        format!("{header}.{payload}.")
    }

    #[tokio::test]
    async fn decodes_the_payload_segment() {
        let claims = json!({"iss": "https://issuer.example", "sub": "user-1"});
        let token = unsigned_token(&claims);
        let decoded = UnverifiedJwtDecoder.decode(&token).await.expect("decode");
        assert_eq!(decoded, claims);
    }

    #[tokio::test]
    async fn malformed_tokens_decode_to_null() {
        for token in ["", "not-a-jwt", "a.!!!.c", "a.bm90LWpzb24.c"] {
            let decoded = UnverifiedJwtDecoder.decode(token).await.expect("decode");
            assert_eq!(decoded, Value::Null, "token {token:?}");
        }
    }
}
