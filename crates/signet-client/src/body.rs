//! Interpretation of token-endpoint and profile responses.

use serde_json::{Map, Value};
use signet_core::AuthError;
use url::form_urlencoded;

/// Accept header sent on every token and profile request.
pub(crate) const ACCEPT: &str = "application/json, application/x-www-form-urlencoded";
/// Content type of the form-encoded payloads the engines send.
pub(crate) const CONTENT_TYPE_FORM: &str = "application/x-www-form-urlencoded";

/// Parse a response body as JSON, falling back to form decoding.
///
/// RFC 6749 requires JSON, but several providers (GitHub among them) still
/// answer token requests with `application/x-www-form-urlencoded` bodies.
pub(crate) fn parse_response_body(body: &str) -> Value {
    serde_json::from_str(body).unwrap_or_else(|_| form_to_value(body))
}

/// Decode a form-encoded string into a JSON object of string values.
pub(crate) fn form_to_value(input: &str) -> Value {
    let mut object = Map::new();
    for (key, value) in form_urlencoded::parse(input.as_bytes()) {
        object.insert(key.into_owned(), Value::String(value.into_owned()));
    }
    Value::Object(object)
}

/// Check a parsed body (or callback query) for a provider-reported error.
///
/// Runs before any status-code check: providers that return errors with HTTP
/// 200 still get reported as protocol failures.
pub(crate) fn auth_error_in(body: &Value) -> Option<AuthError> {
    let code = non_empty(body.get("error"));
    let description = non_empty(body.get("error_description"));
    if code.is_none() && description.is_none() {
        return None;
    }
    let message = description.or_else(|| code.clone()).unwrap_or_default();
    Some(
        AuthError::oauth2(message)
            .with_code(code)
            .with_uri(non_empty(body.get("error_uri"))),
    )
}

fn non_empty(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}
