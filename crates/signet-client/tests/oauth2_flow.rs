//! End-to-end OAuth 2.0 flow against a mock provider.

use std::sync::Arc;

use signet_client::{Error, FlowParams, OAuth2Client, OAuth2Provider, ProfileMap, ReqwestTransport};
use wiremock::matchers::{body_string, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn provider(server: &MockServer) -> OAuth2Provider {
    OAuth2Provider {
        access_token_uri: format!("{}/login/oauth/access_token", server.uri()),
        authorization_uri: format!("{}/login/oauth/authorize", server.uri()),
        profile_uri: format!("{}/user", server.uri()),
        profile_map: ProfileMap {
            sub: Some("/id".into()),
            nickname: Some("/login".into()),
            ..ProfileMap::default()
        },
    }
}

fn params() -> FlowParams {
    FlowParams {
        client_id: "abc".into(),
        client_secret: "123".into(),
        redirect_uri: "http://example.com/login/callback".into(),
        scope: Some("user".into()),
        state: Some("state".into()),
    }
}

fn client(server: &MockServer) -> OAuth2Client {
    let transport = Arc::new(ReqwestTransport::new().expect("transport"));
    OAuth2Client::new(provider(server), transport)
}

#[tokio::test]
async fn exchanges_a_code_and_fetches_the_profile() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/login/oauth/access_token"))
        .and(header("Authorization", "Basic YWJjOjEyMw=="))
        .and(header("Content-Type", "application/x-www-form-urlencoded"))
        .and(body_string(
            "code=xyz&grant_type=authorization_code&redirect_uri=http%3A%2F%2Fexample.com%2Flogin%2Fcallback",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "access-123",
            "token_type": "bearer",
            "refresh_token": "refresh-456",
            "expires_in": 3600,
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/user"))
        .and(header("Authorization", "Bearer access-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": 42,
            "login": "janedoe",
        })))
        .mount(&server)
        .await;

    let client = client(&server);
    let token = client
        .exchange_callback(
            "http://example.com/login/callback?code=xyz&state=state",
            &params(),
        )
        .await
        .expect("token exchange");

    assert_eq!(token.access_token, "access-123");
    assert_eq!(token.refresh_token.as_deref(), Some("refresh-456"));
    assert_eq!(token.expires_in, Some(3600));

    let profile = client.profile(&token, &params()).await.expect("profile");
    assert_eq!(profile.sub, "42");
    assert_eq!(profile.nickname.as_deref(), Some("janedoe"));
}

#[tokio::test]
async fn form_encoded_token_responses_are_understood() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/login/oauth/access_token"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("access_token=access-7&token_type=bearer&expires_in=7200"),
        )
        .mount(&server)
        .await;

    let token = client(&server)
        .refresh("refresh-456", &params())
        .await
        .expect("refresh");

    assert_eq!(token.access_token, "access-7");
    assert_eq!(token.token_type.as_deref(), Some("bearer"));
    assert_eq!(token.expires_in, Some(7200));
}

#[tokio::test]
async fn provider_errors_on_a_success_status_are_reported() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/login/oauth/access_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "error": "invalid_grant",
            "error_description": "The code passed is incorrect or expired.",
        })))
        .mount(&server)
        .await;

    let result = client(&server)
        .exchange_callback(
            "http://example.com/login/callback?code=stale&state=state",
            &params(),
        )
        .await;

    match result {
        Err(Error::Auth(err)) => {
            assert_eq!(err.message, "The code passed is incorrect or expired.");
            assert_eq!(err.code.as_deref(), Some("invalid_grant"));
        }
        other => panic!("expected auth error, got {other:?}"),
    }
}

#[tokio::test]
async fn unexpected_statuses_are_reported() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/login/oauth/access_token"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream down"))
        .mount(&server)
        .await;

    let result = client(&server)
        .exchange_callback(
            "http://example.com/login/callback?code=xyz&state=state",
            &params(),
        )
        .await;

    match result {
        Err(Error::Auth(err)) => assert_eq!(err.message, "Invalid response status: 503"),
        other => panic!("expected auth error, got {other:?}"),
    }
}
