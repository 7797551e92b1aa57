//! Session and transport tests against a mock amoCRM server

use amocrm_client::config::CrmConfig;
use amocrm_client::services::encoder::Query;
use amocrm_client::services::session::Session;
use amocrm_client::CrmError;
use httpmock::prelude::*;
use serde_json::json;
use std::time::Duration;

fn config(server: &MockServer) -> CrmConfig {
    CrmConfig::new(server.base_url(), "manager", "0123456789abcdef")
}

fn login_ok() -> serde_json::Value {
    json!({
        "response": {
            "auth": true,
            "accounts": [{
                "id": "1001",
                "name": "Acme",
                "subdomain": "acme",
                "language": "en",
                "timezone": "Europe/London"
            }],
            "user": {"id": 7, "language": "en"},
            "server_time": 1_700_000_000
        }
    })
}

#[tokio::test]
async fn test_connect_captures_cookies_and_accounts() {
    let server = MockServer::start_async().await;
    let login = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/private/api/auth.php")
                .query_param("type", "json")
                .body_contains("USER_LOGIN=manager")
                .body_contains("USER_HASH=0123456789abcdef");
            then.status(200)
                .header("Set-Cookie", "session_id=abc123; path=/")
                .json_body(login_ok());
        })
        .await;

    let session = Session::connect(&config(&server)).await.unwrap();

    login.assert_async().await;
    assert_eq!(session.login(), "manager");
    assert_eq!(session.base_url(), server.base_url());
    assert_eq!(
        session.cookies(),
        &[("session_id".to_string(), "abc123".to_string())]
    );
    assert_eq!(session.accounts().len(), 1);
    assert_eq!(session.accounts()[0].subdomain, "acme");
}

#[tokio::test]
async fn test_connect_rejected_credentials() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/private/api/auth.php");
            then.status(200).json_body(json!({
                "response": {"auth": false, "error": "Incorrect login or password", "error_code": "110"}
            }));
        })
        .await;

    let err = Session::connect(&config(&server)).await.unwrap_err();
    match err {
        CrmError::Authentication { code, message } => {
            assert_eq!(code.as_deref(), Some("110"));
            assert_eq!(message, "Incorrect login or password");
        }
        other => panic!("Expected authentication error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_connect_non_200_is_status_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/private/api/auth.php");
            then.status(503).body("maintenance");
        })
        .await;

    let err = Session::connect(&config(&server)).await.unwrap_err();
    assert_eq!(err.status_code(), Some(503));
    assert!(err.to_string().contains("maintenance"));
}

#[tokio::test]
async fn test_connect_garbage_body_is_decode_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/private/api/auth.php");
            then.status(200).body("<html>login</html>");
        })
        .await;

    let err = Session::connect(&config(&server)).await.unwrap_err();
    assert!(matches!(err, CrmError::Decode(_)));
}

#[tokio::test]
async fn test_calls_reuse_session_cookie() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/private/api/auth.php");
            then.status(200)
                .header("Set-Cookie", "session_id=abc123; path=/; HttpOnly")
                .json_body(login_ok());
        })
        .await;
    let leads = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/v2/leads")
                .header("Cookie", "session_id=abc123")
                .query_param("id", "3,1,2");
            then.status(200).body("{}");
        })
        .await;

    let session = Session::connect(&config(&server)).await.unwrap();
    let body = session
        .get("/api/v2/leads", &Query::new().ids("id", &[3, 1, 2]))
        .await
        .unwrap();

    leads.assert_async().await;
    assert_eq!(body, b"{}");
}

#[tokio::test]
async fn test_no_content_is_empty_body() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/private/api/auth.php");
            then.status(200).json_body(login_ok());
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/v2/tasks");
            then.status(204);
        })
        .await;

    let session = Session::connect(&config(&server)).await.unwrap();
    let body = session.get("/api/v2/tasks", &Query::new()).await.unwrap();
    assert!(body.is_empty());
}

#[tokio::test]
async fn test_expired_session_is_not_renewed() {
    let server = MockServer::start_async().await;
    let login = server
        .mock_async(|when, then| {
            when.method(POST).path("/private/api/auth.php");
            then.status(200).json_body(login_ok());
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/v2/account");
            then.status(401).body("Unauthorized");
        })
        .await;

    let session = Session::connect(&config(&server)).await.unwrap();
    let err = session.get("/api/v2/account", &Query::new()).await.unwrap_err();

    assert_eq!(err.status_code(), Some(401));
    login.assert_hits_async(1).await;
}

#[tokio::test]
async fn test_post_json_sends_body() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/private/api/auth.php");
            then.status(200).json_body(login_ok());
        })
        .await;
    let notes = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/v2/notes")
                .header("Content-Type", "application/json")
                .json_body(json!({"add": [{"text": "hello"}]}));
            then.status(200).body("{}");
        })
        .await;

    let session = Session::connect(&config(&server)).await.unwrap();
    session
        .post_json("/api/v2/notes", &json!({"add": [{"text": "hello"}]}))
        .await
        .unwrap();

    notes.assert_async().await;
}

#[tokio::test]
async fn test_caller_deadline_cancels_call() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/private/api/auth.php");
            then.status(200).json_body(login_ok());
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/v2/leads");
            then.status(200).delay(Duration::from_secs(5)).body("{}");
        })
        .await;

    let session = Session::connect(&config(&server)).await.unwrap();
    let result = tokio::time::timeout(
        Duration::from_millis(200),
        session.get("/api/v2/leads", &Query::new()),
    )
    .await;

    assert!(result.is_err());
}

#[tokio::test]
async fn test_configured_timeout_is_timeout_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/private/api/auth.php");
            then.status(200).json_body(login_ok());
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/v2/leads");
            then.status(200).delay(Duration::from_secs(3)).body("{}");
        })
        .await;

    let session = Session::connect(&config(&server).with_timeout(1)).await.unwrap();
    let err = session.get("/api/v2/leads", &Query::new()).await.unwrap_err();

    assert!(matches!(err, CrmError::Timeout));
}
