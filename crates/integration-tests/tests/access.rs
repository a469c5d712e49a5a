//! Token checks and role enforcement over HTTP.

#![allow(clippy::unwrap_used)]

use beverly_integration_tests::TestApp;
use beverly_server::config::ServerConfig;
use reqwest::Method;

#[tokio::test]
async fn test_missing_and_malformed_tokens_are_unauthorized() {
    let app = TestApp::spawn().await;

    let (status, body) = app.call(Method::GET, "/auth/me", None, None).await;
    assert_eq!(status, 401);
    assert_eq!(body["message"], "Access denied. No token provided.");

    let (status, body) = app
        .call(Method::GET, "/auth/me", Some("not.a.token"), None)
        .await;
    assert_eq!(status, 401);
    assert_eq!(body["message"], "Invalid or expired token.");
}

#[tokio::test]
async fn test_token_for_unknown_user_is_unauthorized_not_forbidden() {
    // Same signing secret, separate user stores: the token verifies but its
    // user does not exist on the second server.
    let config = ServerConfig::for_tests();
    let issuer = TestApp::spawn_with(config.clone()).await;
    let other = TestApp::spawn_with(config).await;

    let token = issuer.register("a@x.com", "secret1", "alice").await;

    let (status, body) = other.call(Method::GET, "/admin/stats", Some(&token), None).await;
    assert_eq!(status, 401);
    assert_eq!(body["message"], "Invalid or expired token.");
}

#[tokio::test]
async fn test_admin_routes_enforce_role() {
    let app = TestApp::spawn().await;
    let admin = app.register("a@x.com", "secret1", "alice").await;
    let user = app.register("b@x.com", "secret2", "bob").await;

    for path in ["/admin/stats", "/admin/users", "/admin/chats"] {
        let (status, body) = app.call(Method::GET, path, Some(&user), None).await;
        assert_eq!(status, 403, "{path}");
        assert_eq!(body["message"], "Admin access required");

        let (status, body) = app.call(Method::GET, path, Some(&admin), None).await;
        assert_eq!(status, 200, "{path}");
        assert_eq!(body["success"], true);
    }
}
