use super::*;
use crate::net::test_server::{StubRoutes, config_for, dead_base_url, truncated_body_base_url, user_json};

// =============================================================
// Helpers
// =============================================================

fn make_user() -> User {
    serde_json::from_value(user_json("u-1", "a@b.com", "Ada")).unwrap()
}

fn login_request() -> LoginRequest {
    LoginRequest { email: "a@b.com".to_owned(), password: "secret123".to_owned() }
}

// =============================================================
// Operation table
// =============================================================

#[test]
fn operation_paths_match_backend_contract() {
    assert_eq!(Operation::Register.path(), "/users/register");
    assert_eq!(Operation::Login.path(), "/users/login");
    assert_eq!(Operation::GetProfile.path(), "/users/me");
    assert_eq!(Operation::ForgotPassword.path(), "/users/forgot-password");
    assert_eq!(Operation::ResetPassword.path(), "/users/reset-password");
}

#[test]
fn only_profile_is_a_get() {
    assert_eq!(Operation::GetProfile.method(), Method::GET);
    for op in [Operation::Register, Operation::Login, Operation::ForgotPassword, Operation::ResetPassword] {
        assert_eq!(op.method(), Method::POST);
    }
}

#[test]
fn profile_edits_share_the_me_path() {
    assert_eq!(Operation::UpdateProfile.method(), Method::PUT);
    assert_eq!(Operation::DeleteAccount.method(), Method::DELETE);
    assert_eq!(Operation::UpdateProfile.path(), "/users/me");
    assert_eq!(Operation::DeleteAccount.path(), "/users/me");
    assert_eq!(Operation::UpdateProfile.fallback_message(), "Failed to update profile");
    assert_eq!(Operation::DeleteAccount.fallback_message(), "Failed to delete account");
}

#[test]
fn bearer_header_is_sensitive() {
    let value = bearer_header("tok1").unwrap();
    assert_eq!(value.to_str().unwrap(), "Bearer tok1");
    assert!(value.is_sensitive());
}

#[test]
fn bearer_header_rejects_control_characters() {
    assert!(matches!(bearer_header("bad\ntoken"), Err(ApiError::InvalidToken(_))));
}

// =============================================================
// Credential attachment
// =============================================================

#[tokio::test]
async fn anonymous_requests_carry_no_credential() {
    let stub = StubRoutes::new()
        .json("POST", "/users/forgot-password", 200, serde_json::json!({ "message": "OTP sent to your email" }))
        .spawn()
        .await;
    let client = stub.client(SessionStore::in_memory());

    let ack = client
        .forgot_password(&ForgotPasswordRequest { email: "a@b.com".to_owned() })
        .await
        .unwrap();

    assert_eq!(ack.message, "OTP sent to your email");
    let requests = stub.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].authorization, None);
    assert_eq!(requests[0].json(), serde_json::json!({ "email": "a@b.com" }));
}

#[tokio::test]
async fn held_token_is_sent_as_bearer_on_every_operation() {
    let stub = StubRoutes::new()
        .json("GET", "/users/me", 200, user_json("u-1", "a@b.com", "Ada"))
        .json("POST", "/users/reset-password", 200, serde_json::json!({ "message": "Password reset successful" }))
        .spawn()
        .await;
    let session = SessionStore::in_memory();
    session.set_auth("tok9", make_user()).unwrap();
    let client = stub.client(session);

    client.get_profile().await.unwrap();
    client
        .reset_password(&ResetPasswordRequest {
            email: "a@b.com".to_owned(),
            otp: "123456".to_owned(),
            new_password: "newsecret1".to_owned(),
        })
        .await
        .unwrap();

    let requests = stub.requests();
    assert_eq!(requests[0].method, "GET");
    assert_eq!(requests[1].method, "POST");
    for request in requests {
        assert_eq!(request.authorization.as_deref(), Some("Bearer tok9"), "{}", request.path);
    }
}

#[tokio::test]
async fn credential_follows_session_changes_between_calls() {
    let stub = StubRoutes::new()
        .json("GET", "/users/me", 401, serde_json::json!({ "detail": "Could not validate credentials" }))
        .spawn()
        .await;
    let session = SessionStore::in_memory();
    let client = stub.client(session.clone());

    let _ = client.get_profile().await;
    session.set_auth("tok1", make_user()).unwrap();
    let _ = client.get_profile().await;
    session.logout();
    let _ = client.get_profile().await;

    let auth: Vec<_> = stub.requests().into_iter().map(|r| r.authorization).collect();
    assert_eq!(auth, vec![None, Some("Bearer tok1".to_owned()), None]);
}

// =============================================================
// Operations
// =============================================================

#[tokio::test]
async fn login_decodes_token_and_user_without_touching_session() {
    let stub = StubRoutes::new()
        .json(
            "POST",
            "/users/login",
            200,
            serde_json::json!({ "access_token": "tok1", "token_type": "bearer", "user": user_json("u-1", "a@b.com", "Ada") }),
        )
        .spawn()
        .await;
    let session = SessionStore::in_memory();
    let client = stub.client(session.clone());

    let resp = client.login(&login_request()).await.unwrap();

    assert_eq!(resp.access_token, "tok1");
    assert_eq!(resp.user, make_user());
    assert!(!session.is_authenticated());
    assert_eq!(
        stub.requests()[0].json(),
        serde_json::json!({ "email": "a@b.com", "password": "secret123" })
    );
}

#[tokio::test]
async fn register_posts_all_fields_and_returns_created_user() {
    let stub = StubRoutes::new()
        .json("POST", "/users/register", 201, user_json("u-7", "new@b.com", "Grace"))
        .spawn()
        .await;
    let client = stub.client(SessionStore::in_memory());

    let created = client
        .register(&RegisterRequest {
            email: "new@b.com".to_owned(),
            password: "secret123".to_owned(),
            first_name: "Grace".to_owned(),
            last_name: "Hopper".to_owned(),
            mobile_number: "5550001111".to_owned(),
        })
        .await
        .unwrap();

    assert_eq!(created.id, "u-7");
    let body = stub.requests()[0].json();
    assert_eq!(body["first_name"], "Grace");
    assert_eq!(body["mobile_number"], "5550001111");
    assert!(body.get("confirm_password").is_none());
}

#[tokio::test]
async fn update_profile_puts_changed_fields_with_bearer() {
    let stub = StubRoutes::new()
        .json("PUT", "/users/me", 200, user_json("u-1", "a@b.com", "Augusta"))
        .spawn()
        .await;
    let session = SessionStore::in_memory();
    session.set_auth("tok1", make_user()).unwrap();
    let client = stub.client(session.clone());

    let updated = client
        .update_profile(&UpdateProfileRequest { first_name: Some("Augusta".to_owned()), ..Default::default() })
        .await
        .unwrap();

    assert_eq!(updated.first_name, "Augusta");
    let requests = stub.requests();
    assert_eq!(requests[0].method, "PUT");
    assert_eq!(requests[0].authorization.as_deref(), Some("Bearer tok1"));
    assert_eq!(requests[0].json(), serde_json::json!({ "first_name": "Augusta" }));
    assert_eq!(session.snapshot().user(), Some(&make_user()));
}

#[tokio::test]
async fn delete_account_sends_bearer_and_leaves_session_alone() {
    let stub = StubRoutes::new()
        .json("DELETE", "/users/me", 200, serde_json::json!({ "message": "User deleted successfully" }))
        .spawn()
        .await;
    let session = SessionStore::in_memory();
    session.set_auth("tok1", make_user()).unwrap();
    let client = stub.client(session.clone());

    let ack = client.delete_account().await.unwrap();

    assert_eq!(ack.message, "User deleted successfully");
    let requests = stub.requests();
    assert_eq!(requests[0].method, "DELETE");
    assert_eq!(requests[0].authorization.as_deref(), Some("Bearer tok1"));
    assert!(session.is_authenticated());
}

// =============================================================
// Error surfacing
// =============================================================

#[tokio::test]
async fn server_detail_is_surfaced_exactly() {
    let stub = StubRoutes::new()
        .json("POST", "/users/login", 401, serde_json::json!({ "detail": "Invalid credentials" }))
        .spawn()
        .await;
    let client = stub.client(SessionStore::in_memory());

    let err = client.login(&login_request()).await.unwrap_err();

    assert_eq!(err.to_string(), "Invalid credentials");
    assert!(err.is_unauthorized());
}

#[tokio::test]
async fn missing_detail_uses_generic_fallback() {
    let stub = StubRoutes::new()
        .json("POST", "/users/login", 500, serde_json::json!({}))
        .spawn()
        .await;
    let client = stub.client(SessionStore::in_memory());

    let err = client.login(&login_request()).await.unwrap_err();

    assert_eq!(err.to_string(), "Login failed");
    assert_eq!(err.status(), Some(500));
}

#[tokio::test]
async fn non_json_error_body_uses_generic_fallback() {
    let stub = StubRoutes::new()
        .raw("POST", "/users/forgot-password", 502, "<html>Bad Gateway</html>")
        .spawn()
        .await;
    let client = stub.client(SessionStore::in_memory());

    let err = client
        .forgot_password(&ForgotPasswordRequest { email: "a@b.com".to_owned() })
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Failed to send OTP");
}

#[tokio::test]
async fn malformed_success_payload_is_a_decode_error() {
    let stub = StubRoutes::new()
        .json("GET", "/users/me", 200, serde_json::json!({ "id": "u-1" }))
        .spawn()
        .await;
    let client = stub.client(SessionStore::in_memory());

    let err = client.get_profile().await.unwrap_err();

    assert!(matches!(err, ApiError::Decode { operation: Operation::GetProfile, .. }));
    assert_eq!(err.to_string(), "Failed to load profile");
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    let client = ApiClient::new(&config_for(&dead_base_url().await), SessionStore::in_memory()).unwrap();

    let err = client.login(&login_request()).await.unwrap_err();

    assert!(matches!(err, ApiError::Transport { operation: Operation::Login, .. }));
    assert_eq!(err.to_string(), "Login failed");
    assert!(std::error::Error::source(&err).is_some());
}

#[tokio::test]
async fn truncated_body_is_a_transport_error() {
    let client = ApiClient::new(&config_for(&truncated_body_base_url().await), SessionStore::in_memory()).unwrap();

    let err = client.get_profile().await.unwrap_err();

    assert!(matches!(err, ApiError::Transport { operation: Operation::GetProfile, .. }));
    assert_eq!(err.to_string(), "Failed to load profile");
}

#[tokio::test]
async fn failures_are_not_retried() {
    let stub = StubRoutes::new()
        .json("POST", "/users/login", 503, serde_json::json!({ "detail": "Service unavailable" }))
        .spawn()
        .await;
    let client = stub.client(SessionStore::in_memory());

    let _ = client.login(&login_request()).await;

    assert_eq!(stub.hit_count(), 1);
}

#[tokio::test]
async fn concurrent_calls_are_independent() {
    let stub = StubRoutes::new()
        .json("GET", "/users/me", 200, user_json("u-1", "a@b.com", "Ada"))
        .spawn()
        .await;
    let session = SessionStore::in_memory();
    session.set_auth("tok1", make_user()).unwrap();
    let client = stub.client(session);

    let (a, b, c) = tokio::join!(client.get_profile(), client.get_profile(), client.get_profile());

    assert!(a.is_ok() && b.is_ok() && c.is_ok());
    assert_eq!(stub.hit_count(), 3);
}
