use std::sync::{Arc, Mutex};

use chrono::{Duration as ChronoDuration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::StatusCode;
use serde_json::json;

use gatekey_api::app::services::AppServices;
use gatekey_auth::{Argon2Verifier, Hs256TokenIssuer, Role, TokenClaims, TokenPurpose};
use gatekey_core::AccountId;
use gatekey_identity::{InMemoryAccountStore, MailSender, ServiceConfig};

const JWT_SECRET: &str = "test-secret";

/// Captures dispatched verification tokens so tests can redeem them.
#[derive(Default)]
struct CapturingMailSender {
    sent: Mutex<Vec<(AccountId, String)>>,
}

impl CapturingMailSender {
    fn last(&self) -> Option<(AccountId, String)> {
        self.sent.lock().unwrap().last().cloned()
    }
}

impl MailSender for CapturingMailSender {
    fn send_verification(&self, _email: &str, account_id: AccountId, token: &str) {
        self.sent.lock().unwrap().push((account_id, token.to_string()));
    }
}

struct TestServer {
    base_url: String,
    mail: Arc<CapturingMailSender>,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        Self::spawn_with(ServiceConfig::default()).await
    }

    async fn spawn_with(config: ServiceConfig) -> Self {
        // Same wiring as prod, except the mail sender is captured and the
        // listener binds an ephemeral port.
        let mail = Arc::new(CapturingMailSender::default());
        let services = Arc::new(AppServices::with_collaborators(
            Arc::new(InMemoryAccountStore::new()),
            Arc::new(Argon2Verifier),
            Arc::new(Hs256TokenIssuer::new(JWT_SECRET.as_bytes())),
            mail.clone(),
            config,
        ));
        let app = gatekey_api::app::build_app(services);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url,
            mail,
            handle,
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn register(
    client: &reqwest::Client,
    base_url: &str,
    email: &str,
    role: &str,
) -> serde_json::Value {
    let res = client
        .post(format!("{}/register/", base_url))
        .json(&json!({ "email": email, "password": "Pass1234!", "role": role }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    res.json().await.unwrap()
}

async fn login(client: &reqwest::Client, base_url: &str, email: &str) -> String {
    let res = client
        .post(format!("{}/login/", base_url))
        .json(&json!({ "email": email, "password": "Pass1234!" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    body["access_token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn health_is_public() {
    let srv = TestServer::spawn().await;
    let res = reqwest::get(format!("{}/health", srv.base_url)).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn auth_required_for_protected_endpoints() {
    let srv = TestServer::spawn().await;

    let client = reqwest::Client::new();
    let res = client
        .get(format!("{}/users/me", srv.base_url))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn verification_token_is_not_an_access_token() {
    let srv = TestServer::spawn().await;

    // Correctly signed, but minted for the EMAIL_VERIFY purpose.
    let now = Utc::now();
    let claims = TokenClaims {
        sub: AccountId::new(),
        role: Role::Admin,
        purpose: TokenPurpose::EmailVerify,
        jti: "jti-test".to_string(),
        issued_at: now,
        expires_at: now + ChronoDuration::minutes(10),
    };
    let token = jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(JWT_SECRET.as_bytes()),
    )
    .expect("failed to encode jwt");

    let client = reqwest::Client::new();
    let res = client
        .get(format!("{}/users/me", srv.base_url))
        .bearer_auth(token)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn elevated_roles_can_read_and_update_me() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    for (email, role) in [
        ("admin@example.com", "ADMIN"),
        ("manager@example.com", "MANAGER"),
    ] {
        let created = register(&client, &srv.base_url, email, role).await;
        let token = login(&client, &srv.base_url, email).await;

        let res = client
            .get(format!("{}/users/me", srv.base_url))
            .bearer_auth(&token)
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let me: serde_json::Value = res.json().await.unwrap();
        assert_eq!(me["id"], created["id"]);
        assert_eq!(me["role"].as_str().unwrap(), role);

        let res = client
            .patch(format!("{}/users/me", srv.base_url))
            .bearer_auth(&token)
            .json(&json!({ "bio": "Updated" }))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let me: serde_json::Value = res.json().await.unwrap();
        assert_eq!(me["bio"].as_str().unwrap(), "Updated");
    }
}

#[tokio::test]
async fn authenticated_role_forbidden_on_me() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    register(&client, &srv.base_url, "user@example.com", "AUTHENTICATED").await;
    let token = login(&client, &srv.base_url, "user@example.com").await;

    let res = client
        .get(format!("{}/users/me", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = client
        .patch(format!("{}/users/me", srv.base_url))
        .bearer_auth(&token)
        .json(&json!({ "bio": "Trying to escalate" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn professional_status_matrix() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let user = register(&client, &srv.base_url, "user@example.com", "AUTHENTICATED").await;
    let user_id = user["id"].as_str().unwrap();

    register(&client, &srv.base_url, "admin@example.com", "ADMIN").await;
    register(&client, &srv.base_url, "manager@example.com", "MANAGER").await;
    let admin_token = login(&client, &srv.base_url, "admin@example.com").await;
    let manager_token = login(&client, &srv.base_url, "manager@example.com").await;
    let user_token = login(&client, &srv.base_url, "user@example.com").await;

    // ADMIN and MANAGER can set the flag on any account.
    for token in [&admin_token, &manager_token] {
        let res = client
            .patch(format!("{}/users/{}/professional", srv.base_url, user_id))
            .bearer_auth(token)
            .json(&json!({ "is_professional": true }))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let body: serde_json::Value = res.json().await.unwrap();
        assert_eq!(body["is_professional"], json!(true));
    }

    // AUTHENTICATED is forbidden.
    let res = client
        .patch(format!("{}/users/{}/professional", srv.base_url, user_id))
        .bearer_auth(&user_token)
        .json(&json!({ "is_professional": true }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    // Unknown target id yields 404 for an authorized actor.
    let res = client
        .patch(format!(
            "{}/users/{}/professional",
            srv.base_url,
            AccountId::new()
        ))
        .bearer_auth(&admin_token)
        .json(&json!({ "is_professional": true }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn user_crud_lifecycle() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    register(&client, &srv.base_url, "admin@example.com", "ADMIN").await;
    let token = login(&client, &srv.base_url, "admin@example.com").await;

    // Create
    let res = client
        .post(format!("{}/users/", srv.base_url))
        .bearer_auth(&token)
        .json(&json!({
            "email": "new@example.com",
            "password": "Pass1234!",
            "role": "AUTHENTICATED",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: serde_json::Value = res.json().await.unwrap();
    assert_eq!(created["email"].as_str().unwrap(), "new@example.com");
    let id = created["id"].as_str().unwrap().to_string();

    // Duplicate create
    let res = client
        .post(format!("{}/users/", srv.base_url))
        .bearer_auth(&token)
        .json(&json!({
            "email": "new@example.com",
            "password": "Pass1234!",
            "role": "AUTHENTICATED",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    // Update bio, then read it back.
    let res = client
        .put(format!("{}/users/{}", srv.base_url, id))
        .bearer_auth(&token)
        .json(&json!({ "bio": "X" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .get(format!("{}/users/{}", srv.base_url, id))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let fetched: serde_json::Value = res.json().await.unwrap();
    assert_eq!(fetched["bio"].as_str().unwrap(), "X");

    // Delete, then both delete and get report 404.
    let res = client
        .delete(format!("{}/users/{}", srv.base_url, id))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = client
        .get(format!("{}/users/{}", srv.base_url, id))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = client
        .delete(format!("{}/users/{}", srv.base_url, id))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn list_users_paginates() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    register(&client, &srv.base_url, "admin@example.com", "ADMIN").await;
    for i in 0..3 {
        register(
            &client,
            &srv.base_url,
            &format!("u{i}@example.com"),
            "AUTHENTICATED",
        )
        .await;
    }
    let token = login(&client, &srv.base_url, "admin@example.com").await;

    let res = client
        .get(format!("{}/users/?skip=0&limit=2", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["total"], json!(4));
    assert_eq!(body["items"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn register_duplicate_is_rejected() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    register(&client, &srv.base_url, "a@example.com", "AUTHENTICATED").await;

    let res = client
        .post(format!("{}/register/", srv.base_url))
        .json(&json!({
            "email": "a@example.com",
            "password": "Other123!",
            "role": "AUTHENTICATED",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn login_wrong_password_then_lockout() {
    let srv = TestServer::spawn_with(ServiceConfig {
        max_failed_logins: 2,
        ..Default::default()
    })
    .await;
    let client = reqwest::Client::new();

    register(&client, &srv.base_url, "a@example.com", "AUTHENTICATED").await;

    // Wrong password on an unlocked account: 401.
    for _ in 0..2 {
        let res = client
            .post(format!("{}/login/", srv.base_url))
            .json(&json!({ "email": "a@example.com", "password": "wrong" }))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    // Locked now: 400 even with the correct password.
    let res = client
        .post(format!("{}/login/", srv.base_url))
        .json(&json!({ "email": "a@example.com", "password": "Pass1234!" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn verify_email_round_trip_and_replay() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let created = register(&client, &srv.base_url, "a@example.com", "AUTHENTICATED").await;
    let id = created["id"].as_str().unwrap();
    let (_, token) = srv.mail.last().expect("verification mail dispatched");

    let res = client
        .get(format!("{}/verify-email/{}/{}", srv.base_url, id, token))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["user"]["email_verified"], json!(true));

    // Replay of the same token fails.
    let res = client
        .get(format!("{}/verify-email/{}/{}", srv.base_url, id, token))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn verify_email_invalid_token_rejected() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let created = register(&client, &srv.base_url, "a@example.com", "AUTHENTICATED").await;
    let id = created["id"].as_str().unwrap();

    let res = client
        .get(format!("{}/verify-email/{}/sometoken", srv.base_url, id))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}
