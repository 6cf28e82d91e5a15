use chrono::{Duration, Utc};
use ems_auth::{AccessClaims, SigningKey};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::StatusCode;
use serde_json::{Value, json};

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn(key: &SigningKey) -> Self {
        // Same router as prod, bound to an ephemeral port.
        let app = ems_api::app::build_app(key, Duration::hours(1));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{addr}");

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn test_key() -> SigningKey {
    SigningKey::from_bytes(*b"black-box-signing-key-32-bytes!!").expect("test key")
}

fn other_key() -> SigningKey {
    SigningKey::from_bytes(*b"another-signing-key-of-32-bytes!").expect("test key")
}

/// Mints a token directly with jsonwebtoken, bypassing the codec, so tests
/// control the claims completely.
fn mint_raw(key: &SigningKey, sub: &str, iat: i64, exp: i64) -> String {
    let claims = AccessClaims {
        sub: sub.to_string(),
        iat,
        exp,
    };
    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(key.as_bytes()),
    )
    .expect("failed to encode jwt")
}

async fn register(
    client: &reqwest::Client,
    base: &str,
    name: &str,
    email: &str,
    password: &str,
) -> u64 {
    let res = client
        .post(format!("{base}/v1/auth/register"))
        .json(&json!({ "name": name, "email": email, "password": password }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = res.json().await.unwrap();
    body["id"].as_u64().unwrap()
}

async fn login(client: &reqwest::Client, base: &str, email: &str, password: &str) -> String {
    let res = client
        .post(format!("{base}/v1/auth/login"))
        .json(&json!({ "email": email, "password": password }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let header = res
        .headers()
        .get(reqwest::header::AUTHORIZATION)
        .expect("login response carries an Authorization header")
        .to_str()
        .unwrap()
        .to_string();
    let body: Value = res.json().await.unwrap();
    let token = body["token"].as_str().unwrap().to_string();
    assert_eq!(header, format!("Bearer {token}"));
    token
}

async fn error_code(res: reqwest::Response) -> String {
    let body: Value = res.json().await.unwrap();
    body["error"].as_str().unwrap_or_default().to_string()
}

#[tokio::test]
async fn health_needs_no_credentials() {
    let srv = TestServer::spawn(&test_key()).await;
    let res = reqwest::Client::new()
        .get(format!("{}/health", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn missing_header_is_rejected() {
    let srv = TestServer::spawn(&test_key()).await;
    let res = reqwest::Client::new()
        .get(format!("{}/v1/employees", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(res).await, "missing_authorization");
}

#[tokio::test]
async fn malformed_headers_are_rejected() {
    let srv = TestServer::spawn(&test_key()).await;
    let client = reqwest::Client::new();

    for value in ["Bearer ", "Bearer", "Basic dXNlcjpwdw==", "token abc"] {
        let res = client
            .get(format!("{}/v1/employees", srv.base_url))
            .header(reqwest::header::AUTHORIZATION, value)
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED, "header {value:?}");
        assert_eq!(error_code(res).await, "malformed_authorization", "header {value:?}");
    }
}

#[tokio::test]
async fn register_login_whoami_round_trip() {
    let srv = TestServer::spawn(&test_key()).await;
    let client = reqwest::Client::new();

    register(&client, &srv.base_url, "Amy", "amy@example.com", "open-sesame").await;
    let token = login(&client, &srv.base_url, "amy@example.com", "open-sesame").await;

    let res = client
        .get(format!("{}/whoami", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["identity"], "amy@example.com");
    assert_eq!(body["roles"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn wrong_password_gets_no_token() {
    let srv = TestServer::spawn(&test_key()).await;
    let client = reqwest::Client::new();

    register(&client, &srv.base_url, "Amy", "amy@example.com", "open-sesame").await;

    let res = client
        .post(format!("{}/v1/auth/login", srv.base_url))
        .json(&json!({ "email": "amy@example.com", "password": "guess" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    // The gate exempted the path (the failure is from credential checking,
    // not a missing header), and no token leaked out.
    assert!(res.headers().get(reqwest::header::AUTHORIZATION).is_none());
    assert_eq!(error_code(res).await, "invalid_credentials");
}

#[tokio::test]
async fn login_for_unknown_email_is_unauthorized() {
    let srv = TestServer::spawn(&test_key()).await;
    let res = reqwest::Client::new()
        .post(format!("{}/v1/auth/login", srv.base_url))
        .json(&json!({ "email": "ghost@example.com", "password": "whatever" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(res).await, "unknown_user");
}

#[tokio::test]
async fn duplicate_registration_conflicts() {
    let srv = TestServer::spawn(&test_key()).await;
    let client = reqwest::Client::new();

    register(&client, &srv.base_url, "Amy", "amy@example.com", "open-sesame").await;
    let res = client
        .post(format!("{}/v1/auth/register", srv.base_url))
        .json(&json!({ "name": "Amy", "email": "amy@example.com", "password": "open-sesame" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn expired_token_is_rejected() {
    let key = test_key();
    let srv = TestServer::spawn(&key).await;
    let client = reqwest::Client::new();

    register(&client, &srv.base_url, "Amy", "amy@example.com", "open-sesame").await;

    let now = Utc::now().timestamp();
    let token = mint_raw(&key, "amy@example.com", now - 7200, now - 3600);
    let res = client
        .get(format!("{}/whoami", srv.base_url))
        .bearer_auth(token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(res).await, "expired_token");
}

#[tokio::test]
async fn token_signed_with_another_key_is_rejected() {
    let srv = TestServer::spawn(&test_key()).await;
    let client = reqwest::Client::new();

    register(&client, &srv.base_url, "Amy", "amy@example.com", "open-sesame").await;

    // Same claims, different process key: what a client holds after the
    // server restarted in ephemeral mode.
    let now = Utc::now().timestamp();
    let token = mint_raw(&other_key(), "amy@example.com", now, now + 3600);
    let res = client
        .get(format!("{}/whoami", srv.base_url))
        .bearer_auth(token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(res).await, "invalid_token");
}

#[tokio::test]
async fn token_for_unknown_principal_is_rejected() {
    let key = test_key();
    let srv = TestServer::spawn(&key).await;

    let now = Utc::now().timestamp();
    let token = mint_raw(&key, "ghost@example.com", now, now + 3600);
    let res = reqwest::Client::new()
        .get(format!("{}/whoami", srv.base_url))
        .bearer_auth(token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(res).await, "unknown_principal");
}

#[tokio::test]
async fn employees_cannot_touch_each_others_records() {
    let srv = TestServer::spawn(&test_key()).await;
    let client = reqwest::Client::new();

    let amy_id = register(&client, &srv.base_url, "Amy", "amy@example.com", "open-sesame").await;
    let bob_id = register(&client, &srv.base_url, "Bob", "bob@example.com", "hunter-two").await;
    let token = login(&client, &srv.base_url, "amy@example.com", "open-sesame").await;

    let res = client
        .get(format!("{}/v1/employees/{amy_id}", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .get(format!("{}/v1/employees/{bob_id}", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = client
        .put(format!("{}/v1/employees/{bob_id}", srv.base_url))
        .bearer_auth(&token)
        .json(&json!({ "name": "Hijack", "dob": "1990-01-01", "mobile": "1234567890" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = client
        .delete(format!("{}/v1/employees/{bob_id}", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn directory_listing_is_shared() {
    let srv = TestServer::spawn(&test_key()).await;
    let client = reqwest::Client::new();

    register(&client, &srv.base_url, "Amy", "amy@example.com", "open-sesame").await;
    register(&client, &srv.base_url, "Bob", "bob@example.com", "hunter-two").await;
    let token = login(&client, &srv.base_url, "amy@example.com", "open-sesame").await;

    let res = client
        .get(format!("{}/v1/employees", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    let emails: Vec<&str> = body["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["email"].as_str().unwrap())
        .collect();
    assert_eq!(emails, vec!["amy@example.com", "bob@example.com"]);
}

#[tokio::test]
async fn profile_completion_is_owner_only() {
    let srv = TestServer::spawn(&test_key()).await;
    let client = reqwest::Client::new();

    register(&client, &srv.base_url, "Amy", "amy@example.com", "open-sesame").await;
    register(&client, &srv.base_url, "Bob", "bob@example.com", "hunter-two").await;
    let token = login(&client, &srv.base_url, "amy@example.com", "open-sesame").await;

    // Own profile: fine.
    let res = client
        .post(format!("{}/v1/employees", srv.base_url))
        .bearer_auth(&token)
        .json(&json!({
            "email": "amy@example.com",
            "name": "Amy Santiago",
            "dob": "1990-04-01",
            "mobile": "9876543210",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["name"], "Amy Santiago");
    assert_eq!(body["mobile"], "9876543210");

    // Someone else's: forbidden.
    let res = client
        .post(format!("{}/v1/employees", srv.base_url))
        .bearer_auth(&token)
        .json(&json!({
            "email": "bob@example.com",
            "name": "Bob",
            "dob": "1990-04-01",
            "mobile": "9876543210",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    // Broken fields: every violation reported.
    let res = client
        .post(format!("{}/v1/employees", srv.base_url))
        .bearer_auth(&token)
        .json(&json!({
            "email": "amy@example.com",
            "name": "4my",
            "dob": "1990-04-01",
            "mobile": "12345",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    let message = body["message"].as_str().unwrap();
    assert!(message.contains("name"));
    assert!(message.contains("mobile"));
}

#[tokio::test]
async fn bank_account_lifecycle() {
    let srv = TestServer::spawn(&test_key()).await;
    let client = reqwest::Client::new();

    let id = register(&client, &srv.base_url, "Amy", "amy@example.com", "open-sesame").await;
    let token = login(&client, &srv.base_url, "amy@example.com", "open-sesame").await;
    let base = format!("{}/v1/employees/{id}/account", srv.base_url);

    let res = client.get(&base).bearer_auth(&token).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let account = json!({
        "bank_name": "First Bank",
        "account_number": "0012345678",
        "ifsc_code": "FB0001",
    });
    let res = client
        .post(&base)
        .bearer_auth(&token)
        .json(&account)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = client
        .post(&base)
        .bearer_auth(&token)
        .json(&account)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);

    let res = client
        .put(&base)
        .bearer_auth(&token)
        .json(&json!({
            "bank_name": "Second Bank",
            "account_number": "0012345678",
            "ifsc_code": "FB0001",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["bank_name"], "Second Bank");

    let res = client.delete(&base).bearer_auth(&token).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = client.get(&base).bearer_auth(&token).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn address_and_designation_lifecycle() {
    let srv = TestServer::spawn(&test_key()).await;
    let client = reqwest::Client::new();

    let id = register(&client, &srv.base_url, "Amy", "amy@example.com", "open-sesame").await;
    let token = login(&client, &srv.base_url, "amy@example.com", "open-sesame").await;

    let address_base = format!("{}/v1/employees/{id}/address", srv.base_url);
    let address = json!({
        "street": "12 Main St",
        "city": "Chennai",
        "state": "TN",
        "zip": "600001",
    });
    let res = client
        .post(&address_base)
        .bearer_auth(&token)
        .json(&address)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let res = client
        .post(&address_base)
        .bearer_auth(&token)
        .json(&address)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let res = client
        .delete(&address_base)
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let role_base = format!("{}/v1/employees/{id}/role", srv.base_url);
    let res = client
        .put(&role_base)
        .bearer_auth(&token)
        .json(&json!({ "name": "Developer" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    // The designation surfaces as a role on the very next request; the
    // gate re-resolves the principal each time.
    let res = client
        .get(format!("{}/whoami", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    let body: Value = res.json().await.unwrap();
    assert!(
        body["roles"]
            .as_array()
            .unwrap()
            .iter()
            .any(|r| r == "Developer")
    );

    let res = client
        .delete(&role_base)
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn skill_catalog_and_assignment() {
    let srv = TestServer::spawn(&test_key()).await;
    let client = reqwest::Client::new();

    let id = register(&client, &srv.base_url, "Amy", "amy@example.com", "open-sesame").await;
    let token = login(&client, &srv.base_url, "amy@example.com", "open-sesame").await;

    let res = client
        .post(format!("{}/v1/skills", srv.base_url))
        .bearer_auth(&token)
        .json(&json!({ "name": "Rust" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let skill: Value = res.json().await.unwrap();
    let skill_id = skill["id"].as_u64().unwrap();

    let res = client
        .post(format!("{}/v1/skills", srv.base_url))
        .bearer_auth(&token)
        .json(&json!({ "name": "rust" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);

    let assign_base = format!("{}/v1/employees/{id}/skills", srv.base_url);
    let res = client
        .post(format!("{assign_base}/{skill_id}"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = client
        .post(format!("{assign_base}/{skill_id}"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);

    let res = client
        .post(format!("{assign_base}/999"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = client
        .post(format!("{assign_base}/not-a-number"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = client
        .get(&assign_base)
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["items"][0]["name"], "Rust");

    let res = client
        .delete(format!("{assign_base}/{skill_id}"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn self_delete_invalidates_the_session() {
    let srv = TestServer::spawn(&test_key()).await;
    let client = reqwest::Client::new();

    let id = register(&client, &srv.base_url, "Amy", "amy@example.com", "open-sesame").await;
    let token = login(&client, &srv.base_url, "amy@example.com", "open-sesame").await;

    let res = client
        .delete(format!("{}/v1/employees/{id}", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    // The token still has a valid signature, but its subject no longer
    // resolves to a principal.
    let res = client
        .get(format!("{}/whoami", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(res).await, "unknown_principal");

    let res = client
        .post(format!("{}/v1/auth/login", srv.base_url))
        .json(&json!({ "email": "amy@example.com", "password": "open-sesame" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    // The email itself is free again.
    register(&client, &srv.base_url, "Amy", "amy@example.com", "new-password").await;
}

#[tokio::test]
async fn registration_validates_input() {
    let srv = TestServer::spawn(&test_key()).await;
    let client = reqwest::Client::new();

    for body in [
        json!({ "name": "Amy", "email": "not-an-email", "password": "open-sesame" }),
        json!({ "name": "Amy", "email": "amy@example.com", "password": "short" }),
        json!({ "name": "4my", "email": "amy@example.com", "password": "open-sesame" }),
    ] {
        let res = client
            .post(format!("{}/v1/auth/register", srv.base_url))
            .json(&body)
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "body {body}");
    }
}
