use std::sync::Arc;

use auth::Authenticator;
use auth::KeyMaterial;
use auth::KeySource;
use auth::TokenCodec;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use user_service::domain::user::service::UserService;
use user_service::inbound::http::router::create_router;
use user_service::outbound::repositories::SqliteUserRepository;

pub const ACCESS_TOKEN_NAME: &str = "x-access-token";

const PRIVATE_KEY: &[u8] = include_bytes!("../../../fixtures/keys/test.rsa");
const PUBLIC_KEY: &[u8] = include_bytes!("../../../fixtures/keys/test.rsa.pub");

/// Test application that spawns a real server
pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub pool: SqlitePool,
    pub api_client: reqwest::Client,
    pub codec: TokenCodec,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        let pool = test_pool().await;

        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let keys = Arc::new(
            KeyMaterial::load(
                &KeySource::Pem(PRIVATE_KEY.to_vec()),
                &KeySource::Pem(PUBLIC_KEY.to_vec()),
            )
            .expect("Failed to load fixture keys"),
        );

        let user_repo = Arc::new(SqliteUserRepository::new(pool.clone()));
        let user_service = Arc::new(UserService::new(user_repo));
        let authenticator = Arc::new(Authenticator::new(
            Arc::clone(&keys),
            chrono::Duration::hours(1),
        ));

        let router = create_router(user_service, authenticator);

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            port,
            pool,
            // No cookie store: every test chooses how the token travels
            api_client: reqwest::Client::builder()
                .build()
                .expect("Failed to create reqwest client"),
            codec: TokenCodec::new(keys),
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    /// Helper to make PUT request
    pub fn put(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.put(format!("{}{}", self.address, path))
    }

    /// Helper to make DELETE request
    pub fn delete(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.delete(format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with the token in the access token header
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).header(ACCESS_TOKEN_NAME, token)
    }

    /// Helper to make PUT request with the token in the access token header
    pub fn put_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.put(path).header(ACCESS_TOKEN_NAME, token)
    }

    /// Helper to make DELETE request with the token in the access token header
    pub fn delete_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.delete(path).header(ACCESS_TOKEN_NAME, token)
    }

    /// Register a user and return the response body
    pub async fn register(&self, name: &str, email: &str, password: &str) -> serde_json::Value {
        let response = self
            .post("/register")
            .json(&serde_json::json!({
                "name": name,
                "email": email,
                "password": password
            }))
            .send()
            .await
            .expect("Failed to execute request");

        assert_eq!(response.status(), reqwest::StatusCode::CREATED);
        response.json().await.expect("Failed to parse response")
    }

    /// Register a user and return its id and access token
    pub async fn register_with_token(&self, name: &str, email: &str, password: &str) -> (String, String) {
        let body = self.register(name, email, password).await;
        (
            body["data"]["user"]["id"].as_str().unwrap().to_string(),
            body["data"]["access-token"].as_str().unwrap().to_string(),
        )
    }
}

/// A single connection keeps the in-memory database alive for the whole test
async fn test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    pool
}
