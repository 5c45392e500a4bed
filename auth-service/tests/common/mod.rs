use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use auth::AuthSettings;
use auth::Authenticator;
use auth::Clock;
use auth::HashingSettings;
use auth::Role;
use auth::TokenSettings;
use auth_service::domain::identity::errors::AuthError;
use auth_service::domain::identity::models::Identity;
use auth_service::domain::identity::models::IdentityId;
use auth_service::domain::identity::models::Username;
use auth_service::domain::identity::ports::CredentialStore;
use auth_service::domain::identity::service::LoginService;
use auth_service::inbound::http::router::create_router;
use chrono::DateTime;
use chrono::Duration;
use chrono::TimeZone;
use chrono::Utc;

pub const TOKEN_TTL_MINUTES: i64 = 30;
pub const LEGACY_BCRYPT_COST: u32 = 4;

/// Clock the tests move forward explicitly
pub struct ManualClock(Mutex<DateTime<Utc>>);

impl ManualClock {
    pub fn new() -> Self {
        Self(Mutex::new(Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()))
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.0.lock().unwrap();
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.0.lock().unwrap()
    }
}

/// Credential store backed by a map, seeded per test
#[derive(Default)]
pub struct InMemoryCredentialStore {
    identities: Mutex<HashMap<String, Identity>>,
}

impl InMemoryCredentialStore {
    pub fn insert(&self, identity: Identity) {
        self.identities
            .lock()
            .unwrap()
            .insert(identity.username.as_str().to_string(), identity);
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn find_identity_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<Identity>, AuthError> {
        Ok(self
            .identities
            .lock()
            .unwrap()
            .get(username.as_str())
            .cloned())
    }
}

/// Test application that spawns a real server
pub struct TestApp {
    pub address: String,
    pub clock: Arc<ManualClock>,
    pub authenticator: Arc<Authenticator>,
    pub api_client: reqwest::Client,
}

impl TestApp {
    /// Spawn the application with `alice` (OFFICER, password "secret"),
    /// `station-7` (POLICE_STATION, password "station-pass") and
    /// `legacy-admin` (SUPER_USER, bcrypt hash of "legacy-pass")
    pub async fn spawn() -> Self {
        let clock = Arc::new(ManualClock::new());

        let settings = AuthSettings {
            token: TokenSettings::new(
                b"test-secret-key-for-jwt-signing-at-least-32-bytes".to_vec(),
                Duration::minutes(TOKEN_TTL_MINUTES),
            ),
            hashing: HashingSettings {
                memory_kib: 64,
                iterations: 1,
                parallelism: 1,
                legacy_bcrypt_cost: Some(LEGACY_BCRYPT_COST),
            },
        };
        let authenticator = Arc::new(
            Authenticator::new(&settings, clock.clone()).expect("Failed to build authenticator"),
        );

        let store = Arc::new(InMemoryCredentialStore::default());
        store.insert(Identity {
            id: IdentityId(1),
            username: Username::new("alice".to_string()).unwrap(),
            role: Role::Officer,
            password_hash: authenticator.hash_password("secret").unwrap(),
        });
        store.insert(Identity {
            id: IdentityId(2),
            username: Username::new("station-7".to_string()).unwrap(),
            role: Role::PoliceStation,
            password_hash: authenticator.hash_password("station-pass").unwrap(),
        });
        store.insert(Identity {
            id: IdentityId(3),
            username: Username::new("legacy-admin".to_string()).unwrap(),
            role: Role::SuperUser,
            password_hash: bcrypt::hash("legacy-pass", LEGACY_BCRYPT_COST).unwrap(),
        });

        let login_service = Arc::new(LoginService::new(store, Arc::clone(&authenticator)));
        let router = create_router(login_service);

        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();

        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address: format!("http://127.0.0.1:{}", port),
            clock,
            authenticator,
            api_client: reqwest::Client::new(),
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

    /// Log in and return the token, panicking on failure
    pub async fn login_token(&self, username: &str, password: &str) -> String {
        let response = self
            .post("/auth/login")
            .json(&serde_json::json!({
                "username": username,
                "password": password
            }))
            .send()
            .await
            .expect("Failed to execute request");

        assert_eq!(response.status(), reqwest::StatusCode::OK);

        let body: serde_json::Value = response.json().await.expect("Failed to parse response");
        body["token"]
            .as_str()
            .expect("Missing token in response")
            .to_string()
    }

    /// GET /auth/validate with the given token
    pub async fn validate(&self, token: &str) -> bool {
        self.get("/auth/validate")
            .query(&[("token", token)])
            .send()
            .await
            .expect("Failed to execute request")
            .json()
            .await
            .expect("Failed to parse response")
    }
}
