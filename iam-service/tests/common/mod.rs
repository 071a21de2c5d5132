#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use auth::PasswordHasher;
use auth::TokenService;
use iam_service::domain::role::errors::RoleError;
use iam_service::domain::role::models::Role;
use iam_service::domain::role::models::RoleId;
use iam_service::domain::role::models::RoleName;
use iam_service::domain::role::ports::RoleCommandServicePort;
use iam_service::domain::role::ports::RoleRepository;
use iam_service::domain::role::service::RoleService;
use iam_service::domain::user::errors::EmailDeliveryError;
use iam_service::domain::user::errors::UserError;
use iam_service::domain::user::models::EmailAddress;
use iam_service::domain::user::models::HashedPassword;
use iam_service::domain::user::models::User;
use iam_service::domain::user::models::UserId;
use iam_service::domain::user::models::Username;
use iam_service::domain::user::ports::EmailSender;
use iam_service::domain::user::ports::UserRepository;
use iam_service::domain::user::queries::UserQueryService;
use iam_service::domain::user::service::UserCommandService;
use iam_service::inbound::http::router::create_router;
use iam_service::inbound::http::router::AppState;

pub const TEST_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";
pub const PUBLIC_BASE_URL: &str = "http://iam.test";
pub const PASSWORD: &str = "Abc12345!";

pub type TestCommandService =
    UserCommandService<InMemoryUserRepository, InMemoryRoleRepository, RecordingEmailSender>;

/// User directory enforcing username and email uniqueness under a lock.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<HashMap<UserId, User>>,
}

impl InMemoryUserRepository {
    pub fn count(&self) -> usize {
        self.users.lock().unwrap().len()
    }

    pub fn get(&self, id: &UserId) -> Option<User> {
        self.users.lock().unwrap().get(id).cloned()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, UserError> {
        let users = self.users.lock().unwrap();
        Ok(users.values().find(|u| &u.username == username).cloned())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        Ok(self.get(id))
    }

    async fn exists_by_username(&self, username: &Username) -> Result<bool, UserError> {
        let users = self.users.lock().unwrap();
        Ok(users.values().any(|u| &u.username == username))
    }

    async fn exists_by_email(&self, email: &EmailAddress) -> Result<bool, UserError> {
        let users = self.users.lock().unwrap();
        Ok(users.values().any(|u| &u.email == email))
    }

    async fn find_all(&self) -> Result<Vec<User>, UserError> {
        Ok(self.users.lock().unwrap().values().cloned().collect())
    }

    async fn save(&self, mut user: User) -> Result<User, UserError> {
        let mut users = self.users.lock().unwrap();
        let id = user.id();

        if users
            .values()
            .any(|u| u.id() != id && u.username == user.username)
        {
            return Err(UserError::UsernameAlreadyExists(
                user.username.as_str().to_string(),
            ));
        }
        if users.values().any(|u| u.id() != id && u.email == user.email) {
            return Err(UserError::EmailAlreadyExists(user.email.as_str().to_string()));
        }

        user.audit.on_update();
        users.insert(id, user.clone());
        Ok(user)
    }
}

#[derive(Default)]
pub struct InMemoryRoleRepository {
    roles: Mutex<Vec<Role>>,
}

impl InMemoryRoleRepository {
    pub fn count(&self) -> usize {
        self.roles.lock().unwrap().len()
    }
}

#[async_trait]
impl RoleRepository for InMemoryRoleRepository {
    async fn find_by_role_name(&self, name: RoleName) -> Result<Option<Role>, RoleError> {
        let roles = self.roles.lock().unwrap();
        Ok(roles.iter().find(|r| r.name == name).cloned())
    }

    async fn exists_by_role_name(&self, name: RoleName) -> Result<bool, RoleError> {
        Ok(self.roles.lock().unwrap().iter().any(|r| r.name == name))
    }

    async fn save(&self, name: RoleName) -> Result<Role, RoleError> {
        let mut roles = self.roles.lock().unwrap();
        if let Some(existing) = roles.iter().find(|r| r.name == name) {
            return Ok(existing.clone());
        }
        let role = Role {
            id: RoleId(roles.len() as i64 + 1),
            name,
        };
        roles.push(role.clone());
        Ok(role)
    }

    async fn find_all(&self) -> Result<Vec<Role>, RoleError> {
        Ok(self.roles.lock().unwrap().clone())
    }
}

/// Email sender that records every link it is asked to deliver.
#[derive(Default)]
pub struct RecordingEmailSender {
    sent: Mutex<Vec<(String, String)>>,
    failing: AtomicBool,
}

impl RecordingEmailSender {
    pub fn fail_deliveries(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }

    /// Verification link most recently sent to `to`.
    pub fn link_for(&self, to: &str) -> Option<String> {
        self.sent()
            .into_iter()
            .rev()
            .find(|(address, _)| address == to)
            .map(|(_, link)| link)
    }
}

#[async_trait]
impl EmailSender for RecordingEmailSender {
    async fn send_verification_email(
        &self,
        to: &EmailAddress,
        verification_link: &str,
    ) -> Result<(), EmailDeliveryError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(EmailDeliveryError::SendFailed("relay down".to_string()));
        }
        self.sent
            .lock()
            .unwrap()
            .push((to.as_str().to_string(), verification_link.to_string()));
        Ok(())
    }
}

/// Test application that spawns a real server over in-memory directories
pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
    pub users: Arc<InMemoryUserRepository>,
    pub roles: Arc<InMemoryRoleRepository>,
    pub emails: Arc<RecordingEmailSender>,
    pub token_service: Arc<TokenService>,
    pub command_service: Arc<TestCommandService>,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let users = Arc::new(InMemoryUserRepository::default());
        let roles = Arc::new(InMemoryRoleRepository::default());
        let emails = Arc::new(RecordingEmailSender::default());
        let token_service = Arc::new(TokenService::new(TEST_SECRET, 7).unwrap());

        let role_service = Arc::new(RoleService::new(Arc::clone(&roles)));
        role_service.seed_roles().await.expect("Failed to seed roles");

        let command_service = Arc::new(UserCommandService::new(
            Arc::clone(&users),
            Arc::clone(&roles),
            Arc::clone(&emails),
            Arc::clone(&token_service),
        ));

        let state = AppState {
            user_command_service: command_service.clone(),
            user_query_service: Arc::new(UserQueryService::new(Arc::clone(&users))),
            role_query_service: role_service,
            token_service: Arc::clone(&token_service),
            public_base_url: PUBLIC_BASE_URL.to_string(),
        };

        let router = create_router(state);

        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            api_client: reqwest::Client::new(),
            users,
            roles,
            emails,
            token_service,
            command_service,
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

    /// Helper to make PATCH request
    pub fn patch(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.patch(format!("{}{}", self.address, path))
    }

    /// Store a user directly, bypassing sign-up.
    pub async fn insert_user(&self, username: &str, roles: &[RoleName], active: bool) -> User {
        let hashed = PasswordHasher::new().encode(PASSWORD).unwrap();
        let mut resolved = Vec::new();
        for name in roles {
            resolved.push(self.roles.find_by_role_name(*name).await.unwrap().unwrap());
        }

        let mut user = User::new(
            Username::new(username.to_string()).unwrap(),
            EmailAddress::new(format!("{username}@example.com")).unwrap(),
            HashedPassword::new(hashed),
            resolved,
        );
        user.active = active;
        user.verified = true;

        self.users.save(user).await.unwrap()
    }

    pub fn token_for(&self, username: &str) -> String {
        self.token_service.generate_token(username).unwrap()
    }
}
