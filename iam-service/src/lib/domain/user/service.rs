use std::sync::Arc;

use async_trait::async_trait;
use auth::PasswordPolicy;
use auth::TokenService;

use crate::domain::role::models::Role;
use crate::domain::role::models::RoleName;
use crate::domain::role::ports::RoleRepository;
use crate::domain::user::models::HashedPassword;
use crate::domain::user::models::SignInCommand;
use crate::domain::user::models::SignInResult;
use crate::domain::user::models::SignUpCommand;
use crate::domain::user::models::UpdatePasswordCommand;
use crate::domain::user::models::UpdateUserStatusCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::Username;
use crate::domain::user::models::VerifyUserCommand;
use crate::user::errors::UserError;
use crate::user::ports::EmailSender;
use crate::user::ports::UserCommandServicePort;
use crate::user::ports::UserRepository;

/// Path of the verification endpoint, appended to the public base URL.
pub const VERIFICATION_PATH: &str = "/api/v1/authentication/verify";

/// Domain service implementing the authentication command workflows.
///
/// Holds no per-request state. The existence checks in sign-up are a fast
/// path only; the repository's uniqueness enforcement decides races.
pub struct UserCommandService<UR, RR, ES>
where
    UR: UserRepository,
    RR: RoleRepository,
    ES: EmailSender,
{
    user_repository: Arc<UR>,
    role_repository: Arc<RR>,
    email_sender: Arc<ES>,
    token_service: Arc<TokenService>,
    password_hasher: auth::PasswordHasher,
}

impl<UR, RR, ES> UserCommandService<UR, RR, ES>
where
    UR: UserRepository,
    RR: RoleRepository,
    ES: EmailSender,
{
    /// Create a new command service with injected dependencies.
    ///
    /// # Arguments
    /// * `user_repository` - Account directory
    /// * `role_repository` - Role directory
    /// * `email_sender` - Verification link delivery
    /// * `token_service` - Bearer token issuing and validation
    pub fn new(
        user_repository: Arc<UR>,
        role_repository: Arc<RR>,
        email_sender: Arc<ES>,
        token_service: Arc<TokenService>,
    ) -> Self {
        Self {
            user_repository,
            role_repository,
            email_sender,
            token_service,
            password_hasher: auth::PasswordHasher::new(),
        }
    }

    async fn load(&self, id: &UserId) -> Result<User, UserError> {
        self.user_repository
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id.to_string()))
    }

    async fn resolve_roles(&self, requested: &[String]) -> Result<Vec<Role>, UserError> {
        let names = requested
            .iter()
            .map(|name| RoleName::parse(name))
            .collect::<Result<Vec<_>, _>>()?;

        let mut names = RoleName::with_default(names);
        names.sort();
        names.dedup();

        let mut roles = Vec::with_capacity(names.len());
        for name in names {
            let role = self
                .role_repository
                .find_by_role_name(name)
                .await?
                .ok_or_else(|| UserError::RoleNotFound(name.to_string()))?;
            roles.push(role);
        }

        Ok(roles)
    }

    fn encode_password(&self, raw: &str) -> Result<HashedPassword, UserError> {
        Ok(HashedPassword::new(self.password_hasher.encode(raw)?))
    }
}

/// Build the link a new user follows to verify their email.
pub fn verification_link(base_url: &str, token: &str) -> String {
    format!(
        "{}{}?token={}",
        base_url.trim_end_matches('/'),
        VERIFICATION_PATH,
        token
    )
}

#[async_trait]
impl<UR, RR, ES> UserCommandServicePort for UserCommandService<UR, RR, ES>
where
    UR: UserRepository,
    RR: RoleRepository,
    ES: EmailSender,
{
    async fn sign_in(&self, command: SignInCommand) -> Result<SignInResult, UserError> {
        let user = self
            .user_repository
            .find_by_username(&command.username)
            .await?
            .ok_or_else(|| UserError::NotFoundByUsername(command.username.to_string()))?;

        if !self
            .password_hasher
            .matches(&command.password, user.hashed_password.as_str())
        {
            tracing::warn!(username = %user.username, "Sign-in rejected: invalid password");
            return Err(UserError::InvalidCredentials);
        }

        if !user.active {
            tracing::warn!(username = %user.username, "Sign-in rejected: user is not active");
            return Err(UserError::NotActive(user.username.to_string()));
        }

        let token = self.token_service.generate_token(user.username.as_str())?;
        tracing::info!(user_id = %user.id(), username = %user.username, "User signed in");

        Ok(SignInResult { user, token })
    }

    async fn sign_up(&self, command: SignUpCommand) -> Result<User, UserError> {
        if self
            .user_repository
            .exists_by_username(&command.username)
            .await?
        {
            return Err(UserError::UsernameAlreadyExists(command.username.to_string()));
        }

        if self.user_repository.exists_by_email(&command.email).await? {
            return Err(UserError::EmailAlreadyExists(command.email.to_string()));
        }

        PasswordPolicy::validate(&command.password)?;

        let roles = self.resolve_roles(&command.roles).await?;
        let hashed_password = self.encode_password(&command.password)?;

        let user = User::new(command.username, command.email, hashed_password, roles);
        let created_user = self.user_repository.save(user).await?;
        tracing::info!(
            user_id = %created_user.id(),
            username = %created_user.username,
            "User signed up"
        );

        let token = self
            .token_service
            .generate_token(created_user.username.as_str())?;
        let link = verification_link(&command.base_url, &token);

        if let Err(e) = self
            .email_sender
            .send_verification_email(&created_user.email, &link)
            .await
        {
            tracing::error!(
                user_id = %created_user.id(),
                error = %e,
                "Failed to send verification email"
            );
            return Err(UserError::EmailDispatch(e.to_string()));
        }

        Ok(created_user)
    }

    async fn verify(&self, command: VerifyUserCommand) -> Result<User, UserError> {
        if !self.token_service.validate_token(&command.token) {
            return Err(UserError::InvalidToken);
        }

        let subject = self
            .token_service
            .username_from_token(&command.token)
            .map_err(|_| UserError::InvalidToken)?;
        let username =
            Username::new(subject.clone()).map_err(|_| UserError::NotFoundByUsername(subject))?;

        let mut user = self
            .user_repository
            .find_by_username(&username)
            .await?
            .ok_or_else(|| UserError::NotFoundByUsername(username.to_string()))?;

        if user.verified {
            tracing::debug!(username = %user.username, "User already verified");
            return Ok(user);
        }

        user.verified = true;
        let verified_user = self.user_repository.save(user).await?;
        tracing::info!(username = %verified_user.username, "User verified");

        Ok(verified_user)
    }

    async fn update_status(&self, command: UpdateUserStatusCommand) -> Result<User, UserError> {
        let mut user = self.load(&command.user_id).await?;

        user.active = command.is_active;
        let updated_user = self.user_repository.save(user).await?;
        tracing::info!(
            user_id = %updated_user.id(),
            active = updated_user.active,
            "User status updated"
        );

        Ok(updated_user)
    }

    async fn update_password(&self, command: UpdatePasswordCommand) -> Result<User, UserError> {
        let mut user = self.load(&command.user_id).await?;

        if !self
            .password_hasher
            .matches(&command.current_password, user.hashed_password.as_str())
        {
            return Err(UserError::DifferentPassword);
        }

        PasswordPolicy::validate(&command.new_password)?;

        user.hashed_password = self.encode_password(&command.new_password)?;
        let updated_user = self.user_repository.save(user).await?;
        tracing::info!(user_id = %updated_user.id(), "User password updated");

        Ok(updated_user)
    }
}
