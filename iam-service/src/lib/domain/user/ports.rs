use async_trait::async_trait;

use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::SignInCommand;
use crate::domain::user::models::SignInResult;
use crate::domain::user::models::SignUpCommand;
use crate::domain::user::models::UpdatePasswordCommand;
use crate::domain::user::models::UpdateUserStatusCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::Username;
use crate::domain::user::models::VerifyUserCommand;
use crate::user::errors::EmailDeliveryError;
use crate::user::errors::UserError;

/// Port for the authentication command workflows.
///
/// Each mutating workflow validates before it mutates; a rejected command
/// leaves the stored user exactly as it was.
#[async_trait]
pub trait UserCommandServicePort: Send + Sync + 'static {
    /// Authenticate with username and password and issue a bearer token.
    ///
    /// # Errors
    /// * `NotFoundByUsername` - No user with this username
    /// * `InvalidCredentials` - Password does not match
    /// * `NotActive` - User is deactivated
    async fn sign_in(&self, command: SignInCommand) -> Result<SignInResult, UserError>;

    /// Register a new user and send a verification link.
    ///
    /// # Errors
    /// * `UsernameAlreadyExists` - Username is already taken
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `WeakPassword` - Password fails the strength policy
    /// * `RoleNotFound` - A requested role does not exist
    /// * `EmailDispatch` - User was stored but the link could not be sent
    async fn sign_up(&self, command: SignUpCommand) -> Result<User, UserError>;

    /// Mark the token's subject as verified.
    ///
    /// Verifying an already verified user succeeds without changes.
    ///
    /// # Errors
    /// * `InvalidToken` - Token does not validate
    /// * `NotFoundByUsername` - Token subject has no user
    async fn verify(&self, command: VerifyUserCommand) -> Result<User, UserError>;

    /// Activate or deactivate a user.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    async fn update_status(&self, command: UpdateUserStatusCommand) -> Result<User, UserError>;

    /// Replace a user's password after checking the current one.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `DifferentPassword` - Current password does not match
    /// * `WeakPassword` - New password fails the strength policy
    async fn update_password(&self, command: UpdatePasswordCommand) -> Result<User, UserError>;
}

/// Port for user read operations.
#[async_trait]
pub trait UserQueryServicePort: Send + Sync + 'static {
    async fn get_all_users(&self) -> Result<Vec<User>, UserError>;

    /// # Errors
    /// * `NotFound` - User does not exist
    async fn get_user(&self, id: &UserId) -> Result<User, UserError>;

    /// # Errors
    /// * `NotFoundByUsername` - No user with this username
    async fn get_user_by_username(&self, username: &Username) -> Result<User, UserError>;
}

/// Persistence operations for the user aggregate.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Retrieve user by username.
    ///
    /// # Returns
    /// Optional user entity (None if not found)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, UserError>;

    /// Retrieve user by identifier.
    ///
    /// # Returns
    /// Optional user entity (None if not found)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError>;

    async fn exists_by_username(&self, username: &Username) -> Result<bool, UserError>;

    async fn exists_by_email(&self, email: &EmailAddress) -> Result<bool, UserError>;

    /// Retrieve all users from storage.
    async fn find_all(&self) -> Result<Vec<User>, UserError>;

    /// Insert or update a user, including its role assignments.
    ///
    /// Uniqueness of username and email is enforced here and is
    /// authoritative: of two racing inserts with the same username,
    /// exactly one succeeds.
    ///
    /// # Returns
    /// Persisted user entity
    ///
    /// # Errors
    /// * `UsernameAlreadyExists` - Username belongs to another user
    /// * `EmailAlreadyExists` - Email belongs to another user
    /// * `DatabaseError` - Database operation failed
    async fn save(&self, user: User) -> Result<User, UserError>;
}

/// Delivery of verification links.
#[async_trait]
pub trait EmailSender: Send + Sync + 'static {
    /// Send a verification link to a user's address.
    ///
    /// # Errors
    /// * `SendFailed` - Relay unreachable
    /// * `Rejected` - Relay refused the message
    async fn send_verification_email(
        &self,
        to: &EmailAddress,
        verification_link: &str,
    ) -> Result<(), EmailDeliveryError>;
}
