use std::fmt;
use std::str::FromStr;

use uuid::Uuid;

use crate::domain::audit::AuditMetadata;
use crate::domain::role::models::Role;
use crate::domain::role::models::RoleName;
use crate::user::errors::EmailError;
use crate::user::errors::UserIdError;
use crate::user::errors::UsernameError;

/// User aggregate entity.
///
/// The authenticated principal: credentials, status flags and roles.
/// `roles` is never empty once the user has been registered.
#[derive(Debug, Clone)]
pub struct User {
    pub audit: AuditMetadata<UserId>,
    pub username: Username,
    pub email: EmailAddress,
    pub hashed_password: HashedPassword,
    pub active: bool,
    pub verified: bool,
    pub roles: Vec<Role>,
}

impl User {
    /// Register a new user: active, not yet verified.
    pub fn new(
        username: Username,
        email: EmailAddress,
        hashed_password: HashedPassword,
        roles: Vec<Role>,
    ) -> Self {
        Self {
            audit: AuditMetadata::on_create(UserId::new()),
            username,
            email,
            hashed_password,
            active: true,
            verified: false,
            roles,
        }
    }

    pub fn id(&self) -> UserId {
        self.audit.id
    }

    pub fn has_role(&self, name: RoleName) -> bool {
        self.roles.iter().any(|role| role.name == name)
    }

    pub fn role_names(&self) -> Vec<RoleName> {
        self.roles.iter().map(|role| role.name).collect()
    }
}

/// User unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(pub Uuid);

impl UserId {
    /// Generate a new random user ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a user ID from string.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, UserIdError> {
        Uuid::parse_str(s)
            .map(UserId)
            .map_err(|e| UserIdError::InvalidFormat(e.to_string()))
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Username value type
///
/// Ensures username is 3-50 characters and contains only alphanumeric, underscore, and hyphen.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Username(String);

impl Username {
    const MIN_LENGTH: usize = 3;
    const MAX_LENGTH: usize = 50;

    /// Create a new valid username.
    ///
    /// # Errors
    /// * `TooShort` - Username shorter than 3 characters
    /// * `TooLong` - Username longer than 50 characters
    /// * `InvalidCharacters` - Contains non-alphanumeric characters (except _ and -)
    pub fn new(username: String) -> Result<Self, UsernameError> {
        let username = Self::with_valid_length(username)?;
        let username = Self::with_valid_chars(username)?;
        Ok(Self(username))
    }

    fn with_valid_length(username: String) -> Result<String, UsernameError> {
        let length = username.chars().count();
        if length < Self::MIN_LENGTH {
            Err(UsernameError::TooShort {
                min: Self::MIN_LENGTH,
                actual: length,
            })
        } else if length > Self::MAX_LENGTH {
            Err(UsernameError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            })
        } else {
            Ok(username)
        }
    }

    fn with_valid_chars(username: String) -> Result<String, UsernameError> {
        if username
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_' || c == '-')
        {
            Ok(username)
        } else {
            Err(UsernameError::InvalidCharacters)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Email address type
///
/// Validates email format using RFC 5322 compliant parser.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    const MAX_LENGTH: usize = 50;

    /// Create a new validated email address.
    ///
    /// # Errors
    /// * `InvalidFormat` - Email does not conform to RFC 5322
    /// * `TooLong` - Email longer than 50 characters
    pub fn new(email: String) -> Result<Self, EmailError> {
        let length = email.chars().count();
        if length > Self::MAX_LENGTH {
            return Err(EmailError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            });
        }

        email_address::EmailAddress::from_str(&email)
            .map(|_| EmailAddress(email))
            .map_err(|e| EmailError::InvalidFormat(e.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Encoded password credential.
///
/// Never printed: `Debug` is redacted and there is no `Display`.
#[derive(Clone, PartialEq, Eq)]
pub struct HashedPassword(String);

impl HashedPassword {
    pub fn new(encoded: String) -> Self {
        Self(encoded)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for HashedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("HashedPassword([REDACTED])")
    }
}

/// Command to authenticate with username and password
#[derive(Debug)]
pub struct SignInCommand {
    pub username: Username,
    pub password: String,
}

/// Command to register a new user
#[derive(Debug)]
pub struct SignUpCommand {
    pub username: Username,
    pub email: EmailAddress,
    pub password: String,
    /// Requested role names; the default role applies when empty
    pub roles: Vec<String>,
    /// Public base URL the verification link is built on
    pub base_url: String,
}

/// Command to verify a user's email with a verification token
#[derive(Debug)]
pub struct VerifyUserCommand {
    pub token: String,
}

/// Command to activate or deactivate a user
#[derive(Debug)]
pub struct UpdateUserStatusCommand {
    pub user_id: UserId,
    pub is_active: bool,
}

/// Command to replace a user's password
#[derive(Debug)]
pub struct UpdatePasswordCommand {
    pub user_id: UserId,
    pub current_password: String,
    pub new_password: String,
}

/// Successful sign-in: the user and a freshly issued bearer token.
#[derive(Debug, Clone)]
pub struct SignInResult {
    pub user: User,
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::role::models::RoleId;

    #[test]
    fn test_username_validation() {
        assert!(Username::new("alice".to_string()).is_ok());
        assert!(Username::new("a_b-c".to_string()).is_ok());
        assert_eq!(
            Username::new("al".to_string()),
            Err(UsernameError::TooShort { min: 3, actual: 2 })
        );
        assert_eq!(
            Username::new("x".repeat(51)),
            Err(UsernameError::TooLong {
                max: 50,
                actual: 51
            })
        );
        assert_eq!(
            Username::new("alice smith".to_string()),
            Err(UsernameError::InvalidCharacters)
        );
    }

    #[test]
    fn test_email_validation() {
        assert!(EmailAddress::new("alice@example.com".to_string()).is_ok());
        assert!(matches!(
            EmailAddress::new("not-an-email".to_string()),
            Err(EmailError::InvalidFormat(_))
        ));
        assert!(matches!(
            EmailAddress::new(format!("{}@example.com", "a".repeat(45))),
            Err(EmailError::TooLong { .. })
        ));
    }

    #[test]
    fn test_new_user_is_active_and_unverified() {
        let user = User::new(
            Username::new("alice".to_string()).unwrap(),
            EmailAddress::new("alice@example.com".to_string()).unwrap(),
            HashedPassword::new("$argon2id$hash".to_string()),
            vec![Role {
                id: RoleId(2),
                name: RoleName::User,
            }],
        );

        assert!(user.active);
        assert!(!user.verified);
        assert!(user.has_role(RoleName::User));
        assert!(!user.has_role(RoleName::Admin));
        assert_eq!(user.audit.created_at, user.audit.updated_at);
    }

    #[test]
    fn test_hashed_password_debug_is_redacted() {
        let hashed = HashedPassword::new("$argon2id$v=19$secret".to_string());

        let printed = format!("{hashed:?}");
        assert!(!printed.contains("argon2"));
        assert!(printed.contains("REDACTED"));
    }
}
