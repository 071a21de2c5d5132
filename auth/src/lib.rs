//! Credential primitives for the identity service.
//!
//! Provides the building blocks the command workflows and the request
//! authentication filter are assembled from:
//! - Password hashing (Argon2id)
//! - Password strength policy
//! - Signed, time-boxed bearer tokens (HS256 JWT)
//!
//! Everything here is pure and free of I/O, so a single instance of each
//! component can be shared across request workers without synchronization.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let encoded = hasher.encode("Abc12345!").unwrap();
//! assert!(hasher.matches("Abc12345!", &encoded));
//! assert!(!hasher.matches("wrong", &encoded));
//! ```
//!
//! ## Password Policy
//! ```
//! use auth::PasswordPolicy;
//!
//! assert!(PasswordPolicy::validate("Abc12345!").is_ok());
//! assert!(PasswordPolicy::validate("abc").is_err());
//! ```
//!
//! ## Bearer Tokens
//! ```
//! use auth::TokenService;
//!
//! let tokens = TokenService::new(b"secret_key_at_least_32_bytes_long!", 7).unwrap();
//! let token = tokens.generate_token("alice").unwrap();
//! assert!(tokens.validate_token(&token));
//! assert_eq!(tokens.username_from_token(&token).unwrap(), "alice");
//! ```

pub mod jwt;
pub mod password;
pub mod token;

// Re-export commonly used items
pub use jwt::Claims;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use password::PasswordPolicy;
pub use password::PolicyError;
pub use token::TokenService;
