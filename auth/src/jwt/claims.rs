use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use crate::jwt::JwtError;

/// Bearer token payload.
///
/// Carries only what the identity service needs: the subject (username)
/// and the validity window as Unix timestamps.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject (username)
    pub sub: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Create claims for a subject valid for `expiration_days` from `issued_at`.
    ///
    /// `issued_at` is truncated to the second before the expiry is computed,
    /// so the token is valid for exactly the window starting at its `iat`.
    ///
    /// # Errors
    /// * `InvalidExpiration` - Window is not positive or the expiry is not representable
    pub fn for_subject(
        subject: impl ToString,
        issued_at: DateTime<Utc>,
        expiration_days: i64,
    ) -> Result<Self, JwtError> {
        let window = Self::validity_window(expiration_days)?;
        let issued_at = DateTime::from_timestamp(issued_at.timestamp(), 0)
            .ok_or(JwtError::InvalidExpiration(expiration_days))?;
        let expiration = issued_at
            .checked_add_signed(window)
            .ok_or(JwtError::InvalidExpiration(expiration_days))?;

        Ok(Self {
            sub: subject.to_string(),
            iat: issued_at.timestamp(),
            exp: expiration.timestamp(),
        })
    }

    /// Convert a day count into a validity window.
    ///
    /// # Errors
    /// * `InvalidExpiration` - Zero, negative, or too large for a `Duration`
    pub fn validity_window(expiration_days: i64) -> Result<Duration, JwtError> {
        if expiration_days <= 0 {
            return Err(JwtError::InvalidExpiration(expiration_days));
        }
        Duration::try_days(expiration_days).ok_or(JwtError::InvalidExpiration(expiration_days))
    }

    /// Check if the token is expired at the given instant.
    ///
    /// The expiry instant itself is already outside the validity window.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        current_timestamp >= self.exp
    }
}
