use chrono::DateTime;
use chrono::Utc;

use crate::jwt::Claims;
use crate::jwt::JwtError;
use crate::jwt::JwtHandler;

/// Issues and checks the bearer tokens used for API calls and email verification links.
///
/// Holds the read-only signing key derived once from the configured secret;
/// every operation takes `&self` and is safe to call from many workers at once.
pub struct TokenService {
    jwt_handler: JwtHandler,
    expiration_days: i64,
}

impl TokenService {
    /// Create a token service.
    ///
    /// # Arguments
    /// * `secret` - HMAC signing secret, at least 32 bytes
    /// * `expiration_days` - Validity window of issued tokens
    ///
    /// # Errors
    /// * `WeakSecret` - Secret is shorter than 32 bytes
    /// * `InvalidExpiration` - Window is not positive, or tokens issued now
    ///   would expire past the largest representable date
    pub fn new(secret: &[u8], expiration_days: i64) -> Result<Self, JwtError> {
        let window = Claims::validity_window(expiration_days)?;
        if Utc::now().checked_add_signed(window).is_none() {
            return Err(JwtError::InvalidExpiration(expiration_days));
        }

        Ok(Self {
            jwt_handler: JwtHandler::new(secret)?,
            expiration_days,
        })
    }

    pub fn expiration_days(&self) -> i64 {
        self.expiration_days
    }

    /// Issue a token for `subject`, valid from now for the configured window.
    pub fn generate_token(&self, subject: &str) -> Result<String, JwtError> {
        self.generate_token_at(subject, Utc::now())
    }

    /// Issue a token for `subject` as if issued at `issued_at`.
    pub fn generate_token_at(
        &self,
        subject: &str,
        issued_at: DateTime<Utc>,
    ) -> Result<String, JwtError> {
        let claims = Claims::for_subject(subject, issued_at, self.expiration_days)?;
        self.jwt_handler.encode(&claims)
    }

    /// Whether the token is well-formed, correctly signed and not yet expired.
    ///
    /// Never fails: every rejection is logged with its cause and reported as `false`.
    pub fn validate_token(&self, token: &str) -> bool {
        self.validate_token_at(token, Utc::now())
    }

    /// [`TokenService::validate_token`] evaluated at the instant `now`.
    ///
    /// Timestamps have one-second resolution: a token issued at `T` is valid
    /// for every `now` in `[trunc(T), trunc(T) + window)`.
    pub fn validate_token_at(&self, token: &str, now: DateTime<Utc>) -> bool {
        match self.verify(token, now) {
            Ok(_) => {
                tracing::debug!("Token is valid");
                true
            }
            Err(JwtError::InvalidSignature) => {
                tracing::error!("Invalid JSON Web Token signature");
                false
            }
            Err(JwtError::Malformed(reason)) => {
                tracing::error!(reason = %reason, "Invalid JSON Web Token");
                false
            }
            Err(JwtError::Expired) => {
                tracing::error!("JSON Web Token is expired");
                false
            }
            Err(JwtError::UnsupportedAlgorithm) => {
                tracing::error!("JSON Web Token is unsupported");
                false
            }
            Err(JwtError::Empty) => {
                tracing::error!("JSON Web Token claims string is empty");
                false
            }
            Err(e) => {
                tracing::error!(error = %e, "JSON Web Token rejected");
                false
            }
        }
    }

    /// Extract the subject (username) of a token.
    ///
    /// The signature is checked but expiry is not: call
    /// [`TokenService::validate_token`] first and only use the subject of a
    /// token that passed.
    pub fn username_from_token(&self, token: &str) -> Result<String, JwtError> {
        self.jwt_handler.decode(token).map(|claims| claims.sub)
    }

    fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, JwtError> {
        let claims = self.jwt_handler.decode(token)?;

        if claims.is_expired(now.timestamp()) {
            return Err(JwtError::Expired);
        }

        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use chrono::TimeZone;

    use super::*;

    const SECRET: &[u8] = b"test_secret_key_at_least_32_bytes!";

    #[test]
    fn test_generate_and_validate_token() {
        let tokens = TokenService::new(SECRET, 7).unwrap();

        let token = tokens.generate_token("alice").expect("Failed to generate token");

        assert!(tokens.validate_token(&token));
        assert_eq!(tokens.username_from_token(&token).unwrap(), "alice");
    }

    #[test]
    fn test_validity_window_boundaries() {
        let tokens = TokenService::new(SECRET, 3).unwrap();
        let issued_at = Utc.with_ymd_and_hms(2024, 3, 1, 8, 30, 0).unwrap();
        let expires_at = issued_at + Duration::days(3);

        let token = tokens.generate_token_at("alice", issued_at).unwrap();

        assert!(tokens.validate_token_at(&token, issued_at));
        assert!(tokens.validate_token_at(&token, expires_at - Duration::seconds(1)));
        assert!(!tokens.validate_token_at(&token, expires_at));
        assert!(!tokens.validate_token_at(&token, expires_at + Duration::seconds(1)));
    }

    #[test]
    fn test_expired_token_rejected_now() {
        let tokens = TokenService::new(SECRET, 1).unwrap();
        let token = tokens
            .generate_token_at("alice", Utc::now() - Duration::days(2))
            .unwrap();

        assert!(!tokens.validate_token(&token));
    }

    #[test]
    fn test_invalid_inputs_are_false_not_errors() {
        let tokens = TokenService::new(SECRET, 7).unwrap();
        let other = TokenService::new(b"another_secret_key_at_least_32_bytes", 7).unwrap();
        let foreign = other.generate_token("alice").unwrap();

        assert!(!tokens.validate_token(""));
        assert!(!tokens.validate_token("invalid.token.here"));
        assert!(!tokens.validate_token(&foreign));
    }

    #[test]
    fn test_tampered_token_rejected() {
        let tokens = TokenService::new(SECRET, 7).unwrap();
        let token = tokens.generate_token("alice").unwrap();
        let forged = tokens.generate_token("mallory").unwrap();

        // Splice mallory's payload onto alice's signature
        let alice_parts: Vec<&str> = token.split('.').collect();
        let forged_parts: Vec<&str> = forged.split('.').collect();
        let spliced = format!("{}.{}.{}", alice_parts[0], forged_parts[1], alice_parts[2]);

        assert!(!tokens.validate_token(&spliced));
    }

    #[test]
    fn test_subsecond_issue_time_keeps_full_window() {
        let tokens = TokenService::new(SECRET, 1).unwrap();
        let issued_at = Utc.with_ymd_and_hms(2024, 3, 1, 8, 30, 0).unwrap()
            + Duration::milliseconds(750);

        let token = tokens.generate_token_at("alice", issued_at).unwrap();

        let last_valid_second = issued_at + Duration::days(1) - Duration::seconds(1);

        assert!(tokens.validate_token_at(&token, last_valid_second));
        assert!(!tokens.validate_token_at(
            &token,
            Utc.with_ymd_and_hms(2024, 3, 2, 8, 30, 0).unwrap()
        ));
    }

    #[test]
    fn test_invalid_expiration_rejected() {
        for days in [0, -1, 200_000_000, i64::MAX] {
            assert_eq!(
                TokenService::new(SECRET, days).err(),
                Some(JwtError::InvalidExpiration(days))
            );
        }
    }

    #[test]
    fn test_weak_secret_rejected() {
        assert!(matches!(
            TokenService::new(b"short", 7),
            Err(JwtError::WeakSecret { .. })
        ));
    }
}
