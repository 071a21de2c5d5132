use super::errors::PolicyError;

/// Characters that satisfy the special-character requirement.
pub const SPECIAL_CHARACTERS: &str = "@#$%^&+=!";

/// Stateless password strength check.
///
/// A password is accepted only if it is at least [`PasswordPolicy::MIN_LENGTH`]
/// characters long, contains an ASCII lowercase letter, an ASCII uppercase
/// letter, an ASCII digit, one of [`SPECIAL_CHARACTERS`], and no whitespace.
pub struct PasswordPolicy;

impl PasswordPolicy {
    pub const MIN_LENGTH: usize = 8;

    /// Validate a candidate password, reporting the first unmet requirement.
    pub fn validate(password: &str) -> Result<(), PolicyError> {
        let length = password.chars().count();
        if length < Self::MIN_LENGTH {
            return Err(PolicyError::TooShort {
                min: Self::MIN_LENGTH,
                actual: length,
            });
        }

        if password.chars().any(char::is_whitespace) {
            return Err(PolicyError::ContainsWhitespace);
        }

        if !password.chars().any(|c| c.is_ascii_lowercase()) {
            return Err(PolicyError::MissingLowercase);
        }

        if !password.chars().any(|c| c.is_ascii_uppercase()) {
            return Err(PolicyError::MissingUppercase);
        }

        if !password.chars().any(|c| c.is_ascii_digit()) {
            return Err(PolicyError::MissingDigit);
        }

        if !password.chars().any(|c| SPECIAL_CHARACTERS.contains(c)) {
            return Err(PolicyError::MissingSpecialCharacter(SPECIAL_CHARACTERS));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strong_password_passes() {
        assert_eq!(PasswordPolicy::validate("Abc12345!"), Ok(()));
        assert_eq!(PasswordPolicy::validate("xY9@xY9@"), Ok(()));
    }

    #[test]
    fn test_short_password_fails() {
        assert_eq!(
            PasswordPolicy::validate("abc"),
            Err(PolicyError::TooShort { min: 8, actual: 3 })
        );
        assert!(PasswordPolicy::validate("Ab1!xyz").is_err());
    }

    #[test]
    fn test_each_missing_class_fails() {
        assert_eq!(
            PasswordPolicy::validate("ABC12345!"),
            Err(PolicyError::MissingLowercase)
        );
        assert_eq!(
            PasswordPolicy::validate("abc12345!"),
            Err(PolicyError::MissingUppercase)
        );
        assert_eq!(
            PasswordPolicy::validate("Abcdefgh!"),
            Err(PolicyError::MissingDigit)
        );
        assert_eq!(
            PasswordPolicy::validate("Abc123456"),
            Err(PolicyError::MissingSpecialCharacter(SPECIAL_CHARACTERS))
        );
    }

    #[test]
    fn test_special_character_outside_set_fails() {
        assert!(PasswordPolicy::validate("Abc12345?").is_err());
        assert!(PasswordPolicy::validate("Abc12345*").is_err());
    }

    #[test]
    fn test_whitespace_fails() {
        assert_eq!(
            PasswordPolicy::validate("Abc 12345!"),
            Err(PolicyError::ContainsWhitespace)
        );
        assert_eq!(
            PasswordPolicy::validate("Abc12345!\t"),
            Err(PolicyError::ContainsWhitespace)
        );
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        // 6 characters, 9 bytes
        assert!(matches!(
            PasswordPolicy::validate("Aé1!éé"),
            Err(PolicyError::TooShort { actual: 6, .. })
        ));
    }
}
