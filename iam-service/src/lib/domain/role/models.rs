use std::fmt;

use super::errors::RoleError;

/// Role storage identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RoleId(pub i64);

/// The fixed set of authorization roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RoleName {
    Admin,
    User,
}

/// Explicit mapping from stored/wire role names to roles.
const ROLE_TABLE: [(&str, RoleName); 2] = [
    ("ROLE_ADMIN", RoleName::Admin),
    ("ROLE_USER", RoleName::User),
];

impl RoleName {
    pub const ALL: [RoleName; 2] = [RoleName::Admin, RoleName::User];

    /// Role assigned when a sign-up names none.
    pub const DEFAULT: RoleName = RoleName::User;

    /// Resolve a role name.
    ///
    /// Accepts the canonical form (`ROLE_ADMIN`) as well as the bare,
    /// case-insensitive form (`admin`).
    ///
    /// # Errors
    /// * `NotFound` - Name is not one of the known roles
    pub fn parse(name: &str) -> Result<Self, RoleError> {
        let upper = name.trim().to_uppercase();
        let canonical = if upper.starts_with("ROLE_") {
            upper
        } else {
            format!("ROLE_{upper}")
        };

        ROLE_TABLE
            .iter()
            .find(|(key, _)| *key == canonical)
            .map(|(_, role)| *role)
            .ok_or_else(|| RoleError::NotFound(name.to_string()))
    }

    /// Canonical role name, as stored.
    pub fn as_str(&self) -> &'static str {
        match self {
            RoleName::Admin => "ROLE_ADMIN",
            RoleName::User => "ROLE_USER",
        }
    }

    /// Apply the default role to an empty selection.
    pub fn with_default(names: Vec<RoleName>) -> Vec<RoleName> {
        if names.is_empty() {
            vec![Self::DEFAULT]
        } else {
            names
        }
    }
}

impl fmt::Display for RoleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Persisted role entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Role {
    pub id: RoleId,
    pub name: RoleName,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_canonical_and_short_names() {
        assert_eq!(RoleName::parse("ROLE_ADMIN"), Ok(RoleName::Admin));
        assert_eq!(RoleName::parse("ROLE_USER"), Ok(RoleName::User));
        assert_eq!(RoleName::parse("admin"), Ok(RoleName::Admin));
        assert_eq!(RoleName::parse("User"), Ok(RoleName::User));
        assert_eq!(RoleName::parse("role_user"), Ok(RoleName::User));
    }

    #[test]
    fn test_parse_unknown_name() {
        assert_eq!(
            RoleName::parse("ROLE_ROOT"),
            Err(RoleError::NotFound("ROLE_ROOT".to_string()))
        );
        assert!(RoleName::parse("").is_err());
    }

    #[test]
    fn test_with_default() {
        assert_eq!(RoleName::with_default(vec![]), vec![RoleName::User]);
        assert_eq!(
            RoleName::with_default(vec![RoleName::Admin]),
            vec![RoleName::Admin]
        );
    }

    #[test]
    fn test_as_str_round_trips_through_parse() {
        for role in RoleName::ALL {
            assert_eq!(RoleName::parse(role.as_str()), Ok(role));
        }
    }
}
