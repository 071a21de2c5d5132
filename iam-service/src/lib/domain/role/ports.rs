use async_trait::async_trait;

use crate::domain::role::errors::RoleError;
use crate::domain::role::models::Role;
use crate::domain::role::models::RoleName;

/// Port for role write operations.
#[async_trait]
pub trait RoleCommandServicePort: Send + Sync + 'static {
    /// Make sure every known role exists in storage.
    ///
    /// Safe to run on every start; existing roles are left untouched.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn seed_roles(&self) -> Result<(), RoleError>;
}

/// Port for role read operations.
#[async_trait]
pub trait RoleQueryServicePort: Send + Sync + 'static {
    /// Retrieve all stored roles.
    async fn get_all_roles(&self) -> Result<Vec<Role>, RoleError>;

    /// Retrieve a role by name (`ROLE_ADMIN`, `admin`, ...).
    ///
    /// # Errors
    /// * `NotFound` - Unknown role name, or role not seeded
    /// * `DatabaseError` - Database operation failed
    async fn get_role_by_name(&self, name: &str) -> Result<Role, RoleError>;
}

/// Persistence operations for roles.
#[async_trait]
pub trait RoleRepository: Send + Sync + 'static {
    /// Retrieve role by name.
    ///
    /// # Returns
    /// Optional role entity (None if not stored)
    async fn find_by_role_name(&self, name: RoleName) -> Result<Option<Role>, RoleError>;

    /// Check whether a role is stored.
    async fn exists_by_role_name(&self, name: RoleName) -> Result<bool, RoleError>;

    /// Persist a role, returning the stored entity.
    ///
    /// Saving a name that already exists returns the existing role.
    async fn save(&self, name: RoleName) -> Result<Role, RoleError>;

    /// Retrieve all roles.
    async fn find_all(&self) -> Result<Vec<Role>, RoleError>;
}
