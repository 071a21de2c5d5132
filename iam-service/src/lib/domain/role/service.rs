use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::role::errors::RoleError;
use crate::domain::role::models::Role;
use crate::domain::role::models::RoleName;
use crate::domain::role::ports::RoleCommandServicePort;
use crate::domain::role::ports::RoleQueryServicePort;
use crate::domain::role::ports::RoleRepository;

/// Domain service for role seeding and lookups.
pub struct RoleService<RR>
where
    RR: RoleRepository,
{
    repository: Arc<RR>,
}

impl<RR> RoleService<RR>
where
    RR: RoleRepository,
{
    pub fn new(repository: Arc<RR>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl<RR> RoleCommandServicePort for RoleService<RR>
where
    RR: RoleRepository,
{
    async fn seed_roles(&self) -> Result<(), RoleError> {
        tracing::info!("Verifying if roles seeding is needed");

        for name in RoleName::ALL {
            if !self.repository.exists_by_role_name(name).await? {
                let role = self.repository.save(name).await?;
                tracing::info!(role = %role.name, role_id = role.id.0, "Role seeded");
            }
        }

        tracing::info!("Roles seeding verification finished");
        Ok(())
    }
}

#[async_trait]
impl<RR> RoleQueryServicePort for RoleService<RR>
where
    RR: RoleRepository,
{
    async fn get_all_roles(&self) -> Result<Vec<Role>, RoleError> {
        self.repository.find_all().await
    }

    async fn get_role_by_name(&self, name: &str) -> Result<Role, RoleError> {
        let role_name = RoleName::parse(name)?;

        self.repository
            .find_by_role_name(role_name)
            .await?
            .ok_or_else(|| RoleError::NotFound(role_name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use mockall::mock;
    use mockall::predicate::*;

    use super::*;
    use crate::domain::role::models::RoleId;

    mock! {
        pub TestRoleRepository {}

        #[async_trait]
        impl RoleRepository for TestRoleRepository {
            async fn find_by_role_name(&self, name: RoleName) -> Result<Option<Role>, RoleError>;
            async fn exists_by_role_name(&self, name: RoleName) -> Result<bool, RoleError>;
            async fn save(&self, name: RoleName) -> Result<Role, RoleError>;
            async fn find_all(&self) -> Result<Vec<Role>, RoleError>;
        }
    }

    #[tokio::test]
    async fn test_seed_roles_inserts_missing_only() {
        let mut repository = MockTestRoleRepository::new();

        repository
            .expect_exists_by_role_name()
            .with(eq(RoleName::Admin))
            .times(1)
            .returning(|_| Ok(true));
        repository
            .expect_exists_by_role_name()
            .with(eq(RoleName::User))
            .times(1)
            .returning(|_| Ok(false));
        repository
            .expect_save()
            .with(eq(RoleName::User))
            .times(1)
            .returning(|name| Ok(Role { id: RoleId(2), name }));

        let service = RoleService::new(Arc::new(repository));

        assert!(service.seed_roles().await.is_ok());
    }

    #[tokio::test]
    async fn test_seed_roles_when_all_present_is_noop() {
        let mut repository = MockTestRoleRepository::new();

        repository
            .expect_exists_by_role_name()
            .times(2)
            .returning(|_| Ok(true));
        repository.expect_save().times(0);

        let service = RoleService::new(Arc::new(repository));

        assert!(service.seed_roles().await.is_ok());
    }

    #[tokio::test]
    async fn test_get_role_by_short_name() {
        let mut repository = MockTestRoleRepository::new();

        repository
            .expect_find_by_role_name()
            .with(eq(RoleName::Admin))
            .times(1)
            .returning(|name| Ok(Some(Role { id: RoleId(1), name })));

        let service = RoleService::new(Arc::new(repository));

        let role = service.get_role_by_name("admin").await.unwrap();
        assert_eq!(role.name, RoleName::Admin);
    }

    #[tokio::test]
    async fn test_get_role_by_unknown_name() {
        let mut repository = MockTestRoleRepository::new();
        repository.expect_find_by_role_name().times(0);

        let service = RoleService::new(Arc::new(repository));

        assert_eq!(
            service.get_role_by_name("superuser").await,
            Err(RoleError::NotFound("superuser".to_string()))
        );
    }
}
