use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::Username;
use crate::user::errors::UserError;
use crate::user::ports::UserQueryServicePort;
use crate::user::ports::UserRepository;

/// Read-side service over the user directory.
pub struct UserQueryService<UR>
where
    UR: UserRepository,
{
    user_repository: Arc<UR>,
}

impl<UR> UserQueryService<UR>
where
    UR: UserRepository,
{
    pub fn new(user_repository: Arc<UR>) -> Self {
        Self { user_repository }
    }
}

#[async_trait]
impl<UR> UserQueryServicePort for UserQueryService<UR>
where
    UR: UserRepository,
{
    async fn get_all_users(&self) -> Result<Vec<User>, UserError> {
        self.user_repository.find_all().await
    }

    async fn get_user(&self, id: &UserId) -> Result<User, UserError> {
        self.user_repository
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id.to_string()))
    }

    async fn get_user_by_username(&self, username: &Username) -> Result<User, UserError> {
        self.user_repository
            .find_by_username(username)
            .await?
            .ok_or_else(|| UserError::NotFoundByUsername(username.to_string()))
    }
}
