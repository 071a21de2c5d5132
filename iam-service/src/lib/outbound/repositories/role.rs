use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::PgPool;
use sqlx::Row;

use crate::domain::role::errors::RoleError;
use crate::domain::role::models::Role;
use crate::domain::role::models::RoleId;
use crate::domain::role::models::RoleName;
use crate::domain::role::ports::RoleRepository;

pub struct PostgresRoleRepository {
    pool: PgPool,
}

impl PostgresRoleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn row_to_role(row: &PgRow) -> Result<Role, RoleError> {
        let name: String = row.get("name");
        Ok(Role {
            id: RoleId(row.get("id")),
            name: RoleName::parse(&name)?,
        })
    }
}

#[async_trait]
impl RoleRepository for PostgresRoleRepository {
    async fn find_by_role_name(&self, name: RoleName) -> Result<Option<Role>, RoleError> {
        let row = sqlx::query(
            r#"
            SELECT id, name
            FROM roles
            WHERE name = $1
            "#,
        )
        .bind(name.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RoleError::DatabaseError(e.to_string()))?;

        row.as_ref().map(Self::row_to_role).transpose()
    }

    async fn exists_by_role_name(&self, name: RoleName) -> Result<bool, RoleError> {
        let row = sqlx::query(
            r#"
            SELECT EXISTS(SELECT 1 FROM roles WHERE name = $1) AS present
            "#,
        )
        .bind(name.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| RoleError::DatabaseError(e.to_string()))?;

        Ok(row.get("present"))
    }

    async fn save(&self, name: RoleName) -> Result<Role, RoleError> {
        let row = sqlx::query(
            r#"
            INSERT INTO roles (name)
            VALUES ($1)
            ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
            RETURNING id, name
            "#,
        )
        .bind(name.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| RoleError::DatabaseError(e.to_string()))?;

        Self::row_to_role(&row)
    }

    async fn find_all(&self) -> Result<Vec<Role>, RoleError> {
        let rows = sqlx::query(
            r#"
            SELECT id, name
            FROM roles
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RoleError::DatabaseError(e.to_string()))?;

        rows.iter().map(Self::row_to_role).collect()
    }
}
