use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::PgPool;
use sqlx::Row;
use uuid::Uuid;

use crate::domain::audit::AuditMetadata;
use crate::domain::role::models::Role;
use crate::domain::role::models::RoleId;
use crate::domain::role::models::RoleName;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::HashedPassword;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::Username;
use crate::domain::user::ports::UserRepository;
use crate::user::errors::UserError;

const USER_COLUMNS: &str =
    "id, username, email, hashed_password, is_active, is_verified, created_at, updated_at";

pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn row_to_user(row: &PgRow, roles: Vec<Role>) -> Result<User, UserError> {
        Ok(User {
            audit: AuditMetadata::restore(
                UserId(row.get("id")),
                row.get("created_at"),
                row.get("updated_at"),
            ),
            username: Username::new(row.get("username"))?,
            email: EmailAddress::new(row.get("email"))?,
            hashed_password: HashedPassword::new(row.get("hashed_password")),
            active: row.get("is_active"),
            verified: row.get("is_verified"),
            roles,
        })
    }

    /// Load role assignments for a set of users, keyed by user id.
    async fn load_roles(&self, user_ids: &[Uuid]) -> Result<HashMap<Uuid, Vec<Role>>, UserError> {
        let rows = sqlx::query(
            r#"
            SELECT ur.user_id, r.id, r.name
            FROM user_roles ur
            JOIN roles r ON r.id = ur.role_id
            WHERE ur.user_id = ANY($1)
            ORDER BY r.id
            "#,
        )
        .bind(user_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        let mut roles: HashMap<Uuid, Vec<Role>> = HashMap::new();
        for row in rows {
            let name: String = row.get("name");
            roles.entry(row.get("user_id")).or_default().push(Role {
                id: RoleId(row.get("id")),
                name: RoleName::parse(&name)?,
            });
        }

        Ok(roles)
    }

    async fn fetch_one_by(&self, column: &str, value: &str) -> Result<Option<User>, UserError> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE {column} = $1");
        let row = sqlx::query(&query)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        self.hydrate_one(row).await
    }

    async fn hydrate_one(&self, row: Option<PgRow>) -> Result<Option<User>, UserError> {
        match row {
            Some(r) => {
                let id: Uuid = r.get("id");
                let mut roles = self.load_roles(&[id]).await?;
                Ok(Some(Self::row_to_user(
                    &r,
                    roles.remove(&id).unwrap_or_default(),
                )?))
            }
            None => Ok(None),
        }
    }

    fn map_write_error(e: sqlx::Error, user: &User) -> UserError {
        if let Some(db_err) = e.as_database_error() {
            if db_err.is_unique_violation() {
                if db_err.constraint() == Some("users_username_key") {
                    return UserError::UsernameAlreadyExists(user.username.as_str().to_string());
                }
                if db_err.constraint() == Some("users_email_key") {
                    return UserError::EmailAlreadyExists(user.email.as_str().to_string());
                }
            }
        }
        UserError::DatabaseError(e.to_string())
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, UserError> {
        self.fetch_one_by("username", username.as_str()).await
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        self.hydrate_one(row).await
    }

    async fn exists_by_username(&self, username: &Username) -> Result<bool, UserError> {
        let row = sqlx::query("SELECT EXISTS(SELECT 1 FROM users WHERE username = $1) AS present")
            .bind(username.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        Ok(row.get("present"))
    }

    async fn exists_by_email(&self, email: &EmailAddress) -> Result<bool, UserError> {
        let row = sqlx::query("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1) AS present")
            .bind(email.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        Ok(row.get("present"))
    }

    async fn find_all(&self) -> Result<Vec<User>, UserError> {
        let rows = sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        let ids: Vec<Uuid> = rows.iter().map(|r| r.get("id")).collect();
        let mut roles = self.load_roles(&ids).await?;

        rows.iter()
            .map(|r| {
                let id: Uuid = r.get("id");
                Self::row_to_user(r, roles.remove(&id).unwrap_or_default())
            })
            .collect()
    }

    async fn save(&self, mut user: User) -> Result<User, UserError> {
        user.audit.on_update();

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO users (id, username, email, hashed_password, is_active, is_verified, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (id) DO UPDATE SET
                username = EXCLUDED.username,
                email = EXCLUDED.email,
                hashed_password = EXCLUDED.hashed_password,
                is_active = EXCLUDED.is_active,
                is_verified = EXCLUDED.is_verified,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(user.id().0)
        .bind(user.username.as_str())
        .bind(user.email.as_str())
        .bind(user.hashed_password.as_str())
        .bind(user.active)
        .bind(user.verified)
        .bind(user.audit.created_at)
        .bind(user.audit.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| Self::map_write_error(e, &user))?;

        sqlx::query("DELETE FROM user_roles WHERE user_id = $1")
            .bind(user.id().0)
            .execute(&mut *tx)
            .await
            .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        for role in &user.roles {
            sqlx::query("INSERT INTO user_roles (user_id, role_id) VALUES ($1, $2)")
                .bind(user.id().0)
                .bind(role.id.0)
                .execute(&mut *tx)
                .await
                .map_err(|e| UserError::DatabaseError(e.to_string()))?;
        }

        tx.commit()
            .await
            .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        Ok(user)
    }
}
