use async_trait::async_trait;
use sqlx::PgPool;
use tracing::error;
use uuid::Uuid;

use crate::users::model::{User, UserRole};
use crate::users::store::{NewUserRecord, StoreError, UserChanges, UserStore};

/// Serializes account creation so the is-this-the-first-user check and the
/// insert observe the same table state.
const CREATE_LOCK_KEY: i64 = 0x6163_636f_756e_7473;

const USER_COLUMNS: &str = "id, email, nickname, hashed_password, role, email_verified, \
     verification_token, first_name, last_name, bio, profile_picture_url, \
     github_profile_url, linkedin_profile_url, created_at, updated_at";

pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_db_error(e: sqlx::Error) -> StoreError {
    if let Some(db) = e.as_database_error() {
        if db.is_unique_violation() {
            let field = match db.constraint() {
                Some(c) if c.contains("nickname") => "nickname",
                _ => "email",
            };
            return StoreError::Duplicate {
                field: field.to_string(),
            };
        }
    }
    error!(error = %e, "database error");
    StoreError::Unavailable(e.into())
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)
    }

    async fn find_by_nickname(&self, nickname: &str) -> Result<Option<User>, StoreError> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE nickname = $1"
        ))
        .bind(nickname)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)
    }

    async fn count(&self) -> Result<i64, StoreError> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)
    }

    async fn insert(&self, record: NewUserRecord) -> Result<User, StoreError> {
        // Everything up to the commit shares one transaction; an error on any
        // statement rolls the whole insert back.
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(CREATE_LOCK_KEY)
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;

        let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&mut *tx)
            .await
            .map_err(map_db_error)?;

        let role = UserRole::resolve(existing, record.requested_role);
        let (email_verified, verification_token) = if role.is_admin() {
            (true, None)
        } else {
            (false, Some(record.verification_token))
        };

        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (
                email, nickname, hashed_password, role, email_verified,
                verification_token, first_name, last_name, bio,
                profile_picture_url, github_profile_url, linkedin_profile_url
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(&record.email)
        .bind(&record.nickname)
        .bind(&record.hashed_password)
        .bind(role)
        .bind(email_verified)
        .bind(verification_token)
        .bind(&record.first_name)
        .bind(&record.last_name)
        .bind(&record.bio)
        .bind(&record.profile_picture_url)
        .bind(&record.github_profile_url)
        .bind(&record.linkedin_profile_url)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_db_error)?;

        tx.commit().await.map_err(map_db_error)?;
        Ok(user)
    }

    async fn update(&self, id: Uuid, changes: UserChanges) -> Result<Option<User>, StoreError> {
        sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users SET
                email = COALESCE($2, email),
                nickname = COALESCE($3, nickname),
                hashed_password = COALESCE($4, hashed_password),
                role = COALESCE($5, role),
                first_name = COALESCE($6, first_name),
                last_name = COALESCE($7, last_name),
                bio = COALESCE($8, bio),
                profile_picture_url = COALESCE($9, profile_picture_url),
                github_profile_url = COALESCE($10, github_profile_url),
                linkedin_profile_url = COALESCE($11, linkedin_profile_url),
                updated_at = now()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&changes.email)
        .bind(&changes.nickname)
        .bind(&changes.hashed_password)
        .bind(changes.role)
        .bind(&changes.first_name)
        .bind(&changes.last_name)
        .bind(&changes.bio)
        .bind(&changes.profile_picture_url)
        .bind(&changes.github_profile_url)
        .bind(&changes.linkedin_profile_url)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)
    }
}
