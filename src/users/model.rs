use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// User record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub nickname: String,
    #[serde(skip_serializing)]
    pub hashed_password: String,
    pub role: UserRole,
    pub email_verified: bool,
    #[serde(skip_serializing)]
    pub verification_token: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
    pub profile_picture_url: Option<String>,
    pub github_profile_url: Option<String>,
    pub linkedin_profile_url: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
pub enum UserRole {
    Anonymous,
    Authenticated,
    Manager,
    Admin,
}

impl UserRole {
    /// Role handed to a new account. The very first account ever created is
    /// always an admin; otherwise an explicit admin request is honored and
    /// everything else starts anonymous.
    ///
    /// Store implementations call this inside the insert transaction so the
    /// bootstrap check cannot race a concurrent first signup.
    pub fn resolve(existing_users: i64, requested: Option<UserRole>) -> UserRole {
        if existing_users == 0 || requested == Some(UserRole::Admin) {
            UserRole::Admin
        } else {
            UserRole::Anonymous
        }
    }

    pub fn is_admin(self) -> bool {
        self == UserRole::Admin
    }
}
