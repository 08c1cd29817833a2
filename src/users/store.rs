use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::users::model::{User, UserRole};

/// Persistence failure taxonomy. A `Duplicate` means no write happened; an
/// `Unavailable` means the transaction was rolled back.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("duplicate {field}")]
    Duplicate { field: String },

    #[error("storage unavailable")]
    Unavailable(#[source] anyhow::Error),
}

/// Fully resolved row waiting to be inserted. Role and verification state are
/// finalized by the store inside its insert transaction, so the
/// first-user-becomes-admin check cannot race a concurrent signup.
#[derive(Debug, Clone)]
pub struct NewUserRecord {
    pub email: String,
    pub nickname: String,
    pub hashed_password: String,
    pub requested_role: Option<UserRole>,
    pub verification_token: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
    pub profile_picture_url: Option<String>,
    pub github_profile_url: Option<String>,
    pub linkedin_profile_url: Option<String>,
}

/// Partial update. `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub email: Option<String>,
    pub nickname: Option<String>,
    pub hashed_password: Option<String>,
    pub role: Option<UserRole>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
    pub profile_picture_url: Option<String>,
    pub github_profile_url: Option<String>,
    pub linkedin_profile_url: Option<String>,
}

/// Gateway to the user table. One implementation per backing store; each call
/// is a single transaction.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    async fn find_by_nickname(&self, nickname: &str) -> Result<Option<User>, StoreError>;

    async fn count(&self) -> Result<i64, StoreError>;

    /// Inserts atomically. The stored role comes from
    /// [`UserRole::resolve`] evaluated against the count inside the same
    /// transaction; admin rows land verified with no token, everything else
    /// unverified with the supplied token.
    async fn insert(&self, record: NewUserRecord) -> Result<User, StoreError>;

    /// Applies the supplied fields and returns the refreshed row, or `None`
    /// if the id does not resolve.
    async fn update(&self, id: Uuid, changes: UserChanges) -> Result<Option<User>, StoreError>;
}
