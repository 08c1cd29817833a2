use std::collections::HashMap;

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::users::model::{User, UserRole};
use crate::users::store::{NewUserRecord, StoreError, UserChanges, UserStore};

/// In-memory user store with the same semantics as the Postgres one. Used by
/// tests and embedders that do not want a database.
#[derive(Default)]
pub struct MemoryUserStore {
    users: Mutex<HashMap<Uuid, User>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.users.lock().await.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .users
            .lock()
            .await
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn find_by_nickname(&self, nickname: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .users
            .lock()
            .await
            .values()
            .find(|u| u.nickname == nickname)
            .cloned())
    }

    async fn count(&self) -> Result<i64, StoreError> {
        Ok(self.users.lock().await.len() as i64)
    }

    async fn insert(&self, record: NewUserRecord) -> Result<User, StoreError> {
        // The mutex is held for the whole check-and-insert, mirroring the
        // advisory-lock transaction of the Postgres store.
        let mut users = self.users.lock().await;

        if users.values().any(|u| u.email == record.email) {
            return Err(StoreError::Duplicate {
                field: "email".into(),
            });
        }
        if users.values().any(|u| u.nickname == record.nickname) {
            return Err(StoreError::Duplicate {
                field: "nickname".into(),
            });
        }

        let role = UserRole::resolve(users.len() as i64, record.requested_role);
        let (email_verified, verification_token) = if role.is_admin() {
            (true, None)
        } else {
            (false, Some(record.verification_token))
        };

        let now = OffsetDateTime::now_utc();
        let user = User {
            id: Uuid::new_v4(),
            email: record.email,
            nickname: record.nickname,
            hashed_password: record.hashed_password,
            role,
            email_verified,
            verification_token,
            first_name: record.first_name,
            last_name: record.last_name,
            bio: record.bio,
            profile_picture_url: record.profile_picture_url,
            github_profile_url: record.github_profile_url,
            linkedin_profile_url: record.linkedin_profile_url,
            created_at: now,
            updated_at: now,
        };
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update(&self, id: Uuid, changes: UserChanges) -> Result<Option<User>, StoreError> {
        let mut users = self.users.lock().await;

        if let Some(email) = changes.email.as_deref() {
            if users.values().any(|u| u.email == email && u.id != id) {
                return Err(StoreError::Duplicate {
                    field: "email".into(),
                });
            }
        }
        if let Some(nickname) = changes.nickname.as_deref() {
            if users.values().any(|u| u.nickname == nickname && u.id != id) {
                return Err(StoreError::Duplicate {
                    field: "nickname".into(),
                });
            }
        }

        let Some(user) = users.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(email) = changes.email {
            user.email = email;
        }
        if let Some(nickname) = changes.nickname {
            user.nickname = nickname;
        }
        if let Some(hash) = changes.hashed_password {
            user.hashed_password = hash;
        }
        if let Some(role) = changes.role {
            user.role = role;
        }
        if let Some(first_name) = changes.first_name {
            user.first_name = Some(first_name);
        }
        if let Some(last_name) = changes.last_name {
            user.last_name = Some(last_name);
        }
        if let Some(bio) = changes.bio {
            user.bio = Some(bio);
        }
        if let Some(url) = changes.profile_picture_url {
            user.profile_picture_url = Some(url);
        }
        if let Some(url) = changes.github_profile_url {
            user.github_profile_url = Some(url);
        }
        if let Some(url) = changes.linkedin_profile_url {
            user.linkedin_profile_url = Some(url);
        }
        user.updated_at = OffsetDateTime::now_utc();

        Ok(Some(user.clone()))
    }
}
