use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::error::UserServiceError;
use crate::notify::NotificationGateway;
use crate::users::dto::{CreateUser, UserUpdate};
use crate::users::model::User;
use crate::users::nickname::generate_nickname;
use crate::users::password::hash_password;
use crate::users::store::{NewUserRecord, StoreError, UserChanges, UserStore};
use crate::users::token::generate_verification_token;

const MAX_NICKNAME_ATTEMPTS: usize = 16;

/// Stateless orchestration over a [`UserStore`] and a
/// [`NotificationGateway`]. Every operation is one logical transaction
/// against the store.
pub struct UserAccountService;

impl UserAccountService {
    pub async fn get_by_id(
        store: &dyn UserStore,
        id: Uuid,
    ) -> Result<Option<User>, UserServiceError> {
        Ok(store.find_by_id(id).await?)
    }

    pub async fn get_by_email(
        store: &dyn UserStore,
        email: &str,
    ) -> Result<Option<User>, UserServiceError> {
        Ok(store.find_by_email(email).await?)
    }

    pub async fn count(store: &dyn UserStore) -> Result<i64, UserServiceError> {
        Ok(store.count().await?)
    }

    /// Creates an account. The first account ever stored becomes a verified
    /// admin; any other account starts unverified and gets a verification
    /// email. Notifier failure does not undo the committed row.
    #[instrument(skip_all, fields(email = %payload.email))]
    pub async fn create(
        store: &dyn UserStore,
        mut payload: CreateUser,
        notifier: &dyn NotificationGateway,
    ) -> Result<User, UserServiceError> {
        payload.normalize_and_validate()?;

        if store.find_by_email(&payload.email).await?.is_some() {
            warn!("email already registered");
            return Err(UserServiceError::Conflict("email exists already".into()));
        }

        let hashed_password =
            hash_password(&payload.password).map_err(UserServiceError::Hash)?;
        let nickname = Self::generate_unique_nickname(store).await?;

        let record = NewUserRecord {
            email: payload.email,
            nickname,
            hashed_password,
            requested_role: payload.role,
            verification_token: generate_verification_token(),
            first_name: payload.first_name,
            last_name: payload.last_name,
            bio: payload.bio,
            profile_picture_url: payload.profile_picture_url,
            github_profile_url: payload.github_profile_url,
            linkedin_profile_url: payload.linkedin_profile_url,
        };

        // The store may still report a duplicate here: its unique constraints
        // are the safety net when a concurrent create wins the race between
        // our pre-check and the insert.
        let user = match store.insert(record).await {
            Ok(user) => user,
            Err(StoreError::Duplicate { field }) => {
                warn!(%field, "insert lost a uniqueness race");
                return Err(UserServiceError::Conflict(format!("{field} exists already")));
            }
            Err(e) => return Err(e.into()),
        };

        if !user.email_verified {
            if let Err(e) = notifier.send_verification_email(&user).await {
                warn!(error = %e, user_id = %user.id, "verification email failed; account stays unverified");
            }
        }

        info!(user_id = %user.id, role = ?user.role, "user created");
        Ok(user)
    }

    /// Applies a partial update to the account with the given id and returns
    /// the refreshed record. A supplied password is re-hashed; a supplied
    /// email owned by a different account is a conflict and nothing is
    /// written.
    #[instrument(skip_all, fields(user_id = %id))]
    pub async fn update(
        store: &dyn UserStore,
        id: Uuid,
        mut changes: UserUpdate,
    ) -> Result<User, UserServiceError> {
        changes.normalize_and_validate()?;

        if let Some(email) = changes.email.as_deref() {
            if let Some(owner) = store.find_by_email(email).await? {
                if owner.id != id {
                    warn!("email already registered to another user");
                    return Err(UserServiceError::Conflict("email exists already".into()));
                }
            }
        }

        let hashed_password = match changes.password.as_deref() {
            Some(plain) => Some(hash_password(plain).map_err(UserServiceError::Hash)?),
            None => None,
        };

        let changes = UserChanges {
            email: changes.email,
            nickname: changes.nickname,
            hashed_password,
            role: changes.role,
            first_name: changes.first_name,
            last_name: changes.last_name,
            bio: changes.bio,
            profile_picture_url: changes.profile_picture_url,
            github_profile_url: changes.github_profile_url,
            linkedin_profile_url: changes.linkedin_profile_url,
        };

        match store.update(id, changes).await {
            Ok(Some(user)) => {
                info!("user updated");
                Ok(user)
            }
            Ok(None) => {
                warn!("user not found after update attempt");
                Err(UserServiceError::NotFound)
            }
            Err(StoreError::Duplicate { field }) => {
                Err(UserServiceError::Conflict(format!("{field} exists already")))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Draws nickname candidates until one is free, up to a fixed number of
    /// attempts. Collisions are checked against stored nicknames.
    pub async fn generate_unique_nickname(
        store: &dyn UserStore,
    ) -> Result<String, UserServiceError> {
        for _ in 0..MAX_NICKNAME_ATTEMPTS {
            let candidate = generate_nickname();
            if store.find_by_nickname(&candidate).await?.is_none() {
                return Ok(candidate);
            }
        }
        Err(UserServiceError::NicknameExhausted(MAX_NICKNAME_ATTEMPTS))
    }
}
