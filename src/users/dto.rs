use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;

use crate::error::UserServiceError;
use crate::users::model::UserRole;

const MIN_PASSWORD_LEN: usize = 8;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Payload for account creation. Nickname is never accepted from the caller;
/// the service generates one.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUser {
    pub email: String,
    pub password: String,
    pub role: Option<UserRole>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
    pub profile_picture_url: Option<String>,
    pub github_profile_url: Option<String>,
    pub linkedin_profile_url: Option<String>,
}

impl CreateUser {
    /// Trims the email and checks the payload. Email case is preserved;
    /// uniqueness is case-sensitive as stored.
    pub fn normalize_and_validate(&mut self) -> Result<(), UserServiceError> {
        self.email = self.email.trim().to_string();
        if !is_valid_email(&self.email) {
            return Err(UserServiceError::Invalid("invalid email".into()));
        }
        if self.password.len() < MIN_PASSWORD_LEN {
            return Err(UserServiceError::Invalid("password too short".into()));
        }
        Ok(())
    }
}

/// Partial update payload. Only supplied fields are applied.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserUpdate {
    pub email: Option<String>,
    pub password: Option<String>,
    pub nickname: Option<String>,
    pub role: Option<UserRole>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
    pub profile_picture_url: Option<String>,
    pub github_profile_url: Option<String>,
    pub linkedin_profile_url: Option<String>,
}

impl UserUpdate {
    pub fn normalize_and_validate(&mut self) -> Result<(), UserServiceError> {
        if let Some(email) = self.email.as_mut() {
            *email = email.trim().to_string();
            if !is_valid_email(email) {
                return Err(UserServiceError::Invalid("invalid email".into()));
            }
        }
        if let Some(password) = self.password.as_deref() {
            if password.len() < MIN_PASSWORD_LEN {
                return Err(UserServiceError::Invalid("password too short".into()));
            }
        }
        if let Some(nickname) = self.nickname.as_deref() {
            if nickname.is_empty() {
                return Err(UserServiceError::Invalid("nickname must not be empty".into()));
            }
        }
        Ok(())
    }
}
