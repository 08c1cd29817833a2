use thiserror::Error;

use crate::users::store::StoreError;

/// Outcome taxonomy for every service operation. Distinct causes stay
/// distinct instead of collapsing into an empty result.
#[derive(Debug, Error)]
pub enum UserServiceError {
    /// Payload failed validation.
    #[error("invalid payload: {0}")]
    Invalid(String),

    /// A uniqueness constraint would be violated; nothing was written.
    #[error("{0}")]
    Conflict(String),

    /// The requested user does not exist.
    #[error("user not found")]
    NotFound,

    /// Nickname generation gave up after the given number of candidates.
    #[error("could not find a free nickname after {0} attempts")]
    NicknameExhausted(usize),

    /// Password hashing failed.
    #[error("password hashing failed")]
    Hash(#[source] anyhow::Error),

    /// The persistence layer failed; the transaction was rolled back.
    #[error("storage failure")]
    Storage(#[from] StoreError),
}

impl UserServiceError {
    /// HTTP-equivalent status code for callers that map errors onto a wire
    /// surface.
    pub fn status(&self) -> u16 {
        match self {
            UserServiceError::Invalid(_) => 422,
            UserServiceError::Conflict(_) => 409,
            UserServiceError::NotFound => 404,
            UserServiceError::NicknameExhausted(_)
            | UserServiceError::Hash(_)
            | UserServiceError::Storage(_) => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflict_maps_to_409() {
        let err = UserServiceError::Conflict("email exists already".into());
        assert_eq!(err.status(), 409);
        assert_eq!(err.to_string(), "email exists already");
    }

    #[test]
    fn not_found_maps_to_404() {
        assert_eq!(UserServiceError::NotFound.status(), 404);
    }
}
