use rand::distributions::{Alphanumeric, DistString};

const TOKEN_LEN: usize = 32;

/// Opaque token mailed to a new account and consumed by the verification
/// flow.
pub fn generate_verification_token() -> String {
    Alphanumeric.sample_string(&mut rand::thread_rng(), TOKEN_LEN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_is_opaque_alphanumeric() {
        let token = generate_verification_token();
        assert_eq!(token.len(), TOKEN_LEN);
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn tokens_do_not_repeat() {
        assert_ne!(generate_verification_token(), generate_verification_token());
    }
}
