//! Password hashing

use super::error::TrackerError;

/// Lowest cost bcrypt accepts
pub const MIN_BCRYPT_COST: u32 = 4;

/// Highest cost bcrypt accepts
pub const MAX_BCRYPT_COST: u32 = 31;

pub fn hash_password(password: &str, cost: u32) -> Result<String, TrackerError> {
    bcrypt::hash(password, cost.clamp(MIN_BCRYPT_COST, MAX_BCRYPT_COST))
        .map_err(|e| TrackerError::Internal(format!("Failed to hash password: {e}")))
}

pub fn verify_password(password: &str, password_hash: &str) -> Result<bool, TrackerError> {
    bcrypt::verify(password, password_hash)
        .map_err(|e| TrackerError::Internal(format!("Failed to verify password: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("secret1", MIN_BCRYPT_COST).unwrap();
        assert_ne!(hash, "secret1");
        assert!(verify_password("secret1", &hash).unwrap());
        assert!(!verify_password("secret2", &hash).unwrap());
    }

    #[test]
    fn test_cost_below_minimum_is_raised() {
        let hash = hash_password("secret1", 1).unwrap();
        assert!(verify_password("secret1", &hash).unwrap());
    }

    #[test]
    fn test_garbage_hash_is_an_error() {
        assert!(verify_password("secret1", "not-a-hash").is_err());
    }
}
