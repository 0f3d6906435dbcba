// Password hashing utilities
// Uses bcrypt with a configurable cost factor

use bcrypt::{hash, verify};

/// Hashes a password using bcrypt
///
/// # Arguments
/// * `password` - The plaintext password to hash
/// * `cost` - bcrypt cost factor (4-31)
///
/// # Example
/// ```
/// use teamboard_api::auth::password::{hash_password, verify_password};
///
/// let hash = hash_password("my_password", 4).unwrap();
/// assert!(verify_password("my_password", &hash).unwrap());
/// ```
pub fn hash_password(password: &str, cost: u32) -> Result<String, String> {
    hash(password, cost).map_err(|e| e.to_string())
}

/// Verifies a password against a bcrypt hash
///
/// # Returns
/// * `Ok(bool)` - True if password matches, false otherwise
/// * `Err(String)` - If the stored hash is malformed
pub fn verify_password(password: &str, hash: &str) -> Result<bool, String> {
    verify(password, hash).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const COST: u32 = bcrypt::DEFAULT_COST - 6;

    #[test]
    fn hash_and_verify_password() {
        let password = "test_password_123";
        let hash = hash_password(password, COST).expect("valid hash");

        let valid = verify_password(password, &hash).expect("valid verification");
        assert!(valid);
    }

    #[test]
    fn verify_wrong_password() {
        let hash = hash_password("test_password_123", COST).expect("valid hash");

        let valid = verify_password("wrong_password", &hash).expect("valid verification");
        assert!(!valid);
    }

    #[test]
    fn hash_different_outputs() {
        let password = "test_password_123";
        let hash1 = hash_password(password, COST).expect("valid hash");
        let hash2 = hash_password(password, COST).expect("valid hash");

        // Hashes should be different due to salt
        assert_ne!(hash1, hash2);
        assert!(verify_password(password, &hash1).unwrap());
        assert!(verify_password(password, &hash2).unwrap());
    }

    #[test]
    fn malformed_hash_is_an_error() {
        assert!(verify_password("anything", "not-a-bcrypt-hash").is_err());
    }

    #[test]
    fn invalid_cost_is_an_error() {
        assert!(hash_password("anything", 2).is_err());
    }
}
