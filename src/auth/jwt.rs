// JWT token creation and verification
// Session tokens carry the user id and expire after the configured window

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT claims structure
///
/// # Fields
/// * `sub` - Subject (user_id)
/// * `iat` - Issued-at time (seconds since epoch)
/// * `exp` - Expiry time (seconds since epoch)
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// User ID (subject)
    pub sub: Uuid,
    /// Issued-at timestamp (seconds since epoch)
    pub iat: usize,
    /// Expiry timestamp (seconds since epoch)
    pub exp: usize,
}

/// Creates a JWT token for a user
///
/// # Arguments
/// * `user_id` - The user's ID to include in the token
/// * `secret` - The signing secret
/// * `ttl` - How long the token stays valid
///
/// # Token Properties
/// - Signed with HS256 algorithm
/// - Contains user_id in 'sub' claim
///
/// # Example
/// ```
/// use chrono::Duration;
/// use teamboard_api::auth::jwt::{create_token, verify_token};
/// use uuid::Uuid;
///
/// let user_id = Uuid::new_v4();
/// let token = create_token(user_id, "your-secret-key", Duration::days(30)).unwrap();
///
/// let claims = verify_token(&token, "your-secret-key").expect("valid token");
/// assert_eq!(claims.sub, user_id);
/// ```
pub fn create_token(user_id: Uuid, secret: &str, ttl: Duration) -> Result<String, String> {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id,
        iat: now.timestamp() as usize,
        exp: (now + ttl).timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_ref()),
    )
    .map_err(|e| e.to_string())
}

/// Verifies and decodes a JWT token
///
/// # Returns
/// * `Ok(Claims)` - The decoded claims if token is valid
/// * `Err(String)` - If token is malformed, badly signed or expired
pub fn verify_token(token: &str, secret: &str) -> Result<Claims, String> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_ref()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| e.to_string())
}
