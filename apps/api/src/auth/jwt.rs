// JWT token creation and verification
// Tokens carry the caller's tenant, organization and role so requests can be
// authorized without a user lookup

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::user::{Role, User};

/// JWT claims structure
///
/// # Fields
/// * `sub` - Subject (user_id)
/// * `tenant_id` - Tenant the user belongs to
/// * `organization_id` - Home organization, absent for tenant-wide users
/// * `role` - Role at the time the token was issued
/// * `exp` - Expiry time (seconds since epoch)
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Claims {
    pub sub: Uuid,
    pub tenant_id: Uuid,
    pub organization_id: Option<Uuid>,
    pub role: Role,
    pub exp: usize,
}

impl Claims {
    pub fn for_user(user: &User, expiry_hours: i64) -> Self {
        let expiry = Utc::now() + Duration::hours(expiry_hours);
        Self {
            sub: user.id,
            tenant_id: user.tenant_id,
            organization_id: user.organization_id,
            role: user.role,
            exp: expiry.timestamp() as usize,
        }
    }
}

/// Creates a signed JWT for a user
///
/// # Arguments
/// * `user` - The authenticated user
/// * `secret` - The secret key for signing
/// * `expiry_hours` - Token lifetime
///
/// # Returns
/// * `Ok(String)` - The JWT token
/// * `Err(String)` - If token creation fails
///
/// # Token Properties
/// - Signed with HS256 algorithm
/// - Contains user_id in 'sub' claim
pub fn create_token(user: &User, secret: &str, expiry_hours: i64) -> Result<String, String> {
    encode(
        &Header::default(),
        &Claims::for_user(user, expiry_hours),
        &EncodingKey::from_secret(secret.as_ref()),
    )
    .map_err(|e| e.to_string())
}

/// Verifies and decodes a JWT token
///
/// # Returns
/// * `Ok(Claims)` - The decoded claims if token is valid
/// * `Err(String)` - If token is invalid or expired
pub fn verify_token(token: &str, secret: &str) -> Result<Claims, String> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_ref()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| e.to_string())
}
