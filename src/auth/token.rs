use crate::error::AppError;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What an issued token is good for. Stored alongside the token string and
/// checked when the token is presented; only `auth` tokens grant access.
/// Corresponds to the `token_purpose` SQL enum.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "token_purpose", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TokenPurpose {
    Auth,
}

/// Claims encoded within an issued token.
///
/// There is no expiry claim: tokens stay signature-valid forever and are
/// invalidated by revocation, i.e. removal from the user's stored token
/// list. Given the same secret and inputs, issuing is deterministic.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject of the token: the user's unique identifier.
    pub sub: Uuid,
    /// What the token is good for.
    pub purpose: TokenPurpose,
}

/// Signs a token for the given user id and purpose (HS256).
///
/// The secret comes from startup configuration, not from the environment at
/// call time. Fails with `AppError::InternalServerError` if encoding fails.
pub fn issue(secret: &[u8], user_id: Uuid, purpose: TokenPurpose) -> Result<String, AppError> {
    let claims = Claims {
        sub: user_id,
        purpose,
    };
    encode(&Header::default(), &claims, &EncodingKey::from_secret(secret))
        .map_err(|e| AppError::InternalServerError(format!("failed to sign token: {}", e)))
}

/// Verifies a token's signature and decodes its claims.
///
/// Fails with `AppError::Unauthorized` if the signature is invalid or the
/// payload is malformed. Expiry is not checked; whether the token is still
/// honored is decided by the credential store's membership test, not here.
pub fn verify(secret: &[u8], token: &str) -> Result<Claims, AppError> {
    let mut validation = Validation::default();
    validation.validate_exp = false;
    validation.required_spec_claims.clear();

    let data = decode::<Claims>(token, &DecodingKey::from_secret(secret), &validation)?;
    Ok(data.claims)
}
