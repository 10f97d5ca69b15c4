use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::auth::password::{hash_password, verify_password};
use crate::auth::token::{self, TokenPurpose};
use crate::error::AppError;

/// A user account row.
///
/// The password hash never leaves the server: it is skipped on
/// serialization, and client-facing responses use [`PublicUser`] anyway.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// The client-facing view of a user: id and email, nothing else.
#[derive(Debug, Serialize, Deserialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub email: String,
}

impl User {
    pub fn public(&self) -> PublicUser {
        PublicUser {
            id: self.id,
            email: self.email.clone(),
        }
    }

    /// Creates a user from an already-validated email and plaintext
    /// password. The password is hashed before storage; a taken email is
    /// rejected with `AppError::BadRequest`.
    pub async fn create(pool: &PgPool, email: &str, password: &str) -> Result<User, AppError> {
        let existing =
            sqlx::query_scalar::<_, Uuid>("SELECT id FROM users WHERE email = $1")
                .bind(email)
                .fetch_optional(pool)
                .await?;

        if existing.is_some() {
            return Err(AppError::BadRequest("email already registered".into()));
        }

        let password_hash = hash_password(password)?;

        let user = sqlx::query_as::<_, User>(
            "INSERT INTO users (id, email, password_hash) VALUES ($1, $2, $3) \
             RETURNING id, email, password_hash, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(email)
        .bind(password_hash)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    /// Looks a user up by email and compares the password against the
    /// stored hash. Both an unknown email and a wrong password collapse to
    /// the same `AppError::BadRequest`, the status a failed login reports.
    pub async fn find_by_credentials(
        pool: &PgPool,
        email: &str,
        password: &str,
    ) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, password_hash, created_at FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(pool)
        .await?;

        match user {
            Some(user) => {
                if verify_password(password, &user.password_hash)? {
                    Ok(user)
                } else {
                    Err(AppError::BadRequest("invalid email or password".into()))
                }
            }
            None => Err(AppError::BadRequest("invalid email or password".into())),
        }
    }

    /// Resolves a presented token to its user.
    ///
    /// The signature check alone is not enough: a token stays
    /// signature-valid after logout. The decoded user id and the exact
    /// token string must both match a stored token row of purpose `auth`,
    /// so revoked tokens fail here with `AppError::Unauthorized`.
    pub async fn find_by_token(
        pool: &PgPool,
        secret: &[u8],
        presented: &str,
    ) -> Result<User, AppError> {
        let claims = token::verify(secret, presented)?;

        let user = sqlx::query_as::<_, User>(
            "SELECT u.id, u.email, u.password_hash, u.created_at FROM users u \
             JOIN user_tokens t ON t.user_id = u.id \
             WHERE u.id = $1 AND t.token = $2 AND t.purpose = $3",
        )
        .bind(claims.sub)
        .bind(presented)
        .bind(TokenPurpose::Auth)
        .fetch_optional(pool)
        .await?;

        user.ok_or_else(|| AppError::Unauthorized("token not recognized".into()))
    }

    /// Appends a token to the user's stored token list.
    pub async fn add_token(
        pool: &PgPool,
        user_id: Uuid,
        purpose: TokenPurpose,
        token: &str,
    ) -> Result<(), AppError> {
        sqlx::query("INSERT INTO user_tokens (user_id, purpose, token) VALUES ($1, $2, $3)")
            .bind(user_id)
            .bind(purpose)
            .bind(token)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Removes a token from the user's stored token list, revoking it.
    /// Removing a token that is already gone is not an error.
    pub async fn remove_token(pool: &PgPool, user_id: Uuid, token: &str) -> Result<(), AppError> {
        sqlx::query("DELETE FROM user_tokens WHERE user_id = $1 AND token = $2")
            .bind(user_id)
            .bind(token)
            .execute(pool)
            .await?;
        Ok(())
    }
}
