pub mod extractors;
pub mod middleware;
pub mod password;
pub mod token;

use serde::{Deserialize, Serialize};
use validator::Validate;

// Re-export necessary items
pub use extractors::AuthSession;
pub use middleware::AuthMiddleware;
pub use password::{hash_password, verify_password};
pub use token::{Claims, TokenPurpose};

/// The payload both signup and login accept: an email and a password.
///
/// The email must be a valid address (it is trimmed by the handler before
/// validation); the password must be at least 6 characters. Nothing else is
/// collected about a user.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct Credentials {
    #[validate(email)]
    pub email: String,
    /// Minimum length applies to the source password, before hashing.
    #[validate(length(min = 6))]
    pub password: String,
}
