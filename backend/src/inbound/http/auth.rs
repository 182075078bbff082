//! Authentication helpers used by HTTP handlers.
//!
//! Keep the HTTP modules focused on request/response mapping by concentrating
//! credential checks and user identity derivation here.

use crate::domain::{Error, LoginCredentials, Role, UserId};

use super::ApiResult;

/// Identity established by a successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// Stable user identifier.
    pub user_id: UserId,
    /// Role recorded in the session.
    pub role: Role,
}

fn fixture_user(id: &str, role: Role) -> ApiResult<AuthenticatedUser> {
    let user_id = UserId::new(id)
        .map_err(|err| Error::internal(format!("invalid fixture user id: {err}")))?;
    Ok(AuthenticatedUser { user_id, role })
}

/// Check credentials against the fixture directory.
pub fn authenticate(credentials: &LoginCredentials) -> ApiResult<AuthenticatedUser> {
    match (credentials.username(), credentials.password()) {
        ("customer", "password") => {
            fixture_user("123e4567-e89b-12d3-a456-426614174000", Role::Customer)
        }
        ("artisan", "password") => {
            fixture_user("123e4567-e89b-12d3-a456-426614174001", Role::Artisan)
        }
        _ => Err(Error::unauthorized("invalid credentials")),
    }
}
