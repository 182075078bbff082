//! User identity and roles.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Validation errors for user identity values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    /// The identifier is empty.
    #[error("user id must not be empty")]
    EmptyId,
    /// The identifier is not a UUID.
    #[error("user id must be a valid UUID")]
    InvalidId,
    /// The role label is not one of the known roles.
    #[error("unknown role: {0}")]
    UnknownRole(String),
}

/// Stable user identifier stored as a UUID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(Uuid);

impl UserId {
    /// Validate and construct a [`UserId`] from string input.
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let raw = id.as_ref();
        if raw.is_empty() {
            return Err(UserValidationError::EmptyId);
        }
        let parsed = Uuid::parse_str(raw).map_err(|_| UserValidationError::InvalidId)?;
        Ok(Self(parsed))
    }

    /// Wrap an already-validated UUID.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Generate a new random [`UserId`].
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.0.to_string()
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Marketplace role attached to a session.
///
/// Order placement is restricted to [`Role::Customer`]; the other roles exist
/// so the session layer can reject them explicitly rather than by omission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Buys products and places orders.
    Customer,
    /// Sells products; cannot place orders.
    Artisan,
    /// Partner organisation account.
    Ngo,
    /// Operational account.
    Admin,
}

impl Role {
    /// Stable label used in session storage and the users table.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::Artisan => "artisan",
            Self::Ngo => "ngo",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = UserValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "customer" => Ok(Self::Customer),
            "artisan" => Ok(Self::Artisan),
            "ngo" => Ok(Self::Ngo),
            "admin" => Ok(Self::Admin),
            other => Err(UserValidationError::UnknownRole(other.to_owned())),
        }
    }
}

/// Validation errors for login input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    /// Username is empty.
    EmptyUsername,
    /// Password is empty.
    EmptyPassword,
}

/// Validated login credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    username: String,
    password: String,
}

impl LoginCredentials {
    /// Validate and construct credentials from raw request parts.
    pub fn try_from_parts(username: &str, password: &str) -> Result<Self, LoginValidationError> {
        if username.trim().is_empty() {
            return Err(LoginValidationError::EmptyUsername);
        }
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }
        Ok(Self {
            username: username.to_owned(),
            password: password.to_owned(),
        })
    }

    /// The submitted username.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// The submitted password.
    pub fn password(&self) -> &str {
        &self.password
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use rstest::rstest;

    use super::*;

    #[rstest]
    fn user_id_rejects_non_uuid_input() {
        assert_eq!(
            UserId::new("not-a-uuid"),
            Err(UserValidationError::InvalidId)
        );
        assert_eq!(UserId::new(""), Err(UserValidationError::EmptyId));
    }

    #[rstest]
    fn user_id_round_trips_through_string() {
        let id = UserId::random();
        let raw = String::from(id.clone());
        let restored = UserId::try_from(raw).expect("valid uuid string");
        assert_eq!(restored, id);
    }

    #[rstest]
    #[case(Role::Customer, "customer")]
    #[case(Role::Artisan, "artisan")]
    #[case(Role::Ngo, "ngo")]
    #[case(Role::Admin, "admin")]
    fn role_labels_round_trip(#[case] role: Role, #[case] label: &str) {
        assert_eq!(role.as_str(), label);
        assert_eq!(Role::from_str(label).expect("known role"), role);
    }

    #[rstest]
    fn unknown_role_label_is_rejected() {
        assert!(Role::from_str("supplier").is_err());
    }

    #[rstest]
    fn login_credentials_reject_blank_parts() {
        assert_eq!(
            LoginCredentials::try_from_parts("  ", "secret"),
            Err(LoginValidationError::EmptyUsername)
        );
        assert_eq!(
            LoginCredentials::try_from_parts("amina", ""),
            Err(LoginValidationError::EmptyPassword)
        );
    }
}
