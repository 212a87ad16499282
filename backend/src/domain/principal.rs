//! Authenticated identities: user ids, staff roles and the request principal.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Identifier of a row in the `users` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct UserId(i32);

impl UserId {
    /// Wrap a raw database identifier.
    pub const fn new(id: i32) -> Self {
        Self(id)
    }

    /// Raw integer value as stored.
    pub const fn get(self) -> i32 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of the doctor a patient is assigned to.
///
/// A doctor's identity is the user id carried by their session, so the
/// conversion from [`Principal`] is infallible for doctor principals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct DoctorId(i32);

impl DoctorId {
    /// Wrap a raw database identifier.
    pub const fn new(id: i32) -> Self {
        Self(id)
    }

    /// Raw integer value as stored.
    pub const fn get(self) -> i32 {
        self.0
    }
}

impl From<UserId> for DoctorId {
    fn from(value: UserId) -> Self {
        Self(value.get())
    }
}

/// Staff role attached to every user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Clinical staff reading and annotating assigned patients.
    Doctor,
    /// Front-desk staff managing full patient records.
    Receptionist,
}

impl Role {
    /// Wire and storage spelling of the role.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Doctor => "doctor",
            Self::Receptionist => "receptionist",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a stored or transmitted role string is unknown.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "doctor" => Ok(Self::Doctor),
            "receptionist" => Ok(Self::Receptionist),
            other => Err(UnknownRole(other.to_owned())),
        }
    }
}

/// The authenticated identity attached to a request.
///
/// Produced at login and re-derived from the verified session token on each
/// request. Immutable once issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Principal {
    user_id: UserId,
    role: Role,
}

impl Principal {
    /// Build a principal from its parts.
    pub const fn new(user_id: UserId, role: Role) -> Self {
        Self { user_id, role }
    }

    /// Authenticated user id.
    pub const fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Role carried by the session.
    pub const fn role(&self) -> Role {
        self.role
    }

    /// Whether the principal holds `role`.
    pub fn has_role(&self, role: Role) -> bool {
        self.role == role
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("doctor", Role::Doctor)]
    #[case("receptionist", Role::Receptionist)]
    fn role_round_trips_through_strings(#[case] raw: &str, #[case] role: Role) {
        assert_eq!(raw.parse::<Role>(), Ok(role));
        assert_eq!(role.as_str(), raw);
    }

    #[rstest]
    #[case("admin")]
    #[case("Doctor")]
    #[case("")]
    fn unknown_roles_are_rejected(#[case] raw: &str) {
        assert_eq!(raw.parse::<Role>(), Err(UnknownRole(raw.to_owned())));
    }

    #[rstest]
    fn doctor_id_follows_user_id() {
        let principal = Principal::new(UserId::new(7), Role::Doctor);
        assert_eq!(DoctorId::from(principal.user_id()), DoctorId::new(7));
        assert!(principal.has_role(Role::Doctor));
        assert!(!principal.has_role(Role::Receptionist));
    }
}
