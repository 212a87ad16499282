//! Staff profiles returned after a successful login.
//!
//! Each user row carries a role discriminant; exactly one role-specific
//! profile is materialised for it.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use super::{Principal, Role, UserId};

/// Profile of a doctor account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct DoctorProfile {
    /// Id of the owning user row.
    #[schema(value_type = i32, example = 7)]
    pub id: UserId,
    #[schema(example = "Dr. Meera Rao")]
    pub name: String,
    #[schema(example = "meera@clinic.test")]
    pub email: String,
    #[schema(example = "Cardiology")]
    pub specialty: String,
    pub emergency_contact: String,
    pub license_number: String,
    pub experience_years: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Profile of a receptionist account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ReceptionistProfile {
    /// Id of the owning user row.
    #[schema(value_type = i32, example = 3)]
    pub id: UserId,
    #[schema(example = "Anil Kumar")]
    pub name: String,
    #[schema(example = "desk@clinic.test")]
    pub email: String,
    pub phone: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Role-specific profile, serialised as the bare profile object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(untagged)]
pub enum StaffProfile {
    Doctor(DoctorProfile),
    Receptionist(ReceptionistProfile),
}

impl StaffProfile {
    /// Role the profile belongs to.
    pub fn role(&self) -> Role {
        match self {
            Self::Doctor(_) => Role::Doctor,
            Self::Receptionist(_) => Role::Receptionist,
        }
    }

    /// Id of the owning user.
    pub fn user_id(&self) -> UserId {
        match self {
            Self::Doctor(profile) => profile.id,
            Self::Receptionist(profile) => profile.id,
        }
    }
}

/// Outcome of a successful credential check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    principal: Principal,
    profile: StaffProfile,
}

impl AuthenticatedUser {
    /// Pair a profile with the principal derived from it.
    pub fn new(profile: StaffProfile) -> Self {
        Self {
            principal: Principal::new(profile.user_id(), profile.role()),
            profile,
        }
    }

    /// Identity to embed in the session token.
    pub fn principal(&self) -> Principal {
        self.principal
    }

    /// Profile returned to the caller.
    pub fn profile(&self) -> &StaffProfile {
        &self.profile
    }

    /// Consume and return the profile.
    pub fn into_profile(self) -> StaffProfile {
        self.profile
    }
}
