//! Credential verification against stored user accounts.
//!
//! [`UserDirectory`] looks an account up by email in a single joined read,
//! verifies the password against the stored hash and materialises exactly
//! one role profile. It also implements the [`LoginService`] driving port,
//! which hides whether a failed login was an unknown email or a wrong
//! password.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::domain::ports::{
    DoctorProfileFields, LoginService, ReceptionistProfileFields, UserAccountRecord,
    UserPersistenceError, UserRepository,
};
use crate::domain::{
    AuthenticatedUser, CredentialHasher, DoctorProfile, Error, HashingError, LoginCredentials,
    ReceptionistProfile, Role, StaffProfile,
};

/// Failures raised by [`UserDirectory::find_by_email`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DirectoryError {
    /// No account is registered under the email.
    #[error("no user found for email")]
    NotFound,
    /// The password does not match the stored hash.
    #[error("password does not match")]
    BadCredentials,
    /// The backing store could not be reached in time.
    #[error("user directory unavailable: {message}")]
    Unavailable { message: String },
    /// Stored data violates an invariant or the lookup failed.
    #[error("user directory error: {message}")]
    Internal { message: String },
}

impl From<UserPersistenceError> for DirectoryError {
    fn from(err: UserPersistenceError) -> Self {
        match err {
            UserPersistenceError::Connection { message }
            | UserPersistenceError::Timeout { message } => Self::Unavailable { message },
            UserPersistenceError::Query { message } => Self::Internal { message },
        }
    }
}

/// User directory backed by a [`UserRepository`].
#[derive(Clone)]
pub struct UserDirectory<R> {
    repository: Arc<R>,
    hasher: CredentialHasher,
}

impl<R> UserDirectory<R> {
    /// Create a directory over `repository` using `hasher` for verification.
    pub fn new(repository: Arc<R>, hasher: CredentialHasher) -> Self {
        Self { repository, hasher }
    }
}

impl<R> UserDirectory<R>
where
    R: UserRepository,
{
    /// Verify credentials and return the user with their role profile.
    pub async fn find_by_email(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<AuthenticatedUser, DirectoryError> {
        let account = self
            .repository
            .find_account_by_email(credentials.email())
            .await?
            .ok_or(DirectoryError::NotFound)?;

        self.verify_password(&account, credentials).await?;
        materialise(account)
    }

    async fn verify_password(
        &self,
        account: &UserAccountRecord,
        credentials: &LoginCredentials,
    ) -> Result<(), DirectoryError> {
        let hasher = self.hasher.clone();
        let stored = account.password_hash.clone();
        let candidate = zeroize::Zeroizing::new(credentials.password().to_owned());

        let outcome = tokio::task::spawn_blocking(move || hasher.verify(&stored, &candidate))
            .await
            .map_err(|err| DirectoryError::Internal {
                message: format!("password verification task failed: {err}"),
            })?;

        match outcome {
            Ok(()) => Ok(()),
            Err(HashingError::Mismatch) => Err(DirectoryError::BadCredentials),
            Err(err) => Err(DirectoryError::Internal {
                message: format!("stored credential for user {} is unusable: {err}", account.id),
            }),
        }
    }
}

fn materialise(account: UserAccountRecord) -> Result<AuthenticatedUser, DirectoryError> {
    let role: Role = account.role.parse().map_err(|err| DirectoryError::Internal {
        message: format!("user {} has an invalid role: {err}", account.id),
    })?;

    let profile = match role {
        Role::Doctor => {
            let DoctorProfileFields {
                name,
                specialty,
                emergency_contact,
                license_number,
                experience_years,
                created_at,
                updated_at,
            } = account.doctor.ok_or_else(|| missing_profile(&account.email, role))?;
            StaffProfile::Doctor(DoctorProfile {
                id: account.id,
                name,
                email: account.email,
                specialty,
                emergency_contact,
                license_number,
                experience_years,
                created_at,
                updated_at,
            })
        }
        Role::Receptionist => {
            let ReceptionistProfileFields {
                name,
                phone,
                created_at,
                updated_at,
            } = account
                .receptionist
                .ok_or_else(|| missing_profile(&account.email, role))?;
            StaffProfile::Receptionist(ReceptionistProfile {
                id: account.id,
                name,
                email: account.email,
                phone,
                created_at,
                updated_at,
            })
        }
    };

    Ok(AuthenticatedUser::new(profile))
}

fn missing_profile(email: &str, role: Role) -> DirectoryError {
    DirectoryError::Internal {
        message: format!("no {role} profile row for account {email}"),
    }
}

#[async_trait]
impl<R> LoginService for UserDirectory<R>
where
    R: UserRepository,
{
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<AuthenticatedUser, Error> {
        self.find_by_email(credentials).await.map_err(|err| match err {
            DirectoryError::NotFound | DirectoryError::BadCredentials => {
                debug!(reason = %err, "login rejected");
                Error::unauthorized("invalid credentials")
            }
            DirectoryError::Unavailable { message } => {
                warn!(%message, "user directory unavailable during login");
                Error::service_unavailable("user directory unavailable")
            }
            DirectoryError::Internal { message } => Error::internal(message),
        })
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for credential verification and profile selection.
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use chrono::{TimeZone, Utc};
    use rstest::{fixture, rstest};

    use super::*;
    use crate::domain::{ErrorCode, HasherParams, Principal, UserId};

    #[derive(Clone, Copy)]
    enum StubFailure {
        Connection,
        Query,
        Timeout,
    }

    impl StubFailure {
        fn to_error(self) -> UserPersistenceError {
            match self {
                Self::Connection => UserPersistenceError::connection("database unavailable"),
                Self::Query => UserPersistenceError::query("syntax error"),
                Self::Timeout => UserPersistenceError::timeout("deadline elapsed"),
            }
        }
    }

    #[derive(Default)]
    struct StubState {
        account: Option<UserAccountRecord>,
        failure: Option<StubFailure>,
    }

    #[derive(Default)]
    struct StubUserRepository {
        state: Mutex<StubState>,
        lookups: AtomicUsize,
    }

    impl StubUserRepository {
        fn with_account(account: UserAccountRecord) -> Self {
            Self {
                state: Mutex::new(StubState {
                    account: Some(account),
                    failure: None,
                }),
                lookups: AtomicUsize::new(0),
            }
        }

        fn failing(failure: StubFailure) -> Self {
            Self {
                state: Mutex::new(StubState {
                    account: None,
                    failure: Some(failure),
                }),
                lookups: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl UserRepository for StubUserRepository {
        async fn find_account_by_email(
            &self,
            email: &str,
        ) -> Result<Option<UserAccountRecord>, UserPersistenceError> {
            self.lookups.fetch_add(1, Ordering::Relaxed);
            let state = self.state.lock().expect("state lock");
            if let Some(failure) = state.failure {
                return Err(failure.to_error());
            }
            Ok(state
                .account
                .as_ref()
                .filter(|account| account.email == email)
                .cloned())
        }
    }

    #[fixture]
    fn hasher() -> CredentialHasher {
        CredentialHasher::with_params(HasherParams {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        })
        .expect("test parameters are valid")
    }

    fn doctor_fields() -> DoctorProfileFields {
        let at = Utc
            .with_ymd_and_hms(2024, 5, 1, 8, 0, 0)
            .single()
            .expect("valid timestamp");
        DoctorProfileFields {
            name: "Dr. Meera Rao".into(),
            specialty: "Cardiology".into(),
            emergency_contact: "555-0101".into(),
            license_number: "LIC-0042".into(),
            experience_years: 12,
            created_at: at,
            updated_at: at,
        }
    }

    fn receptionist_fields() -> ReceptionistProfileFields {
        let at = Utc
            .with_ymd_and_hms(2024, 5, 1, 8, 0, 0)
            .single()
            .expect("valid timestamp");
        ReceptionistProfileFields {
            name: "Anil Kumar".into(),
            phone: "555-0100".into(),
            created_at: at,
            updated_at: at,
        }
    }

    fn account(hasher: &CredentialHasher, role: &str, password: &str) -> UserAccountRecord {
        UserAccountRecord {
            id: UserId::new(42),
            email: "staff@clinic.test".into(),
            role: role.into(),
            password_hash: hasher.hash(password).expect("hash password"),
            doctor: Some(doctor_fields()),
            receptionist: Some(receptionist_fields()),
        }
    }

    fn credentials(email: &str, password: &str) -> LoginCredentials {
        LoginCredentials::try_from_parts(email, password).expect("valid test credentials")
    }

    fn directory(
        repository: StubUserRepository,
        hasher: CredentialHasher,
    ) -> (UserDirectory<StubUserRepository>, Arc<StubUserRepository>) {
        let repository = Arc::new(repository);
        (UserDirectory::new(repository.clone(), hasher), repository)
    }

    #[rstest]
    #[tokio::test]
    async fn doctor_login_selects_the_doctor_profile(hasher: CredentialHasher) {
        let stored = account(&hasher, "doctor", "myStrongP@ssw0rd");
        let (directory, _) = directory(StubUserRepository::with_account(stored), hasher);

        let user = directory
            .find_by_email(&credentials("staff@clinic.test", "myStrongP@ssw0rd"))
            .await
            .expect("valid credentials");

        assert_eq!(user.principal(), Principal::new(UserId::new(42), Role::Doctor));
        match user.profile() {
            StaffProfile::Doctor(profile) => {
                assert_eq!(profile.specialty, "Cardiology");
                assert_eq!(profile.email, "staff@clinic.test");
            }
            other => panic!("expected doctor profile, got {other:?}"),
        }
    }

    #[rstest]
    #[tokio::test]
    async fn receptionist_login_ignores_a_populated_doctor_bag(hasher: CredentialHasher) {
        let stored = account(&hasher, "receptionist", "front-desk");
        let (directory, _) = directory(StubUserRepository::with_account(stored), hasher);

        let user = directory
            .find_by_email(&credentials("staff@clinic.test", "front-desk"))
            .await
            .expect("valid credentials");

        assert!(matches!(user.profile(), StaffProfile::Receptionist(p) if p.phone == "555-0100"));
    }

    #[rstest]
    #[tokio::test]
    async fn unknown_email_is_not_found(hasher: CredentialHasher) {
        let stored = account(&hasher, "doctor", "pw");
        let (directory, repository) = directory(StubUserRepository::with_account(stored), hasher);

        let err = directory
            .find_by_email(&credentials("nobody@clinic.test", "pw"))
            .await
            .expect_err("unknown email");

        assert_eq!(err, DirectoryError::NotFound);
        assert_eq!(repository.lookups.load(Ordering::Relaxed), 1);
    }

    #[rstest]
    #[tokio::test]
    async fn wrong_password_is_bad_credentials(hasher: CredentialHasher) {
        let stored = account(&hasher, "doctor", "correctPassword");
        let (directory, _) = directory(StubUserRepository::with_account(stored), hasher);

        let err = directory
            .find_by_email(&credentials("staff@clinic.test", "wrongPassword"))
            .await
            .expect_err("wrong password");

        assert_eq!(err, DirectoryError::BadCredentials);
    }

    #[rstest]
    #[tokio::test]
    async fn missing_role_profile_is_internal(hasher: CredentialHasher) {
        let mut stored = account(&hasher, "doctor", "pw");
        stored.doctor = None;
        let (directory, _) = directory(StubUserRepository::with_account(stored), hasher);

        let err = directory
            .find_by_email(&credentials("staff@clinic.test", "pw"))
            .await
            .expect_err("profile missing");

        assert!(matches!(err, DirectoryError::Internal { .. }));
    }

    #[rstest]
    #[tokio::test]
    async fn unknown_stored_role_is_internal(hasher: CredentialHasher) {
        let stored = account(&hasher, "admin", "pw");
        let (directory, _) = directory(StubUserRepository::with_account(stored), hasher);

        let err = directory
            .find_by_email(&credentials("staff@clinic.test", "pw"))
            .await
            .expect_err("invalid role");

        assert!(matches!(err, DirectoryError::Internal { .. }));
    }

    #[rstest]
    #[case(StubFailure::Connection, ErrorCode::ServiceUnavailable)]
    #[case(StubFailure::Timeout, ErrorCode::ServiceUnavailable)]
    #[case(StubFailure::Query, ErrorCode::InternalError)]
    #[tokio::test]
    async fn storage_failures_map_to_error_codes(
        hasher: CredentialHasher,
        #[case] failure: StubFailure,
        #[case] expected: ErrorCode,
    ) {
        let (directory, _) = directory(StubUserRepository::failing(failure), hasher);

        let err = directory
            .authenticate(&credentials("staff@clinic.test", "pw"))
            .await
            .expect_err("storage failure");

        assert_eq!(err.code(), expected);
    }

    #[rstest]
    #[tokio::test]
    async fn login_failures_are_indistinguishable(hasher: CredentialHasher) {
        let stored = account(&hasher, "doctor", "correctPassword");
        let (directory, _) = directory(StubUserRepository::with_account(stored), hasher);

        let unknown = directory
            .authenticate(&credentials("nobody@clinic.test", "correctPassword"))
            .await
            .expect_err("unknown email");
        let wrong = directory
            .authenticate(&credentials("staff@clinic.test", "wrongPassword"))
            .await
            .expect_err("wrong password");

        assert_eq!(unknown.code(), ErrorCode::Unauthorized);
        assert_eq!(unknown, wrong);
    }
}
