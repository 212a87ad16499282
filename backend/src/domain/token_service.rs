//! Signed, time-bounded session tokens.
//!
//! Tokens are compact HS256 JWTs carrying `{user_id, role, iat, exp}`.
//! Validity is a pure function of the signature and the embedded timestamps;
//! there is no server-side session state and no revocation.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use super::{Principal, Role, UserId};

/// Lifetime of every issued session token.
pub const SESSION_TTL: Duration = Duration::hours(24);

/// Process-wide HMAC secret used to sign session tokens.
///
/// Built once at startup from configuration and shared by reference. This
/// wrapper zeroes its own bytes on drop and never renders them through
/// `Debug`. [`TokenService::new`] derives `jsonwebtoken` keys that hold their
/// own copies of the secret, and those copies are not zeroed.
pub struct SigningKey(Zeroizing<Vec<u8>>);

impl SigningKey {
    /// Wrap raw secret bytes.
    pub fn new(secret: Vec<u8>) -> Self {
        Self(Zeroizing::new(secret))
    }

    /// Number of secret bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the secret is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn bytes(&self) -> &[u8] {
        self.0.as_slice()
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningKey")
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}

/// Opaque signed session token handed to clients.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    /// Compact token string for the transport carrier.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(<redacted>)")
    }
}

/// Verified claims extracted from a session token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionClaims {
    /// Identity the token was issued to.
    pub principal: Principal,
    /// Issue time.
    pub issued_at: DateTime<Utc>,
    /// Expiry time; the token is rejected strictly after this instant.
    pub expires_at: DateTime<Utc>,
}

/// Failures raised while issuing or verifying tokens.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    /// The token is not a well-formed compact JWT with the expected claims.
    #[error("session token is malformed")]
    Malformed,
    /// The signature does not match the claim bytes under the active key.
    #[error("session token signature is invalid")]
    BadSignature,
    /// The token expired.
    #[error("session token has expired")]
    Expired,
    /// Encoding the token failed.
    #[error("failed to sign session token: {message}")]
    Signing { message: String },
}

#[derive(Debug, Serialize, Deserialize)]
struct WireClaims {
    user_id: i32,
    role: String,
    exp: i64,
    iat: i64,
}

/// Issues and verifies session tokens.
///
/// # Examples
/// ```
/// use std::sync::Arc;
///
/// use backend::domain::{Principal, Role, SigningKey, TokenService, UserId};
/// use mockable::DefaultClock;
///
/// let key = Arc::new(SigningKey::new(b"an example secret of enough length!!".to_vec()));
/// let tokens = TokenService::new(&key, Arc::new(DefaultClock));
/// let principal = Principal::new(UserId::new(42), Role::Doctor);
/// let token = tokens.issue(&principal).unwrap();
/// let claims = tokens.verify(token.as_str()).unwrap();
/// assert_eq!(claims.principal, principal);
/// ```
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    clock: Arc<dyn Clock>,
}

impl TokenService {
    /// Build a token service from the process signing key and a clock.
    ///
    /// The encoding and decoding keys copy the secret bytes. Those copies live
    /// as long as the service and are not zeroed on drop.
    pub fn new(key: &SigningKey, clock: Arc<dyn Clock>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked against the injected clock below.
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "iat"]);
        Self {
            encoding: EncodingKey::from_secret(key.bytes()),
            decoding: DecodingKey::from_secret(key.bytes()),
            validation,
            clock,
        }
    }

    /// Issue a token for `principal`, valid for [`SESSION_TTL`].
    pub fn issue(&self, principal: &Principal) -> Result<SessionToken, TokenError> {
        let issued_at = self.clock.utc();
        let expires_at = issued_at + SESSION_TTL;
        let claims = WireClaims {
            user_id: principal.user_id().get(),
            role: principal.role().as_str().to_owned(),
            exp: expires_at.timestamp(),
            iat: issued_at.timestamp(),
        };
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map(SessionToken)
            .map_err(|err| TokenError::Signing {
                message: err.to_string(),
            })
    }

    /// Verify `token` and return its claims.
    pub fn verify(&self, token: &str) -> Result<SessionClaims, TokenError> {
        let data = jsonwebtoken::decode::<WireClaims>(token, &self.decoding, &self.validation)
            .map_err(|err| match err.kind() {
                ErrorKind::InvalidSignature => TokenError::BadSignature,
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Malformed,
            })?;
        let WireClaims {
            user_id,
            role,
            exp,
            iat,
        } = data.claims;

        let role: Role = role.parse().map_err(|_| TokenError::Malformed)?;
        let issued_at = DateTime::from_timestamp(iat, 0).ok_or(TokenError::Malformed)?;
        let expires_at = DateTime::from_timestamp(exp, 0).ok_or(TokenError::Malformed)?;
        if iat < 0 || issued_at > expires_at {
            return Err(TokenError::Malformed);
        }
        if self.clock.utc() > expires_at {
            return Err(TokenError::Expired);
        }

        Ok(SessionClaims {
            principal: Principal::new(UserId::new(user_id), role),
            issued_at,
            expires_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use mockable::MockClock;
    use rstest::{fixture, rstest};
    use std::sync::Mutex;

    fn clock_at(now: DateTime<Utc>) -> MockClock {
        let mut clock = MockClock::new();
        clock.expect_utc().return_const(now);
        clock
    }

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0)
            .single()
            .expect("valid fixture timestamp")
    }

    #[fixture]
    fn key() -> SigningKey {
        SigningKey::new(b"0123456789abcdef0123456789abcdef".to_vec())
    }

    fn service(key: &SigningKey, clock: MockClock) -> TokenService {
        TokenService::new(key, Arc::new(clock))
    }

    #[rstest]
    #[case(Principal::new(UserId::new(42), Role::Doctor))]
    #[case(Principal::new(UserId::new(1), Role::Receptionist))]
    #[case(Principal::new(UserId::new(i32::MAX), Role::Doctor))]
    fn issued_tokens_verify_to_the_same_principal(key: SigningKey, #[case] principal: Principal) {
        let tokens = service(&key, clock_at(start()));

        let token = tokens.issue(&principal).expect("issue token");
        let claims = tokens.verify(token.as_str()).expect("verify token");

        assert_eq!(claims.principal, principal);
        assert_eq!(claims.issued_at, start());
        assert_eq!(claims.expires_at - claims.issued_at, SESSION_TTL);
    }

    #[rstest]
    fn token_is_valid_up_to_and_including_expiry(key: SigningKey) {
        let now = Arc::new(Mutex::new(start()));
        let mut clock = MockClock::new();
        let reading = Arc::clone(&now);
        clock
            .expect_utc()
            .returning(move || *reading.lock().expect("clock lock"));
        let tokens = service(&key, clock);
        let token = tokens
            .issue(&Principal::new(UserId::new(3), Role::Doctor))
            .expect("issue token");

        *now.lock().expect("clock lock") += SESSION_TTL;
        assert!(tokens.verify(token.as_str()).is_ok());

        *now.lock().expect("clock lock") += Duration::seconds(1);
        assert_eq!(tokens.verify(token.as_str()), Err(TokenError::Expired));
    }

    #[rstest]
    fn tokens_signed_with_another_key_are_rejected(key: SigningKey) {
        let other = SigningKey::new(b"a completely different secret value".to_vec());
        let issuer = service(&other, clock_at(start()));
        let verifier = service(&key, clock_at(start()));

        let token = issuer
            .issue(&Principal::new(UserId::new(99), Role::Receptionist))
            .expect("issue token");

        assert_eq!(
            verifier.verify(token.as_str()),
            Err(TokenError::BadSignature)
        );
    }

    #[rstest]
    #[case("")]
    #[case("this.is.not.a.valid.token")]
    #[case("garbage")]
    fn malformed_tokens_are_rejected(key: SigningKey, #[case] token: &str) {
        let tokens = service(&key, clock_at(start()));
        assert_eq!(tokens.verify(token), Err(TokenError::Malformed));
    }

    fn sign_raw(key: &SigningKey, claims: &serde_json::Value) -> String {
        jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(key.bytes()),
        )
        .expect("encode raw claims")
    }

    #[rstest]
    fn unknown_roles_are_malformed(key: SigningKey) {
        let tokens = service(&key, clock_at(start()));
        let token = sign_raw(
            &key,
            &serde_json::json!({
                "user_id": 99,
                "role": "admin",
                "iat": start().timestamp(),
                "exp": (start() + Duration::hours(1)).timestamp(),
            }),
        );
        assert_eq!(tokens.verify(&token), Err(TokenError::Malformed));
    }

    #[rstest]
    fn issued_after_expiry_is_malformed(key: SigningKey) {
        let tokens = service(&key, clock_at(start()));
        let token = sign_raw(
            &key,
            &serde_json::json!({
                "user_id": 5,
                "role": "doctor",
                "iat": (start() + Duration::hours(2)).timestamp(),
                "exp": (start() + Duration::hours(1)).timestamp(),
            }),
        );
        assert_eq!(tokens.verify(&token), Err(TokenError::Malformed));
    }

    #[rstest]
    fn extra_claims_are_ignored(key: SigningKey) {
        let tokens = service(&key, clock_at(start()));
        let token = sign_raw(
            &key,
            &serde_json::json!({
                "user_id": 5,
                "role": "doctor",
                "iat": start().timestamp(),
                "exp": (start() + Duration::hours(1)).timestamp(),
                "admin": true,
            }),
        );
        let claims = tokens.verify(&token).expect("extra claims are inert");
        assert_eq!(claims.principal, Principal::new(UserId::new(5), Role::Doctor));
    }

    #[rstest]
    fn missing_expiry_is_malformed(key: SigningKey) {
        let tokens = service(&key, clock_at(start()));
        let token = sign_raw(
            &key,
            &serde_json::json!({ "user_id": 5, "role": "doctor", "iat": start().timestamp() }),
        );
        assert_eq!(tokens.verify(&token), Err(TokenError::Malformed));
    }

    #[rstest]
    fn signing_key_debug_hides_bytes(key: SigningKey) {
        let rendered = format!("{key:?}");
        assert!(!rendered.contains("0123456789"));
    }
}
