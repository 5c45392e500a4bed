use std::sync::Arc;

use chrono::Duration;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::Claims;
use super::errors::JwtError;
use crate::clock::Clock;
use crate::role::Role;
use crate::settings::ConfigurationError;
use crate::settings::TokenSettings;

/// A freshly signed token together with the claims it carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: String,
    pub claims: Claims,
}

/// JWT token handler for issuing and validating tokens.
///
/// Tokens are HS256-signed compact JWS strings. The handler keeps no record
/// of issued tokens: validity is proven by signature and expiry alone, and
/// every call is independent of every other.
pub struct JwtHandler {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    ttl: Duration,
    leeway: Duration,
    clock: Arc<dyn Clock>,
}

impl JwtHandler {
    /// Create a new JWT handler.
    ///
    /// # Arguments
    /// * `settings` - Signing secret, token lifetime and expiry leeway
    /// * `clock` - Time source for `iat`, `exp` and expiry checks
    ///
    /// # Errors
    /// * `InvalidSigningKey` - Secret shorter than 32 bytes
    /// * `InvalidTokenLifetime` - TTL or leeway out of range
    pub fn new(settings: &TokenSettings, clock: Arc<dyn Clock>) -> Result<Self, ConfigurationError> {
        settings.validate()?;

        Ok(Self {
            encoding_key: EncodingKey::from_secret(&settings.secret),
            decoding_key: DecodingKey::from_secret(&settings.secret),
            algorithm: Algorithm::HS256,
            ttl: settings.ttl,
            leeway: settings.leeway,
            clock,
        })
    }

    /// Lifetime of every token this handler issues.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issue a signed token for an identity.
    ///
    /// `iat` is the current time; `exp` is `iat + ttl`.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token encoding failed
    pub fn issue(
        &self,
        subject_id: i64,
        username: &str,
        role: Role,
    ) -> Result<IssuedToken, JwtError> {
        let claims = Claims::new(subject_id, username, role, self.clock.now(), self.ttl);
        let header = Header::new(self.algorithm);

        let token = encode(&header, &claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingFailed(e.to_string()))?;

        Ok(IssuedToken { token, claims })
    }

    /// Verify a token and return its claims.
    ///
    /// Checks structure, then signature, then expiry. Claims are decoded
    /// only after the signature has been verified.
    ///
    /// # Errors
    /// * `MalformedToken` - Wrong segment count, bad encoding or bad claim set
    /// * `SignatureMismatch` - Tampered token, foreign key or other algorithm
    /// * `TokenExpired` - Current time is at or past `exp` (plus leeway)
    pub fn extract_claims(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(self.algorithm);
        // Expiry is checked below against the injected clock.
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp", "sub"]);

        let token_data =
            decode::<Claims>(token, &self.decoding_key, &validation).map_err(map_decode_error)?;

        let claims = token_data.claims;
        if claims.is_expired(self.clock.now(), self.leeway) {
            return Err(JwtError::TokenExpired);
        }

        Ok(claims)
    }

    /// Whether a token is currently valid.
    ///
    /// Collapses every failure mode of [`extract_claims`](Self::extract_claims) into `false`.
    pub fn validate(&self, token: &str) -> bool {
        match self.extract_claims(token) {
            Ok(_) => true,
            Err(e) => {
                tracing::debug!(error = %e, "Token rejected");
                false
            }
        }
    }
}

fn map_decode_error(error: jsonwebtoken::errors::Error) -> JwtError {
    match error.kind() {
        ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => JwtError::SignatureMismatch,
        ErrorKind::ExpiredSignature => JwtError::TokenExpired,
        _ => JwtError::MalformedToken(error.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use chrono::DateTime;
    use chrono::TimeZone;
    use chrono::Utc;

    use super::*;

    const SECRET: &[u8] = b"my_secret_key_at_least_32_bytes_long!";

    struct ManualClock(Mutex<DateTime<Utc>>);

    impl ManualClock {
        fn new() -> Arc<Self> {
            let start = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
            Arc::new(Self(Mutex::new(start)))
        }

        fn advance(&self, by: Duration) {
            let mut now = self.0.lock().unwrap();
            *now += by;
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> DateTime<Utc> {
            *self.0.lock().unwrap()
        }
    }

    fn handler_with(secret: &[u8], clock: Arc<ManualClock>) -> JwtHandler {
        let settings = TokenSettings::new(secret.to_vec(), Duration::minutes(30));
        JwtHandler::new(&settings, clock).expect("Failed to build handler")
    }

    #[test]
    fn test_issue_and_extract() {
        let clock = ManualClock::new();
        let handler = handler_with(SECRET, clock.clone());

        let issued = handler
            .issue(1, "alice", Role::Officer)
            .expect("Failed to issue token");
        assert_eq!(issued.token.split('.').count(), 3);
        assert_eq!(issued.claims.exp - issued.claims.iat, 30 * 60);
        assert_eq!(issued.claims.iat, clock.now().timestamp());

        let claims = handler
            .extract_claims(&issued.token)
            .expect("Failed to extract claims");
        assert_eq!(claims, issued.claims);
        assert_eq!(claims.subject_id(), 1);
        assert_eq!(claims.username(), "alice");
        assert_eq!(claims.role(), Role::Officer);
        assert!(handler.validate(&issued.token));
    }

    #[test]
    fn test_same_instant_tokens_are_identical() {
        let handler = handler_with(SECRET, ManualClock::new());

        let first = handler.issue(1, "alice", Role::Officer).unwrap();
        let second = handler.issue(1, "alice", Role::Officer).unwrap();
        assert_eq!(first.token, second.token);
    }

    #[test]
    fn test_expired_token_rejected() {
        let clock = ManualClock::new();
        let handler = handler_with(SECRET, clock.clone());
        let issued = handler.issue(1, "alice", Role::Officer).unwrap();

        clock.advance(Duration::minutes(30) - Duration::seconds(1));
        assert!(handler.validate(&issued.token));

        clock.advance(Duration::seconds(1));
        assert!(!handler.validate(&issued.token));
        assert_eq!(
            handler.extract_claims(&issued.token),
            Err(JwtError::TokenExpired)
        );
    }

    #[test]
    fn test_leeway_extends_acceptance() {
        let clock = ManualClock::new();
        let settings = TokenSettings::new(SECRET.to_vec(), Duration::minutes(30))
            .with_leeway(Duration::seconds(10));
        let handler = JwtHandler::new(&settings, clock.clone()).unwrap();
        let issued = handler.issue(1, "alice", Role::Officer).unwrap();

        clock.advance(Duration::minutes(30) + Duration::seconds(5));
        assert!(handler.validate(&issued.token));

        clock.advance(Duration::seconds(5));
        assert_eq!(
            handler.extract_claims(&issued.token),
            Err(JwtError::TokenExpired)
        );
    }

    #[test]
    fn test_tampered_signature_rejected() {
        let handler = handler_with(SECRET, ManualClock::new());
        let issued = handler.issue(1, "alice", Role::Officer).unwrap();

        let (head, signature) = issued.token.rsplit_once('.').unwrap();
        let mut bytes = signature.as_bytes().to_vec();
        bytes[0] = if bytes[0] == b'A' { b'B' } else { b'A' };
        let tampered = format!("{}.{}", head, String::from_utf8(bytes).unwrap());

        assert!(!handler.validate(&tampered));
        assert!(handler.extract_claims(&tampered).is_err());
    }

    #[test]
    fn test_tampered_claims_rejected() {
        let handler = handler_with(SECRET, ManualClock::new());
        let issued = handler.issue(1, "alice", Role::Officer).unwrap();

        // Borrow a well-formed payload segment carrying an elevated role
        let mut claims = issued.claims.clone();
        claims.role = Role::SuperUser;
        let donor = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"attacker_key_at_least_32_bytes_long"),
        )
        .unwrap();

        let segments: Vec<&str> = issued.token.split('.').collect();
        let donor_segments: Vec<&str> = donor.split('.').collect();
        let forged = format!("{}.{}.{}", segments[0], donor_segments[1], segments[2]);

        assert_eq!(
            handler.extract_claims(&forged),
            Err(JwtError::SignatureMismatch)
        );
    }

    #[test]
    fn test_foreign_key_rejected() {
        let clock = ManualClock::new();
        let issuer = handler_with(b"secret1_at_least_32_bytes_long_key!", clock.clone());
        let validator = handler_with(b"secret2_at_least_32_bytes_long_key!", clock);

        let issued = issuer.issue(1, "alice", Role::Officer).unwrap();

        assert_eq!(
            validator.extract_claims(&issued.token),
            Err(JwtError::SignatureMismatch)
        );
    }

    #[test]
    fn test_other_algorithm_rejected() {
        let clock = ManualClock::new();
        let handler = handler_with(SECRET, clock.clone());
        let claims = Claims::new(1, "alice", Role::Officer, clock.now(), Duration::minutes(5));
        let token = encode(
            &Header::new(Algorithm::HS512),
            &claims,
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();

        assert_eq!(
            handler.extract_claims(&token),
            Err(JwtError::SignatureMismatch)
        );
    }

    #[test]
    fn test_garbage_is_malformed() {
        let handler = handler_with(SECRET, ManualClock::new());

        for garbage in ["", "invalid", "invalid.token.here", "a.b", "a.b.c.d", "...", "\u{0}"] {
            assert!(!handler.validate(garbage));
            assert!(matches!(
                handler.extract_claims(garbage),
                Err(JwtError::MalformedToken(_))
            ));
        }
    }

    #[test]
    fn test_weak_secret_rejected() {
        let settings = TokenSettings::new(b"too_short".to_vec(), Duration::minutes(5));
        let result = JwtHandler::new(&settings, ManualClock::new());
        assert!(matches!(
            result,
            Err(ConfigurationError::InvalidSigningKey(_))
        ));
    }
}
