use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Name of the cookie carrying the admin session token.
pub const SESSION_COOKIE: &str = "admin_token";

/// Claims embedded in an admin session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminClaims {
    /// The admin principal's id.
    pub sub: Uuid,
    /// The admin principal's email.
    pub email: String,
    /// Issuance time, seconds since the epoch.
    pub iat: i64,
    /// Expiry, seconds since the epoch.
    pub exp: i64,
}

/// Why a token was rejected. The HTTP layer collapses both variants into the
/// same generic 401 so responses carry no oracle.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("session token missing")]
    Missing,
    #[error("session token invalid")]
    Invalid,
}

/// Issues and verifies stateless admin session tokens (HS256 JWTs).
///
/// Tokens are never stored server-side; logout only clears the client cookie,
/// so a stolen token stays valid until natural expiry. Accepted risk of the
/// stateless design.
pub struct SessionSigner {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl SessionSigner {
    pub fn new(secret: &str, ttl_days: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::days(ttl_days),
        }
    }

    /// Issues a token for an already-authenticated admin principal. Password
    /// verification is the caller's responsibility.
    pub fn issue(&self, admin_id: Uuid, email: &str) -> Result<String, TokenError> {
        self.issue_at(admin_id, email, Utc::now())
    }

    /// Issues a token as of an explicit instant. Expiry behaviour is
    /// exercised by injecting past issuance times.
    pub fn issue_at(
        &self,
        admin_id: Uuid,
        email: &str,
        issued_at: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let claims = AdminClaims {
            sub: admin_id,
            email: email.to_string(),
            iat: issued_at.timestamp(),
            exp: (issued_at + self.ttl).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|_| TokenError::Invalid)
    }

    /// Verifies signature and expiry, returning the embedded claims.
    /// Signature is checked before any claim is trusted; expiry is enforced
    /// with zero leeway independently of signature validity.
    pub fn verify(&self, token: &str) -> Result<AdminClaims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        decode::<AdminClaims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|_| TokenError::Invalid)
    }

    /// The session lifetime in seconds, as used for the cookie Max-Age.
    pub fn ttl_seconds(&self) -> i64 {
        self.ttl.num_seconds()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signer() -> SessionSigner {
        SessionSigner::new("unit-test-signing-secret", 7)
    }

    #[test]
    fn issued_token_verifies_and_carries_claims() {
        let signer = signer();
        let id = Uuid::new_v4();
        let token = signer.issue(id, "admin@club.test").unwrap();

        let claims = signer.verify(&token).unwrap();
        assert_eq!(claims.sub, id);
        assert_eq!(claims.email, "admin@club.test");
        assert_eq!(claims.exp - claims.iat, 7 * 86400);
    }

    #[test]
    fn six_day_old_token_still_verifies() {
        let signer = signer();
        let token = signer
            .issue_at(Uuid::new_v4(), "admin@club.test", Utc::now() - Duration::days(6))
            .unwrap();
        assert!(signer.verify(&token).is_ok());
    }

    #[test]
    fn eight_day_old_token_is_expired() {
        let signer = signer();
        let token = signer
            .issue_at(Uuid::new_v4(), "admin@club.test", Utc::now() - Duration::days(8))
            .unwrap();
        assert!(matches!(signer.verify(&token), Err(TokenError::Invalid)));
    }

    #[test]
    fn any_single_character_mutation_invalidates_the_token() {
        let signer = signer();
        let token = signer.issue(Uuid::new_v4(), "admin@club.test").unwrap();

        for i in 0..token.len() {
            let mut mutated: Vec<char> = token.chars().collect();
            mutated[i] = if mutated[i] == 'x' { 'y' } else { 'x' };
            let mutated: String = mutated.into_iter().collect();
            assert!(
                signer.verify(&mutated).is_err(),
                "mutation at index {} was accepted",
                i
            );
        }
    }

    #[test]
    fn token_signed_with_another_secret_is_rejected() {
        let token = signer().issue(Uuid::new_v4(), "admin@club.test").unwrap();
        let other = SessionSigner::new("a different secret", 7);
        assert!(other.verify(&token).is_err());
    }

    #[test]
    fn garbage_tokens_are_rejected() {
        let signer = signer();
        assert!(signer.verify("").is_err());
        assert!(signer.verify("not.a.jwt").is_err());
        assert!(signer.verify("aaaa.bbbb").is_err());
    }

    #[test]
    fn ttl_matches_cookie_max_age() {
        assert_eq!(signer().ttl_seconds(), 604800);
    }
}
