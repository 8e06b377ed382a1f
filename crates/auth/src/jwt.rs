use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::{AuthError, Result};

/// Claims carried by a session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the authenticated username.
    pub sub: String,
    /// Expiry as a unix timestamp.
    pub exp: i64,
}

/// Issues and verifies signed session tokens.
///
/// Tokens are bearer credentials with a purely cryptographic lifecycle;
/// there is no revocation list, so a leaked token stays valid until expiry.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    algorithm: Algorithm,
    ttl: Duration,
}

impl TokenService {
    /// Build a service around a shared secret. Only the HMAC family is
    /// accepted; asymmetric algorithms do not apply to a secret-key setup.
    pub fn new(secret: &str, algorithm: Algorithm, ttl_minutes: i64) -> Result<Self> {
        match algorithm {
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => {}
            other => return Err(AuthError::UnsupportedAlgorithm(other)),
        }

        Ok(Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            algorithm,
            ttl: Duration::minutes(ttl_minutes),
        })
    }

    /// Issue a token for `subject`, expiring after the configured TTL.
    pub fn issue(&self, subject: &str) -> Result<String> {
        self.issue_with_ttl(subject, self.ttl)
    }

    pub fn issue_with_ttl(&self, subject: &str, ttl: Duration) -> Result<String> {
        let claims = Claims {
            sub: subject.to_owned(),
            exp: (Utc::now() + ttl).timestamp(),
        };

        encode(&Header::new(self.algorithm), &claims, &self.encoding)
            .map_err(|e| AuthError::TokenSigning(e.to_string()))
    }

    /// Check signature and expiry, returning the embedded claims.
    ///
    /// The token must carry the configured algorithm exactly; `none`-signed
    /// or cross-algorithm tokens never verify. Every defect (bad signature,
    /// malformed payload, missing subject, expired) collapses into
    /// `InvalidToken` so attacker-controlled input cannot panic or leak the
    /// failing check.
    pub fn verify(&self, token: &str) -> Result<Claims> {
        let mut validation = Validation::new(self.algorithm);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|_| AuthError::InvalidToken)
    }
}
