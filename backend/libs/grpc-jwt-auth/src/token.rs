/// Token issuance and validation
///
/// Tokens are HS256 JWTs signed with a process-wide secret. The secret is
/// handed to `TokenManager::new` once at startup and never changes afterwards;
/// there is no global key storage.
///
/// ## Security Design
///
/// - **HS256 only**: the decoder refuses any other algorithm
/// - **Zero leeway**: a token is rejected the second its `exp` has passed
/// - **Stateless**: validity is proven by signature and expiry alone, no revocation list
use crate::claims::{Claims, Role};
use crate::error::AuthError;
use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use std::time::Duration;
use tracing::debug;

/// Default lifetime of an access token
pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(15 * 60);

const JWT_ALGORITHM: Algorithm = Algorithm::HS256;

#[derive(Clone)]
pub struct TokenManager {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenManager {
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        let mut validation = Validation::new(JWT_ALGORITHM);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            ttl,
        }
    }

    /// Issue a token for `username` with `role`, valid for the configured TTL
    pub fn issue(&self, username: &str, role: Role) -> Result<String, AuthError> {
        self.issue_at(username, role, Utc::now())
    }

    /// Issue a token as if the current time were `now`
    ///
    /// Tokens issued in the past come out already expired, which is how
    /// expiry handling is exercised without sleeping.
    pub fn issue_at(
        &self,
        username: &str,
        role: Role,
        now: DateTime<Utc>,
    ) -> Result<String, AuthError> {
        let iat = now.timestamp();
        let claims = Claims {
            sub: username.to_string(),
            role,
            iat,
            exp: iat + self.ttl.as_secs() as i64,
        };

        encode(&Header::new(JWT_ALGORITHM), &claims, &self.encoding)
            .map_err(|e| AuthError::Signing(e.to_string()))
    }

    /// Verify signature and expiry, returning the embedded claims
    pub fn validate(&self, token: &str) -> Result<Claims, AuthError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::InvalidToken(e.to_string()),
            }
        })?;

        debug!(username = %data.claims.sub, role = %data.claims.role, "Token validated");

        Ok(data.claims)
    }
}
