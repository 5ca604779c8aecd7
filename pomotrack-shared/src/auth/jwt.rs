/// Session token issue and verification
///
/// Tokens are HS256-signed JWTs carrying the user id as subject. A token is
/// self-contained: nothing is persisted server-side, and only the embedded
/// user id is trusted after verification.
///
/// # Claims
///
/// - `sub`: user id
/// - `iss`: always "pomotrack"
/// - `iat`: issued at (Unix timestamp)
/// - `exp`: expiration, issue time + 7 days
///
/// # Example
///
/// ```
/// use pomotrack_shared::auth::jwt::{issue_token, verify_token};
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let user_id = Uuid::new_v4();
/// let token = issue_token(user_id, "secret-key-at-least-32-bytes-long!")?;
/// let claims = verify_token(&token, "secret-key-at-least-32-bytes-long!")?;
/// assert_eq!(claims.sub, user_id);
/// # Ok(())
/// # }
/// ```

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Token issuer claim value
pub const ISSUER: &str = "pomotrack";

/// Token lifetime: seven days from issue
pub const TOKEN_LIFETIME_DAYS: i64 = 7;

/// Error type for token operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Failed to sign a token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Token has expired
    #[error("Token has expired")]
    Expired,

    /// Signature does not match the signing secret
    #[error("Token signature is invalid")]
    InvalidSignature,

    /// Token structure could not be decoded or a claim check failed
    #[error("Malformed token: {0}")]
    Malformed(String),
}

/// Session token claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - user id
    pub sub: Uuid,

    /// Issuer - always "pomotrack"
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Creates claims for a user with the default seven-day lifetime
    pub fn new(user_id: Uuid) -> Self {
        Self::with_lifetime(user_id, Duration::days(TOKEN_LIFETIME_DAYS))
    }

    /// Creates claims with an explicit lifetime
    ///
    /// Mainly useful in tests that need an already-expired token.
    pub fn with_lifetime(user_id: Uuid, lifetime: Duration) -> Self {
        let now = Utc::now();

        Self {
            sub: user_id,
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            exp: (now + lifetime).timestamp(),
        }
    }

    /// Checks whether the expiration timestamp has passed
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}

/// Signs claims into a token string
pub fn create_token(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    let header = Header::new(Algorithm::HS256);
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&header, claims, &key).map_err(|e| JwtError::CreateError(e.to_string()))
}

/// Issues a fresh seven-day token for a user
pub fn issue_token(user_id: Uuid, secret: &str) -> Result<String, JwtError> {
    create_token(&Claims::new(user_id), secret)
}

/// Verifies a token and returns its claims
///
/// Checks the HS256 signature, the issuer, and expiration. All verification
/// failures map to one of three cases so callers can report them uniformly:
/// `Expired`, `InvalidSignature`, or `Malformed`.
pub fn verify_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ISSUER]);
    validation.validate_exp = true;

    let data = decode::<Claims>(token, &key, &validation).map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
        jsonwebtoken::errors::ErrorKind::InvalidSignature => JwtError::InvalidSignature,
        _ => JwtError::Malformed(e.to_string()),
    })?;

    Ok(data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    #[test]
    fn test_claims_defaults() {
        let user_id = Uuid::new_v4();
        let claims = Claims::new(user_id);

        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.iss, ISSUER);
        assert!(!claims.is_expired());
        assert_eq!(claims.exp - claims.iat, TOKEN_LIFETIME_DAYS * 24 * 60 * 60);
    }

    #[test]
    fn test_issue_and_verify_roundtrip() {
        let user_id = Uuid::new_v4();
        let token = issue_token(user_id, SECRET).expect("Should create token");

        let claims = verify_token(&token, SECRET).expect("Should verify token");
        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.iss, ISSUER);
    }

    #[test]
    fn test_verify_with_wrong_secret() {
        let token = issue_token(Uuid::new_v4(), SECRET).expect("Should create token");

        let result = verify_token(&token, "a-completely-different-secret-value!!");
        assert!(matches!(result, Err(JwtError::InvalidSignature)));
    }

    #[test]
    fn test_verify_tampered_signature() {
        let token = issue_token(Uuid::new_v4(), SECRET).expect("Should create token");

        // Flip bytes in the signature segment
        let mut parts: Vec<String> = token.split('.').map(String::from).collect();
        assert_eq!(parts.len(), 3);
        parts[2] = parts[2].chars().rev().collect();
        let tampered = parts.join(".");

        assert!(verify_token(&tampered, SECRET).is_err());
    }

    #[test]
    fn test_verify_expired_token() {
        let claims = Claims::with_lifetime(Uuid::new_v4(), Duration::hours(-1));
        assert!(claims.is_expired());

        let token = create_token(&claims, SECRET).expect("Should create token");
        let result = verify_token(&token, SECRET);

        assert!(matches!(result, Err(JwtError::Expired)));
    }

    #[test]
    fn test_verify_garbage_is_malformed() {
        let result = verify_token("not-a-token-at-all", SECRET);
        assert!(matches!(result, Err(JwtError::Malformed(_))));
    }

    #[test]
    fn test_verify_foreign_issuer_rejected() {
        let now = Utc::now();
        let claims = Claims {
            sub: Uuid::new_v4(),
            iss: "someone-else".to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::days(1)).timestamp(),
        };

        let token = create_token(&claims, SECRET).expect("Should create token");
        assert!(verify_token(&token, SECRET).is_err());
    }
}
