/// Identity resolution middleware
///
/// Resolves the requesting user from the `Authorization: Bearer <token>`
/// header. On success an [`AuthContext`] is inserted into request
/// extensions, read-only for the lifetime of that request; handlers extract
/// it with Axum's `Extension` extractor. Any failure (missing header, a
/// header that is not exactly `Bearer <token>`, or token verification
/// failing for any reason) terminates the request with 401 before a
/// handler runs.
///
/// # Example
///
/// ```no_run
/// use axum::{middleware, routing::get, Extension, Router};
/// use pomotrack_shared::auth::middleware::{create_auth_middleware, AuthContext};
///
/// async fn whoami(Extension(auth): Extension<AuthContext>) -> String {
///     auth.user_id.to_string()
/// }
///
/// let app: Router = Router::new()
///     .route("/whoami", get(whoami))
///     .layer(middleware::from_fn(create_auth_middleware("secret")));
/// ```

use axum::{
    extract::Request,
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use uuid::Uuid;

use super::jwt::{verify_token, Claims};

/// Resolved identity bound to a single request
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// Authenticated user id
    pub user_id: Uuid,
}

impl AuthContext {
    /// Creates the context from verified token claims
    pub fn from_claims(claims: &Claims) -> Self {
        Self {
            user_id: claims.sub,
        }
    }
}

/// Error type for identity resolution
///
/// Every variant is surfaced as 401: the caller either authenticates or it
/// does not, and the response never says which step failed in detail beyond
/// a short message.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Authorization header absent
    #[error("Missing authorization header")]
    MissingCredentials,

    /// Header present but not `Bearer <token>`
    #[error("Authorization header must be a Bearer token")]
    InvalidFormat,

    /// Token failed verification (bad signature, malformed, expired)
    #[error("Invalid token: {0}")]
    InvalidToken(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        (StatusCode::UNAUTHORIZED, self.to_string()).into_response()
    }
}

/// Resolves a user identity from request headers
///
/// Pure function over the header map and signing secret; the axum wrapper
/// below is a thin shell around this so the contract stays unit-testable.
pub fn resolve_identity(headers: &HeaderMap, secret: &str) -> Result<AuthContext, AuthError> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingCredentials)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(AuthError::InvalidFormat)?;

    if token.trim().is_empty() {
        return Err(AuthError::InvalidFormat);
    }

    let claims =
        verify_token(token, secret).map_err(|e| AuthError::InvalidToken(e.to_string()))?;

    Ok(AuthContext::from_claims(&claims))
}

/// Axum middleware performing identity resolution
pub async fn auth_middleware(
    secret: String,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let context = resolve_identity(req.headers(), &secret)?;
    req.extensions_mut().insert(context);

    Ok(next.run(req).await)
}

/// Creates an identity-resolution middleware closure capturing the secret
pub fn create_auth_middleware(
    secret: impl Into<String>,
) -> impl Fn(
    Request,
    Next,
) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<Response, AuthError>> + Send>>
       + Clone {
    let secret = secret.into();
    move |req, next| {
        let secret = secret.clone();
        Box::pin(auth_middleware(secret, req, next))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::issue_token;
    use axum::http::HeaderValue;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_str(value).unwrap(),
        );
        headers
    }

    #[test]
    fn test_resolve_identity_success() {
        let user_id = Uuid::new_v4();
        let token = issue_token(user_id, SECRET).unwrap();

        let context = resolve_identity(&headers_with(&format!("Bearer {}", token)), SECRET)
            .expect("Should resolve identity");
        assert_eq!(context.user_id, user_id);
    }

    #[test]
    fn test_resolve_identity_missing_header() {
        let result = resolve_identity(&HeaderMap::new(), SECRET);
        assert!(matches!(result, Err(AuthError::MissingCredentials)));
    }

    #[test]
    fn test_resolve_identity_not_bearer() {
        let result = resolve_identity(&headers_with("Token abc123"), SECRET);
        assert!(matches!(result, Err(AuthError::InvalidFormat)));
    }

    #[test]
    fn test_resolve_identity_empty_token() {
        let result = resolve_identity(&headers_with("Bearer "), SECRET);
        assert!(matches!(result, Err(AuthError::InvalidFormat)));
    }

    #[test]
    fn test_resolve_identity_wrong_secret() {
        let token = issue_token(Uuid::new_v4(), "another-secret-of-sufficient-length!!").unwrap();

        let result = resolve_identity(&headers_with(&format!("Bearer {}", token)), SECRET);
        assert!(matches!(result, Err(AuthError::InvalidToken(_))));
    }

    #[test]
    fn test_auth_error_into_response_is_401() {
        for err in [
            AuthError::MissingCredentials,
            AuthError::InvalidFormat,
            AuthError::InvalidToken("expired".to_string()),
        ] {
            let response = err.into_response();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        }
    }
}
