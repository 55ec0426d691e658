use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::auth::{AuthError, Claims, TokenVerifier};
use crate::error::ApiError;
use crate::server::AppState;

/// Authenticated caller, inserted as a request extension once the token
/// checks out.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub subject: String,
    pub username: Option<String>,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            subject: claims.sub,
            username: claims.preferred_username,
        }
    }
}

/// Bearer-token gate for the product routes. Runs before any body
/// extraction, so an unauthenticated request is turned away without
/// parsing its payload or touching the store.
pub async fn require_bearer(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(request.headers())?;
    let claims = state.verifier.verify(token)?;
    request.extensions_mut().insert(AuthUser::from(claims));
    Ok(next.run(request).await)
}

fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let header = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingToken)?;
    let value = header.to_str().map_err(|_| AuthError::MalformedHeader)?;
    let token = value
        .strip_prefix("Bearer ")
        .ok_or(AuthError::MalformedHeader)?;
    if token.trim().is_empty() {
        return Err(AuthError::EmptyToken);
    }
    Ok(token)
}
