//! Authentication middleware and extractor for axum.
//!
//! The middleware validates Bearer tokens through the `SessionValidator`
//! port and injects the resulting `AuthenticatedUser` into request
//! extensions; handlers read it back with the `RequireAuth` extractor.
//! Keeping the port in between means the middleware is identical whether
//! tokens come from the real identity service or a test mock.
//!
//! ```text
//! Request → auth_middleware → injects AuthenticatedUser into extensions
//!                                      ↓
//!                              Handler → RequireAuth extractor
//! ```

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

use crate::domain::foundation::{AuthError, AuthenticatedUser};
use crate::ports::SessionValidator;

/// Auth middleware state, wraps the session validator.
pub type AuthState = Arc<dyn SessionValidator>;

/// Validates Bearer tokens and injects the authenticated user.
///
/// Expects the token in the `Authorization` header with a `Bearer`
/// prefix. A missing token passes through without injecting so that
/// `RequireAuth` produces the 401; an invalid or expired token is
/// rejected here.
pub async fn auth_middleware(
    State(validator): State<AuthState>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "));

    match token {
        Some(token) => match validator.validate(token).await {
            Ok(user) => {
                request.extensions_mut().insert(user);
                next.run(request).await
            }
            Err(e) => {
                let (status, message) = match &e {
                    AuthError::TokenExpired => (StatusCode::UNAUTHORIZED, "Token expired"),
                    AuthError::InvalidToken => (StatusCode::UNAUTHORIZED, "Invalid token"),
                    AuthError::ServiceUnavailable(msg) => {
                        tracing::error!("Auth service unavailable: {}", msg);
                        (
                            StatusCode::SERVICE_UNAVAILABLE,
                            "Authentication service unavailable",
                        )
                    }
                };

                (
                    status,
                    Json(serde_json::json!({
                        "error": message,
                        "code": "AUTH_ERROR"
                    })),
                )
                    .into_response()
            }
        },
        None => next.run(request).await,
    }
}

/// Extractor that requires authentication.
///
/// Returns 401 when the auth middleware did not validate a token for
/// this request.
#[derive(Debug, Clone)]
pub struct RequireAuth(pub AuthenticatedUser);

impl<S> axum::extract::FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut axum::http::request::Parts,
        _state: &'life1 S,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self, Self::Rejection>> + Send + 'async_trait>,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            parts
                .extensions
                .get::<AuthenticatedUser>()
                .cloned()
                .map(RequireAuth)
                .ok_or(AuthRejection::Unauthenticated)
        })
    }
}

/// Rejection type for authentication failures.
#[derive(Debug, Clone)]
pub enum AuthRejection {
    Unauthenticated,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthRejection::Unauthenticated => (StatusCode::UNAUTHORIZED, "Authentication required"),
        };

        (
            status,
            Json(serde_json::json!({
                "error": message,
                "code": "UNAUTHENTICATED"
            })),
        )
            .into_response()
    }
}
