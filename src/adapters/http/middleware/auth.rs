//! Authentication middleware and extractors for axum.
//!
//! This module provides:
//! - `auth_middleware` - Layer that verifies the bearer token and injects the `Principal`
//! - `RequireAuth` - Extractor that requires an authenticated principal
//! - `RequireAdmin` - Extractor that additionally requires the admin role
//!
//! # Architecture
//!
//! The middleware uses the `TokenIssuer` port, so it never touches storage:
//! a token is trusted for its whole lifetime once its signature verifies.
//!
//! ```text
//! Request → auth_middleware → injects Principal into extensions
//!                                      ↓
//!                              Handler → RequireAuth / RequireAdmin read it
//! ```
//!
//! # Token Extraction
//!
//! The `token` query parameter wins over the header, so links opened in a
//! browser tab (document downloads, CSV export) can authenticate:
//! ```text
//! GET /admin/csv/users?token=<token>
//! Authorization: Bearer <token>
//! ```

use std::sync::Arc;

use axum::{
    extract::{Query, Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use crate::adapters::http::error::ApiError;
use crate::domain::foundation::{AuthError, Principal};
use crate::ports::TokenIssuer;

/// Auth middleware state - wraps the token issuer.
pub type AuthState = Arc<dyn TokenIssuer>;

#[derive(Debug, Deserialize)]
struct TokenParam {
    token: Option<String>,
}

/// Reads the token from `?token=` first, then from `Authorization: Bearer`.
fn request_token(request: &Request) -> Option<String> {
    let from_query = Query::<TokenParam>::try_from_uri(request.uri())
        .ok()
        .and_then(|Query(param)| param.token)
        .filter(|t| !t.is_empty());

    from_query.or_else(|| {
        request
            .headers()
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(|h| h.strip_prefix("Bearer "))
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
    })
}

/// Authentication middleware that verifies bearer tokens.
///
/// 1. No token: continues without a principal; `RequireAuth` rejects later
///    with `authorization-header-missing`.
/// 2. Token verifies: injects the `Principal` into request extensions.
/// 3. Token fails: answers `token-invalid` or `token-expired` at once.
pub async fn auth_middleware(
    State(issuer): State<AuthState>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(token) = request_token(&request) else {
        return next.run(request).await;
    };

    match issuer.verify(&token) {
        Ok(principal) => {
            request.extensions_mut().insert(principal);
            next.run(request).await
        }
        Err(e) => {
            tracing::debug!(error = %e, "Bearer token rejected");
            ApiError::from(e).into_response()
        }
    }
}

/// Extractor that requires authentication.
///
/// # Example
///
/// ```ignore
/// async fn me(RequireAuth(principal): RequireAuth) -> impl IntoResponse {
///     principal.account_id.to_string()
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct RequireAuth(pub Principal);

impl<S> axum::extract::FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = ApiError;

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
                .get::<Principal>()
                .copied()
                .map(RequireAuth)
                .ok_or_else(|| ApiError::from(AuthError::HeaderMissing))
        })
    }
}

/// Extractor for admin-only routes.
///
/// Rejects a member principal with `not-admin`.
#[derive(Debug, Clone, Copy)]
pub struct RequireAdmin(pub Principal);

impl<S> axum::extract::FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = ApiError;

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
            let principal = parts
                .extensions
                .get::<Principal>()
                .copied()
                .ok_or_else(|| ApiError::from(AuthError::HeaderMissing))?;

            principal.require_admin().map_err(|e| {
                tracing::warn!(account_id = %principal.account_id, "Admin route refused");
                ApiError::from(e)
            })?;

            Ok(RequireAdmin(principal))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::auth::JwtTokenIssuer;
    use crate::domain::foundation::{AccountId, Role};
    use axum::{
        body::{to_bytes, Body},
        http::StatusCode,
        middleware,
        routing::get,
        Router,
    };
    use secrecy::SecretString;
    use tower::ServiceExt;

    fn issuer() -> Arc<JwtTokenIssuer> {
        Arc::new(JwtTokenIssuer::new(
            &SecretString::new("middleware-test-secret-middleware".to_string()),
            14,
        ))
    }

    async fn whoami(RequireAuth(principal): RequireAuth) -> String {
        principal.account_id.to_string()
    }

    async fn admin_only(RequireAdmin(_): RequireAdmin) -> &'static str {
        "ok"
    }

    fn app(issuer: Arc<JwtTokenIssuer>) -> Router {
        let state: AuthState = issuer;
        Router::new()
            .route("/me", get(whoami))
            .route("/admin", get(admin_only))
            .layer(middleware::from_fn_with_state(state, auth_middleware))
    }

    fn token_for(issuer: &JwtTokenIssuer, role: Role) -> (Principal, String) {
        let principal = Principal::new(AccountId::new(), role);
        (principal, issuer.issue(&principal).unwrap().token)
    }

    async fn send(app: Router, request: axum::http::Request<Body>) -> (StatusCode, String) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    fn get_request(uri: &str, bearer: Option<&str>) -> axum::http::Request<Body> {
        let mut builder = axum::http::Request::builder().uri(uri);
        if let Some(token) = bearer {
            builder = builder.header(AUTHORIZATION, format!("Bearer {}", token));
        }
        builder.body(Body::empty()).unwrap()
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Token Extraction
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn bearer_header_authenticates() {
        let issuer = issuer();
        let (principal, token) = token_for(&issuer, Role::Member);
        let (status, body) = send(app(issuer), get_request("/me", Some(&token))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, principal.account_id.to_string());
    }

    #[tokio::test]
    async fn query_parameter_authenticates() {
        let issuer = issuer();
        let (principal, token) = token_for(&issuer, Role::Member);
        let uri = format!("/me?token={}", token);
        let (status, body) = send(app(issuer), get_request(&uri, None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, principal.account_id.to_string());
    }

    #[tokio::test]
    async fn query_parameter_wins_over_header() {
        let issuer = issuer();
        let (principal, token) = token_for(&issuer, Role::Member);
        let uri = format!("/me?token={}", token);
        let (status, body) = send(app(issuer), get_request(&uri, Some("garbage"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, principal.account_id.to_string());
    }

    #[tokio::test]
    async fn missing_token_is_header_missing() {
        let (status, body) = send(app(issuer()), get_request("/me", None)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.contains("authorization-header-missing"));
    }

    #[tokio::test]
    async fn garbage_token_is_invalid() {
        let (status, body) = send(app(issuer()), get_request("/me", Some("nope"))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body.contains("token-invalid"));
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Admin Gate
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn member_is_not_admin() {
        let issuer = issuer();
        let (_, token) = token_for(&issuer, Role::Member);
        let (status, body) = send(app(issuer), get_request("/admin", Some(&token))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body.contains("not-admin"));
    }

    #[tokio::test]
    async fn admin_passes() {
        let issuer = issuer();
        let (_, token) = token_for(&issuer, Role::Admin);
        let (status, body) = send(app(issuer), get_request("/admin", Some(&token))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "ok");
    }
}
