//! Authentication middleware for axum
//!
//! Protects routes with qsh-bound JWT bearer tokens.

use axum::{
    body::Body,
    extract::{Request, State},
    http::{header::AUTHORIZATION, StatusCode},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use crate::common::auth::{AuthResult, TokenVerifier};
use crate::common::config::AuthConfig;
use crate::common::hash::request_qsh;
use crate::common::Error;
use crate::server::response::send_error;

/// State for auth middleware
#[derive(Clone)]
pub struct AuthState {
    pub verifier: Arc<TokenVerifier>,
    pub config: AuthConfig,
}

impl AuthState {
    pub fn new(config: AuthConfig) -> Self {
        Self {
            verifier: Arc::new(TokenVerifier::new(config.issuers.clone())),
            config,
        }
    }
}

impl Default for AuthState {
    fn default() -> Self {
        Self::new(AuthConfig::default())
    }
}

/// Whether `path` is one of `public_paths` or lies below one of them.
/// `/ping` covers `/ping/x` but not `/pingx`.
pub fn is_public_path(path: &str, public_paths: &[String]) -> bool {
    public_paths.iter().any(|public| {
        let public = public.trim_end_matches('/');
        match path.strip_prefix(public) {
            Some(rest) => rest.is_empty() || rest.starts_with('/'),
            None => false,
        }
    })
}

/// Authentication middleware
/// Validates the Authorization header against the request's method and path
pub async fn auth_middleware(
    State(state): State<AuthState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    if !state.config.enabled {
        return next.run(request).await;
    }

    let path = request.uri().path().to_string();
    if is_public_path(&path, &state.config.public_paths) {
        return next.run(request).await;
    }

    let auth_result = match request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
    {
        Some(header) => state.verifier.authenticate(header, &request_qsh(&request)),
        None => AuthResult::Missing,
    };

    let reason = match auth_result {
        AuthResult::Ok(issuer) => {
            tracing::debug!(issuer = %issuer, path = %path, "Request authenticated");
            return next.run(request).await;
        }
        AuthResult::Missing => "Authentication required".to_string(),
        AuthResult::Invalid(msg) => msg,
        AuthResult::Expired => "Token expired".to_string(),
    };

    tracing::warn!(path = %path, reason = %reason, "Rejected unauthenticated request");
    send_error(StatusCode::UNAUTHORIZED, Some(&Error::Unauthorized(reason)))
}
