//! Bearer token authentication for the protected routes.
//!
//! Checks run in a fixed order: a usable bearer credential must be present
//! (403), a token must be configured (500), and the two must match (401).

use crate::domain::error::ApiError;
use axum::{
    body::Body,
    http::{header, Request},
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use std::task::{Context, Poll};
use tower::{Layer, Service};
use tracing::{debug, error, warn};

/// Authentication configuration
#[derive(Clone, Default)]
pub struct AuthConfig {
    /// Expected bearer token (None = every protected request answers 500)
    pub service_token: Option<String>,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("service_token", &self.service_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Authentication layer
#[derive(Clone, Debug)]
pub struct AuthLayer {
    config: Arc<AuthConfig>,
}

impl AuthLayer {
    pub fn new(config: AuthConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }
}

impl<S> Layer<S> for AuthLayer {
    type Service = AuthService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AuthService {
            inner,
            config: Arc::clone(&self.config),
        }
    }
}

/// Authentication service
#[derive(Clone, Debug)]
pub struct AuthService<S> {
    inner: S,
    config: Arc<AuthConfig>,
}

impl<S> Service<Request<Body>> for AuthService<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Response;
    type Error = S::Error;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let config = Arc::clone(&self.config);
        let mut inner = self.inner.clone();

        Box::pin(async move {
            if let Err(rejection) = authorize(&req, &config) {
                return Ok(rejection.into_response());
            }

            debug!(path = %req.uri().path(), "Request authenticated");
            inner.call(req).await
        })
    }
}

/// Run the three checks against one request.
fn authorize<B>(req: &Request<B>, config: &AuthConfig) -> Result<(), ApiError> {
    let header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());
    let token = bearer_credentials(header)?;

    let Some(expected) = config.service_token.as_deref() else {
        error!("GPU service token not configured");
        return Err(ApiError::TokenNotConfigured);
    };

    if !constant_time_compare(token, expected) {
        warn!(path = %req.uri().path(), "Invalid authentication token");
        return Err(ApiError::InvalidToken);
    }

    Ok(())
}

/// Extract the credentials from an `Authorization: Bearer <token>` value.
///
/// The scheme is matched case-insensitively.
pub fn bearer_credentials(header: Option<&str>) -> Result<&str, ApiError> {
    let (scheme, credentials) = header
        .and_then(|value| value.split_once(' '))
        .map(|(scheme, rest)| (scheme, rest.trim()))
        .ok_or(ApiError::NotAuthenticated)?;

    if scheme.is_empty() || credentials.is_empty() {
        return Err(ApiError::NotAuthenticated);
    }
    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(ApiError::InvalidCredentials);
    }

    Ok(credentials)
}

/// Constant-time string comparison.
///
/// Takes the same time however many leading bytes match. Uses
/// `subtle::ConstantTimeEq`; lengths are compared in constant time too.
pub fn constant_time_compare(a: &str, b: &str) -> bool {
    use subtle::ConstantTimeEq;

    let max_len = std::cmp::max(a.len(), b.len());

    // Different pad bytes so unequal lengths never compare equal
    let mut a_padded = vec![0u8; max_len];
    let mut b_padded = vec![0xFFu8; max_len];

    a_padded[..a.len()].copy_from_slice(a.as_bytes());
    b_padded[..b.len()].copy_from_slice(b.as_bytes());

    let lengths_equal = a.len().ct_eq(&b.len());
    let contents_equal = a_padded.ct_eq(&b_padded);

    (lengths_equal & contents_equal).into()
}
