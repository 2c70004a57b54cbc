// src/utils/jwt.rs

use std::time::{SystemTime, UNIX_EPOCH};

use axum::{
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::{config::Config, error::AppError};

/// Session token claims, as issued by the auth provider.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Claims {
    /// Subject - the provider's user id.
    pub sub: String,
    /// Provider role (e.g. 'authenticated', 'anon').
    pub role: String,
    /// Sign-in email, used as the post author for new drafts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Expiration time as Unix timestamp.
    pub exp: usize,
}

/// Signs a session token with the shared secret.
///
/// Sessions are normally minted by the auth provider; this exists for local
/// tooling and tests that need a token the server will accept.
pub fn sign_jwt(
    sub: &str,
    role: &str,
    email: Option<&str>,
    secret: &str,
    expiration_seconds: u64,
) -> Result<String, AppError> {
    let expiration = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| AppError::InternalServerError(e.to_string()))?
        .as_secs() as usize
        + expiration_seconds as usize;

    let claims = Claims {
        sub: sub.to_owned(),
        role: role.to_owned(),
        email: email.map(str::to_owned),
        exp: expiration,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::InternalServerError(e.to_string()))
}

/// Verifies and decodes a session token.
///
/// The audience is only checked when one is configured.
pub fn verify_jwt(token: &str, secret: &str, audience: Option<&str>) -> Result<Claims, AppError> {
    let mut validation = Validation::default();
    match audience {
        Some(aud) => validation.set_audience(&[aud]),
        None => validation.validate_aud = false,
    }

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|_| AppError::AuthError("Invalid token".to_string()))?;

    Ok(token_data.claims)
}

/// Axum Middleware: Authentication.
///
/// Validates the 'Authorization: Bearer <token>' header and injects `Claims`
/// into the request extensions. Returns 401 Unauthorized otherwise.
pub async fn auth_middleware(
    State(config): State<Config>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .ok_or_else(|| AppError::AuthError("Missing bearer token".to_string()))?;

    let claims = verify_jwt(token, &config.jwt_secret, config.jwt_audience.as_deref())?;
    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}

/// Axum Middleware: Admin Authorization.
///
/// Must run AFTER `auth_middleware`. Requires the configured admin role and,
/// when an email allowlist is configured, a listed email. 403 otherwise.
pub async fn admin_middleware(
    State(config): State<Config>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let claims = req
        .extensions()
        .get::<Claims>()
        .ok_or_else(|| AppError::AuthError("Missing session".to_string()))?;

    if !is_admin(claims, &config) {
        tracing::warn!("Rejected admin request for subject {}", claims.sub);
        return Err(AppError::Forbidden("Admin access required".to_string()));
    }

    Ok(next.run(req).await)
}

fn is_admin(claims: &Claims, config: &Config) -> bool {
    if claims.role != config.admin_role {
        return false;
    }
    if config.admin_emails.is_empty() {
        return true;
    }
    claims.email.as_deref().is_some_and(|email| {
        config
            .admin_emails
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(email))
    })
}
