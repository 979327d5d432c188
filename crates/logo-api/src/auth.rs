//! # Admin Authentication
//!
//! A single shared admin password exchanged for an HS256 JWT.
//!
//! Tokens carry `sub = "admin"`, `iat`, `exp = iat + 12h` and a random `jti`.
//! There is no refresh and no revocation; a token is valid until it expires.

use crate::handlers::ErrorResponse;
use crate::state::AppState;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::{header, StatusCode};
use axum::Json;
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use logo_core::{constant_time_compare, LogoError, LogoResult};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

/// Token lifetime in seconds (12 hours).
pub const TOKEN_TTL_SECS: i64 = 12 * 60 * 60;

/// Subject of every admin token.
pub const ADMIN_SUBJECT: &str = "admin";

/// JWT claims embedded in every admin token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Always [`ADMIN_SUBJECT`]
    pub sub: String,
    /// Issued-at time (UTC Unix timestamp)
    pub iat: i64,
    /// Expiration time (UTC Unix timestamp)
    pub exp: i64,
    /// Unique token identifier, for log correlation
    pub jti: String,
}

/// Issues and checks admin tokens.
#[derive(Clone)]
pub struct AdminAuth {
    secret: String,
    password: String,
}

impl std::fmt::Debug for AdminAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminAuth")
            .field("secret", &"[redacted]")
            .field("password", &"[redacted]")
            .finish()
    }
}

impl AdminAuth {
    /// Create from a signing secret and the admin password. Both must be non-empty.
    pub fn new(secret: impl Into<String>, password: impl Into<String>) -> LogoResult<Self> {
        let secret = secret.into();
        let password = password.into();

        if secret.is_empty() {
            return Err(LogoError::Configuration(
                "JWT_SECRET_KEY must not be empty".to_string(),
            ));
        }
        if password.is_empty() {
            return Err(LogoError::Configuration(
                "ADMIN_PASSWORD must not be empty".to_string(),
            ));
        }

        Ok(Self { secret, password })
    }

    /// Load from environment variables
    ///
    /// | Env Var          | Required |
    /// |------------------|----------|
    /// | `JWT_SECRET_KEY` | **yes**  |
    /// | `ADMIN_PASSWORD` | **yes**  |
    pub fn from_env() -> LogoResult<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build from a variable lookup, e.g. a map in tests.
    pub fn from_vars<F>(var: F) -> LogoResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret = var("JWT_SECRET_KEY")
            .ok_or_else(|| LogoError::Configuration("JWT_SECRET_KEY not set".to_string()))?;
        let password = var("ADMIN_PASSWORD")
            .ok_or_else(|| LogoError::Configuration("ADMIN_PASSWORD not set".to_string()))?;

        Self::new(secret, password)
    }

    /// Exchange the admin password for a token.
    pub fn login(&self, password: &str) -> LogoResult<String> {
        if !constant_time_compare(password, &self.password) {
            warn!("Admin login rejected");
            return Err(LogoError::Unauthorized("Invalid password".to_string()));
        }
        self.issue_token_at(Utc::now().timestamp())
    }

    /// Sign a token issued at `now` (Unix seconds).
    pub fn issue_token_at(&self, now: i64) -> LogoResult<String> {
        let claims = Claims {
            sub: ADMIN_SUBJECT.to_string(),
            iat: now,
            exp: now + TOKEN_TTL_SECS,
            jti: Uuid::new_v4().to_string(),
        };

        debug!(jti = %claims.jti, "Issuing admin token");

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| LogoError::Internal(format!("Token signing failed: {}", e)))
    }

    /// Verify signature, expiry and subject, returning the claims.
    pub fn authorize(&self, token: &str) -> LogoResult<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);
        validation.sub = Some(ADMIN_SUBJECT.to_string());

        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|e| {
            debug!(error = %e, "Admin token rejected");
            LogoError::Unauthorized("Invalid or expired token".to_string())
        })
    }
}

/// Extractor for routes that require an admin token.
///
/// ```ignore
/// async fn orders(admin: AdminUser, State(state): State<AppState>) -> ... { }
/// ```
#[derive(Debug, Clone)]
pub struct AdminUser {
    pub claims: Claims,
}

fn unauthorized(message: &str) -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::UNAUTHORIZED,
        Json(ErrorResponse::new(message, StatusCode::UNAUTHORIZED.as_u16())),
    )
}

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = (StatusCode, Json<ErrorResponse>);

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| unauthorized("Token missing"))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                unauthorized("Invalid Authorization format. Expected: Bearer <token>")
            })?;

        let claims = state
            .auth
            .authorize(token)
            .map_err(|_| unauthorized("Invalid or expired token"))?;

        Ok(AdminUser { claims })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn auth() -> AdminAuth {
        AdminAuth::new("test-secret", "hunter2").unwrap()
    }

    #[test]
    fn test_login_issues_twelve_hour_token() {
        let auth = auth();
        let token = auth.login("hunter2").unwrap();
        let claims = auth.authorize(&token).unwrap();

        assert_eq!(claims.sub, "admin");
        assert_eq!(claims.exp - claims.iat, 43_200);
        assert!(!claims.jti.is_empty());
    }

    #[test]
    fn test_login_wrong_password() {
        let err = auth().login("wrong").unwrap_err();
        assert_eq!(err.status_code(), 401);
    }

    #[test]
    fn test_login_empty_password() {
        let err = auth().login("").unwrap_err();
        assert_eq!(err.status_code(), 401);
    }

    #[test]
    fn test_expired_token_rejected() {
        let auth = auth();
        let issued = Utc::now().timestamp() - TOKEN_TTL_SECS - 1;
        let token = auth.issue_token_at(issued).unwrap();

        assert!(auth.authorize(&token).is_err());
    }

    #[test]
    fn test_token_from_other_secret_rejected() {
        let other = AdminAuth::new("other-secret", "hunter2").unwrap();
        let token = other.login("hunter2").unwrap();

        assert!(auth().authorize(&token).is_err());
    }

    #[test]
    fn test_garbage_token_rejected() {
        assert!(auth().authorize("not.a.jwt").is_err());
        assert!(auth().authorize("").is_err());
    }

    #[test]
    fn test_empty_credentials_rejected() {
        assert!(AdminAuth::new("", "pw").is_err());
        assert!(AdminAuth::new("secret", "").is_err());
    }

    #[test]
    fn test_from_vars_requires_both_secrets() {
        let only_secret = |key: &str| (key == "JWT_SECRET_KEY").then(|| "s".to_string());
        assert!(AdminAuth::from_vars(only_secret).is_err());

        let both = |key: &str| match key {
            "JWT_SECRET_KEY" => Some("test-secret".to_string()),
            "ADMIN_PASSWORD" => Some("hunter2".to_string()),
            _ => None,
        };
        let auth = AdminAuth::from_vars(both).unwrap();
        assert!(auth.login("hunter2").is_ok());
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let rendered = format!("{:?}", auth());
        assert!(!rendered.contains("hunter2"));
        assert!(!rendered.contains("test-secret"));
    }
}
