//! JWT token service implementation.

use chrono::{TimeDelta, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use agora_core::domain::Role;
use agora_core::ports::{AccessClaims, AuthError, RefreshClaims, TokenService};

/// JWT token service configuration. Access and refresh tokens are signed
/// with distinct secrets so one kind never verifies as the other.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub access_secret: String,
    pub refresh_secret: String,
    pub access_expiry_minutes: i64,
    pub refresh_expiry_days: i64,
    pub issuer: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            access_secret: "change-me-in-production".to_string(),
            refresh_secret: "change-me-too-in-production".to_string(),
            access_expiry_minutes: 60,
            refresh_expiry_days: 30,
            issuer: "agora-api".to_string(),
        }
    }
}

/// Internal access-token claims structure for serialization.
#[derive(Debug, Serialize, Deserialize)]
struct AccessTokenClaims {
    sub: String, // user_id
    role: Role,
    exp: i64,    // expiration timestamp
    iat: i64,    // issued at
    iss: String, // issuer
}

/// Internal refresh-token claims structure for serialization.
#[derive(Debug, Serialize, Deserialize)]
struct RefreshTokenClaims {
    sub: String,
    exp: i64,
    iat: i64,
    iss: String,
}

/// JWT-based token service.
pub struct JwtTokenService {
    access_encoding: EncodingKey,
    access_decoding: DecodingKey,
    refresh_encoding: EncodingKey,
    refresh_decoding: DecodingKey,
    config: JwtConfig,
}

impl JwtTokenService {
    pub fn new(config: JwtConfig) -> Self {
        let access_encoding = EncodingKey::from_secret(config.access_secret.as_bytes());
        let access_decoding = DecodingKey::from_secret(config.access_secret.as_bytes());
        let refresh_encoding = EncodingKey::from_secret(config.refresh_secret.as_bytes());
        let refresh_decoding = DecodingKey::from_secret(config.refresh_secret.as_bytes());

        Self {
            access_encoding,
            access_decoding,
            refresh_encoding,
            refresh_decoding,
            config,
        }
    }

    pub fn from_env() -> Self {
        let defaults = JwtConfig::default();

        let access_secret =
            std::env::var("JWT_SECRET").unwrap_or_else(|_| defaults.access_secret.clone());
        let refresh_secret = std::env::var("REFRESH_TOKEN_SECRET")
            .unwrap_or_else(|_| defaults.refresh_secret.clone());

        if access_secret == defaults.access_secret || refresh_secret == defaults.refresh_secret {
            tracing::warn!(
                "Using default JWT secrets. Set JWT_SECRET and REFRESH_TOKEN_SECRET for production use."
            );
        }

        let config = JwtConfig {
            access_secret,
            refresh_secret,
            access_expiry_minutes: std::env::var("JWT_ACCESS_EXPIRY_MINUTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.access_expiry_minutes),
            refresh_expiry_days: std::env::var("REFRESH_TOKEN_EXPIRY_DAYS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.refresh_expiry_days),
            issuer: std::env::var("JWT_ISSUER").unwrap_or(defaults.issuer),
        };
        Self::new(config)
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::default();
        validation.set_issuer(&[&self.config.issuer]);
        validation
    }
}

fn map_decode_error(e: jsonwebtoken::errors::Error) -> AuthError {
    match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
        _ => AuthError::InvalidToken(e.to_string()),
    }
}

impl TokenService for JwtTokenService {
    fn mint_access_token(&self, user_id: Uuid, role: Role) -> Result<String, AuthError> {
        let now = Utc::now();
        let exp = now + TimeDelta::minutes(self.config.access_expiry_minutes);

        let claims = AccessTokenClaims {
            sub: user_id.to_string(),
            role,
            exp: exp.timestamp(),
            iat: now.timestamp(),
            iss: self.config.issuer.clone(),
        };

        encode(&Header::default(), &claims, &self.access_encoding)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))
    }

    fn mint_refresh_token(&self, user_id: Uuid) -> Result<String, AuthError> {
        let now = Utc::now();
        let exp = now + TimeDelta::days(self.config.refresh_expiry_days);

        let claims = RefreshTokenClaims {
            sub: user_id.to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
            iss: self.config.issuer.clone(),
        };

        encode(&Header::default(), &claims, &self.refresh_encoding)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))
    }

    fn verify_access_token(&self, token: &str) -> Result<AccessClaims, AuthError> {
        let token_data = decode::<AccessTokenClaims>(token, &self.access_decoding, &self.validation())
            .map_err(map_decode_error)?;

        let user_id = Uuid::parse_str(&token_data.claims.sub)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))?;

        Ok(AccessClaims {
            user_id,
            role: token_data.claims.role,
            exp: token_data.claims.exp,
        })
    }

    fn verify_refresh_token(&self, token: &str) -> Result<RefreshClaims, AuthError> {
        let token_data =
            decode::<RefreshTokenClaims>(token, &self.refresh_decoding, &self.validation())
                .map_err(map_decode_error)?;

        let user_id = Uuid::parse_str(&token_data.claims.sub)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))?;

        Ok(RefreshClaims {
            user_id,
            exp: token_data.claims.exp,
        })
    }
}
