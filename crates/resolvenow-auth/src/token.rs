// SPDX-FileCopyrightText: 2026 ResolveNow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HS256 bearer tokens.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use resolvenow_config::model::AuthConfig;
use resolvenow_core::{ResolveError, Role};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

/// Claims carried by every token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: String,
    /// Role at issue time. Informational; the gate re-reads the user.
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}

/// Longest lifetime honoured, roughly ten years.
const MAX_TTL_HOURS: u64 = 24 * 365 * 10;

/// Signs and verifies tokens with one shared secret.
pub struct TokenIssuer {
    secret: SecretString,
    ttl: Duration,
}

impl TokenIssuer {
    pub fn new(secret: SecretString, ttl_hours: u64) -> Self {
        Self {
            secret,
            ttl: Duration::hours(ttl_hours.min(MAX_TTL_HOURS) as i64),
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(
            SecretString::from(config.jwt_secret.clone()),
            config.token_ttl_hours,
        )
    }

    /// Issue a token for `user_id` valid from now for the configured TTL.
    pub fn issue(&self, user_id: &str, role: Role) -> Result<String, ResolveError> {
        self.issue_at(user_id, role, Utc::now())
    }

    pub(crate) fn issue_at(
        &self,
        user_id: &str,
        role: Role,
        now: DateTime<Utc>,
    ) -> Result<String, ResolveError> {
        let claims = Claims {
            sub: user_id.to_string(),
            role,
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret.expose_secret().as_bytes()),
        )
        .map_err(|e| ResolveError::Internal(format!("token signing failed: {e}")))
    }

    /// Check signature and expiry.
    pub fn verify(&self, token: &str) -> Result<Claims, ResolveError> {
        let validation = Validation::new(Algorithm::HS256);
        jsonwebtoken::decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.expose_secret().as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|e| {
            use jsonwebtoken::errors::ErrorKind;
            let reason = match e.kind() {
                ErrorKind::ExpiredSignature => "token expired",
                ErrorKind::InvalidSignature => "invalid token signature",
                _ => "invalid token",
            };
            ResolveError::Unauthenticated(reason.to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issuer(secret: &str) -> TokenIssuer {
        TokenIssuer::new(SecretString::from(secret.to_string()), 168)
    }

    const SECRET: &str = "test-secret-that-is-at-least-32-bytes!";

    #[test]
    fn issued_token_verifies() {
        let tokens = issuer(SECRET);
        let token = tokens.issue("user-1", Role::Agent).unwrap();
        let claims = tokens.verify(&token).unwrap();
        assert_eq!(claims.sub, "user-1");
        assert_eq!(claims.role, Role::Agent);
        assert_eq!(claims.exp - claims.iat, 168 * 3600);
    }

    #[test]
    fn other_secret_is_rejected() {
        let token = issuer(SECRET).issue("user-1", Role::User).unwrap();
        let err = issuer("another-secret-that-is-also-32-bytes!!")
            .verify(&token)
            .unwrap_err();
        assert!(matches!(err, ResolveError::Unauthenticated(ref m) if m.contains("signature")));
    }

    #[test]
    fn expired_token_is_rejected() {
        let tokens = issuer(SECRET);
        let long_ago = Utc::now() - Duration::days(30);
        let token = tokens.issue_at("user-1", Role::User, long_ago).unwrap();
        let err = tokens.verify(&token).unwrap_err();
        assert!(matches!(err, ResolveError::Unauthenticated(ref m) if m == "token expired"));
    }

    #[test]
    fn garbage_is_rejected() {
        let err = issuer(SECRET).verify("not.a.token").unwrap_err();
        assert!(matches!(err, ResolveError::Unauthenticated(_)));
    }
}
