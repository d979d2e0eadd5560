//! Session Token Handler
//! Mission: Generate and validate session JWTs

use crate::auth::models::{Account, Claims};
use anyhow::{Context, Result};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use tracing::debug;

/// Issues and validates the bearer tokens that stand in for the
/// "current session user".
pub struct SessionTokens {
    secret: String,
    expiration_hours: i64,
}

impl SessionTokens {
    pub fn new(secret: String) -> Self {
        Self {
            secret,
            expiration_hours: 24, // 24-hour tokens by default
        }
    }

    /// Generate a session token for an account
    pub fn generate_token(&self, account: &Account) -> Result<(String, usize)> {
        let now = Utc::now();
        let expiration = now
            .checked_add_signed(chrono::Duration::hours(self.expiration_hours))
            .context("Invalid timestamp")?
            .timestamp() as usize;

        let expires_in = (self.expiration_hours * 3600) as usize;

        let claims = Claims {
            sub: account.id.to_string(),
            username: account.username.clone(),
            role: account.role.clone(),
            exp: expiration,
        };

        debug!(
            "Generating session token for {} ({}), expires in {}h",
            account.username, account.id, self.expiration_hours
        );

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .context("Failed to generate session token")?;

        Ok((token, expires_in))
    }

    /// Validate a token and extract claims
    pub fn validate_token(&self, token: &str) -> Result<Claims> {
        let decoded = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .context("Invalid or expired token")?;

        debug!("Validated session token for {}", decoded.claims.username);

        Ok(decoded.claims)
    }
}
