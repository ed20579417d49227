//! JWT access token verification
//!
//! Keys are derived once from the shared secret and kept behind an `Arc`.

use anyhow::Result;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// JWT claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Token type, only "access" is accepted
    pub token_type: String,
}

#[derive(Clone)]
struct JwtKeys {
    encoding: Arc<EncodingKey>,
    decoding: Arc<DecodingKey>,
}

/// Verifies bearer tokens against the shared secret
#[derive(Clone)]
pub struct JwtService {
    keys: JwtKeys,
    validation: Arc<Validation>,
}

impl JwtService {
    /// Create once at startup and store in AppState
    pub fn new(secret: &str, leeway_secs: u64) -> Self {
        let mut validation = Validation::default();
        validation.leeway = leeway_secs;

        Self {
            keys: JwtKeys {
                encoding: Arc::new(EncodingKey::from_secret(secret.as_bytes())),
                decoding: Arc::new(DecodingKey::from_secret(secret.as_bytes())),
            },
            validation: Arc::new(validation),
        }
    }

    /// Sign an access token the way the identity service does.
    /// Used by operational tooling and tests.
    pub fn issue_access_token(&self, user_id: Uuid, expiry_secs: i64) -> Result<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            exp: (now + Duration::seconds(expiry_secs)).timestamp(),
            iat: now.timestamp(),
            token_type: "access".to_string(),
        };

        encode(&Header::default(), &claims, &self.keys.encoding)
            .map_err(|e| anyhow::anyhow!("Failed to sign access token: {}", e))
    }

    /// Validate a token and return claims
    pub fn validate_token(&self, token: &str) -> Result<Claims> {
        let token_data = decode::<Claims>(token, &self.keys.decoding, &self.validation)
            .map_err(|e| anyhow::anyhow!("Invalid token: {}", e))?;

        Ok(token_data.claims)
    }

    /// Validate an access token and return its user id
    pub fn verify_access_token(&self, token: &str) -> Result<Uuid> {
        let claims = self.validate_token(token)?;
        if claims.token_type != "access" {
            return Err(anyhow::anyhow!("Not an access token"));
        }
        Uuid::parse_str(&claims.sub).map_err(|_| anyhow::anyhow!("Invalid user ID in token"))
    }
}
