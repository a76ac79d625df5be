//! Bearer-token issuance and validation (HS256 JWT, single secret).

use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use portal_domain::user::Role;

/// Default token lifetime in seconds (24 hours).
pub const DEFAULT_TOKEN_TTL_SECS: u64 = 86_400;

/// JWT claims payload.
///
/// | Field | JWT claim | Meaning |
/// |-------|-----------|---------|
/// | `sub` | `sub` | username |
/// | `role` | custom | role wire name, e.g. `"STUDENT"` |
/// | `iat` | `iat` | issued-at, seconds since epoch |
/// | `exp` | `exp` | expiry, seconds since epoch |
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub role: String,
    pub iat: u64,
    pub exp: u64,
}

impl Claims {
    pub fn username(&self) -> &str {
        &self.sub
    }

    /// Parse the role claim. An unknown role name means the token is not one we issued.
    pub fn role(&self) -> Result<Role, InvalidToken> {
        self.role.parse().map_err(|_| InvalidToken::Malformed)
    }
}

/// Why a presented token was refused.
///
/// Callers treat every variant the same way ("no principal"); the distinction only
/// exists for debug logging and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum InvalidToken {
    #[error("invalid signature")]
    InvalidSignature,
    #[error("token expired")]
    Expired,
    #[error("malformed token")]
    Malformed,
}

/// A freshly signed token and its expiry (seconds since epoch).
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: u64,
}

/// Issues and validates signed bearer tokens.
///
/// Stateless: holds only the key pair derived from the shared secret and the validity
/// window, so one instance is shared by every request without locking.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl_secs: u64,
}

pub fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

impl TokenService {
    pub fn new(secret: &str, ttl_secs: u64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl_secs,
        }
    }

    pub fn ttl_secs(&self) -> u64 {
        self.ttl_secs
    }

    /// Sign a token for `username` valid from now for the configured window.
    pub fn issue(
        &self,
        username: &str,
        role: Role,
    ) -> Result<IssuedToken, jsonwebtoken::errors::Error> {
        self.issue_at(username, role, now_secs())
    }

    /// Sign a token whose validity window starts at `issued_at`.
    pub fn issue_at(
        &self,
        username: &str,
        role: Role,
        issued_at: u64,
    ) -> Result<IssuedToken, jsonwebtoken::errors::Error> {
        let claims = Claims {
            sub: username.to_owned(),
            role: role.as_str().to_owned(),
            iat: issued_at,
            exp: issued_at + self.ttl_secs,
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?;
        Ok(IssuedToken {
            token,
            expires_at: claims.exp,
        })
    }

    /// Verify signature and expiry against the current time.
    pub fn validate(&self, token: &str) -> Result<Claims, InvalidToken> {
        self.validate_at(token, now_secs())
    }

    /// Verify signature, then require `now < exp` with no leeway.
    pub fn validate_at(&self, token: &str, now: u64) -> Result<Claims, InvalidToken> {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is compared against `now` below so the clock stays injectable.
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        let data = decode::<Claims>(token, &self.decoding, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                    InvalidToken::InvalidSignature
                }
                ErrorKind::ExpiredSignature => InvalidToken::Expired,
                _ => InvalidToken::Malformed,
            }
        })?;

        if now >= data.claims.exp {
            return Err(InvalidToken::Expired);
        }
        Ok(data.claims)
    }

    pub fn extract_username(&self, token: &str) -> Result<String, InvalidToken> {
        self.validate(token).map(|c| c.sub)
    }

    pub fn extract_role(&self, token: &str) -> Result<Role, InvalidToken> {
        self.validate(token)?.role()
    }
}
