//! Signed session tokens (HS256 JWT).

use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::domain::{Identity, Role};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// User id
    pub sub: String,
    pub username: String,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    #[must_use]
    pub fn new(identity: &Identity, expires_in: Duration) -> Self {
        let now = Utc::now();
        Self {
            sub: identity.id.to_string(),
            username: identity.username.clone(),
            role: identity.role,
            iat: now.timestamp(),
            exp: (now + expires_in).timestamp(),
        }
    }
}

/// Issues and verifies session tokens with one shared secret.
#[derive(Clone)]
pub struct SessionKeys {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    lifetime: Duration,
}

impl SessionKeys {
    #[must_use]
    pub fn new(secret: &str, lifetime_hours: u32) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::default(),
            lifetime: Duration::hours(i64::from(lifetime_hours)),
        }
    }

    pub fn issue(&self, identity: &Identity) -> Result<String, jsonwebtoken::errors::Error> {
        encode(
            &Header::default(),
            &Claims::new(identity, self.lifetime),
            &self.encoding_key,
        )
    }

    /// Returns the identity carried by a valid, unexpired token.
    #[must_use]
    pub fn verify(&self, token: &str) -> Option<Identity> {
        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .ok()?
            .claims;

        Some(Identity {
            id: claims.sub.parse().ok()?,
            username: claims.username,
            role: claims.role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nurse() -> Identity {
        Identity {
            id: 7,
            username: "mona".to_string(),
            role: Role::SchoolNurse,
        }
    }

    #[test]
    fn issued_token_verifies() {
        let keys = SessionKeys::new("secret", 8);
        let token = keys.issue(&nurse()).unwrap();
        assert_eq!(keys.verify(&token), Some(nurse()));
    }

    #[test]
    fn token_from_other_secret_is_rejected() {
        let token = SessionKeys::new("secret", 8).issue(&nurse()).unwrap();
        assert_eq!(SessionKeys::new("other", 8).verify(&token), None);
        assert_eq!(SessionKeys::new("secret", 8).verify("garbage"), None);
    }

    #[test]
    fn expired_token_is_rejected() {
        let keys = SessionKeys::new("secret", 8);
        let mut claims = Claims::new(&nurse(), Duration::hours(8));
        claims.iat -= 10 * 3600;
        claims.exp = Utc::now().timestamp() - 3600;
        let token = encode(&Header::default(), &claims, &keys.encoding_key).unwrap();

        assert_eq!(keys.verify(&token), None);
    }
}
