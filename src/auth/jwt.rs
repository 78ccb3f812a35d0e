use std::time::Duration;

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;
use time::OffsetDateTime;
use tracing::debug;
use uuid::Uuid;

use super::claims::Claims;
use crate::config::{ConfigError, JwtConfig, MAX_TTL_MINUTES};

const ALGORITHM: Algorithm = Algorithm::HS256;

#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("Invalid token. Please log in again.")]
    Invalid,
    #[error("Your token has expired. Please log in again.")]
    Expired,
}

/// Identity carried by a verified token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerifiedToken {
    pub subject: Uuid,
    pub issued_at: OffsetDateTime,
}

/// Signs and verifies HS256 tokens with the process-wide secret.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl JwtKeys {
    pub fn new(cfg: &JwtConfig) -> Result<Self, ConfigError> {
        if cfg.secret.is_empty() {
            return Err(ConfigError::Missing("JWT_SECRET"));
        }
        if !(1..=MAX_TTL_MINUTES).contains(&cfg.ttl_minutes) {
            return Err(ConfigError::Invalid {
                var: "JWT_TTL_MINUTES",
                value: cfg.ttl_minutes.to_string(),
            });
        }
        Ok(Self {
            encoding: EncodingKey::from_secret(cfg.secret.as_bytes()),
            decoding: DecodingKey::from_secret(cfg.secret.as_bytes()),
            ttl: cfg.ttl(),
        })
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn sign(&self, user_id: Uuid) -> anyhow::Result<String> {
        self.sign_at(user_id, OffsetDateTime::now_utc())
    }

    pub fn sign_at(&self, user_id: Uuid, now: OffsetDateTime) -> anyhow::Result<String> {
        let claims = Claims {
            sub: user_id,
            iat: now.unix_timestamp(),
            exp: now.unix_timestamp() + self.ttl.as_secs() as i64,
        };
        let token = encode(&Header::new(ALGORITHM), &claims, &self.encoding)?;
        debug!(user_id = %user_id, "jwt signed");
        Ok(token)
    }

    pub fn verify(&self, token: &str) -> Result<VerifiedToken, TokenError> {
        self.verify_at(token, OffsetDateTime::now_utc())
    }

    /// Checks the signature, then expiry against `now`. A token stops being
    /// valid at the exact second `exp` is reached.
    pub fn verify_at(&self, token: &str, now: OffsetDateTime) -> Result<VerifiedToken, TokenError> {
        let mut validation = Validation::new(ALGORITHM);
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "iat", "sub"]);

        let data = decode::<Claims>(token, &self.decoding, &validation).map_err(|e| {
            debug!(error = %e, "jwt rejected");
            TokenError::Invalid
        })?;
        let claims = data.claims;

        if now.unix_timestamp() >= claims.exp {
            return Err(TokenError::Expired);
        }
        let issued_at =
            OffsetDateTime::from_unix_timestamp(claims.iat).map_err(|_| TokenError::Invalid)?;

        debug!(user_id = %claims.sub, "jwt verified");
        Ok(VerifiedToken { subject: claims.sub, issued_at })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_keys(secret: &str) -> JwtKeys {
        JwtKeys::new(&JwtConfig { secret: secret.into(), ttl_minutes: 60 }).expect("keys")
    }

    #[test]
    fn empty_secret_is_a_configuration_error() {
        let err = JwtKeys::new(&JwtConfig { secret: String::new(), ttl_minutes: 60 })
            .err()
            .expect("must fail");
        assert_eq!(err, ConfigError::Missing("JWT_SECRET"));
    }

    #[test]
    fn out_of_range_ttl_is_a_configuration_error() {
        for ttl_minutes in [0, -5, MAX_TTL_MINUTES + 1, i64::MAX] {
            let err = JwtKeys::new(&JwtConfig { secret: "s".into(), ttl_minutes })
                .err()
                .expect("must fail");
            assert!(matches!(err, ConfigError::Invalid { var: "JWT_TTL_MINUTES", .. }));
        }
    }

    #[test]
    fn sign_and_verify_token() {
        let keys = make_keys("dev-secret");
        let user_id = Uuid::new_v4();
        let now = OffsetDateTime::now_utc();
        let token = keys.sign_at(user_id, now).expect("sign");
        let verified = keys.verify_at(&token, now).expect("verify");
        assert_eq!(verified.subject, user_id);
        assert_eq!(verified.issued_at.unix_timestamp(), now.unix_timestamp());
    }

    #[test]
    fn token_expires_exactly_one_hour_after_issue() {
        let keys = make_keys("dev-secret");
        let issued = OffsetDateTime::now_utc();
        let token = keys.sign_at(Uuid::new_v4(), issued).unwrap();

        let just_before = issued + time::Duration::seconds(3599);
        assert!(keys.verify_at(&token, just_before).is_ok());

        let at_expiry = issued + time::Duration::hours(1);
        assert_eq!(keys.verify_at(&token, at_expiry), Err(TokenError::Expired));
    }

    #[test]
    fn any_altered_character_invalidates_the_token() {
        let keys = make_keys("dev-secret");
        let now = OffsetDateTime::now_utc();
        let token = keys.sign_at(Uuid::new_v4(), now).unwrap();

        for i in 0..token.len() {
            let mut bytes = token.clone().into_bytes();
            bytes[i] = if bytes[i] == b'A' { b'B' } else { b'A' };
            let tampered = String::from_utf8(bytes).unwrap();
            assert_eq!(
                keys.verify_at(&tampered, now),
                Err(TokenError::Invalid),
                "byte {i} altered"
            );
        }
    }

    #[test]
    fn token_from_another_secret_is_invalid() {
        let now = OffsetDateTime::now_utc();
        let token = make_keys("old-secret").sign_at(Uuid::new_v4(), now).unwrap();
        assert_eq!(make_keys("new-secret").verify_at(&token, now), Err(TokenError::Invalid));
    }

    #[test]
    fn garbage_is_invalid_not_expired() {
        let keys = make_keys("dev-secret");
        assert_eq!(keys.verify("not.a.jwt"), Err(TokenError::Invalid));
        assert_eq!(keys.verify(""), Err(TokenError::Invalid));
    }
}
