use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::Config;
use crate::error::Result;
use crate::models::user::Role;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    pub sub: Uuid,
    pub role: Role,
    pub iat: usize,
    pub exp: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshClaims {
    pub sub: Uuid,
    pub sid: Uuid,
    pub iat: usize,
    pub exp: usize,
}

#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Signs and verifies the access/refresh JWT pair. Each kind has its own secret.
#[derive(Clone)]
pub struct TokenIssuer {
    access_secret: String,
    refresh_secret: String,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenIssuer {
    pub fn new(
        access_secret: impl Into<String>,
        refresh_secret: impl Into<String>,
        access_ttl: Duration,
        refresh_ttl: Duration,
    ) -> Self {
        Self {
            access_secret: access_secret.into(),
            refresh_secret: refresh_secret.into(),
            access_ttl,
            refresh_ttl,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.jwt_access_secret.clone(),
            config.jwt_refresh_secret.clone(),
            Duration::minutes(config.access_token_ttl_minutes),
            Duration::days(config.refresh_token_ttl_days),
        )
    }

    pub fn access_ttl(&self) -> Duration {
        self.access_ttl
    }

    pub fn refresh_ttl(&self) -> Duration {
        self.refresh_ttl
    }

    pub fn issue_access(&self, user_id: Uuid, role: Role) -> Result<IssuedToken> {
        let now = Utc::now();
        let expires_at = now + self.access_ttl;
        let claims = AccessClaims {
            sub: user_id,
            role,
            iat: now.timestamp() as usize,
            exp: expires_at.timestamp() as usize,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.access_secret.as_bytes()),
        )?;
        Ok(IssuedToken { token, expires_at })
    }

    pub fn issue_refresh(&self, user_id: Uuid, session_id: Uuid) -> Result<IssuedToken> {
        let now = Utc::now();
        let expires_at = now + self.refresh_ttl;
        let claims = RefreshClaims {
            sub: user_id,
            sid: session_id,
            iat: now.timestamp() as usize,
            exp: expires_at.timestamp() as usize,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.refresh_secret.as_bytes()),
        )?;
        Ok(IssuedToken { token, expires_at })
    }

    pub fn verify_access(&self, token: &str) -> Result<AccessClaims> {
        let data = decode::<AccessClaims>(
            token,
            &DecodingKey::from_secret(self.access_secret.as_bytes()),
            &validation(),
        )?;
        Ok(data.claims)
    }

    pub fn verify_refresh(&self, token: &str) -> Result<RefreshClaims> {
        let data = decode::<RefreshClaims>(
            token,
            &DecodingKey::from_secret(self.refresh_secret.as_bytes()),
            &validation(),
        )?;
        Ok(data.claims)
    }

    /// Checks the signature but not the expiry. Only used to find the session
    /// to drop on logout.
    pub fn decode_refresh_ignoring_expiry(&self, token: &str) -> Result<RefreshClaims> {
        let mut validation = validation();
        validation.validate_exp = false;
        let data = decode::<RefreshClaims>(
            token,
            &DecodingKey::from_secret(self.refresh_secret.as_bytes()),
            &validation,
        )?;
        Ok(data.claims)
    }
}

fn validation() -> Validation {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    validation.leeway = 0;
    validation
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issuer() -> TokenIssuer {
        TokenIssuer::new("access", "refresh", Duration::minutes(15), Duration::days(7))
    }

    #[test]
    fn access_token_round_trip() {
        let issuer = issuer();
        let user_id = Uuid::new_v4();
        let issued = issuer.issue_access(user_id, Role::Company).unwrap();
        let claims = issuer.verify_access(&issued.token).unwrap();
        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.role, Role::Company);
    }

    #[test]
    fn refresh_token_is_not_an_access_token() {
        let issuer = issuer();
        let issued = issuer.issue_refresh(Uuid::new_v4(), Uuid::new_v4()).unwrap();
        assert!(issuer.verify_access(&issued.token).is_err());
        assert!(issuer.verify_refresh(&issued.token).is_ok());
    }

    #[test]
    fn expired_token_is_rejected() {
        let issuer = TokenIssuer::new("access", "refresh", Duration::minutes(-5), Duration::days(7));
        let issued = issuer.issue_access(Uuid::new_v4(), Role::User).unwrap();
        assert!(issuer.verify_access(&issued.token).is_err());
    }

    #[test]
    fn expired_refresh_token_still_names_its_session() {
        let issuer = TokenIssuer::new("access", "refresh", Duration::minutes(15), Duration::days(-1));
        let sid = Uuid::new_v4();
        let issued = issuer.issue_refresh(Uuid::new_v4(), sid).unwrap();
        assert!(issuer.verify_refresh(&issued.token).is_err());
        assert_eq!(issuer.decode_refresh_ignoring_expiry(&issued.token).unwrap().sid, sid);
        assert!(self::issuer().decode_refresh_ignoring_expiry("not-a-jwt").is_err());
    }

    #[test]
    fn tampered_secret_is_rejected() {
        let issued = issuer().issue_access(Uuid::new_v4(), Role::User).unwrap();
        let other = TokenIssuer::new("other", "refresh", Duration::minutes(15), Duration::days(7));
        assert!(other.verify_access(&issued.token).is_err());
    }
}
