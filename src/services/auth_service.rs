use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::database::repository::{SessionRepository, UserRepository};
use crate::dto::auth_dto::{LoginPayload, RegisterPayload};
use crate::error::{Error, Result};
use crate::models::session::NewSession;
use crate::models::user::{NewUser, Role, User};
use crate::utils::crypto::{constant_time_eq, hash_password, sha256_hex, verify_password};
use crate::utils::token::{IssuedToken, TokenIssuer};
use crate::utils::validation::normalize_email;

/// A freshly started session: the user plus both cookies' tokens.
#[derive(Debug, Clone)]
pub struct SessionTokens {
    pub user: User,
    pub access: IssuedToken,
    pub refresh: IssuedToken,
}

#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    sessions: Arc<dyn SessionRepository>,
    tokens: TokenIssuer,
}

fn invalid_refresh() -> Error {
    Error::Unauthorized("Invalid refresh token".to_string())
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        sessions: Arc<dyn SessionRepository>,
        tokens: TokenIssuer,
    ) -> Self {
        Self {
            users,
            sessions,
            tokens,
        }
    }

    pub async fn register(&self, payload: RegisterPayload) -> Result<User> {
        let role = payload.role.unwrap_or(Role::User);
        let company_name = match role {
            Role::Admin => {
                return Err(Error::BadRequest(
                    "Admin accounts cannot be registered".to_string(),
                ))
            }
            Role::Company => {
                let name = payload
                    .company_name
                    .as_deref()
                    .map(str::trim)
                    .filter(|n| !n.is_empty())
                    .ok_or_else(|| {
                        Error::BadRequest("companyName is required for company accounts".to_string())
                    })?;
                Some(name.to_string())
            }
            Role::User => None,
        };

        let email = normalize_email(&payload.email);
        if self.users.find_by_email(&email).await?.is_some() {
            return Err(Error::Conflict("Email already registered".to_string()));
        }

        let new_user = NewUser {
            email,
            password_hash: hash_password(&payload.password)?,
            name: payload.name.trim().to_string(),
            role,
        };
        let (user, company) = self
            .users
            .create(new_user, company_name)
            .await
            .map_err(|e| match e {
                Error::Conflict(_) => Error::Conflict("Email already registered".to_string()),
                other => other,
            })?;

        tracing::info!(
            user_id = %user.id,
            role = ?user.role,
            company_id = ?company.map(|c| c.id),
            "user registered"
        );
        Ok(user)
    }

    pub async fn login(&self, payload: LoginPayload) -> Result<SessionTokens> {
        let email = normalize_email(&payload.email);
        let user = self
            .users
            .find_by_email(&email)
            .await?
            .ok_or_else(|| Error::Unauthorized("Invalid credentials".to_string()))?;

        if !verify_password(&payload.password, &user.password_hash) {
            tracing::debug!(user_id = %user.id, "login rejected: wrong password");
            return Err(Error::Unauthorized("Invalid credentials".to_string()));
        }

        let tokens = self.start_session(user).await?;
        tracing::info!(user_id = %tokens.user.id, "user logged in");
        Ok(tokens)
    }

    /// Exchanges a refresh token for a new token pair. The presented session is
    /// consumed, so each refresh token works at most once.
    pub async fn refresh(&self, refresh_token: &str) -> Result<SessionTokens> {
        let claims = self.tokens.verify_refresh(refresh_token).map_err(|e| {
            tracing::debug!(error = %e, "refresh rejected: bad token");
            invalid_refresh()
        })?;

        let session = self
            .sessions
            .find_by_id(claims.sid)
            .await?
            .ok_or_else(invalid_refresh)?;

        let presented_hash = sha256_hex(refresh_token);
        if session.user_id != claims.sub
            || session.is_expired(Utc::now())
            || !constant_time_eq(&session.refresh_token_hash, &presented_hash)
        {
            tracing::debug!(session_id = %session.id, "refresh rejected: session mismatch");
            return Err(invalid_refresh());
        }

        // a concurrent refresh with the same token may have consumed it already
        if self.sessions.delete(session.id).await? == 0 {
            tracing::debug!(session_id = %session.id, "refresh rejected: session already rotated");
            return Err(invalid_refresh());
        }

        let user = self
            .users
            .find_by_id(claims.sub)
            .await?
            .ok_or_else(invalid_refresh)?;
        self.start_session(user).await
    }

    /// Ends the session named by the refresh token, if it names one. An
    /// expired but correctly signed token still ends its session.
    pub async fn logout(&self, refresh_token: Option<&str>) -> Result<()> {
        let Some(token) = refresh_token else {
            return Ok(());
        };
        match self.tokens.decode_refresh_ignoring_expiry(token) {
            Ok(claims) => {
                let removed = self.sessions.delete(claims.sid).await?;
                tracing::info!(user_id = %claims.sub, removed, "user logged out");
            }
            Err(e) => tracing::debug!(error = %e, "logout with unusable refresh token"),
        }
        Ok(())
    }

    pub async fn current_user(&self, user_id: Uuid) -> Result<User> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| Error::Unauthorized("User no longer exists".to_string()))
    }

    pub async fn purge_expired_sessions(&self) -> Result<u64> {
        self.sessions.delete_expired(Utc::now()).await
    }

    async fn start_session(&self, user: User) -> Result<SessionTokens> {
        let session_id = Uuid::new_v4();
        let refresh = self.tokens.issue_refresh(user.id, session_id)?;
        self.sessions
            .create(NewSession {
                id: session_id,
                user_id: user.id,
                refresh_token_hash: sha256_hex(&refresh.token),
                expires_at: refresh.expires_at,
            })
            .await?;
        let access = self.tokens.issue_access(user.id, user.role)?;
        Ok(SessionTokens {
            user,
            access,
            refresh,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::repository::{MockSessionRepository, MockUserRepository};
    use crate::models::session::Session;
    use chrono::Duration;

    fn issuer() -> TokenIssuer {
        TokenIssuer::new("a", "r", Duration::minutes(15), Duration::days(7))
    }

    #[tokio::test]
    async fn database_failure_during_login_surfaces_as_internal_error() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email()
            .returning(|_| Err(Error::Database(sqlx::Error::PoolTimedOut)));
        let sessions = MockSessionRepository::new();
        let service = AuthService::new(Arc::new(users), Arc::new(sessions), issuer());

        let err = service
            .login(LoginPayload {
                email: "a@b.test".into(),
                password: "password123".into(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.status(), axum::http::StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn admin_self_registration_is_refused_before_touching_storage() {
        let users = MockUserRepository::new();
        let sessions = MockSessionRepository::new();
        let service = AuthService::new(Arc::new(users), Arc::new(sessions), issuer());

        let err = service
            .register(RegisterPayload {
                name: "Root".into(),
                email: "root@b.test".into(),
                password: "password123".into(),
                role: Some(Role::Admin),
                company_name: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, Error::BadRequest(_)));
    }

    #[tokio::test]
    async fn unknown_session_rejects_refresh() {
        let users = MockUserRepository::new();
        let mut sessions = MockSessionRepository::new();
        sessions.expect_find_by_id().returning(|_| Ok(None));
        let tokens = issuer();
        let refresh = tokens.issue_refresh(Uuid::new_v4(), Uuid::new_v4()).unwrap();
        let service = AuthService::new(Arc::new(users), Arc::new(sessions), tokens);

        let err = service.refresh(&refresh.token).await.unwrap_err();
        assert!(matches!(err, Error::Unauthorized(_)));
    }

    #[tokio::test]
    async fn refresh_fails_when_the_session_was_already_consumed() {
        let tokens = issuer();
        let user_id = Uuid::new_v4();
        let session_id = Uuid::new_v4();
        let refresh = tokens.issue_refresh(user_id, session_id).unwrap();
        let stored = Session {
            id: session_id,
            user_id,
            refresh_token_hash: sha256_hex(&refresh.token),
            expires_at: refresh.expires_at,
            created_at: Utc::now(),
        };

        let mut sessions = MockSessionRepository::new();
        sessions
            .expect_find_by_id()
            .returning(move |_| Ok(Some(stored.clone())));
        sessions.expect_delete().times(1).returning(|_| Ok(0));
        sessions.expect_create().never();
        let users = MockUserRepository::new();
        let service = AuthService::new(Arc::new(users), Arc::new(sessions), tokens);

        let err = service.refresh(&refresh.token).await.unwrap_err();
        assert!(matches!(err, Error::Unauthorized(_)));
    }

    #[tokio::test]
    async fn logout_with_an_expired_refresh_token_drops_the_session() {
        let tokens = TokenIssuer::new("a", "r", Duration::minutes(15), Duration::days(-1));
        let session_id = Uuid::new_v4();
        let refresh = tokens.issue_refresh(Uuid::new_v4(), session_id).unwrap();

        let mut sessions = MockSessionRepository::new();
        sessions
            .expect_delete()
            .withf(move |id| *id == session_id)
            .times(1)
            .returning(|_| Ok(1));
        let service = AuthService::new(Arc::new(MockUserRepository::new()), Arc::new(sessions), tokens);

        service.logout(Some(&refresh.token)).await.unwrap();
    }
}
