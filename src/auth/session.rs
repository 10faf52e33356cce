use anyhow::Context;
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use tower_sessions::Session;
use tracing::{debug, error, warn};
use uuid::Uuid;

use crate::error::AppError;

/// Key under which the authenticated user's id lives in the session record.
pub const SESSION_USER_ID_KEY: &str = "user_id";

/// Request-scoped handle on the server-side session.
///
/// The identity is only ever read from here, never from a request body.
#[derive(Debug)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Binds the session to `user_id`, issuing a fresh session id.
    pub async fn login(&self, user_id: Uuid) -> anyhow::Result<()> {
        self.0.cycle_id().await.context("cycle session id")?;
        self.0
            .insert(SESSION_USER_ID_KEY, user_id)
            .await
            .context("store session user")?;
        debug!(%user_id, "session established");
        Ok(())
    }

    /// Destroys the session record and clears the cookie.
    pub async fn logout(&self) -> anyhow::Result<()> {
        self.0.flush().await.context("destroy session")?;
        Ok(())
    }

    pub async fn current_user(&self) -> anyhow::Result<Option<Uuid>> {
        self.0
            .get::<Uuid>(SESSION_USER_ID_KEY)
            .await
            .context("read session user")
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for SessionContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(|(status, msg)| {
                error!(%status, msg, "session layer missing");
                AppError::Internal(anyhow::anyhow!("session unavailable: {msg}"))
            })?;
        Ok(SessionContext(session))
    }
}

/// Guard: resolves to the session's user id or rejects with 401.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = SessionContext::from_request_parts(parts, state).await?;
        match session.current_user().await? {
            Some(user_id) => Ok(AuthUser(user_id)),
            None => {
                warn!(uri = %parts.uri, "request without authenticated session");
                Err(AppError::Unauthorized("User not authenticated".into()))
            }
        }
    }
}
