//! services/flashify/src/app/session.rs
//!
//! Turns auth grants into persisted sessions and back. Screens receive the
//! `Session` this produces instead of reading the token from storage on
//! their own.

use flashify_core::{
    keys, AuthGrant, CredentialStore, CredentialStoreExt, LoginDetails, PortResult, Session,
    SignupDetails, UserService,
};
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Clone)]
pub struct SessionManager {
    store: Arc<dyn CredentialStore>,
}

impl SessionManager {
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self { store }
    }

    /// Creates an account, then persists and returns its session.
    pub async fn sign_up(
        &self,
        users: &dyn UserService,
        details: &SignupDetails,
    ) -> PortResult<Session> {
        let grant = users.signup(details).await?;
        self.establish(grant).await
    }

    /// Logs in, then persists and returns the session.
    pub async fn sign_in(
        &self,
        users: &dyn UserService,
        details: &LoginDetails,
    ) -> PortResult<Session> {
        let grant = users.login(details).await?;
        self.establish(grant).await
    }

    /// Persists the four credential keys. The token is written last so that
    /// a partial write never looks like a complete session.
    pub async fn establish(&self, grant: AuthGrant) -> PortResult<Session> {
        let session = Session::from(grant);
        self.store.set(keys::USER_ID, &session.user_id).await?;
        self.store.set(keys::USERNAME, &session.username).await?;
        self.store.set(keys::EMAIL, &session.email).await?;
        self.store.set(keys::TOKEN, &session.token).await?;
        info!(user_id = %session.user_id, "Session established");
        Ok(session)
    }

    /// Reads the persisted session, if any.
    ///
    /// No token means no session. A token whose companion keys are missing
    /// or unreadable still yields a session, with those fields left empty.
    pub async fn restore(&self) -> PortResult<Option<Session>> {
        let Some(token): Option<String> = self.store.get(keys::TOKEN).await? else {
            return Ok(None);
        };

        let user_id = self.companion(keys::USER_ID).await;
        let username = self.companion(keys::USERNAME).await;
        let email = self.companion(keys::EMAIL).await;

        Ok(Some(Session {
            token,
            user_id,
            username,
            email,
        }))
    }

    async fn companion(&self, key: &str) -> String {
        match self.store.get_or_none(key).await {
            Some(value) => value,
            None => {
                warn!(key, "Session restored without this key");
                String::new()
            }
        }
    }

    /// Logs out by deleting every credential key, token first.
    pub async fn end(&self) -> PortResult<()> {
        for key in keys::ALL {
            self.store.remove(key).await?;
        }
        info!("Session ended");
        Ok(())
    }
}
