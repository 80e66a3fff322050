use tracing::{debug, info, instrument, warn};

use crate::actor_framework::ResourceClient;
use crate::domain::{clamp_limit, User, UserCreate, UserId, UserQuery};
use crate::error::{BookstoreError, Result};
use crate::password::{hash_password, verify_password};
use crate::user_actor::{UserAction, UserActionResult};

/// Client for interacting with the User actor.
#[derive(Clone)]
pub struct UserClient {
    inner: ResourceClient<User>,
}

impl_basic_client!(UserClient, User, user);

impl UserClient {
    /// Stores a new account. The username must be free; the password is kept only as a hash.
    #[instrument(skip(self, password))]
    pub async fn register(&self, name: String, username: String, password: String) -> Result<UserId> {
        debug!("Sending request");
        if name.trim().is_empty() || username.trim().is_empty() {
            return Err(BookstoreError::invalid("name and username are required"));
        }
        let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
            .await
            .map_err(|e| BookstoreError::Internal(format!("hashing task failed: {e}")))??;

        let id = self
            .inner
            .create(UserCreate { name, username, password_hash })
            .await?;
        info!(user_id = %id, "User registered");
        Ok(id)
    }

    /// Returns the account when the password matches.
    #[instrument(skip(self, password))]
    pub async fn login(&self, username: String, password: String) -> Result<User> {
        debug!("Sending request");
        let user = self
            .inner
            .find(UserQuery::Username(username.clone()), 1)
            .await?
            .pop()
            .ok_or(BookstoreError::NotFound { kind: "user", id: username })?;

        let stored_hash = user.password_hash.clone();
        let matches = tokio::task::spawn_blocking(move || verify_password(&stored_hash, &password))
            .await
            .map_err(|e| BookstoreError::Internal(format!("verification task failed: {e}")))??;
        if !matches {
            warn!(user_id = %user.id, "Wrong password");
            return Err(BookstoreError::Unauthorized("invalid credentials".to_string()));
        }
        Ok(user)
    }

    #[instrument(skip(self))]
    pub async fn list_users(&self, limit: usize) -> Result<Vec<User>> {
        debug!("Sending request");
        self.inner.find(UserQuery::All, clamp_limit(limit)).await
    }

    /// Returns `true` if the flag changed.
    #[instrument(skip(self))]
    pub async fn set_verified(&self, id: UserId, verified: bool) -> Result<bool> {
        debug!("Sending request");
        match self.inner.perform_action(id, UserAction::SetVerified(verified)).await? {
            UserActionResult::SetVerified(changed) => Ok(changed),
        }
    }
}
