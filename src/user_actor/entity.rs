use crate::actor_framework::Entity;
use crate::domain::{User, UserCreate, UserId, UserQuery};
use crate::error::BookstoreError;

/// Custom actions for User documents.
#[derive(Debug, Clone)]
pub enum UserAction {
    /// Marks the account as verified or unverified.
    SetVerified(bool),
}

/// Results from UserActions - variants match 1:1 with UserAction
#[derive(Debug, Clone, PartialEq)]
pub enum UserActionResult {
    /// `true` when the flag actually changed.
    SetVerified(bool),
}

impl Entity for User {
    type Id = UserId;
    type CreateParams = UserCreate;
    type Patch = ();
    type Query = UserQuery;
    type Action = UserAction;
    type ActionResult = UserActionResult;
    type Error = BookstoreError;

    const KIND: &'static str = "user";

    fn id(&self) -> &UserId {
        &self.id
    }

    /// Creates a new User from creation parameters.
    ///
    /// # Arguments
    /// * `id` - Unique identifier for the user
    /// * `params` - Display name, login name and an already hashed password
    fn from_create_params(id: UserId, params: UserCreate) -> Result<Self, BookstoreError> {
        if params.username.trim().is_empty() {
            return Err(BookstoreError::invalid("username is required"));
        }
        if params.password_hash.is_empty() {
            return Err(BookstoreError::invalid("password is required"));
        }
        Ok(Self {
            id,
            name: params.name,
            username: params.username,
            password_hash: params.password_hash,
            is_admin: false,
            is_verified: false,
        })
    }

    fn unique_key(&self) -> Option<String> {
        Some(self.username.clone())
    }

    fn matches(&self, query: &UserQuery) -> bool {
        match query {
            UserQuery::All => true,
            UserQuery::Username(username) => &self.username == username,
        }
    }

    fn on_update(&mut self, _patch: ()) -> Result<(), BookstoreError> {
        Ok(())
    }

    fn handle_action(&mut self, action: UserAction) -> Result<UserActionResult, BookstoreError> {
        match action {
            UserAction::SetVerified(verified) => {
                let changed = self.is_verified != verified;
                self.is_verified = verified;
                Ok(UserActionResult::SetVerified(changed))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(username: &str) -> UserCreate {
        UserCreate {
            name: "Ann".into(),
            username: username.into(),
            password_hash: "$argon2id$stub".into(),
        }
    }

    #[test]
    fn new_users_start_unverified() {
        let user = User::from_create_params("u1".into(), params("ann")).unwrap();
        assert!(!user.is_verified);
        assert!(!user.is_admin);
        assert_eq!(user.unique_key().as_deref(), Some("ann"));
    }

    #[test]
    fn blank_username_is_rejected() {
        let err = User::from_create_params("u1".into(), params("  ")).unwrap_err();
        assert!(matches!(err, BookstoreError::InvalidArgument(_)));
    }

    #[test]
    fn set_verified_reports_change() {
        let mut user = User::from_create_params("u1".into(), params("ann")).unwrap();
        let first = user.handle_action(UserAction::SetVerified(true)).unwrap();
        let second = user.handle_action(UserAction::SetVerified(true)).unwrap();
        assert_eq!(first, UserActionResult::SetVerified(true));
        assert_eq!(second, UserActionResult::SetVerified(false));
    }
}
