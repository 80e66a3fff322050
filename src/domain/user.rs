use serde::{Deserialize, Serialize};

use super::UserId;

/// Represents a registered user in the system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub username: String,
    /// Never sent to clients.
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub is_admin: bool,
    pub is_verified: bool,
}

/// Payload for storing a new user. The password is already hashed.
#[derive(Debug, Clone)]
pub struct UserCreate {
    pub name: String,
    pub username: String,
    pub password_hash: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum UserQuery {
    All,
    Username(String),
}
