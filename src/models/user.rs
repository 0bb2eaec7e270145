use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Username/password pair submitted to the register and login endpoints
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Credentials {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Both fields are present after trimming
    pub fn is_complete(&self) -> bool {
        !self.username.trim().is_empty() && !self.password.trim().is_empty()
    }
}

/// Stored account; the password is kept in plaintext
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserRecord {
    pub password: String,
    pub created_at: DateTime<Utc>,
}
