use chrono::Utc;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

use crate::{
    error::{AppError, AppResult},
    models::{Credentials, UserRecord},
};

/// Account storage for the register/login endpoints
///
/// Passwords are stored and compared in plaintext.
#[async_trait::async_trait]
pub trait UserStore: Send + Sync {
    /// Creates an account; fails if the username is taken
    async fn register(&self, credentials: &Credentials) -> AppResult<()>;

    /// Whether the username exists and the password matches
    async fn authenticate(&self, credentials: &Credentials) -> AppResult<bool>;

    /// Store name for logging
    fn name(&self) -> &'static str;
}

fn validate(credentials: &Credentials) -> AppResult<()> {
    if credentials.is_complete() {
        Ok(())
    } else {
        Err(AppError::InvalidInput(
            "Username and password are required".to_string(),
        ))
    }
}

fn insert_user(
    users: &mut HashMap<String, UserRecord>,
    credentials: &Credentials,
) -> AppResult<()> {
    validate(credentials)?;

    if users.contains_key(&credentials.username) {
        return Err(AppError::Conflict(format!(
            "User '{}' already exists",
            credentials.username
        )));
    }

    users.insert(
        credentials.username.clone(),
        UserRecord {
            password: credentials.password.clone(),
            created_at: Utc::now(),
        },
    );
    Ok(())
}

fn password_matches(users: &HashMap<String, UserRecord>, credentials: &Credentials) -> bool {
    users
        .get(&credentials.username)
        .is_some_and(|user| user.password == credentials.password)
}

/// Process-local user store
#[derive(Default)]
pub struct InMemoryUserStore {
    users: RwLock<HashMap<String, UserRecord>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl UserStore for InMemoryUserStore {
    async fn register(&self, credentials: &Credentials) -> AppResult<()> {
        let mut users = self.users.write().await;
        insert_user(&mut users, credentials)
    }

    async fn authenticate(&self, credentials: &Credentials) -> AppResult<bool> {
        let users = self.users.read().await;
        Ok(password_matches(&users, credentials))
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

/// User store persisted as a JSON object of username to account record
///
/// The whole file is read once on open and rewritten after every registration.
pub struct FileUserStore {
    path: PathBuf,
    users: RwLock<HashMap<String, UserRecord>>,
}

impl FileUserStore {
    /// Opens the store, starting empty when the file does not exist yet
    pub async fn open(path: impl Into<PathBuf>) -> AppResult<Self> {
        let path = path.into();

        let users: HashMap<String, UserRecord> = match tokio::fs::read(&path).await {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => HashMap::new(),
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = %path.display(), "User file not found, starting empty");
                HashMap::new()
            }
            Err(e) => return Err(e.into()),
        };

        tracing::info!(path = %path.display(), users = users.len(), "Loaded user store");

        Ok(Self {
            path,
            users: RwLock::new(users),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self, users: &HashMap<String, UserRecord>) -> AppResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_vec_pretty(users)?;
        tokio::fs::write(&self.path, json).await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl UserStore for FileUserStore {
    async fn register(&self, credentials: &Credentials) -> AppResult<()> {
        let mut users = self.users.write().await;
        insert_user(&mut users, credentials)?;

        if let Err(e) = self.persist(&users).await {
            users.remove(&credentials.username);
            tracing::error!(path = %self.path.display(), error = %e, "Failed to save user store");
            return Err(e);
        }

        Ok(())
    }

    async fn authenticate(&self, credentials: &Credentials) -> AppResult<bool> {
        let users = self.users.read().await;
        Ok(password_matches(&users, credentials))
    }

    fn name(&self) -> &'static str {
        "file"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_err, assert_ok};

    #[tokio::test]
    async fn test_register_and_authenticate() {
        let store = InMemoryUserStore::new();
        assert_ok!(store.register(&Credentials::new("ann", "brie")).await);

        assert!(store
            .authenticate(&Credentials::new("ann", "brie"))
            .await
            .unwrap());
        assert!(!store
            .authenticate(&Credentials::new("ann", "gouda"))
            .await
            .unwrap());
        assert!(!store
            .authenticate(&Credentials::new("bob", "brie"))
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_duplicate_username_conflicts() {
        let store = InMemoryUserStore::new();
        assert_ok!(store.register(&Credentials::new("ann", "brie")).await);

        let result = store.register(&Credentials::new("ann", "other")).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_incomplete_credentials_are_rejected() {
        let store = InMemoryUserStore::new();
        assert_err!(store.register(&Credentials::new("ann", "")).await);
        assert_err!(store.register(&Credentials::new("  ", "brie")).await);
    }

    #[tokio::test]
    async fn test_file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("users.json");

        let store = FileUserStore::open(&path).await.unwrap();
        assert_ok!(store.register(&Credentials::new("ann", "brie")).await);
        drop(store);

        let reopened = FileUserStore::open(&path).await.unwrap();
        assert!(reopened
            .authenticate(&Credentials::new("ann", "brie"))
            .await
            .unwrap());
        let result = reopened.register(&Credentials::new("ann", "brie")).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_file_store_rejects_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("users.json");
        tokio::fs::write(&path, "ann,brie\n").await.unwrap();

        let result = FileUserStore::open(&path).await;
        assert!(matches!(result, Err(AppError::Serialization(_))));
    }
}
