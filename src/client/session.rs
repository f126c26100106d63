use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Persistent home of the session token. Presence of a token is the sole
/// signal of "logged in"; only the client's auth-failure handling clears it.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn token(&self) -> Option<String>;
    async fn set_token(&self, token: &str) -> Result<(), SessionError>;
    async fn clear(&self) -> Result<(), SessionError>;
}

/// File-backed session store: the token lives in a single `token` file,
/// the equivalent of the browser's persisted key-value entry.
pub struct FileSession {
    path: PathBuf,
}

impl FileSession {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, std::io::Error> {
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(Self {
            path: path.as_ref().to_path_buf(),
        })
    }

    /// Construct from `SESSION_FILE`, defaulting to `./session/token`.
    pub fn from_env() -> Result<Self, std::io::Error> {
        let path = std::env::var("SESSION_FILE").unwrap_or_else(|_| "./session/token".to_string());
        Self::new(path)
    }
}

#[async_trait]
impl SessionStore for FileSession {
    async fn token(&self) -> Option<String> {
        let contents = tokio::fs::read_to_string(&self.path).await.ok()?;
        let token = contents.trim();
        if token.is_empty() {
            None
        } else {
            Some(token.to_string())
        }
    }

    async fn set_token(&self, token: &str) -> Result<(), SessionError> {
        tokio::fs::write(&self.path, token).await?;
        Ok(())
    }

    async fn clear(&self) -> Result<(), SessionError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory session store for tests and short-lived embedders.
#[derive(Default)]
pub struct MemorySession {
    token: tokio::sync::RwLock<Option<String>>,
}

impl MemorySession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: &str) -> Self {
        Self {
            token: tokio::sync::RwLock::new(Some(token.to_string())),
        }
    }
}

#[async_trait]
impl SessionStore for MemorySession {
    async fn token(&self) -> Option<String> {
        self.token.read().await.clone()
    }

    async fn set_token(&self, token: &str) -> Result<(), SessionError> {
        *self.token.write().await = Some(token.to_string());
        Ok(())
    }

    async fn clear(&self) -> Result<(), SessionError> {
        *self.token.write().await = None;
        Ok(())
    }
}
