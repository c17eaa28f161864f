use std::{io::Error, io::ErrorKind, path::PathBuf};

use chrono::{DateTime, TimeZone, Utc};

use crate::{
    config,
    types::{IssueTokenResponse, IssuedToken},
};

#[derive(Debug)]
pub enum TokenStoreError {
    IoError(Error),
    SerdeError(serde_json::Error),
}

impl From<Error> for TokenStoreError {
    fn from(err: Error) -> Self {
        TokenStoreError::IoError(err)
    }
}

impl std::fmt::Display for TokenStoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenStoreError::IoError(e) => write!(f, "token cache I/O error: {}", e),
            TokenStoreError::SerdeError(e) => write!(f, "token cache is corrupt: {}", e),
        }
    }
}

impl std::error::Error for TokenStoreError {}

/// Cached channel access token issued by `line token --issue`.
pub struct TokenStore {
    path: PathBuf,
    token: IssuedToken,
}

impl TokenStore {
    pub fn with_path(token: IssuedToken, path: PathBuf) -> Self {
        TokenStore { path, token }
    }

    /// Wraps a fresh issue response, stamping it with the current time.
    pub fn from_response(response: IssueTokenResponse, path: PathBuf) -> Self {
        let token = IssuedToken {
            access_token: response.access_token,
            token_type: response.token_type,
            expires_in: response.expires_in,
            obtained_at: Utc::now().timestamp(),
        };
        Self::with_path(token, path)
    }

    pub async fn load() -> Result<Self, TokenStoreError> {
        Self::load_from(Self::token_path()).await
    }

    pub async fn load_from(path: PathBuf) -> Result<Self, TokenStoreError> {
        let content = async_fs::read_to_string(&path).await?;
        let token: IssuedToken =
            serde_json::from_str(&content).map_err(TokenStoreError::SerdeError)?;
        Ok(Self { path, token })
    }

    pub async fn persist(&self) -> Result<(), TokenStoreError> {
        if let Some(parent) = self.path.parent() {
            async_fs::create_dir_all(parent).await?;
        }

        let json =
            serde_json::to_string_pretty(&self.token).map_err(TokenStoreError::SerdeError)?;
        async_fs::write(&self.path, json).await?;
        Ok(())
    }

    /// Deletes the cache file. A file that is already gone is not an error.
    pub async fn remove(&self) -> Result<(), TokenStoreError> {
        match async_fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(TokenStoreError::IoError(e)),
        }
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        let expires_in = i64::try_from(self.token.expires_in).ok()?;
        Utc.timestamp_opt(self.token.obtained_at.checked_add(expires_in)?, 0)
            .single()
    }

    pub fn is_expired(&self) -> bool {
        self.expires_at().is_none_or(|at| Utc::now() >= at)
    }

    pub fn current_token(&self) -> &IssuedToken {
        &self.token
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    pub fn token_path() -> PathBuf {
        config::data_dir().join("cache/token.json")
    }
}
