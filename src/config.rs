//! Configuration management for the LINE developer CLI.
//!
//! This module handles loading and accessing configuration values from environment
//! variables and `.env` files. Channel credentials are never hardcoded: they come
//! from the process environment, from the `.env` file written by `linecli line init`,
//! or, for the access token, from the token cache written by `linecli line token --issue`.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Cached access token (access token only)
//! 4. Application defaults (API base URL)

use std::{
    env, fmt, io,
    path::{Path, PathBuf},
};

use crate::management::TokenStore;

/// Name of the credentials file inside the application data directory.
pub const CONFIG_FILE_NAME: &str = ".env";

/// Default host for every LINE API call.
pub const DEFAULT_API_URL: &str = "https://api.line.me";

pub const ENV_CHANNEL_ID: &str = "LINE_CHANNEL_ID";
pub const ENV_CHANNEL_SECRET: &str = "LINE_CHANNEL_SECRET";
pub const ENV_ACCESS_TOKEN: &str = "LINE_CHANNEL_ACCESS_TOKEN";
pub const ENV_API_URL: &str = "LINE_API_URL";

/// Returns the application data directory.
///
/// - Linux: `~/.local/share/linecli`
/// - macOS: `~/Library/Application Support/linecli`
/// - Windows: `%LOCALAPPDATA%/linecli`
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("linecli");
    path
}

/// Returns the path of the `.env` credentials file.
pub fn env_path() -> PathBuf {
    data_dir().join(CONFIG_FILE_NAME)
}

/// Loads environment variables from the `.env` file in the local data directory.
///
/// Creates the data directory if it doesn't exist. A missing `.env` file is not
/// an error: the user may provide everything through the process environment,
/// or hasn't run `linecli line init` yet. Variables already present in the
/// environment are not overridden.
///
/// # Errors
///
/// Returns an error string if the directory cannot be created or an existing
/// `.env` file cannot be parsed.
pub async fn load_env() -> Result<(), String> {
    let path = env_path();
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    if path.is_file() {
        dotenv::from_path(&path).map_err(|e| e.to_string())?;
    }
    Ok(())
}

/// Writes channel credentials to the `.env` file at `path`.
///
/// Lines of the existing file that don't define the channel ID or secret are
/// preserved, so a configured access token or API URL survives `line init`.
pub async fn save_credentials(path: &Path, channel_id: &str, channel_secret: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent).await?;
    }

    let existing = match async_fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => String::new(),
        Err(e) => return Err(e),
    };

    let content = merge_credentials(&existing, channel_id, channel_secret);
    async_fs::write(path, content).await
}

/// Replaces the channel ID and secret assignments in `.env` file content.
pub fn merge_credentials(existing: &str, channel_id: &str, channel_secret: &str) -> String {
    let mut lines: Vec<String> = existing
        .lines()
        .filter(|line| {
            let key = line.split('=').next().unwrap_or_default().trim();
            key != ENV_CHANNEL_ID && key != ENV_CHANNEL_SECRET
        })
        .map(str::to_string)
        .collect();

    while lines.last().is_some_and(|l| l.trim().is_empty()) {
        lines.pop();
    }

    lines.push(format!("{}={}", ENV_CHANNEL_ID, channel_id));
    lines.push(format!("{}={}", ENV_CHANNEL_SECRET, channel_secret));

    let mut content = lines.join("\n");
    content.push('\n');
    content
}

/// A credential an operation may require before it talks to the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Credential {
    ChannelId,
    ChannelSecret,
    AccessToken,
}

impl Credential {
    pub fn label(&self) -> &'static str {
        match self {
            Credential::ChannelId => "Channel ID",
            Credential::ChannelSecret => "Channel secret",
            Credential::AccessToken => "Channel access token",
        }
    }

    /// How the user fixes the missing credential.
    pub fn hint(&self) -> String {
        let file = env_path();
        match self {
            Credential::ChannelId => format!(
                "Setup channel ID at {} (or run linecli line init) and re-run again",
                file.display()
            ),
            Credential::ChannelSecret => format!(
                "Setup channel secret at {} (or run linecli line init) and re-run again",
                file.display()
            ),
            Credential::AccessToken => {
                "Issue one with linecli line token --issue and re-run again".to_string()
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Missing(Credential),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(credential) => write!(f, "{} not found", credential.label()),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelConfig {
    pub id: Option<String>,
    pub secret: Option<String>,
    pub access_token: Option<String>,
}

/// Resolved runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub channel: ChannelConfig,
    pub api_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            channel: ChannelConfig::default(),
            api_url: DEFAULT_API_URL.to_string(),
        }
    }
}

impl Config {
    /// Builds the configuration from the process environment and, when no access
    /// token is configured, from the token cache. An expired cached token is
    /// ignored.
    pub async fn load() -> Self {
        let mut config = Self::from_lookup(|key| env::var(key).ok());

        if config.channel.access_token.is_none() {
            if let Ok(store) = TokenStore::load().await
                && !store.is_expired()
            {
                config.channel.access_token = Some(store.current_token().access_token.clone());
            }
        }

        config
    }

    /// Builds the configuration from an arbitrary variable lookup.
    ///
    /// Blank values count as unset, which is what an untouched `.env.example`
    /// copy contains.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        Self {
            channel: ChannelConfig {
                id: read(ENV_CHANNEL_ID),
                secret: read(ENV_CHANNEL_SECRET),
                access_token: read(ENV_ACCESS_TOKEN),
            },
            api_url: read(ENV_API_URL)
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
        }
    }

    /// Checks that every credential in `required` is present, in order.
    pub fn validate(&self, required: &[Credential]) -> Result<(), ConfigError> {
        for credential in required {
            if self.get(*credential).is_none() {
                return Err(ConfigError::Missing(*credential));
            }
        }
        Ok(())
    }

    pub fn get(&self, credential: Credential) -> Option<&str> {
        match credential {
            Credential::ChannelId => self.channel.id.as_deref(),
            Credential::ChannelSecret => self.channel.secret.as_deref(),
            Credential::AccessToken => self.channel.access_token.as_deref(),
        }
    }

    /// Channel ID, or an empty string when unset. Call after [`Config::validate`].
    pub fn channel_id(&self) -> &str {
        self.channel.id.as_deref().unwrap_or_default()
    }

    pub fn channel_secret(&self) -> &str {
        self.channel.secret.as_deref().unwrap_or_default()
    }

    pub fn access_token(&self) -> &str {
        self.channel.access_token.as_deref().unwrap_or_default()
    }
}
