use std::env::{self, VarError};

use teloxide::types::UserId;
use thiserror::Error;

const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";
const DEFAULT_LICENSE_FILE_PATH: &str = "licenses.json";

/// Errors from reading the environment configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required environment variable is missing.
    #[error("environment variable {0} is required: {1}")]
    MissingVar(&'static str, VarError),
    /// `GITHUB_REPO` is not `owner/repo`.
    #[error("GITHUB_REPO must be in the form 'owner/repo', got '{0}'")]
    InvalidRepo(String),
    /// `AUTHORIZED_USER_ID` is empty or not a list of numeric ids.
    #[error(
        "AUTHORIZED_USER_ID must be a comma-separated list of numeric Telegram user ids, got '{0}'"
    )]
    InvalidUserIds(String),
}

/// Represents the application configuration.
///
/// Read once at startup and passed into the components explicitly, so
/// tests can construct handlers with fake credentials.
#[derive(Debug, Clone)]
pub struct Config {
    /// The Telegram bot token.
    pub telegram_bot_token: String,
    /// The GitHub API token with write access to the license repo.
    pub github_token: String,
    /// The root of the GitHub REST API.
    pub github_api_url: String,
    /// Owner of the repository holding the license file.
    pub github_owner: String,
    /// Name of the repository holding the license file.
    pub github_repo: String,
    /// Path of the license file inside the repository.
    pub license_file_path: String,
    /// Telegram user ids allowed to issue commands.
    pub authorized_user_ids: Vec<UserId>,
}

impl Config {
    /// Creates a new `Config` instance from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let repo_env =
            env::var("GITHUB_REPO").map_err(|e| ConfigError::MissingVar("GITHUB_REPO", e))?;
        let (github_owner, github_repo) = parse_repo(&repo_env)?;

        let ids_env = env::var("AUTHORIZED_USER_ID")
            .map_err(|e| ConfigError::MissingVar("AUTHORIZED_USER_ID", e))?;
        let authorized_user_ids = parse_user_ids(&ids_env)?;

        Ok(Self {
            telegram_bot_token: env::var("TELOXIDE_TOKEN")
                .map_err(|e| ConfigError::MissingVar("TELOXIDE_TOKEN", e))?,
            github_token: env::var("GITHUB_TOKEN")
                .map_err(|e| ConfigError::MissingVar("GITHUB_TOKEN", e))?,
            github_api_url: env::var("GITHUB_API_URL")
                .unwrap_or_else(|_| DEFAULT_GITHUB_API_URL.to_string()),
            license_file_path: env::var("LICENSE_FILE_PATH")
                .unwrap_or_else(|_| DEFAULT_LICENSE_FILE_PATH.to_string()),
            github_owner,
            github_repo,
            authorized_user_ids,
        })
    }
}

fn parse_repo(raw: &str) -> Result<(String, String), ConfigError> {
    let (owner, repo) =
        raw.split_once('/').ok_or_else(|| ConfigError::InvalidRepo(raw.to_string()))?;
    if owner.is_empty() || repo.is_empty() || repo.contains('/') {
        return Err(ConfigError::InvalidRepo(raw.to_string()));
    }
    Ok((owner.to_string(), repo.to_string()))
}

// There is deliberately no allow-all fallback for an empty list.
fn parse_user_ids(raw: &str) -> Result<Vec<UserId>, ConfigError> {
    let ids = raw
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<u64>().map(UserId).map_err(|_| ConfigError::InvalidUserIds(raw.to_string()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    if ids.is_empty() {
        return Err(ConfigError::InvalidUserIds(raw.to_string()));
    }
    Ok(ids)
}
