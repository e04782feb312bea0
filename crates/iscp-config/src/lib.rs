use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const PROJECT_CONFIG_FILE: &str = "iscp.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Missing setting: {0}")]
    MissingSetting(&'static str),

    #[error("Secret not set: environment variable {0} is empty or undefined")]
    MissingSecret(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Configuration for iscp (iscp.toml)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub dataset: DatasetConfig,

    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub publish: PublishConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetConfig {
    /// Input CSV, relative to the working directory
    #[serde(default = "default_input")]
    pub input: PathBuf,

    #[serde(default = "default_delimiter")]
    pub delimiter: char,

    /// Strip surrounding whitespace from headers and fields
    #[serde(default)]
    pub trim: bool,

    #[serde(default = "default_email_column")]
    pub email_column: String,

    #[serde(default = "default_phone_column")]
    pub phone_column: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_spreadsheet")]
    pub spreadsheet: PathBuf,

    #[serde(default = "default_diagram")]
    pub diagram: PathBuf,

    #[serde(default = "default_readme")]
    pub readme: PathBuf,

    #[serde(default = "default_archive")]
    pub archive: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishConfig {
    /// Account that owns the remote repository
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,

    #[serde(default = "default_repository")]
    pub repository: String,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_remote")]
    pub remote: String,

    #[serde(default = "default_branch")]
    pub branch: String,

    #[serde(default = "default_commit_message")]
    pub commit_message: String,

    /// Name of the environment variable holding the access token
    #[serde(default = "default_token_env")]
    pub token_env: String,

    /// Add the raw input file to .gitignore before staging
    #[serde(default = "default_true")]
    pub ignore_input: bool,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            input: default_input(),
            delimiter: default_delimiter(),
            trim: false,
            email_column: default_email_column(),
            phone_column: default_phone_column(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            spreadsheet: default_spreadsheet(),
            diagram: default_diagram(),
            readme: default_readme(),
            archive: default_archive(),
        }
    }
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            user: None,
            repository: default_repository(),
            host: default_host(),
            remote: default_remote(),
            branch: default_branch(),
            commit_message: default_commit_message(),
            token_env: default_token_env(),
            ignore_input: default_true(),
        }
    }
}

fn default_input() -> PathBuf {
    PathBuf::from("iscp_pii_dataset_-_Sheet1.csv")
}

fn default_delimiter() -> char {
    ','
}

fn default_email_column() -> String {
    "email".to_string()
}

fn default_phone_column() -> String {
    "phone".to_string()
}

fn default_spreadsheet() -> PathBuf {
    PathBuf::from("iscp_pii_dataset_cleaned.xlsx")
}

fn default_diagram() -> PathBuf {
    PathBuf::from("architecture.mmd")
}

fn default_readme() -> PathBuf {
    PathBuf::from("README.md")
}

fn default_archive() -> PathBuf {
    PathBuf::from("iscp_pii_project.zip")
}

fn default_repository() -> String {
    "iscp-pii-project".to_string()
}

fn default_host() -> String {
    "github.com".to_string()
}

fn default_remote() -> String {
    "origin".to_string()
}

fn default_branch() -> String {
    "main".to_string()
}

fn default_commit_message() -> String {
    "Initial commit - ISCP PII Project".to_string()
}

fn default_token_env() -> String {
    "GITHUB_TOKEN".to_string()
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load `iscp.toml` from `workdir`, then the user config directory,
    /// falling back to defaults when neither exists.
    pub fn find_and_load(workdir: &Path) -> Result<Self> {
        let project = workdir.join(PROJECT_CONFIG_FILE);
        if project.exists() {
            return Self::load(&project);
        }

        if let Some(global) = Self::global_config_path()
            && global.exists()
        {
            return Self::load(&global);
        }

        tracing::debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        tracing::debug!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get user-level config file path
    pub fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "iscp", "iscp")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }
}

impl DatasetConfig {
    /// Delimiter as the single byte the CSV reader expects
    pub fn delimiter_byte(&self) -> Result<u8> {
        u8::try_from(self.delimiter)
            .ok()
            .filter(u8::is_ascii)
            .ok_or(ConfigError::MissingSetting("dataset.delimiter (single ASCII character)"))
    }
}

impl PublishConfig {
    pub fn user(&self) -> Result<&str> {
        self.user
            .as_deref()
            .filter(|u| !u.is_empty())
            .ok_or(ConfigError::MissingSetting("publish.user"))
    }

    /// Read the access token from the environment
    pub fn token(&self) -> Result<String> {
        self.token_with(|name| std::env::var(name).ok())
    }

    /// Read the access token through `lookup` (name -> value)
    pub fn token_with<F>(&self, lookup: F) -> Result<String>
    where
        F: FnOnce(&str) -> Option<String>,
    {
        lookup(&self.token_env)
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingSecret(self.token_env.clone()))
    }
}

/// Resolve `path` against `workdir` unless it is already absolute
pub fn resolve(workdir: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        workdir.join(path)
    }
}
