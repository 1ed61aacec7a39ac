//! Configuration management for thinwiki.
//!
//! Parses `thinwiki.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `server.host`
//! - `repository.name`
//! - `repository.branch`
//! - `repository.archive_url`
//! - `reload.token`

mod expand;

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Token value shipped in sample configuration files.
///
/// A server refuses to start while the reload token still has this value.
pub const PLACEHOLDER_RELOAD_TOKEN: &str = "ChangeMeToSomethingRandomAndSecure!";

/// Default for `repository.max_entry_bytes` (8 MiB).
///
/// Must equal `tw_archive::DEFAULT_MAX_ENTRY_BYTES`; the `thinwiki` binary
/// tests that the two agree.
pub const DEFAULT_MAX_ENTRY_BYTES: u64 = 8 * 1024 * 1024;

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "thinwiki.toml";

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override server host.
    pub host: Option<String>,
    /// Override server port.
    pub port: Option<u16>,
    /// Override repository identifier (`owner/name`).
    pub repository: Option<String>,
    /// Override branch or ref to download.
    pub branch: Option<String>,
    /// Override reload token.
    pub reload_token: Option<String>,
}

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Source repository configuration.
    pub repository: RepositoryConfig,
    /// Reload endpoint configuration.
    pub reload: ReloadConfig,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Server configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 3000,
        }
    }
}

/// Source repository configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RepositoryConfig {
    /// Repository identifier (`owner/name`). Required to serve.
    pub name: Option<String>,
    /// Branch or ref whose snapshot is served.
    pub branch: String,
    /// Base URL of the archive host.
    pub archive_url: String,
    /// `User-Agent` header sent with archive downloads.
    pub user_agent: String,
    /// Timeout for the whole archive download, in seconds.
    pub timeout_secs: u64,
    /// Largest accepted archive entry, in bytes.
    pub max_entry_bytes: u64,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            name: None,
            branch: "main".to_owned(),
            archive_url: "https://github.com".to_owned(),
            user_agent: concat!("thinwiki/", env!("CARGO_PKG_VERSION")).to_owned(),
            timeout_secs: 60,
            max_entry_bytes: DEFAULT_MAX_ENTRY_BYTES,
        }
    }
}

/// Reload endpoint configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ReloadConfig {
    /// Shared secret expected in reload requests.
    pub token: Option<String>,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`reload.token`").
        field: String,
        /// Error message (e.g., "${`RELOAD_TOKEN`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a URL field to use http:// or https:// scheme.
fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `thinwiki.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading, allowing CLI arguments (and
    /// the environment variables they read) to take precedence over config
    /// file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(host) = &settings.host {
            self.server.host.clone_from(host);
        }
        if let Some(port) = settings.port {
            self.server.port = port;
        }
        if let Some(repository) = &settings.repository {
            self.repository.name = Some(repository.clone());
        }
        if let Some(branch) = &settings.branch {
            self.repository.branch.clone_from(branch);
        }
        if let Some(token) = &settings.reload_token {
            self.reload.token = Some(token.clone());
        }
    }

    /// Get the validated repository identifier.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if no repository is configured.
    pub fn require_repository(&self) -> Result<&str, ConfigError> {
        let name = self.repository.name.as_deref().unwrap_or_default();
        require_non_empty(name, "repository.name")?;
        Ok(name)
    }

    /// Get the validated reload token.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if the token is missing or still
    /// set to [`PLACEHOLDER_RELOAD_TOKEN`].
    pub fn require_reload_token(&self) -> Result<&str, ConfigError> {
        let token = self.reload.token.as_deref().unwrap_or_default();
        require_non_empty(token, "reload.token")?;
        if token == PLACEHOLDER_RELOAD_TOKEN {
            return Err(ConfigError::Validation(
                "reload.token is set to the placeholder value".to_owned(),
            ));
        }
        Ok(token)
    }

    /// Validate everything `thinwiki serve` needs before the page cache is
    /// constructed.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate_serve(&self) -> Result<(), ConfigError> {
        self.validate()?;
        self.require_repository()?;
        self.require_reload_token()?;
        Ok(())
    }

    /// Validate configuration values.
    ///
    /// Checks the fields that have defaults. Called automatically after
    /// loading from file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_server()?;
        self.validate_repository()?;
        Ok(())
    }

    /// Validate server configuration.
    fn validate_server(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.server.host, "server.host")?;

        // Port 0 is technically valid (OS assigns a random port), but it's
        // unlikely to be intentional in a config file
        if self.server.port == 0 {
            return Err(ConfigError::Validation(
                "server.port cannot be 0".to_owned(),
            ));
        }

        Ok(())
    }

    /// Validate repository configuration.
    fn validate_repository(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.repository.branch, "repository.branch")?;
        require_non_empty(&self.repository.archive_url, "repository.archive_url")?;
        require_http_url(&self.repository.archive_url, "repository.archive_url")?;

        if self.repository.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "repository.timeout_secs must be greater than 0".to_owned(),
            ));
        }
        if self.repository.max_entry_bytes == 0 {
            return Err(ConfigError::Validation(
                "repository.max_entry_bytes must be greater than 0".to_owned(),
            ));
        }

        Ok(())
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;
        config.config_path = Some(path.to_path_buf());

        // Validate configuration after loading
        config.validate()?;

        Ok(config)
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.server.host = expand::expand_env(&self.server.host, "server.host")?;

        if let Some(ref name) = self.repository.name {
            self.repository.name = Some(expand::expand_env(name, "repository.name")?);
        }
        self.repository.branch = expand::expand_env(&self.repository.branch, "repository.branch")?;
        self.repository.archive_url =
            expand::expand_env(&self.repository.archive_url, "repository.archive_url")?;

        if let Some(ref token) = self.reload.token {
            self.reload.token = Some(expand::expand_env(token, "reload.token")?);
        }

        Ok(())
    }
}
