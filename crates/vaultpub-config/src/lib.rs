//! Configuration management for vaultpub.
//!
//! Parses `vaultpub.toml` configuration files with serde and provides
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
//! - `vault.root`
//! - `publish.attachment_location`
//! - `uploader.endpoint`
//! - `uploader.authorization`

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override vault root directory.
    pub vault_root: Option<PathBuf>,
    /// Override the write-back flag.
    pub replace_original_doc: Option<bool>,
    /// Override upload endpoint.
    pub endpoint: Option<String>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "vaultpub.toml";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Vault configuration (root is a relative string from TOML).
    vault: VaultConfigRaw,
    /// Publishing behaviour.
    pub publish: PublishConfig,
    /// Upload transport configuration.
    pub uploader: UploaderConfig,

    /// Resolved vault root (set after loading).
    #[serde(skip)]
    pub vault_root: PathBuf,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Raw vault configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct VaultConfigRaw {
    root: Option<String>,
}

/// Publishing configuration consumed by the rewrite pipeline.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PublishConfig {
    /// Directory (relative to the vault root) holding image attachments.
    pub attachment_location: String,
    /// Write the rewritten text back into the source document.
    pub replace_original_doc: bool,
    /// Emit the display name as alt text (otherwise alt text is empty).
    pub image_alt_text: bool,
    /// Turn `-` and `_` in alt text into spaces.
    pub replace_alt_separators: bool,
    /// Drawing-format alias stored on disk as a rendered PNG (e.g. `excalidraw`).
    pub drawing_extension: Option<String>,
    /// Frontmatter key holding the external URL of a linked document.
    pub redirect_field: String,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            attachment_location: String::new(),
            replace_original_doc: false,
            image_alt_text: true,
            replace_alt_separators: false,
            drawing_extension: None,
            redirect_field: "url".to_owned(),
        }
    }
}

/// Upload transport configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UploaderConfig {
    /// Upload endpoint URL (multipart POST).
    pub endpoint: Option<String>,
    /// Value for the `Authorization` header, if the host needs one.
    pub authorization: Option<String>,
    /// Multipart field name carrying the file.
    pub field_name: String,
    /// JSON pointer locating the public URL in the response body.
    pub url_pointer: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for UploaderConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            authorization: None,
            field_name: "image".to_owned(),
            url_pointer: "/data/link".to_owned(),
            timeout_secs: 30,
        }
    }
}

impl UploaderConfig {
    /// Return the endpoint, requiring it to be configured.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if no endpoint is set.
    pub fn require_endpoint(&self) -> Result<&str, ConfigError> {
        self.endpoint.as_deref().ok_or_else(|| {
            ConfigError::Validation(
                "uploader.endpoint required (via --endpoint or [uploader] config)".to_owned(),
            )
        })
    }
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
        /// Config field path (e.g., "`uploader.authorization`").
        field: String,
        /// Error message (e.g., "${`IMGUR_CLIENT_ID`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
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
    /// Otherwise, searches for `vaultpub.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// or the resulting configuration is invalid.
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
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(vault_root) = &settings.vault_root {
            self.vault_root.clone_from(vault_root);
        }
        if let Some(replace) = settings.replace_original_doc {
            self.publish.replace_original_doc = replace;
        }
        if let Some(endpoint) = &settings.endpoint {
            self.uploader.endpoint = Some(endpoint.clone());
        }
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

    /// Create default config with the vault rooted at the current directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with the vault rooted at `base`.
    fn default_with_base(base: &Path) -> Self {
        Self {
            vault: VaultConfigRaw::default(),
            publish: PublishConfig::default(),
            uploader: UploaderConfig::default(),
            vault_root: base.to_path_buf(),
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_publish()?;
        self.validate_uploader()?;
        Ok(())
    }

    fn validate_publish(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.publish.redirect_field, "publish.redirect_field")?;

        if let Some(ext) = &self.publish.drawing_extension {
            require_non_empty(ext, "publish.drawing_extension")?;
            if ext.contains('.') {
                return Err(ConfigError::Validation(
                    "publish.drawing_extension must not contain a dot".to_owned(),
                ));
            }
        }

        Ok(())
    }

    fn validate_uploader(&self) -> Result<(), ConfigError> {
        // Only validate endpoint if set (commands that upload call require_endpoint)
        if let Some(endpoint) = &self.uploader.endpoint {
            require_non_empty(endpoint, "uploader.endpoint")?;
            require_http_url(endpoint, "uploader.endpoint")?;
        }

        require_non_empty(&self.uploader.field_name, "uploader.field_name")?;

        if !self.uploader.url_pointer.starts_with('/') {
            return Err(ConfigError::Validation(
                "uploader.url_pointer must be a JSON pointer starting with '/'".to_owned(),
            ));
        }

        if self.uploader.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "uploader.timeout_secs must be greater than 0".to_owned(),
            ));
        }

        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        expand::expand_env_opt(&mut self.vault.root, "vault.root")?;
        self.publish.attachment_location = expand::expand_env(
            &self.publish.attachment_location,
            "publish.attachment_location",
        )?;
        expand::expand_env_opt(&mut self.uploader.endpoint, "uploader.endpoint")?;
        expand::expand_env_opt(&mut self.uploader.authorization, "uploader.authorization")?;
        Ok(())
    }

    /// Resolve the vault root relative to the config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        self.vault_root = config_dir.join(self.vault.root.as_deref().unwrap_or("."));
    }
}
