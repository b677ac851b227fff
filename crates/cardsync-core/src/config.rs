//! Configuration module for cardsync.
//!
//! Provides typed configuration structs that map to the YAML configuration file,
//! with loading, validation, defaults, and a builder pattern for programmatic use.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, RemotePath, Whitelist, DEFAULT_EXTENSIONS};
use crate::usecases::SyncOptions;

// ---------------------------------------------------------------------------
// Config struct with sub-sections
// ---------------------------------------------------------------------------

/// Top-level configuration for cardsync.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub device: DeviceConfig,
    pub network: NetworkConfig,
    pub archive: ArchiveConfig,
    pub paths: PathsConfig,
    pub logging: LoggingConfig,
}

/// The Wi-Fi SD card serving the device's file tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    /// Base URL of the card's web interface.
    pub base_url: String,
    /// Top-level folder holding the `YYYYMMDD` date folders.
    pub data_folder: String,
    /// Top-level folders mirrored in full on every transfer.
    pub companion_folders: Vec<String>,
    /// Whether files at the card root are mirrored.
    pub include_root_files: bool,
    /// Accepted file extensions.
    pub whitelist: Vec<String>,
    /// Timeout for listings and downloads (seconds).
    pub request_timeout_secs: u64,
    /// Timeout for size probes (seconds).
    pub probe_timeout_secs: u64,
}

/// Host network profile switching.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// When false, profiles are never switched (host already reaches both sides).
    pub enabled: bool,
    /// NetworkManager connection that joins the card's access point.
    pub device_profile: String,
    /// NetworkManager connection restored afterwards.
    pub home_profile: String,
    /// Seconds to wait after a profile comes up.
    pub settle_delay_secs: u64,
}

/// Remote archive service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArchiveConfig {
    /// Base URL of the SleepHQ API.
    pub base_url: String,
    /// JSON file with `client_id`, `client_secret`, `username`, `password`.
    pub credentials_file: PathBuf,
    /// Timeout for API calls other than the upload (seconds).
    pub request_timeout_secs: u64,
    /// Timeout for the archive upload (seconds).
    pub upload_timeout_secs: u64,
}

/// Local files used by a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Staging directory receiving the mirrored files.
    pub staging_dir: PathBuf,
    /// Archive written from the staging directory.
    pub archive_file: PathBuf,
    /// Persisted sync state.
    pub state_file: PathBuf,
    /// JSON-lines upload history.
    pub history_file: PathBuf,
    /// Plain-text error log.
    pub error_log: PathBuf,
}

/// Logging / tracing settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: `trace`, `debug`, `info`, `warn`, or `error`.
    pub level: String,
    /// Optional log file, appended to in addition to stderr.
    pub file: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// Config::load()
// ---------------------------------------------------------------------------

impl Config {
    /// Load configuration from a YAML file at `path`.
    ///
    /// Missing sections and fields take their default values.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Try to load from `path`; fall back to [`Config::default`] on any error.
    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_default()
    }

    /// Load from `path`, using [`Config::default`] only when no file exists.
    ///
    /// A file that exists but cannot be read or parsed is an error; running
    /// on defaults would point the run at a different state file.
    pub fn load_if_present(path: &Path) -> anyhow::Result<Self> {
        match std::fs::metadata(path) {
            Ok(_) => Self::load(path),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Platform-appropriate default path for the configuration file.
    ///
    /// Typically `$XDG_CONFIG_HOME/cardsync/config.yaml` on Linux.
    pub fn default_path() -> PathBuf {
        config_dir().join("config.yaml")
    }

    /// Run options derived from the device and network sections.
    pub fn sync_options(&self) -> Result<SyncOptions, DomainError> {
        Ok(SyncOptions {
            device_profile: self.network.device_profile.clone(),
            home_profile: self.network.home_profile.clone(),
            data_root: RemotePath::root().join(&self.device.data_folder)?,
            companion_folders: self.device.companion_folders.clone(),
            include_root_files: self.device.include_root_files,
            whitelist: self.whitelist(),
        })
    }

    /// The configured extension whitelist.
    pub fn whitelist(&self) -> Whitelist {
        Whitelist::new(&self.device.whitelist)
    }
}

fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("~/.config"))
        .join("cardsync")
}

fn data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("~/.local/share"))
        .join("cardsync")
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            base_url: "http://192.168.4.1".to_string(),
            data_folder: "DATALOG".to_string(),
            companion_folders: vec!["SETTINGS".to_string()],
            include_root_files: true,
            whitelist: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            request_timeout_secs: 10,
            probe_timeout_secs: 5,
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            device_profile: "ezshare".to_string(),
            home_profile: "homewifi".to_string(),
            settle_delay_secs: 5,
        }
    }
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            base_url: "https://sleephq.com".to_string(),
            credentials_file: config_dir().join("credentials.json"),
            request_timeout_secs: 30,
            upload_timeout_secs: 60,
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        let data_dir = data_dir();
        Self {
            staging_dir: data_dir.join("staging"),
            archive_file: data_dir.join("upload.zip"),
            state_file: data_dir.join("last_sync.txt"),
            history_file: data_dir.join("upload_history.jsonl"),
            error_log: data_dir.join("upload_errors.log"),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Config::validate()
// ---------------------------------------------------------------------------

/// A single validation error found in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path to the offending field, e.g. `"device.base_url"`.
    pub field: String,
    /// Human-readable explanation.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Valid values for `logging.level`.
const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

fn error(field: &str, message: impl Into<String>) -> ValidationError {
    ValidationError {
        field: field.to_string(),
        message: message.into(),
    }
}

fn is_http_url(url: &str) -> bool {
    let rest = url
        .strip_prefix("http://")
        .or_else(|| url.strip_prefix("https://"));
    matches!(rest, Some(host) if !host.is_empty())
}

impl Config {
    /// Validate the configuration and return all errors found.
    ///
    /// An empty vector means the configuration is valid.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        // --- device ---
        if !is_http_url(&self.device.base_url) {
            errors.push(error("device.base_url", "must be an http:// or https:// URL"));
        }
        if let Err(e) = RemotePath::root().join(&self.device.data_folder) {
            errors.push(error("device.data_folder", e.to_string()));
        }
        for (i, name) in self.device.companion_folders.iter().enumerate() {
            if RemotePath::root().join(name).is_err() {
                errors.push(error(
                    &format!("device.companion_folders[{i}]"),
                    format!("not a valid folder name: {name:?}"),
                ));
            }
        }
        if self.device.whitelist.is_empty() {
            errors.push(error("device.whitelist", "must list at least one extension"));
        }
        if self.device.whitelist.iter().any(|e| e.trim().trim_start_matches('.').is_empty()) {
            errors.push(error("device.whitelist", "extensions must not be empty"));
        }
        if self.device.request_timeout_secs == 0 {
            errors.push(error("device.request_timeout_secs", "must be greater than 0"));
        }
        if self.device.probe_timeout_secs == 0 {
            errors.push(error("device.probe_timeout_secs", "must be greater than 0"));
        }

        // --- network ---
        if self.network.enabled {
            if self.network.device_profile.trim().is_empty() {
                errors.push(error("network.device_profile", "must not be empty"));
            }
            if self.network.home_profile.trim().is_empty() {
                errors.push(error("network.home_profile", "must not be empty"));
            }
            if self.network.device_profile == self.network.home_profile {
                errors.push(error(
                    "network.home_profile",
                    "must differ from network.device_profile",
                ));
            }
        }

        // --- archive ---
        if !is_http_url(&self.archive.base_url) {
            errors.push(error("archive.base_url", "must be an http:// or https:// URL"));
        }
        if self.archive.request_timeout_secs == 0 {
            errors.push(error("archive.request_timeout_secs", "must be greater than 0"));
        }
        if self.archive.upload_timeout_secs == 0 {
            errors.push(error("archive.upload_timeout_secs", "must be greater than 0"));
        }

        // --- paths ---
        if self.paths.archive_file.starts_with(&self.paths.staging_dir) {
            errors.push(error(
                "paths.archive_file",
                "must not be inside paths.staging_dir",
            ));
        }

        // --- logging ---
        if !VALID_LOG_LEVELS.contains(&self.logging.level.as_str()) {
            errors.push(error(
                "logging.level",
                format!(
                    "invalid level '{}', expected one of: {}",
                    self.logging.level,
                    VALID_LOG_LEVELS.join(", ")
                ),
            ));
        }

        errors
    }
}

// ---------------------------------------------------------------------------
// ConfigBuilder
// ---------------------------------------------------------------------------

/// Fluent builder for [`Config`], starting from defaults.
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new builder pre-populated with default values.
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    // --- device ---

    pub fn device_base_url(mut self, url: impl Into<String>) -> Self {
        self.config.device.base_url = url.into();
        self
    }

    pub fn device_data_folder(mut self, name: impl Into<String>) -> Self {
        self.config.device.data_folder = name.into();
        self
    }

    pub fn device_companion_folders(mut self, names: Vec<String>) -> Self {
        self.config.device.companion_folders = names;
        self
    }

    pub fn device_include_root_files(mut self, include: bool) -> Self {
        self.config.device.include_root_files = include;
        self
    }

    pub fn device_whitelist(mut self, extensions: Vec<String>) -> Self {
        self.config.device.whitelist = extensions;
        self
    }

    pub fn device_request_timeout_secs(mut self, secs: u64) -> Self {
        self.config.device.request_timeout_secs = secs;
        self
    }

    pub fn device_probe_timeout_secs(mut self, secs: u64) -> Self {
        self.config.device.probe_timeout_secs = secs;
        self
    }

    // --- network ---

    pub fn network_enabled(mut self, enabled: bool) -> Self {
        self.config.network.enabled = enabled;
        self
    }

    pub fn network_device_profile(mut self, profile: impl Into<String>) -> Self {
        self.config.network.device_profile = profile.into();
        self
    }

    pub fn network_home_profile(mut self, profile: impl Into<String>) -> Self {
        self.config.network.home_profile = profile.into();
        self
    }

    pub fn network_settle_delay_secs(mut self, secs: u64) -> Self {
        self.config.network.settle_delay_secs = secs;
        self
    }

    // --- archive ---

    pub fn archive_base_url(mut self, url: impl Into<String>) -> Self {
        self.config.archive.base_url = url.into();
        self
    }

    pub fn archive_credentials_file(mut self, path: PathBuf) -> Self {
        self.config.archive.credentials_file = path;
        self
    }

    // --- paths ---

    /// Place every local file under `dir`, using the default file names.
    pub fn paths_root(mut self, dir: &Path) -> Self {
        self.config.paths = PathsConfig {
            staging_dir: dir.join("staging"),
            archive_file: dir.join("upload.zip"),
            state_file: dir.join("last_sync.txt"),
            history_file: dir.join("upload_history.jsonl"),
            error_log: dir.join("upload_errors.log"),
        };
        self
    }

    pub fn paths_state_file(mut self, path: PathBuf) -> Self {
        self.config.paths.state_file = path;
        self
    }

    // --- logging ---

    pub fn logging_level(mut self, level: impl Into<String>) -> Self {
        self.config.logging.level = level.into();
        self
    }

    pub fn logging_file(mut self, file: PathBuf) -> Self {
        self.config.logging.file = Some(file);
        self
    }

    // --- build ---

    /// Consume the builder and return the finished [`Config`].
    pub fn build(self) -> Config {
        self.config
    }

    /// Build and validate in one step. Returns `Err` with the list of
    /// validation errors if the configuration is invalid.
    pub fn build_validated(self) -> Result<Config, Vec<ValidationError>> {
        let config = self.build();
        let errors = config.validate();
        if errors.is_empty() {
            Ok(config)
        } else {
            Err(errors)
        }
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
