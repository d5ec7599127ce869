//! Upload gateway configuration.
//!
//! Sources, lowest precedence first:
//! - Bundled defaults (include_str! from blockpress.toml)
//! - `~/.config/blockpress/blockpress.toml`
//! - `./blockpress.toml`
//! - `BLOCKPRESS__UPLOAD__*` environment variables (e.g. `BLOCKPRESS__UPLOAD__ENDPOINT`)

use blockpress_error::{BlockpressError, BlockpressResult, ConfigError};
use blockpress_media::PermanentPrefixes;
use config::{Config, ConfigBuilder, Environment, File, FileFormat, builder::DefaultState};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, instrument};

/// Bundled default configuration.
const DEFAULT_CONFIG: &str = include_str!("../../../blockpress.toml");

/// Settings for the upload gateway and the rewrite pass that drives it.
///
/// # Example
///
/// ```toml
/// [upload]
/// endpoint = "https://craft.example/api/upload"
/// timeout_secs = 30
/// folder = "forum"
/// permanent_prefixes = ["https://craft.example/storage/", "/storage/v1/object/public/"]
/// ```
#[derive(
    Debug,
    Clone,
    PartialEq,
    Serialize,
    Deserialize,
    Getters,
    derive_setters::Setters,
    derive_builder::Builder,
)]
#[setters(prefix = "with_")]
#[builder(default, setter(into))]
pub struct UploadConfig {
    /// Multipart upload endpoint
    #[serde(default = "default_endpoint")]
    endpoint: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    timeout_secs: u64,

    /// Destination folder hint sent with every upload unless overridden
    #[serde(default)]
    folder: Option<String>,

    /// URL prefixes (or `/path/` segments) of durable storage
    #[serde(default = "default_permanent_prefixes")]
    permanent_prefixes: Vec<String>,

    /// Retries after a transient failure
    #[serde(default = "default_max_retries")]
    max_retries: usize,

    /// Initial retry backoff in milliseconds
    #[serde(default = "default_retry_backoff_ms")]
    retry_backoff_ms: u64,

    /// Upper bound on simultaneous uploads in one rewrite pass (0 = unbounded)
    #[serde(default = "default_max_concurrent_uploads")]
    max_concurrent_uploads: usize,
}

fn default_endpoint() -> String {
    "http://localhost:3000/api/upload".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_permanent_prefixes() -> Vec<String> {
    vec![
        "https://storage.blockpress.example/".to_string(),
        "/storage/v1/object/public/".to_string(),
    ]
}

fn default_max_retries() -> usize {
    2
}

fn default_retry_backoff_ms() -> u64 {
    250
}

fn default_max_concurrent_uploads() -> usize {
    4
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            timeout_secs: default_timeout_secs(),
            folder: None,
            permanent_prefixes: default_permanent_prefixes(),
            max_retries: default_max_retries(),
            retry_backoff_ms: default_retry_backoff_ms(),
            max_concurrent_uploads: default_max_concurrent_uploads(),
        }
    }
}

impl UploadConfig {
    /// Per-request timeout as a `Duration`.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Permanent prefixes as a classifier set.
    pub fn prefixes(&self) -> PermanentPrefixes {
        PermanentPrefixes::new(self.permanent_prefixes.iter().cloned())
    }

    /// Reject settings the gateway cannot work with.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` for an empty or non-HTTP endpoint or a zero timeout.
    pub fn validate(&self) -> BlockpressResult<()> {
        let endpoint = self.endpoint.trim();
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            return Err(ConfigError::new(format!(
                "upload endpoint must be an http(s) URL, got '{}'",
                self.endpoint
            ))
            .into());
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::new("timeout_secs must be at least 1").into());
        }
        Ok(())
    }

    /// Load configuration from a single TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> BlockpressResult<Self> {
        let builder = Config::builder().add_source(File::from(path.as_ref()));
        Self::extract(builder)
    }

    /// Load configuration with precedence: environment > current dir > home dir > bundled defaults.
    ///
    /// # Errors
    ///
    /// Returns error if any present source fails to parse.
    pub fn load() -> BlockpressResult<Self> {
        debug!("Loading upload configuration");

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/blockpress/blockpress.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder
            .add_source(File::with_name("blockpress").required(false))
            .add_source(
                Environment::with_prefix("BLOCKPRESS")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("upload.permanent_prefixes"),
            );

        Self::extract(builder)
    }

    fn extract(builder: ConfigBuilder<DefaultState>) -> BlockpressResult<Self> {
        let config = builder.build().map_err(|e| {
            BlockpressError::from(ConfigError::new(format!(
                "Failed to read configuration: {}",
                e
            )))
        })?;

        let upload: Self = match config.get("upload") {
            Ok(upload) => upload,
            Err(config::ConfigError::NotFound(_)) => Self::default(),
            Err(e) => {
                return Err(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                ))
                .into());
            }
        };

        upload.validate()?;
        debug!(
            endpoint = %upload.endpoint,
            timeout_secs = upload.timeout_secs,
            prefixes = upload.permanent_prefixes.len(),
            "Loaded upload configuration"
        );
        Ok(upload)
    }
}
