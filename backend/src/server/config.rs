//! Application settings loaded via OrthoConfig, and the server configuration
//! derived from them.

use std::time::Duration;

use homestock::inbound::http::cors::CorsPolicy;
use homestock::inbound::http::state::{DEFAULT_MAX_BODY_BYTES, ErrorPolicy};
use homestock::outbound::media::{
    CloudinaryConfigError, CloudinaryCredentials, DEFAULT_CLOUDINARY_BASE_URL, SignatureAlgorithm,
    UnknownSignatureAlgorithm,
};
use homestock::outbound::persistence::PoolConfig;
use ortho_config::OrthoConfig;
use reqwest::Url;
use serde::Deserialize;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8000;
const DEFAULT_MEDIA_TIMEOUT_SECS: u64 = 30;

/// Settings read from `HOMESTOCK_*` variables, CLI flags, and config files.
#[derive(Debug, Clone, Default, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "HOMESTOCK")]
pub struct AppSettings {
    /// PostgreSQL connection URL. Required.
    pub database_url: Option<String>,
    /// Interface to bind.
    pub host: Option<String>,
    /// Port to bind.
    pub port: Option<u16>,
    pub cloudinary_cloud_name: Option<String>,
    pub cloudinary_api_key: Option<String>,
    pub cloudinary_api_secret: Option<String>,
    /// Media host API base, for proxies and fakes.
    pub cloudinary_base_url: Option<String>,
    /// `sha1` or `sha256`.
    pub cloudinary_signature_algorithm: Option<String>,
    /// Timeout for each media host request.
    pub media_timeout_secs: Option<u64>,
    /// Largest accepted request body.
    pub max_body_bytes: Option<usize>,
    /// Upper bound on pooled database connections.
    pub db_pool_max_size: Option<u32>,
    pub db_pool_min_idle: Option<u32>,
    /// How long to wait for a database connection, at startup and per request.
    pub db_connect_timeout_secs: Option<u64>,
    /// Comma-separated browser origins allowed to call the API; `*` or unset
    /// allows any.
    pub cors_allowed_origins: Option<String>,
    /// Report validation failures as 500 for older clients.
    pub legacy_status_codes: Option<bool>,
    /// Apply pending migrations before serving.
    pub run_migrations: Option<bool>,
}

/// Settings that cannot start a server.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("HOMESTOCK_DATABASE_URL is required")]
    MissingDatabaseUrl,
    #[error("HOMESTOCK_CLOUDINARY_{0} is required")]
    MissingMediaSetting(&'static str),
    #[error(transparent)]
    Media(#[from] CloudinaryConfigError),
    #[error("invalid HOMESTOCK_CLOUDINARY_BASE_URL: {0}")]
    MediaBaseUrl(#[from] url::ParseError),
    #[error(transparent)]
    SignatureAlgorithm(#[from] UnknownSignatureAlgorithm),
}

/// Everything needed to build the media adapter.
#[derive(Debug, Clone)]
pub struct MediaSettings {
    pub base_url: Url,
    pub credentials: CloudinaryCredentials,
    pub algorithm: SignatureAlgorithm,
    pub timeout: Duration,
}

fn required<'a>(value: Option<&'a String>, name: &'static str) -> Result<&'a str, SettingsError> {
    value
        .map(String::as_str)
        .filter(|value| !value.trim().is_empty())
        .ok_or(SettingsError::MissingMediaSetting(name))
}

impl AppSettings {
    /// The configured database URL.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::MissingDatabaseUrl`] when unset or blank.
    pub fn database_url(&self) -> Result<&str, SettingsError> {
        self.database_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .ok_or(SettingsError::MissingDatabaseUrl)
    }

    /// Pool settings for the configured database.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::MissingDatabaseUrl`] when no URL is set.
    pub fn pool_config(&self) -> Result<PoolConfig, SettingsError> {
        let mut config = PoolConfig::new(self.database_url()?).with_min_idle(self.db_pool_min_idle);
        if let Some(max_size) = self.db_pool_max_size {
            config = config.with_max_size(max_size);
        }
        if let Some(secs) = self.db_connect_timeout_secs {
            config = config.with_connection_timeout(Duration::from_secs(secs));
        }
        Ok(config)
    }

    pub fn host(&self) -> &str {
        self.host.as_deref().unwrap_or(DEFAULT_HOST)
    }

    pub fn port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }

    pub fn max_body_bytes(&self) -> usize {
        self.max_body_bytes.unwrap_or(DEFAULT_MAX_BODY_BYTES)
    }

    pub fn cors_policy(&self) -> CorsPolicy {
        self.cors_allowed_origins
            .as_deref()
            .map(CorsPolicy::from_origin_list)
            .unwrap_or_default()
    }

    /// Off unless explicitly enabled.
    pub fn legacy_status_codes(&self) -> bool {
        self.legacy_status_codes.unwrap_or(false)
    }

    /// On unless explicitly disabled.
    pub fn run_migrations(&self) -> bool {
        self.run_migrations.unwrap_or(true)
    }

    /// Validate the media host settings.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError`] when a credential is missing, the base URL
    /// does not parse, or the algorithm is unknown.
    pub fn media(&self) -> Result<MediaSettings, SettingsError> {
        let credentials = CloudinaryCredentials::new(
            required(self.cloudinary_cloud_name.as_ref(), "CLOUD_NAME")?,
            required(self.cloudinary_api_key.as_ref(), "API_KEY")?,
            required(self.cloudinary_api_secret.as_ref(), "API_SECRET")?,
        )?;
        let base_url = Url::parse(
            self.cloudinary_base_url
                .as_deref()
                .unwrap_or(DEFAULT_CLOUDINARY_BASE_URL),
        )?;
        let algorithm = self
            .cloudinary_signature_algorithm
            .as_deref()
            .map(str::parse::<SignatureAlgorithm>)
            .transpose()?
            .unwrap_or_default();
        Ok(MediaSettings {
            base_url,
            credentials,
            algorithm,
            timeout: Duration::from_secs(
                self.media_timeout_secs
                    .unwrap_or(DEFAULT_MEDIA_TIMEOUT_SECS),
            ),
        })
    }

    /// Server binding and HTTP policy derived from these settings.
    pub fn server_config(&self) -> ServerConfig {
        ServerConfig::new(self.host(), self.port())
            .with_max_body_bytes(self.max_body_bytes())
            .with_error_policy(ErrorPolicy::from_legacy_flag(self.legacy_status_codes()))
            .with_cors(self.cors_policy())
    }
}

/// Builder-style configuration for creating the HTTP server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub(crate) host: String,
    pub(crate) port: u16,
    pub(crate) max_body_bytes: usize,
    pub(crate) error_policy: ErrorPolicy,
    pub(crate) cors: CorsPolicy,
}

impl ServerConfig {
    #[must_use]
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            error_policy: ErrorPolicy::default(),
            cors: CorsPolicy::default(),
        }
    }

    #[must_use]
    pub fn with_max_body_bytes(mut self, max_body_bytes: usize) -> Self {
        self.max_body_bytes = max_body_bytes;
        self
    }

    #[must_use]
    pub fn with_error_policy(mut self, error_policy: ErrorPolicy) -> Self {
        self.error_policy = error_policy;
        self
    }

    #[must_use]
    pub fn with_cors(mut self, cors: CorsPolicy) -> Self {
        self.cors = cors;
        self
    }

    /// Address the server binds to, as `host:port`.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
