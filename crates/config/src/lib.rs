use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;
use url::Url;

const DEFAULT_CONFIG_FILES: &[&str] = &[
    "frontdesk.toml",
    "config/frontdesk.toml",
    "../frontdesk.toml",
];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub session: SessionConfig,
}

/// Connection settings for the hotel backend.
///
/// `base_url` already includes the `/api` prefix; every request path is
/// joined onto it.
///
/// ```
/// use frontdesk_config::ApiConfig;
///
/// let api = ApiConfig::default();
/// assert_eq!(api.base_url, "http://localhost:5000/api");
/// assert_eq!(api.request_timeout_seconds, 30);
/// assert_eq!(api.verify_path, "protected");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    #[serde(default = "ApiConfig::default_request_timeout")]
    pub request_timeout_seconds: u64,
    #[serde(default = "ApiConfig::default_verify_path")]
    pub verify_path: String,
    #[serde(default = "ApiConfig::default_user_agent")]
    pub user_agent: String,
}

impl ApiConfig {
    fn default_base_url() -> String {
        "http://localhost:5000/api".to_string()
    }

    const fn default_request_timeout() -> u64 {
        30
    }

    fn default_verify_path() -> String {
        "protected".to_string()
    }

    fn default_user_agent() -> String {
        concat!("frontdesk/", env!("CARGO_PKG_VERSION")).to_string()
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: Self::default_base_url(),
            request_timeout_seconds: Self::default_request_timeout(),
            verify_path: Self::default_verify_path(),
            user_agent: Self::default_user_agent(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Location of the persisted session token. A leading `~/` is expanded
    /// from `HOME`.
    pub token_path: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            token_path: "~/.frontdesk/session_token".to_string(),
        }
    }
}

impl SessionConfig {
    /// Resolve `token_path`, expanding a leading `~/`.
    ///
    /// ```
    /// use frontdesk_config::SessionConfig;
    ///
    /// let session = SessionConfig { token_path: "/tmp/frontdesk/token".into() };
    /// assert_eq!(session.resolved_token_path(), std::path::PathBuf::from("/tmp/frontdesk/token"));
    /// ```
    pub fn resolved_token_path(&self) -> PathBuf {
        if let Some(rest) = self.token_path.strip_prefix("~/") {
            if let Some(home) = std::env::var_os("HOME") {
                return PathBuf::from(home).join(rest);
            }
        }
        PathBuf::from(&self.token_path)
    }
}

/// Load the application configuration by combining defaults, files, and environment overrides.
///
/// ```
/// use frontdesk_config::load;
///
/// std::env::remove_var("FRONTDESK_CONFIG");
///
/// let config = load().expect("configuration should load with defaults");
/// assert!(!config.api.base_url.is_empty());
/// ```
pub fn load() -> anyhow::Result<AppConfig> {
    let defaults = AppConfig::default();

    let timeout = i64::try_from(defaults.api.request_timeout_seconds).unwrap_or(i64::MAX);

    let mut builder = config::Config::builder()
        .set_default("api.base_url", defaults.api.base_url.clone())?
        .set_default("api.request_timeout_seconds", timeout)?
        .set_default("api.verify_path", defaults.api.verify_path.clone())?
        .set_default("api.user_agent", defaults.api.user_agent.clone())?
        .set_default("session.token_path", defaults.session.token_path.clone())?;

    let environment_overrides = config::Environment::with_prefix("FRONTDESK").separator("__");

    let mut config_file_attached = false;

    if let Ok(path) = std::env::var("FRONTDESK_CONFIG") {
        builder = builder.add_source(config::File::from(PathBuf::from(&path)));
        config_file_attached = true;
        debug!(path, "loading configuration via FRONTDESK_CONFIG");
    } else if let Ok(cwd) = std::env::current_dir() {
        let fallback = DEFAULT_CONFIG_FILES
            .iter()
            .map(|candidate| cwd.join(candidate))
            .find(|path| path.exists());

        if let Some(path) = fallback {
            debug!(path = %path.display(), "loading configuration file");
            builder = builder.add_source(config::File::from(path));
            config_file_attached = true;
        }
    }

    if !config_file_attached {
        debug!("no configuration file found, relying on defaults and environment overrides");
    }

    builder = builder.add_source(environment_overrides);

    let cfg = builder.build().context("unable to build configuration")?;

    let config = cfg
        .try_deserialize::<AppConfig>()
        .context("invalid configuration")?;

    validate_base_url(&config.api.base_url)?;

    debug!(?config, "loaded client configuration");
    Ok(config)
}

/// Reject base URLs the HTTP client could not use.
pub fn validate_base_url(base_url: &str) -> anyhow::Result<()> {
    let parsed = Url::parse(base_url)
        .with_context(|| format!("invalid api.base_url {base_url:?}"))?;

    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => bail!("api.base_url must use http or https, got {other:?}"),
    }
}
