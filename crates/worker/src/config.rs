use std::path::PathBuf;
use std::time::Duration;

use charsync_core::FingerprintAlgorithm;
use charsync_remote::UploadConfig;

/// Sync configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Unauthenticated root of the published static files.
    pub static_url: String,
    /// Signed upload endpoint, key and site.
    pub upload: UploadConfig,
    /// Root of the local `data/` and `version/` snapshot (default: `.`).
    pub snapshot_dir: PathBuf,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Avatars processed concurrently (default: `1`).
    pub upload_concurrency: usize,
    /// Version marker digest (default: `md5`).
    pub algorithm: FingerprintAlgorithm,
}

/// Errors raised while reading [`SyncConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} environment variable is required")]
    Missing(&'static str),

    #[error("{var} has invalid value {value:?}: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

impl SyncConfig {
    /// Load configuration from the process environment.
    ///
    /// | Env Var                 | Default    |
    /// |-------------------------|------------|
    /// | `STATIC_URL`            | required   |
    /// | `UPLOAD_URL`            | required   |
    /// | `UPLOAD_KEY`            | required   |
    /// | `UPLOAD_SITE`           | `static`   |
    /// | `SNAPSHOT_DIR`          | `.`        |
    /// | `REQUEST_TIMEOUT_SECS`  | `30`       |
    /// | `UPLOAD_CONCURRENCY`    | `1`        |
    /// | `FINGERPRINT_ALGORITHM` | `md5`      |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let required = |var: &'static str| {
            lookup(var)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::Missing(var))
        };
        let or_default = |var: &str, default: &str| lookup(var).unwrap_or_else(|| default.into());

        let static_url = required("STATIC_URL")?;
        let upload = UploadConfig {
            endpoint: required("UPLOAD_URL")?,
            key: required("UPLOAD_KEY")?,
            site: or_default("UPLOAD_SITE", "static"),
        };
        let snapshot_dir = PathBuf::from(or_default("SNAPSHOT_DIR", "."));

        let request_timeout_secs: u64 = parse(
            "REQUEST_TIMEOUT_SECS",
            or_default("REQUEST_TIMEOUT_SECS", "30"),
        )?;

        let upload_concurrency: usize =
            parse("UPLOAD_CONCURRENCY", or_default("UPLOAD_CONCURRENCY", "1"))?;
        if upload_concurrency == 0 {
            return Err(ConfigError::Invalid {
                var: "UPLOAD_CONCURRENCY",
                value: "0".into(),
                reason: "must be at least 1".into(),
            });
        }

        let algorithm: FingerprintAlgorithm = parse(
            "FINGERPRINT_ALGORITHM",
            or_default("FINGERPRINT_ALGORITHM", FingerprintAlgorithm::default().name()),
        )?;

        Ok(Self {
            static_url,
            upload,
            snapshot_dir,
            request_timeout_secs,
            upload_concurrency,
            algorithm,
        })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn parse<T>(var: &'static str, value: String) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        var,
        reason: e.to_string(),
        value,
    })
}
