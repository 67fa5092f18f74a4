//! BOS client configuration.
//!
//! Provides [`BosConfig`], the credentials and addressing used by
//! [`crate::BosClient`]. Values are usually loaded from `BOS_*` environment
//! variables via [`BosConfig::from_env`], or assembled with the typed builder.

use std::fmt;

use rustbos_auth::{Authorizer, Credential, DEFAULT_EXPIRES_IN_SECONDS};
use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

use crate::error::{BosError, BosResult};

/// Default BOS service domain.
pub const DEFAULT_ENDPOINT_DOMAIN: &str = "bcebos.com";

/// Default connect timeout, in seconds.
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// BOS client configuration.
///
/// `access_key`, `secret_key`, `bucket` and `region` are required; the rest
/// have defaults. The secret key is redacted from the `Debug` output.
///
/// # Examples
///
/// ```
/// use rustbos_client::config::BosConfig;
///
/// let config = BosConfig::builder()
///     .access_key("AK".into())
///     .secret_key("SK".into())
///     .bucket("bucket".into())
///     .region("gz".into())
///     .build();
/// assert_eq!(config.host(), "bucket.gz.bcebos.com");
/// assert_eq!(config.base_url(), "https://bucket.gz.bcebos.com");
/// assert!(!format!("{config:?}").contains("SK"));
/// ```
#[derive(Clone, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
pub struct BosConfig {
    /// BCE access key id.
    pub access_key: String,

    /// BCE secret access key.
    pub secret_key: String,

    /// Bucket all object operations address.
    pub bucket: String,

    /// Region of the bucket (e.g. `"gz"`, `"bj"`).
    pub region: String,

    /// Service domain appended to `{bucket}.{region}.`.
    #[builder(default = String::from(DEFAULT_ENDPOINT_DOMAIN))]
    #[serde(default = "default_endpoint_domain")]
    pub endpoint_domain: String,

    /// URL scheme used to reach the service.
    #[builder(default = String::from("https"))]
    #[serde(default = "default_scheme")]
    pub scheme: String,

    /// Base URL requests are sent to instead of `{scheme}://{host}`.
    ///
    /// The `Host` header, and therefore the signature, still names the bucket
    /// host. Useful behind a proxy or against a local test server.
    #[builder(default)]
    #[serde(default)]
    pub endpoint_url: Option<String>,

    /// Connect timeout for the HTTP client, in seconds.
    #[builder(default = DEFAULT_CONNECT_TIMEOUT_SECS)]
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// Default validity window of generated `Authorization` tokens, in seconds.
    #[builder(default = DEFAULT_EXPIRES_IN_SECONDS)]
    #[serde(default = "default_expires_in_seconds")]
    pub expires_in_seconds: u64,
}

impl fmt::Debug for BosConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BosConfig")
            .field("access_key", &self.access_key)
            .field("secret_key", &"<redacted>")
            .field("bucket", &self.bucket)
            .field("region", &self.region)
            .field("endpoint_domain", &self.endpoint_domain)
            .field("scheme", &self.scheme)
            .field("endpoint_url", &self.endpoint_url)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .field("expires_in_seconds", &self.expires_in_seconds)
            .finish()
    }
}

impl BosConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `BOS_ACCESS_KEY` | required |
    /// | `BOS_SECRET_KEY` | required |
    /// | `BOS_BUCKET` | required |
    /// | `BOS_REGION` | required |
    /// | `BOS_ENDPOINT_DOMAIN` | `bcebos.com` |
    /// | `BOS_SCHEME` | `https` |
    /// | `BOS_ENDPOINT_URL` | unset |
    /// | `BOS_CONNECT_TIMEOUT` | `10` |
    /// | `BOS_EXPIRES_IN` | `1800` |
    ///
    /// Unparseable numeric values fall back to their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`BosError::Config`] naming every required variable that is
    /// missing or empty.
    pub fn from_env() -> BosResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary `BOS_*` variable source.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> BosResult<Self> {
        let required = |key: &str| lookup(key).filter(|v| !v.is_empty()).unwrap_or_default();

        let config = Self {
            access_key: required("BOS_ACCESS_KEY"),
            secret_key: required("BOS_SECRET_KEY"),
            bucket: required("BOS_BUCKET"),
            region: required("BOS_REGION"),
            endpoint_domain: lookup("BOS_ENDPOINT_DOMAIN")
                .unwrap_or_else(default_endpoint_domain),
            scheme: lookup("BOS_SCHEME").unwrap_or_else(default_scheme),
            endpoint_url: lookup("BOS_ENDPOINT_URL").filter(|v| !v.is_empty()),
            connect_timeout_secs: lookup("BOS_CONNECT_TIMEOUT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_CONNECT_TIMEOUT_SECS),
            expires_in_seconds: lookup("BOS_EXPIRES_IN")
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_EXPIRES_IN_SECONDS),
        };

        config.validate()?;
        Ok(config)
    }

    /// Check that every required field is set.
    ///
    /// # Errors
    ///
    /// Returns [`BosError::Config`] with the message
    /// `invalid config, missing: a,b` listing each empty required field.
    pub fn validate(&self) -> BosResult<()> {
        let missing: Vec<&str> = [
            ("access_key", &self.access_key),
            ("secret_key", &self.secret_key),
            ("bucket", &self.bucket),
            ("region", &self.region),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(name, _)| name)
        .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(BosError::Config(format!(
                "invalid config, missing: {}",
                missing.join(",")
            )))
        }
    }

    /// The virtual host of the bucket: `{bucket}.{region}.{endpoint_domain}`.
    #[must_use]
    pub fn host(&self) -> String {
        format!("{}.{}.{}", self.bucket, self.region, self.endpoint_domain)
    }

    /// The URL prefix request paths are appended to, without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> String {
        match &self.endpoint_url {
            Some(url) => url.trim_end_matches('/').to_owned(),
            None => format!("{}://{}", self.scheme, self.host()),
        }
    }

    /// The signing credential described by this configuration.
    #[must_use]
    pub fn credential(&self) -> Credential {
        Credential::new(self.access_key.clone(), self.secret_key.clone())
    }

    /// An [`Authorizer`] using this configuration's credential and expiry.
    #[must_use]
    pub fn authorizer(&self) -> Authorizer {
        Authorizer::with_default_expiry(self.credential(), self.expires_in_seconds)
    }
}

fn default_endpoint_domain() -> String {
    String::from(DEFAULT_ENDPOINT_DOMAIN)
}

fn default_scheme() -> String {
    String::from("https")
}

fn default_connect_timeout_secs() -> u64 {
    DEFAULT_CONNECT_TIMEOUT_SECS
}

fn default_expires_in_seconds() -> u64 {
    DEFAULT_EXPIRES_IN_SECONDS
}
