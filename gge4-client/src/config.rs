//! Client configuration.
//!
//! Loaded from TOML, from `GGE4_*` environment variables, or both (file
//! first, environment overriding).
//!
//! ```toml
//! gateway_id = "AD1234-56"
//! password = "terminal-password"
//! key_id = "123456"
//! hmac_key = "hmac-secret"
//! api_version = "v14"
//! test_mode = true
//!
//! [http]
//! timeout_secs = 60
//! connect_timeout_secs = 30
//! ```

use std::{fmt, path::Path};

use serde::{Deserialize, Deserializer};
use url::Url;
use zeroize::Zeroizing;

use crate::{
    error::{GatewayError, Result},
    request::Credentials,
    signing::RequestSigner,
    transport::{HttpConfig, http::is_loopback_host},
};

/// Production endpoint root.
pub const LIVE_BASE_URL: &str = "https://api.globalgatewaye4.firstdata.com/transaction/";

/// Demo (sandbox) endpoint root.
pub const DEMO_BASE_URL: &str = "https://api.demo.globalgatewaye4.firstdata.com/transaction/";

/// API version used when none is configured.
pub const DEFAULT_API_VERSION: &str = "v12";

/// Environment variable names read by [`ClientConfig::from_env`].
pub mod env {
    /// Gateway ID.
    pub const GATEWAY_ID: &str = "GGE4_GATEWAY_ID";
    /// Terminal password.
    pub const PASSWORD: &str = "GGE4_PASSWORD";
    /// HMAC key id.
    pub const KEY_ID: &str = "GGE4_KEY_ID";
    /// HMAC key.
    pub const HMAC_KEY: &str = "GGE4_HMAC_KEY";
    /// API version.
    pub const API_VERSION: &str = "GGE4_API_VERSION";
    /// `true`/`1` selects the demo endpoint.
    pub const TEST_MODE: &str = "GGE4_TEST_MODE";
    /// Endpoint root override.
    pub const BASE_URL: &str = "GGE4_BASE_URL";
}

/// Gateway client configuration.
#[derive(Clone, Deserialize)]
pub struct ClientConfig {
    /// Gateway ID.
    #[serde(default)]
    pub gateway_id: String,

    /// Terminal password.
    #[serde(default = "empty_secret", deserialize_with = "deserialize_secret")]
    pub password: Zeroizing<String>,

    /// HMAC key id, sent in `Authorization`.
    #[serde(default)]
    pub key_id: String,

    /// HMAC key.
    #[serde(default = "empty_secret", deserialize_with = "deserialize_secret")]
    pub hmac_key: Zeroizing<String>,

    /// API version, appended to the endpoint root.
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Selects the demo endpoint.
    #[serde(default)]
    pub test_mode: bool,

    /// Endpoint root replacing both live and demo roots.
    #[serde(default)]
    pub base_url: Option<String>,

    /// HTTP transport settings.
    #[serde(default)]
    pub http: HttpConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            gateway_id: String::new(),
            password: empty_secret(),
            key_id: String::new(),
            hmac_key: empty_secret(),
            api_version: default_api_version(),
            test_mode: false,
            base_url: None,
            http: HttpConfig::default(),
        }
    }
}

impl ClientConfig {
    /// Creates a configuration with gateway credentials and HMAC key.
    #[must_use]
    pub fn new(gateway_id: &str, password: &str, key_id: &str, hmac_key: &str) -> Self {
        Self {
            gateway_id: gateway_id.to_owned(),
            password: Zeroizing::new(password.to_owned()),
            key_id: key_id.to_owned(),
            hmac_key: Zeroizing::new(hmac_key.to_owned()),
            ..Self::default()
        }
    }

    /// Parses a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::ConfigError`] on malformed TOML or wrong field types.
    ///
    /// # Examples
    ///
    /// ```
    /// use gge4_client::config::ClientConfig;
    ///
    /// let config = ClientConfig::from_toml(
    ///     r#"
    ///     gateway_id = "AD1234-56"
    ///     password = "pw"
    ///     test_mode = true
    ///     "#,
    /// )
    /// .unwrap();
    ///
    /// assert_eq!(config.api_version, "v12");
    /// assert!(config.endpoint().starts_with("https://api.demo."));
    /// ```
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| GatewayError::ConfigError(format!("invalid TOML: {e}")))
    }

    /// Reads and parses a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::ConfigError`] if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            GatewayError::ConfigError(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_toml(&text)
    }

    /// Builds a configuration from `GGE4_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::ConfigError`] if `GGE4_TEST_MODE` is not a boolean.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    /// Overrides fields from the environment; unset variables leave fields as they are.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::ConfigError`] if `GGE4_TEST_MODE` is not a boolean.
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_env(|name| std::env::var(name).ok())
    }

    fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(value) = var(env::GATEWAY_ID) {
            self.gateway_id = value;
        }
        if let Some(value) = var(env::PASSWORD) {
            self.password = Zeroizing::new(value);
        }
        if let Some(value) = var(env::KEY_ID) {
            self.key_id = value;
        }
        if let Some(value) = var(env::HMAC_KEY) {
            self.hmac_key = Zeroizing::new(value);
        }
        if let Some(value) = var(env::API_VERSION) {
            self.api_version = value;
        }
        if let Some(value) = var(env::TEST_MODE) {
            self.test_mode = parse_bool(&value).ok_or_else(|| {
                GatewayError::ConfigError(format!("{} must be true or false", env::TEST_MODE))
            })?;
        }
        if let Some(value) = var(env::BASE_URL) {
            self.base_url = Some(value).filter(|v| !v.is_empty());
        }
        Ok(())
    }

    /// Validates the configuration.
    ///
    /// Credentials may be empty; the gateway reports them as a normal error
    /// response.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::ConfigError`] for an empty or malformed API
    /// version or bad HTTP settings, and [`GatewayError::InvalidGatewayUrl`]
    /// for a base URL that is not an HTTPS URL or points at localhost.
    pub fn validate(&self) -> Result<()> {
        self.validate_api_version()?;

        if let Some(base_url) = &self.base_url {
            validate_base_url(base_url)?;
        }

        self.http.validate()
    }

    /// Checks that the API version is safe to splice into the endpoint path.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::ConfigError`] unless the version is non-empty
    /// and made of ASCII letters, digits and dots.
    pub fn validate_api_version(&self) -> Result<()> {
        if self.api_version.is_empty()
            || !self.api_version.chars().all(|c| c.is_ascii_alphanumeric() || c == '.')
        {
            return Err(GatewayError::ConfigError(format!(
                "api_version must be a non-empty alphanumeric string, got '{}'",
                self.api_version
            )));
        }
        Ok(())
    }

    /// Endpoint root in effect: override, demo or live.
    #[must_use]
    pub fn base_url(&self) -> &str {
        match &self.base_url {
            Some(url) => url.as_str(),
            None if self.test_mode => DEMO_BASE_URL,
            None => LIVE_BASE_URL,
        }
    }

    /// Full endpoint URL: root followed by the API version.
    #[must_use]
    pub fn endpoint(&self) -> String {
        let base = self.base_url();
        if base.ends_with('/') {
            format!("{base}{}", self.api_version)
        } else {
            format!("{base}/{}", self.api_version)
        }
    }

    /// Gateway credentials for request payloads.
    #[must_use]
    pub fn credentials(&self) -> Credentials {
        Credentials::new(&self.gateway_id, &self.password)
    }

    /// Signer for the configured HMAC key.
    #[must_use]
    pub fn signer(&self) -> RequestSigner {
        RequestSigner::new(&self.key_id, &self.hmac_key)
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("gateway_id", &self.gateway_id)
            .field("password", &"[REDACTED]")
            .field("key_id", &self.key_id)
            .field("hmac_key", &"[REDACTED]")
            .field("api_version", &self.api_version)
            .field("test_mode", &self.test_mode)
            .field("base_url", &self.base_url)
            .field("http", &self.http)
            .finish()
    }
}

fn validate_base_url(base_url: &str) -> Result<()> {
    let url = Url::parse(base_url)
        .map_err(|e| GatewayError::InvalidGatewayUrl(format!("invalid base_url '{base_url}': {e}")))?;

    if url.scheme() != "https" {
        return Err(GatewayError::InvalidGatewayUrl(format!(
            "base_url must use HTTPS, got: {}",
            url.scheme()
        )));
    }

    if is_loopback_host(&url) {
        return Err(GatewayError::InvalidGatewayUrl(format!(
            "base_url must not be localhost or loopback: {}",
            url.host_str().unwrap_or_default()
        )));
    }

    Ok(())
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

fn deserialize_secret<'de, D>(deserializer: D) -> std::result::Result<Zeroizing<String>, D::Error>
where
    D: Deserializer<'de>,
{
    String::deserialize(deserializer).map(Zeroizing::new)
}

fn empty_secret() -> Zeroizing<String> {
    Zeroizing::new(String::new())
}

fn default_api_version() -> String {
    DEFAULT_API_VERSION.to_owned()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn apply(config: &mut ClientConfig, vars: &[(&str, &str)]) -> Result<()> {
        let vars: HashMap<String, String> =
            vars.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect();
        config.apply_env(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_client_config_default() {
        let config = ClientConfig::default();
        assert_eq!(config.api_version, "v12");
        assert!(!config.test_mode);
        assert_eq!(config.base_url(), LIVE_BASE_URL);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_client_config_from_toml() {
        let config = ClientConfig::from_toml(
            r#"
            gateway_id = "AD1234-56"
            password = "pw"
            key_id = "777"
            hmac_key = "secret"
            api_version = "v14"
            test_mode = true

            [http]
            timeout_secs = 20
            connect_timeout_secs = 5
            "#,
        )
        .unwrap();

        assert_eq!(config.gateway_id, "AD1234-56");
        assert_eq!(config.password.as_str(), "pw");
        assert_eq!(config.key_id, "777");
        assert_eq!(config.hmac_key.as_str(), "secret");
        assert_eq!(config.endpoint(), format!("{DEMO_BASE_URL}v14"));
        assert_eq!(config.http.timeout_secs, 20);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_client_config_invalid_toml() {
        let err = ClientConfig::from_toml("gateway_id = ").unwrap_err();
        assert!(matches!(err, GatewayError::ConfigError(_)));

        let err = ClientConfig::from_toml("test_mode = \"sometimes\"").unwrap_err();
        assert!(matches!(err, GatewayError::ConfigError(_)));
    }

    #[test]
    fn test_endpoint_selection() {
        let mut config = ClientConfig::default();
        assert_eq!(config.endpoint(), format!("{LIVE_BASE_URL}v12"));

        config.test_mode = true;
        assert_eq!(config.endpoint(), format!("{DEMO_BASE_URL}v12"));

        config.base_url = Some("https://gateway.example.com/transaction".to_owned());
        assert_eq!(config.endpoint(), "https://gateway.example.com/transaction/v12");
    }

    #[test]
    fn test_validate_base_url_rules() {
        let mut config = ClientConfig {
            base_url: Some("http://gateway.example.com/".to_owned()),
            ..ClientConfig::default()
        };
        assert!(matches!(config.validate(), Err(GatewayError::InvalidGatewayUrl(_))));

        for loopback in ["https://127.0.0.1/", "https://127.0.0.2:1/", "https://localhost/", "https://[::1]/"] {
            config.base_url = Some(loopback.to_owned());
            assert!(
                matches!(config.validate(), Err(GatewayError::InvalidGatewayUrl(_))),
                "{loopback} should be rejected"
            );
        }

        config.base_url = Some("not a url".to_owned());
        assert!(matches!(config.validate(), Err(GatewayError::InvalidGatewayUrl(_))));

        config.base_url = Some("https://gateway.example.com/transaction/".to_owned());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_api_version() {
        let mut config = ClientConfig { api_version: String::new(), ..ClientConfig::default() };
        assert!(matches!(config.validate(), Err(GatewayError::ConfigError(_))));

        config.api_version = "v12/../admin".to_owned();
        assert!(config.validate().is_err());

        config.api_version = "v9".to_owned();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_apply_env_overrides_fields() {
        let mut config = ClientConfig::from_toml("gateway_id = \"from-file\"").unwrap();
        apply(
            &mut config,
            &[
                (env::PASSWORD, "env-pw"),
                (env::HMAC_KEY, "env-key"),
                (env::KEY_ID, "42"),
                (env::API_VERSION, "v13"),
                (env::TEST_MODE, "true"),
            ],
        )
        .unwrap();

        assert_eq!(config.gateway_id, "from-file");
        assert_eq!(config.password.as_str(), "env-pw");
        assert_eq!(config.hmac_key.as_str(), "env-key");
        assert_eq!(config.key_id, "42");
        assert_eq!(config.api_version, "v13");
        assert!(config.test_mode);
    }

    #[test]
    fn test_apply_env_invalid_test_mode() {
        let mut config = ClientConfig::default();
        let err = apply(&mut config, &[(env::TEST_MODE, "maybe")]).unwrap_err();
        assert!(err.to_string().contains("GGE4_TEST_MODE"));
    }

    #[test]
    fn test_apply_env_empty_base_url_clears_override() {
        let mut config = ClientConfig {
            base_url: Some("https://gateway.example.com/".to_owned()),
            ..ClientConfig::default()
        };
        apply(&mut config, &[(env::BASE_URL, "")]).unwrap();
        assert_eq!(config.base_url, None);
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = ClientConfig::new("AD1234-56", "terminal-pw", "777", "hmac-secret");
        let debug = format!("{config:?}");
        assert!(debug.contains("AD1234-56"));
        assert!(!debug.contains("terminal-pw"));
        assert!(!debug.contains("hmac-secret"));
    }

    #[test]
    fn test_credentials_and_signer() {
        let config = ClientConfig::new("AD1234-56", "pw", "777", "secret");
        assert_eq!(config.credentials().gateway_id, "AD1234-56");
        assert_eq!(config.signer().key_id(), "777");
    }
}
