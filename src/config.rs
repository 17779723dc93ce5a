/// Client configuration: store location and the credential presented to it
use std::fmt;
use std::rc::Rc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::ConfigError;

pub const DEFAULT_BASE_URL: &str = "http://localhost:3625";

/// Key under which settings live in `chrome.storage.local`
pub const SETTINGS_STORAGE_KEY: &str = "gpass_settings";

/// Supplies the `Authorization` header value sent with every store request
pub trait CredentialProvider {
    fn authorization(&self) -> String;
}

/// HTTP basic credentials for the store
#[derive(Clone, PartialEq, Eq)]
pub struct BasicCredentials {
    username: String,
    password: String,
}

impl BasicCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        BasicCredentials {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }
}

impl CredentialProvider for BasicCredentials {
    fn authorization(&self) -> String {
        let pair = format!("{}:{}", self.username, self.password);
        format!("Basic {}", STANDARD.encode(pair))
    }
}

impl fmt::Debug for BasicCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Settings as persisted by the extension options
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientSettings {
    pub base_url: String,
    pub username: String,
    pub password: String,
}

impl Default for ClientSettings {
    fn default() -> Self {
        ClientSettings {
            base_url: DEFAULT_BASE_URL.to_string(),
            username: String::new(),
            password: String::new(),
        }
    }
}

impl fmt::Debug for ClientSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientSettings")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Validated, process-wide client configuration
#[derive(Clone)]
pub struct ClientConfig {
    base_url: Url,
    credentials: Rc<dyn CredentialProvider>,
}

impl ClientConfig {
    pub fn new(base_url: &str, credentials: Rc<dyn CredentialProvider>) -> Result<Self, ConfigError> {
        Ok(ClientConfig {
            base_url: parse_base_url(base_url)?,
            credentials,
        })
    }

    pub fn from_settings(settings: &ClientSettings) -> Result<Self, ConfigError> {
        if settings.username.is_empty() || settings.password.is_empty() {
            return Err(ConfigError::MissingCredentials);
        }
        let credentials = BasicCredentials::new(settings.username.clone(), settings.password.clone());
        ClientConfig::new(&settings.base_url, Rc::new(credentials))
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn authorization(&self) -> String {
        self.credentials.authorization()
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

/// Parse the store URL, forcing a trailing slash so relative joins keep any
/// path prefix the store is mounted under.
fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidBaseUrl {
        url: raw.to_string(),
        reason,
    };

    let mut url = Url::parse(raw.trim()).map_err(|e| invalid(e.to_string()))?;
    if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
        return Err(invalid("expected an http or https URL".to_string()));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url.set_query(None);
    url.set_fragment(None);
    Ok(url)
}
