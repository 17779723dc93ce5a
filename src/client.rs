/// Authenticated access to the credential store's `/logins/` endpoint
use std::rc::Rc;

use async_trait::async_trait;
use log::debug;
use url::Url;

use crate::config::ClientConfig;
use crate::credential::{Credential, CreateResponse, ListResponse, NewCredential};
use crate::domain::LookupKey;
use crate::error::ClientError;

const LOGINS_PATH: &str = "logins/";
const SEARCH_PARAM: &str = "Search";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: Url,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Moves one request to the store and back. Timeouts belong to the
/// implementation; network failures surface as `ClientError::Transport`.
#[async_trait(?Send)]
pub trait Transport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ClientError>;
}

/// Store client. Errors are returned to the caller without retry.
#[derive(Clone)]
pub struct CredentialClient {
    config: ClientConfig,
    transport: Rc<dyn Transport>,
}

impl CredentialClient {
    pub fn new(config: ClientConfig, transport: Rc<dyn Transport>) -> Self {
        CredentialClient { config, transport }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Fetch the whole collection
    pub async fn list(&self) -> Result<Vec<Credential>, ClientError> {
        let url = self.logins_url()?;
        let body = self.execute(Method::Get, url, None).await?;
        let records = serde_json::from_str::<ListResponse>(&body)?.into_records();
        debug!("Listed {} credentials", records.len());
        Ok(records)
    }

    /// Fetch the records the store matches against `key`. The store decides
    /// how `Search` matches; results are not filtered again here.
    pub async fn list_by_key(&self, key: &LookupKey) -> Result<Vec<Credential>, ClientError> {
        let mut url = self.logins_url()?;
        url.query_pairs_mut().append_pair(SEARCH_PARAM, key.as_str());
        let body = self.execute(Method::Get, url, None).await?;
        let records = serde_json::from_str::<ListResponse>(&body)?.into_records();
        debug!("Search for {:?} matched {} credentials", key.as_str(), records.len());
        Ok(records)
    }

    /// Submit a new record and return it with its server-assigned id
    pub async fn create(&self, record: &NewCredential) -> Result<Credential, ClientError> {
        let url = self.logins_url()?;
        let payload = serde_json::to_string(record)
            .map_err(|e| ClientError::Protocol(format!("failed to encode record: {}", e)))?;
        let body = self.execute(Method::Post, url, Some(payload)).await?;
        let created = serde_json::from_str::<CreateResponse>(&body)?.into_record();
        debug!("Created credential {}", created.id);
        Ok(created)
    }

    fn logins_url(&self) -> Result<Url, ClientError> {
        self.config
            .base_url()
            .join(LOGINS_PATH)
            .map_err(|e| ClientError::Transport(format!("invalid request URL: {}", e)))
    }

    async fn execute(&self, method: Method, url: Url, body: Option<String>) -> Result<String, ClientError> {
        let mut headers = vec![("Authorization".to_string(), self.config.authorization())];
        if body.is_some() {
            headers.push(("Content-Type".to_string(), "application/json".to_string()));
        }

        debug!("{} {}", method.as_str(), url);
        let response = self
            .transport
            .send(HttpRequest {
                method,
                url,
                headers,
                body,
            })
            .await?;

        if !response.is_success() {
            return Err(ClientError::unexpected_status(response.status));
        }
        Ok(response.body)
    }
}
