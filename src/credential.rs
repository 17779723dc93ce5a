/// Credential records and the wire shapes the store exchanges
use std::fmt;
use std::ops::Deref;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Server-assigned record identity. The store may hand out numbers or strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CredentialId {
    Number(u64),
    Text(String),
}

impl fmt::Display for CredentialId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialId::Number(n) => write!(f, "{}", n),
            CredentialId::Text(s) => f.write_str(s),
        }
    }
}

/// A stored login
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct Credential {
    #[serde(rename = "ID", alias = "id")]
    pub id: CredentialId,
    #[serde(rename = "URL", alias = "url")]
    pub url: String,
    #[serde(rename = "Username", alias = "username")]
    pub username: String,
    #[serde(rename = "Password", alias = "password")]
    pub password: String,
}

impl Credential {
    /// True when this record carries the same url/username/password as `new`
    pub fn matches(&self, new: &NewCredential) -> bool {
        self.url == new.url && self.username == new.username && self.password == new.password
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("id", &self.id)
            .field("url", &self.url)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Fields submitted when creating a login; the store assigns the id
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewCredential {
    #[serde(rename = "URL")]
    pub url: String,
    #[serde(rename = "Username")]
    pub username: String,
    #[serde(rename = "Password")]
    pub password: String,
}

impl NewCredential {
    pub fn new(url: impl Into<String>, username: impl Into<String>, password: impl Into<String>) -> Self {
        NewCredential {
            url: url.into(),
            username: username.into(),
            password: password.into(),
        }
    }

    /// URL and username are required. An empty password is left for the
    /// store to generate.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.url.trim().is_empty() {
            return Err(ValidationError::MissingUrl);
        }
        if self.username.trim().is_empty() {
            return Err(ValidationError::MissingUsername);
        }
        Ok(())
    }
}

impl fmt::Debug for NewCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewCredential")
            .field("url", &self.url)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Point-in-time copy of every record the cache knows about.
///
/// Cloning shares the underlying records; a snapshot is never edited, only
/// replaced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollectionSnapshot {
    records: Rc<[Credential]>,
}

impl CollectionSnapshot {
    pub fn new(records: Vec<Credential>) -> Self {
        CollectionSnapshot {
            records: records.into(),
        }
    }

    pub fn records(&self) -> &[Credential] {
        &self.records
    }

    pub fn find(&self, id: &CredentialId) -> Option<&Credential> {
        self.records.iter().find(|c| &c.id == id)
    }

    /// True when both snapshots share the same allocation
    pub fn ptr_eq(&self, other: &CollectionSnapshot) -> bool {
        Rc::ptr_eq(&self.records, &other.records)
    }
}

impl Deref for CollectionSnapshot {
    type Target = [Credential];

    fn deref(&self) -> &Self::Target {
        &self.records
    }
}

impl From<Vec<Credential>> for CollectionSnapshot {
    fn from(records: Vec<Credential>) -> Self {
        CollectionSnapshot::new(records)
    }
}

/// List responses come wrapped in `Data` from the web endpoint and bare from
/// the search endpoint.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ListResponse {
    Envelope {
        #[serde(rename = "Data", alias = "data")]
        data: Vec<Credential>,
    },
    Bare(Vec<Credential>),
}

impl ListResponse {
    pub(crate) fn into_records(self) -> Vec<Credential> {
        match self {
            ListResponse::Envelope { data } => data,
            ListResponse::Bare(records) => records,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum CreateResponse {
    Envelope {
        #[serde(rename = "Data", alias = "data")]
        data: Credential,
    },
    Bare(Credential),
}

impl CreateResponse {
    pub(crate) fn into_record(self) -> Credential {
        match self {
            CreateResponse::Envelope { data } => data,
            CreateResponse::Bare(record) => record,
        }
    }
}
