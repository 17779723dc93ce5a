/// One-shot lookup for the popup: active tab → lookup key → matching logins
use async_trait::async_trait;
use log::{debug, info, warn};

use crate::client::CredentialClient;
use crate::credential::Credential;
use crate::domain::{LookupKey, normalize_url};
use crate::error::LookupError;

/// The host browser's view of the current window
#[async_trait(?Send)]
pub trait ActiveTabSource {
    /// URL of the active tab in the current window, if there is one
    async fn active_tab_url(&self) -> Option<String>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum LookupOutcome {
    Matches {
        key: LookupKey,
        records: Vec<Credential>,
    },
    /// The store holds nothing for this key. Not an error.
    NoMatch { key: LookupKey },
}

impl LookupOutcome {
    pub fn key(&self) -> &LookupKey {
        match self {
            LookupOutcome::Matches { key, .. } | LookupOutcome::NoMatch { key } => key,
        }
    }

    pub fn records(&self) -> &[Credential] {
        match self {
            LookupOutcome::Matches { records, .. } => records,
            LookupOutcome::NoMatch { .. } => &[],
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LookupState {
    Idle,
    ReadingTab,
    Normalizing { url: String },
    Querying { key: LookupKey },
    Rendered(LookupOutcome),
    Failed(LookupError),
}

impl LookupState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, LookupState::Rendered(_) | LookupState::Failed(_))
    }
}

/// Runs once per popup open; `run` consumes the flow.
pub struct ExtensionLookupFlow<T: ActiveTabSource> {
    client: CredentialClient,
    tabs: T,
}

impl<T: ActiveTabSource> ExtensionLookupFlow<T> {
    pub fn new(client: CredentialClient, tabs: T) -> Self {
        ExtensionLookupFlow { client, tabs }
    }

    /// Drive the lookup to a terminal state, reporting each transition to
    /// `on_state`. No step is retried. A URL that normalizes to an empty key
    /// renders `NoMatch` without querying the store.
    pub async fn run(self, mut on_state: impl FnMut(&LookupState)) -> LookupState {
        let mut enter = |state: LookupState| {
            debug!("Lookup state: {:?}", state);
            on_state(&state);
            state
        };

        enter(LookupState::Idle);
        enter(LookupState::ReadingTab);

        let Some(url) = self.tabs.active_tab_url().await else {
            warn!("Lookup failed: no active tab");
            return enter(LookupState::Failed(LookupError::NoActiveTab));
        };

        enter(LookupState::Normalizing { url: url.clone() });
        let key = normalize_url(&url);
        if key.is_empty() {
            // an empty Search term would match every record
            info!("Active tab has no host, skipping lookup");
            return enter(LookupState::Rendered(LookupOutcome::NoMatch { key }));
        }

        enter(LookupState::Querying { key: key.clone() });
        let state = match self.client.list_by_key(&key).await {
            Ok(records) if records.is_empty() => {
                info!("No credentials for {}", key);
                LookupState::Rendered(LookupOutcome::NoMatch { key })
            }
            Ok(records) => {
                info!("Found {} credentials for {}", records.len(), key);
                LookupState::Rendered(LookupOutcome::Matches { key, records })
            }
            Err(e) => {
                warn!("Lookup for {} failed: {}", key, e);
                LookupState::Failed(LookupError::Client(e))
            }
        };
        enter(state)
    }
}
