/// Keeps the web table bound to the shared cache for as long as it is mounted

use log::{info, warn};

use crate::cache::{CredentialCache, Revalidation, SubscriptionId};
use crate::client::CredentialClient;
use crate::credential::{CollectionSnapshot, Credential, NewCredential};
use crate::error::CreateError;

/// Entry point for the web view. Holds the cache so every session mounted
/// from it shares one snapshot.
#[derive(Clone)]
pub struct WebSyncFlow {
    cache: CredentialCache,
}

impl WebSyncFlow {
    pub fn new(cache: CredentialCache) -> Self {
        WebSyncFlow { cache }
    }

    pub fn cache(&self) -> &CredentialCache {
        &self.cache
    }

    /// Subscribe `on_change` to snapshot replacements. The caller awaits
    /// [`WebSyncSession::refresh`] for the initial load. Dropping the session
    /// unsubscribes.
    pub fn mount(&self, on_change: impl Fn(&CollectionSnapshot) + 'static) -> WebSyncSession {
        let subscription = self.cache.subscribe(on_change);
        info!("Web view mounted");
        WebSyncSession {
            cache: self.cache.clone(),
            subscription,
        }
    }
}

/// A mounted view. Unsubscribes from the cache on drop.
pub struct WebSyncSession {
    cache: CredentialCache,
    subscription: SubscriptionId,
}

impl WebSyncSession {
    pub fn snapshot(&self) -> CollectionSnapshot {
        self.cache.read()
    }

    pub fn is_loading(&self) -> bool {
        self.cache.is_loading()
    }

    /// Refresh control; joins a fetch that is already running
    pub fn refresh(&self) -> Revalidation {
        self.cache.revalidate()
    }

    /// Create a record, then revalidate so it shows up in the snapshot.
    ///
    /// The new row is visible only once that revalidation resolves. A refresh
    /// already in flight may predate the write, so it is not joined; a new
    /// fetch is issued after it. If the
    /// create itself fails nothing is committed and the error is returned so
    /// the form can stay open. A failed follow-up revalidation is logged and
    /// leaves the previous snapshot in place; the created record is still
    /// returned.
    pub fn create(&self, record: NewCredential) -> impl Future<Output = Result<Credential, CreateError>> + 'static {
        let client: CredentialClient = self.cache.client().clone();
        let cache = self.cache.clone();
        async move {
            record.validate()?;
            let created = client.create(&record).await?;
            info!("Created credential {} for {}", created.id, created.url);
            if let Err(e) = cache.revalidate_after_mutation().await {
                warn!("Refresh after create failed: {}", e);
            }
            Ok(created)
        }
    }
}

impl Drop for WebSyncSession {
    fn drop(&mut self) {
        self.cache.unsubscribe(self.subscription);
        info!("Web view unmounted");
    }
}
