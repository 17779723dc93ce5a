/// Process-wide cache of the credential collection
///
/// One snapshot shared by every view. `revalidate` refetches it, with at most
/// one `list()` in flight: callers arriving while a fetch is pending await
/// that same fetch and observe the same result.
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use futures::future::{FutureExt, LocalBoxFuture, Shared};
use log::{debug, info, warn};

use crate::client::CredentialClient;
use crate::credential::CollectionSnapshot;
use crate::error::ClientError;

pub type RevalidateResult = Result<CollectionSnapshot, ClientError>;

/// Future returned by [`CredentialCache::revalidate`]. Owns everything it
/// needs, so it can be spawned from a UI callback.
pub type Revalidation = Shared<LocalBoxFuture<'static, RevalidateResult>>;

type Listener = Rc<dyn Fn(&CollectionSnapshot)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

struct CacheState {
    client: CredentialClient,
    snapshot: RefCell<CollectionSnapshot>,
    pending: RefCell<Option<Revalidation>>,
    in_flight: Cell<bool>,
    listeners: RefCell<Vec<(SubscriptionId, Listener)>>,
    next_subscription: Cell<u64>,
}

/// Cheap to clone; clones share one snapshot.
#[derive(Clone)]
pub struct CredentialCache {
    state: Rc<CacheState>,
}

impl CredentialCache {
    /// Starts empty; nothing is fetched until the first `revalidate`.
    pub fn new(client: CredentialClient) -> Self {
        CredentialCache {
            state: Rc::new(CacheState {
                client,
                snapshot: RefCell::new(CollectionSnapshot::default()),
                pending: RefCell::new(None),
                in_flight: Cell::new(false),
                listeners: RefCell::new(Vec::new()),
                next_subscription: Cell::new(0),
            }),
        }
    }

    pub fn client(&self) -> &CredentialClient {
        &self.state.client
    }

    /// Last known snapshot, or empty before the first successful load
    pub fn read(&self) -> CollectionSnapshot {
        self.state.snapshot.borrow().clone()
    }

    /// True while a `list()` request is outstanding. A revalidation that
    /// nobody has polled yet does not count.
    pub fn is_loading(&self) -> bool {
        self.state.in_flight.get()
    }

    /// Fetch a fresh snapshot, joining the in-flight fetch if there is one.
    ///
    /// On success the snapshot is swapped wholesale and every listener is
    /// notified. On failure the previous snapshot stays, listeners hear
    /// nothing, and only the awaiting callers get the error.
    pub fn revalidate(&self) -> Revalidation {
        if let Some(pending) = self.state.pending.borrow().as_ref() {
            debug!("Joining in-flight revalidation");
            return pending.clone();
        }

        let state = Rc::clone(&self.state);
        let fetch = async move {
            state.in_flight.set(true);
            let result = state.client.list().await;
            state.in_flight.set(false);
            state.pending.borrow_mut().take();
            match result {
                Ok(records) => {
                    let snapshot = CollectionSnapshot::new(records);
                    *state.snapshot.borrow_mut() = snapshot.clone();
                    info!("Cache revalidated: {} credentials", snapshot.len());
                    state.notify(&snapshot);
                    Ok(snapshot)
                }
                Err(e) => {
                    warn!("Revalidation failed, keeping previous snapshot: {}", e);
                    Err(e)
                }
            }
        }
        .boxed_local()
        .shared();

        *self.state.pending.borrow_mut() = Some(fetch.clone());
        fetch
    }

    /// Revalidate after the caller changed the store.
    ///
    /// A fetch already in flight may have been answered before the change,
    /// so it is awaited and then a new one issued. Without a pending fetch
    /// this is a plain `revalidate`.
    pub fn revalidate_after_mutation(&self) -> LocalBoxFuture<'static, RevalidateResult> {
        let stale = self.state.pending.borrow().clone();
        let cache = self.clone();
        async move {
            if let Some(stale) = stale {
                debug!("Waiting out a revalidation that predates the mutation");
                let _ = stale.await;
            }
            cache.revalidate().await
        }
        .boxed_local()
    }

    /// Register `listener` to receive every replacement snapshot
    pub fn subscribe(&self, listener: impl Fn(&CollectionSnapshot) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.state.next_subscription.get());
        self.state.next_subscription.set(id.0 + 1);
        self.state.listeners.borrow_mut().push((id, Rc::new(listener)));
        debug!("Subscribed listener {:?}", id);
        id
    }

    /// Returns false if `id` was not subscribed
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.state.listeners.borrow_mut();
        let original_len = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        listeners.len() < original_len
    }

    pub fn subscriber_count(&self) -> usize {
        self.state.listeners.borrow().len()
    }
}

impl CacheState {
    fn notify(&self, snapshot: &CollectionSnapshot) {
        // Listeners may (un)subscribe while being notified.
        let listeners: Vec<Listener> = self
            .listeners
            .borrow()
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();
        for listener in listeners {
            listener(snapshot);
        }
    }
}
