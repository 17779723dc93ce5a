//! In-memory stand-in for the credential store, used by unit tests

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use async_trait::async_trait;
use futures::channel::oneshot;

use crate::client::{CredentialClient, HttpRequest, HttpResponse, Method, Transport};
use crate::config::{BasicCredentials, ClientConfig};
use crate::credential::{Credential, CredentialId, NewCredential};
use crate::error::ClientError;

#[derive(Default)]
struct StoreState {
    records: RefCell<Vec<Credential>>,
    next_id: Cell<u64>,
    list_calls: Cell<usize>,
    search_calls: Cell<usize>,
    create_calls: Cell<usize>,
    requests: RefCell<Vec<HttpRequest>>,
    overrides: RefCell<VecDeque<Result<HttpResponse, ClientError>>>,
    holding: Cell<bool>,
    waiting: RefCell<Vec<oneshot::Sender<()>>>,
}

/// Serves `/logins/` the way the real store does: the full list wrapped in
/// `Data`, searches as a bare array, creates echoing the stored record.
#[derive(Clone, Default)]
pub struct FakeStore {
    state: Rc<StoreState>,
}

impl FakeStore {
    pub fn new() -> Self {
        let store = FakeStore::default();
        store.state.next_id.set(1);
        store
    }

    pub fn with_records(records: &[(&str, &str, &str)]) -> Self {
        let store = FakeStore::new();
        for (url, username, password) in records {
            store.insert(&NewCredential::new(*url, *username, *password));
        }
        store
    }

    pub fn insert(&self, new: &NewCredential) -> Credential {
        let id = self.state.next_id.get();
        self.state.next_id.set(id + 1);
        let record = Credential {
            id: CredentialId::Number(id),
            url: new.url.clone(),
            username: new.username.clone(),
            password: new.password.clone(),
        };
        self.state.records.borrow_mut().push(record.clone());
        record
    }

    /// Answer the next request with `err` instead of consulting the records
    pub fn fail_next(&self, err: ClientError) {
        self.state.overrides.borrow_mut().push_back(Err(err));
    }

    pub fn respond_next(&self, response: HttpResponse) {
        self.state.overrides.borrow_mut().push_back(Ok(response));
    }

    /// Park responses until `release` is called. A parked response is built
    /// when the request arrives, so it reflects the records at that moment.
    pub fn hold(&self) {
        self.state.holding.set(true);
    }

    pub fn release(&self) {
        self.state.holding.set(false);
        for waiter in self.state.waiting.borrow_mut().drain(..) {
            let _ = waiter.send(());
        }
    }

    pub fn list_calls(&self) -> usize {
        self.state.list_calls.get()
    }

    pub fn search_calls(&self) -> usize {
        self.state.search_calls.get()
    }

    pub fn create_calls(&self) -> usize {
        self.state.create_calls.get()
    }

    pub fn last_request(&self) -> Option<HttpRequest> {
        self.state.requests.borrow().last().cloned()
    }

    fn respond(&self, request: &HttpRequest) -> Result<HttpResponse, ClientError> {
        if let Some(response) = self.state.overrides.borrow_mut().pop_front() {
            return response;
        }

        let body = match request.method {
            Method::Get => {
                let search = request
                    .url
                    .query_pairs()
                    .find(|(name, _)| name == "Search")
                    .map(|(_, value)| value.into_owned());
                let records = self.state.records.borrow();
                match search {
                    Some(term) => {
                        let matched: Vec<&Credential> =
                            records.iter().filter(|c| c.url.contains(&term)).collect();
                        serde_json::to_string(&matched)
                    }
                    None => serde_json::to_string(&serde_json::json!({ "Data": records.as_slice() })),
                }
            }
            Method::Post => {
                let new: NewCredential = serde_json::from_str(request.body.as_deref().unwrap_or(""))
                    .map_err(|e| ClientError::Protocol(e.to_string()))?;
                serde_json::to_string(&self.insert(&new))
            }
        }
        .map_err(|e| ClientError::Protocol(e.to_string()))?;

        Ok(HttpResponse { status: 200, body })
    }
}

#[async_trait(?Send)]
impl Transport for FakeStore {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ClientError> {
        match request.method {
            Method::Get if request.url.query().is_some() => {
                self.state.search_calls.set(self.state.search_calls.get() + 1)
            }
            Method::Get => self.state.list_calls.set(self.state.list_calls.get() + 1),
            Method::Post => self.state.create_calls.set(self.state.create_calls.get() + 1),
        }
        self.state.requests.borrow_mut().push(request.clone());

        let response = self.respond(&request);
        if self.state.holding.get() {
            let (tx, rx) = oneshot::channel();
            self.state.waiting.borrow_mut().push(tx);
            rx.await
                .map_err(|_| ClientError::Transport("request abandoned".to_string()))?;
        }
        response
    }
}

pub fn test_client(store: &FakeStore) -> CredentialClient {
    let credentials = Rc::new(BasicCredentials::new("test", "secret"));
    let config = match ClientConfig::new("http://localhost:3625", credentials) {
        Ok(config) => config,
        Err(e) => panic!("test config rejected: {}", e),
    };
    CredentialClient::new(config, Rc::new(store.clone()))
}
