//! Fetch deduplication keyed by descriptor alias.
//!
//! The coordinator guarantees at most one in-flight transport call per alias
//! key: the first caller to observe `New` performs the fetch, and every
//! caller observing `Pending` before it settles receives the same shared
//! future and thus the same eventual value. The ledger check and the
//! registration happen under one lock acquisition, before any suspension
//! point. There is no timeout, cancellation, or eviction.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use futures::future::{BoxFuture, FutureExt, Shared};
use log::debug;
use serde_json::{Map, Value};

use crate::report;
use crate::resolver::PathContext;
use crate::store::StateTree;
use crate::transport::HttpClient;

/// The settled-once handle concurrent callers await. Resolves to the
/// hydrated payload, or `None` when the fetch failed.
pub type SharedRequest = Shared<BoxFuture<'static, Option<Value>>>;

/// Inputs the coordinator needs from a resolved descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
    pub alias: String,
    pub endpoint: String,
    pub need_fetch: bool,
    pub store_path: String,
}

impl From<&PathContext> for RequestDescriptor {
    fn from(ctx: &PathContext) -> Self {
        Self {
            alias: ctx.alias().to_string(),
            endpoint: ctx.endpoint.clone(),
            need_fetch: ctx
                .action
                .as_ref()
                .map(|action| action.need_fetch)
                .unwrap_or(false),
            store_path: ctx.path.clone(),
        }
    }
}

/// Classification of a descriptor against the ledger. The check order is
/// fixed: existing store data is authoritative over a lingering pending
/// entry with the same alias.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateStatus {
    Existing,
    Pending,
    New,
}

/// What a caller renders from: a value already hydrated in the store, a
/// fetch already in flight, or a freshly created request.
#[derive(Clone)]
pub enum InitState {
    Existing(Value),
    Pending(SharedRequest),
    New(SharedRequest),
}

impl InitState {
    pub fn status(&self) -> StateStatus {
        match self {
            InitState::Existing(_) => StateStatus::Existing,
            InitState::Pending(_) => StateStatus::Pending,
            InitState::New(_) => StateStatus::New,
        }
    }

    /// Awaits the hydrated value regardless of classification.
    pub async fn value(self) -> Option<Value> {
        match self {
            InitState::Existing(value) => Some(value),
            InitState::Pending(request) | InitState::New(request) => request.await,
        }
    }
}

/// The deduplication ledger: hydrated data mirrored by store path, plus one
/// pending handle per alias.
struct Ledger {
    store: StateTree,
    pending: HashMap<String, SharedRequest>,
}

struct Inner {
    ledger: Mutex<Ledger>,
    http: Arc<dyn HttpClient>,
}

/// Deduplicates concurrent fetches for the same logical resource.
///
/// Only the root handle creates the ledger; child handles share it by
/// reference and never create their own. That sharing is the boundary of
/// the whole coordination mechanism.
#[derive(Clone)]
pub struct RequestCoordinator {
    inner: Arc<Inner>,
}

impl RequestCoordinator {
    /// Creates the root coordinator and its empty ledger.
    pub fn root(http: Arc<dyn HttpClient>) -> Self {
        Self {
            inner: Arc::new(Inner {
                ledger: Mutex::new(Ledger {
                    store: StateTree::new(),
                    pending: HashMap::new(),
                }),
                http,
            }),
        }
    }

    /// A child handle reading and writing the root's ledger.
    pub fn child(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Ledger> {
        self.inner.ledger.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn classify(ledger: &Ledger, request: &RequestDescriptor) -> StateStatus {
        if ledger.store.has(&request.store_path) {
            StateStatus::Existing
        } else if ledger.pending.contains_key(&request.alias) {
            StateStatus::Pending
        } else {
            StateStatus::New
        }
    }

    /// Classifies a descriptor without mutating the ledger.
    pub fn status(&self, request: &RequestDescriptor) -> StateStatus {
        Self::classify(&self.lock(), request)
    }

    /// The hydrated value at `path`, if present.
    pub fn stored(&self, path: &str) -> Option<Value> {
        self.lock().store.get(path).cloned()
    }

    /// Returns the state backing a descriptor, creating and registering a
    /// request when none exists yet.
    pub fn init_state(&self, request: &RequestDescriptor) -> InitState {
        let mut ledger = self.lock();
        match Self::classify(&ledger, request) {
            StateStatus::Existing => {
                let value = ledger
                    .store
                    .get(&request.store_path)
                    .cloned()
                    .unwrap_or(Value::Null);
                InitState::Existing(value)
            }
            StateStatus::Pending => match ledger.pending.get(&request.alias) {
                Some(shared) => InitState::Pending(shared.clone()),
                None => InitState::New(self.create_request(&mut ledger, request)),
            },
            StateStatus::New => InitState::New(self.create_request(&mut ledger, request)),
        }
    }

    /// Builds the request future. A descriptor that needs no fetch resolves
    /// immediately to an empty payload and is never registered. A fetching
    /// request is registered under its alias while the lock is still held
    /// and deregistered again before the future settles for observers, on
    /// success and on failure alike; failures are reported and swallowed.
    fn create_request(&self, ledger: &mut Ledger, request: &RequestDescriptor) -> SharedRequest {
        if !request.need_fetch {
            return futures::future::ready(Some(Value::Object(Map::new())))
                .boxed()
                .shared();
        }

        let http = Arc::clone(&self.inner.http);
        let ledger_ref: Weak<Inner> = Arc::downgrade(&self.inner);
        let alias = request.alias.clone();
        let endpoint = request.endpoint.clone();
        let store_path = request.store_path.clone();

        let shared = async move {
            let outcome = http.get(&endpoint).await;
            if let Some(inner) = ledger_ref.upgrade() {
                let mut ledger = inner.ledger.lock().unwrap_or_else(PoisonError::into_inner);
                ledger.pending.remove(&alias);
                if let Ok(value) = &outcome {
                    ledger.store.set(&store_path, value.clone());
                }
            }
            match outcome {
                Ok(value) => Some(value),
                Err(err) => {
                    report::error(&err.to_string());
                    None
                }
            }
        }
        .boxed()
        .shared();

        debug!("registering request {}", request.alias);
        ledger.pending.insert(request.alias.clone(), shared.clone());
        shared
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::TransportError;
    use async_trait::async_trait;
    use serde_json::json;

    struct EmptyClient;

    #[async_trait]
    impl HttpClient for EmptyClient {
        async fn get(&self, _endpoint: &str) -> Result<Value, TransportError> {
            Ok(json!({}))
        }
    }

    fn request() -> RequestDescriptor {
        RequestDescriptor {
            alias: "vehicles.5".to_string(),
            endpoint: "vehicles/5".to_string(),
            need_fetch: true,
            store_path: "vehicles.5".to_string(),
        }
    }

    #[test]
    fn test_existing_store_wins_over_stale_pending_entry() {
        let coordinator = RequestCoordinator::root(Arc::new(EmptyClient));
        let request = request();

        // register a pending entry, then hydrate the store behind its back;
        // should not happen under correct deregistration, but the check
        // order makes the store authoritative
        let state = coordinator.init_state(&request);
        assert_eq!(state.status(), StateStatus::New);
        coordinator
            .lock()
            .store
            .set("vehicles.5", json!({ "cached": true }));

        assert_eq!(coordinator.status(&request), StateStatus::Existing);
        let state = coordinator.init_state(&request);
        assert_eq!(state.status(), StateStatus::Existing);
        assert_eq!(
            tokio_test::block_on(state.value()),
            Some(json!({ "cached": true }))
        );
    }

    #[test]
    fn test_classification_order_is_existing_pending_new() {
        let coordinator = RequestCoordinator::root(Arc::new(EmptyClient));
        let request = request();
        assert_eq!(coordinator.status(&request), StateStatus::New);

        coordinator.init_state(&request);
        assert_eq!(coordinator.status(&request), StateStatus::Pending);

        coordinator.lock().store.set("vehicles.5", json!({}));
        assert_eq!(coordinator.status(&request), StateStatus::Existing);
    }
}
