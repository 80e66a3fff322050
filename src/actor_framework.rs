//! Generic single-owner document collection.
//!
//! Every collection (books, users, orders, payments) is a [`ResourceActor`]: one task
//! owns the documents and serves requests one at a time, so each request is an
//! atomic single-document operation. Callers talk to it through a cloneable
//! [`ResourceClient`].

use std::collections::HashMap;
use std::fmt::{Debug, Display};
use std::hash::Hash;

use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info, instrument, warn};

// =============================================================================
// 1. THE ABSTRACTION
// =============================================================================

/// Failures raised by the collection itself, independent of the entity type.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum StoreError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },
    #[error("{kind} already exists: {key}")]
    AlreadyExists { kind: &'static str, key: String },
    #[error("{kind} store unavailable")]
    Unavailable { kind: &'static str },
}

/// Trait that any document type must implement to be managed by [`ResourceActor`].
pub trait Entity: Clone + Send + Sync + 'static {
    type Id: Eq + Hash + Clone + Send + Sync + Display + Debug;
    type CreateParams: Send + Sync + Debug;
    type Patch: Send + Sync + Debug;
    type Query: Send + Sync + Debug;
    type Action: Send + Sync + Debug;
    type ActionResult: Send + Sync + Debug;
    type Error: From<StoreError> + Send + Debug + 'static;

    /// Collection name, used in logs and error messages.
    const KIND: &'static str;

    fn id(&self) -> &Self::Id;

    /// Construct the full document from its id and the creation parameters.
    fn from_create_params(id: Self::Id, params: Self::CreateParams) -> Result<Self, Self::Error>;

    /// Key that must be unique across the collection while it is `Some`.
    ///
    /// Checked on every write, inside the actor, so two concurrent inserts can
    /// never both claim the same key.
    fn unique_key(&self) -> Option<String> {
        None
    }

    fn matches(&self, query: &Self::Query) -> bool;

    // --- Lifecycle Hooks ---

    fn on_create(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
    fn on_update(&mut self, patch: Self::Patch) -> Result<(), Self::Error>;
    fn on_delete(&self) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Handle a domain-specific action. A failed action leaves the document untouched.
    fn handle_action(&mut self, action: Self::Action) -> Result<Self::ActionResult, Self::Error>;
}

// =============================================================================
// 2. THE GENERIC MESSAGES
// =============================================================================

pub type Response<T, E> = oneshot::Sender<Result<T, E>>;

#[derive(Debug)]
pub enum ResourceRequest<T: Entity> {
    /// Insert under a freshly generated id.
    Create {
        params: T::CreateParams,
        respond_to: Response<T::Id, T::Error>,
    },
    /// Insert under a caller-assigned id.
    Insert {
        id: T::Id,
        params: T::CreateParams,
        respond_to: Response<T::Id, T::Error>,
    },
    Get {
        id: T::Id,
        respond_to: Response<Option<T>, T::Error>,
    },
    /// Matching documents, oldest first, at most `limit` of them.
    Find {
        query: T::Query,
        limit: usize,
        respond_to: Response<Vec<T>, T::Error>,
    },
    Update {
        id: T::Id,
        patch: T::Patch,
        respond_to: Response<T, T::Error>,
    },
    Delete {
        id: T::Id,
        respond_to: Response<T, T::Error>,
    },
    Action {
        id: T::Id,
        action: T::Action,
        respond_to: Response<T::ActionResult, T::Error>,
    },
    #[cfg(test)]
    Count {
        respond_to: Response<usize, T::Error>,
    },
    Shutdown,
}

// =============================================================================
// 3. THE GENERIC ACTOR SERVER
// =============================================================================

struct Record<T> {
    seq: u64,
    item: T,
}

pub struct ResourceActor<T: Entity> {
    receiver: mpsc::Receiver<ResourceRequest<T>>,
    store: HashMap<T::Id, Record<T>>,
    next_seq: u64,
    next_id_fn: Box<dyn Fn() -> T::Id + Send + Sync>,
}

impl<T: Entity> ResourceActor<T> {
    pub fn new(
        buffer_size: usize,
        next_id_fn: impl Fn() -> T::Id + Send + Sync + 'static,
    ) -> (Self, ResourceClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            store: HashMap::new(),
            next_seq: 0,
            next_id_fn: Box::new(next_id_fn),
        };
        (actor, ResourceClient::new(sender))
    }

    #[instrument(name = "resource_actor", skip(self), fields(kind = T::KIND))]
    pub async fn run(mut self) {
        info!("Store starting");
        while let Some(msg) = self.receiver.recv().await {
            match msg {
                ResourceRequest::Create { params, respond_to } => {
                    let id = (self.next_id_fn)();
                    let _ = respond_to.send(self.handle_insert(id, params));
                }
                ResourceRequest::Insert { id, params, respond_to } => {
                    let _ = respond_to.send(self.handle_insert(id, params));
                }
                ResourceRequest::Get { id, respond_to } => {
                    let item = self.store.get(&id).map(|record| record.item.clone());
                    let _ = respond_to.send(Ok(item));
                }
                ResourceRequest::Find { query, limit, respond_to } => {
                    let _ = respond_to.send(Ok(self.handle_find(&query, limit)));
                }
                ResourceRequest::Update { id, patch, respond_to } => {
                    let _ = respond_to.send(self.handle_update(id, patch));
                }
                ResourceRequest::Delete { id, respond_to } => {
                    let _ = respond_to.send(self.handle_delete(id));
                }
                ResourceRequest::Action { id, action, respond_to } => {
                    let _ = respond_to.send(self.handle_action(id, action));
                }
                #[cfg(test)]
                ResourceRequest::Count { respond_to } => {
                    let _ = respond_to.send(Ok(self.store.len()));
                }
                ResourceRequest::Shutdown => {
                    info!("Store shutting down");
                    break;
                }
            }
        }
        info!(documents = self.store.len(), "Store stopped");
    }

    fn handle_insert(&mut self, id: T::Id, params: T::CreateParams) -> Result<T::Id, T::Error> {
        if self.store.contains_key(&id) {
            warn!(%id, "Duplicate id");
            return Err(StoreError::AlreadyExists { kind: T::KIND, key: id.to_string() }.into());
        }
        let mut item = T::from_create_params(id.clone(), params)?;
        item.on_create()?;
        self.ensure_unique(&item)?;

        let seq = self.next_seq;
        self.next_seq += 1;
        self.store.insert(id.clone(), Record { seq, item });
        debug!(%id, "Document inserted");
        Ok(id)
    }

    fn handle_find(&self, query: &T::Query, limit: usize) -> Vec<T> {
        let mut hits: Vec<&Record<T>> = self
            .store
            .values()
            .filter(|record| record.item.matches(query))
            .collect();
        hits.sort_by_key(|record| record.seq);
        hits.into_iter()
            .take(limit)
            .map(|record| record.item.clone())
            .collect()
    }

    fn handle_update(&mut self, id: T::Id, patch: T::Patch) -> Result<T, T::Error> {
        let mut candidate = self.existing(&id)?.clone();
        candidate.on_update(patch)?;
        self.ensure_unique(&candidate)?;
        self.commit(&id, candidate.clone());
        Ok(candidate)
    }

    fn handle_delete(&mut self, id: T::Id) -> Result<T, T::Error> {
        self.existing(&id)?.on_delete()?;
        match self.store.remove(&id) {
            Some(record) => Ok(record.item),
            None => Err(not_found::<T>(&id)),
        }
    }

    fn handle_action(&mut self, id: T::Id, action: T::Action) -> Result<T::ActionResult, T::Error> {
        let mut candidate = self.existing(&id)?.clone();
        let result = candidate.handle_action(action)?;
        self.ensure_unique(&candidate)?;
        self.commit(&id, candidate);
        Ok(result)
    }

    fn existing(&self, id: &T::Id) -> Result<&T, T::Error> {
        self.store
            .get(id)
            .map(|record| &record.item)
            .ok_or_else(|| not_found::<T>(id))
    }

    fn commit(&mut self, id: &T::Id, item: T) {
        if let Some(record) = self.store.get_mut(id) {
            record.item = item;
        }
    }

    fn ensure_unique(&self, candidate: &T) -> Result<(), T::Error> {
        let Some(key) = candidate.unique_key() else {
            return Ok(());
        };
        let taken = self.store.values().any(|record| {
            record.item.id() != candidate.id() && record.item.unique_key().as_ref() == Some(&key)
        });
        if taken {
            error!(%key, "Unique key already taken");
            return Err(StoreError::AlreadyExists { kind: T::KIND, key }.into());
        }
        Ok(())
    }
}

fn not_found<T: Entity>(id: &T::Id) -> T::Error {
    StoreError::NotFound { kind: T::KIND, id: id.to_string() }.into()
}

// =============================================================================
// 4. THE GENERIC CLIENT
// =============================================================================

pub struct ResourceClient<T: Entity> {
    sender: mpsc::Sender<ResourceRequest<T>>,
}

// Manual impl: a derive would demand `T: Clone` bounds on every associated type.
impl<T: Entity> Clone for ResourceClient<T> {
    fn clone(&self) -> Self {
        Self { sender: self.sender.clone() }
    }
}

impl<T: Entity> ResourceClient<T> {
    pub fn new(sender: mpsc::Sender<ResourceRequest<T>>) -> Self {
        Self { sender }
    }

    async fn request<R>(
        &self,
        build: impl FnOnce(Response<R, T::Error>) -> ResourceRequest<T>,
    ) -> Result<R, T::Error> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| StoreError::Unavailable { kind: T::KIND })?;
        response
            .await
            .map_err(|_| StoreError::Unavailable { kind: T::KIND })?
    }

    pub async fn create(&self, params: T::CreateParams) -> Result<T::Id, T::Error> {
        self.request(|respond_to| ResourceRequest::Create { params, respond_to })
            .await
    }

    pub async fn insert(&self, id: T::Id, params: T::CreateParams) -> Result<T::Id, T::Error> {
        self.request(|respond_to| ResourceRequest::Insert { id, params, respond_to })
            .await
    }

    pub async fn get(&self, id: T::Id) -> Result<Option<T>, T::Error> {
        self.request(|respond_to| ResourceRequest::Get { id, respond_to })
            .await
    }

    pub async fn find(&self, query: T::Query, limit: usize) -> Result<Vec<T>, T::Error> {
        self.request(|respond_to| ResourceRequest::Find { query, limit, respond_to })
            .await
    }

    pub async fn update(&self, id: T::Id, patch: T::Patch) -> Result<T, T::Error> {
        self.request(|respond_to| ResourceRequest::Update { id, patch, respond_to })
            .await
    }

    pub async fn delete(&self, id: T::Id) -> Result<T, T::Error> {
        self.request(|respond_to| ResourceRequest::Delete { id, respond_to })
            .await
    }

    pub async fn perform_action(
        &self,
        id: T::Id,
        action: T::Action,
    ) -> Result<T::ActionResult, T::Error> {
        self.request(|respond_to| ResourceRequest::Action { id, action, respond_to })
            .await
    }

    #[cfg(test)]
    pub async fn count(&self) -> Result<usize, T::Error> {
        self.request(|respond_to| ResourceRequest::Count { respond_to })
            .await
    }

    pub async fn shutdown(&self) -> Result<(), T::Error> {
        self.sender
            .send(ResourceRequest::Shutdown)
            .await
            .map_err(|_| StoreError::Unavailable { kind: T::KIND }.into())
    }
}
