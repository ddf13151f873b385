// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use serde_json::Value;

use crate::error::RemoteError;
use crate::utils::http_client;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Transactions,
    Budgets,
}

impl Collection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Transactions => "transactions",
            Collection::Budgets => "budgets",
        }
    }
}

/// A document as delivered by the store: assigned id plus payload (the
/// payload never carries the id itself).
pub type Doc = (String, Value);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Per-identity remote document store: two sub-collections with create (store
/// assigns the id), upsert-by-id, delete-by-id, get-all, and pull-based
/// subscriptions that re-deliver the full current collection on every change.
pub trait RemoteStore {
    fn create(&mut self, collection: Collection, payload: &Value) -> Result<String, RemoteError>;

    fn upsert(
        &mut self,
        collection: Collection,
        id: &str,
        payload: &Value,
    ) -> Result<(), RemoteError>;

    fn delete(&mut self, collection: Collection, id: &str) -> Result<(), RemoteError>;

    fn fetch_all(&mut self, collection: Collection) -> Result<Vec<Doc>, RemoteError>;

    fn subscribe(&mut self, collection: Collection) -> SubscriptionId;

    fn unsubscribe(&mut self, sub: SubscriptionId);

    /// Full current collection if it changed since the last delivery on this
    /// subscription, `None` otherwise. The first poll always delivers.
    fn poll(&mut self, sub: SubscriptionId) -> Result<Option<Vec<Doc>>, RemoteError>;
}

// Shared-handle form so a caller can keep inspecting a store it handed to a
// session.
impl<R: RemoteStore> RemoteStore for Rc<RefCell<R>> {
    fn create(&mut self, collection: Collection, payload: &Value) -> Result<String, RemoteError> {
        self.borrow_mut().create(collection, payload)
    }

    fn upsert(
        &mut self,
        collection: Collection,
        id: &str,
        payload: &Value,
    ) -> Result<(), RemoteError> {
        self.borrow_mut().upsert(collection, id, payload)
    }

    fn delete(&mut self, collection: Collection, id: &str) -> Result<(), RemoteError> {
        self.borrow_mut().delete(collection, id)
    }

    fn fetch_all(&mut self, collection: Collection) -> Result<Vec<Doc>, RemoteError> {
        self.borrow_mut().fetch_all(collection)
    }

    fn subscribe(&mut self, collection: Collection) -> SubscriptionId {
        self.borrow_mut().subscribe(collection)
    }

    fn unsubscribe(&mut self, sub: SubscriptionId) {
        self.borrow_mut().unsubscribe(sub)
    }

    fn poll(&mut self, sub: SubscriptionId) -> Result<Option<Vec<Doc>>, RemoteError> {
        self.borrow_mut().poll(sub)
    }
}

/// HTTP binding of the document store contract:
/// `{server}/users/{user}/{collection}` responds to GET (array of documents,
/// each with an `id` field), POST (create, returns `{"id": ...}`), and
/// `/{id}` to PUT and DELETE. Subscription polls re-fetch and deliver only
/// when the collection body changed.
pub struct HttpRemote {
    client: reqwest::blocking::Client,
    base: String,
    user: String,
    subs: HashMap<u64, HttpSub>,
    next_sub: u64,
}

struct HttpSub {
    collection: Collection,
    last: Option<String>,
}

impl HttpRemote {
    pub fn new(server: &str, user: &str) -> anyhow::Result<Self> {
        Ok(HttpRemote {
            client: http_client()?,
            base: server.trim_end_matches('/').to_string(),
            user: user.to_string(),
            subs: HashMap::new(),
            next_sub: 0,
        })
    }

    fn url(&self, collection: Collection) -> String {
        format!("{}/users/{}/{}", self.base, self.user, collection.as_str())
    }

    fn fetch_docs(&self, collection: Collection) -> Result<Vec<Doc>, RemoteError> {
        let resp = self.client.get(self.url(collection)).send()?;
        let resp = ensure_ok(resp)?;
        let items: Vec<Value> = resp.json()?;
        let mut docs = Vec::with_capacity(items.len());
        for mut item in items {
            let id = match item.as_object_mut().and_then(|m| m.remove("id")) {
                Some(Value::String(id)) => id,
                _ => return Err(RemoteError::MissingId),
            };
            docs.push((id, item));
        }
        Ok(docs)
    }
}

impl RemoteStore for HttpRemote {
    fn create(&mut self, collection: Collection, payload: &Value) -> Result<String, RemoteError> {
        let resp = self.client.post(self.url(collection)).json(payload).send()?;
        let resp = ensure_ok(resp)?;
        let body: Value = resp.json()?;
        match body.get("id").and_then(Value::as_str) {
            Some(id) => Ok(id.to_string()),
            None => Err(RemoteError::MissingId),
        }
    }

    fn upsert(
        &mut self,
        collection: Collection,
        id: &str,
        payload: &Value,
    ) -> Result<(), RemoteError> {
        let url = format!("{}/{}", self.url(collection), id);
        let resp = self.client.put(url).json(payload).send()?;
        ensure_ok(resp)?;
        Ok(())
    }

    fn delete(&mut self, collection: Collection, id: &str) -> Result<(), RemoteError> {
        let url = format!("{}/{}", self.url(collection), id);
        let resp = self.client.delete(url).send()?;
        // Deleting an already-gone document is not an error.
        if resp.status().as_u16() == 404 {
            return Ok(());
        }
        ensure_ok(resp)?;
        Ok(())
    }

    fn fetch_all(&mut self, collection: Collection) -> Result<Vec<Doc>, RemoteError> {
        self.fetch_docs(collection)
    }

    fn subscribe(&mut self, collection: Collection) -> SubscriptionId {
        let id = self.next_sub;
        self.next_sub += 1;
        self.subs.insert(id, HttpSub { collection, last: None });
        SubscriptionId(id)
    }

    fn unsubscribe(&mut self, sub: SubscriptionId) {
        self.subs.remove(&sub.0);
    }

    fn poll(&mut self, sub: SubscriptionId) -> Result<Option<Vec<Doc>>, RemoteError> {
        let collection = match self.subs.get(&sub.0) {
            Some(s) => s.collection,
            None => return Ok(None),
        };
        let docs = self.fetch_docs(collection)?;
        let fingerprint = serde_json::to_string(&docs)?;
        match self.subs.get_mut(&sub.0) {
            Some(s) if s.last.as_deref() == Some(fingerprint.as_str()) => Ok(None),
            Some(s) => {
                s.last = Some(fingerprint);
                Ok(Some(docs))
            }
            None => Ok(None),
        }
    }
}

fn ensure_ok(resp: reqwest::blocking::Response) -> Result<reqwest::blocking::Response, RemoteError> {
    if resp.status().is_success() {
        Ok(resp)
    } else {
        Err(RemoteError::Status(resp.status().as_u16()))
    }
}

/// In-process document store with live subscription semantics; the reference
/// backend for tests and offline experiments. `fail_writes` simulates an
/// unreachable backend for write and delete calls.
#[derive(Debug, Default)]
pub struct MemoryRemote {
    collections: HashMap<Collection, Vec<Doc>>,
    subs: HashMap<u64, MemorySub>,
    next_doc: u64,
    next_sub: u64,
    pub fail_writes: bool,
}

#[derive(Debug)]
struct MemorySub {
    collection: Collection,
    pending: bool,
}

impl MemoryRemote {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn docs(&self, collection: Collection) -> &[Doc] {
        self.collections
            .get(&collection)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    pub fn subscriber_count(&self) -> usize {
        self.subs.len()
    }

    /// Seed a document directly, as if written by another client.
    pub fn seed(&mut self, collection: Collection, id: &str, payload: Value) {
        self.collections
            .entry(collection)
            .or_default()
            .push((id.to_string(), payload));
        self.mark_dirty(collection);
    }

    fn mark_dirty(&mut self, collection: Collection) {
        for sub in self.subs.values_mut() {
            if sub.collection == collection {
                sub.pending = true;
            }
        }
    }

    fn check_writable(&self) -> Result<(), RemoteError> {
        if self.fail_writes {
            Err(RemoteError::WriteRejected)
        } else {
            Ok(())
        }
    }
}

impl RemoteStore for MemoryRemote {
    fn create(&mut self, collection: Collection, payload: &Value) -> Result<String, RemoteError> {
        self.check_writable()?;
        self.next_doc += 1;
        let id = format!("r{:04}", self.next_doc);
        self.collections
            .entry(collection)
            .or_default()
            .push((id.clone(), payload.clone()));
        self.mark_dirty(collection);
        Ok(id)
    }

    fn upsert(
        &mut self,
        collection: Collection,
        id: &str,
        payload: &Value,
    ) -> Result<(), RemoteError> {
        self.check_writable()?;
        let docs = self.collections.entry(collection).or_default();
        match docs.iter_mut().find(|(doc_id, _)| doc_id == id) {
            Some((_, value)) => *value = payload.clone(),
            // Upsert-by-id creates the document when absent.
            None => docs.push((id.to_string(), payload.clone())),
        }
        self.mark_dirty(collection);
        Ok(())
    }

    fn delete(&mut self, collection: Collection, id: &str) -> Result<(), RemoteError> {
        self.check_writable()?;
        if let Some(docs) = self.collections.get_mut(&collection) {
            docs.retain(|(doc_id, _)| doc_id != id);
        }
        self.mark_dirty(collection);
        Ok(())
    }

    fn fetch_all(&mut self, collection: Collection) -> Result<Vec<Doc>, RemoteError> {
        Ok(self.docs(collection).to_vec())
    }

    fn subscribe(&mut self, collection: Collection) -> SubscriptionId {
        let id = self.next_sub;
        self.next_sub += 1;
        self.subs.insert(id, MemorySub { collection, pending: true });
        SubscriptionId(id)
    }

    fn unsubscribe(&mut self, sub: SubscriptionId) {
        self.subs.remove(&sub.0);
    }

    fn poll(&mut self, sub: SubscriptionId) -> Result<Option<Vec<Doc>>, RemoteError> {
        let collection = match self.subs.get_mut(&sub.0) {
            Some(s) if s.pending => {
                s.pending = false;
                s.collection
            }
            _ => return Ok(None),
        };
        Ok(Some(self.docs(collection).to_vec()))
    }
}
