use std::{
    collections::HashMap,
    fs,
    path::Path,
    sync::atomic::{AtomicUsize, Ordering},
    time::Duration,
};

use async_trait::async_trait;
use itertools::Itertools;
use parking_lot::RwLock;
use serde_json::Value;
use tracing::{debug, info, instrument};

use super::{Cursor, Document, DocumentStore, Page, RangeQuery};
use crate::{
    error::{DataError, Result},
    raw::lookup,
};

/// In-process [`DocumentStore`] with the same ordering and cursor rules as the
/// remote store: documents missing the ordered field are excluded, ties on the
/// sort key are broken by id.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Vec<Document>>>,
    latency: Duration,
    queries: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store holding `documents` in `collection`.
    pub fn from_documents(collection: &str, documents: Vec<Document>) -> Self {
        let store = Self::new();
        store.insert_all(collection, documents);
        store
    }

    /// Load a JSON seed file shaped as `{"<collection>": [{"id": ..., ...}, ...]}`.
    #[instrument(name = "Load seed file", level = "info")]
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let seed: Value = serde_json::from_str(&fs::read_to_string(path)?)?;
        let Value::Object(collections) = seed else {
            return Err(DataError::MalformedDocument {
                id: path.display().to_string(),
                reason: "seed file must be an object of collections".to_string(),
            });
        };

        let store = Self::new();
        for (collection, entries) in collections {
            let documents = entries
                .as_array()
                .into_iter()
                .flatten()
                .enumerate()
                .map(|(i, entry)| {
                    let id = entry
                        .get("id")
                        .and_then(lookup::text)
                        .unwrap_or_else(|| format!("{collection}-{i}"));
                    Document::new(id, entry.clone())
                })
                .collect_vec();
            info!(collection = %collection, count = documents.len(), "Loaded seed collection");
            store.insert_all(&collection, documents);
        }
        Ok(store)
    }

    /// Delay every query by `latency`, useful for exercising in-flight searches.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn insert(&self, collection: &str, document: Document) {
        self.collections
            .write()
            .entry(collection.to_string())
            .or_default()
            .push(document);
    }

    pub fn insert_all(&self, collection: &str, documents: Vec<Document>) {
        self.collections
            .write()
            .entry(collection.to_string())
            .or_default()
            .extend(documents);
    }

    pub fn len(&self, collection: &str) -> usize {
        self.collections.read().get(collection).map_or(0, Vec::len)
    }

    pub fn is_empty(&self, collection: &str) -> bool {
        self.len(collection) == 0
    }

    /// Number of range queries served so far.
    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::Relaxed)
    }

    fn execute(&self, query: &RangeQuery) -> Page {
        let collections = self.collections.read();
        let Some(documents) = collections.get(&query.collection) else {
            return Page::default();
        };

        let in_range = |value: &str| {
            query.lower.as_deref().is_none_or(|lower| value >= lower)
                && query.upper.as_deref().is_none_or(|upper| value <= upper)
        };

        let selected = documents
            .iter()
            .filter_map(|doc| {
                let filter_value = lookup::path(&doc.data, &query.field).and_then(lookup::text)?;
                if !in_range(&filter_value) {
                    return None;
                }
                let order_value =
                    lookup::path(&doc.data, &query.order_by).and_then(lookup::text)?;
                Some((order_value, doc))
            })
            .sorted_by(|(a, da), (b, db)| a.cmp(b).then_with(|| da.id.cmp(&db.id)))
            .filter(|(order_value, doc)| {
                query.start_after.as_ref().is_none_or(|cursor| {
                    (order_value.as_str(), doc.id.as_str())
                        > (cursor.order_value.as_str(), cursor.id.as_str())
                })
            })
            .take(query.limit)
            .collect_vec();

        let cursor = selected.last().map(|(order_value, doc)| Cursor {
            order_value: order_value.clone(),
            id: doc.id.clone(),
        });

        Page {
            documents: selected.into_iter().map(|(_, doc)| doc.clone()).collect(),
            cursor,
        }
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn range_query(&self, query: &RangeQuery) -> Result<Page> {
        self.queries.fetch_add(1, Ordering::Relaxed);
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        let page = self.execute(query);
        debug!(
            collection = %query.collection,
            lower = ?query.lower,
            upper = ?query.upper,
            returned = page.len(),
            "Served range query"
        );
        Ok(page)
    }
}
