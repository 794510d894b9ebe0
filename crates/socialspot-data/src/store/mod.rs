//! The read path into the remote document store.
//!
//! The search core only ever issues ordered range queries, so the whole store is
//! reduced to [`DocumentStore::range_query`]. Query execution, transport and
//! timeouts are the implementor's concern.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;

mod memory;

pub use memory::MemoryStore;

/// A raw store document: id plus untyped body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub data: Value,
}

impl Document {
    pub fn new(id: impl Into<String>, data: Value) -> Self {
        Self {
            id: id.into(),
            data,
        }
    }
}

/// Resume position for paginated reads: the sort key and id of the last
/// document of the previous page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cursor {
    pub order_value: String,
    pub id: String,
}

/// One ordered, bounded read against a collection.
///
/// `lower`/`upper` are inclusive bounds on `field`; either may be absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeQuery {
    pub collection: String,
    pub field: String,
    pub lower: Option<String>,
    pub upper: Option<String>,
    pub order_by: String,
    pub limit: usize,
    pub start_after: Option<Cursor>,
}

impl RangeQuery {
    /// Range over `field`, ordered by the same field.
    pub fn between(
        collection: impl Into<String>,
        field: impl Into<String>,
        lower: impl Into<String>,
        upper: impl Into<String>,
        limit: usize,
    ) -> Self {
        let field = field.into();
        Self {
            collection: collection.into(),
            order_by: field.clone(),
            field,
            lower: Some(lower.into()),
            upper: Some(upper.into()),
            limit,
            start_after: None,
        }
    }

    /// Unbounded scan of a collection ordered by `order_by`.
    pub fn scan(collection: impl Into<String>, order_by: impl Into<String>, limit: usize) -> Self {
        let order_by = order_by.into();
        Self {
            collection: collection.into(),
            field: order_by.clone(),
            order_by,
            lower: None,
            upper: None,
            limit,
            start_after: None,
        }
    }

    pub fn after(mut self, cursor: Option<Cursor>) -> Self {
        self.start_after = cursor;
        self
    }
}

/// An ordered page of documents. `cursor` points at the last document, if any.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub documents: Vec<Document>,
    pub cursor: Option<Cursor>,
}

impl Page {
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Execute one range query and return a single ordered page.
    ///
    /// Failures surface as [`crate::DataError::QueryFailure`].
    async fn range_query(&self, query: &RangeQuery) -> Result<Page>;
}

#[async_trait]
impl<S: DocumentStore + ?Sized> DocumentStore for std::sync::Arc<S> {
    async fn range_query(&self, query: &RangeQuery) -> Result<Page> {
        (**self).range_query(query).await
    }
}
